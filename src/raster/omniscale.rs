//! OmniScale program.
//!
//! Unlike the CPU kernel there is no per-texel cache: each fragment fetches
//! its neighborhood already mirrored into the top-left quarter and
//! classifies it directly.

use super::{Fragment, Texture};
use crate::classify::{DifferenceClassifier, HqColorspace};
use crate::procedural::{fold, pixel_size, Quarter, EXTENSION_OFFSETS};

pub fn omniscale<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (w, h) = tex.size();
    let scale_x = frag.width as f32 / w as f32;
    let scale_y = frag.height as f32 / h as f32;

    let pos_x = (frag.x as f32 + 0.5) / scale_x;
    let pos_y = (frag.y as f32 + 0.5) / scale_y;
    let sx = (pos_x.floor() as i64).min(i64::from(w) - 1);
    let sy = (pos_y.floor() as i64).min(i64::from(h) - 1);
    let (px, ox) = fold(pos_x.fract());
    let (py, oy) = fold(pos_y.fract());

    let t = |dx: i64, dy: i64| tex.fetch(sx + dx * ox, sy + dy * oy);
    let raw: [X::Pixel; 9] = std::array::from_fn(|k| t((k % 3) as i64 - 1, (k / 3) as i64 - 1));
    let code = HqColorspace.pattern(&raw);

    let quarter = Quarter::new(raw, code, px, py, pixel_size(scale_x, scale_y));
    quarter
        .shade(|| {
            let mut bits = 0u8;
            for (bit, &(dx, dy)) in EXTENSION_OFFSETS.iter().enumerate() {
                if HqColorspace.is_different(&t(dx, dy), &raw[4]) {
                    bits |= 1 << bit;
                }
            }
            bits
        })
        .to_pixel()
}

#[cfg(test)]
mod tests {
    use super::super::{render, Program};
    use crate::algorithms::test_support::{run_full, solid, sprite};
    use crate::algorithms::Kernel;
    use crate::surface::Canvas;
    use image::{ImageBuffer, Rgb};

    fn raster(src: &Canvas<Rgb<u8>>, w: u32, h: u32) -> Canvas<Rgb<u8>> {
        let mut out = ImageBuffer::new(w, h);
        render(Program::OmniScale, src, &mut out, false);
        out
    }

    #[test]
    fn test_solid_stays_solid() {
        let c = Rgb([5, 120, 240]);
        assert!(raster(&solid(5, 3, c), 13, 8).pixels().all(|p| *p == c));
    }

    #[test]
    fn test_within_one_step_of_cpu() {
        let src = sprite(8, 7);
        for n in [2, 3, 4] {
            let gpu = raster(&src, 8 * n, 7 * n);
            let cpu = run_full(Kernel::OmniScale, &src, 8 * n, 7 * n);
            for (a, b) in gpu.pixels().zip(cpu.pixels()) {
                for ch in 0..3 {
                    assert!(a.0[ch].abs_diff(b.0[ch]) <= 1, "{}x: {:?} vs {:?}", n, a, b);
                }
            }
        }
    }
}
