//! Bilinear and trilinear resampling.
//!
//! Bilinear maps destination pixel centers back to source space with
//! `src = (dst + 0.5) * src_len / dst_len - 0.5`, clamps negative positions
//! to zero and blends the four surrounding pixels. Trilinear does the same for
//! upscaling; when shrinking it samples the two box-filtered mip levels that
//! bracket the scale and blends them by the fractional level.

use std::ops::Range;

use crate::pixel::Color;
use crate::surface::{SourceImage, TargetImage};

/// Source coordinate and blend weight along one axis.
#[derive(Debug, Clone, Copy)]
struct Tap {
    i0: u32,
    i1: u32,
    frac: f32,
}

impl Tap {
    fn new(dst: u32, src_len: u32, dst_len: u32) -> Self {
        let ratio = src_len as f32 / dst_len as f32;
        let pos = (dst as f32 + 0.5) * ratio - 0.5;
        let (i0, frac) = if pos >= 0.0 {
            let i = (pos as u32).min(src_len - 1);
            (i, pos - i as f32)
        } else {
            (0, 0.0)
        };
        Tap {
            i0,
            i1: (i0 + 1).min(src_len - 1),
            frac,
        }
    }
}

#[inline]
fn blend(tx: Tap, ty: Tap, fetch: impl Fn(u32, u32) -> Color) -> Color {
    let top = fetch(tx.i0, ty.i0).mix(fetch(tx.i1, ty.i0), tx.frac);
    let bottom = fetch(tx.i0, ty.i1).mix(fetch(tx.i1, ty.i1), tx.frac);
    top.mix(bottom, ty.frac)
}

/// Fill destination `rows` by bilinear interpolation.
pub fn bilinear<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    if sw == 0 || sh == 0 {
        return;
    }

    let columns: Vec<Tap> = (0..dw).map(|x| Tap::new(x, sw, dw)).collect();
    for y in rows {
        let ty = Tap::new(y, sh, dh);
        for (x, &tx) in columns.iter().enumerate() {
            let c = blend(tx, ty, |sx, sy| Color::of(&src.get(sx, sy)));
            dst.set(x as u32, y, c.to_pixel());
        }
    }
}

/// One box-filtered level of a mip chain.
struct Mip {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl Mip {
    /// Average `2^level` square blocks of the source, clipping at the edges.
    fn build<S: SourceImage>(src: &S, level: u32) -> Self {
        let step = 1u32 << level.min(30);
        let width = (src.width() / step).max(1);
        let height = (src.height() / step).max(1);
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let (x0, y0) = (x * step, y * step);
                let x1 = (x0 + step).min(src.width());
                let y1 = (y0 + step).min(src.height());
                let mut sum = Color::default();
                let mut count = 0u32;
                for sy in y0..y1 {
                    for sx in x0..x1 {
                        sum = sum + Color::of(&src.get(sx, sy));
                        count += 1;
                    }
                }
                data.push(if count > 0 { sum * (1.0 / count as f32) } else { sum });
            }
        }
        Mip { width, height, data }
    }

    fn sample(&self, x: u32, y: u32, dst_w: u32, dst_h: u32) -> Color {
        let tx = Tap::new(x, self.width, dst_w);
        let ty = Tap::new(y, self.height, dst_h);
        blend(tx, ty, |sx, sy| self.data[(sy * self.width + sx) as usize])
    }
}

/// Fill destination `rows` by trilinear filtering.
pub fn trilinear<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    if sw == 0 || sh == 0 || dw == 0 {
        return;
    }

    let scale = dw as f32 / sw as f32;
    if scale >= 1.0 {
        bilinear(src, dst, rows);
        return;
    }

    let level = -scale.log2();
    let lower = level.floor().max(0.0) as u32;
    let weight = level - lower as f32;
    let near = Mip::build(src, lower);
    let far = Mip::build(src, lower + 1);

    for y in rows {
        for x in 0..dw {
            let c = near.sample(x, y, dw, dh).mix(far.sample(x, y, dw, dh), weight);
            dst.set(x, y, c.to_pixel::<S::Pixel>());
        }
    }
}
