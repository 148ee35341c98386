//! OmniScale.
//!
//! Every destination pixel is shaded from its own position inside the source
//! pixel it falls in, using the rules in [`crate::procedural`]. Consecutive
//! destination pixels mostly share a source pixel, so the 3x3 neighborhood
//! and its [`PatternCode`] are computed once per source pixel and reflected
//! onto each quarter:
//!
//! ```text
//!   quarter      symmetry
//!   top-left     IDENTITY
//!   top-right    FLIP_X
//!   bottom-left  FLIP_Y
//!   bottom-right ROTATE_180
//! ```

use std::ops::Range;

use crate::classify::{DifferenceClassifier, HqColorspace, PatternCode, Symmetry};
use crate::procedural::{fold, pixel_size, Quarter, EXTENSION_OFFSETS};
use crate::surface::{SourceImage, TargetImage};

/// Map a destination coordinate to its source pixel and in-pixel offset.
#[inline]
fn locate(dst: u32, src_len: u32, dst_len: u32) -> (i64, f32) {
    let pos = (f64::from(dst) + 0.5) * f64::from(src_len) / f64::from(dst_len);
    let index = pos.floor();
    ((index as i64).min(i64::from(src_len) - 1), (pos - index) as f32)
}

/// OmniScale at any destination size.
pub fn omniscale<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
        return;
    }

    let scale_x = dw as f32 / sw as f32;
    let scale_y = dh as f32 / sh as f32;
    let pixel_size = pixel_size(scale_x, scale_y);
    let columns: Vec<(i64, f32)> = (0..dw).map(|x| locate(x, sw, dw)).collect();

    for y in rows {
        let (sy, offset_y) = locate(y, sh, dh);
        let (py, oy) = fold(offset_y);

        let mut cached: Option<(i64, [S::Pixel; 9], PatternCode)> = None;
        for (x, &(sx, offset_x)) in columns.iter().enumerate() {
            let (grid, code) = match cached {
                Some((cx, grid, code)) if cx == sx => (grid, code),
                _ => {
                    let grid: [S::Pixel; 9] =
                        std::array::from_fn(|k| src.safe_access(sx + (k % 3) as i64 - 1, sy + (k / 3) as i64 - 1));
                    let code = HqColorspace.pattern(&grid);
                    cached = Some((sx, grid, code));
                    (grid, code)
                }
            };

            let (px, ox) = fold(offset_x);
            let sym = match (ox, oy) {
                (1, 1) => Symmetry::IDENTITY,
                (_, 1) => Symmetry::FLIP_X,
                (1, _) => Symmetry::FLIP_Y,
                _ => Symmetry::ROTATE_180,
            };
            let raw: [S::Pixel; 9] = std::array::from_fn(|k| grid[sym.map(k)]);
            let quarter = Quarter::new(raw, code.reflect(sym), px, py, pixel_size);

            let color = quarter.shade(|| {
                let mut bits = 0u8;
                for (bit, &(dx, dy)) in EXTENSION_OFFSETS.iter().enumerate() {
                    let far = src.safe_access(sx + dx * ox, sy + dy * oy);
                    if HqColorspace.is_different(&far, &raw[4]) {
                        bits |= 1 << bit;
                    }
                }
                bits
            });
            dst.set(x as u32, y, color.to_pixel());
        }
    }
}
