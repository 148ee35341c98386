//! Nearest-neighbor resampling.
//!
//! Destination pixel `(x, y)` copies source pixel
//! `(floor(x * src_w / dst_w), floor(y * src_h / dst_h))`, the integer form of
//! `floor(dst / scale)`. Works for any destination size, which is also how the
//! xBR 3x composition lands on exactly three times the source size.

use std::ops::Range;

use crate::surface::{SourceImage, TargetImage};

#[inline]
fn source_index(dst: u32, src_len: u32, dst_len: u32) -> u32 {
    let i = u64::from(dst) * u64::from(src_len) / u64::from(dst_len.max(1));
    (i as u32).min(src_len.saturating_sub(1))
}

/// Fill destination `rows` by nearest-neighbor lookup.
pub fn nearest<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    if sw == 0 || sh == 0 {
        return;
    }

    let columns: Vec<u32> = (0..dw).map(|x| source_index(x, sw, dw)).collect();
    for y in rows {
        let sy = source_index(y, sh, dh);
        for (x, &sx) in columns.iter().enumerate() {
            dst.set(x as u32, y, src.get(sx, sy));
        }
    }
}
