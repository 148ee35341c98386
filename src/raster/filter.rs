//! Resampling programs.

use super::{Fragment, Texture};
use crate::pixel::Color;

#[inline]
fn texel_index(dst: u32, src_len: u32, dst_len: u32) -> i64 {
    (u64::from(dst) * u64::from(src_len) / u64::from(dst_len.max(1))) as i64
}

pub fn nearest<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (w, h) = tex.size();
    tex.fetch(
        texel_index(frag.x, w, frag.width),
        texel_index(frag.y, h, frag.height),
    )
}

/// Lower texel and weight of the upper one along one axis.
#[inline]
fn tap(dst: u32, src_len: u32, dst_len: u32) -> (i64, f32) {
    let pos = (dst as f32 + 0.5) * (src_len as f32 / dst_len as f32) - 0.5;
    if pos < 0.0 {
        return (0, 0.0);
    }
    let i = (pos as u32).min(src_len - 1);
    (i64::from(i), pos - i as f32)
}

pub fn bilinear<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (w, h) = tex.size();
    let (x0, fx) = tap(frag.x, w, frag.width);
    let (y0, fy) = tap(frag.y, h, frag.height);
    // fetch clamps, so x0 + 1 past the edge repeats the last texel.
    let at = |x, y| Color::of(&tex.fetch(x, y));
    let top = at(x0, y0).mix(at(x0 + 1, y0), fx);
    let bottom = at(x0, y0 + 1).mix(at(x0 + 1, y0 + 1), fx);
    top.mix(bottom, fy).to_pixel()
}
