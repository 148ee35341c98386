//! Equality-rule programs: EPX, Eagle, Scale2x/3x and ScaleSFX.
//!
//! Every program finds its source texel and cell, then evaluates only the
//! rule for that cell. Corner rules are written once in terms of the corner
//! direction `(dx, dy)`, each component `-1` or `1`:
//!
//! ```text
//!   (dx, dy)    diagonal neighbor   edge neighbors
//!   (-1, -1)    top-left            left, top
//!   ( 1, -1)    top-right           right, top
//!   (-1,  1)    bottom-left         left, bottom
//!   ( 1,  1)    bottom-right        right, bottom
//! ```

use super::{Fragment, Texture};
use crate::blend::one_one;
use crate::pixel::Pixel;

/// Corner direction of cell `q` in a 2-wide block.
#[inline]
fn direction(q: u32) -> i64 {
    if q == 0 {
        -1
    } else {
        1
    }
}

pub fn epx<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (sx, sy, qx, qy) = frag.cell(2);
    let t = |dx: i64, dy: i64| tex.fetch(sx + dx, sy + dy);
    let (top, left, right, bottom, p) = (t(0, -1), t(-1, 0), t(1, 0), t(0, 1), t(0, 0));

    let agreeing = [
        top == right,
        top == left,
        top == bottom,
        right == left,
        right == bottom,
        left == bottom,
    ]
    .iter()
    .filter(|&&same| same)
    .count();
    if agreeing >= 3 {
        return p;
    }

    let horizontal = if qx == 0 { left } else { right };
    let vertical = if qy == 0 { top } else { bottom };
    if horizontal == vertical {
        vertical
    } else {
        p
    }
}

pub fn eagle<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (sx, sy, qx, qy) = frag.cell(2);
    let (dx, dy) = (direction(qx), direction(qy));
    let t = |dx: i64, dy: i64| tex.fetch(sx + dx, sy + dy);
    let diagonal = t(dx, dy);
    if t(dx, 0) == diagonal && diagonal == t(0, dy) {
        diagonal
    } else {
        t(0, 0)
    }
}

/// The Scale2x sub-pixel of texel `(sx, sy)` selected by `right` and
/// `bottom`.
pub(super) fn scale2x_texel<X: Texture>(tex: &X, sx: i64, sy: i64, right: bool, bottom: bool) -> X::Pixel {
    let t = |dx: i64, dy: i64| tex.fetch(sx + dx, sy + dy);
    let (b, d, e, f, h) = (t(0, -1), t(-1, 0), t(0, 0), t(1, 0), t(0, 1));
    if b == h || d == f {
        return e;
    }
    let horizontal = if right { f } else { d };
    let vertical = if bottom { h } else { b };
    if horizontal == vertical {
        horizontal
    } else {
        e
    }
}

pub fn scale2x<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (sx, sy, qx, qy) = frag.cell(2);
    scale2x_texel(tex, sx, sy, qx == 1, qy == 1)
}

pub fn scale3x<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (sx, sy, qx, qy) = frag.cell(3);
    let t = |dx: i64, dy: i64| tex.fetch(sx + dx, sy + dy);
    let (a, b, c) = (t(-1, -1), t(0, -1), t(1, -1));
    let (d, e, f) = (t(-1, 0), t(0, 0), t(1, 0));
    let (g, h, i) = (t(-1, 1), t(0, 1), t(1, 1));
    if b == h || d == f {
        return e;
    }

    let (take, color) = match (qx, qy) {
        (0, 0) => (d == b, d),
        (1, 0) => ((d == b && e != c) || (b == f && e != a), b),
        (2, 0) => (b == f, f),
        (0, 1) => ((d == b && e != g) || (d == h && e != a), d),
        (2, 1) => ((b == f && e != i) || (h == f && e != c), f),
        (0, 2) => (d == h, d),
        (1, 2) => ((d == h && e != i) || (h == f && e != g), h),
        (2, 2) => (h == f, f),
        _ => (false, e),
    };
    if take {
        color
    } else {
        e
    }
}

/// The ScaleSFX corner condition for direction `(dx, dy)`.
fn sfx_corner<P: Pixel>(t: &impl Fn(i64, i64) -> P, dx: i64, dy: i64) -> bool {
    let e = t(0, 0);
    let (horizontal, vertical) = (t(dx, 0), t(0, dy));
    let diagonal = t(dx, dy);
    vertical == horizontal
        && vertical != t(-dx, 0)
        && horizontal != t(0, -dy)
        && (e != diagonal
            || e == t(-dx, dy)
            || e == t(dx, -dy)
            || diagonal == t(0, 2 * dy)
            || diagonal == t(2 * dx, 0))
}

pub fn scale2x_sfx<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (sx, sy, qx, qy) = frag.cell(2);
    let (dx, dy) = (direction(qx), direction(qy));
    let t = |dx: i64, dy: i64| tex.fetch(sx + dx, sy + dy);
    if sfx_corner(&t, dx, dy) {
        t(dx, 0)
    } else {
        t(0, 0)
    }
}

pub fn scale3x_sfx<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (sx, sy, qx, qy) = frag.cell(3);
    let t = |dx: i64, dy: i64| tex.fetch(sx + dx, sy + dy);
    let e = t(0, 0);

    if qx != 1 && qy != 1 {
        let (dx, dy) = (qx as i64 - 1, qy as i64 - 1);
        let (horizontal, vertical) = (t(dx, 0), t(0, dy));
        let diagonal = t(dx, dy);
        let across = t(-dx, dy);
        let down = t(dx, -dy);
        let blend = sfx_corner(&t, dx, dy)
            || (vertical == horizontal && across == e && across != t(0, 2 * dy) && diagonal != e)
            || (vertical == horizontal && e == down && diagonal != e && down != t(2 * dx, 0));
        return if blend { one_one(&vertical, &horizontal) } else { e };
    }

    let corner = |dx, dy| sfx_corner(&t, dx, dy);
    let (take, color) = match (qx, qy) {
        (1, 0) => (
            (corner(-1, -1) && e != t(1, -1)) || (corner(1, -1) && e != t(-1, -1)),
            t(0, -1),
        ),
        (0, 1) => (
            (corner(-1, -1) && e != t(-1, 1)) || (corner(-1, 1) && e != t(-1, -1)),
            t(-1, 0),
        ),
        (2, 1) => (
            (corner(1, 1) && e != t(1, -1)) || (corner(1, -1) && e != t(1, 1)),
            t(1, 0),
        ),
        (1, 2) => (
            (corner(1, 1) && e != t(-1, 1)) || (corner(-1, 1) && e != t(1, 1)),
            t(0, 1),
        ),
        _ => (false, e),
    };
    if take {
        color
    } else {
        e
    }
}
