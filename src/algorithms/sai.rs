//! Super 2xSaI.
//!
//! Works on a 4x4 window whose top-left quadrant of the output is always the
//! source pixel itself. Names follow the usual 2xSaI layout:
//!
//! ```text
//!   I E F J
//!   G A B K        A is the current pixel
//!   H C D L
//!   M N O P
//! ```
//!
//! The interesting case is a crossing of two diagonals (`A == D` and
//! `B == C`): the surrounding ring votes on which diagonal is the thin line
//! and keeps it unbroken.

use std::ops::Range;

use super::for_each_block;
use crate::blend::{one_one, one_one_one_one};
use crate::pixel::Pixel;
use crate::surface::{SourceImage, TargetImage};
use crate::window::{RowWindow, WindowShape};

/// Vote of two ring pixels `c` and `d` between colors `a` and `b`.
#[inline]
pub(crate) fn majority_match<P: Pixel>(a: &P, b: &P, c: &P, d: &P) -> i32 {
    let (mut x, mut y) = (0, 0);
    if a == c {
        x += 1;
    } else if b == c {
        y += 1;
    }
    if a == d {
        x += 1;
    } else if b == d {
        y += 1;
    }
    let mut r = 0;
    if x <= 1 {
        r -= 1;
    }
    if y <= 1 {
        r += 1;
    }
    r
}

/// Super2xSaI: 2x.
pub fn super2xsai<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square4, |window, x| {
        let [[i, e, f, j], [g, a, b, k], [h, c, d, l], [m, n, o, _]] = window.grid::<4>(x);

        let (right, bottom, corner);
        if a == d && b != c {
            right = if (a == e && b == l) || (a == c && a == f && b != e && b == j) {
                a
            } else {
                one_one(&a, &b)
            };
            bottom = if (a == g && c == o) || (a == b && a == h && g != c && c == m) {
                a
            } else {
                one_one(&a, &c)
            };
            corner = a;
        } else if a != d && b == c {
            right = if (b == f && a == h) || (b == e && b == d && a != f && a == i) {
                b
            } else {
                one_one(&a, &b)
            };
            bottom = if (c == h && a == f) || (c == g && c == d && a != h && a == i) {
                c
            } else {
                one_one(&a, &c)
            };
            corner = b;
        } else if a == d && b == c {
            if a == b {
                return [[a; 2]; 2];
            }
            right = one_one(&a, &b);
            bottom = one_one(&a, &c);
            let vote = majority_match(&b, &a, &g, &e)
                + majority_match(&b, &a, &k, &f)
                + majority_match(&b, &a, &h, &n)
                + majority_match(&b, &a, &l, &o);
            corner = match vote.signum() {
                1 => a,
                -1 => b,
                _ => one_one_one_one(&a, &b, &c, &d),
            };
        } else {
            corner = one_one_one_one(&a, &b, &c, &d);
            right = if a == c && a == f && b != e && b == j {
                a
            } else if b == e && b == d && a != f && a == i {
                b
            } else {
                one_one(&a, &b)
            };
            bottom = if a == b && a == h && g != c && c == m {
                a
            } else if c == g && c == d && a != h && a == i {
                c
            } else {
                one_one(&a, &c)
            };
        }

        [[a, right], [bottom, corner]]
    });
}
