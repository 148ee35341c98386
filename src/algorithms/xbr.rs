//! xBR 2x.
//!
//! Each output corner decides whether a diagonal edge runs through it by
//! comparing two sums of YUV distances over a 5x5 window: the distances
//! across the candidate edge against the distances along it. Positions:
//!
//! ```text
//!       A1 B1 C1
//!    A0 A  B  C  C4
//!    D0 D  E  F  F4
//!    G0 G  H  I  I4
//!       G5 H5 I5
//! ```
//!
//! Larger factors are compositions done by the dispatcher: 3x resamples the
//! 2x result with nearest neighbor and 4x runs this kernel twice.

use std::ops::Range;

use super::for_each_block;
use crate::blend::three_one;
use crate::classify::Yuv;
use crate::surface::{SourceImage, TargetImage};
use crate::window::{RowWindow, WindowShape};

type Pos = (usize, usize);

const A1: Pos = (0, 1);
const B1: Pos = (0, 2);
const C1: Pos = (0, 3);
const A0: Pos = (1, 0);
const A: Pos = (1, 1);
const B: Pos = (1, 2);
const C: Pos = (1, 3);
const C4: Pos = (1, 4);
const D0: Pos = (2, 0);
const D: Pos = (2, 1);
const E: Pos = (2, 2);
const F: Pos = (2, 3);
const F4: Pos = (2, 4);
const G0: Pos = (3, 0);
const G: Pos = (3, 1);
const H: Pos = (3, 2);
const I: Pos = (3, 3);
const I4: Pos = (3, 4);
const G5: Pos = (4, 1);
const H5: Pos = (4, 2);
const I5: Pos = (4, 3);

/// Which corners have a diagonal edge through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Edges {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl Edges {
    fn detect(d: impl Fn(Pos, Pos) -> u32) -> Self {
        Edges {
            bottom_right: d(E, C) + d(E, G) + d(I, F4) + d(I, H5) + 4 * d(H, F)
                < d(H, D) + d(H, I5) + d(F, I4) + d(F, B) + 4 * d(E, I),
            bottom_left: d(A, E) + d(E, I) + d(D0, G) + d(G, H5) + 4 * d(D, H)
                < d(B, D) + d(F, H) + d(D, G0) + d(H, G5) + 4 * d(E, G),
            top_left: d(G, E) + d(E, C) + d(D0, A) + d(A, B1) + 4 * d(D, B)
                < d(H, D) + d(D, A0) + d(F, B) + d(B, A1) + 4 * d(E, A),
            top_right: d(A, E) + d(E, I) + d(B1, C) + d(C, F4) + 4 * d(B, F)
                < d(D, B) + d(B, C1) + d(H, F) + d(F, C4) + 4 * d(E, C),
        }
    }
}

/// xBR2x: 2x.
pub fn xbr2x<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square5, |window, x| {
        let grid = window.grid::<5>(x);
        let yuv = grid.map(|row| row.map(|p| Yuv::of(&p)));
        let px = |(r, c): Pos| grid[r][c];
        let d = |(r1, c1): Pos, (r2, c2): Pos| yuv[r1][c1].distance(yuv[r2][c2]);

        let edges = Edges::detect(d);
        let e = px(E);
        let (mut tl, mut tr, mut bl, mut br) = (e, e, e, e);

        if edges.top_right && !edges.top_left && d(B, D) > d(B, F) {
            tr = px(B);
        }
        if edges.bottom_left && !edges.bottom_right && d(H, D) > d(H, F) {
            bl = px(H);
        }
        if edges.top_left && !edges.bottom_left && d(D, B) > d(D, H) {
            tl = px(D);
        }
        if edges.bottom_right && !edges.top_right && d(F, B) > d(F, H) {
            br = px(F);
        }

        let all_differ = |ps: [Pos; 4]| ps.iter().all(|&p| px(p) != e);
        if edges.top_left && d(E, C) <= d(E, G) && all_differ([A, B, C, D]) {
            tl = three_one(&tl, &px(A));
        }
        if edges.top_right && d(E, G) <= d(E, C) && all_differ([B, C, A, F]) {
            tr = three_one(&tr, &px(C));
        }
        if edges.bottom_left && d(E, C) <= d(E, I) && all_differ([D, G, H, A]) {
            bl = three_one(&bl, &px(G));
        }
        if edges.bottom_right && d(E, A) <= d(E, I) && all_differ([F, H, I, C]) {
            br = three_one(&br, &px(I));
        }

        [[tl, tr], [bl, br]]
    });
}
