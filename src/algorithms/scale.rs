//! AdvMAME Scale2x/Scale3x and the ScaleSFX refinement.
//!
//! Neighbors are named the AdvMAME way:
//!
//! ```text
//!   A B C
//!   D E F
//!   G H I
//! ```
//!
//! The SFX variants look one further ring out along the axes:
//!
//! ```text
//!       J
//!     A B C
//!   K D E F L
//!     G H I
//!       M
//! ```

use std::ops::Range;

use super::for_each_block;
use crate::blend::one_one;
use crate::pixel::Pixel;
use crate::surface::{SourceImage, TargetImage};
use crate::window::{RowWindow, WindowShape};

/// The Scale2x block for one 3x3 neighborhood.
#[inline]
pub(crate) fn scale2x_block<P: Pixel>(w: &[P; 9]) -> [[P; 2]; 2] {
    let [_, b, _, d, e, f, _, h, _] = *w;
    if b == h || d == f {
        return [[e; 2]; 2];
    }
    [
        [if d == b { d } else { e }, if b == f { f } else { e }],
        [if d == h { d } else { e }, if h == f { f } else { e }],
    ]
}

/// Scale2x: 2x.
pub fn scale2x<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square3, |window, x| {
        scale2x_block(&window.neighbors3(x))
    });
}

/// Scale3x: 3x.
pub fn scale3x<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square3, |window, x| {
        let [a, b, c, d, e, f, g, h, i] = window.neighbors3(x);
        if b == h || d == f {
            return [[e; 3]; 3];
        }
        let pick = |cond: bool, p| if cond { p } else { e };
        [
            [
                pick(d == b, d),
                pick((d == b && e != c) || (b == f && e != a), b),
                pick(b == f, f),
            ],
            [
                pick((d == b && e != g) || (d == h && e != a), d),
                e,
                pick((b == f && e != i) || (h == f && e != c), f),
            ],
            [
                pick(d == h, d),
                pick((d == h && e != i) || (h == f && e != g), h),
                pick(h == f, f),
            ],
        ]
    });
}

/// The 5x5 cross used by the SFX variants.
#[derive(Clone, Copy)]
struct Cross<P> {
    a: P,
    b: P,
    c: P,
    d: P,
    e: P,
    f: P,
    g: P,
    h: P,
    i: P,
    j: P,
    k: P,
    l: P,
    m: P,
}

impl<P: Pixel> Cross<P> {
    fn from_grid(g: &[[P; 5]; 5]) -> Self {
        Cross {
            a: g[1][1],
            b: g[1][2],
            c: g[1][3],
            d: g[2][1],
            e: g[2][2],
            f: g[2][3],
            g: g[3][1],
            h: g[3][2],
            i: g[3][3],
            j: g[0][2],
            k: g[2][0],
            l: g[2][4],
            m: g[4][2],
        }
    }

    /// The four corner conditions, top-left, top-right, bottom-left and
    /// bottom-right.
    fn corners(&self) -> [bool; 4] {
        let Cross { a, b, c, d, e, f, g, h, i, j, k, l, m } = *self;
        [
            b == d && b != f && d != h && (e != a || e == c || e == g || a == j || a == k),
            b == f && b != d && f != h && (e != c || e == a || e == i || c == j || c == l),
            d == h && b != d && f != h && (e != g || e == a || e == i || g == k || g == m),
            f == h && b != f && d != h && (e != i || e == c || e == g || i == l || i == m),
        ]
    }
}

/// Scale2xSFX: 2x over a 5x5 window.
pub fn scale2x_sfx<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square5, |window, x| {
        let n = Cross::from_grid(&window.grid::<5>(x));
        let [tl, tr, bl, br] = n.corners();
        let pick = |cond: bool, p| if cond { p } else { n.e };
        [[pick(tl, n.d), pick(tr, n.f)], [pick(bl, n.d), pick(br, n.f)]]
    });
}

/// Scale3xSFX: 3x over a 5x5 window. Corners may blend their two edge
/// neighbors 1:1.
pub fn scale3x_sfx<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square5, |window, x| {
        let n = Cross::from_grid(&window.grid::<5>(x));
        let Cross { a, b, c, d, e, f, g, h, i, j, k, l, m } = n;
        let [c0, c1, c2, c3] = n.corners();
        let pick = |cond: bool, p| if cond { p } else { e };

        let e0 = c0 || (b == d && c == e && c != j && a != e) || (b == d && e == g && a != e && g != k);
        let e2 = c1 || (b == f && a == e && a != j && c != e) || (b == f && e == i && c != e && i != l);
        let e6 = c2 || (d == h && a == e && a != k && e != g) || (d == h && e == i && e != g && i != m);
        let e8 = c3 || (f == h && c == e && c != l && e != i) || (f == h && e == g && e != i && g != m);

        [
            [
                if e0 { one_one(&b, &d) } else { e },
                pick((c0 && e != c) || (c1 && e != a), b),
                if e2 { one_one(&b, &f) } else { e },
            ],
            [
                pick((c0 && e != g) || (c2 && e != a), d),
                e,
                pick((c3 && e != c) || (c1 && e != i), f),
            ],
            [
                if e6 { one_one(&d, &h) } else { e },
                pick((c3 && e != g) || (c2 && e != i), h),
                if e8 { one_one(&f, &h) } else { e },
            ],
        ]
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::{mirror_x, run_full, solid, sprite};
    use crate::algorithms::Kernel;
    use image::{ImageBuffer, Rgb};

    const B: Rgb<u8> = Rgb([0, 0, 0]);
    const W: Rgb<u8> = Rgb([255, 255, 255]);

    const ALL: [Kernel; 4] = [Kernel::Scale2x, Kernel::Scale3x, Kernel::Scale2xSfx, Kernel::Scale3xSfx];

    fn factor(kernel: Kernel) -> u32 {
        kernel.block().unwrap_or(1)
    }

    #[test]
    fn test_solid_stays_solid() {
        let gray = Rgb([128, 128, 128]);
        for kernel in ALL {
            let n = factor(kernel);
            let out = run_full(kernel, &solid(8, 8, gray), 8 * n, 8 * n);
            assert!(out.pixels().all(|p| *p == gray), "{:?}", kernel);
        }
    }

    #[test]
    fn test_scale2x_diagonal_edge() {
        // Black upper-left triangle, white elsewhere.
        let src = ImageBuffer::from_fn(3, 3, |x, y| if x + y < 2 { B } else { W });
        let out = run_full(Kernel::Scale2x, &src, 6, 6);
        // Center (1,1) is white with black above and left: top-left quadrant turns black.
        assert_eq!(out.get(2, 2), B);
        assert_eq!(out.get(3, 2), W);
        assert_eq!(out.get(2, 3), W);
        assert_eq!(out.get(3, 3), W);
    }

    #[test]
    fn test_scale3x_center_is_source() {
        let src = sprite(5, 5);
        let out = run_full(Kernel::Scale3x, &src, 15, 15);
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(out.get(x * 3 + 1, y * 3 + 1), src.get(x, y));
            }
        }
    }

    #[test]
    fn test_scale2x_only_copies_source_colors() {
        let src = sprite(6, 6);
        let out = run_full(Kernel::Scale2x, &src, 12, 12);
        let colors: Vec<_> = src.pixels().collect();
        assert!(out.pixels().all(|p| colors.contains(&p)));
    }

    #[test]
    fn test_mirror_consistency() {
        let src = sprite(7, 6);
        for kernel in ALL {
            let n = factor(kernel);
            let a = run_full(kernel, &mirror_x(&src), 7 * n, 6 * n);
            let b = mirror_x(&run_full(kernel, &src, 7 * n, 6 * n));
            assert_eq!(a, b, "{:?}", kernel);
        }
    }
}
