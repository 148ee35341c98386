//! EPX and Eagle, the two classic equality-rule 2x kernels.
//!
//! ```text
//!   w0 w1 w2        TL TR
//!   w3 w4 w5   ->
//!   w6 w7 w8        BL BR
//! ```
//!
//! Both only copy existing colors, so they never introduce new ones.

use std::ops::Range;

use super::for_each_block;
use crate::surface::{SourceImage, TargetImage};
use crate::window::{RowWindow, WindowShape};

/// Eric's Pixel Expansion.
///
/// A corner takes the color of its two adjacent edge neighbors when they
/// agree. When three or more of the six edge-neighbor pairs agree the area is
/// treated as uniform and the block is the center.
pub fn epx<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square3, |window, x| {
        let w = window.neighbors3(x);
        let (top, left, right, bottom, p) = (w[1], w[3], w[5], w[7], w[4]);

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
            return [[p; 2]; 2];
        }

        [
            [
                if left == top { top } else { p },
                if top == right { right } else { p },
            ],
            [
                if bottom == left { left } else { p },
                if right == bottom { bottom } else { p },
            ],
        ]
    });
}

/// Eagle: a corner takes the diagonal neighbor's color when that neighbor
/// and both edge neighbors next to it are the same color.
pub fn eagle<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square3, |window, x| {
        let w = window.neighbors3(x);
        let corner = |diag: usize, a: usize, b: usize| {
            if w[a] == w[diag] && w[diag] == w[b] {
                w[diag]
            } else {
                w[4]
            }
        };
        [
            [corner(0, 3, 1), corner(2, 1, 5)],
            [corner(6, 3, 7), corner(8, 5, 7)],
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

    #[test]
    fn test_solid_stays_solid() {
        for kernel in [Kernel::Epx, Kernel::Eagle] {
            let out = run_full(kernel, &solid(5, 3, Rgb([12, 34, 56])), 10, 6);
            assert!(out.pixels().all(|p| *p == Rgb([12, 34, 56])), "{:?}", kernel);
        }
    }

    #[test]
    fn test_checkerboard_keeps_only_source_colors() {
        let src = ImageBuffer::from_fn(2, 2, |x, y| if (x + y) % 2 == 0 { B } else { W });
        for kernel in [Kernel::Epx, Kernel::Eagle] {
            let out = run_full(kernel, &src, 4, 4);
            assert!(out.pixels().any(|p| *p == B));
            assert!(out.pixels().any(|p| *p == W));
            assert!(out.pixels().all(|p| *p == B || *p == W));
        }
    }

    #[test]
    fn test_epx_rounds_diagonal_corner() {
        // White center with black above and to the left.
        let src = ImageBuffer::from_fn(3, 3, |x, y| if x == 0 || y == 0 { B } else { W });
        let out = run_full(Kernel::Epx, &src, 6, 6);
        // Block for (1, 1): top and left agree on black, right and bottom on white.
        assert_eq!(out.get(2, 2), B);
        assert_eq!(out.get(3, 3), W);
    }

    #[test]
    fn test_eagle_needs_all_three() {
        let src = ImageBuffer::from_fn(3, 3, |x, y| if x == 0 || y == 0 { B } else { W });
        let out = run_full(Kernel::Eagle, &src, 6, 6);
        assert_eq!(out.get(2, 2), B);
        assert_eq!(out.get(3, 2), W);
    }

    #[test]
    fn test_mirror_consistency() {
        let src = sprite(7, 6);
        for kernel in [Kernel::Epx, Kernel::Eagle] {
            let a = run_full(kernel, &mirror_x(&src), 14, 12);
            let b = mirror_x(&run_full(kernel, &src, 14, 12));
            assert_eq!(a, b, "{:?}", kernel);
        }
    }
}
