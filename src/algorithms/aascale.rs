//! Anti-aliased Scale2x.
//!
//! Runs the Scale2x rule, then blends every sub-pixel 1:1 with the center so
//! hard staircase steps become half-tone transitions. The 4x composition is
//! a plain Scale2x pass followed by this kernel.

use std::ops::Range;

use super::for_each_block;
use super::scale::scale2x_block;
use crate::blend::one_one;
use crate::surface::{SourceImage, TargetImage};
use crate::window::{RowWindow, WindowShape};

/// AAScale2x: 2x.
pub fn aascale2x<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    for_each_block(src, dst, rows, WindowShape::Square3, |window, x| {
        let w = window.neighbors3(x);
        let center = w[4];
        scale2x_block(&w).map(|row| row.map(|p| one_one(&p, &center)))
    });
}
