//! HQ2x and HQ3x.
//!
//! Both kernels classify the 3x3 neighborhood into an 8-bit
//! [`PatternCode`], evaluate the four edge-pair guards and look the pair up
//! in a [`BlendTable`] built once per process:
//!
//! ```text
//!   neighbors3 ──► classifier.pattern ──┐
//!        │                              ├──► table.resolve ──► N x N blends
//!        └──────► Guards::compute ──────┘
//! ```
//!
//! HQ2x compares absolute YUV values ([`YuvThreshold`]); HQ3x converts the
//! RGB delta ([`YuvDelta`]). HQ 4x is two HQ2x passes, composed by the
//! dispatcher.

mod tables;

use std::ops::Range;
use std::sync::OnceLock;

use super::for_each_block;
use crate::blend::{BlendTable, Guards};
use crate::classify::{DifferenceClassifier, PatternCode, YuvDelta, YuvThreshold};
use crate::surface::{SourceImage, TargetImage};
use crate::window::{RowWindow, WindowShape};

/// The HQ2x lookup table.
pub fn hq2x_table() -> &'static BlendTable<4> {
    static TABLE: OnceLock<BlendTable<4>> = OnceLock::new();
    TABLE.get_or_init(|| BlendTable::build(|code, guards| Some(tables::hq2x_cells(code, guards))))
}

/// The HQ3x lookup table.
pub fn hq3x_table() -> &'static BlendTable<9> {
    static TABLE: OnceLock<BlendTable<9>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let rules: Vec<_> = (0..=255u16).map(|c| tables::hq3x_rules(PatternCode(c))).collect();
        BlendTable::build(|code, guards| {
            rules
                .get(usize::from(code.low()))
                .map(|cells| cells.map(|rule| rule.resolve(guards)))
        })
    })
}

fn run_table<S, T, C, const N: usize, const CELLS: usize>(
    src: &S,
    dst: &mut T,
    rows: Range<u32>,
    classifier: C,
    table: &BlendTable<CELLS>,
) where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
    C: DifferenceClassifier,
{
    for_each_block::<S, T, _, N>(src, dst, rows, WindowShape::Square3, |window, x| {
        let w = window.neighbors3(x);
        let cells = table.resolve(classifier.pattern(&w), Guards::compute(&classifier, &w));
        std::array::from_fn(|r| std::array::from_fn(|c| cells[r * N + c].apply(&w)))
    });
}

/// HQ2x: 2x.
pub fn hq2x<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    run_table::<_, _, _, 2, 4>(src, dst, rows, YuvThreshold::default(), hq2x_table());
}

/// HQ3x: 3x.
pub fn hq3x<S, T>(src: &S, dst: &mut T, rows: Range<u32>)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    run_table::<_, _, _, 3, 9>(src, dst, rows, YuvDelta::default(), hq3x_table());
}
