//! CPU scaling kernels.
//!
//! Each kernel is a function `(source, destination, rows)` that fills the
//! given destination rows. Block kernels (every pattern algorithm) map one
//! source pixel to an N x N destination block and walk the source with a
//! [`NeighborhoodBuffer`]; resampling kernels (nearest, bilinear, trilinear,
//! OmniScale) compute each destination pixel from its own source position.
//!
//! Kernels never allocate or resize the destination. The caller sizes it and,
//! for block kernels, hands out row ranges aligned to the block height.
//!
//! # Kernels
//!
//! | kernel       | window | blend selection            |
//! |--------------|--------|----------------------------|
//! | EPX, Eagle   | 3x3    | equality rules             |
//! | Scale2x/3x   | 3x3    | equality rules             |
//! | Scale2x/3xSFX| 5x5    | equality rules             |
//! | Super2xSaI   | 4x4    | equality rules + voting    |
//! | HQ2x/HQ3x    | 3x3    | table by pattern code      |
//! | AAScale2x    | 3x3    | Scale2x + 1:1 center blend |
//! | xBR2x        | 5x5    | weighted YUV edge tests    |
//! | OmniScale    | 5x5    | procedural, flip-reuse     |

pub mod aascale;
pub mod bilinear;
pub mod epx;
pub mod hqx;
pub mod nearest;
pub mod omniscale;
pub mod sai;
pub mod scale;
pub mod xbr;

use std::ops::Range;

use crate::surface::{SourceImage, TargetImage};
use crate::window::{NeighborhoodBuffer, RowWindow, WindowShape};

/// A single CPU scaling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    Nearest,
    Bilinear,
    Trilinear,
    Epx,
    Eagle,
    Scale2x,
    Scale3x,
    Scale2xSfx,
    Scale3xSfx,
    Super2xSai,
    Hq2x,
    Hq3x,
    AaScale2x,
    Xbr2x,
    OmniScale,
}

impl Kernel {
    /// Destination block size for block kernels, `None` for resampling.
    pub fn block(self) -> Option<u32> {
        match self {
            Kernel::Nearest | Kernel::Bilinear | Kernel::Trilinear | Kernel::OmniScale => None,
            Kernel::Scale3x | Kernel::Scale3xSfx | Kernel::Hq3x => Some(3),
            _ => Some(2),
        }
    }

    /// Whether independent row bands may run this kernel concurrently.
    /// Trilinear builds whole-image mip levels, so it runs as one band.
    pub fn supports_bands(self) -> bool {
        !matches!(self, Kernel::Trilinear)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Nearest => "nearest",
            Kernel::Bilinear => "bilinear",
            Kernel::Trilinear => "trilinear",
            Kernel::Epx => "epx",
            Kernel::Eagle => "eagle",
            Kernel::Scale2x => "scale2x",
            Kernel::Scale3x => "scale3x",
            Kernel::Scale2xSfx => "scale2x-sfx",
            Kernel::Scale3xSfx => "scale3x-sfx",
            Kernel::Super2xSai => "super2xsai",
            Kernel::Hq2x => "hq2x",
            Kernel::Hq3x => "hq3x",
            Kernel::AaScale2x => "aascale2x",
            Kernel::Xbr2x => "xbr2x",
            Kernel::OmniScale => "omniscale",
        }
    }

    /// Fill destination rows `rows` of `dst` from `src`.
    pub fn run<S, T>(self, src: &S, dst: &mut T, rows: Range<u32>)
    where
        S: SourceImage,
        T: TargetImage<Pixel = S::Pixel>,
    {
        match self {
            Kernel::Nearest => nearest::nearest(src, dst, rows),
            Kernel::Bilinear => bilinear::bilinear(src, dst, rows),
            Kernel::Trilinear => bilinear::trilinear(src, dst, rows),
            Kernel::Epx => epx::epx(src, dst, rows),
            Kernel::Eagle => epx::eagle(src, dst, rows),
            Kernel::Scale2x => scale::scale2x(src, dst, rows),
            Kernel::Scale3x => scale::scale3x(src, dst, rows),
            Kernel::Scale2xSfx => scale::scale2x_sfx(src, dst, rows),
            Kernel::Scale3xSfx => scale::scale3x_sfx(src, dst, rows),
            Kernel::Super2xSai => sai::super2xsai(src, dst, rows),
            Kernel::Hq2x => hqx::hq2x(src, dst, rows),
            Kernel::Hq3x => hqx::hq3x(src, dst, rows),
            Kernel::AaScale2x => aascale::aascale2x(src, dst, rows),
            Kernel::Xbr2x => xbr::xbr2x(src, dst, rows),
            Kernel::OmniScale => omniscale::omniscale(src, dst, rows),
        }
    }
}

/// Drive a block kernel over the source rows behind destination `rows`.
///
/// `block` receives the window centered on the current source row and the
/// source column, and returns the N x N destination block `[row][col]`.
pub(crate) fn for_each_block<S, T, F, const N: usize>(
    src: &S,
    dst: &mut T,
    rows: Range<u32>,
    shape: WindowShape,
    mut block: F,
) where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
    F: FnMut(&NeighborhoodBuffer<S::Pixel>, u32) -> [[S::Pixel; N]; N],
{
    let n = N as u32;
    let src_rows = rows.start / n..rows.end.div_ceil(n).min(src.height());
    if src_rows.is_empty() || src.width() == 0 {
        return;
    }

    let mut window = NeighborhoodBuffer::at_row(shape, src, src_rows.start);
    for y in src_rows.clone() {
        if y > src_rows.start {
            window.advance(src);
        }
        for x in 0..src.width() {
            let cells = block(&window, x);
            for (dy, row) in cells.iter().enumerate() {
                for (dx, px) in row.iter().enumerate() {
                    dst.set(x * n + dx as u32, y * n + dy as u32, *px);
                }
            }
        }
    }
}
