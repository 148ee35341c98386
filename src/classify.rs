//! Perceptual difference classification and pattern codes.
//!
//! Every pattern-driven kernel starts the same way: compare each neighbor of
//! a 3x3 neighborhood against the center and fold the eight answers into a
//! [`PatternCode`].
//!
//! # Neighbor layout
//!
//! Neighborhoods are row-major with the center at index 4:
//!
//! ```text
//!   w0 w1 w2        bit0 bit1 bit2
//!   w3 w4 w5   ->   bit3  --  bit4
//!   w6 w7 w8        bit5 bit6 bit7
//! ```
//!
//! The layout is closed under horizontal, vertical and diagonal reflection,
//! so a code computed once can be re-read for a mirrored quadrant by
//! permuting bits ([`PatternCode::reflect`]).
//!
//! # Classifiers
//!
//! All classifiers project pixels to 8-bit RGB and compare luma and two
//! chroma axes against independent thresholds, luma being the most tolerant.
//! Identical pixels short-circuit to "not different". Every classifier is
//! reflexive and symmetric.

use crate::pixel::Pixel;

/// Grid index of each pattern bit.
pub const BIT_POSITIONS: [usize; 8] = [0, 1, 2, 3, 5, 6, 7, 8];

/// Fixed-point luma/chroma triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Yuv {
    pub y: i32,
    pub u: i32,
    pub v: i32,
}

impl Yuv {
    /// Convert 8-bit RGB using 16.16 fixed-point coefficients. U and V are
    /// biased by 128.
    #[inline]
    pub fn from_rgb([r, g, b]: [i32; 3]) -> Self {
        Yuv {
            y: (19595 * r + 38470 * g + 7471 * b) >> 16,
            u: ((-11076 * r - 21692 * g + 32768 * b) >> 16) + 128,
            v: ((32768 * r - 27460 * g - 5308 * b) >> 16) + 128,
        }
    }

    #[inline]
    pub fn of<P: Pixel>(pixel: &P) -> Self {
        Self::from_rgb(pixel.rgb8())
    }

    /// Weighted distance used for edge strength comparisons.
    #[inline]
    pub fn distance(self, other: Yuv) -> u32 {
        (self.y - other.y).unsigned_abs() * 48
            + (self.u - other.u).unsigned_abs() * 7
            + (self.v - other.v).unsigned_abs() * 6
    }
}

/// Per-axis tolerances for the YUV classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YuvThresholds {
    pub y: i32,
    pub u: i32,
    pub v: i32,
}

impl YuvThresholds {
    /// The classic HQ tolerances.
    pub const HQ: YuvThresholds = YuvThresholds { y: 0x30, u: 0x07, v: 0x06 };
}

impl Default for YuvThresholds {
    fn default() -> Self {
        Self::HQ
    }
}

/// Decides whether two pixels are perceptually different.
pub trait DifferenceClassifier: Copy + Send + Sync {
    fn is_different<P: Pixel>(&self, a: &P, b: &P) -> bool;

    /// Fold the eight center comparisons of a neighborhood into a code.
    #[inline]
    fn pattern<P: Pixel>(&self, w: &[P; 9]) -> PatternCode {
        let mut code = 0u16;
        for (bit, &pos) in BIT_POSITIONS.iter().enumerate() {
            if self.is_different(&w[4], &w[pos]) {
                code |= 1 << bit;
            }
        }
        PatternCode(code)
    }
}

/// Compares absolute YUV values of both pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YuvThreshold {
    pub thresholds: YuvThresholds,
}

impl DifferenceClassifier for YuvThreshold {
    #[inline]
    fn is_different<P: Pixel>(&self, a: &P, b: &P) -> bool {
        if a == b {
            return false;
        }
        let (ya, yb) = (Yuv::of(a), Yuv::of(b));
        (ya.y - yb.y).abs() > self.thresholds.y
            || (ya.u - yb.u).abs() > self.thresholds.u
            || (ya.v - yb.v).abs() > self.thresholds.v
    }
}

/// Converts the RGB delta instead of both pixels, with 8-bit coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YuvDelta {
    pub thresholds: YuvThresholds,
}

impl DifferenceClassifier for YuvDelta {
    #[inline]
    fn is_different<P: Pixel>(&self, a: &P, b: &P) -> bool {
        if a == b {
            return false;
        }
        let [ra, ga, ba] = a.rgb8();
        let [rb, gb, bb] = b.rgb8();
        let (dr, dg, db) = (ra - rb, ga - gb, ba - bb);
        // Magnitude before the shift keeps the test symmetric.
        let y = (77 * dr + 150 * dg + 29 * db).abs() >> 8;
        let u = (-43 * dr - 85 * dg + 128 * db).abs() >> 8;
        let v = (128 * dr - 107 * dg - 21 * db).abs() >> 8;
        y > self.thresholds.y || u > self.thresholds.u || v > self.thresholds.v
    }
}

/// The OmniScale colorspace test on `r+g+b`, `r-b` and `-r+2g-b`.
///
/// The float form divides the axes by 4, 4 and 8 and uses thresholds
/// 0.018, 0.002 and 0.005 on unit-range channels; this is the same test
/// scaled to integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HqColorspace;

impl DifferenceClassifier for HqColorspace {
    #[inline]
    fn is_different<P: Pixel>(&self, a: &P, b: &P) -> bool {
        if a == b {
            return false;
        }
        let [ra, ga, ba] = a.rgb8();
        let [rb, gb, bb] = b.rgb8();
        let (dr, dg, db) = (ra - rb, ga - gb, ba - bb);
        (dr + dg + db).abs() * 64 > 1179
            || (dr - db).abs() * 64 > 131
            || (-dr + 2 * dg - db).abs() * 32 > 328
    }
}

/// A permutation of the 3x3 grid: an element of the square's symmetry group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symmetry([u8; 9]);

impl Symmetry {
    pub const IDENTITY: Symmetry = Symmetry([0, 1, 2, 3, 4, 5, 6, 7, 8]);
    pub const FLIP_X: Symmetry = Symmetry([2, 1, 0, 5, 4, 3, 8, 7, 6]);
    pub const FLIP_Y: Symmetry = Symmetry([6, 7, 8, 3, 4, 5, 0, 1, 2]);
    pub const TRANSPOSE: Symmetry = Symmetry([0, 3, 6, 1, 4, 7, 2, 5, 8]);
    /// `FLIP_X` after `TRANSPOSE`: a quarter turn.
    pub const FLIP_X_TRANSPOSE: Symmetry = Symmetry([2, 5, 8, 1, 4, 7, 0, 3, 6]);
    /// `FLIP_X` after `FLIP_Y`.
    pub const ROTATE_180: Symmetry = Symmetry([8, 7, 6, 5, 4, 3, 2, 1, 0]);

    /// Image of grid position `index`.
    #[inline]
    pub fn map(self, index: usize) -> usize {
        self.0[index] as usize
    }

    /// `self` applied after `inner`.
    pub fn after(self, inner: Symmetry) -> Symmetry {
        Symmetry(std::array::from_fn(|k| self.0[inner.0[k] as usize]))
    }
}

/// Bitmask of neighbors that differ from the center.
///
/// Bits 0..8 follow [`BIT_POSITIONS`]. Extended-radius kernels store up to
/// seven more comparisons in bits 8..15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PatternCode(pub u16);

impl PatternCode {
    /// The eight neighbor bits.
    #[inline]
    pub fn low(self) -> u8 {
        self.0 as u8
    }

    /// `(code & mask) == value` on the neighbor bits.
    #[inline]
    pub fn matches(self, mask: u8, value: u8) -> bool {
        self.low() & mask == value
    }

    /// Whether grid position `index` differs from the center.
    #[inline]
    pub fn differs_at(self, index: usize) -> bool {
        BIT_POSITIONS
            .iter()
            .position(|&p| p == index)
            .is_some_and(|bit| self.0 & (1 << bit) != 0)
    }

    /// The code the same neighborhood has when viewed through `sym`:
    /// bit for position `k` of the result is the bit for `sym.map(k)`.
    pub fn reflect(self, sym: Symmetry) -> PatternCode {
        let mut out = self.0 & 0xFF00;
        for (bit, &pos) in BIT_POSITIONS.iter().enumerate() {
            if self.differs_at(sym.map(pos)) {
                out |= 1 << bit;
            }
        }
        PatternCode(out)
    }

    /// Attach extended comparisons in bits 8 and up.
    #[inline]
    pub fn with_extension(self, bits: u8) -> PatternCode {
        PatternCode((self.0 & 0x00FF) | (u16::from(bits & 0x7F) << 8))
    }

    /// The extended comparisons.
    #[inline]
    pub fn extension(self) -> u8 {
        (self.0 >> 8) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    fn sample_colors() -> Vec<Rgb<u8>> {
        let mut colors = Vec::new();
        for r in (0..=255).step_by(51) {
            for g in (0..=255).step_by(85) {
                for b in (0..=255).step_by(63) {
                    colors.push(Rgb([r as u8, g as u8, b as u8]));
                }
            }
        }
        colors.push(Rgb([100, 100, 100]));
        colors.push(Rgb([106, 100, 100]));
        colors.push(Rgb([100, 103, 97]));
        colors
    }

    fn assert_reflexive_symmetric<C: DifferenceClassifier>(c: C) {
        let colors = sample_colors();
        for a in &colors {
            assert!(!c.is_different(a, a));
            for b in &colors {
                assert_eq!(c.is_different(a, b), c.is_different(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_classifiers_are_reflexive_and_symmetric() {
        assert_reflexive_symmetric(YuvThreshold::default());
        assert_reflexive_symmetric(YuvDelta::default());
        assert_reflexive_symmetric(HqColorspace);
    }

    #[test]
    fn test_yuv_of_primaries() {
        assert_eq!(Yuv::from_rgb([0, 0, 0]), Yuv { y: 0, u: 128, v: 128 });
        assert_eq!(Yuv::from_rgb([255, 255, 255]), Yuv { y: 255, u: 128, v: 128 });
    }

    #[test]
    fn test_luma_tolerance_exceeds_chroma() {
        let c = YuvThreshold::default();
        // Small gray steps only move luma.
        assert!(!c.is_different(&Rgb([100u8, 100, 100]), &Rgb([140, 140, 140])));
        assert!(c.is_different(&Rgb([100u8, 100, 100]), &Rgb([160, 160, 160])));
        // A modest red shift moves V past its tolerance.
        assert!(c.is_different(&Rgb([100u8, 100, 100]), &Rgb([120, 100, 100])));
    }

    #[test]
    fn test_black_white_always_different() {
        let black = Rgba([0u8, 0, 0, 255]);
        let white = Rgba([255u8, 255, 255, 255]);
        assert!(YuvThreshold::default().is_different(&black, &white));
        assert!(YuvDelta::default().is_different(&black, &white));
        assert!(HqColorspace.is_different(&black, &white));
    }

    #[test]
    fn test_pattern_bits_follow_layout() {
        let o = Rgb([0u8, 0, 0]);
        let x = Rgb([255u8, 255, 255]);
        let w = [x, o, o, o, o, x, o, o, x];
        let code = YuvThreshold::default().pattern(&w);
        assert_eq!(code.low(), 0b1001_0001);
        assert!(code.differs_at(0));
        assert!(code.differs_at(5));
        assert!(code.differs_at(8));
        assert!(!code.differs_at(1));
    }

    #[test]
    fn test_reflect_flip_x_swaps_columns() {
        // Only the top-left neighbor differs.
        let code = PatternCode(0b0000_0001);
        assert_eq!(code.reflect(Symmetry::FLIP_X), PatternCode(0b0000_0100));
        assert_eq!(code.reflect(Symmetry::FLIP_Y), PatternCode(0b0010_0000));
        assert_eq!(code.reflect(Symmetry::FLIP_X.after(Symmetry::FLIP_Y)), PatternCode(0b1000_0000));
    }

    #[test]
    fn test_reflect_matches_reclassifying_mirrored_grid() {
        let c = YuvThreshold::default();
        let colors = sample_colors();
        let w: [Rgb<u8>; 9] = std::array::from_fn(|i| colors[(i * 7) % colors.len()]);
        for sym in [Symmetry::FLIP_X, Symmetry::FLIP_Y, Symmetry::TRANSPOSE] {
            let mirrored: [Rgb<u8>; 9] = std::array::from_fn(|k| w[sym.map(k)]);
            assert_eq!(c.pattern(&w).reflect(sym), c.pattern(&mirrored));
        }
    }

    #[test]
    fn test_extension_bits() {
        let code = PatternCode(0x00A5).with_extension(0x7F);
        assert_eq!(code.low(), 0xA5);
        assert_eq!(code.extension(), 0x7F);
        assert_eq!(code.reflect(Symmetry::FLIP_X).extension(), 0x7F);
    }

    #[test]
    fn test_symmetry_composition() {
        let fx_tr = Symmetry::FLIP_X.after(Symmetry::TRANSPOSE);
        assert_eq!(fx_tr.map(1), 5);
        assert_eq!(Symmetry::FLIP_X.after(Symmetry::FLIP_X), Symmetry::IDENTITY);
        assert_eq!(fx_tr, Symmetry::FLIP_X_TRANSPOSE);
        assert_eq!(Symmetry::FLIP_X.after(Symmetry::FLIP_Y), Symmetry::ROTATE_180);
    }
}
