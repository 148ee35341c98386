//! Procedural blend resolution for OmniScale.
//!
//! Table kernels pick one blend per destination cell. OmniScale destination
//! pixels land anywhere inside a source pixel, so the blend is computed per
//! position instead: a rule list keyed on the 8-bit [`PatternCode`] chooses
//! a formula whose weights depend on where in the pixel the sample falls.
//!
//! Only the top-left quarter of a source pixel is described. Callers fold
//! the other quarters onto it with [`fold`], mirroring the neighborhood and
//! the in-pixel position together:
//!
//! ```text
//!   offset > 0.5  ──► offset = 1 - offset, step = -1
//! ```
//!
//! Diagonal rules feather their edge over one destination pixel
//! (`pixel_size`), so output stays smooth at any factor. The final diagonal
//! tiebreak needs seven more comparisons two pixels out, at
//! [`EXTENSION_OFFSETS`]; callers supply them lazily since few pixels get
//! that far. Both backends evaluate these rules; they differ only in how
//! they gather the neighborhood.

use crate::classify::{DifferenceClassifier, HqColorspace, PatternCode};
use crate::pixel::{Color, Pixel};

/// Far samples for the diagonal tiebreak, as `(dx, dy)` in folded units.
pub const EXTENSION_OFFSETS: [(i64, i64); 7] = [(-2, -2), (-1, -2), (0, -2), (1, -2), (-2, -1), (-2, 0), (-2, 1)];

/// Fold an in-pixel offset onto the top-left quarter: `(offset, step)`.
#[inline]
pub fn fold(offset: f32) -> (f32, i64) {
    if offset > 0.5 {
        (1.0 - offset, -1)
    } else {
        (offset, 1)
    }
}

/// Footprint of one destination pixel in source pixels.
pub fn pixel_size(scale_x: f32, scale_y: f32) -> f32 {
    ((1.0 / scale_x).powi(2) + (1.0 / scale_y).powi(2)).sqrt()
}

/// One quarter of a source pixel, already flipped onto the top-left.
pub struct Quarter<P: Pixel> {
    raw: [P; 9],
    w: [Color; 9],
    code: PatternCode,
    /// Position inside the pixel, both in `0.0..=0.5`.
    px: f32,
    py: f32,
    /// Destination pixel footprint in source units.
    pixel_size: f32,
}

impl<P: Pixel> Quarter<P> {
    /// `raw` is the flipped 3x3 neighborhood and `code` its pattern.
    pub fn new(raw: [P; 9], code: PatternCode, px: f32, py: f32, pixel_size: f32) -> Self {
        Quarter {
            raw,
            w: raw.map(|p| Color::of(&p)),
            code,
            px,
            py,
            pixel_size,
        }
    }

    #[inline]
    fn p(&self, mask: u8, value: u8) -> bool {
        self.code.matches(mask, value)
    }

    fn any(&self, patterns: &[(u8, u8)]) -> bool {
        patterns.iter().any(|&(m, v)| self.p(m, v))
    }

    #[inline]
    fn differ(&self, a: usize, b: usize) -> bool {
        HqColorspace.is_different(&self.raw[a], &self.raw[b])
    }

    /// Blend toward the shared corner of `w1`, `w0` and `w3`.
    fn corner_blend(&self) -> Color {
        let w = &self.w;
        if self.differ(0, 1) || self.differ(0, 3) {
            w[1].mix(w[3], self.py - self.px + 0.5)
        } else {
            let rounded = w[1] * 0.375 + w[0] * 0.25 + w[3] * 0.375;
            rounded.mix(w[3], self.py * 2.0).mix(w[1], self.px * 2.0)
        }
    }

    /// A shallow diagonal: `w4` beyond `dist > 1`, the corner blend before.
    fn shallow_diagonal(&self, dist: f32) -> Color {
        let size = self.pixel_size * 5f32.sqrt();
        if dist > 1.0 + size / 2.0 {
            return self.w[4];
        }
        let r = self.corner_blend();
        if dist < 1.0 - size / 2.0 {
            return r;
        }
        r.mix(self.w[4], (dist + size / 2.0 - 1.0) / size)
    }

    /// Shade the quarter. `extension` yields the seven far comparisons.
    pub fn shade(&self, extension: impl FnOnce() -> u8) -> Color {
        let w = &self.w;
        let (px, py) = (self.px, self.py);

        if self.any(&[(0xBF, 0x37), (0xDB, 0x13)]) && self.differ(1, 5) {
            return w[4].mix(w[3], 0.5 - px);
        }
        if self.any(&[(0xDB, 0x49), (0xEF, 0x6D)]) && self.differ(7, 3) {
            return w[4].mix(w[1], 0.5 - py);
        }
        if self.any(&[(0x0B, 0x0B), (0xFE, 0x4A), (0xFE, 0x1A)]) && self.differ(3, 1) {
            return w[4];
        }
        if self.any(&[
            (0x6F, 0x2A),
            (0x5B, 0x0A),
            (0xBF, 0x3A),
            (0xDF, 0x5A),
            (0x9F, 0x8A),
            (0xCF, 0x8A),
            (0xEF, 0x4E),
            (0x3F, 0x0E),
            (0xFB, 0x5A),
            (0xBB, 0x8A),
            (0x7F, 0x5A),
            (0xAF, 0x8A),
            (0xEB, 0x8A),
        ]) && self.differ(3, 1)
        {
            return w[4].mix(w[4].mix(w[0], 0.5 - px), 0.5 - py);
        }
        if self.p(0x0B, 0x08) {
            let top = w[0] * 0.375 + w[1] * 0.25 + w[4] * 0.375;
            return top.mix(w[4] * 0.5 + w[1] * 0.5, px * 2.0).mix(w[4], py * 2.0);
        }
        if self.p(0x0B, 0x02) {
            let left = w[0] * 0.375 + w[3] * 0.25 + w[4] * 0.375;
            return left.mix(w[4] * 0.5 + w[3] * 0.5, py * 2.0).mix(w[4], px * 2.0);
        }
        if self.p(0x2F, 0x2F) {
            let dist = ((px - 0.5).powi(2) + (py - 0.5).powi(2)).sqrt();
            let size = self.pixel_size;
            if dist < 0.5 - size / 2.0 {
                return w[4];
            }
            let r = self.corner_blend();
            if dist > 0.5 + size / 2.0 {
                return r;
            }
            return w[4].mix(r, (dist - 0.5 + size / 2.0) / size);
        }
        if self.any(&[(0xBF, 0x37), (0xDB, 0x13)]) {
            let dist = px - 2.0 * py;
            let size = self.pixel_size * 5f32.sqrt();
            if dist > size / 2.0 {
                return w[1];
            }
            let r = w[3].mix(w[4], px + 0.5);
            if dist < -size / 2.0 {
                return r;
            }
            return r.mix(w[1], (dist + size / 2.0) / size);
        }
        if self.any(&[(0xDB, 0x49), (0xEF, 0x6D)]) {
            let dist = py - 2.0 * px;
            let size = self.pixel_size * 5f32.sqrt();
            if dist > size / 2.0 {
                return w[3];
            }
            let r = w[1].mix(w[4], px + 0.5);
            if dist < -size / 2.0 {
                return r;
            }
            return r.mix(w[3], (dist + size / 2.0) / size);
        }
        if self.any(&[(0xBF, 0x8F), (0x7E, 0x0E)]) {
            return self.shallow_diagonal(px + 2.0 * py);
        }
        if self.any(&[(0x7E, 0x2A), (0xEF, 0xAB)]) {
            return self.shallow_diagonal(py + 2.0 * px);
        }
        if self.any(&[(0x1B, 0x03), (0x4F, 0x43), (0x8B, 0x83), (0x6B, 0x43)]) {
            return w[4].mix(w[3], 0.5 - px);
        }
        if self.any(&[(0x4B, 0x09), (0x8B, 0x89), (0x1F, 0x19), (0x3B, 0x19)]) {
            return w[4].mix(w[1], 0.5 - py);
        }
        if self.any(&[
            (0xFB, 0x6A),
            (0x6F, 0x6E),
            (0x3F, 0x3E),
            (0xFB, 0xFA),
            (0xDF, 0xDE),
            (0xDF, 0x1E),
        ]) {
            return w[4].mix(w[0], (1.0 - px - py) / 2.0);
        }

        let dist = px + py;
        let size = self.pixel_size;
        if self.any(&[
            (0x4F, 0x4B),
            (0x9F, 0x1B),
            (0x2F, 0x0B),
            (0xBE, 0x0A),
            (0xEE, 0x0A),
            (0x7E, 0x0A),
            (0xEB, 0x4B),
            (0x3B, 0x1B),
        ]) {
            if dist > 0.5 + size / 2.0 {
                return w[4];
            }
            let r = self.corner_blend();
            if dist < 0.5 - size / 2.0 {
                return r;
            }
            return r.mix(w[4], (dist + size / 2.0 - 0.5) / size);
        }
        if self.p(0x0B, 0x01) {
            return w[4]
                .mix(w[3], 0.5 - px)
                .mix(w[1].mix((w[1] + w[3]) * 0.5, 0.5 - px), 0.5 - py);
        }
        if self.p(0x0B, 0x00) {
            return w[4].mix(w[3], 0.5 - px).mix(w[1].mix(w[0], 0.5 - px), 0.5 - py);
        }

        if dist > 0.5 + size / 2.0 {
            return w[4];
        }
        // Settle the remaining diagonal by how much of the wider ring
        // differs from the center.
        let code = self.code.with_extension(extension());
        if code.0.count_ones() <= 7 {
            let r = w[1].mix(w[3], py - px + 0.5);
            if dist < 0.5 - size / 2.0 {
                return r;
            }
            return r.mix(w[4], (dist + size / 2.0 - 0.5) / size);
        }
        w[4]
    }
}
