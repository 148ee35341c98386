//! Integer blend vocabulary and table-driven blend resolution.
//!
//! Destination sub-pixels are always one of a handful of fixed-ratio
//! combinations of neighborhood pixels. Ratios are integer weights followed
//! by a right shift, so results are bit-reproducible on every platform:
//!
//! | ratio  | formula                  |
//! |--------|--------------------------|
//! | 1:1    | `(a + b) >> 1`           |
//! | 3:1    | `(3a + b) >> 2`          |
//! | 5:3    | `(5a + 3b) >> 3`         |
//! | 7:1    | `(7a + b) >> 3`          |
//! | 2:1:1  | `(2a + b + c) >> 2`      |
//! | 2:7:7  | `(2a + 7b + 7c) >> 4`    |
//! | 1:1:1:1| `(a + b + c + d) >> 2`   |
//!
//! A [`BlendInstruction`] names up to three grid positions and their
//! weights. A [`BlendTable`] maps every (pattern code, guard bits) pair to
//! one instruction per destination cell; codes the rule set does not cover
//! copy the center.

use crate::classify::{DifferenceClassifier, PatternCode, Symmetry};
use crate::pixel::Pixel;

/// Grid index of the center pixel.
pub const CENTER: u8 = 4;

#[inline]
fn weighted2<P: Pixel>(a: &P, wa: u32, b: &P, wb: u32, shift: u32) -> P {
    P::from_fn(|i| (a.channel(i) * wa + b.channel(i) * wb) >> shift)
}

#[inline]
fn weighted3<P: Pixel>(a: &P, wa: u32, b: &P, wb: u32, c: &P, wc: u32, shift: u32) -> P {
    P::from_fn(|i| (a.channel(i) * wa + b.channel(i) * wb + c.channel(i) * wc) >> shift)
}

/// `(a + b) / 2`
#[inline]
pub fn one_one<P: Pixel>(a: &P, b: &P) -> P {
    weighted2(a, 1, b, 1, 1)
}

/// `(3a + b) / 4`
#[inline]
pub fn three_one<P: Pixel>(a: &P, b: &P) -> P {
    weighted2(a, 3, b, 1, 2)
}

/// `(5a + 3b) / 8`
#[inline]
pub fn five_three<P: Pixel>(a: &P, b: &P) -> P {
    weighted2(a, 5, b, 3, 3)
}

/// `(7a + b) / 8`
#[inline]
pub fn seven_one<P: Pixel>(a: &P, b: &P) -> P {
    weighted2(a, 7, b, 1, 3)
}

/// `(2a + b + c) / 4`
#[inline]
pub fn two_one_one<P: Pixel>(a: &P, b: &P, c: &P) -> P {
    weighted3(a, 2, b, 1, c, 1, 2)
}

/// `(2a + 7b + 7c) / 16`
#[inline]
pub fn two_seven_seven<P: Pixel>(a: &P, b: &P, c: &P) -> P {
    weighted3(a, 2, b, 7, c, 7, 4)
}

/// `(a + b + c + d) / 4`
#[inline]
pub fn one_one_one_one<P: Pixel>(a: &P, b: &P, c: &P, d: &P) -> P {
    P::from_fn(|i| (a.channel(i) + b.channel(i) + c.channel(i) + d.channel(i)) >> 2)
}

/// Weighted combination of up to three grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendInstruction {
    taps: [u8; 3],
    weights: [u8; 3],
    shift: u8,
}

impl BlendInstruction {
    const fn new(taps: [u8; 3], weights: [u8; 3], shift: u8) -> Self {
        Self { taps, weights, shift }
    }

    pub const fn copy(a: u8) -> Self {
        Self::new([a, a, a], [1, 0, 0], 0)
    }

    pub const fn one_one(a: u8, b: u8) -> Self {
        Self::new([a, b, b], [1, 1, 0], 1)
    }

    pub const fn three_one(a: u8, b: u8) -> Self {
        Self::new([a, b, b], [3, 1, 0], 2)
    }

    pub const fn five_three(a: u8, b: u8) -> Self {
        Self::new([a, b, b], [5, 3, 0], 3)
    }

    pub const fn seven_one(a: u8, b: u8) -> Self {
        Self::new([a, b, b], [7, 1, 0], 3)
    }

    pub const fn two_one_one(a: u8, b: u8, c: u8) -> Self {
        Self::new([a, b, c], [2, 1, 1], 2)
    }

    pub const fn two_seven_seven(a: u8, b: u8, c: u8) -> Self {
        Self::new([a, b, c], [2, 7, 7], 4)
    }

    /// `(position, weight)` pairs with non-zero weight.
    pub fn taps(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.taps
            .iter()
            .zip(self.weights)
            .filter(|(_, w)| *w > 0)
            .map(|(&t, w)| (t as usize, u32::from(w)))
    }

    pub fn shift(&self) -> u32 {
        u32::from(self.shift)
    }

    /// Whether this instruction just copies the center.
    pub fn is_center_copy(&self) -> bool {
        self.taps().all(|(t, _)| t == CENTER as usize)
    }

    /// Evaluate against a neighborhood.
    #[inline]
    pub fn apply<P: Pixel>(&self, w: &[P]) -> P {
        let [a, b, c] = self.taps.map(usize::from);
        let [wa, wb, wc] = self.weights.map(u32::from);
        P::from_fn(|i| {
            (w[a].channel(i) * wa + w[b].channel(i) * wb + w[c].channel(i) * wc) >> self.shift
        })
    }

    /// The same instruction for a neighborhood viewed through `sym`.
    pub fn reflect(self, sym: Symmetry) -> Self {
        Self {
            taps: self.taps.map(|t| sym.map(t as usize) as u8),
            ..self
        }
    }
}

/// Edge-neighbor pairs that rules may test at run time.
const GUARD_PAIRS: [(u8, u8); 4] = [(1, 3), (1, 5), (3, 7), (5, 7)];

/// Results of comparing edge neighbors with each other.
///
/// Some rules depend not only on which neighbors differ from the center but
/// also on whether two edge neighbors differ from each other. Those four
/// comparisons travel alongside the pattern code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guards(u8);

impl Guards {
    pub const COUNT: usize = 16;

    pub fn from_bits(bits: u8) -> Self {
        Guards(bits & 0x0F)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Evaluate every guard pair on a neighborhood.
    pub fn compute<P: Pixel, C: DifferenceClassifier>(classifier: &C, w: &[P; 9]) -> Self {
        let mut bits = 0;
        for (i, &(a, b)) in GUARD_PAIRS.iter().enumerate() {
            if classifier.is_different(&w[a as usize], &w[b as usize]) {
                bits |= 1 << i;
            }
        }
        Guards(bits)
    }

    /// Whether positions `a` and `b` were found different. Pairs outside the
    /// guard set read as not different.
    pub fn differ(self, a: u8, b: u8) -> bool {
        let key = (a.min(b), a.max(b));
        GUARD_PAIRS
            .iter()
            .position(|&p| p == key)
            .is_some_and(|i| self.0 & (1 << i) != 0)
    }
}

/// One destination cell's program: a fixed blend, or a choice between two
/// blends on whether two edge neighbors differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRule {
    Always(BlendInstruction),
    IfDifferent {
        a: u8,
        b: u8,
        then: BlendInstruction,
        otherwise: BlendInstruction,
    },
}

impl CellRule {
    pub fn resolve(self, guards: Guards) -> BlendInstruction {
        match self {
            CellRule::Always(i) => i,
            CellRule::IfDifferent { a, b, then, otherwise } => {
                if guards.differ(a, b) {
                    then
                } else {
                    otherwise
                }
            }
        }
    }

    pub fn reflect(self, sym: Symmetry) -> Self {
        match self {
            CellRule::Always(i) => CellRule::Always(i.reflect(sym)),
            CellRule::IfDifferent { a, b, then, otherwise } => CellRule::IfDifferent {
                a: sym.map(a as usize) as u8,
                b: sym.map(b as usize) as u8,
                then: then.reflect(sym),
                otherwise: otherwise.reflect(sym),
            },
        }
    }
}

/// Lookup from (pattern code, guards) to the blends for all `N` cells.
pub struct BlendTable<const N: usize> {
    entries: Vec<[BlendInstruction; N]>,
    fallback: [BlendInstruction; N],
}

impl<const N: usize> BlendTable<N> {
    /// Evaluate `rule` for every 8-bit code and guard combination. Returning
    /// `None` leaves that entry as a center copy.
    pub fn build(rule: impl Fn(PatternCode, Guards) -> Option<[BlendInstruction; N]>) -> Self {
        let fallback = [BlendInstruction::copy(CENTER); N];
        let mut entries = Vec::with_capacity(256 * Guards::COUNT);
        for guards in 0..Guards::COUNT as u8 {
            for code in 0..=255u16 {
                let cells = rule(PatternCode(code), Guards::from_bits(guards));
                entries.push(cells.unwrap_or(fallback));
            }
        }
        Self { entries, fallback }
    }

    #[inline]
    pub fn resolve(&self, code: PatternCode, guards: Guards) -> &[BlendInstruction; N] {
        let index = usize::from(guards.bits()) << 8 | usize::from(code.low());
        self.entries.get(index).unwrap_or(&self.fallback)
    }
}
