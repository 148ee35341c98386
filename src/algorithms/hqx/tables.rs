//! Compact rule descriptions the HQ lookup tables are generated from.
//!
//! HQ2x is written as the ordered condition lists of the rule set. HQ3x
//! stores only two cells: the top-left corner and the top edge. Every other
//! cell is the same program viewed through a reflection of the grid:
//!
//! ```text
//!   corner      edge        FLIP_X(corner)
//!   T(edge)     center      FLIP_X . T(edge)        T = transpose
//!   FLIP_Y(c)   FLIP_Y(e)   FLIP_X . FLIP_Y(corner)
//! ```

use crate::blend::{BlendInstruction as I, CellRule, Guards};
use crate::classify::{PatternCode, Symmetry};

const fn always(i: I) -> CellRule {
    CellRule::Always(i)
}

const fn when_differ(a: u8, b: u8, then: I, otherwise: I) -> CellRule {
    CellRule::IfDifferent { a, b, then, otherwise }
}

/// Distinct programs of the HQ3x top-left corner.
const CORNER_PROGRAMS: [CellRule; 12] = [
    always(I::three_one(4, 0)),
    always(I::three_one(4, 1)),
    always(I::three_one(4, 3)),
    always(I::two_one_one(4, 1, 3)),
    when_differ(1, 3, I::three_one(4, 0), I::one_one(1, 3)),
    when_differ(1, 3, I::three_one(4, 0), I::two_one_one(4, 1, 3)),
    when_differ(1, 3, I::three_one(4, 0), I::two_seven_seven(4, 1, 3)),
    when_differ(1, 3, I::copy(4), I::one_one(1, 3)),
    when_differ(1, 3, I::copy(4), I::two_one_one(4, 1, 3)),
    when_differ(1, 3, I::copy(4), I::two_seven_seven(4, 1, 3)),
    when_differ(1, 5, I::three_one(4, 3), I::two_one_one(4, 1, 3)),
    when_differ(3, 7, I::three_one(4, 1), I::two_one_one(4, 1, 3)),
];

/// Corner program index for every pattern code.
#[rustfmt::skip]
const CORNER_PROGRAM: [u8; 256] = [
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 6, 9, 0, 1, 4, 7,
    3, 3, 0, 10, 3, 3, 0, 10, 0, 1, 9, 9, 0, 1, 0, 9,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 4, 7, 0, 1, 5, 8,
    3, 3, 0, 10, 3, 3, 0, 10, 0, 1, 5, 9, 0, 1, 0, 8,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 11, 9, 9, 0, 11, 5, 9,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 5, 9, 0, 1, 5, 9,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 11, 0, 9, 0, 11, 0, 8,
    3, 3, 0, 2, 3, 3, 0, 10, 0, 1, 5, 9, 0, 11, 0, 8,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 6, 9, 0, 1, 4, 7,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 5, 9, 0, 1, 5, 9,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 4, 7, 0, 1, 5, 8,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 5, 7, 0, 1, 0, 8,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 5, 9, 0, 1, 5, 7,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 5, 9, 0, 1, 0, 9,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 5, 9, 0, 1, 0, 8,
    3, 3, 0, 2, 3, 3, 0, 2, 0, 1, 0, 9, 0, 1, 0, 8,
];

/// Distinct programs of the HQ3x top edge.
const EDGE_PROGRAMS: [CellRule; 8] = [
    always(I::three_one(4, 1)),
    always(I::copy(4)),
    when_differ(1, 3, I::copy(4), I::three_one(1, 4)),
    when_differ(1, 3, I::copy(4), I::three_one(4, 1)),
    when_differ(1, 3, I::copy(4), I::seven_one(4, 1)),
    when_differ(1, 5, I::copy(4), I::three_one(1, 4)),
    when_differ(1, 5, I::copy(4), I::three_one(4, 1)),
    when_differ(1, 5, I::copy(4), I::seven_one(4, 1)),
];

/// Edge program index for every pattern code.
#[rustfmt::skip]
const EDGE_PROGRAM: [u8; 256] = [
    0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 4, 4, 0, 0, 2, 2,
    0, 0, 7, 5, 0, 0, 7, 5, 0, 0, 1, 4, 0, 0, 7, 1,
    0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 3, 3, 0, 0, 1, 1,
    0, 0, 7, 5, 0, 0, 7, 5, 0, 0, 1, 4, 0, 0, 7, 1,
    0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 4, 4, 0, 0, 1, 4,
    0, 0, 7, 1, 0, 0, 7, 7, 0, 0, 1, 4, 0, 0, 7, 1,
    0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 4, 0, 0, 1, 1,
    0, 0, 1, 1, 0, 0, 7, 5, 0, 0, 1, 4, 0, 0, 7, 4,
    0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 4, 4, 0, 0, 2, 2,
    0, 0, 6, 1, 0, 0, 6, 1, 0, 0, 1, 4, 0, 0, 7, 1,
    0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 3, 3, 0, 0, 1, 1,
    0, 0, 6, 1, 0, 0, 6, 1, 0, 0, 1, 3, 0, 0, 6, 1,
    0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 4, 0, 0, 1, 2,
    0, 0, 1, 1, 0, 0, 7, 1, 0, 0, 1, 4, 0, 0, 7, 7,
    0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 4, 0, 0, 1, 1,
    0, 0, 1, 1, 0, 0, 7, 1, 0, 0, 1, 4, 0, 0, 7, 1,
];

#[derive(Clone, Copy)]
enum Base {
    Corner,
    Edge,
    Center,
}

/// Base program and viewing reflection of each HQ3x cell, row-major.
const HQ3X_CELLS: [(Base, Symmetry); 9] = [
    (Base::Corner, Symmetry::IDENTITY),
    (Base::Edge, Symmetry::IDENTITY),
    (Base::Corner, Symmetry::FLIP_X),
    (Base::Edge, Symmetry::TRANSPOSE),
    (Base::Center, Symmetry::IDENTITY),
    (Base::Edge, Symmetry::FLIP_X_TRANSPOSE),
    (Base::Corner, Symmetry::FLIP_Y),
    (Base::Edge, Symmetry::FLIP_Y),
    (Base::Corner, Symmetry::ROTATE_180),
];

/// The nine cell rules for one HQ3x pattern code.
///
/// A cell seen through `sym` looks up the base program with the code as the
/// base cell would see it, then maps the program's grid positions back.
pub(super) fn hq3x_rules(code: PatternCode) -> [CellRule; 9] {
    HQ3X_CELLS.map(|(base, sym)| {
        let local = code.reflect(sym).low() as usize;
        let rule = match base {
            Base::Corner => CORNER_PROGRAMS[CORNER_PROGRAM[local] as usize],
            Base::Edge => EDGE_PROGRAMS[EDGE_PROGRAM[local] as usize],
            Base::Center => return always(I::copy(4)),
        };
        rule.reflect(sym)
    })
}

/// The four HQ2x cells for one pattern code and guard set.
///
/// The rule set numbers neighbors starting at the top edge, so its masks
/// read the code rotated by one bit: bit 0 is `w1` and bit 7 is `w0`.
pub(super) fn hq2x_cells(code: PatternCode, guards: Guards) -> [I; 4] {
    let m = code.low().rotate_right(1);
    let p = |mask: u8, value: u8| m & mask == value;
    let any = |pairs: &[(u8, u8)]| pairs.iter().any(|&(mask, value)| p(mask, value));

    let right_top = guards.differ(1, 5);
    let bottom_left = guards.differ(3, 7);
    let left_top = guards.differ(1, 3);

    let c00 = any(&[(0xbf, 0x37), (0xdb, 0x13)]) && right_top;
    let c01 = any(&[(0xdb, 0x49), (0xef, 0x6d)]) && bottom_left;
    let c02 = any(&[
        (0x6f, 0x2a),
        (0x5b, 0x0a),
        (0xbf, 0x3a),
        (0xdf, 0x5a),
        (0x9f, 0x8a),
        (0xcf, 0x8a),
        (0xef, 0x4e),
        (0x3f, 0x0e),
        (0xfb, 0x5a),
        (0xbb, 0x8a),
        (0x7f, 0x5a),
        (0xaf, 0x8a),
        (0xeb, 0x8a),
    ]) && left_top;
    let c03 = any(&[(0xdb, 0x49), (0xef, 0x6d)]);
    let c04 = any(&[(0xbf, 0x37), (0xdb, 0x13)]);
    let c05 = any(&[(0x1b, 0x03), (0x4f, 0x43), (0x8b, 0x83), (0x6b, 0x43)]);
    let c06 = any(&[(0x4b, 0x09), (0x8b, 0x89), (0x1f, 0x19), (0x3b, 0x19)]);
    let c07 = any(&[
        (0x0b, 0x08),
        (0xf9, 0x68),
        (0xf3, 0x62),
        (0x6d, 0x6c),
        (0x67, 0x66),
        (0x3d, 0x3c),
        (0x37, 0x36),
        (0xf9, 0xf8),
        (0xdd, 0xdc),
        (0xf3, 0xf2),
        (0xd7, 0xd6),
        (0xdd, 0x1c),
        (0xd7, 0x16),
        (0x0b, 0x02),
    ]);
    let c08 = any(&[(0x0f, 0x0b), (0x2b, 0x0b), (0xfe, 0x4a), (0xfe, 0x1a)]) && left_top;
    let c09 = p(0x2f, 0x2f);
    let c10 = p(0x0a, 0x00);
    let c11 = p(0x0b, 0x09);
    let c12 = any(&[(0x7e, 0x2a), (0xef, 0xab)]);
    let c13 = any(&[(0xbf, 0x8f), (0x7e, 0x0e)]);
    let c14 = any(&[
        (0x4f, 0x4b),
        (0x9f, 0x1b),
        (0x2f, 0x0b),
        (0xbe, 0x0a),
        (0xee, 0x0a),
        (0x7e, 0x0a),
        (0xeb, 0x4b),
        (0x3b, 0x1b),
    ]);
    let c15 = p(0x0b, 0x03);

    let top_left = if c00 {
        I::five_three(4, 3)
    } else if c01 {
        I::five_three(4, 1)
    } else if any(&[(0x0b, 0x0b), (0xfe, 0x4a), (0xfe, 0x1a)]) && left_top {
        I::copy(4)
    } else if c02 {
        I::five_three(4, 0)
    } else if c03 {
        I::three_one(4, 3)
    } else if c04 {
        I::three_one(4, 1)
    } else if c05 {
        I::five_three(4, 3)
    } else if c06 {
        I::five_three(4, 1)
    } else if any(&[(0x0f, 0x0b), (0x5e, 0x0a), (0x2b, 0x0b), (0xbe, 0x0a), (0x7a, 0x0a), (0xee, 0x0a)]) {
        I::one_one(1, 3)
    } else if c07 {
        I::five_three(4, 0)
    } else {
        I::two_one_one(4, 1, 3)
    };

    let top_right = if c00 {
        I::seven_one(4, 5)
    } else if c01 {
        I::five_three(4, 2)
    } else if c08 {
        I::copy(4)
    } else if c02 {
        I::seven_one(4, 1)
    } else if c03 {
        I::five_three(4, 2)
    } else if c04 {
        I::three_one(4, 1)
    } else if c05 {
        I::seven_one(4, 1)
    } else if c06 {
        I::five_three(4, 1)
    } else if c09 {
        I::copy(4)
    } else if c10 {
        I::one_one(1, 5)
    } else if c11 {
        I::five_three(4, 2)
    } else if c07 {
        I::seven_one(4, 5)
    } else {
        I::two_one_one(4, 1, 5)
    };

    let bottom_left_cell = if c00 {
        I::five_three(4, 3)
    } else if c01 {
        I::seven_one(4, 7)
    } else if c08 {
        I::seven_one(4, 3)
    } else if c02 {
        I::copy(4)
    } else if c03 {
        I::three_one(4, 3)
    } else if c04 {
        I::five_three(4, 6)
    } else if c05 {
        I::five_three(4, 3)
    } else if c06 {
        I::seven_one(4, 3)
    } else if c12 {
        I::one_one(3, 7)
    } else if c13 {
        I::five_three(4, 6)
    } else if c14 {
        I::copy(4)
    } else if c07 {
        I::seven_one(4, 7)
    } else {
        I::two_one_one(4, 3, 7)
    };

    let bottom_right = if c00 {
        I::seven_one(4, 5)
    } else if c01 {
        I::five_three(4, 8)
    } else if c08 {
        I::seven_one(4, 5)
    } else if c02 {
        I::seven_one(4, 7)
    } else if c03 {
        I::five_three(4, 8)
    } else if c04 {
        I::three_one(4, 7)
    } else if c05 {
        I::seven_one(4, 7)
    } else if c06 {
        I::seven_one(4, 5)
    } else if c15 {
        I::copy(4)
    } else if any(&[
        (0xf7, 0xf6),
        (0x37, 0x36),
        (0x37, 0x16),
        (0xdb, 0xd2),
        (0xf3, 0xf2),
        (0xf9, 0xf8),
        (0x6d, 0x6c),
        (0xf3, 0xf0),
    ]) {
        I::five_three(4, 8)
    } else if any(&[
        (0xf7, 0xf7),
        (0xff, 0xff),
        (0xfc, 0xf4),
        (0xfb, 0xf3),
        (0xfb, 0xfb),
        (0xfd, 0xfd),
        (0xfe, 0xf6),
        (0xf7, 0xf3),
        (0xfd, 0xf5),
    ]) {
        I::one_one(5, 7)
    } else if c07 {
        I::five_three(4, 8)
    } else {
        I::two_one_one(4, 5, 7)
    };

    [top_left, top_right, bottom_left_cell, bottom_right]
}
