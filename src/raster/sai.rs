//! Super2xSaI and AAScale programs.
//!
//! The right and bottom cells of a Super2xSaI block follow the same rule
//! with the neighborhood transposed, so only the right-cell rule is written
//! out. Offsets are relative to the current texel `A`:
//!
//! ```text
//!   I E F J
//!   G A B K
//!   H C D L
//!   M N O P
//! ```

use super::edge::scale2x_texel;
use super::{Fragment, Texture};
use crate::algorithms::sai::majority_match;
use crate::blend::{one_one, one_one_one_one};
use crate::pixel::Pixel;

/// The right-hand cell. Called with a transposed fetch it yields the bottom
/// cell.
fn side<P: Pixel>(t: &impl Fn(i64, i64) -> P) -> P {
    let (a, b, c, d) = (t(0, 0), t(1, 0), t(0, 1), t(1, 1));
    let (e, f, j) = (t(0, -1), t(1, -1), t(2, -1));
    let (h, i, l) = (t(-1, 1), t(-1, -1), t(2, 1));

    if a == d && b != c {
        if (a == e && b == l) || (a == c && a == f && b != e && b == j) {
            a
        } else {
            one_one(&a, &b)
        }
    } else if a != d && b == c {
        if (b == f && a == h) || (b == e && b == d && a != f && a == i) {
            b
        } else {
            one_one(&a, &b)
        }
    } else if a == d && b == c {
        one_one(&a, &b)
    } else if a == c && a == f && b != e && b == j {
        a
    } else if b == e && b == d && a != f && a == i {
        b
    } else {
        one_one(&a, &b)
    }
}

/// The diagonal cell.
fn corner<P: Pixel>(t: &impl Fn(i64, i64) -> P) -> P {
    let (a, b, c, d) = (t(0, 0), t(1, 0), t(0, 1), t(1, 1));
    if a == d && b != c {
        return a;
    }
    if a != d && b == c {
        return b;
    }
    if a != d {
        return one_one_one_one(&a, &b, &c, &d);
    }
    if a == b {
        return a;
    }
    let vote = majority_match(&b, &a, &t(-1, 0), &t(0, -1))
        + majority_match(&b, &a, &t(2, 0), &t(1, -1))
        + majority_match(&b, &a, &t(-1, 1), &t(0, 2))
        + majority_match(&b, &a, &t(2, 1), &t(1, 2));
    match vote.signum() {
        1 => a,
        -1 => b,
        _ => one_one_one_one(&a, &b, &c, &d),
    }
}

pub fn super2xsai<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (sx, sy, qx, qy) = frag.cell(2);
    let t = |dx: i64, dy: i64| tex.fetch(sx + dx, sy + dy);
    match (qx, qy) {
        (0, 0) => t(0, 0),
        (1, 0) => side(&t),
        (0, _) => side(&|dx: i64, dy: i64| t(dy, dx)),
        _ => corner(&t),
    }
}

pub fn aascale2x<X: Texture>(tex: &X, frag: Fragment) -> X::Pixel {
    let (sx, sy, qx, qy) = frag.cell(2);
    let center = tex.fetch(sx, sy);
    one_one(&scale2x_texel(tex, sx, sy, qx == 1, qy == 1), &center)
}

#[cfg(test)]
mod tests {
    use super::super::{render, Program};
    use crate::algorithms::test_support::{run_full, sprite};
    use crate::algorithms::Kernel;
    use crate::surface::Canvas;
    use image::{ImageBuffer, Rgb};

    fn raster(program: Program, src: &Canvas<Rgb<u8>>, n: u32) -> Canvas<Rgb<u8>> {
        let mut out = ImageBuffer::new(src.width() * n, src.height() * n);
        render(program, src, &mut out, false);
        out
    }

    #[test]
    fn test_super2xsai_matches_cpu() {
        let src = sprite(9, 8);
        assert_eq!(raster(Program::Super2xSai, &src, 2), run_full(Kernel::Super2xSai, &src, 18, 16));
    }

    #[test]
    fn test_thin_diagonal_crossing_matches_cpu() {
        let black = Rgb([0u8, 0, 0]);
        let white = Rgb([255u8, 255, 255]);
        let src = ImageBuffer::from_fn(6, 6, |x, y| if x == y || x + y == 5 { black } else { white });
        assert_eq!(raster(Program::Super2xSai, &src, 2), run_full(Kernel::Super2xSai, &src, 12, 12));
    }

    #[test]
    fn test_aascale_matches_cpu() {
        let src = sprite(7, 6);
        assert_eq!(raster(Program::AaScale2x, &src, 2), run_full(Kernel::AaScale2x, &src, 14, 12));

        let scaled = run_full(Kernel::Scale2x, &src, 14, 12);
        assert_eq!(raster(Program::AaScale4x, &src, 4), run_full(Kernel::AaScale2x, &scaled, 28, 24));
    }
}
