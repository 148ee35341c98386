//! Raster backend
//!
//! A software model of a fragment pipeline. Each accelerated algorithm is a
//! fragment program: a function from one destination pixel to its color,
//! reading the source only through a clamp-to-edge [`Texture`]. Programs
//! keep no state between pixels, so rows render independently on the rayon
//! pool.
//!
//! ```text
//!   dst (x, y) ──► Fragment ──► program(texture, fragment) ──► pixel
//! ```
//!
//! The programs share the pixel, blend and classifier vocabulary with the
//! CPU kernels but none of their traversal code. Block programs reproduce
//! the CPU output exactly; OmniScale stays within one step per channel.
//!
//! 4x programs run their 2x program over a [`Scale2xView`], a texture whose
//! texels are themselves computed by the Scale2x program.

mod edge;
mod filter;
mod omniscale;
mod sai;

use rayon::prelude::*;

use crate::pixel::Pixel;
use crate::registry::Algorithm;
use crate::surface::{SourceImage, TargetImage};

/// Clamp-to-edge texel access.
pub trait Texture: Sync {
    type Pixel: Pixel;

    fn size(&self) -> (u32, u32);

    /// Texel at `(x, y)`, clamped into the texture.
    fn fetch(&self, x: i64, y: i64) -> Self::Pixel;
}

/// A source image bound as a texture.
pub struct SourceTexture<'a, S>(&'a S);

impl<'a, S: SourceImage + Sync> SourceTexture<'a, S> {
    pub fn new(src: &'a S) -> Self {
        SourceTexture(src)
    }
}

impl<S: SourceImage + Sync> Texture for SourceTexture<'_, S> {
    type Pixel = S::Pixel;

    fn size(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    #[inline]
    fn fetch(&self, x: i64, y: i64) -> S::Pixel {
        self.0.safe_access(x, y)
    }
}

/// A texture at twice the size of `inner`, each texel evaluated by the
/// Scale2x program on demand.
pub struct Scale2xView<X> {
    inner: X,
}

impl<X: Texture> Scale2xView<X> {
    pub fn new(inner: X) -> Self {
        Scale2xView { inner }
    }
}

impl<X: Texture> Texture for Scale2xView<X> {
    type Pixel = X::Pixel;

    fn size(&self) -> (u32, u32) {
        let (w, h) = self.inner.size();
        (w * 2, h * 2)
    }

    fn fetch(&self, x: i64, y: i64) -> X::Pixel {
        let (w, h) = self.size();
        let x = x.clamp(0, i64::from(w) - 1);
        let y = y.clamp(0, i64::from(h) - 1);
        edge::scale2x_texel(&self.inner, x / 2, y / 2, x % 2 == 1, y % 2 == 1)
    }
}

/// One destination pixel being shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub x: u32,
    pub y: u32,
    /// Destination size.
    pub width: u32,
    pub height: u32,
}

impl Fragment {
    /// Source pixel and cell within its `n` x `n` block.
    #[inline]
    pub fn cell(self, n: u32) -> (i64, i64, u32, u32) {
        (
            i64::from(self.x / n),
            i64::from(self.y / n),
            self.x % n,
            self.y % n,
        )
    }
}

/// A fragment program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    Nearest,
    Bilinear,
    Epx,
    Eagle,
    Scale2x,
    Scale3x,
    Scale4x,
    Scale2xSfx,
    Scale3xSfx,
    Super2xSai,
    AaScale2x,
    AaScale4x,
    OmniScale,
}

impl Program {
    /// The program that renders `algorithm` at `factor`, if any.
    pub fn select(algorithm: Algorithm, factor: f32) -> Option<Program> {
        let whole = (factor.fract() == 0.0).then_some(factor as u32);
        let program = match (algorithm, whole) {
            (Algorithm::Nearest, _) => Program::Nearest,
            (Algorithm::Bilinear, _) => Program::Bilinear,
            (Algorithm::OmniScale, _) => Program::OmniScale,
            (Algorithm::Epx, Some(2)) => Program::Epx,
            (Algorithm::Eagle, Some(2)) => Program::Eagle,
            (Algorithm::Super2xSai, Some(2)) => Program::Super2xSai,
            (Algorithm::Scale, Some(2)) => Program::Scale2x,
            (Algorithm::Scale, Some(3)) => Program::Scale3x,
            (Algorithm::Scale, Some(4)) => Program::Scale4x,
            (Algorithm::ScaleSfx, Some(2)) => Program::Scale2xSfx,
            (Algorithm::ScaleSfx, Some(3)) => Program::Scale3xSfx,
            (Algorithm::AaScale, Some(2)) => Program::AaScale2x,
            (Algorithm::AaScale, Some(4)) => Program::AaScale4x,
            _ => return None,
        };
        Some(program)
    }

    pub fn name(self) -> &'static str {
        match self {
            Program::Nearest => "nearest",
            Program::Bilinear => "bilinear",
            Program::Epx => "epx",
            Program::Eagle => "eagle",
            Program::Scale2x => "scale2x",
            Program::Scale3x => "scale3x",
            Program::Scale4x => "scale4x",
            Program::Scale2xSfx => "scale2x-sfx",
            Program::Scale3xSfx => "scale3x-sfx",
            Program::Super2xSai => "super2xsai",
            Program::AaScale2x => "aascale2x",
            Program::AaScale4x => "aascale4x",
            Program::OmniScale => "omniscale",
        }
    }
}

/// Render `program` over every pixel of `dst`.
pub fn render<S, T>(program: Program, src: &S, dst: &mut T, parallel: bool)
where
    S: SourceImage + Sync,
    T: TargetImage<Pixel = S::Pixel>,
{
    let tex = SourceTexture::new(src);
    match program {
        Program::Nearest => draw(&tex, dst, parallel, filter::nearest),
        Program::Bilinear => draw(&tex, dst, parallel, filter::bilinear),
        Program::Epx => draw(&tex, dst, parallel, edge::epx),
        Program::Eagle => draw(&tex, dst, parallel, edge::eagle),
        Program::Scale2x => draw(&tex, dst, parallel, edge::scale2x),
        Program::Scale3x => draw(&tex, dst, parallel, edge::scale3x),
        Program::Scale4x => draw(&Scale2xView::new(tex), dst, parallel, edge::scale2x),
        Program::Scale2xSfx => draw(&tex, dst, parallel, edge::scale2x_sfx),
        Program::Scale3xSfx => draw(&tex, dst, parallel, edge::scale3x_sfx),
        Program::Super2xSai => draw(&tex, dst, parallel, sai::super2xsai),
        Program::AaScale2x => draw(&tex, dst, parallel, sai::aascale2x),
        Program::AaScale4x => draw(&Scale2xView::new(tex), dst, parallel, sai::aascale2x),
        Program::OmniScale => draw(&tex, dst, parallel, omniscale::omniscale),
    }
}

fn draw<X, T>(tex: &X, dst: &mut T, parallel: bool, program: fn(&X, Fragment) -> X::Pixel)
where
    X: Texture,
    T: TargetImage<Pixel = X::Pixel>,
{
    let (width, height) = dst.dimensions();
    let shade_row = |y: u32| -> Vec<X::Pixel> {
        (0..width)
            .map(|x| program(tex, Fragment { x, y, width, height }))
            .collect()
    };
    let rows: Vec<Vec<X::Pixel>> = if parallel {
        (0..height).into_par_iter().map(shade_row).collect()
    } else {
        (0..height).map(shade_row).collect()
    };
    for (y, row) in rows.into_iter().enumerate() {
        for (x, px) in row.into_iter().enumerate() {
            dst.set(x as u32, y as u32, px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Canvas;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_every_accelerated_request_has_a_program() {
        for &algorithm in crate::registry::all_algorithms() {
            let support = crate::registry::supported_scales(algorithm, crate::registry::Backend::Raster);
            for &factor in support.scales() {
                assert!(Program::select(algorithm, factor).is_some(), "{} {}", algorithm, factor);
            }
        }
        assert_eq!(Program::select(Algorithm::OmniScale, 2.5), Some(Program::OmniScale));
        assert_eq!(Program::select(Algorithm::Hq, 2.0), None);
    }

    #[test]
    fn test_fragment_cell() {
        let f = Fragment { x: 7, y: 4, width: 9, height: 9 };
        assert_eq!(f.cell(3), (2, 1, 1, 1));
    }

    #[test]
    fn test_scale2x_view_clamps() {
        let src: Canvas<Rgb<u8>> = ImageBuffer::from_fn(2, 2, |x, y| Rgb([x as u8 * 100, y as u8 * 100, 0]));
        let view = Scale2xView::new(SourceTexture::new(&src));
        assert_eq!(view.size(), (4, 4));
        assert_eq!(view.fetch(-3, -3), view.fetch(0, 0));
        assert_eq!(view.fetch(9, 9), view.fetch(3, 3));
    }

    #[test]
    fn test_sequential_and_parallel_render_agree() {
        let src: Canvas<Rgb<u8>> =
            ImageBuffer::from_fn(7, 5, |x, y| if (x + 2 * y) % 3 == 0 { Rgb([0, 0, 0]) } else { Rgb([250, 240, 10]) });
        for program in [Program::Scale3x, Program::OmniScale, Program::Bilinear] {
            let mut a: Canvas<Rgb<u8>> = ImageBuffer::new(21, 15);
            let mut b: Canvas<Rgb<u8>> = ImageBuffer::new(21, 15);
            render(program, &src, &mut a, false);
            render(program, &src, &mut b, true);
            assert_eq!(a, b, "{:?}", program);
        }
    }
}
