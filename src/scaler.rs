//! The dispatcher
//!
//! [`Scaler`] is the only entry point callers need. Every call walks the
//! same path:
//!
//! ```text
//!   request ──► validate factor ──► size check ──► plan ──► run passes
//!                (registry)          (preallocated only)
//! ```
//!
//! and either writes the whole destination or returns a [`ScaleError`]
//! without touching it.
//!
//! A plan is the list of kernel passes an (algorithm, factor) pair needs on
//! the CPU backend. Factors an algorithm has no native kernel for are
//! compositions: `4x` is two `2x` passes, xBR `3x` is `2x` followed by a
//! nearest resample to exactly three times the source. Intermediate images
//! are owned by the call. The raster backend renders one fragment program
//! per request instead.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::algorithms::Kernel;
use crate::error::ScaleError;
use crate::pixel::Pixel;
use crate::raster::{self, Program};
use crate::registry::{self, Algorithm, Backend};
use crate::surface::{BandTarget, Canvas, SourceImage, TargetImage};

/// Largest disagreement between inferred horizontal and vertical factors.
pub const UNIFORM_TOLERANCE: f32 = 0.01;

/// Default number of source rows per parallel band.
pub const DEFAULT_BAND_ROWS: u32 = 32;

/// Validates requests against the registry and routes them to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scaler {
    backend: Backend,
    parallel: bool,
    band_rows: u32,
}

impl Default for Scaler {
    fn default() -> Self {
        Self {
            backend: Backend::Cpu,
            parallel: true,
            band_rows: DEFAULT_BAND_ROWS,
        }
    }
}

impl Scaler {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Run block kernels on independent row bands concurrently.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Source rows per band. Clamped to at least one.
    pub fn with_band_rows(mut self, rows: u32) -> Self {
        self.band_rows = rows.max(1);
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn band_rows(&self) -> u32 {
        self.band_rows
    }

    /// Check `factor` against the registry for the active backend.
    pub fn validate(&self, algorithm: Algorithm, factor: f32) -> Result<(), ScaleError> {
        let supported = registry::supported_scales(algorithm, self.backend);
        if supported.contains(factor) {
            debug!(%algorithm, factor, backend = %self.backend, "scale accepted");
            Ok(())
        } else {
            debug!(%algorithm, factor, backend = %self.backend, "scale rejected");
            Err(ScaleError::UnsupportedScale {
                algorithm,
                backend: self.backend,
                requested: factor,
                supported,
            })
        }
    }

    /// Scale into a fresh destination of `floor(size * factor)`.
    pub fn scale<S>(&self, src: &S, algorithm: Algorithm, factor: f32) -> Result<Canvas<S::Pixel>, ScaleError>
    where
        S: SourceImage + Sync,
    {
        self.validate(algorithm, factor)?;
        let (w, h) = registry::output_size(algorithm, src.width(), src.height(), factor);
        let mut dst = Canvas::new(w, h);
        if src.width() == 0 || src.height() == 0 {
            return Ok(dst);
        }

        match self.backend {
            Backend::Cpu => {
                let plan = cpu_plan(algorithm, factor)?;
                let (last, init) = split_plan(algorithm, factor, &plan)?;
                if init.is_empty() {
                    self.fill_canvas(last, src, &mut dst);
                } else {
                    let mid = self.intermediate(algorithm, factor, src, init)?;
                    self.fill_canvas(last, &mid, &mut dst);
                }
            }
            Backend::Raster => {
                let program = raster_program(algorithm, factor)?;
                self.render(program, src, &mut dst);
            }
        }
        Ok(dst)
    }

    /// Scale into a preallocated destination, inferring the factor from
    /// its size.
    pub fn scale_into<S, T>(&self, src: &S, dst: &mut T, algorithm: Algorithm) -> Result<(), ScaleError>
    where
        S: SourceImage + Sync,
        T: TargetImage<Pixel = S::Pixel>,
    {
        if src.width() == 0 || src.height() == 0 {
            return empty_source(algorithm, src, dst);
        }
        let factor = infer_scale(src.dimensions(), dst.dimensions())?;
        self.scale_into_at(src, dst, algorithm, factor)
    }

    /// Scale into a preallocated destination at an explicit factor. The
    /// destination must have exactly the size the algorithm produces.
    pub fn scale_into_at<S, T>(&self, src: &S, dst: &mut T, algorithm: Algorithm, factor: f32) -> Result<(), ScaleError>
    where
        S: SourceImage + Sync,
        T: TargetImage<Pixel = S::Pixel>,
    {
        self.validate(algorithm, factor)?;
        let expected = registry::output_size(algorithm, src.width(), src.height(), factor);
        if dst.dimensions() != expected {
            debug!(%algorithm, factor, ?expected, actual = ?dst.dimensions(), "destination size rejected");
            return Err(ScaleError::DimensionMismatch {
                algorithm,
                input: src.dimensions(),
                output: dst.dimensions(),
                expected,
            });
        }
        if src.width() == 0 || src.height() == 0 {
            return Ok(());
        }

        match self.backend {
            Backend::Cpu => {
                let plan = cpu_plan(algorithm, factor)?;
                let (last, init) = split_plan(algorithm, factor, &plan)?;
                if init.is_empty() {
                    run_pass(last, src, dst);
                } else {
                    let mid = self.intermediate(algorithm, factor, src, init)?;
                    run_pass(last, &mid, dst);
                }
            }
            Backend::Raster => {
                let program = raster_program(algorithm, factor)?;
                self.render(program, src, dst);
            }
        }
        Ok(())
    }

    /// Run all but the last pass of a plan, each into a fresh canvas.
    fn intermediate<S>(
        &self,
        algorithm: Algorithm,
        factor: f32,
        src: &S,
        passes: &[Kernel],
    ) -> Result<Canvas<S::Pixel>, ScaleError>
    where
        S: SourceImage + Sync,
    {
        let mut current: Option<Canvas<S::Pixel>> = None;
        for &kernel in passes {
            let block = kernel
                .block()
                .ok_or(ScaleError::InvalidAlgorithmForScale { algorithm, factor })?;
            let next = match &current {
                Some(img) => self.pass_to_canvas(kernel, img, block),
                None => self.pass_to_canvas(kernel, src, block),
            };
            current = Some(next);
        }
        current.ok_or(ScaleError::InvalidAlgorithmForScale { algorithm, factor })
    }

    fn pass_to_canvas<S>(&self, kernel: Kernel, src: &S, block: u32) -> Canvas<S::Pixel>
    where
        S: SourceImage + Sync,
    {
        let mut out = Canvas::new(src.width() * block, src.height() * block);
        self.fill_canvas(kernel, src, &mut out);
        out
    }

    /// Run one kernel over a whole canvas, split into row bands when
    /// parallelism is on and the kernel allows it.
    fn fill_canvas<S>(&self, kernel: Kernel, src: &S, dst: &mut Canvas<S::Pixel>)
    where
        S: SourceImage + Sync,
    {
        let (width, height) = dst.dimensions();
        let band = (self.band_rows * kernel.block().unwrap_or(1)) as usize;
        let stride = width as usize * <S::Pixel as Pixel>::CHANNELS;
        if !self.parallel || !kernel.supports_bands() || stride == 0 || height as usize <= band {
            run_pass(kernel, src, dst);
            return;
        }

        let start = Instant::now();
        dst.par_chunks_mut(stride * band).enumerate().for_each(|(i, chunk)| {
            let mut target = BandTarget::<S::Pixel>::new(chunk, width, height, (i * band) as u32);
            let rows = target.rows();
            trace!(kernel = kernel.name(), band = i, ?rows, "band");
            kernel.run(src, &mut target, rows);
        });
        debug!(
            kernel = kernel.name(),
            input = ?src.dimensions(),
            output = ?(width, height),
            bands = (height as usize).div_ceil(band),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "pass"
        );
    }

    fn render<S, T>(&self, program: Program, src: &S, dst: &mut T)
    where
        S: SourceImage + Sync,
        T: TargetImage<Pixel = S::Pixel>,
    {
        let start = Instant::now();
        raster::render(program, src, dst, self.parallel);
        debug!(
            program = program.name(),
            input = ?src.dimensions(),
            output = ?dst.dimensions(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "raster pass"
        );
    }
}

/// Run one kernel over every destination row on the calling thread.
fn run_pass<S, T>(kernel: Kernel, src: &S, dst: &mut T)
where
    S: SourceImage,
    T: TargetImage<Pixel = S::Pixel>,
{
    let start = Instant::now();
    kernel.run(src, dst, 0..dst.height());
    debug!(
        kernel = kernel.name(),
        input = ?src.dimensions(),
        output = ?dst.dimensions(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "pass"
    );
}

/// A zero-sized source only maps onto a zero-sized destination.
fn empty_source<S, T>(algorithm: Algorithm, src: &S, dst: &T) -> Result<(), ScaleError>
where
    S: SourceImage,
    T: TargetImage,
{
    if dst.width() == 0 && dst.height() == 0 {
        Ok(())
    } else {
        Err(ScaleError::DimensionMismatch {
            algorithm,
            input: src.dimensions(),
            output: dst.dimensions(),
            expected: (0, 0),
        })
    }
}

/// Factor implied by a source and destination size.
pub fn infer_scale(input: (u32, u32), output: (u32, u32)) -> Result<f32, ScaleError> {
    let scale_x = output.0 as f32 / input.0 as f32;
    let scale_y = output.1 as f32 / input.1 as f32;
    if (scale_x - scale_y).abs() > UNIFORM_TOLERANCE {
        debug!(scale_x, scale_y, "non-uniform destination");
        return Err(ScaleError::NonUniformScale { scale_x, scale_y });
    }
    Ok(scale_x)
}

/// CPU kernel passes for `algorithm` at `factor`.
pub fn cpu_plan(algorithm: Algorithm, factor: f32) -> Result<Vec<Kernel>, ScaleError> {
    use Kernel as K;

    let whole = (factor.fract() == 0.0).then_some(factor as u32);
    let plan = match (algorithm, whole) {
        (Algorithm::Nearest, _) => vec![K::Nearest],
        (Algorithm::Bilinear, _) => vec![K::Bilinear],
        (Algorithm::Trilinear, _) => vec![K::Trilinear],
        (Algorithm::OmniScale, _) => vec![K::OmniScale],
        (Algorithm::Epx, Some(2)) => vec![K::Epx],
        (Algorithm::Eagle, Some(2)) => vec![K::Eagle],
        (Algorithm::Super2xSai, Some(2)) => vec![K::Super2xSai],
        (Algorithm::Scale, Some(2)) => vec![K::Scale2x],
        (Algorithm::Scale, Some(3)) => vec![K::Scale3x],
        (Algorithm::Scale, Some(4)) => vec![K::Scale2x, K::Scale2x],
        (Algorithm::ScaleSfx, Some(2)) => vec![K::Scale2xSfx],
        (Algorithm::ScaleSfx, Some(3)) => vec![K::Scale3xSfx],
        (Algorithm::Hq, Some(2)) => vec![K::Hq2x],
        (Algorithm::Hq, Some(3)) => vec![K::Hq3x],
        (Algorithm::Hq, Some(4)) => vec![K::Hq2x, K::Hq2x],
        (Algorithm::AaScale, Some(2)) => vec![K::AaScale2x],
        (Algorithm::AaScale, Some(4)) => vec![K::Scale2x, K::AaScale2x],
        (Algorithm::Xbr, Some(2)) => vec![K::Xbr2x],
        (Algorithm::Xbr, Some(3)) => vec![K::Xbr2x, K::Nearest],
        (Algorithm::Xbr, Some(4)) => vec![K::Xbr2x, K::Xbr2x],
        _ => return Err(ScaleError::InvalidAlgorithmForScale { algorithm, factor }),
    };
    Ok(plan)
}

fn split_plan(algorithm: Algorithm, factor: f32, plan: &[Kernel]) -> Result<(Kernel, &[Kernel]), ScaleError> {
    plan.split_last()
        .map(|(last, init)| (*last, init))
        .ok_or(ScaleError::InvalidAlgorithmForScale { algorithm, factor })
}

fn raster_program(algorithm: Algorithm, factor: f32) -> Result<Program, ScaleError> {
    Program::select(algorithm, factor).ok_or(ScaleError::InvalidAlgorithmForScale { algorithm, factor })
}

/// [`Scaler::scale`] on the default CPU scaler.
pub fn scale<S>(src: &S, algorithm: Algorithm, factor: f32) -> Result<Canvas<S::Pixel>, ScaleError>
where
    S: SourceImage + Sync,
{
    Scaler::default().scale(src, algorithm, factor)
}

/// [`Scaler::scale_into`] on the default CPU scaler.
pub fn scale_into<S, T>(src: &S, dst: &mut T, algorithm: Algorithm) -> Result<(), ScaleError>
where
    S: SourceImage + Sync,
    T: TargetImage<Pixel = S::Pixel>,
{
    Scaler::default().scale_into(src, dst, algorithm)
}
