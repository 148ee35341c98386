//! Scale command implementation

use glob::glob;
use image::{DynamicImage, ImageBuffer};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::error::ScaleError;
use crate::pixel::Pixel;
use crate::registry::{recommend_backend, Algorithm, Backend};
use crate::scaler::Scaler;
use crate::surface::Canvas;

use super::{parse_size, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of `pxscale scale`
pub struct ScaleArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub algorithm: Option<Algorithm>,
    pub factor: Option<f32>,
    pub size: Option<String>,
    pub backend: Option<Backend>,
    pub config: Option<PathBuf>,
    pub sequential: bool,
    pub band_rows: Option<u32>,
}

/// How the destination is sized.
#[derive(Debug, Clone, Copy)]
enum Target {
    /// Fresh destination at `output_size(factor)`.
    Factor(f32),
    /// Preallocated destination; the factor is inferred.
    Size(u32, u32),
}

fn scale_canvas<P: Pixel>(
    scaler: &Scaler,
    src: &Canvas<P>,
    algorithm: Algorithm,
    target: Target,
) -> Result<Canvas<P>, ScaleError> {
    match target {
        Target::Factor(factor) => scaler.scale(src, algorithm, factor),
        Target::Size(width, height) => {
            let mut dst: Canvas<P> = ImageBuffer::new(width, height);
            scaler.scale_into(src, &mut dst, algorithm)?;
            Ok(dst)
        }
    }
}

/// Scale at native channel width for 8/16-bit RGB(A); everything else is
/// converted to 8-bit RGBA first.
fn scale_image(
    scaler: &Scaler,
    img: DynamicImage,
    algorithm: Algorithm,
    target: Target,
) -> Result<DynamicImage, ScaleError> {
    Ok(match img {
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(scale_canvas(scaler, &buf, algorithm, target)?),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(scale_canvas(scaler, &buf, algorithm, target)?),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(scale_canvas(scaler, &buf, algorithm, target)?),
        DynamicImage::ImageRgba16(buf) => {
            DynamicImage::ImageRgba16(scale_canvas(scaler, &buf, algorithm, target)?)
        }
        other => DynamicImage::ImageRgba8(scale_canvas(scaler, &other.to_rgba8(), algorithm, target)?),
    })
}

/// Execute the scale command
pub fn run_scale(args: &ScaleArgs) -> ExitCode {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if args.band_rows == Some(0) {
        eprintln!("Error: --band-rows must be at least 1");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    let overrides = CliOverrides {
        algorithm: args.algorithm,
        factor: args.factor,
        backend: args.backend,
        parallel: args.sequential.then_some(false),
        band_rows: args.band_rows,
    };
    merge_cli_overrides(&mut config, &overrides);

    let target = match args.size.as_deref().map(parse_size) {
        Some(Ok((width, height))) => Target::Size(width, height),
        Some(Err(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        None => Target::Factor(config.defaults.factor),
    };

    let jobs = match plan_jobs(&args.input, &args.output) {
        Ok(jobs) => jobs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let algorithm = config.defaults.algorithm;
    let scaler = config.scaler();
    let mut failed = false;
    for (input, output) in &jobs {
        if let Err(e) = scale_file(&scaler, algorithm, target, input, output) {
            eprintln!("Error: {}", e);
            failed = true;
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

/// Whether `input` is a glob pattern rather than a single file.
fn is_pattern(input: &Path) -> bool {
    input.to_string_lossy().contains(['*', '?', '['])
}

/// Pair every input with its output path. A glob pattern writes each match
/// into the output directory under its own file name.
fn plan_jobs(input: &Path, output: &Path) -> Result<Vec<(PathBuf, PathBuf)>, String> {
    if !is_pattern(input) {
        return Ok(vec![(input.to_path_buf(), output.to_path_buf())]);
    }

    let pattern = input.to_string_lossy();
    let paths = glob(&pattern).map_err(|e| format!("invalid pattern '{}': {}", pattern, e))?;
    let inputs: Vec<PathBuf> = paths.filter_map(Result::ok).filter(|p| p.is_file()).collect();
    if inputs.is_empty() {
        return Err(format!("no files match '{}'", pattern));
    }

    fs::create_dir_all(output).map_err(|e| format!("Failed to create '{}': {}", output.display(), e))?;
    Ok(inputs
        .into_iter()
        .filter_map(|p| {
            let name = p.file_name()?.to_owned();
            Some((p, output.join(name)))
        })
        .collect())
}

/// Load, scale and save one image.
fn scale_file(scaler: &Scaler, algorithm: Algorithm, target: Target, input: &Path, output: &Path) -> Result<(), String> {
    let img = image::open(input).map_err(|e| format!("Failed to read '{}': {}", input.display(), e))?;

    if let Target::Factor(factor) = target {
        debug!(
            recommended = %recommend_backend(algorithm, factor, img.width(), img.height()),
            backend = %scaler.backend(),
            "backend choice"
        );
    }

    let (width, height) = (img.width(), img.height());
    let start = Instant::now();
    let scaled = scale_image(scaler, img, algorithm, target).map_err(|e| format!("{}: {}", input.display(), e))?;
    info!(
        algorithm = %algorithm,
        input = %format!("{}x{}", width, height),
        output = %format!("{}x{}", scaled.width(), scaled.height()),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "scaled"
    );

    scaled
        .save(output)
        .map_err(|e| format!("Failed to write '{}': {}", output.display(), e))?;

    println!(
        "{} -> {} ({}x{} -> {}x{}, {})",
        input.display(),
        output.display(),
        width,
        height,
        scaled.width(),
        scaled.height(),
        algorithm.name()
    );
    Ok(())
}
