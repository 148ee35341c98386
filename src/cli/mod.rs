//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod list;
mod scale;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::registry::{Algorithm, Backend};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// pxscale - Pattern-aware pixel art upscaling
#[derive(Parser)]
#[command(name = "pxscale")]
#[command(about = "pxscale - Upscale pixel art with EPX, Scale2x, HQx, xBR, OmniScale and friends")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scale an image
    Scale {
        /// Input image (any format the image crate reads), or a quoted glob
        /// pattern such as "sprites/*.png"
        input: PathBuf,

        /// Output image; the format follows the extension. A directory when
        /// the input is a pattern.
        #[arg(short, long)]
        output: PathBuf,

        /// Scaling algorithm (default from pxscale.toml, else hq)
        #[arg(short, long, value_enum, ignore_case = true)]
        algorithm: Option<Algorithm>,

        /// Scale factor (default from pxscale.toml, else 2)
        #[arg(short, long, conflicts_with = "size")]
        factor: Option<f32>,

        /// Exact output size, e.g. "64x64". The factor is inferred from it.
        #[arg(long)]
        size: Option<String>,

        /// Backend to run on
        #[arg(long, value_enum, ignore_case = true)]
        backend: Option<Backend>,

        /// Config file (default: discover pxscale.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Run CPU kernels on a single thread
        #[arg(long)]
        sequential: bool,

        /// Source rows per parallel band
        #[arg(long)]
        band_rows: Option<u32>,
    },

    /// List algorithms and the scales each backend supports
    List {
        /// Only algorithms supporting this factor
        #[arg(long)]
        scale: Option<f32>,

        /// Only this backend
        #[arg(long, value_enum, ignore_case = true)]
        backend: Option<Backend>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of one algorithm
    Info {
        /// Algorithm identifier or display name (e.g. "hq", "ScaleSFX")
        algorithm: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse a `WxH` size such as `320x240`.
pub(crate) fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{}': expected WxH, e.g. 64x64", s))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid size '{}': '{}' is not a whole number", s, part))
    };
    Ok((parse(w)?, parse(h)?))
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scale {
            input,
            output,
            algorithm,
            factor,
            size,
            backend,
            config,
            sequential,
            band_rows,
        } => scale::run_scale(&scale::ScaleArgs {
            input,
            output,
            algorithm,
            factor,
            size,
            backend,
            config,
            sequential,
            band_rows,
        }),
        Commands::List { scale, backend, json } => list::run_list(scale, backend, json),
        Commands::Info { algorithm, json } => info::run_info(&algorithm, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64x32"), Ok((64, 32)));
        assert_eq!(parse_size(" 10X20 "), Ok((10, 20)));
        assert!(parse_size("64").is_err());
        assert!(parse_size("ax3").is_err());
        assert!(parse_size("-1x3").is_err());
    }

    #[test]
    fn test_scale_args_parse() {
        let cli = Cli::try_parse_from([
            "pxscale", "-vv", "scale", "in.png", "-o", "out.png", "-a", "SCALE-SFX", "-f", "3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Scale { algorithm, factor, size, .. } => {
                assert_eq!(algorithm, Some(Algorithm::ScaleSfx));
                assert_eq!(factor, Some(3.0));
                assert_eq!(size, None);
            }
            _ => panic!("expected scale command"),
        }
    }

    #[test]
    fn test_factor_and_size_conflict() {
        let result = Cli::try_parse_from([
            "pxscale", "scale", "in.png", "-o", "out.png", "-f", "2", "--size", "8x8",
        ]);
        assert!(result.is_err());
    }
}
