//! pxscale - Command-line pixel art upscaler

use std::process::ExitCode;

use pixelscale::cli;

fn main() -> ExitCode {
    cli::run()
}
