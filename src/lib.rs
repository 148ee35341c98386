//! Pixelscale - pattern-classifying pixel art upscaler
//!
//! This library provides:
//! - Sliding-window neighborhoods and YUV difference classification
//! - Table and procedural blend resolution over 8-bit pattern codes
//! - EPX, Eagle, Scale2x/3x/4x, ScaleSFX, Super2xSaI, HQ2x/3x/4x, AAScale,
//!   xBR, OmniScale and plain resampling kernels
//! - A capability registry and a validating dispatcher over a CPU backend
//!   and a parallel raster backend
//!
//! ```no_run
//! use pixelscale::{scale, Algorithm};
//!
//! let src = image::open("sprite.png").unwrap().to_rgba8();
//! let big = scale(&src, Algorithm::Hq, 3.0).unwrap();
//! assert_eq!(big.dimensions(), (src.width() * 3, src.height() * 3));
//! ```

pub mod algorithms;
pub mod blend;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod pixel;
pub mod procedural;
pub mod raster;
pub mod registry;
pub mod scaler;
pub mod surface;
pub mod window;

pub use error::ScaleError;
pub use pixel::{Color, Pixel};
pub use registry::{
    algorithms_for_scale, all_algorithms, capabilities, is_scale_supported, output_size, recommend_backend,
    supported_scales, Algorithm, AlgorithmDescriptor, Backend, Recommendation, ScaleSupport,
};
pub use scaler::{scale, scale_into, Scaler};
pub use surface::{Canvas, ImageSurface, SourceImage, TargetImage};
