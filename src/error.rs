//! Dispatch errors
//!
//! Every variant is a static mismatch between a request and what the
//! registry allows, so nothing here is worth retrying. Validation runs to
//! completion before any kernel touches the destination.

use thiserror::Error;

use crate::registry::{Algorithm, Backend, ScaleSupport};

/// Why a `scale` call was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ScaleError {
    /// The requested or inferred factor is outside the algorithm's support
    /// on the active backend.
    #[error("{} algorithm doesn't support {requested}x scaling. {}", algorithm.name(), describe_support(*supported, *backend))]
    UnsupportedScale {
        algorithm: Algorithm,
        backend: Backend,
        requested: f32,
        supported: ScaleSupport,
    },

    /// A preallocated destination does not have the size the algorithm
    /// produces at the inferred factor.
    #[error(
        "Output dimensions mismatch: input {}x{}, output {}x{}, expected {}x{}",
        input.0, input.1, output.0, output.1, expected.0, expected.1
    )]
    DimensionMismatch {
        algorithm: Algorithm,
        input: (u32, u32),
        output: (u32, u32),
        expected: (u32, u32),
    },

    /// Horizontal and vertical factors inferred from a preallocated
    /// destination disagree.
    #[error("Non-uniform scaling not supported: {scale_x}x{scale_y}")]
    NonUniformScale { scale_x: f32, scale_y: f32 },

    /// A supported factor with no composition rule. Indicates a registry
    /// entry without a matching dispatch plan.
    #[error("no composition rule for {} at {factor}x", algorithm.name())]
    InvalidAlgorithmForScale { algorithm: Algorithm, factor: f32 },
}

impl ScaleError {
    /// Expected destination size, for dimension mismatches.
    pub fn expected_size(&self) -> Option<(u32, u32)> {
        match self {
            ScaleError::DimensionMismatch { expected, .. } => Some(*expected),
            _ => None,
        }
    }

    /// The supported set carried by an unsupported-scale error.
    pub fn supported_scales(&self) -> Option<ScaleSupport> {
        match self {
            ScaleError::UnsupportedScale { supported, .. } => Some(*supported),
            _ => None,
        }
    }
}

fn describe_support(supported: ScaleSupport, backend: Backend) -> String {
    if supported.is_arbitrary() {
        "This algorithm supports arbitrary scaling.".to_string()
    } else if supported.scales().is_empty() {
        format!("Not available on the {} backend.", backend)
    } else {
        format!("Supported scales: {}", supported)
    }
}
