//! Capability registry
//!
//! Which algorithm runs at which scale on which backend. The table is built
//! once on first use and never changes afterwards, so it is shared across
//! threads without locking. The dispatcher consults it before any kernel
//! runs; kernels never report their own capabilities.
//!
//! | algorithm              | Cpu              | Raster           | accelerated |
//! |------------------------|------------------|------------------|-------------|
//! | nearest, bilinear      | arbitrary 0.1-10 | arbitrary 0.1-10 | yes         |
//! | trilinear              | arbitrary 0.1-10 | -                | no          |
//! | epx, eagle, super2xsai | 2                | 2                | yes         |
//! | scale                  | 2, 3, 4          | 2, 3, 4          | yes         |
//! | scale-sfx              | 2, 3             | 2, 3             | yes         |
//! | hq, xbr                | 2, 3, 4          | -                | no          |
//! | aascale                | 2, 4             | 2, 4             | yes         |
//! | omniscale              | arbitrary 1-8    | arbitrary 1-8    | yes         |

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A scaling algorithm, independent of scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Nearest neighbor, any scale
    Nearest,
    /// Bilinear interpolation, any scale
    Bilinear,
    /// Bilinear with mipmaps for downscaling, any scale
    Trilinear,
    /// Eric's Pixel Expansion, 2x
    Epx,
    /// Eagle, 2x
    Eagle,
    /// AdvMAME Scale2x/3x/4x
    Scale,
    /// Sp00kyFox Scale2x/3x refinement
    #[serde(rename = "scale-sfx")]
    #[value(name = "scale-sfx")]
    ScaleSfx,
    /// Super 2xSaI, 2x
    #[value(name = "super2xsai")]
    Super2xSai,
    /// HQ2x/3x/4x
    Hq,
    /// Anti-aliased Scale, 2x and 4x
    #[value(name = "aascale")]
    AaScale,
    /// Hyllian's xBR, 2x/3x/4x
    Xbr,
    /// Resolution independent, any scale from 1 to 8
    #[value(name = "omniscale")]
    OmniScale,
}

impl Algorithm {
    /// Every algorithm, in catalogue order.
    pub const ALL: [Algorithm; 12] = [
        Algorithm::Nearest,
        Algorithm::Bilinear,
        Algorithm::Trilinear,
        Algorithm::Epx,
        Algorithm::Eagle,
        Algorithm::Scale,
        Algorithm::ScaleSfx,
        Algorithm::Super2xSai,
        Algorithm::Hq,
        Algorithm::AaScale,
        Algorithm::Xbr,
        Algorithm::OmniScale,
    ];

    /// Stable identifier used in config files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Nearest => "nearest",
            Algorithm::Bilinear => "bilinear",
            Algorithm::Trilinear => "trilinear",
            Algorithm::Epx => "epx",
            Algorithm::Eagle => "eagle",
            Algorithm::Scale => "scale",
            Algorithm::ScaleSfx => "scale-sfx",
            Algorithm::Super2xSai => "super2xsai",
            Algorithm::Hq => "hq",
            Algorithm::AaScale => "aascale",
            Algorithm::Xbr => "xbr",
            Algorithm::OmniScale => "omniscale",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        capabilities(self).name
    }

    /// Whether the output size is fixed at twice the input regardless of
    /// the requested factor.
    pub fn is_fixed_2x(self) -> bool {
        matches!(self, Algorithm::Epx | Algorithm::Eagle | Algorithm::Super2xSai)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm '{0}' (expected one of: nearest, bilinear, trilinear, epx, eagle, scale, scale-sfx, super2xsai, hq, aascale, xbr, omniscale)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Case-insensitive match on the identifier or the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(wanted) || a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Where a kernel runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Sliding-window kernels over an in-memory image
    #[default]
    Cpu,
    /// Per-pixel fragment programs rendered in parallel
    Raster,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Cpu, Backend::Raster];
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Cpu => write!(f, "cpu"),
            Backend::Raster => write!(f, "raster"),
        }
    }
}

/// The scale factors one backend accepts for one algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleSupport {
    /// Exactly these factors. Empty when the backend lacks the algorithm.
    Fixed(&'static [f32]),
    /// Any factor in `min..=max`.
    Arbitrary { min: f32, max: f32 },
}

impl ScaleSupport {
    pub const NONE: ScaleSupport = ScaleSupport::Fixed(&[]);

    /// Membership test. Non-positive and non-finite factors never match.
    pub fn contains(&self, scale: f32) -> bool {
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        match *self {
            ScaleSupport::Fixed(scales) => scales.contains(&scale),
            ScaleSupport::Arbitrary { min, max } => scale >= min && scale <= max,
        }
    }

    pub fn is_arbitrary(&self) -> bool {
        matches!(self, ScaleSupport::Arbitrary { .. })
    }

    /// The fixed factors; empty for arbitrary support.
    pub fn scales(&self) -> &'static [f32] {
        match *self {
            ScaleSupport::Fixed(scales) => scales,
            ScaleSupport::Arbitrary { .. } => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        self.is_arbitrary() || !self.scales().is_empty()
    }
}

impl fmt::Display for ScaleSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ScaleSupport::Arbitrary { min, max } => write!(f, "any {}x-{}x", min, max),
            ScaleSupport::Fixed([]) => write!(f, "-"),
            ScaleSupport::Fixed(scales) => {
                for (i, s) in scales.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}x", s)?;
                }
                Ok(())
            }
        }
    }
}

/// Everything the registry knows about one algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmDescriptor {
    pub algorithm: Algorithm,
    pub name: &'static str,
    pub description: &'static str,
    pub cpu: ScaleSupport,
    pub raster: ScaleSupport,
    /// Whether the raster backend implements this algorithm.
    pub accelerated: bool,
}

impl AlgorithmDescriptor {
    /// Scale support on `backend`.
    pub fn support(&self, backend: Backend) -> ScaleSupport {
        match backend {
            Backend::Cpu => self.cpu,
            Backend::Raster => self.raster,
        }
    }
}

/// Which backend suits a particular request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Cpu,
    Raster,
    Either,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Cpu => write!(f, "cpu"),
            Recommendation::Raster => write!(f, "raster"),
            Recommendation::Either => write!(f, "either"),
        }
    }
}

const RESAMPLE: ScaleSupport = ScaleSupport::Arbitrary { min: 0.1, max: 10.0 };
const OMNI: ScaleSupport = ScaleSupport::Arbitrary { min: 1.0, max: 8.0 };
const ONLY_2X: ScaleSupport = ScaleSupport::Fixed(&[2.0]);
const UP_TO_4X: ScaleSupport = ScaleSupport::Fixed(&[2.0, 3.0, 4.0]);

fn descriptors() -> &'static [AlgorithmDescriptor] {
    static TABLE: OnceLock<Vec<AlgorithmDescriptor>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let entry = |algorithm, name, description, cpu, raster: ScaleSupport| AlgorithmDescriptor {
            algorithm,
            name,
            description,
            cpu,
            raster,
            accelerated: raster.is_available(),
        };
        vec![
            entry(Algorithm::Nearest, "Nearest", "Nearest neighbor - fastest, pixelated", RESAMPLE, RESAMPLE),
            entry(Algorithm::Bilinear, "Bilinear", "Bilinear interpolation - smooth but blurry", RESAMPLE, RESAMPLE),
            entry(
                Algorithm::Trilinear,
                "Trilinear",
                "Trilinear with mipmapping - good for downscaling",
                RESAMPLE,
                ScaleSupport::NONE,
            ),
            entry(Algorithm::Epx, "EPX", "Eric's Pixel Expansion - good for pixel art", ONLY_2X, ONLY_2X),
            entry(Algorithm::Eagle, "Eagle", "Eagle algorithm - smooth diagonal lines", ONLY_2X, ONLY_2X),
            entry(Algorithm::Scale, "Scale", "AdvMAME Scale2x/3x/4x - sharp pixel art", UP_TO_4X, UP_TO_4X),
            entry(
                Algorithm::ScaleSfx,
                "ScaleSFX",
                "Sp00kyFox improved Scale - better edges",
                ScaleSupport::Fixed(&[2.0, 3.0]),
                ScaleSupport::Fixed(&[2.0, 3.0]),
            ),
            entry(Algorithm::Super2xSai, "Super2xSaI", "Super 2xSaI - smooth interpolation", ONLY_2X, ONLY_2X),
            entry(Algorithm::Hq, "HQ", "High Quality 2x/3x/4x - excellent quality", UP_TO_4X, ScaleSupport::NONE),
            entry(
                Algorithm::AaScale,
                "AAScale",
                "Anti-Aliased Scale - smooth edges",
                ScaleSupport::Fixed(&[2.0, 4.0]),
                ScaleSupport::Fixed(&[2.0, 4.0]),
            ),
            entry(Algorithm::Xbr, "xBR", "Hyllian's xBR - advanced edge interpolation", UP_TO_4X, ScaleSupport::NONE),
            entry(Algorithm::OmniScale, "OmniScale", "OmniScale - resolution independent", OMNI, OMNI),
        ]
    })
}

/// Descriptor for `algorithm`.
pub fn capabilities(algorithm: Algorithm) -> &'static AlgorithmDescriptor {
    // The table is built from `Algorithm::ALL` order.
    &descriptors()[algorithm as usize]
}

/// Every algorithm the registry knows.
pub fn all_algorithms() -> &'static [Algorithm] {
    &Algorithm::ALL
}

/// Scale factors `backend` accepts for `algorithm`.
///
/// OmniScale is arbitrary over 1x to 8x on both backends. Classic CPU
/// OmniScale ports only offer 2x and 3x; here the CPU kernel evaluates the
/// same per-position rules as the raster program, so any factor in range
/// works.
pub fn supported_scales(algorithm: Algorithm, backend: Backend) -> ScaleSupport {
    capabilities(algorithm).support(backend)
}

/// Whether `backend` can run `algorithm` at `scale`.
pub fn is_scale_supported(algorithm: Algorithm, backend: Backend, scale: f32) -> bool {
    supported_scales(algorithm, backend).contains(scale)
}

/// Algorithms `backend` can run at `scale`, in catalogue order.
pub fn algorithms_for_scale(scale: f32, backend: Backend) -> Vec<Algorithm> {
    Algorithm::ALL
        .into_iter()
        .filter(|&a| is_scale_supported(a, backend, scale))
        .collect()
}

/// Suggest a backend for scaling a `width` x `height` image.
pub fn recommend_backend(algorithm: Algorithm, scale: f32, width: u32, height: u32) -> Recommendation {
    let info = capabilities(algorithm);
    if !info.accelerated || !info.raster.contains(scale) {
        return Recommendation::Cpu;
    }
    if !info.cpu.contains(scale) {
        return Recommendation::Raster;
    }
    if algorithm == Algorithm::OmniScale && scale != 2.0 && scale != 3.0 {
        return Recommendation::Raster;
    }

    let pixels = u64::from(width) * u64::from(height);
    if pixels < 64 * 64 {
        Recommendation::Cpu
    } else if pixels > 512 * 512 {
        Recommendation::Raster
    } else {
        Recommendation::Either
    }
}

/// Output dimensions `algorithm` produces for a `width` x `height` input.
pub fn output_size(algorithm: Algorithm, width: u32, height: u32, scale: f32) -> (u32, u32) {
    if algorithm.is_fixed_2x() {
        return (width.saturating_mul(2), height.saturating_mul(2));
    }
    let dim = |d: u32| {
        let exact = f64::from(d) * f64::from(scale);
        // Factors inferred as f32 ratios land a hair below whole numbers.
        let snapped = if (exact - exact.round()).abs() <= exact * 1e-6 {
            exact.round()
        } else {
            exact.floor()
        };
        snapped.max(0.0) as u32
    };
    (dim(width), dim(height))
}
