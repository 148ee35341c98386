//! Pixel abstraction shared by every kernel and both backends.
//!
//! Kernels are written once against [`Pixel`] and instantiated for the
//! concrete `image` pixel types. A pixel is a 3 or 4 channel value of
//! 8 or 16 bits per channel; all arithmetic happens on `u32` widened
//! channels and every constructor clamps back into the representable range.
//!
//! Perceptual classification always looks at [`Pixel::rgb8`], the 8-bit RGB
//! projection, so the same thresholds apply to every channel width.

use std::fmt::Debug;
use std::ops::{Add, Mul};

use image::{Rgb, Rgba};

/// A color value the scaling kernels can read, compare and blend.
pub trait Pixel: image::Pixel<Subpixel: Send + Sync> + PartialEq + Debug + Send + Sync + 'static {
    /// Number of channels (3 for RGB, 4 for RGBA).
    const CHANNELS: usize;

    /// Largest value a single channel can hold.
    const MAX: u32;

    /// Read one channel widened to `u32`.
    fn channel(&self, index: usize) -> u32;

    /// Build a pixel channel by channel, clamping each value to [`Pixel::MAX`].
    fn from_fn(f: impl FnMut(usize) -> u32) -> Self;

    /// 8-bit RGB projection used by the difference classifiers.
    fn rgb8(&self) -> [i32; 3];
}

macro_rules! impl_pixel {
    ($ty:ident, $sub:ty, $channels:expr, $shift:expr) => {
        impl Pixel for $ty<$sub> {
            const CHANNELS: usize = $channels;
            const MAX: u32 = <$sub>::MAX as u32;

            #[inline]
            fn channel(&self, index: usize) -> u32 {
                u32::from(self.0[index])
            }

            #[inline]
            fn from_fn(mut f: impl FnMut(usize) -> u32) -> Self {
                let mut data = [0 as $sub; $channels];
                for (i, slot) in data.iter_mut().enumerate() {
                    *slot = f(i).min(Self::MAX) as $sub;
                }
                $ty(data)
            }

            #[inline]
            fn rgb8(&self) -> [i32; 3] {
                [
                    i32::from(self.0[0] >> $shift),
                    i32::from(self.0[1] >> $shift),
                    i32::from(self.0[2] >> $shift),
                ]
            }
        }
    };
}

impl_pixel!(Rgb, u8, 3, 0);
impl_pixel!(Rgba, u8, 4, 0);
impl_pixel!(Rgb, u16, 3, 8);
impl_pixel!(Rgba, u16, 4, 8);

/// Floating point color used by the procedural kernels.
///
/// Channels keep the native scale of the pixel they came from (0..=255 for
/// 8-bit pixels), so converting back only needs rounding and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color(pub [f32; 4]);

impl Color {
    /// Widen a pixel into a float color.
    pub fn of<P: Pixel>(pixel: &P) -> Self {
        let mut c = [0.0; 4];
        for (i, slot) in c.iter_mut().enumerate().take(P::CHANNELS) {
            *slot = pixel.channel(i) as f32;
        }
        Color(c)
    }

    /// Round to the nearest representable pixel.
    pub fn to_pixel<P: Pixel>(self) -> P {
        P::from_fn(|i| {
            let v = (self.0[i] + 0.5).floor();
            if v <= 0.0 {
                0
            } else {
                v as u32
            }
        })
    }

    /// Linear interpolation, `self` at `t == 0` and `other` at `t == 1`.
    pub fn mix(self, other: Color, t: f32) -> Color {
        let mut out = [0.0; 4];
        for i in 0..4 {
            out[i] = self.0[i] * (1.0 - t) + other.0[i] * t;
        }
        Color(out)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o += r;
        }
        Color(out)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, k: f32) -> Color {
        Color(self.0.map(|c| c * k))
    }
}

/// Interpolate two pixels in float space and round the result.
pub fn mix<P: Pixel>(a: &P, b: &P, t: f32) -> P {
    Color::of(a).mix(Color::of(b), t).to_pixel()
}
