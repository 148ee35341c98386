//! Image access traits.
//!
//! Kernels never touch a concrete image type. They read through
//! [`SourceImage`] and write through [`TargetImage`]; anything that is both
//! is an [`ImageSurface`]. `image::ImageBuffer` implements all three, and
//! [`BandTarget`] lets a band-parallel run hand a disjoint slice of one
//! canvas to each worker while kernels keep using absolute coordinates.

use std::ops::{Deref, DerefMut};

use image::ImageBuffer;

use crate::pixel::Pixel;

/// The owned image type produced by the fresh-destination entry point.
pub type Canvas<P> = ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>;

/// Dimensions and pixel type shared by both image roles.
pub trait Surface {
    type Pixel: Pixel;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// A readable image.
pub trait SourceImage: Surface {
    /// Read the pixel at `(x, y)`. Coordinates must be in bounds.
    fn get(&self, x: u32, y: u32) -> Self::Pixel;

    /// Read with edge clamping: out-of-range coordinates snap to the
    /// nearest valid pixel.
    #[inline]
    fn safe_access(&self, x: i64, y: i64) -> Self::Pixel {
        let cx = x.clamp(0, i64::from(self.width()) - 1);
        let cy = y.clamp(0, i64::from(self.height()) - 1);
        self.get(cx as u32, cy as u32)
    }
}

/// A writable image with fixed dimensions.
pub trait TargetImage: Surface {
    fn set(&mut self, x: u32, y: u32, pixel: Self::Pixel);
}

/// An image that can be both read and written.
pub trait ImageSurface: SourceImage + TargetImage {}

impl<T: SourceImage + TargetImage> ImageSurface for T {}

impl<P, C> Surface for ImageBuffer<P, C>
where
    P: Pixel,
    C: Deref<Target = [P::Subpixel]>,
{
    type Pixel = P;

    #[inline]
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    #[inline]
    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }
}

impl<P, C> SourceImage for ImageBuffer<P, C>
where
    P: Pixel,
    C: Deref<Target = [P::Subpixel]>,
{
    #[inline]
    fn get(&self, x: u32, y: u32) -> P {
        *self.get_pixel(x, y)
    }
}

impl<P, C> TargetImage for ImageBuffer<P, C>
where
    P: Pixel,
    C: Deref<Target = [P::Subpixel]> + DerefMut,
{
    #[inline]
    fn set(&mut self, x: u32, y: u32, pixel: P) {
        self.put_pixel(x, y, pixel);
    }
}

/// A horizontal band of a larger canvas.
///
/// Reports the full canvas dimensions so kernels compute the same
/// coordinates they would for the whole image, but only accepts writes to
/// rows `first_row..first_row + rows`.
pub struct BandTarget<'a, P: Pixel> {
    data: &'a mut [P::Subpixel],
    width: u32,
    height: u32,
    first_row: u32,
}

impl<'a, P: Pixel> BandTarget<'a, P> {
    /// Wrap `data`, the raw subpixels of rows starting at `first_row` of a
    /// `width` x `height` canvas.
    pub fn new(data: &'a mut [P::Subpixel], width: u32, height: u32, first_row: u32) -> Self {
        Self {
            data,
            width,
            height,
            first_row,
        }
    }

    /// Canvas rows this band covers.
    pub fn rows(&self) -> std::ops::Range<u32> {
        let stride = self.width as usize * P::CHANNELS;
        let count = if stride == 0 { 0 } else { self.data.len() / stride };
        self.first_row..self.first_row + count as u32
    }
}

impl<P: Pixel> Surface for BandTarget<'_, P> {
    type Pixel = P;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl<P: Pixel> TargetImage for BandTarget<'_, P> {
    #[inline]
    fn set(&mut self, x: u32, y: u32, pixel: P) {
        debug_assert!(self.rows().contains(&y), "row {} outside band", y);
        let start = ((y - self.first_row) as usize * self.width as usize + x as usize) * P::CHANNELS;
        let end = start + P::CHANNELS;
        self.data[start..end].copy_from_slice(image::Pixel::channels(&pixel));
    }
}
