//! Sliding row window over a source image.
//!
//! A kernel walks the source top to bottom. Instead of re-reading the
//! `window_height` rows around every pixel, the window keeps them in a ring
//! indexed by `row mod window_height` and replaces only the oldest row when
//! the center moves down, so each source row is read once per band.
//!
//! ```text
//!            pad                 width                 pad
//!          +-----+-------------------------------------+-----+
//! slot 2   | c c |  row y-1                            | c c |
//! slot 0   | c c |  row y     <- center                | c c |
//! slot 1   | c c |  row y+1                            | c c |
//!          +-----+-------------------------------------+-----+
//! ```
//!
//! The `c` columns are filled through edge-clamped reads when a row is
//! loaded, so neighborhood lookups never branch on image bounds.
//!
//! Images up to [`FIXED_CAPACITY`] pixels wide use fixed-stride row arrays.
//! Wider images fall back to exactly sized rows. Both storages sit behind
//! [`RowWindow`], so kernels never know which one they got.

use std::marker::PhantomData;

use crate::pixel::Pixel;
use crate::surface::SourceImage;

/// Widest image served by the fixed-stride storage.
pub const FIXED_CAPACITY: usize = 4096;

/// Largest padding any window shape needs.
const MAX_PADDING: usize = 2;

const FIXED_ROW_LEN: usize = FIXED_CAPACITY + 2 * MAX_PADDING;

/// Row count and reach of a neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowShape {
    /// Rows y-1..=y+1, columns x-1..=x+1.
    Square3,
    /// Rows y-1..=y+2, columns x-1..=x+2.
    Square4,
    /// Rows y-2..=y+2, columns x-2..=x+2.
    Square5,
}

impl WindowShape {
    /// Number of rows held in the ring.
    pub const fn height(self) -> usize {
        match self {
            WindowShape::Square3 => 3,
            WindowShape::Square4 => 4,
            WindowShape::Square5 => 5,
        }
    }

    /// Clamped columns stored on each side of a row.
    pub const fn padding(self) -> usize {
        self.height() / 2
    }

    /// Stored length of one row of an image `width` pixels wide.
    pub const fn row_len(self, width: u32) -> usize {
        width as usize + 2 * self.padding()
    }

    /// Offset of the first stored row (and column) relative to the center.
    pub const fn first_offset(self) -> i64 {
        match self {
            WindowShape::Square3 | WindowShape::Square4 => -1,
            WindowShape::Square5 => -2,
        }
    }
}

/// Backing storage for the ring rows.
pub trait RowStorage<P: Pixel>: Sized {
    /// Allocate `rows` rows of `row_len` pixels, or `None` if this storage
    /// cannot hold rows that long.
    fn allocate(rows: usize, row_len: usize, fill: P) -> Option<Self>;

    fn row(&self, slot: usize) -> &[P];

    fn row_mut(&mut self, slot: usize) -> &mut [P];
}

/// Fixed-stride rows sized for [`FIXED_CAPACITY`].
pub struct FixedRows<P: Pixel> {
    rows: Vec<[P; FIXED_ROW_LEN]>,
    len: usize,
}

impl<P: Pixel> RowStorage<P> for FixedRows<P> {
    fn allocate(rows: usize, row_len: usize, fill: P) -> Option<Self> {
        if row_len > FIXED_ROW_LEN {
            return None;
        }
        Some(Self {
            rows: vec![[fill; FIXED_ROW_LEN]; rows],
            len: row_len,
        })
    }

    #[inline]
    fn row(&self, slot: usize) -> &[P] {
        &self.rows[slot][..self.len]
    }

    #[inline]
    fn row_mut(&mut self, slot: usize) -> &mut [P] {
        &mut self.rows[slot][..self.len]
    }
}

/// Exactly sized rows for images wider than [`FIXED_CAPACITY`].
pub struct DynamicRows<P: Pixel> {
    data: Vec<P>,
    row_len: usize,
}

impl<P: Pixel> DynamicRows<P> {
    fn new(rows: usize, row_len: usize, fill: P) -> Self {
        Self {
            data: vec![fill; rows * row_len],
            row_len,
        }
    }
}

impl<P: Pixel> RowStorage<P> for DynamicRows<P> {
    fn allocate(rows: usize, row_len: usize, fill: P) -> Option<Self> {
        Some(Self::new(rows, row_len, fill))
    }

    #[inline]
    fn row(&self, slot: usize) -> &[P] {
        &self.data[slot * self.row_len..(slot + 1) * self.row_len]
    }

    #[inline]
    fn row_mut(&mut self, slot: usize) -> &mut [P] {
        &mut self.data[slot * self.row_len..(slot + 1) * self.row_len]
    }
}

/// Read interface every window variant exposes.
pub trait RowWindow<P: Pixel> {
    fn shape(&self) -> WindowShape;

    /// Source row the window is centered on.
    fn center(&self) -> i64;

    /// Load every row around `start_y` straight from the source.
    fn initialize<S: SourceImage<Pixel = P>>(&mut self, source: &S, start_y: u32);

    /// Move the center down one row, loading only the new bottom row.
    fn advance<S: SourceImage<Pixel = P>>(&mut self, source: &S);

    /// Padded row `offset` rows away from the center. Index `x + padding()`
    /// is source column `x`.
    fn get_row(&self, offset: i64) -> &[P];

    fn padding(&self) -> usize {
        self.shape().padding()
    }

    /// Pixel at column `x + dx` of the row `dy` away from the center.
    #[inline]
    fn at(&self, x: u32, dx: i64, dy: i64) -> P {
        let index = x as i64 + self.padding() as i64 + dx;
        self.get_row(dy)[index as usize]
    }

    /// The 3x3 neighborhood around column `x`, row-major with the center at
    /// index 4. Available for every shape.
    #[inline]
    fn neighbors3(&self, x: u32) -> [P; 9] {
        std::array::from_fn(|i| self.at(x, (i % 3) as i64 - 1, (i / 3) as i64 - 1))
    }

    /// The full N x N neighborhood of the window's shape, `grid[row][col]`.
    #[inline]
    fn grid<const N: usize>(&self, x: u32) -> [[P; N]; N] {
        debug_assert_eq!(N, self.shape().height());
        let first = self.shape().first_offset();
        std::array::from_fn(|r| std::array::from_fn(|c| self.at(x, first + c as i64, first + r as i64)))
    }
}

/// Ring of rows over some storage.
pub struct SlidingWindow<P: Pixel, S: RowStorage<P>> {
    storage: S,
    shape: WindowShape,
    center: i64,
    _pixel: PhantomData<P>,
}

impl<P: Pixel, S: RowStorage<P>> SlidingWindow<P, S> {
    fn with_storage(shape: WindowShape, width: u32) -> Option<Self> {
        let storage = S::allocate(shape.height(), shape.row_len(width), P::from_fn(|_| 0))?;
        Some(Self::from_storage(shape, storage))
    }

    fn from_storage(shape: WindowShape, storage: S) -> Self {
        Self {
            storage,
            shape,
            center: 0,
            _pixel: PhantomData,
        }
    }

    fn slot(&self, y: i64) -> usize {
        y.rem_euclid(self.shape.height() as i64) as usize
    }

    fn load<Src: SourceImage<Pixel = P>>(&mut self, source: &Src, y: i64) {
        let pad = self.shape.padding() as i64;
        let slot = self.slot(y);
        for (i, px) in self.storage.row_mut(slot).iter_mut().enumerate() {
            *px = source.safe_access(i as i64 - pad, y);
        }
    }
}

impl<P: Pixel, S: RowStorage<P>> RowWindow<P> for SlidingWindow<P, S> {
    fn shape(&self) -> WindowShape {
        self.shape
    }

    fn center(&self) -> i64 {
        self.center
    }

    fn initialize<Src: SourceImage<Pixel = P>>(&mut self, source: &Src, start_y: u32) {
        self.center = i64::from(start_y);
        let first = self.center + self.shape.first_offset();
        for k in 0..self.shape.height() as i64 {
            self.load(source, first + k);
        }
    }

    fn advance<Src: SourceImage<Pixel = P>>(&mut self, source: &Src) {
        self.center += 1;
        let last = self.center + self.shape.first_offset() + self.shape.height() as i64 - 1;
        self.load(source, last);
    }

    #[inline]
    fn get_row(&self, offset: i64) -> &[P] {
        debug_assert!(
            offset >= self.shape.first_offset()
                && offset < self.shape.first_offset() + self.shape.height() as i64,
            "row offset {} outside window",
            offset
        );
        self.storage.row(self.slot(self.center + offset))
    }
}

/// The window kernels actually hold: fixed storage when the image fits,
/// dynamic storage otherwise.
pub enum NeighborhoodBuffer<P: Pixel> {
    Fixed(SlidingWindow<P, FixedRows<P>>),
    Dynamic(SlidingWindow<P, DynamicRows<P>>),
}

impl<P: Pixel> NeighborhoodBuffer<P> {
    /// Create a window for an image `width` pixels wide. Call
    /// [`RowWindow::initialize`] before reading.
    pub fn new(shape: WindowShape, width: u32) -> Self {
        match SlidingWindow::with_storage(shape, width) {
            Some(fixed) => NeighborhoodBuffer::Fixed(fixed),
            None => NeighborhoodBuffer::Dynamic(Self::dynamic(shape, width)),
        }
    }

    fn dynamic(shape: WindowShape, width: u32) -> SlidingWindow<P, DynamicRows<P>> {
        let rows = DynamicRows::new(shape.height(), shape.row_len(width), P::from_fn(|_| 0));
        SlidingWindow::from_storage(shape, rows)
    }

    /// Create and initialize a window centered on `start_y`.
    pub fn at_row<S: SourceImage<Pixel = P>>(shape: WindowShape, source: &S, start_y: u32) -> Self {
        let mut window = Self::new(shape, source.width());
        window.initialize(source, start_y);
        window
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, NeighborhoodBuffer::Fixed(_))
    }
}

impl<P: Pixel> RowWindow<P> for NeighborhoodBuffer<P> {
    fn shape(&self) -> WindowShape {
        match self {
            NeighborhoodBuffer::Fixed(w) => w.shape(),
            NeighborhoodBuffer::Dynamic(w) => w.shape(),
        }
    }

    fn center(&self) -> i64 {
        match self {
            NeighborhoodBuffer::Fixed(w) => w.center(),
            NeighborhoodBuffer::Dynamic(w) => w.center(),
        }
    }

    fn initialize<S: SourceImage<Pixel = P>>(&mut self, source: &S, start_y: u32) {
        match self {
            NeighborhoodBuffer::Fixed(w) => w.initialize(source, start_y),
            NeighborhoodBuffer::Dynamic(w) => w.initialize(source, start_y),
        }
    }

    fn advance<S: SourceImage<Pixel = P>>(&mut self, source: &S) {
        match self {
            NeighborhoodBuffer::Fixed(w) => w.advance(source),
            NeighborhoodBuffer::Dynamic(w) => w.advance(source),
        }
    }

    #[inline]
    fn get_row(&self, offset: i64) -> &[P] {
        match self {
            NeighborhoodBuffer::Fixed(w) => w.get_row(offset),
            NeighborhoodBuffer::Dynamic(w) => w.get_row(offset),
        }
    }
}
