//! Owned 8-bit RGBA raster.
//!
//! # Memory Layout
//!
//! Pixels are stored **row-major**, top-to-bottom, four interleaved
//! samples per pixel:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//!         ...
//! ```
//!
//! Every sample is a `u8`, so the [0, 255] channel invariant holds by
//! construction. Alpha is carried through unchanged by every Spektra
//! operation.
//!
//! # Usage
//!
//! ```rust
//! use spektra_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::filled(4, 3, [10, 20, 30, 255]);
//! buf.set_pixel(1, 2, [200, 150, 100, 255]);
//! assert_eq!(buf.pixel(1, 2), [200, 150, 100, 255]);
//!
//! // Edge-clamped lookups never leave the raster.
//! assert_eq!(buf.rgb_clamped(-5, 99), [10, 20, 30]);
//! ```

use crate::{Error, Result};

/// Samples per pixel (red, green, blue, alpha).
pub const CHANNELS: usize = 4;

/// Owned RGBA8 pixel buffer.
///
/// The sample vector always holds exactly `width * height * 4` bytes;
/// constructors reject anything else so later neighborhood lookups can
/// index without bounds surprises.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Computes `width * height * CHANNELS`, failing on overflow.
fn sample_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "sample count overflows usize"))
}

impl PixelBuffer {
    /// Creates a transparent-black buffer.
    ///
    /// # Panics
    ///
    /// Panics if `width * height * 4` overflows `usize`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Creates a buffer with every pixel set to `pixel`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height * 4` overflows `usize`.
    pub fn filled(width: u32, height: u32, pixel: [u8; CHANNELS]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wraps existing interleaved RGBA samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len()` is not
    /// `width * height * 4`.
    ///
    /// ```rust
    /// use spektra_core::PixelBuffer;
    ///
    /// assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
    /// assert!(PixelBuffer::from_raw(2, 2, vec![0; 12]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = sample_count(width, height)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a buffer from packed RGB samples, setting alpha to opaque.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `rgb.len()` is not
    /// `width * height * 3`.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self> {
        let pixels = sample_count(width, height)? / CHANNELS;
        if rgb.len() != pixels * 3 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} RGB samples, got {}", pixels * 3, rgb.len()),
            ));
        }
        let data = rgb
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel in scan order.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; CHANNELS],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the buffer has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw interleaved samples.
    #[inline]
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, returning its samples.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Sample offset of pixel `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Gets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; CHANNELS] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Gets the pixel at `(x, y)`, or `None` outside the raster.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; CHANNELS]> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; CHANNELS]) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = self.index(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&pixel);
    }

    /// Sets the pixel at `(x, y)`, reporting out-of-range coordinates.
    pub fn try_set_pixel(&mut self, x: u32, y: u32, pixel: [u8; CHANNELS]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        self.set_pixel(x, y, pixel);
        Ok(())
    }

    /// RGB of the pixel nearest to `(x, y)` inside the raster.
    ///
    /// Coordinates outside the image are clamped to the edge (no wrap,
    /// no zero padding).
    ///
    /// # Panics
    ///
    /// Panics on an empty buffer.
    #[inline]
    pub fn rgb_clamped(&self, x: i64, y: i64) -> [u8; 3] {
        let sx = x.clamp(0, self.width as i64 - 1) as usize;
        let sy = y.clamp(0, self.height as i64 - 1) as usize;
        let i = (sy * self.width as usize + sx) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Row `y` as a slice of `width * 4` samples.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Returns `true` if `other` has the same width and height.
    #[inline]
    pub fn same_dimensions(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fails with [`Error::DimensionMismatch`] unless sizes agree.
    pub fn ensure_same_dimensions(&self, other: &PixelBuffer) -> Result<()> {
        if self.same_dimensions(other) {
            Ok(())
        } else {
            Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()))
        }
    }

    /// Overwrites this buffer's samples with `other`'s.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if sizes differ.
    pub fn copy_from(&mut self, other: &PixelBuffer) -> Result<()> {
        self.ensure_same_dimensions(other)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Iterates `(x, y, [r, g, b, a])` in scan order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [u8; CHANNELS])> + '_ {
        let w = self.width.max(1);
        self.data.chunks_exact(CHANNELS).enumerate().map(move |(i, px)| {
            let i = i as u32;
            (i % w, i / w, [px[0], px[1], px[2], px[3]])
        })
    }

    /// Packed RGB samples with alpha dropped.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.data
            .chunks_exact(CHANNELS)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}
