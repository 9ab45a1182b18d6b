//! Preview sizing and resampling.
//!
//! The interactive preview runs the engine on a copy of the source scaled
//! to fit the viewport; export runs it on the source itself.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - Point sampling, no interpolation
//! - [`Filter::Bilinear`] - Triangle filter (default)
//! - [`Filter::Box`] - Area average, good for large downscales
//!
//! # Example
//!
//! ```rust
//! use spektra_core::PixelBuffer;
//! use spektra_ops::resize::{fit_within, resize, Filter};
//!
//! let src = PixelBuffer::filled(1920, 1080, [40, 80, 120, 255]);
//! let (w, h) = fit_within(src.width(), src.height(), 640, 640);
//! let preview = resize(&src, w, h, Filter::Bilinear).unwrap();
//! assert_eq!(preview.dimensions(), (640, 360));
//! ```

use spektra_core::{PixelBuffer, CHANNELS};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Filter {
    /// Nearest-neighbor (fastest, no interpolation).
    Nearest,
    /// Bilinear interpolation (smooth, fast).
    #[default]
    Bilinear,
    /// Box filter averaging every covered source pixel.
    Box,
}

impl Filter {
    /// Returns the support radius for this filter at unit scale.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest | Filter::Box => 0.5,
            Filter::Bilinear => 1.0,
        }
    }

    /// Evaluates the filter kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        match self {
            Filter::Nearest | Filter::Box => {
                if ax <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Filter::Bilinear => {
                if ax < 1.0 {
                    1.0 - ax
                } else {
                    0.0
                }
            }
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Bilinear => "bilinear",
            Filter::Box => "box",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Filter {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Filter::Nearest),
            "bilinear" | "linear" => Ok(Filter::Bilinear),
            "box" => Ok(Filter::Box),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown filter '{other}' (expected nearest, bilinear or box)"
            ))),
        }
    }
}

/// Largest size with the source aspect ratio that fits inside
/// `max_w` x `max_h`.
///
/// Scale is `min(max_w / src_w, max_h / src_h)`, so small images are
/// scaled up to fill the box. Neither returned side is ever zero.
///
/// ```rust
/// use spektra_ops::resize::fit_within;
///
/// assert_eq!(fit_within(1920, 1080, 640, 480), (640, 360));
/// assert_eq!(fit_within(320, 240, 640, 480), (640, 480));
/// ```
pub fn fit_within(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let src_w = src_w.max(1) as f64;
    let src_h = src_h.max(1) as f64;
    let scale = (max_w as f64 / src_w).min(max_h as f64 / src_h);

    let new_w = ((src_w * scale).round() as u32).max(1);
    let new_h = ((src_h * scale).round() as u32).max(1);

    (new_w, new_h)
}

/// Resizes an RGBA buffer to `dst_w` x `dst_h`.
///
/// Separable two-pass resampling (horizontal then vertical) in `f32`,
/// rounded back to 8 bits. Alpha is resampled like the color channels.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if the source is empty or a target side
/// is zero.
pub fn resize(src: &PixelBuffer, dst_w: u32, dst_h: u32, filter: Filter) -> OpsResult<PixelBuffer> {
    trace!(
        src_w = src.width(),
        src_h = src.height(),
        dst_w,
        dst_h,
        ?filter,
        "resize"
    );

    if src.is_empty() {
        return Err(OpsError::InvalidDimensions("source image is empty".into()));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }
    if src.dimensions() == (dst_w, dst_h) {
        return Ok(src.clone());
    }

    if filter == Filter::Nearest {
        return Ok(resize_nearest(src, dst_w, dst_h));
    }

    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let samples: Vec<f32> = src.as_raw().iter().map(|&v| v as f32).collect();

    let temp = resize_horizontal(&samples, src_w, src_h, dst_w as usize, filter);
    let result = resize_vertical(&temp, dst_w as usize, src_h, dst_h as usize, filter);

    let data = result
        .into_iter()
        .map(|v| v.clamp(0.0, 255.0).round() as u8)
        .collect();
    Ok(PixelBuffer::from_raw(dst_w, dst_h, data)?)
}

/// Point sampling at the destination pixel center.
fn resize_nearest(src: &PixelBuffer, dst_w: u32, dst_h: u32) -> PixelBuffer {
    let sx = src.width() as f32 / dst_w as f32;
    let sy = src.height() as f32 / dst_h as f32;
    PixelBuffer::from_fn(dst_w, dst_h, |x, y| {
        let px = (((x as f32 + 0.5) * sx) as u32).min(src.width() - 1);
        let py = (((y as f32 + 0.5) * sy) as u32).min(src.height() - 1);
        src.pixel(px, py)
    })
}

/// Horizontal resize pass.
fn resize_horizontal(src: &[f32], src_w: usize, src_h: usize, dst_w: usize, filter: Filter) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h * CHANNELS];
    let scale = src_w as f32 / dst_w as f32;
    let support = filter.support() * scale.max(1.0);

    for y in 0..src_h {
        for x in 0..dst_w {
            // Map destination x to source x
            let center = (x as f32 + 0.5) * scale - 0.5;
            let left = ((center - support).floor() as isize).max(0) as usize;
            let right = ((center + support).ceil().max(0.0) as usize).min(src_w - 1);

            let mut sum = [0.0f32; CHANNELS];
            let mut weight_sum = 0.0f32;

            for sx in left..=right {
                let dist = (sx as f32 - center) / scale.max(1.0);
                let w = filter.weight(dist);
                weight_sum += w;

                let src_idx = (y * src_w + sx) * CHANNELS;
                for c in 0..CHANNELS {
                    sum[c] += src[src_idx + c] * w;
                }
            }

            let dst_idx = (y * dst_w + x) * CHANNELS;
            if weight_sum > 0.0 {
                for c in 0..CHANNELS {
                    dst[dst_idx + c] = sum[c] / weight_sum;
                }
            }
        }
    }

    dst
}

/// Vertical resize pass.
fn resize_vertical(src: &[f32], src_w: usize, src_h: usize, dst_h: usize, filter: Filter) -> Vec<f32> {
    let mut dst = vec![0.0f32; src_w * dst_h * CHANNELS];
    let scale = src_h as f32 / dst_h as f32;
    let support = filter.support() * scale.max(1.0);

    for y in 0..dst_h {
        // Map destination y to source y
        let center = (y as f32 + 0.5) * scale - 0.5;
        let top = ((center - support).floor() as isize).max(0) as usize;
        let bottom = ((center + support).ceil().max(0.0) as usize).min(src_h - 1);

        for x in 0..src_w {
            let mut sum = [0.0f32; CHANNELS];
            let mut weight_sum = 0.0f32;

            for sy in top..=bottom {
                let dist = (sy as f32 - center) / scale.max(1.0);
                let w = filter.weight(dist);
                weight_sum += w;

                let src_idx = (sy * src_w + x) * CHANNELS;
                for c in 0..CHANNELS {
                    sum[c] += src[src_idx + c] * w;
                }
            }

            let dst_idx = (y * src_w + x) * CHANNELS;
            if weight_sum > 0.0 {
                for c in 0..CHANNELS {
                    dst[dst_idx + c] = sum[c] / weight_sum;
                }
            }
        }
    }

    dst
}
