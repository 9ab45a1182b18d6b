//! Spatial detail stage: clarity, dehaze and texture.
//!
//! Each effect reads a small neighborhood with edge-clamped coordinates
//! (no wrap, no zero padding). Which buffer the neighborhood is read from
//! is the caller's choice; see [`NeighborSampling`](crate::NeighborSampling).
//!
//! # Kernels
//!
//! - [`Kernel::clarity`] - 5x5 Gaussian, weight `exp(-(dx²+dy²)/4)`
//! - [`Kernel::texture`] - 3x3 ring, weight `1/sqrt(dx²+dy²)`, center 0
//!
//! Both are stored normalized, so a weighted sum is the weighted mean.

use spektra_core::PixelBuffer;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{Adjustments, OpsError, OpsResult};

/// Convolution kernel for neighborhood sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Kernel weights, row-major.
    pub data: Vec<f32>,
    /// Kernel width (odd).
    pub width: usize,
    /// Kernel height (odd).
    pub height: usize,
}

impl Kernel {
    /// Creates a kernel from raw weights.
    ///
    /// Width and height must be odd numbers.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> OpsResult<Self> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(OpsError::InvalidParameter(
                "kernel dimensions must be odd".into(),
            ));
        }
        if data.len() != width * height {
            return Err(OpsError::InvalidParameter(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { data, width, height })
    }

    /// Builds a square kernel of `size` from a weight function of the
    /// squared distance, normalized to unit sum.
    fn radial(size: usize, weight: impl Fn(i64) -> f32) -> Self {
        let half = (size / 2) as i64;
        let mut data = Vec::with_capacity(size * size);
        let mut sum = 0.0f32;

        for dy in -half..=half {
            for dx in -half..=half {
                let w = weight(dx * dx + dy * dy);
                data.push(w);
                sum += w;
            }
        }

        for w in &mut data {
            *w /= sum;
        }

        Self { data, width: size, height: size }
    }

    /// The 5x5 Gaussian used by clarity.
    ///
    /// ```rust
    /// use spektra_ops::detail::Kernel;
    ///
    /// let k = Kernel::clarity();
    /// assert_eq!(k.radius(), (2, 2));
    /// ```
    pub fn clarity() -> Self {
        Self::radial(5, |d2| (-(d2 as f32) / 4.0).exp())
    }

    /// The 3x3 inverse-distance ring used by texture.
    pub fn texture() -> Self {
        Self::radial(3, |d2| {
            if d2 == 0 {
                0.0
            } else {
                1.0 / (d2 as f32).sqrt()
            }
        })
    }

    /// Returns the kernel radius (half-size).
    #[inline]
    pub fn radius(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Non-zero taps as `(dx, dy, weight)`, row-major.
    pub fn taps(&self) -> Vec<(i64, i64, f32)> {
        let (rx, ry) = self.radius();
        let mut taps = Vec::with_capacity(self.data.len());
        for ky in 0..self.height {
            for kx in 0..self.width {
                let w = self.data[ky * self.width + kx];
                if w != 0.0 {
                    taps.push((kx as i64 - rx as i64, ky as i64 - ry as i64, w));
                }
            }
        }
        taps
    }
}

/// Weighted mean of the RGB neighborhood around `(x, y)`.
#[inline]
fn weighted_mean(buf: &PixelBuffer, x: u32, y: u32, taps: &[(i64, i64, f32)]) -> [f32; 3] {
    let mut sum = [0.0f32; 3];
    for &(dx, dy, w) in taps {
        let n = buf.rgb_clamped(x as i64 + dx, y as i64 + dy);
        sum[0] += n[0] as f32 * w;
        sum[1] += n[1] as f32 * w;
        sum[2] += n[2] as f32 * w;
    }
    sum
}

/// Per-pass detail factors and precomputed kernel taps.
///
/// A zero field keeps no taps and is skipped entirely.
#[derive(Debug, Clone)]
pub struct DetailParams {
    clarity: f32,
    dehaze: f32,
    texture: f32,
    clarity_taps: Vec<(i64, i64, f32)>,
    texture_taps: Vec<(i64, i64, f32)>,
}

impl DetailParams {
    /// Derives factors from the clarity, dehaze and texture fields.
    pub fn new(adj: &Adjustments) -> Self {
        let clarity_taps = if adj.clarity != 0.0 {
            Kernel::clarity().taps()
        } else {
            Vec::new()
        };
        let texture_taps = if adj.texture != 0.0 {
            Kernel::texture().taps()
        } else {
            Vec::new()
        };
        Self {
            clarity: adj.clarity / 100.0,
            dehaze: adj.dehaze / 100.0,
            texture: adj.texture / 100.0,
            clarity_taps,
            texture_taps,
        }
    }

    /// Returns `true` if no detail effect is active.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.clarity == 0.0 && self.dehaze == 0.0 && self.texture == 0.0
    }

    /// Runs clarity, dehaze and texture on one pixel.
    ///
    /// `rgb` is the pixel value entering the stage, `l` the source
    /// lightness used by the tone stage, `neighbors` the buffer the
    /// kernels sample around `(x, y)`. Output is clamped to [0, 255].
    pub fn apply(&self, rgb: [f32; 3], l: f32, neighbors: &PixelBuffer, x: u32, y: u32) -> [f32; 3] {
        let mut c = rgb;

        if self.clarity != 0.0 {
            let blur = weighted_mean(neighbors, x, y, &self.clarity_taps);
            if self.clarity > 0.0 {
                let amount = self.clarity * 2.0;
                for i in 0..3 {
                    c[i] = (c[i] + (c[i] - blur[i]) * amount).clamp(0.0, 255.0);
                }
            } else {
                let k = self.clarity.abs();
                for i in 0..3 {
                    c[i] = (c[i] * (1.0 - k) + blur[i] * k).clamp(0.0, 255.0);
                }
            }
        }

        if self.dehaze != 0.0 && l < 0.5 {
            let amount = (0.5 - l) * self.dehaze;
            for v in &mut c {
                *v = (*v + (255.0 - *v) * amount).clamp(0.0, 255.0);
            }
        }

        if self.texture != 0.0 {
            // hf = c - mean(neighbors); smoothing is the same formula with t < 0.
            let mean = weighted_mean(neighbors, x, y, &self.texture_taps);
            for i in 0..3 {
                let hf = c[i] - mean[i];
                c[i] = (c[i] + hf * self.texture).clamp(0.0, 255.0);
            }
        }

        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kernel_new_validates() {
        assert!(Kernel::new(vec![1.0; 9], 3, 3).is_ok());
        assert!(Kernel::new(vec![1.0; 4], 2, 2).is_err());
        assert!(Kernel::new(vec![1.0; 8], 3, 3).is_err());
    }

    #[test]
    fn test_clarity_kernel_shape() {
        let k = Kernel::clarity();
        assert_eq!((k.width, k.height), (5, 5));
        let sum: f32 = k.data.iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
        // Center is the heaviest tap; corners exp(-2) relative to center.
        let center = k.data[12];
        assert!(k.data.iter().all(|&w| w <= center));
        assert_abs_diff_eq!(k.data[0] / center, (-2.0f32).exp(), epsilon = 1e-5);
        assert_abs_diff_eq!(k.data[0], k.data[24]);
        assert_eq!(k.taps().len(), 25);
    }

    #[test]
    fn test_texture_kernel_shape() {
        let k = Kernel::texture();
        assert_eq!(k.radius(), (1, 1));
        assert_eq!(k.data[4], 0.0);
        assert_eq!(k.taps().len(), 8);
        let sum: f32 = k.data.iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(k.data[0] / k.data[1], 1.0 / 2.0f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_fields_are_noop() {
        let p = DetailParams::new(&Adjustments::identity().with(Field::Exposure, 30.0));
        assert!(p.is_noop());
        assert!(p.clarity_taps.is_empty() && p.texture_taps.is_empty());
    }

    #[test]
    fn test_flat_neighborhood_is_unchanged() {
        let buf = PixelBuffer::filled(5, 5, [80, 90, 100, 255]);
        let adj = Adjustments::identity()
            .with(Field::Clarity, 100.0)
            .with(Field::Texture, -100.0);
        let out = DetailParams::new(&adj).apply([80.0, 90.0, 100.0], 0.35, &buf, 2, 2);
        assert_abs_diff_eq!(out[0], 80.0, epsilon = 1e-3);
        assert_abs_diff_eq!(out[1], 90.0, epsilon = 1e-3);
        assert_abs_diff_eq!(out[2], 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_clarity_sharpens_and_softens() {
        // Bright center on a dark field.
        let mut buf = PixelBuffer::filled(5, 5, [50, 50, 50, 255]);
        buf.set_pixel(2, 2, [150, 150, 150, 255]);
        let blur = weighted_mean(&buf, 2, 2, &Kernel::clarity().taps());
        assert!(blur[0] > 50.0 && blur[0] < 150.0);

        let sharp = DetailParams::new(&Adjustments::identity().with(Field::Clarity, 25.0))
            .apply([150.0; 3], 0.6, &buf, 2, 2);
        assert_abs_diff_eq!(sharp[0], 150.0 + (150.0 - blur[0]) * 0.5, epsilon = 1e-3);

        let soft = DetailParams::new(&Adjustments::identity().with(Field::Clarity, -100.0))
            .apply([150.0; 3], 0.6, &buf, 2, 2);
        assert_abs_diff_eq!(soft[0], blur[0], epsilon = 1e-3);
    }

    #[test]
    fn test_dehaze_gated_by_lightness() {
        let buf = PixelBuffer::filled(1, 1, [40, 40, 40, 255]);
        let p = DetailParams::new(&Adjustments::identity().with(Field::Dehaze, 100.0));

        let dark = p.apply([40.0; 3], 0.2, &buf, 0, 0);
        assert_abs_diff_eq!(dark[0], 40.0 + 215.0 * 0.3, epsilon = 1e-3);

        let bright = p.apply([40.0; 3], 0.5, &buf, 0, 0);
        assert_eq!(bright[0], 40.0);
    }

    #[test]
    fn test_texture_enhances_and_smooths() {
        let mut buf = PixelBuffer::filled(3, 3, [100, 100, 100, 255]);
        buf.set_pixel(1, 1, [120, 120, 120, 255]);

        let up = DetailParams::new(&Adjustments::identity().with(Field::Texture, 50.0))
            .apply([120.0; 3], 0.45, &buf, 1, 1);
        assert_abs_diff_eq!(up[0], 130.0, epsilon = 1e-3);

        let down = DetailParams::new(&Adjustments::identity().with(Field::Texture, -50.0))
            .apply([120.0; 3], 0.45, &buf, 1, 1);
        assert_abs_diff_eq!(down[0], 110.0, epsilon = 1e-3);
    }

    #[test]
    fn test_edge_clamped_sampling() {
        // At the corner, out-of-range taps repeat the edge pixels.
        let buf = PixelBuffer::from_fn(4, 4, |x, _| {
            let v = if x == 0 { 200 } else { 0 };
            [v, v, v, 255]
        });
        let mean = weighted_mean(&buf, 0, 0, &Kernel::texture().taps());
        // Left column (dx = -1) clamps onto x = 0, as does the center column.
        let k = Kernel::texture();
        let bright = k.data[0] + k.data[3] + k.data[6] + k.data[1] + k.data[7];
        assert_abs_diff_eq!(mean[0], 200.0 * bright, epsilon = 1e-3);
    }

    #[test]
    fn test_output_clamped() {
        let mut buf = PixelBuffer::filled(5, 5, [0, 0, 0, 255]);
        buf.set_pixel(2, 2, [255, 255, 255, 255]);
        let adj = Adjustments::uniform(100.0);
        let out = DetailParams::new(&adj).apply([255.0; 3], 0.9, &buf, 2, 2);
        assert!(out.iter().all(|&v| (0.0..=255.0).contains(&v)));
        let out = DetailParams::new(&adj).apply([0.0; 3], 0.0, &buf, 1, 1);
        assert!(out.iter().all(|&v| (0.0..=255.0).contains(&v)));
    }
}
