//! Per-pixel tone and color stage.
//!
//! Nine steps in a fixed order. Steps 3 to 6 are gated by the lightness of
//! the *source* pixel, not the progressively adjusted value; saturation
//! recomputes HSL from the adjusted channels.
//!
//! ```text
//! 1 exposure     c *= 2^(exposure/100)                      clamp
//! 2 contrast     c = 128 + (c - 128) * ((contrast+100)/100)^2  clamp
//! 3 whites       l > 0.7   c += (255 - c) * w (l - 0.7) 3   clamp
//! 4 blacks       l < 0.3   c -= c * b (0.3 - l) 3           clamp
//! 5 highlights   l > 0.5   c += (255 - c) * h (l - 0.5) 2   clamp
//! 6 shadows      l < 0.5   c += c * s (0.5 - l) 2           clamp
//! 7 temperature  warm: +r +g -b   cool: -r -g +b            one-sided clamps
//! 8 tint         magenta: +r -g +b   green: -r +g -b        one-sided clamps
//! 9 saturation   HSL s *= (saturation+100)/100, clamp [0, 1]
//! ```
//!
//! The clamp points are load-bearing: a later step's nonlinearity sees the
//! clamped value.

use spektra_color::{lightness, rgb_to_hsl};
use spektra_core::{PixelBuffer, CHANNELS};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{Adjustments, OpsResult};

#[inline]
fn clamp255(v: f32) -> f32 {
    v.clamp(0.0, 255.0)
}

/// Moves `c` toward white by fraction `amount`.
#[inline]
fn lift(c: f32, amount: f32) -> f32 {
    c + (255.0 - c) * amount
}

/// Moves `c` toward black by fraction `amount`.
#[inline]
fn crush(c: f32, amount: f32) -> f32 {
    c - c * amount
}

/// Factors derived once per pass from an [`Adjustments`] vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    /// `2^(exposure/100)`.
    pub exposure_gain: f32,
    /// `((contrast+100)/100)^2`.
    pub contrast_gain: f32,
    /// `whites/100`.
    pub whites: f32,
    /// `blacks/100`.
    pub blacks: f32,
    /// `highlights/100`.
    pub highlights: f32,
    /// `shadows/100`.
    pub shadows: f32,
    /// `temperature/100`.
    pub temperature: f32,
    /// `tint/100`.
    pub tint: f32,
    /// `(saturation+100)/100`.
    pub saturation_gain: f32,
}

impl ToneParams {
    /// Derives the per-pass factors.
    pub fn new(adj: &Adjustments) -> Self {
        Self {
            exposure_gain: 2.0_f32.powf(adj.exposure / 100.0),
            contrast_gain: ((adj.contrast + 100.0) / 100.0).powi(2),
            whites: adj.whites / 100.0,
            blacks: adj.blacks / 100.0,
            highlights: adj.highlights / 100.0,
            shadows: adj.shadows / 100.0,
            temperature: adj.temperature / 100.0,
            tint: adj.tint / 100.0,
            saturation_gain: (adj.saturation + 100.0) / 100.0,
        }
    }

    /// Runs steps 1 to 9 on one pixel.
    ///
    /// `rgb` is on the 0..=255 scale; `l` is the HSL lightness of the
    /// source pixel. The result is unclamped after step 9 and may stray a
    /// hair outside [0, 255].
    pub fn apply(&self, rgb: [f32; 3], l: f32) -> [f32; 3] {
        let [mut r, mut g, mut b] = rgb;

        r = clamp255(r * self.exposure_gain);
        g = clamp255(g * self.exposure_gain);
        b = clamp255(b * self.exposure_gain);

        let k = self.contrast_gain;
        r = clamp255(128.0 + (r - 128.0) * k);
        g = clamp255(128.0 + (g - 128.0) * k);
        b = clamp255(128.0 + (b - 128.0) * k);

        if l > 0.7 {
            let a = self.whites * (l - 0.7) * 3.0;
            r = clamp255(lift(r, a));
            g = clamp255(lift(g, a));
            b = clamp255(lift(b, a));
        }

        if l < 0.3 {
            let a = self.blacks * (0.3 - l) * 3.0;
            r = clamp255(crush(r, a));
            g = clamp255(crush(g, a));
            b = clamp255(crush(b, a));
        }

        if l > 0.5 {
            let a = self.highlights * (l - 0.5) * 2.0;
            r = clamp255(lift(r, a));
            g = clamp255(lift(g, a));
            b = clamp255(lift(b, a));
        }

        if l < 0.5 {
            let a = self.shadows * (0.5 - l) * 2.0;
            r = clamp255(r + r * a);
            g = clamp255(g + g * a);
            b = clamp255(b + b * a);
        }

        let t = self.temperature;
        if t > 0.0 {
            r = lift(r, t * 0.5).min(255.0);
            g = lift(g, t * 0.3).min(255.0);
            b = crush(b, t * 0.2).max(0.0);
        } else if t < 0.0 {
            let k = t.abs();
            r = crush(r, k * 0.2).max(0.0);
            g = crush(g, k * 0.2).max(0.0);
            b = lift(b, k * 0.5).min(255.0);
        }

        let t = self.tint;
        if t > 0.0 {
            r = lift(r, t * 0.4).min(255.0);
            g = crush(g, t * 0.2).max(0.0);
            b = lift(b, t * 0.4).min(255.0);
        } else if t < 0.0 {
            let k = t.abs();
            r = crush(r, k * 0.2).max(0.0);
            g = lift(g, k * 0.4).min(255.0);
            b = crush(b, k * 0.2).max(0.0);
        }

        rgb_to_hsl(r, g, b)
            .scale_saturation(self.saturation_gain)
            .to_rgb()
    }
}

/// Lightness of the RGB part of an RGBA sample slice.
#[inline]
pub(crate) fn sample_lightness(px: &[u8]) -> f32 {
    lightness(px[0] as f32, px[1] as f32, px[2] as f32)
}

/// Rounds to the nearest level (ties to even) and clamps to [0, 255].
///
/// Matches how a browser canvas stores floats into its clamped byte array.
#[inline]
pub fn quantize(v: f32) -> u8 {
    clamp255(v).round_ties_even() as u8
}

/// Runs the tone stage over `src`, writing quantized pixels into `dst`.
///
/// Alpha is copied unchanged. `dst` must already have `src`'s dimensions.
pub fn apply_tone_stage(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    adj: &Adjustments,
) -> OpsResult<()> {
    trace!(width = src.width(), height = src.height(), "apply_tone_stage");
    src.ensure_same_dimensions(dst)?;

    let params = ToneParams::new(adj);
    for (s, d) in src
        .as_raw()
        .chunks_exact(CHANNELS)
        .zip(dst.as_raw_mut().chunks_exact_mut(CHANNELS))
    {
        let l = sample_lightness(s);
        let [r, g, b] = params.apply([s[0] as f32, s[1] as f32, s[2] as f32], l);
        d[0] = quantize(r);
        d[1] = quantize(g);
        d[2] = quantize(b);
        d[3] = s[3];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;
    use approx::assert_abs_diff_eq;
    use spektra_color::hsl_to_rgb;

    fn tone(adj: Adjustments, rgb: [f32; 3]) -> [f32; 3] {
        let l = lightness(rgb[0], rgb[1], rgb[2]);
        ToneParams::new(&adj).apply(rgb, l)
    }

    #[test]
    fn test_identity_params() {
        let p = ToneParams::new(&Adjustments::identity());
        assert_eq!(p.exposure_gain, 1.0);
        assert_eq!(p.contrast_gain, 1.0);
        assert_eq!(p.saturation_gain, 1.0);
    }

    #[test]
    fn test_identity_pixel() {
        for rgb in [[0.0, 0.0, 0.0], [255.0, 255.0, 255.0], [200.0, 150.0, 100.0], [3.0, 250.0, 77.0]] {
            let out = tone(Adjustments::identity(), rgb);
            for c in 0..3 {
                assert_eq!(quantize(out[c]), rgb[c] as u8);
            }
        }
    }

    #[test]
    fn test_exposure_one_stop() {
        let out = tone(Adjustments::identity().with(Field::Exposure, 100.0), [50.0, 60.0, 70.0]);
        assert_abs_diff_eq!(out[0], 100.0, epsilon = 0.01);
        assert_abs_diff_eq!(out[1], 120.0, epsilon = 0.01);
        assert_abs_diff_eq!(out[2], 140.0, epsilon = 0.01);
    }

    #[test]
    fn test_exposure_clamps_before_contrast() {
        // 200 * 2 = 400 clamps to 255 before the contrast step sees it.
        let adj = Adjustments::identity()
            .with(Field::Exposure, 100.0)
            .with(Field::Contrast, -50.0);
        let out = tone(adj, [200.0, 200.0, 200.0]);
        assert_abs_diff_eq!(out[0], 128.0 + 127.0 * 0.25, epsilon = 0.01);
    }

    #[test]
    fn test_contrast_pivots_on_128() {
        let adj = Adjustments::identity().with(Field::Contrast, 100.0);
        let mid = tone(adj, [128.0, 128.0, 128.0]);
        assert_abs_diff_eq!(mid[0], 128.0, epsilon = 0.01);
        let out = tone(adj, [100.0, 100.0, 100.0]);
        assert_abs_diff_eq!(out[0], 128.0 - 28.0 * 4.0, epsilon = 0.01);
    }

    #[test]
    fn test_tone_regions_are_gated_by_source_lightness() {
        // Dark pixel: highlights and whites must not touch it.
        let dark = [40.0, 40.0, 40.0];
        let adj = Adjustments::identity()
            .with(Field::Highlights, 100.0)
            .with(Field::Whites, 100.0);
        assert_abs_diff_eq!(tone(adj, dark)[0], 40.0, epsilon = 0.01);

        // Bright pixel: shadows and blacks must not touch it.
        let bright = [230.0, 230.0, 230.0];
        let adj = Adjustments::identity()
            .with(Field::Shadows, 100.0)
            .with(Field::Blacks, 100.0);
        assert_abs_diff_eq!(tone(adj, bright)[0], 230.0, epsilon = 0.01);
    }

    #[test]
    fn test_shadows_lift_dark_pixel() {
        let l = 40.0 / 255.0;
        let expected = 40.0 + 40.0 * (0.5 - l) * 2.0 * 0.5;
        let out = tone(Adjustments::identity().with(Field::Shadows, 50.0), [40.0, 40.0, 40.0]);
        assert_abs_diff_eq!(out[0], expected, epsilon = 0.01);
    }

    #[test]
    fn test_blacks_crush_dark_pixel() {
        let l = 20.0 / 255.0;
        let expected = 20.0 - 20.0 * (0.3 - l) * 3.0;
        let out = tone(Adjustments::identity().with(Field::Blacks, 100.0), [20.0, 20.0, 20.0]);
        assert_abs_diff_eq!(out[0], expected, epsilon = 0.01);
    }

    #[test]
    fn test_temperature_warm_and_cool() {
        let gray = [100.0, 100.0, 100.0];
        let warm = tone(Adjustments::identity().with(Field::Temperature, 100.0), gray);
        assert!(warm[0] > warm[1] && warm[1] > warm[2]);

        let cool = tone(Adjustments::identity().with(Field::Temperature, -100.0), gray);
        assert!(cool[2] > cool[0]);
        assert_abs_diff_eq!(cool[0], cool[1], epsilon = 0.01);
    }

    #[test]
    fn test_tint_magenta_and_green() {
        let gray = [100.0, 100.0, 100.0];
        let magenta = tone(Adjustments::identity().with(Field::Tint, 100.0), gray);
        assert!(magenta[0] > magenta[1] && magenta[2] > magenta[1]);

        let green = tone(Adjustments::identity().with(Field::Tint, -100.0), gray);
        assert!(green[1] > green[0] && green[1] > green[2]);
    }

    #[test]
    fn test_saturation_scenario() {
        let adj = Adjustments::identity().with(Field::Saturation, 50.0);
        let out = tone(adj, [200.0, 150.0, 100.0]);

        let hsl = rgb_to_hsl(200.0, 150.0, 100.0);
        assert_abs_diff_eq!(hsl.h, 0.0833, epsilon = 1e-3);
        assert_abs_diff_eq!(hsl.l, 0.588, epsilon = 1e-3);
        let expected = hsl_to_rgb(hsl.h, (hsl.s * 1.5).min(1.0), hsl.l);
        for c in 0..3 {
            assert_abs_diff_eq!(out[c], expected[c], epsilon = 1e-3);
        }
        // Lightness is preserved, spread widens.
        assert_abs_diff_eq!(lightness(out[0], out[1], out[2]), hsl.l, epsilon = 1e-3);
        assert!(out[0] - out[2] > 100.0);
    }

    #[test]
    fn test_full_desaturation_is_gray() {
        let out = tone(Adjustments::identity().with(Field::Saturation, -100.0), [200.0, 50.0, 10.0]);
        assert_abs_diff_eq!(out[0], out[1], epsilon = 1e-3);
        assert_abs_diff_eq!(out[1], out[2], epsilon = 1e-3);
    }

    #[test]
    fn test_exposure_is_monotonic() {
        let px = [90.0, 140.0, 30.0];
        let mut prev = tone(Adjustments::identity().with(Field::Exposure, -100.0), px);
        for step in -9..=10 {
            let adj = Adjustments::identity().with(Field::Exposure, step as f32 * 10.0);
            let out = tone(adj, px);
            for c in 0..3 {
                assert!(out[c] + 1e-3 >= prev[c]);
            }
            prev = out;
        }
    }

    #[test]
    fn test_extremes_stay_in_range() {
        for v in [-100.0, 100.0] {
            let p = ToneParams::new(&Adjustments::uniform(v));
            for r in (0..=255).step_by(51) {
                for g in (0..=255).step_by(85) {
                    let rgb = [r as f32, g as f32, 255.0 - r as f32];
                    let out = p.apply(rgb, lightness(rgb[0], rgb[1], rgb[2]));
                    for c in out {
                        assert!((-0.01..=255.01).contains(&c), "{c} out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn test_quantize_ties_to_even() {
        assert_eq!(quantize(2.5), 2);
        assert_eq!(quantize(3.5), 4);
        assert_eq!(quantize(-4.0), 0);
        assert_eq!(quantize(300.0), 255);
    }

    #[test]
    fn test_stage_preserves_alpha_and_checks_size() {
        let src = PixelBuffer::filled(2, 2, [10, 20, 30, 77]);
        let mut dst = PixelBuffer::new(2, 2);
        apply_tone_stage(&src, &mut dst, &Adjustments::identity().with(Field::Exposure, 50.0)).unwrap();
        assert!(dst.pixels().all(|(_, _, px)| px[3] == 77));
        assert!(dst.pixel(0, 0)[0] > 10);

        let mut wrong = PixelBuffer::new(3, 2);
        assert!(apply_tone_stage(&src, &mut wrong, &Adjustments::identity()).is_err());
    }
}
