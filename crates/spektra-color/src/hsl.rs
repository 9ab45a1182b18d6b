//! RGB <-> HSL conversion.
//!
//! Channels are on the 0..=255 scale as `f32`. Values slightly outside that
//! range (an unclamped intermediate from the tone stage) are accepted and
//! converted with the same formulas.
//!
//! # Formulas
//!
//! ```text
//! l = (max + min) / 2
//! s = d / (max + min)          if l <= 0.5
//!   = d / (2 - max - min)      if l >  0.5
//! h = ((g - b) / d + (g < b ? 6 : 0)) / 6   max is red
//!   = ((b - r) / d + 2) / 6                 max is green
//!   = ((r - g) / d + 4) / 6                 max is blue
//! ```
//!
//! A gray input (`max == min`) yields `h = s = 0`.

/// Transient hue / saturation / lightness triple, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    /// Hue as a fraction of a full turn.
    pub h: f32,
    /// Saturation.
    pub s: f32,
    /// Lightness, `(max + min) / 2`.
    pub l: f32,
}

impl Hsl {
    /// Creates a triple from its components.
    #[inline]
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Converts back to RGB on the 0..=255 scale.
    #[inline]
    pub fn to_rgb(self) -> [f32; 3] {
        hsl_to_rgb(self.h, self.s, self.l)
    }

    /// Returns a copy with saturation multiplied by `factor` and clamped to [0, 1].
    #[inline]
    pub fn scale_saturation(self, factor: f32) -> Self {
        Self {
            s: (self.s * factor).clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Converts RGB (0..=255) to HSL.
///
/// Ties between maximal channels resolve red first, then green.
///
/// ```rust
/// use spektra_color::rgb_to_hsl;
///
/// let gray = rgb_to_hsl(128.0, 128.0, 128.0);
/// assert_eq!(gray.s, 0.0);
/// assert_eq!(gray.h, 0.0);
/// ```
#[inline]
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> Hsl {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h / 6.0, s, l)
}

/// HSL lightness of an RGB triple (0..=255 in, [0, 1] out).
///
/// Same value as `rgb_to_hsl(r, g, b).l` without the hue and saturation work.
#[inline]
pub fn lightness(r: f32, g: f32, b: f32) -> f32 {
    let max = r.max(g).max(b) / 255.0;
    let min = r.min(g).min(b) / 255.0;
    (max + min) / 2.0
}

/// Converts HSL back to RGB on the 0..=255 scale.
///
/// The result is not clamped; callers quantize or clamp as needed.
#[inline]
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s == 0.0 {
        let v = l * 255.0;
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(p, q, h) * 255.0,
        hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
    ]
}

/// Evaluates one channel of the HSL hue ramp at position `t`.
///
/// `t` wraps once into [0, 1].
#[inline]
pub fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_primary_hues() {
        assert_abs_diff_eq!(rgb_to_hsl(255.0, 0.0, 0.0).h, 0.0);
        assert_abs_diff_eq!(rgb_to_hsl(0.0, 255.0, 0.0).h, 1.0 / 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rgb_to_hsl(0.0, 0.0, 255.0).h, 2.0 / 3.0, epsilon = 1e-6);
        // Magenta sits in the red sector with g < b.
        assert_abs_diff_eq!(rgb_to_hsl(255.0, 0.0, 255.0).h, 5.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_warm_orange_components() {
        let hsl = rgb_to_hsl(200.0, 150.0, 100.0);
        assert_abs_diff_eq!(hsl.h, 1.0 / 12.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hsl.s, 100.0 / 210.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hsl.l, 150.0 / 255.0, epsilon = 1e-5);
    }

    #[test]
    fn test_gray_is_degenerate() {
        let hsl = rgb_to_hsl(128.0, 128.0, 128.0);
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl.h, 0.0);
        assert_abs_diff_eq!(hsl.l, 128.0 / 255.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_saturation_ignores_hue() {
        for h in [0.0, 0.25, 0.5, 0.9] {
            let [r, g, b] = hsl_to_rgb(h, 0.0, 0.4);
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert_abs_diff_eq!(r, 0.4 * 255.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_round_trip_within_one_level() {
        let samples = [
            [200.0, 150.0, 100.0],
            [12.0, 200.0, 37.0],
            [255.0, 0.0, 128.0],
            [1.0, 2.0, 3.0],
            [250.0, 251.0, 10.0],
            [90.0, 30.0, 240.0],
        ];
        for [r, g, b] in samples {
            let [r2, g2, b2] = rgb_to_hsl(r, g, b).to_rgb();
            assert_abs_diff_eq!(r2, r, epsilon = 1.0 / 255.0);
            assert_abs_diff_eq!(g2, g, epsilon = 1.0 / 255.0);
            assert_abs_diff_eq!(b2, b, epsilon = 1.0 / 255.0);
        }
    }

    #[test]
    fn test_lightness_matches_full_conversion() {
        for [r, g, b] in [[10.0, 220.0, 30.0], [0.0, 0.0, 0.0], [255.0, 255.0, 254.0]] {
            assert_abs_diff_eq!(lightness(r, g, b), rgb_to_hsl(r, g, b).l, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_scale_saturation_clamps() {
        let hsl = Hsl::new(0.1, 0.8, 0.5);
        assert_eq!(hsl.scale_saturation(2.0).s, 1.0);
        assert_eq!(hsl.scale_saturation(0.0).s, 0.0);
        assert_abs_diff_eq!(hsl.scale_saturation(0.5).s, 0.4);
    }

    #[test]
    fn test_hue_wraps() {
        // t = -0.2 wraps to 0.8, past the last ramp segment.
        assert_eq!(hue_to_rgb(0.1, 0.9, -0.2), 0.1);
        // t = 1.1 wraps to ~0.1, on the rising ramp.
        assert_abs_diff_eq!(hue_to_rgb(0.0, 1.0, 1.1), 0.6, epsilon = 1e-5);
    }
}
