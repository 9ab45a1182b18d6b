//! The adjustment vector.
//!
//! [`Adjustments`] is the sole parameter of the engine: twelve slider
//! values, each in [-100, 100], where 0 means "leave alone". The all-zero
//! vector is the identity.
//!
//! # Presets
//!
//! With the `serde` feature (default), adjustments load from YAML. Missing
//! fields default to 0 and unknown fields are rejected:
//!
//! ```rust
//! # #[cfg(feature = "serde")] {
//! use spektra_ops::Adjustments;
//!
//! let adj = Adjustments::from_yaml_str("exposure: 25\nsaturation: -40\n").unwrap();
//! assert_eq!(adj.exposure, 25.0);
//! assert_eq!(adj.saturation, -40.0);
//! assert_eq!(adj.contrast, 0.0);
//! # }
//! ```

use crate::{OpsError, OpsResult};

/// Lower bound of every adjustment field.
pub const MIN_VALUE: f32 = -100.0;

/// Upper bound of every adjustment field.
pub const MAX_VALUE: f32 = 100.0;

/// Names one of the twelve adjustment fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Multiplicative brightness, 2^(v/100).
    Exposure,
    /// Quadratic contrast around mid-gray.
    Contrast,
    /// Lift of pixels brighter than l = 0.5.
    Highlights,
    /// Lift of pixels darker than l = 0.5.
    Shadows,
    /// Lift of pixels brighter than l = 0.7.
    Whites,
    /// Crush of pixels darker than l = 0.3.
    Blacks,
    /// Warm (positive) / cool (negative) bias.
    Temperature,
    /// Magenta (positive) / green (negative) bias.
    Tint,
    /// HSL saturation scale.
    Saturation,
    /// 5x5 unsharp mask (positive) or soften (negative).
    Clarity,
    /// Lift restricted to dark tones.
    Dehaze,
    /// 3x3 high-pass detail boost or smoothing.
    Texture,
}

impl Field {
    /// Every field, in pipeline order.
    pub const ALL: [Field; 12] = [
        Field::Exposure,
        Field::Contrast,
        Field::Highlights,
        Field::Shadows,
        Field::Whites,
        Field::Blacks,
        Field::Temperature,
        Field::Tint,
        Field::Saturation,
        Field::Clarity,
        Field::Dehaze,
        Field::Texture,
    ];

    /// Lowercase field name as used in presets and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Field::Exposure => "exposure",
            Field::Contrast => "contrast",
            Field::Highlights => "highlights",
            Field::Shadows => "shadows",
            Field::Whites => "whites",
            Field::Blacks => "blacks",
            Field::Temperature => "temperature",
            Field::Tint => "tint",
            Field::Saturation => "saturation",
            Field::Clarity => "clarity",
            Field::Dehaze => "dehaze",
            Field::Texture => "texture",
        }
    }

    /// Looks a field up by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Returns `true` for the neighborhood-based effects.
    pub fn is_spatial(self) -> bool {
        matches!(self, Field::Clarity | Field::Dehaze | Field::Texture)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Twelve slider values driving one engine pass.
///
/// Value type: two vectors are equal iff every field is equal. The engine
/// only ever reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Adjustments {
    /// Exposure in hundredths of a stop.
    pub exposure: f32,
    /// Contrast.
    pub contrast: f32,
    /// Highlights.
    pub highlights: f32,
    /// Shadows.
    pub shadows: f32,
    /// Whites.
    pub whites: f32,
    /// Blacks.
    pub blacks: f32,
    /// Temperature.
    pub temperature: f32,
    /// Tint.
    pub tint: f32,
    /// Saturation.
    pub saturation: f32,
    /// Clarity.
    pub clarity: f32,
    /// Dehaze.
    pub dehaze: f32,
    /// Texture.
    pub texture: f32,
}

impl Adjustments {
    /// The identity vector (all zero).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Reads one field.
    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::Exposure => self.exposure,
            Field::Contrast => self.contrast,
            Field::Highlights => self.highlights,
            Field::Shadows => self.shadows,
            Field::Whites => self.whites,
            Field::Blacks => self.blacks,
            Field::Temperature => self.temperature,
            Field::Tint => self.tint,
            Field::Saturation => self.saturation,
            Field::Clarity => self.clarity,
            Field::Dehaze => self.dehaze,
            Field::Texture => self.texture,
        }
    }

    /// Writes one field. No range check; see [`validate`](Self::validate).
    pub fn set(&mut self, field: Field, value: f32) {
        let slot = match field {
            Field::Exposure => &mut self.exposure,
            Field::Contrast => &mut self.contrast,
            Field::Highlights => &mut self.highlights,
            Field::Shadows => &mut self.shadows,
            Field::Whites => &mut self.whites,
            Field::Blacks => &mut self.blacks,
            Field::Temperature => &mut self.temperature,
            Field::Tint => &mut self.tint,
            Field::Saturation => &mut self.saturation,
            Field::Clarity => &mut self.clarity,
            Field::Dehaze => &mut self.dehaze,
            Field::Texture => &mut self.texture,
        };
        *slot = value;
    }

    /// Builder-style [`set`](Self::set).
    ///
    /// ```rust
    /// use spektra_ops::{Adjustments, Field};
    ///
    /// let adj = Adjustments::identity().with(Field::Clarity, 40.0);
    /// assert_eq!(adj.clarity, 40.0);
    /// assert!(adj.has_detail());
    /// ```
    #[must_use]
    pub fn with(mut self, field: Field, value: f32) -> Self {
        self.set(field, value);
        self
    }

    /// Every field set to `value`.
    pub fn uniform(value: f32) -> Self {
        let mut adj = Self::default();
        for field in Field::ALL {
            adj.set(field, value);
        }
        adj
    }

    /// `(field, value)` pairs in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, f32)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Returns `true` if every field is zero.
    pub fn is_identity(&self) -> bool {
        self.iter().all(|(_, v)| v == 0.0)
    }

    /// Returns `true` if any neighborhood effect is active.
    pub fn has_detail(&self) -> bool {
        self.iter().any(|(field, v)| field.is_spatial() && v != 0.0)
    }

    /// Checks every field lies in [-100, 100].
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::OutOfRange`] for the first offending field,
    /// NaN included.
    pub fn validate(&self) -> OpsResult<()> {
        for (field, value) in self.iter() {
            if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
                return Err(OpsError::OutOfRange {
                    field: field.name(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Copy with every field clamped to [-100, 100]; NaN becomes 0.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for (field, value) in self.iter() {
            let v = if value.is_nan() {
                0.0
            } else {
                value.clamp(MIN_VALUE, MAX_VALUE)
            };
            out.set(field, v);
        }
        out
    }

    /// Parses and validates a YAML preset.
    #[cfg(feature = "serde")]
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        let adj: Self = serde_yaml::from_str(yaml)?;
        adj.validate()?;
        Ok(adj)
    }

    /// Serializes to YAML, one field per line.
    #[cfg(feature = "serde")]
    pub fn to_yaml_string(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let adj = Adjustments::default();
        assert!(adj.is_identity());
        assert!(!adj.has_detail());
        assert!(adj.validate().is_ok());
    }

    #[test]
    fn test_field_round_trip_by_name() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name(" Exposure "), Some(Field::Exposure));
        assert_eq!(Field::from_name("vibrance"), None);
    }

    #[test]
    fn test_only_detail_fields_are_spatial() {
        let spatial: Vec<Field> = Field::ALL.into_iter().filter(|f| f.is_spatial()).collect();
        assert_eq!(spatial, [Field::Clarity, Field::Dehaze, Field::Texture]);

        for field in Field::ALL {
            let adj = Adjustments::identity().with(field, -5.0);
            assert_eq!(adj.has_detail(), field.is_spatial(), "{field}");
        }
    }

    #[test]
    fn test_get_set_every_field() {
        let mut adj = Adjustments::default();
        for (i, field) in Field::ALL.into_iter().enumerate() {
            adj.set(field, i as f32);
        }
        for (i, field) in Field::ALL.into_iter().enumerate() {
            assert_eq!(adj.get(field), i as f32);
        }
        assert_eq!(adj.texture, 11.0);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let adj = Adjustments::identity().with(Field::Tint, 100.5);
        match adj.validate() {
            Err(OpsError::OutOfRange { field, value }) => {
                assert_eq!(field, "tint");
                assert_eq!(value, 100.5);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
        assert!(Adjustments::uniform(-100.0).validate().is_ok());
        assert!(Adjustments::uniform(100.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let adj = Adjustments::identity().with(Field::Shadows, f32::NAN);
        assert!(matches!(
            adj.validate(),
            Err(OpsError::OutOfRange { field: "shadows", .. })
        ));
    }

    #[test]
    fn test_clamped() {
        let adj = Adjustments::identity()
            .with(Field::Exposure, 250.0)
            .with(Field::Blacks, -300.0)
            .with(Field::Dehaze, f32::NAN)
            .clamped();
        assert_eq!(adj.exposure, 100.0);
        assert_eq!(adj.blacks, -100.0);
        assert_eq!(adj.dehaze, 0.0);
        assert!(adj.validate().is_ok());
    }

    #[test]
    fn test_value_semantics() {
        let a = Adjustments::identity().with(Field::Contrast, 10.0);
        let b = Adjustments::identity().with(Field::Contrast, 10.0);
        assert_eq!(a, b);
        assert_ne!(a, b.with(Field::Contrast, 11.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_yaml_preset_partial_and_round_trip() {
        let adj = Adjustments::from_yaml_str("clarity: 30\ntemperature: -15.5\n").unwrap();
        assert_eq!(adj.clarity, 30.0);
        assert_eq!(adj.temperature, -15.5);
        assert_eq!(adj.exposure, 0.0);

        let yaml = adj.to_yaml_string().unwrap();
        assert_eq!(Adjustments::from_yaml_str(&yaml).unwrap(), adj);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_yaml_preset_rejects_unknown_and_out_of_range() {
        assert!(matches!(
            Adjustments::from_yaml_str("vibrance: 10\n"),
            Err(OpsError::Yaml(_))
        ));
        assert!(matches!(
            Adjustments::from_yaml_str("exposure: 150\n"),
            Err(OpsError::OutOfRange { field: "exposure", .. })
        ));
    }
}
