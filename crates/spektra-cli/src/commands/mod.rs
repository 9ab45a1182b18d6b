//! CLI command implementations

pub mod adjust;
pub mod info;
pub mod preset;
pub mod preview;

use crate::AdjustmentArgs;
use anyhow::{Context, Result};
use spektra_core::PixelBuffer;
use spektra_io::WriteOptions;
use spektra_ops::{Adjustments, Field};
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    spektra_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer, quality: u8) -> Result<()> {
    spektra_io::write_with(path, image, &WriteOptions { quality })
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Load a YAML preset
pub fn load_preset(path: &Path) -> Result<Adjustments> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read preset: {}", path.display()))?;
    Adjustments::from_yaml_str(&text)
        .with_context(|| format!("Invalid preset: {}", path.display()))
}

impl AdjustmentArgs {
    /// Fields given on the command line.
    fn overrides(&self) -> impl Iterator<Item = (Field, f32)> {
        [
            (Field::Exposure, self.exposure),
            (Field::Contrast, self.contrast),
            (Field::Highlights, self.highlights),
            (Field::Shadows, self.shadows),
            (Field::Whites, self.whites),
            (Field::Blacks, self.blacks),
            (Field::Temperature, self.temperature),
            (Field::Tint, self.tint),
            (Field::Saturation, self.saturation),
            (Field::Clarity, self.clarity),
            (Field::Dehaze, self.dehaze),
            (Field::Texture, self.texture),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }

    /// Preset (if any) with command-line values applied on top, validated.
    pub fn resolve(&self) -> Result<Adjustments> {
        let mut adj = match &self.preset {
            Some(path) => load_preset(path)?,
            None => Adjustments::identity(),
        };
        for (field, value) in self.overrides() {
            adj.set(field, value);
        }
        adj.validate().context("Invalid adjustment")?;
        Ok(adj)
    }
}

/// One-line summary of the non-zero fields
pub fn describe(adj: &Adjustments) -> String {
    let parts: Vec<String> = adj
        .iter()
        .filter(|(_, v)| *v != 0.0)
        .map(|(f, v)| format!("{f}={v}"))
        .collect();
    if parts.is_empty() {
        "identity".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_flags_only() {
        let args = AdjustmentArgs {
            exposure: Some(10.0),
            tint: Some(-5.0),
            ..Default::default()
        };
        let adj = args.resolve().unwrap();
        assert_eq!(adj.exposure, 10.0);
        assert_eq!(adj.tint, -5.0);
        assert_eq!(adj.contrast, 0.0);
    }

    #[test]
    fn test_flags_override_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.yaml");
        std::fs::write(&path, "exposure: 20\nclarity: 35\n").unwrap();

        let args = AdjustmentArgs {
            preset: Some(path),
            exposure: Some(-40.0),
            ..Default::default()
        };
        let adj = args.resolve().unwrap();
        assert_eq!(adj.exposure, -40.0);
        assert_eq!(adj.clarity, 35.0);
    }

    #[test]
    fn test_resolve_rejects_out_of_range() {
        let args = AdjustmentArgs {
            saturation: Some(150.0),
            ..Default::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(format!("{err:#}").contains("saturation"));
    }

    #[test]
    fn test_missing_preset() {
        let args = AdjustmentArgs {
            preset: Some("/nonexistent/look.yaml".into()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&Adjustments::identity()), "identity");
        let adj = Adjustments::identity()
            .with(Field::Exposure, 10.0)
            .with(Field::Texture, -3.5);
        assert_eq!(describe(&adj), "exposure=10 texture=-3.5");
    }
}
