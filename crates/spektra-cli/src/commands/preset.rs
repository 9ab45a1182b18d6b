//! Preset command
//!
//! Writes the resolved adjustments as YAML, usable later with `--preset`.

use crate::PresetArgs;
use anyhow::{Context, Result};
use tracing::debug;

const HEADER: &str = "# Spektra adjustment preset\n# Each value is in [-100, 100]; 0 leaves the image unchanged.\n";

pub fn run(args: PresetArgs, verbose: u8) -> Result<()> {
    let adj = args.adjust.resolve()?;
    let body = adj.to_yaml_string().context("Failed to serialize preset")?;
    let text = format!("{HEADER}{body}");

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write preset: {}", path.display()))?;
            debug!(path = %path.display(), "preset written");
            if verbose > 0 {
                println!("Wrote {} ({})", path.display(), super::describe(&adj));
            }
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdjustmentArgs;
    use spektra_ops::Adjustments;

    #[test]
    fn test_preset_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warm.yaml");
        let args = PresetArgs {
            output: Some(path.clone()),
            adjust: AdjustmentArgs {
                temperature: Some(30.0),
                saturation: Some(-10.0),
                ..Default::default()
            },
        };
        run(args, 0).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Spektra"));
        let adj = Adjustments::from_yaml_str(&text).unwrap();
        assert_eq!(adj.temperature, 30.0);
        assert_eq!(adj.saturation, -10.0);
        assert_eq!(adj.exposure, 0.0);
    }
}
