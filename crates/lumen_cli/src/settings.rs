//! Render settings layered over a scene's defaults.
//!
//! Precedence, lowest first: scene defaults, the JSON settings file, CLI flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lumen_renderer::{Camera, RenderConfig, RenderMode};
use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Optional overrides; unset fields leave the underlying value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub image_width: Option<u32>,
    pub aspect_ratio: Option<f32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub mode: Option<String>,
    pub tile_size: Option<u32>,
    pub seed: Option<u64>,
    pub output: Option<String>,
}

impl RenderSettings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// The overrides given on the command line.
    pub fn from_args(args: &Args) -> Self {
        Self {
            image_width: args.width,
            aspect_ratio: None,
            samples_per_pixel: args.samples,
            max_depth: args.depth,
            mode: args.mode.clone(),
            tile_size: args.tile_size,
            seed: args.seed,
            output: args.output.clone(),
        }
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged(self, other: RenderSettings) -> Self {
        Self {
            image_width: other.image_width.or(self.image_width),
            aspect_ratio: other.aspect_ratio.or(self.aspect_ratio),
            samples_per_pixel: other.samples_per_pixel.or(self.samples_per_pixel),
            max_depth: other.max_depth.or(self.max_depth),
            mode: other.mode.or(self.mode),
            tile_size: other.tile_size.or(self.tile_size),
            seed: other.seed.or(self.seed),
            output: other.output.or(self.output),
        }
    }

    /// Apply the overrides to a scene camera and the scheduling config.
    pub fn apply(&self, mut camera: Camera, mut config: RenderConfig) -> Result<(Camera, RenderConfig)> {
        if let Some(width) = self.image_width {
            camera.image_width = width;
        }
        if let Some(aspect) = self.aspect_ratio {
            camera.aspect_ratio = aspect;
        }
        if let Some(samples) = self.samples_per_pixel {
            camera.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            camera.max_depth = depth;
        }
        if let Some(output) = &self.output {
            camera.output_filename = output.clone();
        }

        if let Some(mode) = &self.mode {
            config.mode = mode.parse::<RenderMode>()?;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        Ok((camera, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_partial_json() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "samples_per_pixel": 64, "mode": "rows" }"#).unwrap();
        assert_eq!(settings.samples_per_pixel, Some(64));
        assert_eq!(settings.mode.as_deref(), Some("rows"));
        assert!(settings.image_width.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<RenderSettings, _> =
            serde_json::from_str(r#"{ "samples": 64 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = RenderSettings {
            image_width: Some(400),
            samples_per_pixel: Some(64),
            seed: Some(1),
            ..Default::default()
        };
        let args = Args::try_parse_from(["lumen", "--width", "200", "--mode", "serial"]).unwrap();
        let merged = file.merged(RenderSettings::from_args(&args));

        assert_eq!(merged.image_width, Some(200));
        assert_eq!(merged.samples_per_pixel, Some(64));
        assert_eq!(merged.seed, Some(1));
        assert_eq!(merged.mode.as_deref(), Some("serial"));
    }

    #[test]
    fn test_apply_keeps_scene_defaults() {
        let camera = Camera::new().with_image(600, 1.0).with_quality(100, 50);
        let settings = RenderSettings {
            samples_per_pixel: Some(4),
            tile_size: Some(16),
            output: Some("out.ppm".to_string()),
            ..Default::default()
        };
        let (camera, config) = settings.apply(camera, RenderConfig::default()).unwrap();

        assert_eq!(camera.image_width, 600);
        assert_eq!(camera.samples_per_pixel, 4);
        assert_eq!(camera.max_depth, 50);
        assert_eq!(camera.output_filename, "out.ppm");
        assert_eq!(config.mode, RenderMode::Tiles);
        assert_eq!(config.tile_size, 16);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_apply_rejects_bad_mode() {
        let settings = RenderSettings {
            mode: Some("gpu".to_string()),
            ..Default::default()
        };
        assert!(settings.apply(Camera::new(), RenderConfig::default()).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lumen_settings_{}.json", std::process::id()));
        fs::write(&path, r#"{ "image_width": 320, "seed": 9 }"#).unwrap();
        let settings = RenderSettings::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(settings.image_width, Some(320));
        assert_eq!(settings.seed, Some(9));

        let err = RenderSettings::load(Path::new("/no/such/settings.json")).unwrap_err();
        assert!(err.to_string().contains("settings.json"));
    }
}
