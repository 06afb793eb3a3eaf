use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Random small spheres around three large ones
    Spheres,
    /// Two checker textured spheres
    Checkered,
    /// Image textured globe (needs --texture)
    Earth,
    /// Marble noise spheres
    Perlin,
    /// Five coloured quads
    Quads,
    /// Noise spheres lit by a sphere and a quad emitter
    Light,
    /// Cornell box with rotated boxes, a sphere and a pyramid
    Cornell,
    /// Everything: media, motion blur, instancing, textures
    Final,
    /// OBJ model inside a Cornell box (needs --model)
    Model,
}

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(version, about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "spheres")]
    pub scene: SceneKind,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Work scheduling: serial, rows or tiles
    #[arg(long, value_parser = ["serial", "rows", "tiles"])]
    pub mode: Option<String>,

    /// Tile edge in pixels for tile mode
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Fixed seed for a reproducible render
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file (.png, .jpg, .bmp, .tga or .ppm)
    #[arg(short, long)]
    pub output: Option<String>,

    /// OBJ file for the model scene
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Image file for the earth and final scenes
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// JSON render settings, overridden by the flags above
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
