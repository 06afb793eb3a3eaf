//! Decoded image data for image textures.
//!
//! Images are decoded with the `image` crate and stored as linear RGB floats
//! so texture lookups never touch sRGB bytes.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable naming an extra directory to search for images.
pub const IMAGE_DIR_ENV: &str = "LUMEN_IMAGES";

/// Errors that can occur while loading an image.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("could not find image {0}")]
    NotFound(String),

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub type ImageResult<T> = Result<T, ImageLoadError>;

/// A decoded image in linear RGB.
#[derive(Clone, Debug)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Row-major pixels, top row first
    pub pixels: Vec<[f32; 3]>,

    /// Source path (for debugging)
    pub path: String,
}

impl ImageData {
    /// Create image data from already-linear pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Decode an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> ImageResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let img = image::open(path).map_err(|source| ImageLoadError::Decode {
            path: display.clone(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| {
                [
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                ]
            })
            .collect();

        log::debug!("Loaded image {} ({}x{})", display, width, height);
        Ok(Self::new(width, height, pixels, display))
    }

    /// Locate `filename` in the usual image directories and decode it.
    ///
    /// Searches `$LUMEN_IMAGES`, the working directory, then `images/` in the
    /// working directory and up to three parents.
    pub fn find(filename: &str) -> ImageResult<Self> {
        let path = search_paths(filename)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| ImageLoadError::NotFound(filename.to_string()))?;
        Self::open(path)
    }

    /// Pixel at integer coordinates, clamped to the image edges.
    ///
    /// An empty image yields magenta.
    pub fn pixel(&self, x: i64, y: i64) -> [f32; 3] {
        if self.width == 0 || self.height == 0 {
            return [1.0, 0.0, 1.0];
        }
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixels
            .get(y * self.width as usize + x)
            .copied()
            .unwrap_or([1.0, 0.0, 1.0])
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn search_paths(filename: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(dir) = std::env::var(IMAGE_DIR_ENV) {
        paths.push(Path::new(&dir).join(filename));
    }
    paths.push(PathBuf::from(filename));

    let mut prefix = PathBuf::new();
    for _ in 0..4 {
        paths.push(prefix.join("images").join(filename));
        prefix.push("..");
    }
    paths
}

/// Convert an sRGB byte value to linear float.
pub fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
