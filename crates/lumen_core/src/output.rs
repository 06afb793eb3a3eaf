//! Framebuffer encoding and image file output.
//!
//! The renderer hands over linear RGB. Output applies gamma 2, clamps to
//! `[0, 0.999]` and scales to bytes; the file format is picked from the
//! output path's extension.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{ColorType, ImageFormat};
use lumen_math::{Color, Interval};
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("unsupported output format: {0:?}")]
    UnsupportedFormat(String),

    #[error("framebuffer holds {actual} pixels, expected {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

pub type OutputResult<T> = Result<T, OutputError>;

const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Gamma-2 encode one linear channel and scale it to `0..=255`.
#[inline]
pub fn encode_component(linear: f32) -> u8 {
    let gamma = if linear > 0.0 { linear.sqrt() } else { 0.0 };
    (256.0 * INTENSITY.clamp(gamma)) as u8
}

fn encode_pixel(color: Color) -> [u8; 3] {
    [
        encode_component(color.x),
        encode_component(color.y),
        encode_component(color.z),
    ]
}

fn check_size(width: u32, height: u32, pixels: &[Color]) -> OutputResult<()> {
    if pixels.len() != width as usize * height as usize {
        return Err(OutputError::SizeMismatch {
            width,
            height,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Write a plain-text P3 image.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    pixels: &[Color],
) -> OutputResult<()> {
    check_size(width, height, pixels)?;

    writeln!(writer, "P3\n{} {}\n255", width, height)?;
    for &color in pixels {
        let [r, g, b] = encode_pixel(color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }
    writer.flush()?;
    Ok(())
}

fn raster_format(ext: &str) -> Option<ImageFormat> {
    match ext {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "bmp" => Some(ImageFormat::Bmp),
        "tga" => Some(ImageFormat::Tga),
        _ => None,
    }
}

/// Write a linear framebuffer (row-major, top row first) to `path`.
///
/// `.ppm` is written as ASCII P3; `.png`, `.jpg`/`.jpeg`, `.bmp` and `.tga`
/// go through the `image` crate. Anything else is rejected before the file
/// is created.
pub fn write_image<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    pixels: &[Color],
) -> OutputResult<()> {
    let path = path.as_ref();
    check_size(width, height, pixels)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ext == "ppm" {
        let mut writer = BufWriter::new(File::create(path)?);
        write_ppm(&mut writer, width, height, pixels)?;
    } else {
        let format = raster_format(&ext).ok_or_else(|| OutputError::UnsupportedFormat(ext))?;
        let bytes: Vec<u8> = pixels.iter().flat_map(|&c| encode_pixel(c)).collect();
        image::save_buffer_with_format(path, &bytes, width, height, ColorType::Rgb8, format)?;
    }

    log::info!("Wrote {} ({}x{})", path.display(), width, height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lumen_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component(0.0), 0);
        assert_eq!(encode_component(-1.0), 0);
        assert_eq!(encode_component(f32::NAN), 0);
        // sqrt(0.25) = 0.5 -> 128
        assert_eq!(encode_component(0.25), 128);
        // Clamped to 0.999 before scaling
        assert_eq!(encode_component(1.0), 255);
        assert_eq!(encode_component(4.0), 255);
    }

    #[test]
    fn test_write_ppm() {
        let pixels = vec![
            Color::new(1.0, 0.0, 0.0),
            Color::new(0.0, 0.25, 0.0),
        ];
        let mut out = Vec::new();
        write_ppm(&mut out, 2, 1, &pixels).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 0 0\n0 128 0\n");
    }

    #[test]
    fn test_size_mismatch() {
        let err = write_ppm(&mut Vec::new(), 2, 2, &[Color::ZERO]).unwrap_err();
        assert!(matches!(err, OutputError::SizeMismatch { actual: 1, .. }));
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let path = temp_path("out.xyz");
        let err = write_image(&path, 1, 1, &[Color::ONE]).unwrap_err();

        assert!(matches!(err, OutputError::UnsupportedFormat(ref e) if e == "xyz"));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let err = write_image(temp_path("noext"), 1, 1, &[Color::ONE]).unwrap_err();
        assert!(matches!(err, OutputError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_write_png_roundtrip() {
        let path = temp_path("out.PNG");
        let pixels = vec![Color::new(0.25, 0.0, 1.0); 4];
        write_image(&path, 2, 2, &pixels).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 1).0, [128, 0, 255]);
    }

    #[test]
    fn test_write_ppm_file() {
        let path = temp_path("out.ppm");
        write_image(&path, 1, 1, &[Color::ZERO]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.starts_with("P3\n1 1\n255\n"));
    }
}
