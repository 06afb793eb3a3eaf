//! Lumen Core - the file-facing side of the lumen path tracer.
//!
//! This crate provides:
//!
//! - **Mesh loading**: OBJ files into a flat triangle `Mesh`
//! - **Texture images**: decoded, linearised pixel data for image textures
//! - **Output**: gamma encoding and writing of a linear framebuffer
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{load_obj, write_image};
//!
//! let mesh = load_obj("model/teapot.obj")?;
//! println!("Loaded {} triangles", mesh.triangle_count());
//!
//! write_image("out.png", width, height, &pixels)?;
//! ```

pub mod image_data;
pub mod mesh;
pub mod output;

// Re-export commonly used types
pub use image_data::{srgb_to_linear, ImageData, ImageLoadError, ImageResult};
pub use mesh::{load_obj, Mesh, MeshError, MeshResult};
pub use output::{encode_component, write_image, write_ppm, OutputError, OutputResult};
