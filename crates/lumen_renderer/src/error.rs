//! Error type for scene setup and rendering.

use lumen_core::{ImageLoadError, MeshError, OutputError};
use lumen_math::MathError;
use thiserror::Error;

/// Errors that can occur while preparing or writing a render.
///
/// Geometry degeneracies are never errors; they are reported as misses.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Image(#[from] ImageLoadError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type RenderResult<T> = Result<T, RenderError>;
