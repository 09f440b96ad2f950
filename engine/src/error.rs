//! Errors

use thiserror::Error;

/// Errors reported by the renderer before or after a job runs. Cooperative
/// aborts are not errors.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Image resolution is zero or exceeds the supported maximum.
    #[error("invalid image resolution {width}x{height} (each side must be in 1..={max})")]
    InvalidResolution {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
        /// Largest supported side.
        max: usize,
    },

    /// Samples per pixel is zero.
    #[error("samples per pixel must be at least 1")]
    InvalidSampleCount,

    /// Worker thread count is zero.
    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    /// Tile edge is zero.
    #[error("tile size must be at least 1")]
    InvalidTileSize,

    /// Camera parameters do not describe a valid view.
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    /// A worker thread could not be started.
    #[error("failed to spawn worker thread")]
    ThreadSpawn(#[source] std::io::Error),

    /// One or more tasks panicked. Reported after every other task finished.
    #[error("{failed} render task(s) failed")]
    TaskFailed {
        /// Number of tasks that panicked.
        failed: usize,
    },
}

/// Result type used throughout the renderer.
pub type RenderResult<T> = Result<T, RenderError>;
