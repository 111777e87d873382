//! Error types for the conescope scene graph.

use thiserror::Error;

/// The main error type for scene-graph operations.
#[derive(Error, Debug)]
pub enum SceneError {
    /// A mapper was asked for data before an input connection was set.
    #[error("mapper has no input connection")]
    NoInput,

    /// An actor was asked for geometry but has no mapper.
    #[error("actor has no mapper")]
    NoMapper,

    /// A cell references a point that does not exist.
    #[error("cell {cell} references point {point_id}, but only {num_points} points exist")]
    InvalidCell {
        cell: usize,
        point_id: u32,
        num_points: usize,
    },

    /// An attribute array does not match the element count it describes.
    #[error("{what} size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A parameter was outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A render window was used without any renderer attached.
    #[error("render window has no renderer")]
    NoRenderer,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for scene-graph operations.
pub type Result<T> = std::result::Result<T, SceneError>;
