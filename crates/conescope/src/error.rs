//! Error types for the conescope application layer.

use conescope_core::SceneError;
use conescope_render::{RenderError, ScreenshotError};
use thiserror::Error;

/// Errors raised while building, showing or capturing a scene.
#[derive(Error, Debug)]
pub enum ConescopeError {
    /// The scene graph rejected an operation.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// The GPU backend failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The winit event loop could not be created or failed while running.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("window creation failed: {0}")]
    Os(#[from] winit::error::OsError),

    /// `start()` was called before `initialize()`.
    #[error("interactor has not been initialized")]
    NotInitialized,

    /// A captured frame could not be written.
    #[error("screenshot failed: {0}")]
    Screenshot(#[from] ScreenshotError),
}

/// A specialized Result type for conescope operations.
pub type Result<T> = std::result::Result<T, ConescopeError>;
