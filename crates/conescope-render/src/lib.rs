//! Rendering backend for conescope.
//!
//! This crate provides the wgpu-based rendering engine, including:
//! - GPU resource management for actor draw batches
//! - Shader compilation (WGSL) and pipeline caching
//! - Per-renderer viewports, backgrounds and headlights
//! - Frame capture and image export

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel math moves between u32 sizes and f32 coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod actor_render;
pub mod buffer;
pub mod engine;
pub mod error;
pub mod screenshot;
pub mod shader;

pub use actor_render::{ActorRenderData, ActorUniforms, GpuBatch};
pub use engine::{CameraUniforms, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use screenshot::{save_image, save_to_buffer, ScreenshotError};
pub use shader::ShaderBuilder;
