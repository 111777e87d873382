//! Core scene graph for conescope.
//!
//! This crate holds everything that does not touch the GPU:
//! - [`PolyData`] and the [`PolyDataSource`] trait, with [`ConeSource`]
//! - [`PolyDataMapper`], [`Property`] and [`Actor`]
//! - [`Camera`], [`Renderer`] and [`RenderWindow`]
//! - Draw-batch extraction consumed by the render backend
//! - Configuration options and errors

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Geometry code converts between point ids and usize constantly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod actor;
pub mod camera;
pub mod error;
pub mod lookup_table;
pub mod mapper;
pub mod options;
pub mod poly_data;
pub mod primitives;
pub mod property;
pub mod render_window;
pub mod renderer;
pub mod source;

pub use actor::Actor;
pub use camera::Camera;
pub use error::{Result, SceneError};
pub use lookup_table::LookupTable;
pub use mapper::{PolyDataMapper, ScalarMode};
pub use options::Options;
pub use poly_data::{Bounds, CellArray, PolyData};
pub use primitives::{DrawBatch, DrawVertex, PrimitiveKind};
pub use property::{Interpolation, Property, Representation};
pub use render_window::RenderWindow;
pub use renderer::{Renderer, Viewport};
pub use source::{ConeSource, PolyDataSource};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
