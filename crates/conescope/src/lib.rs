//! conescope: a cone in a window you can spin with the mouse.
//!
//! The pipeline follows the classic visualization-toolkit shape:
//! a [`ConeSource`] feeds a [`PolyDataMapper`], the mapper is held by an
//! [`Actor`], actors live in a [`Renderer`], renderers in a
//! [`RenderWindow`], and a [`RenderWindowInteractor`] runs the event loop
//! with [`InteractorStyleTrackballCamera`] navigation.
//!
//! # Quick Start
//!
//! ```no_run
//! fn main() -> conescope::Result<()> {
//!     let mut interactor = conescope::build_interactor()?;
//!     interactor.initialize()?;
//!     interactor.start()
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Window coordinates arrive as f64 and are used as f32
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

mod app;
pub mod error;
pub mod headless;
pub mod interactor;
pub mod scene;
pub mod trackball_camera;

pub use error::{ConescopeError, Result};
pub use headless::{render_to_file, render_to_image};
pub use interactor::{
    InteractionContext, InteractionOutcome, InteractorStyle, MouseButton, RenderWindowInteractor,
};
pub use scene::{
    build_cube_render_window, build_interactor, build_interactor_with, build_render_window,
    build_render_window_with, cone_actor, cube_poly_data, CONE_HEIGHT, CONE_RADIUS,
    CONE_RESOLUTION,
};
pub use trackball_camera::{InteractorStyleTrackballCamera, MotionState};

// Re-export core types
pub use conescope_core::{
    Actor, Bounds, Camera, CellArray, ConeSource, Interpolation, LookupTable, Options, PolyData,
    PolyDataMapper, PolyDataSource, Property, RenderWindow, Renderer, Representation, ScalarMode,
    SceneError, Viewport,
};
pub use conescope_core::{Mat4, Vec2, Vec3, Vec4};

// Re-export render types
pub use conescope_render::{RenderEngine, RenderError};
