//! Application window and event loop management.

mod input;
mod render;

use std::sync::Arc;

use winit::event_loop::EventLoop;
use winit::window::Window;

use conescope_render::RenderEngine;

use crate::error::{ConescopeError, Result};
use crate::interactor::RenderWindowInteractor;

/// Window, GPU engine and interactor for one run of the event loop.
pub(crate) struct App<'a> {
    pub(super) interactor: &'a mut RenderWindowInteractor,
    pub(super) window: Option<Arc<Window>>,
    pub(super) engine: Option<RenderEngine>,
    /// First fatal error; ends the loop and is returned from `run`.
    pub(super) error: Option<ConescopeError>,
}

impl<'a> App<'a> {
    pub(crate) fn new(interactor: &'a mut RenderWindowInteractor) -> Self {
        Self {
            interactor,
            window: None,
            engine: None,
            error: None,
        }
    }

    pub(super) fn fail(&mut self, error: impl Into<ConescopeError>) {
        let error = error.into();
        log::error!("{error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.interactor.terminate_app();
    }

    pub(super) fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Runs the event loop until the window closes or the style asks to exit.
pub(crate) fn run(interactor: &mut RenderWindowInteractor) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(interactor);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
