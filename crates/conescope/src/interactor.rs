//! Render window interactor: turns window events into style callbacks.
//!
//! Event positions use display coordinates: pixels with the origin at the
//! bottom-left corner of the window, y pointing up.

use std::fmt::Debug;

use conescope_core::{RenderWindow, Vec2};

use crate::error::{ConescopeError, Result};
use crate::trackball_camera::InteractorStyleTrackballCamera;

/// What the interactor should do after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionOutcome {
    /// Nothing changed.
    #[default]
    None,
    /// The scene changed and must be redrawn.
    Render,
    /// Stop the event loop.
    Exit,
}

/// Event state handed to every style callback.
#[derive(Debug)]
pub struct InteractionContext<'a> {
    /// Current event position (display coordinates).
    pub position: Vec2,
    /// Position of the previous event.
    pub last_position: Vec2,
    /// Shift held.
    pub shift: bool,
    /// Control held.
    pub ctrl: bool,
    /// The window being interacted with.
    pub render_window: &'a mut RenderWindow,
}

impl InteractionContext<'_> {
    /// Window size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.render_window.size()
    }

    /// Motion since the previous event.
    pub fn delta(&self) -> Vec2 {
        self.position - self.last_position
    }
}

/// Reacts to interaction events. Every callback defaults to doing nothing.
pub trait InteractorStyle: Debug {
    fn on_left_button_down(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    fn on_left_button_up(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    fn on_middle_button_down(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    fn on_middle_button_up(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    fn on_right_button_down(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    fn on_right_button_up(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    fn on_mouse_move(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    fn on_mouse_wheel_forward(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    fn on_mouse_wheel_backward(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        InteractionOutcome::None
    }

    /// A character key was typed.
    fn on_char(&mut self, _ctx: &mut InteractionContext<'_>, _key: char) -> InteractionOutcome {
        InteractionOutcome::None
    }
}

/// Mouse buttons the interactor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Owns a render window and a style, and dispatches events between them.
#[derive(Debug)]
pub struct RenderWindowInteractor {
    render_window: RenderWindow,
    style: Box<dyn InteractorStyle>,
    initialized: bool,
    exit_requested: bool,
    position: Vec2,
    last_position: Vec2,
    shift: bool,
    ctrl: bool,
}

impl RenderWindowInteractor {
    /// Creates an interactor with the trackball camera style.
    pub fn new(render_window: RenderWindow) -> Self {
        Self {
            render_window,
            style: Box::new(InteractorStyleTrackballCamera::new()),
            initialized: false,
            exit_requested: false,
            position: Vec2::ZERO,
            last_position: Vec2::ZERO,
            shift: false,
            ctrl: false,
        }
    }

    /// Replaces the interaction style.
    pub fn set_interactor_style(&mut self, style: Box<dyn InteractorStyle>) {
        self.style = style;
    }

    /// The interaction style.
    pub fn interactor_style(&self) -> &dyn InteractorStyle {
        self.style.as_ref()
    }

    /// The render window.
    pub fn render_window(&self) -> &RenderWindow {
        &self.render_window
    }

    /// Mutable access to the render window.
    pub fn render_window_mut(&mut self) -> &mut RenderWindow {
        &mut self.render_window
    }

    /// Prepares the scene for display: updates mappers and fits cameras.
    pub fn initialize(&mut self) -> Result<()> {
        self.render_window.prepare_for_render()?;
        self.initialized = true;
        log::debug!(
            "interactor initialized with {} renderer(s)",
            self.render_window.renderers().len()
        );
        Ok(())
    }

    /// Whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Opens the window and runs the event loop until it is closed.
    pub fn start(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(ConescopeError::NotInitialized);
        }
        let _ = env_logger::try_init();
        self.exit_requested = false;
        log::info!("starting interactor event loop");
        crate::app::run(self)
    }

    /// Asks the event loop to stop after the current event.
    pub fn terminate_app(&mut self) {
        self.exit_requested = true;
    }

    /// Whether the event loop has been asked to stop.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Updates modifier key state.
    pub fn set_modifiers(&mut self, shift: bool, ctrl: bool) {
        self.shift = shift;
        self.ctrl = ctrl;
    }

    /// Current event position (display coordinates).
    pub fn event_position(&self) -> Vec2 {
        self.position
    }

    /// Records a new pointer position, keeping the previous one.
    pub fn set_event_position(&mut self, position: Vec2) {
        self.last_position = self.position;
        self.position = position;
    }

    /// Converts a window position (origin top-left) to display coordinates.
    pub fn flip_y(&self, x: f32, y: f32) -> Vec2 {
        let (_, height) = self.render_window.size();
        Vec2::new(x, height as f32 - y - 1.0)
    }

    /// Pointer moved to `position`.
    pub fn mouse_move(&mut self, position: Vec2) -> InteractionOutcome {
        self.set_event_position(position);
        self.dispatch(|style, ctx| style.on_mouse_move(ctx))
    }

    /// A button was pressed at the current position.
    pub fn button_press(&mut self, button: MouseButton) -> InteractionOutcome {
        self.dispatch(|style, ctx| match button {
            MouseButton::Left => style.on_left_button_down(ctx),
            MouseButton::Middle => style.on_middle_button_down(ctx),
            MouseButton::Right => style.on_right_button_down(ctx),
        })
    }

    /// A button was released at the current position.
    pub fn button_release(&mut self, button: MouseButton) -> InteractionOutcome {
        self.dispatch(|style, ctx| match button {
            MouseButton::Left => style.on_left_button_up(ctx),
            MouseButton::Middle => style.on_middle_button_up(ctx),
            MouseButton::Right => style.on_right_button_up(ctx),
        })
    }

    /// One wheel step away from the user.
    pub fn mouse_wheel_forward(&mut self) -> InteractionOutcome {
        self.dispatch(|style, ctx| style.on_mouse_wheel_forward(ctx))
    }

    /// One wheel step toward the user.
    pub fn mouse_wheel_backward(&mut self) -> InteractionOutcome {
        self.dispatch(|style, ctx| style.on_mouse_wheel_backward(ctx))
    }

    /// A character key was typed.
    pub fn char_event(&mut self, key: char) -> InteractionOutcome {
        self.dispatch(|style, ctx| style.on_char(ctx, key))
    }

    fn dispatch(
        &mut self,
        callback: impl FnOnce(&mut dyn InteractorStyle, &mut InteractionContext<'_>) -> InteractionOutcome,
    ) -> InteractionOutcome {
        let mut ctx = InteractionContext {
            position: self.position,
            last_position: self.last_position,
            shift: self.shift,
            ctrl: self.ctrl,
            render_window: &mut self.render_window,
        };
        let outcome = callback(self.style.as_mut(), &mut ctx);
        if outcome == InteractionOutcome::Exit {
            self.terminate_app();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conescope_core::Renderer;

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl InteractorStyle for Recorder {
        fn on_left_button_down(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
            self.events.push(format!("down {} {}", ctx.shift, ctx.ctrl));
            InteractionOutcome::None
        }

        fn on_mouse_move(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
            self.events.push(format!("move {}", ctx.delta()));
            InteractionOutcome::Render
        }

        fn on_char(&mut self, _ctx: &mut InteractionContext<'_>, key: char) -> InteractionOutcome {
            if key == 'x' {
                InteractionOutcome::Exit
            } else {
                InteractionOutcome::None
            }
        }
    }

    fn window() -> RenderWindow {
        let mut window = RenderWindow::new();
        window.add_renderer(Renderer::new());
        window
    }

    #[test]
    fn test_start_requires_initialize() {
        let mut interactor = RenderWindowInteractor::new(window());
        assert!(matches!(interactor.start(), Err(ConescopeError::NotInitialized)));
    }

    #[test]
    fn test_initialize_requires_renderer() {
        let mut interactor = RenderWindowInteractor::new(RenderWindow::new());
        assert!(interactor.initialize().is_err());
        assert!(!interactor.is_initialized());
    }

    #[test]
    fn test_exit_outcome_terminates() {
        let mut interactor = RenderWindowInteractor::new(window());
        interactor.set_interactor_style(Box::new(Recorder::default()));
        assert_eq!(interactor.char_event('a'), InteractionOutcome::None);
        assert!(!interactor.exit_requested());
        assert_eq!(interactor.char_event('x'), InteractionOutcome::Exit);
        assert!(interactor.exit_requested());
    }

    #[test]
    fn test_positions_and_modifiers_reach_style() {
        let mut interactor = RenderWindowInteractor::new(window());
        interactor.set_interactor_style(Box::new(Recorder::default()));
        interactor.set_modifiers(true, false);
        interactor.set_event_position(Vec2::new(10.0, 10.0));
        interactor.button_press(MouseButton::Left);
        assert_eq!(
            interactor.mouse_move(Vec2::new(15.0, 8.0)),
            InteractionOutcome::Render
        );
        assert_eq!(
            format!("{:?}", interactor.interactor_style()),
            r#"Recorder { events: ["down true false", "move [5, -2]"] }"#
        );
    }

    #[test]
    fn test_flip_y() {
        let interactor = RenderWindowInteractor::new(window());
        assert_eq!(interactor.flip_y(3.0, 0.0), Vec2::new(3.0, 299.0));
        assert_eq!(interactor.flip_y(3.0, 299.0), Vec2::new(3.0, 0.0));
    }
}
