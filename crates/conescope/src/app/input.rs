use std::sync::Arc;

use pollster::FutureExt;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

use conescope_render::RenderEngine;

use super::App;
use crate::interactor::{InteractionOutcome, MouseButton};

impl App<'_> {
    fn apply(&mut self, outcome: InteractionOutcome) {
        match outcome {
            InteractionOutcome::None => {}
            InteractionOutcome::Render => self.request_redraw(),
            InteractionOutcome::Exit => self.interactor.terminate_app(),
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) {
        let render_window = self.interactor.render_window();
        let (width, height) = render_window.size();
        let window_attributes = Window::default_attributes()
            .with_title(render_window.title())
            .with_inner_size(PhysicalSize::new(width, height));
        let vsync = render_window.vsync();

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(e),
        };

        let engine = match RenderEngine::new_windowed(window.clone(), vsync).block_on() {
            Ok(engine) => engine,
            Err(e) => return self.fail(e),
        };

        // The platform may not honor the requested size.
        let (w, h) = engine.dimensions();
        if let Err(e) = self.interactor.render_window_mut().set_size(w, h) {
            log::warn!("ignoring window size {w}x{h}: {e}");
        }

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }
}

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.create_window(event_loop);
        }
        if self.interactor.exit_requested() {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.interactor.terminate_app();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(engine) = &mut self.engine {
                        engine.resize(size.width, size.height);
                    }
                    if let Err(e) = self
                        .interactor
                        .render_window_mut()
                        .set_size(size.width, size.height)
                    {
                        log::warn!("{e}");
                    }
                    self.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.interactor
                    .set_modifiers(state.shift_key(), state.control_key());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let display = self
                    .interactor
                    .flip_y(position.x as f32, position.y as f32);
                let outcome = self.interactor.mouse_move(display);
                self.apply(outcome);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    _ => return,
                };
                let outcome = match state {
                    ElementState::Pressed => self.interactor.button_press(button),
                    ElementState::Released => self.interactor.button_release(button),
                };
                self.apply(outcome);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => f64::from(y),
                    MouseScrollDelta::PixelDelta(p) => p.y,
                };
                let outcome = if amount > 0.0 {
                    self.interactor.mouse_wheel_forward()
                } else if amount < 0.0 {
                    self.interactor.mouse_wheel_backward()
                } else {
                    InteractionOutcome::None
                };
                self.apply(outcome);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let Key::Character(text) = &event.logical_key {
                        if let Some(key) = text.chars().next() {
                            let outcome = self.interactor.char_event(key);
                            self.apply(outcome);
                        }
                    }
                }
            }
            _ => {}
        }

        if self.interactor.exit_requested() {
            log::info!("exiting interactor event loop");
            event_loop.exit();
        }
    }
}
