//! Trackball camera interaction: the mouse moves the camera, never the actors.
//!
//! | input                    | motion |
//! |--------------------------|--------|
//! | left drag                | rotate |
//! | shift + left drag        | pan    |
//! | ctrl + left drag         | spin   |
//! | ctrl + shift + left drag | dolly  |
//! | middle drag              | pan    |
//! | right drag               | dolly  |
//! | wheel                    | dolly  |
//!
//! Keys: `q`/`e` quit, `r` reset the camera, `w` wireframe, `s` surface.

use conescope_core::{Options, Renderer, Representation, Vec2, Vec3};

use crate::interactor::{InteractionContext, InteractionOutcome, InteractorStyle};

/// Degrees of rotation for a drag across the whole window, before the
/// motion factor is applied.
const ROTATION_PER_WINDOW: f32 = 20.0;

/// Base of the exponential dolly factor.
const DOLLY_BASE: f32 = 1.1;

/// Wheel steps count as this fraction of a full dolly motion.
const WHEEL_STEP: f32 = 0.2;

/// The motion a drag is performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Start,
    Rotate,
    Pan,
    Spin,
    Dolly,
}

/// Trackball-style camera manipulation.
#[derive(Debug, Clone)]
pub struct InteractorStyleTrackballCamera {
    /// Scale applied to mouse motion.
    pub motion_factor: f32,
    /// Scale applied to wheel steps.
    pub mouse_wheel_motion_factor: f32,
    state: MotionState,
    /// Renderer whose camera the current drag moves.
    current_renderer: Option<usize>,
}

impl Default for InteractorStyleTrackballCamera {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

impl InteractorStyleTrackballCamera {
    /// Creates the style with a motion factor of 10.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the style with the motion factors from options.
    pub fn from_options(options: &Options) -> Self {
        Self {
            motion_factor: options.motion_factor,
            mouse_wheel_motion_factor: options.mouse_wheel_motion_factor,
            state: MotionState::Start,
            current_renderer: None,
        }
    }

    /// The motion in progress.
    pub fn state(&self) -> MotionState {
        self.state
    }

    fn start_motion(&mut self, ctx: &InteractionContext<'_>, state: MotionState) {
        self.current_renderer = ctx.render_window.find_poked_renderer(ctx.position);
        if self.current_renderer.is_some() {
            self.state = state;
        }
    }

    fn end_motion(&mut self, state: MotionState) -> InteractionOutcome {
        if self.state == state {
            self.state = MotionState::Start;
            self.current_renderer = None;
        }
        InteractionOutcome::None
    }

    fn rotate(&self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        let (width, height) = ctx.size();
        let delta = ctx.delta();
        let Some(renderer) = self.renderer(ctx) else {
            return InteractionOutcome::None;
        };

        // Scaled by the whole window, not the renderer's viewport.
        let azimuth = delta.x * -ROTATION_PER_WINDOW / width as f32 * self.motion_factor;
        let elevation = delta.y * -ROTATION_PER_WINDOW / height as f32 * self.motion_factor;

        let camera = renderer.active_camera_mut();
        camera.azimuth(azimuth);
        camera.elevation(elevation);
        camera.orthogonalize_view_up();
        renderer.reset_camera_clipping_range();
        InteractionOutcome::Render
    }

    fn spin(&self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        let (width, height) = ctx.size();
        let (position, last) = (ctx.position, ctx.last_position);
        let Some(renderer) = self.renderer(ctx) else {
            return InteractionOutcome::None;
        };
        let center = viewport_center(renderer, width, height);

        let new_angle = (position.y - center.y).atan2(position.x - center.x).to_degrees();
        let old_angle = (last.y - center.y).atan2(last.x - center.x).to_degrees();

        let camera = renderer.active_camera_mut();
        camera.roll(new_angle - old_angle);
        camera.orthogonalize_view_up();
        InteractionOutcome::Render
    }

    fn pan(&self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        let (width, height) = ctx.size();
        let (position, last) = (ctx.position, ctx.last_position);
        let Some(renderer) = self.renderer(ctx) else {
            return InteractionOutcome::None;
        };

        // Displacement of the focal-point depth plane under the cursor.
        let focal = renderer.active_camera().focal_point;
        let depth = renderer.world_to_display(focal, width, height).z;
        let new_pick = renderer.display_to_world(position.extend(depth), width, height);
        let old_pick = renderer.display_to_world(last.extend(depth), width, height);
        let motion: Vec3 = old_pick - new_pick;
        if !motion.is_finite() {
            return InteractionOutcome::None;
        }

        let camera = renderer.active_camera_mut();
        camera.focal_point += motion;
        camera.position += motion;
        InteractionOutcome::Render
    }

    fn dolly(&self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        let (width, height) = ctx.size();
        let delta = ctx.delta();
        let motion_factor = self.motion_factor;
        let Some(renderer) = self.renderer(ctx) else {
            return InteractionOutcome::None;
        };
        let center = viewport_center(renderer, width, height);
        if center.y <= 0.0 {
            return InteractionOutcome::None;
        }
        dolly_renderer(renderer, DOLLY_BASE.powf(motion_factor * delta.y / center.y));
        InteractionOutcome::Render
    }

    fn wheel(&self, ctx: &mut InteractionContext<'_>, direction: f32) -> InteractionOutcome {
        let Some(index) = ctx.render_window.find_poked_renderer(ctx.position) else {
            return InteractionOutcome::None;
        };
        let Some(renderer) = ctx.render_window.renderers_mut().get_mut(index) else {
            return InteractionOutcome::None;
        };
        let factor = direction * self.motion_factor * WHEEL_STEP * self.mouse_wheel_motion_factor;
        dolly_renderer(renderer, DOLLY_BASE.powf(factor));
        InteractionOutcome::Render
    }

    fn renderer<'w>(&self, ctx: &'w mut InteractionContext<'_>) -> Option<&'w mut Renderer> {
        ctx.render_window
            .renderers_mut()
            .get_mut(self.current_renderer?)
    }

    fn poked_renderer<'w>(ctx: &'w mut InteractionContext<'_>) -> Option<&'w mut Renderer> {
        let index = ctx.render_window.find_poked_renderer(ctx.position)?;
        ctx.render_window.renderers_mut().get_mut(index)
    }
}

/// Center of a renderer's viewport in display coordinates.
fn viewport_center(renderer: &Renderer, width: u32, height: u32) -> Vec2 {
    let (origin, size) = renderer.viewport().pixel_rect(width, height);
    origin + size * 0.5
}

/// Moves the camera toward its focal point (`factor > 1`) or away from it.
fn dolly_renderer(renderer: &mut Renderer, factor: f32) {
    let camera = renderer.active_camera_mut();
    if camera.parallel_projection {
        let scale = camera.parallel_scale / factor;
        camera.set_parallel_scale(scale);
    } else {
        camera.dolly(factor);
    }
    renderer.reset_camera_clipping_range();
}

impl InteractorStyle for InteractorStyleTrackballCamera {
    fn on_left_button_down(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        let state = match (ctx.shift, ctx.ctrl) {
            (true, true) => MotionState::Dolly,
            (true, false) => MotionState::Pan,
            (false, true) => MotionState::Spin,
            (false, false) => MotionState::Rotate,
        };
        self.start_motion(ctx, state);
        InteractionOutcome::None
    }

    fn on_left_button_up(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        match self.state {
            MotionState::Start => InteractionOutcome::None,
            state => self.end_motion(state),
        }
    }

    fn on_middle_button_down(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        self.start_motion(ctx, MotionState::Pan);
        InteractionOutcome::None
    }

    fn on_middle_button_up(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        self.end_motion(MotionState::Pan)
    }

    fn on_right_button_down(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        self.start_motion(ctx, MotionState::Dolly);
        InteractionOutcome::None
    }

    fn on_right_button_up(&mut self, _ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        self.end_motion(MotionState::Dolly)
    }

    fn on_mouse_move(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        match self.state {
            MotionState::Start => InteractionOutcome::None,
            MotionState::Rotate => self.rotate(ctx),
            MotionState::Pan => self.pan(ctx),
            MotionState::Spin => self.spin(ctx),
            MotionState::Dolly => self.dolly(ctx),
        }
    }

    fn on_mouse_wheel_forward(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        self.wheel(ctx, 1.0)
    }

    fn on_mouse_wheel_backward(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        self.wheel(ctx, -1.0)
    }

    fn on_char(&mut self, ctx: &mut InteractionContext<'_>, key: char) -> InteractionOutcome {
        match key.to_ascii_lowercase() {
            'q' | 'e' => InteractionOutcome::Exit,
            'r' => match Self::poked_renderer(ctx) {
                Some(renderer) => match renderer.reset_camera() {
                    Ok(()) => InteractionOutcome::Render,
                    Err(e) => {
                        log::warn!("camera reset failed: {e}");
                        InteractionOutcome::None
                    }
                },
                None => InteractionOutcome::None,
            },
            'w' => set_representation(ctx, Representation::Wireframe),
            's' => set_representation(ctx, Representation::Surface),
            _ => InteractionOutcome::None,
        }
    }
}

fn set_representation(
    ctx: &mut InteractionContext<'_>,
    representation: Representation,
) -> InteractionOutcome {
    let Some(renderer) = InteractorStyleTrackballCamera::poked_renderer(ctx) else {
        return InteractionOutcome::None;
    };
    for actor in renderer.actors_mut() {
        actor.property_mut().set_representation(representation);
    }
    InteractionOutcome::Render
}
