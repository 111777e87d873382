//! Renderers: a set of actors seen through one camera in one viewport.

use glam::{Vec2, Vec3, Vec4};

use crate::actor::Actor;
use crate::camera::Camera;
use crate::error::{Result, SceneError};
use crate::poly_data::Bounds;

/// Fraction of the far distance the near plane may not go below.
const NEAR_CLIPPING_PLANE_TOLERANCE: f32 = 0.001;

/// A normalized rectangle of the window, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 1.0,
            y_max: 1.0,
        }
    }
}

impl Viewport {
    /// Creates a viewport, checking `0 <= min < max <= 1` on both axes.
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Result<Self> {
        let ok = |a: f32, b: f32| (0.0..=1.0).contains(&a) && (0.0..=1.0).contains(&b) && a < b;
        if !ok(x_min, x_max) || !ok(y_min, y_max) {
            return Err(SceneError::InvalidParameter(format!(
                "viewport ({x_min}, {y_min}, {x_max}, {y_max}) must lie within [0, 1] with min < max"
            )));
        }
        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Pixel origin (bottom-left) and size of the viewport in a window.
    pub fn pixel_rect(&self, width: u32, height: u32) -> (Vec2, Vec2) {
        let size = Vec2::new(width as f32, height as f32);
        let min = Vec2::new(self.x_min, self.y_min) * size;
        let max = Vec2::new(self.x_max, self.y_max) * size;
        (min, (max - min).max(Vec2::ONE))
    }

    /// Whether a display position (pixels, origin bottom-left) falls inside.
    pub fn contains(&self, display: Vec2, width: u32, height: u32) -> bool {
        let (origin, size) = self.pixel_rect(width, height);
        let rel = display - origin;
        rel.x >= 0.0 && rel.y >= 0.0 && rel.x <= size.x && rel.y <= size.y
    }
}

/// Draws a list of actors with one camera into a viewport.
#[derive(Debug)]
pub struct Renderer {
    actors: Vec<Actor>,
    background: Vec3,
    viewport: Viewport,
    camera: Camera,
    camera_set: bool,
    /// Light back faces as well as front faces.
    pub two_sided_lighting: bool,
    /// Keep the headlight at the camera.
    pub light_follow_camera: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            actors: Vec::new(),
            background: Vec3::ZERO,
            viewport: Viewport::default(),
            camera: Camera::default(),
            camera_set: false,
            two_sided_lighting: true,
            light_follow_camera: true,
        }
    }
}

impl Renderer {
    /// Creates an empty renderer with a black background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor and returns its id.
    pub fn add_actor(&mut self, actor: Actor) -> u64 {
        let id = actor.id();
        self.actors.push(actor);
        id
    }

    /// Removes the actor with the given id.
    pub fn remove_actor(&mut self, id: u64) -> Option<Actor> {
        let index = self.actors.iter().position(|a| a.id() == id)?;
        Some(self.actors.remove(index))
    }

    /// All actors in insertion order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Mutable access to all actors.
    pub fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    /// The actor with the given id.
    pub fn actor(&self, id: u64) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    /// Mutable access to the actor with the given id.
    pub fn actor_mut(&mut self, id: u64) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id() == id)
    }

    /// Sets the background color.
    pub fn set_background(&mut self, color: Vec3) {
        self.background = color.clamp(Vec3::ZERO, Vec3::ONE);
    }

    /// Background color.
    pub fn background(&self) -> Vec3 {
        self.background
    }

    /// Sets the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The camera.
    pub fn active_camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the camera. The camera then counts as user-set and
    /// will not be reset automatically before the first render.
    pub fn active_camera_mut(&mut self) -> &mut Camera {
        self.camera_set = true;
        &mut self.camera
    }

    /// Replaces the camera.
    pub fn set_active_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.camera_set = true;
    }

    /// Aspect ratio of the viewport in a window of the given size.
    pub fn aspect(&self, width: u32, height: u32) -> f32 {
        let (_, size) = self.viewport.pixel_rect(width, height);
        size.x / size.y
    }

    /// Updates the mapper of every visible actor; actors without one are skipped.
    pub fn update_actors(&mut self) -> Result<()> {
        for actor in self
            .actors
            .iter_mut()
            .filter(|a| a.visibility() && a.mapper().is_some())
        {
            actor.update()?;
        }
        Ok(())
    }

    /// Union of the bounds of visible actors.
    pub fn visible_actor_bounds(&self) -> Option<Bounds> {
        self.actors
            .iter()
            .filter(|a| a.visibility())
            .filter_map(Actor::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Updates actors and, on first use, fits the camera to them.
    pub fn prepare_for_render(&mut self) -> Result<()> {
        self.update_actors()?;
        if !self.camera_set {
            self.reset_camera()?;
            self.camera_set = true;
        }
        Ok(())
    }

    /// Points the camera at all visible actors, keeping the view direction.
    pub fn reset_camera(&mut self) -> Result<()> {
        self.update_actors()?;
        match self.visible_actor_bounds() {
            Some(bounds) => self.reset_camera_to_bounds(&bounds),
            None => log::debug!("reset_camera: no visible props, camera unchanged"),
        }
        Ok(())
    }

    /// Points the camera at the given bounds.
    pub fn reset_camera_to_bounds(&mut self, bounds: &Bounds) {
        let camera = &mut self.camera;
        let center = bounds.center();
        let mut radius = bounds.diagonal_length() * 0.5;
        if radius <= 0.0 {
            radius = 1.0;
        }

        let half_angle = (camera.view_angle.to_radians() * 0.5).sin();
        let distance = radius / half_angle;

        let mut vn = -camera.direction_of_projection();
        if vn == Vec3::ZERO {
            vn = Vec3::Z;
        }
        if camera.view_up.dot(vn).abs() > 0.999 {
            log::warn!("resetting view-up since view plane normal is parallel");
            camera.set_view_up(Vec3::new(-vn.y, vn.z, vn.x));
        }

        camera.focal_point = center;
        camera.position = center + vn * distance;
        camera.parallel_scale = radius;

        log::debug!("camera reset: focal={center} distance={distance}");
        self.reset_camera_clipping_range_to_bounds(bounds);
    }

    /// Fits the clipping range to the visible actors.
    pub fn reset_camera_clipping_range(&mut self) {
        if let Some(bounds) = self.visible_actor_bounds() {
            self.reset_camera_clipping_range_to_bounds(&bounds);
        }
    }

    /// Fits the clipping range to the given bounds.
    pub fn reset_camera_clipping_range_to_bounds(&mut self, bounds: &Bounds) {
        let camera = &mut self.camera;
        let dir = camera.direction_of_projection();
        let (min, max) = bounds
            .corners()
            .iter()
            .map(|&c| (c - camera.position).dot(dir))
            .fold((f32::MAX, f32::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));

        // Widen a little so geometry on the box faces is not clipped.
        let far = (max * 1.01).max(1e-3);
        let near = (min * 0.99).max(far * NEAR_CLIPPING_PLANE_TOLERANCE);
        camera.set_clipping_range(near, far);
    }

    /// Projects a world point to display coordinates (pixels, origin
    /// bottom-left) with depth in `[0, 1]`.
    pub fn world_to_display(&self, world: Vec3, width: u32, height: u32) -> Vec3 {
        let (origin, size) = self.viewport.pixel_rect(width, height);
        let clip = self
            .camera
            .view_projection_matrix(size.x / size.y)
            * world.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        Vec3::new(
            origin.x + (ndc.x + 1.0) * 0.5 * size.x,
            origin.y + (ndc.y + 1.0) * 0.5 * size.y,
            ndc.z,
        )
    }

    /// Inverse of [`world_to_display`](Self::world_to_display).
    pub fn display_to_world(&self, display: Vec3, width: u32, height: u32) -> Vec3 {
        let (origin, size) = self.viewport.pixel_rect(width, height);
        let ndc = Vec4::new(
            (display.x - origin.x) / size.x * 2.0 - 1.0,
            (display.y - origin.y) / size.y * 2.0 - 1.0,
            display.z,
            1.0,
        );
        let world = self
            .camera
            .view_projection_matrix(size.x / size.y)
            .inverse()
            * ndc;
        world.truncate() / world.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::PolyDataMapper;
    use crate::source::ConeSource;
    use std::sync::Arc;

    fn cone_renderer() -> Renderer {
        let mut cone = ConeSource::new();
        cone.set_height(3.0);
        cone.set_radius(1.0);
        cone.set_resolution(10);
        let mut mapper = PolyDataMapper::new();
        mapper.set_input_connection(Arc::new(cone));
        let mut actor = Actor::new();
        actor.set_mapper(mapper);

        let mut renderer = Renderer::new();
        renderer.add_actor(actor);
        renderer
    }

    #[test]
    fn test_reset_camera_fits_bounds() {
        let mut renderer = cone_renderer();
        renderer.reset_camera().unwrap();

        let bounds = renderer.visible_actor_bounds().unwrap();
        let radius = bounds.diagonal_length() * 0.5;
        let camera = renderer.active_camera();
        assert!((camera.focal_point - bounds.center()).length() < 1e-5);

        let expected = radius / 15.0f32.to_radians().sin();
        assert!((camera.distance() - expected).abs() < 1e-3);
        assert!(camera.position.z > 0.0);

        let (near, far) = camera.clipping_range;
        assert!(near > 0.0 && near < expected - 1.0);
        assert!(far > expected + 1.0);
    }

    #[test]
    fn test_prepare_resets_once() {
        let mut renderer = cone_renderer();
        renderer.prepare_for_render().unwrap();
        let fitted = renderer.active_camera().clone();

        renderer.active_camera_mut().azimuth(30.0);
        renderer.prepare_for_render().unwrap();
        assert_ne!(renderer.active_camera().position, fitted.position);
    }

    #[test]
    fn test_user_camera_is_kept() {
        let mut renderer = cone_renderer();
        renderer.active_camera_mut().set_position(Vec3::new(0.0, 0.0, 50.0));
        renderer.prepare_for_render().unwrap();
        assert_eq!(renderer.active_camera().position, Vec3::new(0.0, 0.0, 50.0));
    }

    #[test]
    fn test_empty_renderer_keeps_camera() {
        let mut renderer = Renderer::new();
        renderer.reset_camera().unwrap();
        assert_eq!(renderer.active_camera(), &Camera::default());
    }

    #[test]
    fn test_actor_without_mapper_is_skipped() {
        let mut renderer = cone_renderer();
        renderer.add_actor(Actor::new());
        renderer.prepare_for_render().unwrap();
        assert!(renderer.visible_actor_bounds().is_some());
    }

    #[test]
    fn test_remove_actor() {
        let mut renderer = cone_renderer();
        let id = renderer.actors()[0].id();
        assert!(renderer.remove_actor(id).is_some());
        assert!(renderer.actors().is_empty());
        assert!(renderer.remove_actor(id).is_none());
    }

    #[test]
    fn test_display_round_trip() {
        let mut renderer = cone_renderer();
        renderer.reset_camera().unwrap();
        let world = Vec3::new(0.3, -0.2, 0.1);
        let display = renderer.world_to_display(world, 300, 300);
        let back = renderer.display_to_world(display, 300, 300);
        assert!((back - world).length() < 1e-3);

        let center = renderer.world_to_display(renderer.active_camera().focal_point, 300, 300);
        assert!((center.x - 150.0).abs() < 1e-2);
        assert!((center.y - 150.0).abs() < 1e-2);
    }

    #[test]
    fn test_viewport_validation() {
        assert!(Viewport::new(0.0, 0.0, 0.5, 1.0).is_ok());
        assert!(Viewport::new(0.5, 0.0, 0.5, 1.0).is_err());
        assert!(Viewport::new(0.0, -0.1, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_viewport_contains() {
        let viewport = Viewport::new(0.5, 0.0, 1.0, 1.0).unwrap();
        assert!(viewport.contains(Vec2::new(200.0, 100.0), 300, 300));
        assert!(!viewport.contains(Vec2::new(100.0, 100.0), 300, 300));
    }
}
