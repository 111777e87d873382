//! Camera and view management.

use glam::{Mat4, Quat, Vec3};

/// A camera defined by a position, a focal point and a view-up vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub focal_point: Vec3,
    /// Up vector.
    pub view_up: Vec3,
    /// Vertical field of view in degrees.
    pub view_angle: f32,
    /// Near and far clipping distances along the view direction.
    pub clipping_range: (f32, f32),
    /// Orthographic instead of perspective projection.
    pub parallel_projection: bool,
    /// Half the viewport height in world units (parallel projection only).
    pub parallel_scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            focal_point: Vec3::ZERO,
            view_up: Vec3::Y,
            view_angle: 30.0,
            clipping_range: (0.01, 1000.01),
            parallel_projection: false,
            parallel_scale: 1.0,
        }
    }
}

impl Camera {
    /// Creates a camera at (0, 0, 1) looking at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Sets the focal point.
    pub fn set_focal_point(&mut self, focal_point: Vec3) {
        self.focal_point = focal_point;
    }

    /// Sets the view-up vector (normalized).
    pub fn set_view_up(&mut self, view_up: Vec3) {
        self.view_up = view_up.normalize_or_zero();
    }

    /// Sets the view angle in degrees.
    pub fn set_view_angle(&mut self, degrees: f32) {
        self.view_angle = degrees.clamp(0.000_000_01, 179.0);
    }

    /// Sets the clipping range; `far` is kept strictly beyond `near`.
    pub fn set_clipping_range(&mut self, near: f32, far: f32) {
        let near = near.max(1e-6);
        self.clipping_range = (near, far.max(near * 1.0001));
    }

    /// Sets the parallel scale.
    pub fn set_parallel_scale(&mut self, scale: f32) {
        self.parallel_scale = scale.max(1e-6);
    }

    /// Unit vector from the position toward the focal point.
    pub fn direction_of_projection(&self) -> Vec3 {
        (self.focal_point - self.position).normalize_or_zero()
    }

    /// Distance from the position to the focal point.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.focal_point)
    }

    /// Moves the position along the view direction to the given distance.
    pub fn set_distance(&mut self, distance: f32) {
        let dir = self.direction_of_projection();
        self.position = self.focal_point - dir * distance.max(1e-6);
    }

    /// Returns the camera's right direction.
    pub fn right(&self) -> Vec3 {
        self.direction_of_projection()
            .cross(self.view_up)
            .normalize_or_zero()
    }

    /// Returns the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.focal_point, self.view_up)
    }

    /// Returns the projection matrix for a viewport aspect ratio.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        let (near, far) = self.clipping_range;
        if self.parallel_projection {
            let half_height = self.parallel_scale;
            let half_width = half_height * aspect_ratio;
            Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, near, far)
        } else {
            Mat4::perspective_rh(self.view_angle.to_radians(), aspect_ratio, near, far)
        }
    }

    /// Returns the combined view-projection matrix.
    pub fn view_projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }

    /// Rotates the position about the view-up vector through the focal point.
    pub fn azimuth(&mut self, degrees: f32) {
        let rotation = Quat::from_axis_angle(self.view_up.normalize_or_zero(), degrees.to_radians());
        self.position = self.focal_point + rotation * (self.position - self.focal_point);
    }

    /// Rotates the position about the right axis through the focal point.
    ///
    /// The view-up vector is left alone; call
    /// [`orthogonalize_view_up`](Self::orthogonalize_view_up) afterwards.
    pub fn elevation(&mut self, degrees: f32) {
        let axis = (-self.direction_of_projection())
            .cross(self.view_up)
            .normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let rotation = Quat::from_axis_angle(axis, degrees.to_radians());
        self.position = self.focal_point + rotation * (self.position - self.focal_point);
    }

    /// Rotates the view-up vector about the view direction.
    pub fn roll(&mut self, degrees: f32) {
        let axis = self.direction_of_projection();
        if axis == Vec3::ZERO {
            return;
        }
        let rotation = Quat::from_axis_angle(axis, degrees.to_radians());
        self.view_up = (rotation * self.view_up).normalize_or_zero();
    }

    /// Moves the camera toward the focal point; `factor > 1` moves closer.
    pub fn dolly(&mut self, factor: f32) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        self.set_distance(self.distance() / factor);
    }

    /// Narrows the view angle (or the parallel scale) by `factor`.
    pub fn zoom(&mut self, factor: f32) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        if self.parallel_projection {
            self.set_parallel_scale(self.parallel_scale / factor);
        } else {
            self.set_view_angle(self.view_angle / factor);
        }
    }

    /// Makes the view-up vector perpendicular to the view direction.
    pub fn orthogonalize_view_up(&mut self) {
        let dir = self.direction_of_projection();
        let right = dir.cross(self.view_up);
        if right.length_squared() < 1e-12 {
            return;
        }
        self.view_up = right.cross(dir).normalize();
    }
}
