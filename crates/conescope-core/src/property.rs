//! Surface display properties of an actor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How polygons are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Representation {
    /// Only the points.
    Points,
    /// Polygon edges as lines.
    Wireframe,
    /// Filled polygons.
    #[default]
    Surface,
}

/// How normals are interpolated across a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Interpolation {
    /// One normal per face.
    Flat,
    /// Per-point normals when the data has them.
    #[default]
    Gouraud,
}

/// Appearance of an actor: color, lighting coefficients and representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Base color.
    pub color: Vec3,
    /// Ambient coefficient.
    pub ambient: f32,
    /// Diffuse coefficient.
    pub diffuse: f32,
    /// Specular coefficient.
    pub specular: f32,
    /// Specular exponent.
    pub specular_power: f32,
    /// Specular highlight color.
    pub specular_color: Vec3,
    /// Opacity (1.0 = opaque).
    pub opacity: f32,
    /// Point, wireframe or surface drawing.
    pub representation: Representation,
    /// Flat or Gouraud shading.
    pub interpolation: Interpolation,
    /// Line width in pixels.
    pub line_width: f32,
    /// Point size in pixels.
    pub point_size: f32,
    /// Whether back faces are culled.
    pub backface_culling: bool,
    /// Whether lighting is applied.
    pub lighting: bool,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            specular_power: 1.0,
            specular_color: Vec3::ONE,
            opacity: 1.0,
            representation: Representation::Surface,
            interpolation: Interpolation::Gouraud,
            line_width: 1.0,
            point_size: 1.0,
            backface_culling: false,
            lighting: true,
        }
    }
}

impl Property {
    /// Sets the base color; components are clamped to `[0, 1]`.
    pub fn set_color(&mut self, color: Vec3) {
        self.color = color.clamp(Vec3::ZERO, Vec3::ONE);
    }

    /// Sets the ambient coefficient.
    pub fn set_ambient(&mut self, ambient: f32) {
        self.ambient = ambient.clamp(0.0, 1.0);
    }

    /// Sets the diffuse coefficient.
    pub fn set_diffuse(&mut self, diffuse: f32) {
        self.diffuse = diffuse.clamp(0.0, 1.0);
    }

    /// Sets the specular coefficient.
    pub fn set_specular(&mut self, specular: f32) {
        self.specular = specular.clamp(0.0, 1.0);
    }

    /// Sets the specular exponent.
    pub fn set_specular_power(&mut self, power: f32) {
        self.specular_power = power.clamp(0.0, 128.0);
    }

    /// Sets the opacity.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Sets the representation.
    pub fn set_representation(&mut self, representation: Representation) {
        self.representation = representation;
    }

    /// Sets the interpolation.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Sets the line width.
    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width.max(0.1);
    }

    /// Sets the point size.
    pub fn set_point_size(&mut self, size: f32) {
        self.point_size = size.max(0.1);
    }

    /// Turns back-face culling on or off.
    pub fn set_backface_culling(&mut self, culling: bool) {
        self.backface_culling = culling;
    }

    /// Whether the actor must be drawn with blending.
    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Property::default();
        assert_eq!(p.color, Vec3::ONE);
        assert_eq!(p.diffuse, 1.0);
        assert_eq!(p.ambient, 0.0);
        assert_eq!(p.representation, Representation::Surface);
        assert_eq!(p.interpolation, Interpolation::Gouraud);
        assert!(!p.is_translucent());
    }

    #[test]
    fn test_clamping() {
        let mut p = Property::default();
        p.set_opacity(2.0);
        p.set_color(Vec3::new(-1.0, 0.5, 3.0));
        p.set_line_width(0.0);
        assert_eq!(p.opacity, 1.0);
        assert_eq!(p.color, Vec3::new(0.0, 0.5, 1.0));
        assert!(p.line_width > 0.0);
    }
}
