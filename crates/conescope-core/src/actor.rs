//! Actors: a mapper placed in the scene with a property and a transform.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Mat4, Vec3};

use crate::error::{Result, SceneError};
use crate::mapper::PolyDataMapper;
use crate::poly_data::Bounds;
use crate::primitives::{extract_batches, DrawBatch};
use crate::property::Property;

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

/// A renderable scene node.
#[derive(Debug)]
pub struct Actor {
    id: u64,
    mapper: Option<PolyDataMapper>,
    property: Property,
    position: Vec3,
    /// Rotation about X, Y, Z in degrees; applied Z first, then X, then Y.
    orientation: Vec3,
    scale: Vec3,
    origin: Vec3,
    visibility: bool,
    mtime: u64,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            id: NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed),
            mapper: None,
            property: Property::default(),
            position: Vec3::ZERO,
            orientation: Vec3::ZERO,
            scale: Vec3::ONE,
            origin: Vec3::ZERO,
            visibility: true,
            mtime: 0,
        }
    }
}

impl Actor {
    /// Creates an actor with no mapper and a default property.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-unique identifier, stable for the actor's lifetime.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Attaches a mapper.
    pub fn set_mapper(&mut self, mapper: PolyDataMapper) {
        // Fold the old mapper's counter in so modified_time never repeats.
        let old = self.mapper.as_ref().map_or(0, PolyDataMapper::modified_time);
        self.mtime += old + 1;
        self.mapper = Some(mapper);
    }

    /// The attached mapper.
    pub fn mapper(&self) -> Option<&PolyDataMapper> {
        self.mapper.as_ref()
    }

    /// Mutable access to the attached mapper.
    pub fn mapper_mut(&mut self) -> Option<&mut PolyDataMapper> {
        self.mapper.as_mut()
    }

    /// The display property.
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Mutable access to the display property. Marks the actor modified.
    pub fn property_mut(&mut self) -> &mut Property {
        self.mtime += 1;
        &mut self.property
    }

    /// Replaces the display property.
    pub fn set_property(&mut self, property: Property) {
        self.property = property;
        self.mtime += 1;
    }

    /// Sets the world position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// World position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Sets the orientation as X, Y, Z rotations in degrees.
    pub fn set_orientation(&mut self, degrees: Vec3) {
        self.orientation = degrees;
    }

    /// Orientation as X, Y, Z rotations in degrees.
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    /// Sets the per-axis scale.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Per-axis scale.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Sets the point rotations and scaling happen around.
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Shows or hides the actor.
    pub fn set_visibility(&mut self, visible: bool) {
        self.visibility = visible;
    }

    /// Whether the actor is drawn.
    pub fn visibility(&self) -> bool {
        self.visibility
    }

    /// Modification counter covering the actor's mapper and property.
    pub fn modified_time(&self) -> u64 {
        self.mtime + self.mapper.as_ref().map_or(0, PolyDataMapper::modified_time)
    }

    /// Model-to-world matrix.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Mat4::from_rotation_y(self.orientation.y.to_radians())
            * Mat4::from_rotation_x(self.orientation.x.to_radians())
            * Mat4::from_rotation_z(self.orientation.z.to_radians());
        Mat4::from_translation(self.position + self.origin)
            * rotation
            * Mat4::from_scale(self.scale)
            * Mat4::from_translation(-self.origin)
    }

    /// Brings the mapper's cached output up to date.
    pub fn update(&mut self) -> Result<()> {
        self.mapper.as_mut().ok_or(SceneError::NoMapper)?.update()
    }

    /// World-space bounds of the mapper's output, if it has been updated.
    pub fn bounds(&self) -> Option<Bounds> {
        let bounds = self.mapper.as_ref()?.bounds()?;
        Some(bounds.transformed(self.matrix()))
    }

    /// Updates the mapper and extracts model-space draw batches.
    pub fn draw_batches(&mut self) -> Result<Vec<DrawBatch>> {
        self.update()?;
        let mapper = self.mapper.as_ref().ok_or(SceneError::NoMapper)?;
        let data = mapper.input().ok_or(SceneError::NoInput)?;
        let colors = mapper.map_scalars();
        Ok(extract_batches(data, &self.property, colors.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ConeSource;
    use std::sync::Arc;

    fn cone_actor() -> Actor {
        let mut mapper = PolyDataMapper::new();
        mapper.set_input_connection(Arc::new(ConeSource::new()));
        let mut actor = Actor::new();
        actor.set_mapper(mapper);
        actor
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Actor::new().id(), Actor::new().id());
    }

    #[test]
    fn test_no_mapper() {
        let mut actor = Actor::new();
        assert!(matches!(actor.update(), Err(SceneError::NoMapper)));
        assert!(actor.bounds().is_none());
    }

    #[test]
    fn test_bounds_follow_transform() {
        let mut actor = cone_actor();
        actor.update().unwrap();
        let before = actor.bounds().unwrap();
        actor.set_position(Vec3::new(0.0, 10.0, 0.0));
        let after = actor.bounds().unwrap();
        assert!((after.center() - before.center() - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_orientation_about_origin() {
        let mut actor = Actor::new();
        actor.set_origin(Vec3::X);
        actor.set_orientation(Vec3::new(0.0, 0.0, 90.0));
        // The origin itself does not move.
        let p = actor.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::X).length() < 1e-5);
        let q = actor.matrix().transform_point3(Vec3::new(2.0, 0.0, 0.0));
        assert!((q - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_property_edit_bumps_modified_time() {
        let mut actor = cone_actor();
        let before = actor.modified_time();
        actor.property_mut().set_opacity(0.5);
        assert!(actor.modified_time() > before);
    }

    #[test]
    fn test_draw_batches() {
        let mut actor = cone_actor();
        let batches = actor.draw_batches().unwrap();
        assert_eq!(batches.len(), 1);
    }
}
