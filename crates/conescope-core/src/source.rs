//! Poly-data sources: anything a mapper can pull geometry from.

use std::any::Any;
use std::f32::consts::{PI, TAU};
use std::fmt::Debug;

use glam::{Quat, Vec3};

use crate::error::{Result, SceneError};
use crate::poly_data::{CellArray, PolyData};

/// Largest resolution a [`ConeSource`] accepts.
pub const MAX_CONE_RESOLUTION: u32 = 512;

/// Produces poly data on demand.
///
/// Mappers hold sources behind `Arc<dyn PolyDataSource>` and call
/// [`output`](PolyDataSource::output) when they update.
pub trait PolyDataSource: Any + Debug + Send + Sync {
    /// Short type name used in logs.
    fn name(&self) -> &'static str;

    /// Generates the output poly data.
    fn output(&self) -> Result<PolyData>;

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl PolyDataSource for PolyData {
    fn name(&self) -> &'static str {
        "PolyData"
    }

    fn output(&self) -> Result<PolyData> {
        Ok(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A parametric cone: a tip, a polygonal base and optionally a cap.
///
/// The cone is generated along +X, centered on its mid-height, then
/// rotated onto [`direction`](ConeSource::direction) and moved to
/// [`center`](ConeSource::center).
#[derive(Debug, Clone, PartialEq)]
pub struct ConeSource {
    height: f32,
    radius: f32,
    resolution: u32,
    center: Vec3,
    direction: Vec3,
    capping: bool,
}

impl Default for ConeSource {
    fn default() -> Self {
        Self {
            height: 1.0,
            radius: 0.5,
            resolution: 6,
            center: Vec3::ZERO,
            direction: Vec3::X,
            capping: true,
        }
    }
}

impl ConeSource {
    /// Creates a cone with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the height, clamped to be non-negative.
    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(0.0);
    }

    /// Sets the base radius, clamped to be non-negative.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Sets the number of facets around the base, clamped to `0..=512`.
    pub fn set_resolution(&mut self, resolution: u32) {
        self.resolution = resolution.min(MAX_CONE_RESOLUTION);
    }

    /// Sets the center of the cone.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Sets the axis direction, from base to tip.
    pub fn set_direction(&mut self, direction: Vec3) -> Result<()> {
        if direction.length_squared() <= f32::EPSILON || !direction.is_finite() {
            return Err(SceneError::InvalidParameter(format!(
                "cone direction must be a non-zero finite vector, got {direction}"
            )));
        }
        self.direction = direction;
        Ok(())
    }

    /// Turns the base polygon on or off.
    pub fn set_capping(&mut self, capping: bool) {
        self.capping = capping;
    }

    /// Cone height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Base radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Facets around the base.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Center of the cone.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Axis direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Whether the base is capped.
    pub fn capping(&self) -> bool {
        self.capping
    }

    /// Rotation taking +X onto the (normalized) direction.
    fn orientation(&self) -> Quat {
        let dir = self.direction.normalize();
        if dir.abs_diff_eq(Vec3::X, 1e-6) {
            return Quat::IDENTITY;
        }
        let bisector = Vec3::X + dir;
        if bisector.length_squared() < 1e-12 {
            return Quat::from_axis_angle(Vec3::Z, PI);
        }
        Quat::from_axis_angle(bisector.normalize(), PI)
    }

    fn build(&self) -> PolyData {
        let half = self.height * 0.5;
        let r = self.radius;
        let base_x = -half;

        let mut points = vec![Vec3::new(half, 0.0, 0.0)];
        let mut lines = CellArray::new();
        let mut polys = CellArray::new();

        match self.resolution {
            0 => {
                points.push(Vec3::new(base_x, 0.0, 0.0));
                lines.insert_next_cell(vec![0, 1]);
            }
            1 | 2 => {
                points.push(Vec3::new(base_x, 0.0, r));
                points.push(Vec3::new(base_x, 0.0, -r));
                polys.insert_next_cell(vec![0, 1, 2]);
                if self.resolution == 2 {
                    points.push(Vec3::new(base_x, r, 0.0));
                    points.push(Vec3::new(base_x, -r, 0.0));
                    polys.insert_next_cell(vec![0, 3, 4]);
                }
            }
            n => {
                let step = TAU / n as f32;
                for i in 0..n {
                    let theta = step * i as f32;
                    points.push(Vec3::new(base_x, r * theta.cos(), r * theta.sin()));
                }
                for i in 1..=n {
                    polys.insert_next_cell(vec![0, i, i % n + 1]);
                }
                if self.capping {
                    polys.insert_next_cell((1..=n).rev().collect::<Vec<u32>>());
                }
            }
        }

        let rotation = self.orientation();
        for p in &mut points {
            *p = rotation * *p + self.center;
        }

        let mut data = PolyData::with_points(points);
        data.set_lines(lines);
        data.set_polys(polys);
        data
    }
}

impl PolyDataSource for ConeSource {
    fn name(&self) -> &'static str {
        "ConeSource"
    }

    fn output(&self) -> Result<PolyData> {
        log::debug!(
            "generating cone: height={} radius={} resolution={} capping={}",
            self.height,
            self.radius,
            self.resolution,
            self.capping
        );
        Ok(self.build())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn face_normal(data: &PolyData, cell: &[u32]) -> Vec3 {
        let a = data.points[cell[0] as usize];
        let b = data.points[cell[1] as usize];
        let c = data.points[cell[2] as usize];
        (b - a).cross(c - a)
    }

    #[test]
    fn test_defaults() {
        let cone = ConeSource::new();
        assert_eq!(cone.height(), 1.0);
        assert_eq!(cone.radius(), 0.5);
        assert_eq!(cone.resolution(), 6);
        assert_eq!(cone.direction(), Vec3::X);
        assert!(cone.capping());
    }

    #[test]
    fn test_setters_clamp() {
        let mut cone = ConeSource::new();
        cone.set_height(-2.0);
        cone.set_radius(-1.0);
        cone.set_resolution(10_000);
        assert_eq!(cone.height(), 0.0);
        assert_eq!(cone.radius(), 0.0);
        assert_eq!(cone.resolution(), MAX_CONE_RESOLUTION);
    }

    #[test]
    fn test_zero_direction_rejected() {
        let mut cone = ConeSource::new();
        assert!(cone.set_direction(Vec3::ZERO).is_err());
        assert_eq!(cone.direction(), Vec3::X);
    }

    #[test]
    fn test_program_cone_bounds() {
        let mut cone = ConeSource::new();
        cone.set_height(3.0);
        cone.set_radius(1.0);
        cone.set_resolution(10);
        let data = cone.output().unwrap();

        assert_eq!(data.number_of_points(), 11);
        assert_eq!(data.polys.len(), 11);

        let bounds = data.bounds().unwrap();
        assert!((bounds.min.x + 1.5).abs() < 1e-6);
        assert!((bounds.max.x - 1.5).abs() < 1e-6);
        assert!((bounds.min.y + 1.0).abs() < 1e-6);
        assert!((bounds.max.y - 1.0).abs() < 1e-6);
        assert!(bounds.max.z < 1.0);
    }

    #[test]
    fn test_resolution_zero_is_a_line() {
        let mut cone = ConeSource::new();
        cone.set_resolution(0);
        let data = cone.output().unwrap();
        assert_eq!(data.number_of_points(), 2);
        assert_eq!(data.lines.len(), 1);
        assert!(data.polys.is_empty());
    }

    #[test]
    fn test_low_resolutions() {
        let mut cone = ConeSource::new();
        cone.set_resolution(1);
        assert_eq!(cone.output().unwrap().polys.len(), 1);
        cone.set_resolution(2);
        let data = cone.output().unwrap();
        assert_eq!(data.polys.len(), 2);
        assert_eq!(data.number_of_points(), 5);
    }

    #[test]
    fn test_uncapped() {
        let mut cone = ConeSource::new();
        cone.set_capping(false);
        let data = cone.output().unwrap();
        assert_eq!(data.polys.len(), 6);
    }

    #[test]
    fn test_cap_faces_away_from_tip() {
        let data = ConeSource::new().output().unwrap();
        let cap = data.polys.cell(6).unwrap();
        assert_eq!(cap.len(), 6);
        assert!(face_normal(&data, cap).x < 0.0);
    }

    #[test]
    fn test_direction_and_center() {
        let mut cone = ConeSource::new();
        cone.set_height(2.0);
        cone.set_direction(Vec3::new(0.0, 0.0, 5.0)).unwrap();
        cone.set_center(Vec3::new(1.0, 2.0, 3.0));
        let data = cone.output().unwrap();
        let tip = data.points[0];
        assert!((tip - Vec3::new(1.0, 2.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_negative_x_direction() {
        let mut cone = ConeSource::new();
        cone.set_direction(Vec3::NEG_X).unwrap();
        let data = cone.output().unwrap();
        assert!((data.points[0] - Vec3::new(-0.5, 0.0, 0.0)).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_cone_topology(
            resolution in 3u32..128,
            height in 0.1f32..10.0,
            radius in 0.1f32..10.0,
            capping in any::<bool>(),
        ) {
            let mut cone = ConeSource::new();
            cone.set_resolution(resolution);
            cone.set_height(height);
            cone.set_radius(radius);
            cone.set_capping(capping);
            let data = cone.output().unwrap();

            prop_assert!(data.validate().is_ok());
            prop_assert_eq!(data.number_of_points(), resolution as usize + 1);
            let expected_polys = resolution as usize + usize::from(capping);
            prop_assert_eq!(data.polys.len(), expected_polys);

            // Side faces point away from the axis.
            for i in 0..resolution as usize {
                let cell = data.polys.cell(i).unwrap();
                let normal = face_normal(&data, cell);
                let centroid = cell.iter().map(|&id| data.points[id as usize]).sum::<Vec3>() / 3.0;
                let radial = Vec3::new(0.0, centroid.y, centroid.z);
                prop_assert!(normal.dot(radial) > 0.0);
            }
        }

        #[test]
        fn prop_tip_follows_direction(x in -1.0f32..1.0, y in -1.0f32..1.0, z in -1.0f32..1.0) {
            let dir = Vec3::new(x, y, z);
            prop_assume!(dir.length() > 0.1);
            let mut cone = ConeSource::new();
            cone.set_direction(dir).unwrap();
            let data = cone.output().unwrap();
            let expected = dir.normalize() * 0.5;
            prop_assert!((data.points[0] - expected).length() < 1e-4);
        }
    }
}
