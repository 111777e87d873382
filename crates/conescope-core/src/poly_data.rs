//! Polygonal data: points plus vertex, line, polygon and strip cells.

use glam::{Mat4, Vec3};

use crate::error::{Result, SceneError};

/// A list of cells, each cell being an ordered list of point ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellArray {
    cells: Vec<Vec<u32>>,
}

impl CellArray {
    /// Creates an empty cell array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cell array from a list of cells.
    pub fn from_cells(cells: Vec<Vec<u32>>) -> Self {
        Self { cells }
    }

    /// Appends a cell and returns its index within this array.
    pub fn insert_next_cell(&mut self, point_ids: impl Into<Vec<u32>>) -> usize {
        self.cells.push(point_ids.into());
        self.cells.len() - 1
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at `index`.
    pub fn cell(&self, index: usize) -> Option<&[u32]> {
        self.cells.get(index).map(Vec::as_slice)
    }

    /// Iterates over all cells.
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Total number of point ids across all cells.
    pub fn connectivity_len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Bounds {
    /// Creates bounds from two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Computes the bounds of a point set, or `None` when it is empty.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Length of the box diagonal.
    pub fn diagonal_length(&self) -> f32 {
        (self.max - self.min).length()
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Axis-aligned box enclosing this box after a transform.
    #[must_use]
    pub fn transformed(&self, matrix: Mat4) -> Bounds {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        // Eight corners, never empty.
        Bounds::from_points(&corners).unwrap_or(*self)
    }
}

/// Points with vertex, line, polygon and triangle-strip cells, plus
/// optional normals and scalars.
#[derive(Debug, Clone, Default)]
pub struct PolyData {
    /// Point coordinates.
    pub points: Vec<Vec3>,
    /// Vertex cells (rendered as points).
    pub verts: CellArray,
    /// Polyline cells.
    pub lines: CellArray,
    /// Polygon cells.
    pub polys: CellArray,
    /// Triangle-strip cells.
    pub strips: CellArray,
    /// Optional per-point normals.
    pub point_normals: Option<Vec<Vec3>>,
    /// Optional per-cell normals, indexed in verts, lines, polys, strips order.
    pub cell_normals: Option<Vec<Vec3>>,
    /// Optional per-point scalars.
    pub point_scalars: Option<Vec<f32>>,
    /// Optional per-cell scalars, indexed in verts, lines, polys, strips order.
    pub cell_scalars: Option<Vec<f32>>,
}

impl PolyData {
    /// Creates empty poly data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates poly data with the given points and no cells.
    pub fn with_points(points: Vec<Vec3>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Sets the vertex cells.
    pub fn set_verts(&mut self, verts: CellArray) {
        self.verts = verts;
    }

    /// Sets the line cells.
    pub fn set_lines(&mut self, lines: CellArray) {
        self.lines = lines;
    }

    /// Sets the polygon cells.
    pub fn set_polys(&mut self, polys: CellArray) {
        self.polys = polys;
    }

    /// Sets the triangle-strip cells.
    pub fn set_strips(&mut self, strips: CellArray) {
        self.strips = strips;
    }

    /// Sets per-point normals.
    pub fn set_point_normals(&mut self, normals: Vec<Vec3>) {
        self.point_normals = Some(normals);
    }

    /// Sets per-cell normals.
    pub fn set_cell_normals(&mut self, normals: Vec<Vec3>) {
        self.cell_normals = Some(normals);
    }

    /// Sets per-point scalars.
    pub fn set_point_scalars(&mut self, scalars: Vec<f32>) {
        self.point_scalars = Some(scalars);
    }

    /// Sets per-cell scalars.
    pub fn set_cell_scalars(&mut self, scalars: Vec<f32>) {
        self.cell_scalars = Some(scalars);
    }

    /// Number of points.
    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    /// Number of cells across all four cell arrays.
    pub fn number_of_cells(&self) -> usize {
        self.verts.len() + self.lines.len() + self.polys.len() + self.strips.len()
    }

    /// Offset of each cell array within the global cell numbering
    /// (verts, lines, polys, strips).
    pub fn cell_offsets(&self) -> [usize; 4] {
        let verts = 0;
        let lines = verts + self.verts.len();
        let polys = lines + self.lines.len();
        let strips = polys + self.polys.len();
        [verts, lines, polys, strips]
    }

    /// Bounding box of the points, or `None` without points.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }

    /// Checks cell connectivity and attribute sizes.
    pub fn validate(&self) -> Result<()> {
        let num_points = self.points.len();
        let mut cell = 0;
        for array in [&self.verts, &self.lines, &self.polys, &self.strips] {
            for ids in array.iter() {
                if let Some(&point_id) = ids.iter().find(|&&id| id as usize >= num_points) {
                    return Err(SceneError::InvalidCell {
                        cell,
                        point_id,
                        num_points,
                    });
                }
                cell += 1;
            }
        }

        let num_cells = self.number_of_cells();
        check_len("point normals", self.point_normals.as_deref(), num_points)?;
        check_len("point scalars", self.point_scalars.as_deref(), num_points)?;
        check_len("cell normals", self.cell_normals.as_deref(), num_cells)?;
        check_len("cell scalars", self.cell_scalars.as_deref(), num_cells)?;
        Ok(())
    }
}

fn check_len<T>(what: &'static str, data: Option<&[T]>, expected: usize) -> Result<()> {
    match data {
        Some(data) if data.len() != expected => Err(SceneError::SizeMismatch {
            what,
            expected,
            actual: data.len(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> PolyData {
        let mut data = PolyData::with_points(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        data.set_polys(CellArray::from_cells(vec![vec![0, 1, 2]]));
        data
    }

    #[test]
    fn test_bounds_of_points() {
        let data = triangle();
        let bounds = data.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(bounds.center(), Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_empty_bounds() {
        assert!(PolyData::new().bounds().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_point_id() {
        let mut data = triangle();
        // Second poly, so global cell 1.
        data.polys.insert_next_cell(vec![0, 2, 7]);
        match data.validate() {
            Err(SceneError::InvalidCell {
                cell, point_id, ..
            }) => {
                assert_eq!(cell, 1);
                assert_eq!(point_id, 7);
            }
            other => panic!("expected InvalidCell, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_cell_counts_earlier_arrays_first() {
        let mut data = triangle();
        data.lines.insert_next_cell(vec![0, 7]);
        // Lines come before polys, so the bad line is cell 0.
        assert!(matches!(
            data.validate(),
            Err(SceneError::InvalidCell { cell: 0, point_id: 7, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_short_scalars() {
        let mut data = triangle();
        data.set_point_scalars(vec![0.0, 1.0]);
        assert!(matches!(
            data.validate(),
            Err(SceneError::SizeMismatch { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_cell_offsets() {
        let mut data = triangle();
        data.verts.insert_next_cell(vec![0]);
        data.lines.insert_next_cell(vec![0, 1]);
        assert_eq!(data.cell_offsets(), [0, 1, 2, 3]);
        assert_eq!(data.number_of_cells(), 3);
    }

    #[test]
    fn test_transformed_bounds() {
        let bounds = Bounds::new(Vec3::ZERO, Vec3::ONE);
        let moved = bounds.transformed(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(moved.max, Vec3::new(3.0, 1.0, 1.0));
    }
}
