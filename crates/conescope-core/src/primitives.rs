//! Draw-batch extraction.
//!
//! Splits poly data into flat, non-indexed vertex lists, one per primitive
//! kind, ready to be uploaded as GPU vertex buffers. Polygons are fan
//! triangulated, strips are unrolled with alternating winding, polylines
//! become segment lists.

use glam::{Vec3, Vec4};

use crate::mapper::ScalarColors;
use crate::poly_data::PolyData;
use crate::property::{Interpolation, Property, Representation};

/// GPU vertex layout shared with the render backend.
/// Note: Layout must match the WGSL `VertexInput` (40 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl DrawVertex {
    fn new(position: Vec3, normal: Vec3, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
        }
    }
}

/// Topology of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Point list.
    Points,
    /// Line list (pairs of vertices).
    Lines,
    /// Triangle list.
    Triangles,
}

/// A flat vertex list of one primitive kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    /// Topology.
    pub kind: PrimitiveKind,
    /// Vertices, non-indexed.
    pub vertices: Vec<DrawVertex>,
}

impl DrawBatch {
    fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
        }
    }

    /// Number of primitives in the batch.
    pub fn primitive_count(&self) -> usize {
        match self.kind {
            PrimitiveKind::Points => self.vertices.len(),
            PrimitiveKind::Lines => self.vertices.len() / 2,
            PrimitiveKind::Triangles => self.vertices.len() / 3,
        }
    }
}

/// Per-vertex attribute resolution for one extraction run.
struct Attributes<'a> {
    data: &'a PolyData,
    property: &'a Property,
    colors: Option<&'a ScalarColors>,
}

impl Attributes<'_> {
    fn point(&self, id: u32) -> Vec3 {
        self.data.points[id as usize]
    }

    fn color(&self, cell: usize, id: u32) -> Vec4 {
        let opacity = Vec4::new(1.0, 1.0, 1.0, self.property.opacity);
        match self.colors {
            Some(ScalarColors::PerPoint(colors)) => colors[id as usize] * opacity,
            Some(ScalarColors::PerCell(colors)) => colors[cell] * opacity,
            None => self.property.color.extend(self.property.opacity),
        }
    }

    /// Normal for a surface vertex; `face` is the geometric face normal.
    fn normal(&self, cell: usize, id: u32, face: Vec3) -> Vec3 {
        if self.property.interpolation == Interpolation::Gouraud {
            if let Some(normals) = &self.data.point_normals {
                return normals[id as usize];
            }
        }
        if let Some(normals) = &self.data.cell_normals {
            return normals[cell];
        }
        face
    }

    fn vertex(&self, cell: usize, id: u32, normal: Vec3) -> DrawVertex {
        DrawVertex::new(self.point(id), normal, self.color(cell, id))
    }
}

/// Newell normal of a polygon; robust for non-planar and concave input.
pub fn polygon_normal(points: &[Vec3], ids: &[u32]) -> Vec3 {
    let mut n = Vec3::ZERO;
    for (i, &a) in ids.iter().enumerate() {
        let p = points[a as usize];
        let q = points[ids[(i + 1) % ids.len()] as usize];
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n.normalize_or_zero()
}

/// Extracts draw batches from poly data.
///
/// `data` must have passed [`PolyData::validate`]. Empty batches are omitted.
pub fn extract_batches(
    data: &PolyData,
    property: &Property,
    colors: Option<&ScalarColors>,
) -> Vec<DrawBatch> {
    let attrs = Attributes {
        data,
        property,
        colors,
    };
    let [vert_offset, line_offset, poly_offset, strip_offset] = data.cell_offsets();

    let mut points = DrawBatch::new(PrimitiveKind::Points);
    let mut lines = DrawBatch::new(PrimitiveKind::Lines);
    let mut triangles = DrawBatch::new(PrimitiveKind::Triangles);

    for (i, ids) in data.verts.iter().enumerate() {
        let cell = vert_offset + i;
        for &id in ids {
            points.vertices.push(attrs.vertex(cell, id, Vec3::ZERO));
        }
    }

    for (i, ids) in data.lines.iter().enumerate() {
        let cell = line_offset + i;
        match property.representation {
            Representation::Points => push_points(&attrs, &mut points, cell, ids),
            _ => {
                for pair in ids.windows(2) {
                    lines.vertices.push(attrs.vertex(cell, pair[0], Vec3::ZERO));
                    lines.vertices.push(attrs.vertex(cell, pair[1], Vec3::ZERO));
                }
            }
        }
    }

    for (i, ids) in data.polys.iter().enumerate() {
        let cell = poly_offset + i;
        if ids.len() < 3 {
            continue;
        }
        match property.representation {
            Representation::Points => push_points(&attrs, &mut points, cell, ids),
            Representation::Wireframe => push_loop(&attrs, &mut lines, cell, ids),
            Representation::Surface => {
                let face = polygon_normal(&data.points, ids);
                for k in 1..ids.len() - 1 {
                    for id in [ids[0], ids[k], ids[k + 1]] {
                        let normal = attrs.normal(cell, id, face);
                        triangles.vertices.push(attrs.vertex(cell, id, normal));
                    }
                }
            }
        }
    }

    for (i, ids) in data.strips.iter().enumerate() {
        let cell = strip_offset + i;
        if ids.len() < 3 {
            continue;
        }
        for k in 0..ids.len() - 2 {
            let tri = if k % 2 == 0 {
                [ids[k], ids[k + 1], ids[k + 2]]
            } else {
                [ids[k + 1], ids[k], ids[k + 2]]
            };
            match property.representation {
                Representation::Points => push_points(&attrs, &mut points, cell, &tri),
                Representation::Wireframe => push_loop(&attrs, &mut lines, cell, &tri),
                Representation::Surface => {
                    let face = polygon_normal(&data.points, &tri);
                    for id in tri {
                        let normal = attrs.normal(cell, id, face);
                        triangles.vertices.push(attrs.vertex(cell, id, normal));
                    }
                }
            }
        }
    }

    [triangles, lines, points]
        .into_iter()
        .filter(|batch| !batch.vertices.is_empty())
        .collect()
}

fn push_points(attrs: &Attributes<'_>, batch: &mut DrawBatch, cell: usize, ids: &[u32]) {
    for &id in ids {
        batch.vertices.push(attrs.vertex(cell, id, Vec3::ZERO));
    }
}

fn push_loop(attrs: &Attributes<'_>, batch: &mut DrawBatch, cell: usize, ids: &[u32]) {
    for (k, &a) in ids.iter().enumerate() {
        let b = ids[(k + 1) % ids.len()];
        batch.vertices.push(attrs.vertex(cell, a, Vec3::ZERO));
        batch.vertices.push(attrs.vertex(cell, b, Vec3::ZERO));
    }
}
