//! Actor GPU rendering resources.

use conescope_core::{Actor, DrawBatch, DrawVertex, PrimitiveKind, Property};

use crate::buffer::{create_uniform_buffer, create_vertex_buffer, update_uniform};

/// Per-actor uniforms.
/// Note: Layout must match WGSL `ActorUniforms` exactly (160 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ActorUniforms {
    /// Model-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix.
    pub normal_matrix: [[f32; 4]; 4],
    /// Specular color; `w` is 1 when lighting is enabled.
    pub specular_color: [f32; 4],
    /// Ambient, diffuse, specular coefficients and specular power.
    pub coefficients: [f32; 4],
}

impl Default for ActorUniforms {
    fn default() -> Self {
        Self::from_parts(glam::Mat4::IDENTITY, &Property::default())
    }
}

impl ActorUniforms {
    /// Uniforms for an actor's current transform and property.
    pub fn from_actor(actor: &Actor) -> Self {
        Self::from_parts(actor.matrix(), actor.property())
    }

    fn from_parts(model: glam::Mat4, property: &Property) -> Self {
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            glam::Mat4::IDENTITY
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            specular_color: property
                .specular_color
                .extend(if property.lighting { 1.0 } else { 0.0 })
                .to_array(),
            coefficients: [
                property.ambient,
                property.diffuse,
                property.specular,
                property.specular_power,
            ],
        }
    }
}

/// One uploaded draw batch.
pub struct GpuBatch {
    /// Topology.
    pub kind: PrimitiveKind,
    /// Non-indexed vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// Number of vertices to draw.
    pub vertex_count: u32,
}

/// GPU resources for rendering one actor.
pub struct ActorRenderData {
    /// Uploaded batches in draw order.
    pub batches: Vec<GpuBatch>,
    /// Uniform buffer.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group (group 1).
    pub bind_group: wgpu::BindGroup,
    /// Actor modification time the batches were built from.
    pub modified_time: u64,
    translucent: bool,
    backface_culling: bool,
}

impl ActorRenderData {
    /// Creates GPU resources for an actor.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        actor: &Actor,
        batches: &[DrawBatch],
    ) -> Self {
        let uniform_buffer =
            create_uniform_buffer(device, &ActorUniforms::from_actor(actor), Some("actor uniforms"));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("actor bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut data = Self {
            batches: Vec::new(),
            uniform_buffer,
            bind_group,
            modified_time: 0,
            translucent: false,
            backface_culling: false,
        };
        data.upload_batches(device, actor, batches);
        data
    }

    /// Replaces the vertex buffers with freshly extracted batches.
    pub fn upload_batches(&mut self, device: &wgpu::Device, actor: &Actor, batches: &[DrawBatch]) {
        self.batches = batches
            .iter()
            .filter(|batch| !batch.vertices.is_empty())
            .map(|batch| GpuBatch {
                kind: batch.kind,
                vertex_buffer: create_vertex_buffer(
                    device,
                    &batch.vertices,
                    Some("actor vertex buffer"),
                ),
                vertex_count: u32::try_from(batch.vertices.len()).unwrap_or(u32::MAX),
            })
            .collect();
        self.modified_time = actor.modified_time();
        self.translucent = actor.property().is_translucent() || has_translucent_vertex(batches);
        self.backface_culling = actor.property().backface_culling;
    }

    /// Writes the actor's current transform and lighting coefficients.
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &ActorUniforms) {
        update_uniform(queue, &self.uniform_buffer, uniforms);
    }

    /// Whether the actor is drawn with blending after opaque actors.
    pub fn is_translucent(&self) -> bool {
        self.translucent
    }

    /// Whether back faces are culled.
    pub fn backface_culling(&self) -> bool {
        self.backface_culling
    }
}

fn has_translucent_vertex(batches: &[DrawBatch]) -> bool {
    batches
        .iter()
        .flat_map(|batch| batch.vertices.iter())
        .any(|v: &DrawVertex| v.color[3] < 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_uniforms_size_matches_wgsl() {
        assert_eq!(std::mem::size_of::<ActorUniforms>(), 160);
    }

    #[test]
    fn test_uniforms_follow_property() {
        let mut actor = Actor::new();
        actor.property_mut().ambient = 0.25;
        actor.property_mut().lighting = false;
        actor.set_position(Vec3::new(1.0, 2.0, 3.0));

        let uniforms = ActorUniforms::from_actor(&actor);
        assert_eq!(uniforms.coefficients[0], 0.25);
        assert_eq!(uniforms.specular_color[3], 0.0);
        assert_eq!(uniforms.model[3][..3], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_degenerate_scale_keeps_identity_normals() {
        let mut actor = Actor::new();
        actor.set_scale(Vec3::new(1.0, 0.0, 1.0));
        let uniforms = ActorUniforms::from_actor(&actor);
        assert_eq!(uniforms.normal_matrix, glam::Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_translucent_vertex_detection() {
        let vertex = DrawVertex {
            position: [0.0; 3],
            normal: [0.0; 3],
            color: [1.0, 1.0, 1.0, 0.5],
        };
        let batch = DrawBatch {
            kind: PrimitiveKind::Points,
            vertices: vec![vertex],
        };
        assert!(has_translucent_vertex(&[batch]));
        assert!(!has_translucent_vertex(&[]));
    }
}
