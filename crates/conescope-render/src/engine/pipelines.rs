//! Pipeline creation and caching for the render engine.

use std::collections::HashMap;
use std::num::NonZeroU64;

use conescope_core::{DrawVertex, PrimitiveKind};

use super::DEPTH_FORMAT;
use crate::actor_render::ActorUniforms;
use crate::error::RenderResult;
use crate::shader::ShaderBuilder;
use crate::CameraUniforms;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

/// Identifies one actor pipeline variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PipelineKey {
    pub(crate) kind: PrimitiveKind,
    pub(crate) translucent: bool,
    pub(crate) cull_back: bool,
}

impl PipelineKey {
    pub(crate) fn new(kind: PrimitiveKind, translucent: bool, backface_culling: bool) -> Self {
        Self {
            kind,
            translucent,
            // Culling only means something for triangles.
            cull_back: backface_culling && kind == PrimitiveKind::Triangles,
        }
    }
}

/// Bind group layouts, the background pipeline and lazily built actor pipelines.
pub(crate) struct ScenePipelines {
    /// Group 0: camera and light.
    pub(crate) camera_layout: wgpu::BindGroupLayout,
    /// Group 1: actor transform and material.
    pub(crate) actor_layout: wgpu::BindGroupLayout,
    /// Fills a viewport with its background color and far depth.
    pub(crate) background: wgpu::RenderPipeline,
    actor_shader: wgpu::ShaderModule,
    actor_pipeline_layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    cache: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    size: usize,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        }],
    })
}

impl ScenePipelines {
    pub(crate) fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> RenderResult<Self> {
        let camera_layout = uniform_layout(
            device,
            "camera bind group layout",
            std::mem::size_of::<CameraUniforms>(),
        );
        let actor_layout = uniform_layout(
            device,
            "actor bind group layout",
            std::mem::size_of::<ActorUniforms>(),
        );

        let actor_shader = ShaderBuilder::new()
            .with_source(include_str!("../shaders/actor.wgsl"))
            .with_label("actor shader")
            .build_module(device)?;
        let background_shader = ShaderBuilder::new()
            .with_source(include_str!("../shaders/background.wgsl"))
            .with_label("background shader")
            .build_module(device)?;

        let actor_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("actor pipeline layout"),
            bind_group_layouts: &[&camera_layout, &actor_layout],
            push_constant_ranges: &[],
        });
        let background_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("background pipeline layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let background = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background pipeline"),
            layout: Some(&background_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Always pass and write far depth so the viewport starts clean.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            camera_layout,
            actor_layout,
            background,
            actor_shader,
            actor_pipeline_layout,
            color_format,
            cache: HashMap::new(),
        })
    }

    /// Builds the pipeline for `key` if it has not been built yet.
    pub(crate) fn ensure(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.cache.contains_key(&key) {
            return;
        }
        log::debug!("creating actor pipeline {key:?}");
        let pipeline = self.create_actor_pipeline(device, key);
        self.cache.insert(key, pipeline);
    }

    pub(crate) fn get(&self, key: PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.cache.get(&key)
    }

    fn create_actor_pipeline(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        let topology = match key.kind {
            PrimitiveKind::Points => wgpu::PrimitiveTopology::PointList,
            PrimitiveKind::Lines => wgpu::PrimitiveTopology::LineList,
            PrimitiveKind::Triangles => wgpu::PrimitiveTopology::TriangleList,
        };
        let blend = if key.translucent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("actor pipeline"),
            layout: Some(&self.actor_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.actor_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<DrawVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.actor_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: key.cull_back.then_some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Translucent actors test against depth but do not write it.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: !key.translucent,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_culling_only_applies_to_triangles() {
        assert!(PipelineKey::new(PrimitiveKind::Triangles, false, true).cull_back);
        assert!(!PipelineKey::new(PrimitiveKind::Lines, false, true).cull_back);
        assert!(!PipelineKey::new(PrimitiveKind::Points, true, true).cull_back);
    }

    #[test]
    fn test_vertex_stride_matches_layout() {
        assert_eq!(std::mem::size_of::<DrawVertex>(), 40);
        assert_eq!(VERTEX_ATTRIBUTES[2].offset, 24);
    }
}
