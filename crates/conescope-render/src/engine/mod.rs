//! The main rendering engine.

mod pipelines;
mod rendering;

use std::collections::HashMap;
use std::sync::Arc;

use conescope_core::Renderer;
use glam::Vec3;

use crate::actor_render::ActorRenderData;
use crate::buffer::create_uniform_buffer;
use crate::error::{RenderError, RenderResult};

pub(crate) use pipelines::{PipelineKey, ScenePipelines};

/// Depth buffer format.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Color format of the offscreen target used by headless engines.
pub const HEADLESS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Per-renderer camera and light uniforms.
/// Note: Layout must match WGSL `CameraUniforms` exactly (128 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Eye position; `w` is 1 for parallel projection.
    pub camera_pos: [f32; 4],
    /// Direction toward the light.
    pub light_dir: [f32; 4],
    pub background: [f32; 4],
    /// `x` is 1 for two-sided lighting.
    pub options: [u32; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0, 0.0, 1.0, 0.0],
            light_dir: [0.0, 0.0, 1.0, 0.0],
            background: [0.0, 0.0, 0.0, 1.0],
            options: [1, 0, 0, 0],
        }
    }
}

impl CameraUniforms {
    /// Uniforms for a renderer's active camera and headlight.
    pub fn from_renderer(renderer: &Renderer, aspect_ratio: f32) -> Self {
        let camera = renderer.active_camera();
        let light_dir = if renderer.light_follow_camera {
            -camera.direction_of_projection()
        } else {
            Vec3::Z
        };
        Self {
            view_proj: camera.view_projection_matrix(aspect_ratio).to_cols_array_2d(),
            camera_pos: camera
                .position
                .extend(if camera.parallel_projection { 1.0 } else { 0.0 })
                .to_array(),
            light_dir: light_dir.extend(0.0).to_array(),
            background: renderer.background().extend(1.0).to_array(),
            options: [u32::from(renderer.two_sided_lighting), 0, 0, 0],
        }
    }
}

/// Uniform buffer and bind group for one renderer's camera.
pub(crate) struct CameraBinding {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

/// The main rendering engine backed by wgpu.
pub struct RenderEngine {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    /// The render surface (None for headless).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration.
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Depth texture.
    pub depth_texture: wgpu::Texture,
    /// Depth texture view.
    pub depth_view: wgpu::TextureView,
    /// Current target width.
    pub width: u32,
    /// Current target height.
    pub height: u32,
    pub(crate) pipelines: ScenePipelines,
    /// One binding per renderer index, grown on demand.
    pub(crate) camera_bindings: Vec<CameraBinding>,
    /// GPU data keyed by actor id.
    pub(crate) actor_data: HashMap<u64, ActorRenderData>,
    /// Offscreen color target (headless only).
    pub(crate) offscreen_texture: Option<wgpu::Texture>,
}

impl RenderEngine {
    /// Creates a new windowed render engine.
    pub async fn new_windowed(window: Arc<winit::window::Window>, vsync: bool) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("conescope device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        // Colors are written as given, so prefer a linear surface format.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::SurfaceConfigurationFailed)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "windowed engine on {:?} ({width}x{height}, {surface_format:?})",
            adapter.get_info().name
        );

        Self::from_parts(instance, adapter, device, queue, Some(surface), surface_config)
    }

    /// Creates a new headless render engine drawing into an offscreen texture.
    pub async fn new_headless(width: u32, height: u32) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("conescope device (headless)"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: HEADLESS_FORMAT,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        log::info!(
            "headless engine on {:?} ({}x{})",
            adapter.get_info().name,
            surface_config.width,
            surface_config.height
        );

        Self::from_parts(instance, adapter, device, queue, None, surface_config)
    }

    fn from_parts(
        instance: wgpu::Instance,
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: Option<wgpu::Surface<'static>>,
        surface_config: wgpu::SurfaceConfiguration,
    ) -> RenderResult<Self> {
        let width = surface_config.width;
        let height = surface_config.height;
        let (depth_texture, depth_view) = Self::create_depth_texture(&device, width, height);
        let offscreen_texture = surface
            .is_none()
            .then(|| Self::create_offscreen_texture(&device, width, height));
        let pipelines = ScenePipelines::new(&device, surface_config.format)?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            depth_texture,
            depth_view,
            width,
            height,
            pipelines,
            camera_bindings: Vec::new(),
            actor_data: HashMap::new(),
            offscreen_texture,
        })
    }

    /// Resizes the render target.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return;
        }

        self.width = width;
        self.height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;

        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        } else {
            self.offscreen_texture = Some(Self::create_offscreen_texture(&self.device, width, height));
        }

        let (depth_texture, depth_view) = Self::create_depth_texture(&self.device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
        log::debug!("render target resized to {width}x{height}");
    }

    /// Reconfigures the surface after it was lost or outdated.
    pub fn reconfigure_surface(&self) {
        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        }
    }

    /// Current target size.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of actors with uploaded GPU data.
    pub fn cached_actor_count(&self) -> usize {
        self.actor_data.len()
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    fn create_offscreen_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen color target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HEADLESS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// Makes sure a camera binding exists for every renderer index below `count`.
    pub(crate) fn ensure_camera_bindings(&mut self, count: usize) {
        while self.camera_bindings.len() < count {
            let buffer = create_uniform_buffer(
                &self.device,
                &CameraUniforms::default(),
                Some("camera uniforms"),
            );
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("camera bind group"),
                layout: &self.pipelines.camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.camera_bindings.push(CameraBinding { buffer, bind_group });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conescope_core::Camera;

    #[test]
    fn test_camera_uniforms_size_matches_wgsl() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 128);
    }

    #[test]
    fn test_headlight_points_back_at_camera() {
        let mut renderer = Renderer::new();
        let mut camera = Camera::new();
        camera.set_position(Vec3::new(0.0, 0.0, 10.0));
        renderer.set_active_camera(camera);
        renderer.set_background(Vec3::new(0.1, 0.2, 0.4));

        let uniforms = CameraUniforms::from_renderer(&renderer, 1.0);
        assert_eq!(uniforms.light_dir, [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(uniforms.background, [0.1, 0.2, 0.4, 1.0]);
        assert_eq!(uniforms.options[0], 1);
    }

    #[test]
    fn test_one_sided_lighting_flag() {
        let mut renderer = Renderer::new();
        renderer.two_sided_lighting = false;
        let uniforms = CameraUniforms::from_renderer(&renderer, 1.0);
        assert_eq!(uniforms.options[0], 0);
    }
}
