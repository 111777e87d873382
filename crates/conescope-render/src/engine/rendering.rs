//! Frame preparation, encoding and readback.

use std::collections::HashSet;

use conescope_core::RenderWindow;
use glam::Vec2;

use super::{CameraUniforms, PipelineKey, RenderEngine};
use crate::actor_render::{ActorRenderData, ActorUniforms};
use crate::buffer::{aligned_bytes_per_row, update_uniform};
use crate::error::{RenderError, RenderResult};

/// One batch draw recorded for a frame.
struct DrawCall {
    actor_id: u64,
    batch: usize,
    key: PipelineKey,
}

/// Everything needed to draw one renderer.
struct RendererPass {
    camera: usize,
    /// x, y (top-left origin), width, height in pixels.
    viewport: [f32; 4],
    scissor: [u32; 4],
    /// Opaque draws first, then translucent ones.
    draws: Vec<DrawCall>,
}

/// Converts a bottom-left pixel rectangle into a wgpu viewport and scissor
/// rectangle (top-left origin), clamped to the target. `None` when empty.
fn target_rect(origin: Vec2, size: Vec2, width: u32, height: u32) -> Option<([f32; 4], [u32; 4])> {
    let clamp_x = |v: f32| v.round().clamp(0.0, width as f32) as u32;
    let clamp_y = |v: f32| v.round().clamp(0.0, height as f32) as u32;

    let top = height as f32 - (origin.y + size.y);
    let x0 = clamp_x(origin.x);
    let x1 = clamp_x(origin.x + size.x);
    let y0 = clamp_y(top);
    let y1 = clamp_y(top + size.y);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let (w, h) = (x1 - x0, y1 - y0);
    Some((
        [x0 as f32, y0 as f32, w as f32, h as f32],
        [x0, y0, w, h],
    ))
}

impl RenderEngine {
    /// Updates the scene, syncs GPU data and records what each renderer draws.
    fn prepare_frame(&mut self, window: &mut RenderWindow) -> RenderResult<Vec<RendererPass>> {
        window.prepare_for_render()?;
        let (width, height) = (self.width, self.height);
        self.ensure_camera_bindings(window.renderers().len());

        let mut live = HashSet::new();
        let mut passes = Vec::with_capacity(window.renderers().len());

        for (index, renderer) in window.renderers_mut().iter_mut().enumerate() {
            let (origin, size) = renderer.viewport().pixel_rect(width, height);
            let Some((viewport, scissor)) = target_rect(origin, size, width, height) else {
                continue;
            };

            let uniforms = CameraUniforms::from_renderer(renderer, renderer.aspect(width, height));
            update_uniform(&self.queue, &self.camera_bindings[index].buffer, &uniforms);

            let mut opaque = Vec::new();
            let mut translucent = Vec::new();
            for actor in renderer.actors_mut() {
                if !actor.visibility() || actor.mapper().is_none() {
                    continue;
                }
                let id = actor.id();
                live.insert(id);

                let stale = self
                    .actor_data
                    .get(&id)
                    .map_or(true, |data| data.modified_time != actor.modified_time());
                if stale {
                    let batches = actor.draw_batches()?;
                    log::trace!("uploading {} batches for actor {id}", batches.len());
                    if let Some(data) = self.actor_data.get_mut(&id) {
                        data.upload_batches(&self.device, actor, &batches);
                    } else {
                        let data = ActorRenderData::new(
                            &self.device,
                            &self.pipelines.actor_layout,
                            actor,
                            &batches,
                        );
                        self.actor_data.insert(id, data);
                    }
                }

                let Some(data) = self.actor_data.get(&id) else {
                    continue;
                };
                data.update_uniforms(&self.queue, &ActorUniforms::from_actor(actor));

                let target = if data.is_translucent() {
                    &mut translucent
                } else {
                    &mut opaque
                };
                for (batch, gpu) in data.batches.iter().enumerate() {
                    target.push(DrawCall {
                        actor_id: id,
                        batch,
                        key: PipelineKey::new(gpu.kind, data.is_translucent(), data.backface_culling()),
                    });
                }
            }

            opaque.extend(translucent);
            for call in &opaque {
                self.pipelines.ensure(&self.device, call.key);
            }
            passes.push(RendererPass {
                camera: index,
                viewport,
                scissor,
                draws: opaque,
            });
        }

        // Drop GPU data of actors that were removed or hidden.
        self.actor_data.retain(|id, _| live.contains(id));
        Ok(passes)
    }

    fn encode_frame(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        passes: &[RendererPass],
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        for pass in passes {
            let [x, y, w, h] = pass.viewport;
            render_pass.set_viewport(x, y, w, h, 0.0, 1.0);
            let [sx, sy, sw, sh] = pass.scissor;
            render_pass.set_scissor_rect(sx, sy, sw, sh);

            render_pass.set_pipeline(&self.pipelines.background);
            render_pass.set_bind_group(0, &self.camera_bindings[pass.camera].bind_group, &[]);
            render_pass.draw(0..3, 0..1);

            for call in &pass.draws {
                let (Some(pipeline), Some(data)) =
                    (self.pipelines.get(call.key), self.actor_data.get(&call.actor_id))
                else {
                    continue;
                };
                let Some(batch) = data.batches.get(call.batch) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &data.bind_group, &[]);
                render_pass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));
                render_pass.draw(0..batch.vertex_count, 0..1);
            }
        }
    }

    /// Draws the window's renderers and presents the frame on the surface.
    pub fn render_frame(&mut self, window: &mut RenderWindow) -> RenderResult<()> {
        if self.surface.is_none() {
            return Err(RenderError::NoSurface);
        }
        let passes = self.prepare_frame(window)?;
        let surface = self.surface.as_ref().ok_or(RenderError::NoSurface)?;

        let output = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Other) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::Outdated) => return Err(RenderError::SurfaceOutdated),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => return Err(RenderError::Timeout),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        self.encode_frame(&mut encoder, &view, &passes);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Draws the window's renderers offscreen and reads the frame back.
    ///
    /// Returns tightly packed RGBA8 rows, top row first.
    pub fn render_offscreen(&mut self, window: &mut RenderWindow) -> RenderResult<Vec<u8>> {
        let passes = self.prepare_frame(window)?;
        let texture = self
            .offscreen_texture
            .as_ref()
            .ok_or_else(|| RenderError::CaptureFailed("engine has no offscreen target".into()))?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row = aligned_bytes_per_row(self.width);
        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("offscreen encoder"),
            });
        self.encode_frame(&mut encoder, &view, &passes);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::CaptureFailed(e.to_string()))?;
        rx.recv()
            .map_err(|e| RenderError::CaptureFailed(e.to_string()))?
            .map_err(|e| RenderError::CaptureFailed(e.to_string()))?;

        // Strip row padding.
        let data = slice.get_mapped_range();
        let row_bytes = (self.width * 4) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        for row in 0..self.height as usize {
            let start = row * bytes_per_row as usize;
            pixels.extend_from_slice(&data[start..start + row_bytes]);
        }
        drop(data);
        readback.unmap();

        Ok(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_viewport() {
        let (viewport, scissor) =
            target_rect(Vec2::ZERO, Vec2::new(300.0, 200.0), 300, 200).unwrap();
        assert_eq!(viewport, [0.0, 0.0, 300.0, 200.0]);
        assert_eq!(scissor, [0, 0, 300, 200]);
    }

    #[test]
    fn test_bottom_left_quarter_flips_to_top_left_origin() {
        let (_, scissor) =
            target_rect(Vec2::ZERO, Vec2::new(150.0, 100.0), 300, 200).unwrap();
        assert_eq!(scissor, [0, 100, 150, 100]);
    }

    #[test]
    fn test_rect_clamped_to_target() {
        let (_, scissor) =
            target_rect(Vec2::new(250.0, -50.0), Vec2::new(100.0, 100.0), 300, 200).unwrap();
        assert_eq!(scissor, [250, 150, 50, 50]);
    }

    #[test]
    fn test_empty_rect() {
        assert!(target_rect(Vec2::ZERO, Vec2::new(0.2, 100.0), 300, 200).is_none());
    }
}
