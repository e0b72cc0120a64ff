use glam::Mat4;

use crate::error::GpuError;
use crate::geometry::LitVertex;
use crate::interaction::Lighting;
use crate::renderer::camera::{Camera, CameraUniform};
use crate::renderer::vertex::{ColorVertex, color_vertex_layout, lit_vertex_layout};

const MAX_LIT_VERTICES: usize = 65_536;
const MAX_SHADED_VERTICES: usize = 65_536;
const MAX_TRANSLUCENT_VERTICES: usize = 1024;
const MAX_LINE_VERTICES: usize = 65_536;
const MAX_OVERLAY_VERTICES: usize = 32_768;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame model transform plus the fixed-function style light setup.
///
/// `lighting_frame` maps vertices into the space the light position is
/// expressed in; for the barrels that is the object's base orientation, so
/// the light turns with the object.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub model: [[f32; 4]; 4],
    pub lighting_frame: [[f32; 4]; 4],
    pub light_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    /// x: shininess
    pub params: [f32; 4],
}

impl SceneUniform {
    pub fn unlit(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            lighting_frame: Mat4::IDENTITY.to_cols_array_2d(),
            light_position: [0.0; 4],
            light_ambient: [0.0; 4],
            light_diffuse: [0.0; 4],
            light_specular: [0.0; 4],
            material_diffuse: [0.0; 4],
            material_specular: [0.0; 4],
            params: [1.0, 0.0, 0.0, 0.0],
        }
    }

    pub fn lit(model: Mat4, lighting_frame: Mat4, lighting: &Lighting) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            lighting_frame: lighting_frame.to_cols_array_2d(),
            light_position: lighting.light_position.extend(1.0).to_array(),
            light_ambient: lighting.ambient,
            light_diffuse: lighting.diffuse,
            light_specular: lighting.specular,
            material_diffuse: lighting.material_diffuse,
            material_specular: lighting.material_specular,
            params: [lighting.shininess, 0.0, 0.0, 0.0],
        }
    }
}

/// Region of the surface the labs draw into, in physical pixels. The rest
/// is covered by the side panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn full(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width.max(1) as f32,
            height: size.height.max(1) as f32,
        }
    }

    /// Clips to the surface; degenerate rects fall back to the full surface.
    pub fn clamped(self, size: winit::dpi::PhysicalSize<u32>) -> Self {
        let full = Self::full(size);
        let x = self.x.clamp(0.0, full.width - 1.0);
        let y = self.y.clamp(0.0, full.height - 1.0);
        let width = self.width.min(full.width - x);
        let height = self.height.min(full.height - y);
        if width < 1.0 || height < 1.0 {
            full
        } else {
            Self { x, y, width, height }
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

/// Preallocated vertex buffer; uploads beyond capacity are truncated.
pub struct LayerBuffer {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
    capacity: usize,
    label: &'static str,
}

impl LayerBuffer {
    fn new(device: &wgpu::Device, label: &'static str, stride: usize, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * stride) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            vertex_count: 0,
            capacity,
            label,
        }
    }

    pub fn upload<T: bytemuck::Pod>(&mut self, queue: &wgpu::Queue, vertices: &[T]) {
        let count = vertices.len().min(self.capacity);
        if count < vertices.len() {
            tracing::warn!(
                buffer = self.label,
                requested = vertices.len(),
                capacity = self.capacity,
                "vertex upload truncated"
            );
        }
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&vertices[..count]));
        }
        self.vertex_count = count as u32;
    }

    pub fn clear(&mut self) {
        self.vertex_count = 0;
    }
}

pub struct SceneBuffers {
    pub lit: LayerBuffer,
    pub shaded: LayerBuffer,
    pub translucent: LayerBuffer,
    pub lines: LayerBuffer,
    pub overlay: LayerBuffer,
    pub scene_uniform_buffer: wgpu::Buffer,
}

impl SceneBuffers {
    pub fn new(device: &wgpu::Device) -> Self {
        let lit_stride = std::mem::size_of::<LitVertex>();
        let color_stride = std::mem::size_of::<ColorVertex>();

        let scene_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            lit: LayerBuffer::new(device, "Lit Vertex Buffer", lit_stride, MAX_LIT_VERTICES),
            shaded: LayerBuffer::new(
                device,
                "Shaded Vertex Buffer",
                color_stride,
                MAX_SHADED_VERTICES,
            ),
            translucent: LayerBuffer::new(
                device,
                "Translucent Vertex Buffer",
                color_stride,
                MAX_TRANSLUCENT_VERTICES,
            ),
            lines: LayerBuffer::new(device, "Line Vertex Buffer", color_stride, MAX_LINE_VERTICES),
            overlay: LayerBuffer::new(
                device,
                "Overlay Vertex Buffer",
                color_stride,
                MAX_OVERLAY_VERTICES,
            ),
            scene_uniform_buffer,
        }
    }

    pub fn clear(&mut self) {
        self.lit.clear();
        self.shaded.clear();
        self.translucent.clear();
        self.lines.clear();
        self.overlay.clear();
    }
}

pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,

    pub pipeline_lit: wgpu::RenderPipeline,
    pub pipeline_shaded: wgpu::RenderPipeline,
    pub pipeline_translucent: wgpu::RenderPipeline,
    pub pipeline_lines: wgpu::RenderPipeline,
    pub pipeline_overlay: wgpu::RenderPipeline,

    pub camera_buffer: wgpu::Buffer,
    pub scene_bind_group: wgpu::BindGroup,

    pub buffers: SceneBuffers,

    pub depth_texture: wgpu::TextureView,
}

fn depth_state(write: bool, compare: wgpu::CompareFunction) -> Option<wgpu::DepthStencilState> {
    Some(wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    })
}

/// NDC line pipeline for the 2D plots. It shares passes with the 3D layers,
/// so it declares the depth attachment but never tests or writes it.
fn overlay_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Overlay Pipeline Layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Overlay Render Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_overlay_main"),
            buffers: &[color_vertex_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_color_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
            ..Default::default()
        },
        depth_stencil: depth_state(false, wgpu::CompareFunction::Always),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl GpuState {
    pub async fn new(window: std::sync::Arc<winit::window::Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!(adapter = %info.name, backend = ?info.backend, "selected adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let buffers = SceneBuffers::new(&device);

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[uniform_entry(0), uniform_entry(1)],
            });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.scene_uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout_scene = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout],
            push_constant_ranges: &[],
        });

        let color_target = |blend: Option<wgpu::BlendState>| {
            [Some(wgpu::ColorTargetState {
                format: config.format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })]
        };
        let opaque_target = color_target(Some(wgpu::BlendState::REPLACE));
        let blended_target = color_target(Some(wgpu::BlendState::ALPHA_BLENDING));

        let pipeline_lit = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Lit Render Pipeline"),
            layout: Some(&pipeline_layout_scene),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_lit_main"),
                buffers: &[lit_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_lit_main"),
                targets: &opaque_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_state(true, wgpu::CompareFunction::Less),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let pipeline_shaded = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shaded Render Pipeline"),
            layout: Some(&pipeline_layout_scene),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_color_main"),
                buffers: &[color_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_color_main"),
                targets: &opaque_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_state(true, wgpu::CompareFunction::Less),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Painter's order: faces arrive back to front, so depth is ignored.
        let pipeline_translucent = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Translucent Render Pipeline"),
            layout: Some(&pipeline_layout_scene),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_color_main"),
                buffers: &[color_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_color_main"),
                targets: &blended_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_state(false, wgpu::CompareFunction::Always),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let pipeline_lines = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Render Pipeline"),
            layout: Some(&pipeline_layout_scene),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_color_main"),
                buffers: &[color_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_color_main"),
                targets: &blended_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: depth_state(true, wgpu::CompareFunction::LessEqual),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let pipeline_overlay = overlay_pipeline(&device, &shader, config.format);

        let depth_texture = Self::create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            pipeline_lit,
            pipeline_shaded,
            pipeline_translucent,
            pipeline_lines,
            pipeline_overlay,
            camera_buffer,
            scene_bind_group,
            buffers,
            depth_texture,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth_texture(&self.device, &self.config);
        }
    }

    pub fn update_camera(&self, camera: &Camera) {
        let uniform = CameraUniform::from_camera(camera);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn update_scene(&self, scene: &SceneUniform) {
        self.queue.write_buffer(
            &self.buffers.scene_uniform_buffer,
            0,
            bytemuck::cast_slice(&[*scene]),
        );
    }

    pub fn set_vsync(&mut self, enabled: bool) {
        self.config.present_mode = if enabled {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self.surface.configure(&self.device, &self.config);
    }

    /// Opens a pass restricted to `viewport`. With `clear`, color and depth
    /// are cleared first; otherwise earlier passes are kept.
    fn begin_pass<'a>(
        &'a self,
        label: &'static str,
        view: &'a wgpu::TextureView,
        encoder: &'a mut wgpu::CommandEncoder,
        clear: Option<wgpu::Color>,
        viewport: Viewport,
    ) -> wgpu::RenderPass<'a> {
        let (load_op, depth_load) = match clear {
            Some(color) => (wgpu::LoadOp::Clear(color), wgpu::LoadOp::Clear(1.0)),
            None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: load_op,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let vp = viewport.clamped(self.size);
        render_pass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0);
        render_pass
    }

    /// Clears the whole surface, including the area under the side panel.
    pub fn clear(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        color: wgpu::Color,
    ) {
        let _pass = self.begin_pass(
            "Clear Pass",
            view,
            encoder,
            Some(color),
            Viewport::full(self.size),
        );
    }

    pub fn render_lit(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        viewport: Viewport,
    ) {
        let layer = &self.buffers.lit;
        if layer.vertex_count == 0 {
            return;
        }
        let mut render_pass = self.begin_pass("Lit Render Pass", view, encoder, None, viewport);
        render_pass.set_pipeline(&self.pipeline_lit);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_pass.set_vertex_buffer(0, layer.buffer.slice(..));
        render_pass.draw(0..layer.vertex_count, 0..1);
    }

    pub fn render_shaded(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        viewport: Viewport,
    ) {
        let layer = &self.buffers.shaded;
        if layer.vertex_count == 0 {
            return;
        }
        let mut render_pass =
            self.begin_pass("Shaded Render Pass", view, encoder, None, viewport);
        render_pass.set_pipeline(&self.pipeline_shaded);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_pass.set_vertex_buffer(0, layer.buffer.slice(..));
        render_pass.draw(0..layer.vertex_count, 0..1);
    }

    pub fn render_translucent(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        viewport: Viewport,
    ) {
        let layer = &self.buffers.translucent;
        if layer.vertex_count == 0 {
            return;
        }
        let mut render_pass =
            self.begin_pass("Translucent Render Pass", view, encoder, None, viewport);
        render_pass.set_pipeline(&self.pipeline_translucent);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_pass.set_vertex_buffer(0, layer.buffer.slice(..));
        render_pass.draw(0..layer.vertex_count, 0..1);
    }

    pub fn render_lines(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        viewport: Viewport,
    ) {
        let layer = &self.buffers.lines;
        if layer.vertex_count == 0 {
            return;
        }
        let mut render_pass = self.begin_pass("Line Render Pass", view, encoder, None, viewport);
        render_pass.set_pipeline(&self.pipeline_lines);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_pass.set_vertex_buffer(0, layer.buffer.slice(..));
        render_pass.draw(0..layer.vertex_count, 0..1);
    }

    pub fn render_overlay(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        viewport: Viewport,
    ) {
        let layer = &self.buffers.overlay;
        if layer.vertex_count == 0 {
            return;
        }
        let mut render_pass =
            self.begin_pass("Overlay Render Pass", view, encoder, None, viewport);
        render_pass.set_pipeline(&self.pipeline_overlay);
        render_pass.set_vertex_buffer(0, layer.buffer.slice(..));
        render_pass.draw(0..layer.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_scene_uniform_layout() {
        // two mat4 followed by seven vec4, no implicit padding
        assert_eq!(std::mem::size_of::<SceneUniform>(), 2 * 64 + 7 * 16);
    }

    #[test]
    fn test_viewport_clamped_to_surface() {
        let size = PhysicalSize::new(800, 600);
        let vp = Viewport {
            x: 100.0,
            y: 0.0,
            width: 2000.0,
            height: 600.0,
        }
        .clamped(size);
        assert_eq!(vp.width, 700.0);
        assert_eq!(vp.height, 600.0);
    }

    #[test]
    fn test_degenerate_viewport_uses_full_surface() {
        let size = PhysicalSize::new(800, 600);
        let vp = Viewport {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
        .clamped(size);
        assert_eq!(vp, Viewport::full(size));
        assert!((vp.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_lit_uniform_carries_lighting() {
        let lighting = Lighting::from_reflectance(0.3);
        let uniform = SceneUniform::lit(Mat4::IDENTITY, Mat4::IDENTITY, &lighting);
        assert_eq!(uniform.params[0], lighting.shininess);
        assert_eq!(uniform.light_position[3], 1.0);
        assert_eq!(uniform.light_ambient, lighting.ambient);
    }

    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None)).ok()
    }

    fn attachment(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: None,
                size: wgpu::Extent3d {
                    width: 64,
                    height: 64,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    #[test]
    fn test_overlay_pipeline_fits_depth_attached_pass() {
        let Some((device, queue)) = headless_device() else {
            eprintln!("no adapter, skipping");
            return;
        };
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });
        let color = attachment(&device, format);
        let depth = attachment(&device, DEPTH_FORMAT);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = overlay_pipeline(&device, &shader, format);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color,
                    resolve_target: None,
                    ops: wgpu::Operations::default(),
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth,
                    depth_ops: Some(wgpu::Operations::default()),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&pipeline);
        }
        queue.submit(std::iter::once(encoder.finish()));
        let error = pollster::block_on(device.pop_error_scope());
        assert!(error.is_none(), "{error:?}");
    }
}
