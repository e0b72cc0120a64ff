use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use glam::{Mat4, Vec2, Vec3};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use geomlab::config::{self, ViewerConfig};
use geomlab::geometry::dodecahedron::{self, FACES};
use geomlab::geometry::shading::shade_faces;
use geomlab::geometry::{
    CylinderParams, Mesh, PolarCurve, build_stacked_cylinder, flat_shaded_vertices,
};
use geomlab::interaction::{BarrelController, BarrelState, Change, Lighting};
use geomlab::renderer::{Camera, CameraMode, GpuState, SceneUniform, Viewport, plot2d, scene};
use geomlab::ui::{
    DodecaView, LabMode, UiActions, UiState, apply_theme, draw_help_overlay, draw_side_panel,
};

const PAPER: wgpu::Color = wgpu::Color::WHITE;
const NIGHT: wgpu::Color = wgpu::Color::BLACK;

#[derive(Default)]
struct InputState {
    orbiting: bool,
    mouse_delta: Vec2,
    cursor: Vec2,
}

struct App {
    config: ViewerConfig,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    camera: Camera,
    ui_state: UiState,
    input: InputState,

    barrel: BarrelController,
    barrel_mesh: Mesh,
    shaded_mesh: Mesh,

    viewport: Viewport,
    scene_dirty: bool,

    frame_count: u32,
    fps_timer: Instant,
    last_vsync_state: bool,
    last_frame_time: Instant,
}

fn build_or_empty(result: Result<Mesh, geomlab::error::GeometryError>, what: &str) -> Mesh {
    match result {
        Ok(mesh) => {
            tracing::debug!(
                mesh = what,
                vertices = mesh.vertex_count(),
                faces = mesh.face_count(),
                "mesh rebuilt"
            );
            mesh
        }
        Err(err) => {
            tracing::error!(mesh = what, %err, "mesh generation failed");
            Mesh::default()
        }
    }
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let ui_state = UiState::from_config(&config);
        let barrel = BarrelController::new(
            BarrelState::from_config(&config.barrel),
            config.window.width as f32,
        );
        let barrel_mesh = build_or_empty(barrel.state.build_mesh(), "barrel");
        let shaded_mesh = build_or_empty(
            build_stacked_cylinder(CylinderParams::new(
                config.shaded_barrel.height,
                config.shaded_barrel.radius,
                ui_state.shaded_segments,
            )),
            "shaded barrel",
        );

        let viewport = Viewport::full(PhysicalSize::new(config.window.width, config.window.height));
        let mut camera = Camera::default();
        camera.set_aspect(viewport.width, viewport.height);

        Self {
            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            camera,
            last_vsync_state: !ui_state.vsync_enabled,
            ui_state,
            input: InputState::default(),

            barrel,
            barrel_mesh,
            shaded_mesh,

            viewport,
            scene_dirty: true,

            frame_count: 0,
            fps_timer: Instant::now(),
            last_frame_time: Instant::now(),

            config,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop, window: Arc<Window>) {
        let gpu = match pollster::block_on(GpuState::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(err) => {
                tracing::error!(%err, "GPU initialisation failed");
                event_loop.exit();
                return;
            }
        };

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);

        self.enter_lab();
    }

    /// Camera setup for the active lab.
    fn enter_lab(&mut self) {
        let lab = self.ui_state.lab;
        self.camera.set_mode(lab.camera_mode());
        match lab {
            LabMode::Dodecahedron => self.camera.reset_orbit(Vec3::ZERO, 10.0),
            LabMode::ShadedBarrel => {
                if let Some((target, distance)) = scene::orbit_framing(&self.shaded_mesh) {
                    self.camera.reset_orbit(target, distance);
                }
            }
            _ => {}
        }
        self.input.orbiting = false;
        self.barrel.release();
        self.scene_dirty = true;
        tracing::info!(lab = lab.label(), "lab selected");
    }

    fn rebuild_barrel_mesh(&mut self) {
        self.barrel_mesh = build_or_empty(self.barrel.state.build_mesh(), "barrel");
    }

    fn rebuild_shaded_mesh(&mut self) {
        let params = CylinderParams::new(
            self.config.shaded_barrel.height,
            self.config.shaded_barrel.radius,
            self.ui_state.shaded_segments,
        );
        self.shaded_mesh = build_or_empty(build_stacked_cylinder(params), "shaded barrel");
    }

    fn apply_change(&mut self, change: Change) {
        if change.regenerate {
            self.rebuild_barrel_mesh();
            self.scene_dirty = true;
        }
        // material changes reach the GPU with the per-frame scene uniform
    }

    fn update(&mut self) {
        self.frame_count += 1;
        if self.fps_timer.elapsed().as_secs_f32() >= 1.0 {
            self.ui_state.fps = self.frame_count as f32 / self.fps_timer.elapsed().as_secs_f32();
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }

        let lab = self.ui_state.lab;
        if lab.is_interactive_barrel() {
            self.barrel.tick(lab.color_cycle());
        }

        if self.input.orbiting && self.input.mouse_delta != Vec2::ZERO {
            self.camera.process_mouse_movement(self.input.mouse_delta);
            // painter's order depends on the eye position
            self.scene_dirty |= self.ui_state.dodeca_view == DodecaView::DepthSorted;
        }
        self.input.mouse_delta = Vec2::ZERO;
    }

    fn dodeca_vertices(&self) -> Vec<Vec3> {
        let tilt = self.ui_state.dodeca_view.tilt_degrees().to_radians();
        let rotated = dodecahedron::rotate_vertices(
            &dodecahedron::vertices(),
            dodecahedron::rotation_matrix(tilt, tilt, tilt),
        );
        dodecahedron::scale_vertices(&rotated, self.ui_state.dodeca_scale)
    }

    /// Rebuilds the vertex streams of the active lab and uploads them.
    fn upload_scene(&mut self) {
        let dodeca = self.dodeca_vertices();
        let Some(gpu) = self.gpu.as_mut() else { return };
        let buffers = &mut gpu.buffers;
        buffers.clear();

        let aspect = self.viewport.aspect();
        match self.ui_state.lab {
            LabMode::PolarRose => {
                let curve = PolarCurve::rose(self.ui_state.polar_a);
                buffers
                    .overlay
                    .upload(&gpu.queue, &plot2d::polar_plot_lines(&curve, aspect));
            }
            LabMode::Dodecahedron => match self.ui_state.dodeca_view {
                view @ (DodecaView::Wireframe | DodecaView::DepthSorted) => {
                    let half = 2.0 * self.ui_state.dodeca_scale;
                    let mut lines =
                        scene::box_lines(Vec3::splat(-half), Vec3::splat(half), scene::BOX_GREY);
                    if view == DodecaView::Wireframe {
                        lines.extend(scene::wireframe_lines(&dodeca, &FACES, scene::WIRE));
                    } else {
                        let order = scene::painter_order(&dodeca, &FACES, &self.camera);
                        buffers.translucent.upload(
                            &gpu.queue,
                            &scene::translucent_faces(&dodeca, &FACES, &order),
                        );
                        lines.extend(scene::ordered_edges(&dodeca, &FACES, &order));
                    }
                    buffers.lines.upload(&gpu.queue, &lines);
                }
                DodecaView::Orthographic => {
                    let points = dodecahedron::orthographic_projection(&dodecahedron::vertices());
                    buffers
                        .overlay
                        .upload(&gpu.queue, &plot2d::projection_lines(&points, &FACES, aspect));
                }
                DodecaView::Isometric => {
                    let points = dodecahedron::isometric_projection(&dodecahedron::vertices());
                    buffers
                        .overlay
                        .upload(&gpu.queue, &plot2d::projection_lines(&points, &FACES, aspect));
                }
            },
            LabMode::ShadedBarrel => {
                let shades = shade_faces(&self.shaded_mesh, self.ui_state.shaded_azimuth);
                buffers.shaded.upload(
                    &gpu.queue,
                    &scene::shaded_triangles(&self.shaded_mesh, &shades),
                );
                buffers.lines.upload(
                    &gpu.queue,
                    &scene::mesh_edges(&self.shaded_mesh, scene::FAINT_EDGE),
                );
            }
            LabMode::LitBarrel | LabMode::ColorCycleBarrel => {
                buffers
                    .lit
                    .upload(&gpu.queue, &flat_shaded_vertices(&self.barrel_mesh));
            }
        }

        self.scene_dirty = false;
    }

    fn scene_uniform(&self) -> SceneUniform {
        let lab = self.ui_state.lab;
        if lab.is_interactive_barrel() {
            let state = &self.barrel.state;
            SceneUniform::lit(
                scene::barrel_model(state),
                scene::barrel_base(),
                &Lighting::for_state(state, lab.color_cycle()),
            )
        } else {
            SceneUniform::unlit(Mat4::IDENTITY)
        }
    }

    /// Area left of the side panel, in physical pixels.
    fn update_viewport(&mut self, pixels_per_point: f32) {
        let Some(gpu) = &self.gpu else { return };
        let rect = self.egui_ctx.available_rect();
        let viewport = Viewport {
            x: rect.min.x * pixels_per_point,
            y: rect.min.y * pixels_per_point,
            width: rect.width() * pixels_per_point,
            height: rect.height() * pixels_per_point,
        }
        .clamped(gpu.size);

        if viewport != self.viewport {
            self.viewport = viewport;
            self.camera.set_aspect(viewport.width, viewport.height);
            self.barrel.set_viewport_width(viewport.width);
            self.scene_dirty = true;
        }
    }

    fn render(&mut self) {
        let frame_interval = self
            .config
            .frame
            .interval(self.ui_state.lab.color_cycle());
        let elapsed = self.last_frame_time.elapsed();
        if elapsed < frame_interval {
            std::thread::sleep(frame_interval - elapsed);
        }
        self.last_frame_time = Instant::now();

        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let barrel_state = self.barrel.state.clone();
        let mut ui_actions = UiActions::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui_actions = draw_side_panel(ctx, &mut self.ui_state, &barrel_state, frame_interval);

            if self.ui_state.show_help {
                draw_help_overlay(ctx, self.ui_state.lab, self.ui_state.dodeca_view);
            }
        });

        self.handle_ui_actions(ui_actions);
        self.update_viewport(full_output.pixels_per_point);
        if self.scene_dirty {
            self.upload_scene();
        }
        let scene_uniform = self.scene_uniform();

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        if self.ui_state.vsync_enabled != self.last_vsync_state {
            gpu.set_vsync(self.ui_state.vsync_enabled);
            self.last_vsync_state = self.ui_state.vsync_enabled;
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring");
                gpu.resize(gpu.size);
                return;
            }
            Err(err) => {
                tracing::warn!(%err, "skipping frame");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.update_camera(&self.camera);
        gpu.update_scene(&scene_uniform);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let viewport = self.viewport;
        match self.ui_state.lab {
            LabMode::PolarRose => {
                gpu.clear(&view, &mut encoder, PAPER);
                gpu.render_overlay(&view, &mut encoder, viewport);
            }
            LabMode::Dodecahedron => {
                gpu.clear(&view, &mut encoder, PAPER);
                gpu.render_translucent(&view, &mut encoder, viewport);
                gpu.render_lines(&view, &mut encoder, viewport);
                gpu.render_overlay(&view, &mut encoder, viewport);
            }
            LabMode::ShadedBarrel => {
                gpu.clear(&view, &mut encoder, PAPER);
                gpu.render_shaded(&view, &mut encoder, viewport);
                gpu.render_lines(&view, &mut encoder, viewport);
            }
            LabMode::LitBarrel | LabMode::ColorCycleBarrel => {
                gpu.clear(&view, &mut encoder, NIGHT);
                gpu.render_lit(&view, &mut encoder, viewport);
            }
        }

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }

    fn handle_ui_actions(&mut self, actions: UiActions) {
        if actions.lab_changed {
            self.enter_lab();
        }

        if actions.rebuild_shaded {
            self.rebuild_shaded_mesh();
        }

        if actions.rebuild_polar || actions.rebuild_dodeca || actions.rebuild_shaded {
            self.scene_dirty = true;
        }

        if actions.reset_camera {
            self.enter_lab();
        }

        if let Some(up) = actions.step_segments {
            let change = self.barrel.step_segments(up);
            self.apply_change(change);
        }

        if let Some(up) = actions.step_reflectance {
            let change = self.barrel.step_reflectance(up);
            self.apply_change(change);
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        match self.ui_state.lab {
            lab if lab.is_interactive_barrel() => {
                let change = self.barrel.key_event(key, pressed, repeat);
                self.apply_change(change);
            }
            LabMode::Dodecahedron
                if pressed && !repeat && self.ui_state.dodeca_view.is_3d() =>
            {
                match key {
                    KeyCode::Equal | KeyCode::NumpadAdd => {
                        self.ui_state.step_dodeca_scale(true);
                        self.scene_dirty = true;
                    }
                    KeyCode::Minus | KeyCode::NumpadSubtract => {
                        self.ui_state.step_dodeca_scale(false);
                        self.scene_dirty = true;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn set_orbiting(&mut self, orbiting: bool) {
        self.input.orbiting = orbiting;

        if let Some(window) = &self.window {
            if orbiting {
                let _ = window.set_cursor_grab(winit::window::CursorGrabMode::Confined);
                window.set_cursor_visible(false);
            } else {
                let _ = window.set_cursor_grab(winit::window::CursorGrabMode::None);
                window.set_cursor_visible(true);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        match event_loop.create_window(window_attrs) {
            Ok(window) => self.init_gpu(event_loop, Arc::new(window)),
            Err(err) => {
                tracing::error!(%err, "failed to create window");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("shutting down");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    self.scene_dirty = true;
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(key, event.state == ElementState::Pressed, event.repeat);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.barrel.cursor_moved(self.input.cursor);
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                if state == ElementState::Pressed && self.ui_state.lab.is_interactive_barrel() {
                    self.barrel.press(self.input.cursor);
                } else {
                    self.barrel.release();
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => {
                let orbital = self.ui_state.lab.camera_mode() == CameraMode::Orbital;
                self.set_orbiting(orbital && state == ElementState::Pressed);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.camera.process_scroll(scroll);
                self.scene_dirty |= self.ui_state.lab == LabMode::Dodecahedron;
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: winit::event::DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.orbiting {
                self.input.mouse_delta.x += delta.0 as f32;
                self.input.mouse_delta.y += delta.1 as f32;
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::load().context("failed to load viewer config")?;
    tracing::info!(
        width = config.window.width,
        height = config.window.height,
        segments = config.barrel.initial_segments,
        "starting geometry labs"
    );

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .context("event loop exited with an error")?;
    Ok(())
}
