mod overlay;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use folio_input::Key;
use folio_kernel::{FrameReport, Showcase, ShowcaseConfig, SimulationLoop};
use folio_render_wgpu::{GpuFrame, WgpuRenderer};
use glam::Vec2;
use overlay::LabelOverlay;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "folio-desktop", about = "Physics-driven 3D portfolio showcase")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (.yaml, .yml or .json); the built-in portfolio if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn map_key(event: &KeyEvent) -> Option<Key> {
    match &event.logical_key {
        WinitKey::Named(NamedKey::Enter) => Some(Key::Enter),
        WinitKey::Named(NamedKey::Space) => Some(Key::Space),
        WinitKey::Named(NamedKey::Escape) => Some(Key::Escape),
        WinitKey::Named(NamedKey::Backspace) => Some(Key::Backspace),
        WinitKey::Named(NamedKey::F1) => Some(Key::F1),
        WinitKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c.to_ascii_lowercase())),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Window-independent state.
struct AppState {
    showcase: Showcase,
    sim: SimulationLoop,
    overlay: LabelOverlay,
    grid_height: f32,
    dragging: bool,
    cursor: Option<Vec2>,
    show_help: bool,
    last_report: Option<FrameReport>,
}

impl AppState {
    fn new(config: &ShowcaseConfig) -> Result<Self> {
        Ok(Self {
            showcase: Showcase::from_config(config)?,
            sim: SimulationLoop::new(),
            overlay: LabelOverlay::default(),
            grid_height: config.floor.position.y + config.floor.size.y * 0.5,
            dragging: false,
            cursor: None,
            show_help: true,
            last_report: None,
        })
    }

    fn handle_key(&mut self, key: Key) {
        if key == Key::F1 {
            self.show_help = !self.show_help;
            return;
        }
        self.showcase.press_key(key);
    }

    /// A release always ends the drag; a press starts one only when egui
    /// did not take it.
    fn pointer_button(&mut self, pressed: bool, consumed_by_ui: bool) {
        if !pressed {
            self.dragging = false;
        } else if !consumed_by_ui {
            self.dragging = true;
        }
    }

    fn cursor_moved(&mut self, position: Vec2) {
        if let (true, Some(last)) = (self.dragging, self.cursor) {
            let action = self.showcase.bindings().map_drag(position - last);
            self.showcase.apply(action);
        }
        self.cursor = Some(position);
    }

    fn scrolled(&mut self, lines: f32) {
        let action = self.showcase.bindings().map_scroll(lines);
        self.showcase.apply(action);
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        self.overlay.paint(ctx);

        if !self.show_help {
            return;
        }
        egui::Window::new("folio")
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(8.0, -8.0))
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                if let Some(report) = &self.last_report {
                    let hovered = report
                        .hovered
                        .and_then(|i| self.showcase.registry().get(i))
                        .map(|e| e.name())
                        .unwrap_or("none");
                    ui.label(format!("Frame {}  step {:.4}s", report.frame, report.step));
                    ui.label(format!("Hovered: {hovered}"));
                }
                ui.separator();
                ui.small("Drag: orbit | Wheel: zoom | Enter: reset | F1: help | Esc: quit");
            });
    }
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("folio")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("folio_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        self.state.showcase.resize(config.width, config.height);

        let renderer = WgpuRenderer::new(
            &device,
            format,
            config.width,
            config.height,
            self.state.grid_height,
        );
        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(backend = adapter.get_info().backend.to_str(), "GPU initialized");

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let state = &mut self.state;
        let mut frame = GpuFrame {
            renderer: &gpu.renderer,
            device: &gpu.device,
            queue: &gpu.queue,
            view: &view,
        };
        let out = state
            .sim
            .tick(&mut state.showcase, Instant::now(), &mut frame, &mut state.overlay);
        state.last_report = Some(out.report);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialise graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match &mut self.gpu {
            Some(gpu) => gpu.egui_winit.on_window_event(&gpu.window, &event).consumed,
            None => false,
        };
        if let WindowEvent::MouseInput {
            button: MouseButton::Left | MouseButton::Right,
            state,
            ..
        } = event
        {
            self.state
                .pointer_button(state == ElementState::Pressed, consumed);
            return;
        }
        if consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                    self.state.showcase.resize(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match map_key(&event) {
                    Some(Key::Escape) => event_loop.exit(),
                    Some(key) => self.state.handle_key(key),
                    None => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.scrolled(lines);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.state.sim.stop();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ShowcaseConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ShowcaseConfig::default(),
    };
    tracing::info!(exhibits = config.exhibits.len(), "folio-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp {
        state: AppState::new(&config)?,
        gpu: None,
        egui_ctx: EguiContext::default(),
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
