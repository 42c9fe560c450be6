use anyhow::Result;
use clap::Parser;
use cubeview_camera::{Camera, ViewState};
use cubeview_input::{Command, MouseLook, PipePoseSource, PoseSource, apply_pose, map_key};
use cubeview_render::{FrameView, RenderMode};
use cubeview_render_wgpu::WgpuSceneRenderer;
use cubeview_scene::{Scene, demo_scene, marker_scene};
use glam::Vec3;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "cubeview-viewer", about = "Windowed cube scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Drive object 1 from pose readings on standard input
    #[arg(long)]
    marker_input: bool,

    /// Window width in pixels
    #[arg(long, default_value = "500")]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value = "500")]
    height: u32,
}

/// Application state. Event handlers mutate it by reference; nothing lives
/// in globals.
struct AppState {
    scene: Scene,
    camera: Camera,
    view: ViewState,
    mouse: MouseLook,
    mode: RenderMode,
    step_size: f32,
    cursor: (f32, f32),
    pose_source: Option<PipePoseSource>,
}

/// The marker variant steps farther because its camera sits farther back.
const DEMO_STEP: f32 = 0.2;
const MARKER_STEP: f32 = 2.0;

/// The scene object the pose feed drives.
const MARKER_OBJECT: usize = 1;

impl AppState {
    fn new(marker_input: bool) -> Self {
        let (scene, camera, step_size, pose_source) = if marker_input {
            (
                marker_scene(),
                Camera::at_position(Vec3::new(0.0, 0.0, 45.4)),
                MARKER_STEP,
                Some(PipePoseSource::stdin()),
            )
        } else {
            (demo_scene(), Camera::default(), DEMO_STEP, None)
        };

        Self {
            scene,
            camera,
            view: ViewState::default(),
            mouse: MouseLook::default(),
            mode: RenderMode::default(),
            step_size,
            cursor: (0.0, 0.0),
            pose_source,
        }
    }

    /// Apply one key command. Returns whether a redraw is needed; quit is
    /// handled by the caller.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Step(direction) => {
                match self.camera.apply_step(direction, self.step_size) {
                    Ok(()) => true,
                    Err(e) => {
                        // Frustum kept; the camera still moved along the axis
                        // and the next valid step recovers.
                        tracing::warn!("camera step rejected: {e}");
                        true
                    }
                }
            }
            Command::ToggleWireframe => {
                self.mode.toggle();
                true
            }
            Command::Quit | Command::Noop => false,
        }
    }

    /// Poll the pose feed once; apply any reading to the marker object.
    /// Returns whether the scene changed.
    fn poll_pose(&mut self) -> bool {
        let Some(source) = &mut self.pose_source else {
            return false;
        };
        let Some(pose) = source.try_read_pose() else {
            return false;
        };
        let Some(object) = self.scene.object_mut(MARKER_OBJECT) else {
            return false;
        };
        match apply_pose(object, &pose) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("pose reading rejected: {e}");
                false
            }
        }
    }
}

/// Translate the physical keys the demo binds into their characters.
fn key_char(code: KeyCode) -> Option<char> {
    match code {
        KeyCode::KeyW => Some('w'),
        KeyCode::KeyA => Some('a'),
        KeyCode::KeyS => Some('s'),
        KeyCode::KeyD => Some('d'),
        KeyCode::KeyE => Some('e'),
        KeyCode::KeyT => Some('t'),
        KeyCode::KeyQ => Some('q'),
        _ => None,
    }
}

struct ViewerApp {
    state: AppState,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuSceneRenderer>,
}

impl ViewerApp {
    fn new(state: AppState, width: u32, height: u32) -> Self {
        Self {
            state,
            initial_size: PhysicalSize::new(width.max(1), height.max(1)),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("cubeview")
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubeview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuSceneRenderer::new(
            &device,
            surface_format,
            size.width,
            size.height,
            &self.state.scene,
        );

        self.state
            .mouse
            .set_window_size(size.width, size.height, &self.state.camera.frustum);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);

        tracing::info!(
            "window up with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
                // Drag sensitivity tracks the window size and current frustum.
                self.state.mouse.set_window_size(
                    new_size.width,
                    new_size.height,
                    &self.state.camera.frustum,
                );
                self.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let Some(key) = key_char(code) else { return };
                let command = map_key(key);
                if command == Command::Quit {
                    event_loop.exit();
                    return;
                }
                if self.state.handle_command(command) {
                    self.request_redraw();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                let (x, y) = self.state.cursor;
                self.state
                    .mouse
                    .on_button(btn_state == ElementState::Pressed, x, y);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.state.cursor = (x, y);
                if self.state.mouse.on_motion(x, y, &mut self.state.view) {
                    self.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
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

                if let Some(renderer) = &self.renderer {
                    let frame =
                        FrameView::compose(&self.state.camera, &self.state.view, self.state.mode);
                    renderer.render(device, queue, &view, &self.state.scene, &frame);
                }

                output.present();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state.poll_pose() {
            self.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(marker_input = cli.marker_input, "cubeview-viewer starting");

    let event_loop = EventLoop::new()?;
    // The marker variant polls its pose feed between events; the plain demo
    // sleeps until the next input.
    event_loop.set_control_flow(if cli.marker_input {
        ControlFlow::Poll
    } else {
        ControlFlow::Wait
    });

    let state = AppState::new(cli.marker_input);
    let mut app = ViewerApp::new(state, cli.width, cli.height);
    event_loop.run_app(&mut app)?;

    Ok(())
}
