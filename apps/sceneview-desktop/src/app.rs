use crate::ui::{self, TextureChoice};
use anyhow::{Context, Result};
use sceneview_assets::{ObjMesh, TextureLibrary, load_font, load_obj, load_shader_source};
use sceneview_common::{PanelLayout, Shape, ViewerConfig};
use sceneview_input::Input;
use sceneview_render_wgpu::{DEFAULT_SHADER, LIT_SHADER, Screen, ShaderSources, WgpuRenderer};
use sceneview_scene::{Scene, ViewerState};
use sceneview_tools::{ConsoleHistory, MessageLog};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

/// Pixels of smooth scrolling treated as one wheel notch.
const PIXELS_PER_LINE: f64 = 40.0;

/// GPU side of the app, created once the event loop has a window.
struct Gfx {
    screen: Screen,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

pub struct App {
    config: ViewerConfig,
    layout: PanelLayout,
    log: MessageLog,
    console: ConsoleHistory,
    input: Input,
    state: ViewerState,
    scene: Scene,
    textures: TextureLibrary,
    texture_choices: [TextureChoice; 2],
    models: Vec<(String, ObjMesh)>,
    egui_ctx: egui::Context,
    gfx: Option<Gfx>,
    error: Option<anyhow::Error>,
}

impl App {
    /// Load assets and build the scene. Nothing here needs a window.
    pub fn new(config: ViewerConfig, log: MessageLog) -> Self {
        let root = config.assets.root.clone();
        let mut textures = TextureLibrary::new();
        let scene = Scene::from_config(&config, |path| textures.load(&root, path));

        let texture_choices = [0usize, 1].map(|i| {
            let path = &config.assets.swap_textures[i];
            TextureChoice {
                label: format!("Crate {} texture", i + 1),
                id: textures.load(&root, path),
            }
        });

        let mut models = Vec::new();
        for object in scene.objects() {
            let Shape::Model { path } = object.shape() else {
                continue;
            };
            if models.iter().any(|(p, _)| p == path) {
                continue;
            }
            match load_obj(config.assets.resolve(path)) {
                Ok(mesh) => models.push((path.clone(), mesh)),
                Err(e) => tracing::warn!("model {path} not loaded, drawing a cube instead: {e}"),
            }
        }

        let egui_ctx = egui::Context::default();
        install_font(&egui_ctx, &config);

        Self {
            layout: config.layout(),
            config,
            log,
            console: ConsoleHistory::new(),
            input: Input::new(),
            state: ViewerState::default(),
            scene,
            textures,
            texture_choices,
            models,
            egui_ctx,
            gfx: None,
            error: None,
        }
    }

    /// The startup or frame error that stopped the loop, if any.
    pub fn into_error(self) -> Option<anyhow::Error> {
        self.error
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init_gfx(&mut self, event_loop: &ActiveEventLoop) -> Result<Gfx> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);
        let screen = Screen::new(window.clone()).context("initializing screen")?;

        let sources = ShaderSources {
            default: load_shader_source(
                self.config.assets.resolve(&self.config.assets.default_shader),
                DEFAULT_SHADER,
            )?,
            lit: load_shader_source(
                self.config.assets.resolve(&self.config.assets.lit_shader),
                LIT_SHADER,
            )?,
        };
        let (width, height) = screen.size();
        let mut renderer = WgpuRenderer::new(
            screen.device(),
            screen.queue(),
            screen.format(),
            width,
            height,
            &sources,
            &self.scene.grid,
        )
        .context("initializing shaders")?;

        for (id, data) in self.textures.iter() {
            renderer.upload_texture(screen.device(), screen.queue(), id, data);
        }
        for (path, mesh) in &self.models {
            renderer.upload_model(screen.device(), path, mesh);
        }

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(screen.device(), screen.format(), None, 1, false);

        Ok(Gfx {
            screen,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let frame_input = self.input.snapshot();
        self.scene.update(&frame_input, &mut self.state);
        self.console.pull(&self.log);

        let Self {
            gfx: Some(gfx),
            scene,
            state,
            console,
            layout,
            texture_choices,
            egui_ctx,
            ..
        } = self
        else {
            return;
        };

        let frame = match gfx.screen.begin_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                gfx.screen.window().request_redraw();
                return;
            }
            Err(e) => {
                let err = anyhow::Error::new(e).context("acquiring frame");
                self.fail(event_loop, err);
                return;
            }
        };

        let device = gfx.screen.device();
        let queue = gfx.screen.queue();
        let size = gfx.screen.size();
        gfx.renderer.render(device, queue, &frame.view, size, scene, state);

        let window = gfx.screen.window().clone();
        let raw_input = gfx.egui_winit.take_egui_input(&window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            ui::draw(ctx, layout, console, scene, state, texture_choices);
        });
        gfx.egui_winit
            .handle_platform_output(&window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.0, size.1],
            pixels_per_point: full_output.pixels_per_point,
        };
        for (id, image_delta) in &full_output.textures_delta.set {
            gfx.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        gfx.egui_renderer
            .update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
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
            gfx.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gfx.egui_renderer.free_texture(id);
        }

        gfx.screen.present(frame);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() || self.error.is_some() {
            return;
        }
        match self.init_gfx(event_loop) {
            Ok(gfx) => {
                gfx.screen.window().request_redraw();
                self.gfx = Some(gfx);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let consumed = match &mut self.gfx {
            Some(gfx) => {
                gfx.egui_winit
                    .on_window_event(gfx.screen.window(), &event)
                    .consumed
            }
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                self.input.request_close();
                if let Some(gfx) = &self.gfx {
                    gfx.screen.window().request_redraw();
                } else {
                    event_loop.exit();
                }
            }
            // Scale factor changes arrive followed by a Resized with the new
            // physical size.
            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.gfx {
                    let (width, height) = gfx.screen.resize(size.width, size.height);
                    gfx.renderer.resize(gfx.screen.device(), width, height);
                    gfx.screen.window().request_redraw();
                }
            }
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::KeyboardInput { event, .. } => {
                let Key::Character(text) = &event.logical_key else {
                    return;
                };
                let Some(key) = text.chars().next() else {
                    return;
                };
                match event.state {
                    ElementState::Pressed if !consumed => self.input.key_pressed(key),
                    ElementState::Pressed => {}
                    ElementState::Released => self.input.key_released(key),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => match state {
                ElementState::Pressed if !consumed => self.input.left_button(true),
                ElementState::Pressed => {}
                ElementState::Released => self.input.left_button(false),
            },
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                self.input.wheel(lines);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if !self.state.running {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }
}

/// Make the configured TTF the first proportional font at the configured
/// size. Missing or unreadable fonts keep the egui defaults.
fn install_font(ctx: &egui::Context, config: &ViewerConfig) {
    let path = config.assets.resolve(&config.assets.font);
    match load_font(&path) {
        Ok(bytes) => {
            let mut fonts = egui::FontDefinitions::default();
            fonts.font_data.insert(
                "ui_font".to_owned(),
                Arc::new(egui::FontData::from_owned(bytes)),
            );
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .insert(0, "ui_font".to_owned());
            ctx.set_fonts(fonts);
            tracing::info!("loaded font {}", path.display());
        }
        Err(e) => tracing::warn!("font {} not loaded, using defaults: {e}", path.display()),
    }

    let size = config.assets.font_size;
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            if matches!(text_style, egui::TextStyle::Body | egui::TextStyle::Button) {
                font_id.size = size;
            }
        }
    });
}
