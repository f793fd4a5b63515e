use std::sync::Arc;
use winit::window::Window;

/// Errors from creating or driving the presentation surface.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Window-backed presentation target: surface, device and queue.
///
/// Built once by the application and handed to whatever needs the GPU.
pub struct Screen {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

/// A frame acquired from the surface. Hand it back to [`Screen::present`].
pub struct ScreenFrame {
    texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl Screen {
    pub fn new(window: Arc<Window>) -> Result<Self, ScreenError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(ScreenError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("sceneview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let (width, height) = surface_extent(size.width, size.height);
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(ScreenError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            "screen initialized: {}x{} {:?} on {} backend",
            config.width,
            config.height,
            surface_format,
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface for a new window size. Returns the size actually
    /// configured, which the depth buffer must match.
    pub fn resize(&mut self, width: u32, height: u32) -> (u32, u32) {
        let (width, height) = surface_extent(width, height);
        if (width, height) != (self.config.width, self.config.height) {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            tracing::debug!("surface resized to {width}x{height}");
        }
        (width, height)
    }

    /// Acquire the next frame. `Ok(None)` means skip this frame: the surface
    /// was lost or outdated and has been reconfigured, or acquisition timed out.
    pub fn begin_frame(&mut self) -> Result<Option<ScreenFrame>, ScreenError> {
        let texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(None);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(ScreenError::Surface(wgpu::SurfaceError::OutOfMemory));
            }
            Err(e) => {
                tracing::warn!("skipping frame: {e}");
                return Ok(None);
            }
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Some(ScreenFrame { texture, view }))
    }

    /// Present a finished frame and schedule the next redraw.
    pub fn present(&self, frame: ScreenFrame) {
        self.window.pre_present_notify();
        frame.texture.present();
        self.window.request_redraw();
    }
}

/// Surface dimensions for a window size. wgpu rejects zero-sized surfaces,
/// which minimized windows report.
pub fn surface_extent(width: u32, height: u32) -> (u32, u32) {
    (width.max(1), height.max(1))
}
