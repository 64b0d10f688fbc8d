use std::sync::Arc;

use wgpu::{
    Backends, CommandEncoder, CommandEncoderDescriptor, CompositeAlphaMode, Device,
    DeviceDescriptor, Features, Instance, InstanceDescriptor, PresentMode, Queue,
    RequestAdapterOptions, Surface, SurfaceCapabilities, SurfaceConfiguration, SurfaceError,
    SurfaceTexture, TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{config::AppConfig, error::SessionError, viewport::Viewport};

/// Owns the window and the device bound to it.
///
/// Everything created from `device()` is only valid while the session lives.
pub(crate) struct Session {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    window: Arc<Window>,
    config: SurfaceConfiguration,
    viewport: Viewport,
}

/// One acquired surface texture and the encoder recording into it.
pub(crate) struct Frame {
    pub(crate) surface_texture: SurfaceTexture,
    pub(crate) view: TextureView,
    pub(crate) encoder: CommandEncoder,
}

/// What the caller should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame may render.
    Reconfigured,
    SkipFrame,
    Fatal,
}

impl Session {
    pub(crate) async fn open(
        window: Window,
        app_config: &AppConfig,
    ) -> Result<Self, SessionError> {
        let window = Arc::new(window);
        let window_size = window.inner_size();

        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::default(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(SessionError::context)?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(SessionError::context)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let required_features = app_config.fill_mode.required_features() & adapter.features();

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Session Device"),
                required_features,
                ..Default::default()
            })
            .await
            .map_err(SessionError::context)?;

        let capabilities = surface.get_capabilities(&adapter);

        let format = choose_surface_format(&capabilities)
            .ok_or_else(|| SessionError::context("surface is incompatible with the adapter"))?;

        let present_mode = if capabilities.present_modes.contains(&PresentMode::Fifo) {
            PresentMode::Fifo
        } else {
            capabilities
                .present_modes
                .first()
                .copied()
                .ok_or_else(|| SessionError::context("no supported present modes"))?
        };

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: window_size.width.max(1),
            height: window_size.height.max(1),
            present_mode,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(CompositeAlphaMode::Auto),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let viewport = Viewport::from(window_size);
        log::info!(
            "session open: {format:?}, {present_mode:?}, viewport {}x{}",
            viewport.width,
            viewport.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            window,
            config,
            viewport,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn device(&self) -> &Device {
        &self.device
    }

    pub(crate) fn features(&self) -> Features {
        self.device.features()
    }

    pub(crate) fn surface_format(&self) -> TextureFormat {
        self.config.format
    }

    pub(crate) fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Tracks the new framebuffer size. The surface is only reconfigured for non-zero sizes.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.viewport = Viewport::from(new_size);
        log::debug!("resized to {}x{}", new_size.width, new_size.height);

        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub(crate) fn begin_frame(&self) -> Result<Frame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;

        let view = surface_texture.texture.create_view(&TextureViewDescriptor {
            label: Some("Frame Texture View"),
            ..Default::default()
        });

        let encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Frame Command Encoder"),
            });

        Ok(Frame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and swaps the finished frame onto the screen.
    pub(crate) fn present(&self, frame: Frame) {
        let Frame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    pub(crate) fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface_error_action(&err);

        match action {
            SurfaceErrorAction::Reconfigured => {
                if self.viewport.is_drawable() {
                    self.surface.configure(&self.device, &self.config);
                }
                log::warn!("surface {err}, reconfigured");
            }
            SurfaceErrorAction::SkipFrame => log::debug!("surface {err}, skipping frame"),
            SurfaceErrorAction::Fatal => log::error!("surface {err}"),
        }

        action
    }
}

fn surface_error_action(err: &SurfaceError) -> SurfaceErrorAction {
    match err {
        SurfaceError::Lost | SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        SurfaceError::Timeout | SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

fn choose_surface_format(capabilities: &SurfaceCapabilities) -> Option<TextureFormat> {
    capabilities
        .formats
        .iter()
        .find(|format| format.is_srgb())
        .or(capabilities.formats.first())
        .copied()
}
