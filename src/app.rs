use anyhow::{Result, anyhow};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::{
    config::AppConfig,
    error::SessionError,
    input::InputEvent,
    lifecycle::{CloseReason, LoopState},
    render::Renderer,
    session::{Session, SurfaceErrorAction},
};

#[derive(Default)]
enum Graphics {
    // Field order drops GPU objects before the session that owns their device.
    Initialized {
        renderer: Renderer,
        session: Session,
    },
    #[default]
    Uninitialized,
    Closed,
}

pub(crate) struct App {
    config: AppConfig,
    state: LoopState,
    graphics: Graphics,
    error: Option<anyhow::Error>,
}

impl App {
    pub(crate) fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: LoopState::default(),
            graphics: Graphics::default(),
            error: None,
        }
    }

    /// The error that stopped the loop, if any.
    pub(crate) fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.size);

        let window = event_loop
            .create_window(attributes)
            .map_err(SessionError::window_creation)?;

        let session = pollster::block_on(Session::open(window, &self.config))?;
        let renderer = Renderer::new(&session, &self.config)?;

        Ok(Graphics::Initialized { renderer, session })
    }

    fn fail(&mut self, err: anyhow::Error, event_loop: &ActiveEventLoop) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.state.request_close(CloseReason::Fatal);
        self.close(event_loop);
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.graphics = Graphics::Closed;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.graphics, Graphics::Uninitialized) {
            return;
        }

        match self.start(event_loop) {
            Ok(graphics) => self.graphics = graphics,
            Err(err) => self.fail(err.context("startup failed"), event_loop),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(input) = InputEvent::from_window_event(&event) else {
            return;
        };

        self.state.handle(&input);

        let mut fatal = false;

        if let Graphics::Initialized { renderer, session } = &mut self.graphics {
            match input {
                InputEvent::Resized { width, height } => {
                    session.resize(PhysicalSize::new(width, height));
                }
                InputEvent::Redraw if self.state.should_draw() => {
                    fatal = renderer.render(session) == Err(SurfaceErrorAction::Fatal);
                }
                _ => (),
            }
        }

        if fatal {
            self.fail(anyhow!("surface out of memory"), event_loop);
        } else if self.state.should_close() {
            self.close(event_loop);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.state.should_draw() {
            return;
        }

        if let Graphics::Initialized { session, .. } = &self.graphics {
            session.window().request_redraw();
        }
    }
}
