use anyhow::Result;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::{app::App, config::AppConfig};

mod app;
mod config;
mod error;
mod geometry;
mod input;
mod lifecycle;
mod logging;
mod render;
mod session;
mod shader;
mod vertex;
mod viewport;

fn main() -> Result<()> {
    logging::init_logging();

    let event_loop = EventLoop::new()?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(AppConfig::default());

    event_loop.run_app(&mut app)?;

    app.finish()
}
