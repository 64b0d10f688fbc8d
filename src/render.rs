use wgpu::{
    Color, LoadOp, Operations, RenderPassColorAttachment, RenderPassDescriptor, StoreOp,
};

use crate::{
    config::AppConfig,
    error::ShaderError,
    geometry::GeometryBuffers,
    session::{Session, SurfaceErrorAction},
    shader::Pipeline,
};

/// Draws the uploaded geometry with the linked pipeline, one frame per call.
pub(crate) struct Renderer {
    pipeline: Pipeline,
    geometry: GeometryBuffers,
    clear_color: Color,
}

impl Renderer {
    /// Uploads the geometry and builds the pipeline on the session's device.
    pub(crate) fn new(session: &Session, config: &AppConfig) -> Result<Self, ShaderError> {
        let device = session.device();

        let geometry = config.geometry.upload(device);

        let pipeline = Pipeline::build(
            device,
            &config.shaders,
            geometry.vertex_buffer_layout(),
            session.surface_format(),
            config.fill_mode.resolve(session.features()),
        )?;

        log::debug!("renderer ready, polygon mode {:?}", pipeline.polygon_mode());

        Ok(Self {
            pipeline,
            geometry,
            clear_color: config.clear_color,
        })
    }

    /// Clears, draws and presents. A zero-sized viewport draws nothing.
    pub(crate) fn render(&self, session: &mut Session) -> Result<(), SurfaceErrorAction> {
        let viewport = session.viewport();
        if !viewport.is_drawable() {
            return Ok(());
        }

        let mut frame = match session.begin_frame() {
            Ok(frame) => frame,
            Err(err) => return Err(session.handle_surface_error(err)),
        };

        {
            let mut render_pass = frame.encoder.begin_render_pass(&RenderPassDescriptor {
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &frame.view,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                    resolve_target: None,
                    depth_slice: None,
                })],
                label: Some("Render Pass"),
                ..Default::default()
            });

            render_pass.set_viewport(
                viewport.x as f32,
                viewport.y as f32,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );

            self.pipeline.bind(&mut render_pass);
            self.geometry.draw(&mut render_pass);
        }

        session.present(frame);

        Ok(())
    }
}
