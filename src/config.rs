use wgpu::{Color, Features, PolygonMode};
use winit::dpi::PhysicalSize;

use crate::{geometry::Geometry, shader::ShaderSources};

/// How triangles are rasterized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FillMode {
    #[default]
    Fill,
    Wireframe,
}

impl FillMode {
    /// Device features this mode needs.
    pub(crate) fn required_features(self) -> Features {
        match self {
            Self::Fill => Features::empty(),
            Self::Wireframe => Features::POLYGON_MODE_LINE,
        }
    }

    /// Picks the polygon mode the device can actually rasterize.
    ///
    /// Wireframe falls back to fill when line polygons are unsupported.
    pub(crate) fn resolve(self, available: Features) -> PolygonMode {
        match self {
            Self::Fill => PolygonMode::Fill,
            Self::Wireframe if available.contains(Features::POLYGON_MODE_LINE) => {
                PolygonMode::Line
            }
            Self::Wireframe => {
                log::warn!("adapter lacks POLYGON_MODE_LINE, drawing filled triangles instead");
                PolygonMode::Fill
            }
        }
    }
}

/// Everything the program needs, fixed at startup and passed by reference.
#[derive(Debug, Clone)]
pub(crate) struct AppConfig {
    pub(crate) title: String,
    pub(crate) size: PhysicalSize<u32>,
    pub(crate) clear_color: Color,
    pub(crate) fill_mode: FillMode,
    pub(crate) geometry: Geometry,
    pub(crate) shaders: ShaderSources,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "LearnOpenGL".to_string(),
            size: PhysicalSize::new(800, 600),
            clear_color: Color {
                r: 0.0,
                g: 0.0,
                b: 0.7,
                a: 1.0,
            },
            fill_mode: FillMode::Wireframe,
            geometry: Geometry::twin_triangles(),
            shaders: ShaderSources::default(),
        }
    }
}
