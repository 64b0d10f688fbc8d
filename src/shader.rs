use std::{borrow::Cow, fmt};

use naga::{
    Module,
    valid::{Capabilities, ValidationFlags, Validator},
};
use wgpu::{
    ColorTargetState, ColorWrites, Device, ErrorFilter, FragmentState, FrontFace,
    MultisampleState, PipelineCompilationOptions, PipelineLayoutDescriptor, PolygonMode,
    PrimitiveState, PrimitiveTopology, RenderPass, RenderPipeline, RenderPipelineDescriptor,
    ShaderModule, ShaderModuleDescriptor, ShaderSource, TextureFormat, VertexBufferLayout,
    VertexState,
};

use crate::error::ShaderError;

pub(crate) const VERTEX_ENTRY: &str = "vs_main";
pub(crate) const FRAGMENT_ENTRY: &str = "fs_main";

const VERTEX_SHADER: &str = "\
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position.x, position.y, position.z, 1.0);
}
";

const FRAGMENT_SHADER: &str = "\
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }

    fn entry_point(self) -> &'static str {
        match self {
            Self::Vertex => VERTEX_ENTRY,
            Self::Fragment => FRAGMENT_ENTRY,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// WGSL source for each pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShaderSources {
    pub(crate) vertex: Cow<'static, str>,
    pub(crate) fragment: Cow<'static, str>,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: Cow::Borrowed(VERTEX_SHADER),
            fragment: Cow::Borrowed(FRAGMENT_SHADER),
        }
    }
}

/// A parsed and validated shader stage.
#[derive(Debug)]
pub(crate) struct CompiledStage<'a> {
    stage: Stage,
    source: &'a str,
    module: Module,
}

/// Parses and validates one stage, returning the full diagnostic on failure.
pub(crate) fn compile_stage(
    stage: Stage,
    source: &str,
) -> Result<CompiledStage<'_>, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| ShaderError::Compile {
        stage,
        log: err.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| ShaderError::Compile {
            stage,
            log: err.emit_to_string(source),
        })?;

    Ok(CompiledStage {
        stage,
        source,
        module,
    })
}

/// Checks that both stages expose the entry points the pipeline binds.
pub(crate) fn link(
    vertex: &CompiledStage<'_>,
    fragment: &CompiledStage<'_>,
) -> Result<(), ShaderError> {
    for compiled in [vertex, fragment] {
        let expected = compiled.stage.naga_stage();
        let name = compiled.stage.entry_point();

        let found = compiled
            .module
            .entry_points
            .iter()
            .any(|entry| entry.name == name && entry.stage == expected);

        if !found {
            return Err(ShaderError::Link {
                log: format!(
                    "{} stage has no {:?} entry point named `{name}`",
                    compiled.stage, expected
                ),
            });
        }
    }

    Ok(())
}

pub(crate) struct Pipeline {
    pipeline: RenderPipeline,
    polygon_mode: PolygonMode,
}

impl Pipeline {
    /// Compiles both stages, links them and builds the render pipeline.
    ///
    /// Every failure is logged before it is returned.
    pub(crate) fn build(
        device: &Device,
        sources: &ShaderSources,
        vertex_buffer_layout: &VertexBufferLayout<'static>,
        texture_format: TextureFormat,
        polygon_mode: PolygonMode,
    ) -> Result<Self, ShaderError> {
        Self::try_build(
            device,
            sources,
            vertex_buffer_layout,
            texture_format,
            polygon_mode,
        )
        .inspect_err(|err| log::error!("{err}"))
    }

    fn try_build(
        device: &Device,
        sources: &ShaderSources,
        vertex_buffer_layout: &VertexBufferLayout<'static>,
        texture_format: TextureFormat,
        polygon_mode: PolygonMode,
    ) -> Result<Self, ShaderError> {
        let vertex = compile_stage(Stage::Vertex, &sources.vertex)?;
        let fragment = compile_stage(Stage::Fragment, &sources.fragment)?;
        link(&vertex, &fragment)?;

        let vertex_module = create_module(device, &vertex)?;
        let fragment_module = create_module(device, &fragment)?;

        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Triangle Pipeline Layout"),
            bind_group_layouts: &[],
            ..Default::default()
        });

        device.push_error_scope(ErrorFilter::Validation);

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Triangle Pipeline"),
            vertex: VertexState {
                module: &vertex_module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: std::slice::from_ref(vertex_buffer_layout),
            },
            fragment: Some(FragmentState {
                module: &fragment_module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: texture_format,
                    blend: None,
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode,
                ..Default::default()
            },
            depth_stencil: None,
            multiview: None,
            cache: None,
            multisample: MultisampleState::default(),
            layout: Some(&layout),
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                log: err.to_string(),
            });
        }

        // The stage modules are not needed once the pipeline holds them.
        drop(vertex_module);
        drop(fragment_module);

        log::info!("shader pipeline linked ({polygon_mode:?})");

        Ok(Self {
            pipeline,
            polygon_mode,
        })
    }

    pub(crate) fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode
    }

    pub(crate) fn bind(&self, render_pass: &mut RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
    }
}

fn create_module(
    device: &Device,
    compiled: &CompiledStage<'_>,
) -> Result<ShaderModule, ShaderError> {
    device.push_error_scope(ErrorFilter::Validation);

    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(match compiled.stage {
            Stage::Vertex => "Vertex Shader",
            Stage::Fragment => "Fragment Shader",
        }),
        source: ShaderSource::Wgsl(Cow::Borrowed(compiled.source)),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(ShaderError::Compile {
            stage: compiled.stage,
            log: err.to_string(),
        }),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_log(stage: Stage, source: &str) -> String {
        match compile_stage(stage, source) {
            Err(ShaderError::Compile { stage: failed, log }) => {
                assert_eq!(failed, stage);
                log
            }
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[test]
    fn default_sources_compile_and_link() {
        let sources = ShaderSources::default();
        let vertex = compile_stage(Stage::Vertex, &sources.vertex).expect("vertex stage");
        let fragment = compile_stage(Stage::Fragment, &sources.fragment).expect("fragment stage");
        link(&vertex, &fragment).expect("link");
    }

    #[test]
    fn syntax_error_yields_a_log() {
        let log = compile_log(Stage::Vertex, "@vertex fn vs_main( -> {");
        assert!(!log.trim().is_empty());
    }

    #[test]
    fn type_error_yields_a_log() {
        let source = "\
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return 1.0;
}
";
        let log = compile_log(Stage::Fragment, source);
        assert!(!log.trim().is_empty());
    }

    #[test]
    fn missing_entry_point_fails_to_link() {
        let sources = ShaderSources::default();
        let vertex = compile_stage(Stage::Vertex, &sources.vertex).expect("vertex stage");
        let renamed = sources.fragment.replace(FRAGMENT_ENTRY, "main");
        let fragment = compile_stage(Stage::Fragment, &renamed).expect("fragment stage");

        match link(&vertex, &fragment) {
            Err(ShaderError::Link { log }) => assert!(log.contains(FRAGMENT_ENTRY)),
            other => panic!("expected a link error, got {other:?}"),
        }
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let sources = ShaderSources::default();
        let vertex = compile_stage(Stage::Vertex, &sources.fragment).expect("parses");
        let fragment = compile_stage(Stage::Fragment, &sources.vertex).expect("parses");
        assert!(matches!(
            link(&vertex, &fragment),
            Err(ShaderError::Link { .. })
        ));
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Vertex.to_string(), "vertex");
        assert_eq!(Stage::Fragment.to_string(), "fragment");
    }
}
