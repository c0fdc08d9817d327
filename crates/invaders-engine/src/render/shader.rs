use std::collections::BTreeSet;

use crate::error::{RenderError, ShaderStage};

/// Everything needed to build one vertex + fragment program.
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex_src: &'a str,
    pub fragment_src: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub target_format: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
}

/// A compiled and linked vertex + fragment program.
///
/// Immutable after construction. The per-stage shader modules only live for the
/// duration of [`ShaderProgram::new`]; the linked pipeline is kept.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Compiles both stages, links them and builds the pipeline.
    ///
    /// Fails fast with [`RenderError::ShaderCompile`] or [`RenderError::ShaderLink`],
    /// carrying the diagnostic text.
    pub fn new(device: &wgpu::Device, desc: &ProgramDesc<'_>) -> Result<Self, RenderError> {
        let vs = compile_stage(ShaderStage::Vertex, desc.vertex_src)?;
        let fs = compile_stage(ShaderStage::Fragment, desc.fragment_src)?;
        link_stages(&vs, &fs)?;

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.vertex_src.into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.fragment_src.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: desc.bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: desc.vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.target_format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Stage modules are released here; only the linked pipeline survives.
        drop(vs_module);
        drop(fs_module);

        log::debug!("shader program `{}` linked", desc.label);
        Ok(Self { pipeline })
    }

    /// Activates the program for subsequent draws on `pass`.
    #[inline]
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}

/// Parses and validates one stage and checks that its entry point exists.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, RenderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| RenderError::ShaderCompile {
        stage,
        log: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator
        .validate(&module)
        .map_err(|e| RenderError::ShaderCompile {
            stage,
            log: format!("{e:?}"),
        })?;

    let has_entry = module
        .entry_points
        .iter()
        .any(|ep| ep.stage == stage.naga() && ep.name == stage.entry_point());
    if !has_entry {
        return Err(RenderError::ShaderCompile {
            stage,
            log: format!("missing @{stage} entry point `{}`", stage.entry_point()),
        });
    }

    Ok(module)
}

/// Checks the stage interface: every location the fragment stage reads must be
/// written by the vertex stage.
pub fn link_stages(vertex: &naga::Module, fragment: &naga::Module) -> Result<(), RenderError> {
    let mut produced = BTreeSet::new();
    if let Some(ep) = find_entry(vertex, ShaderStage::Vertex) {
        if let Some(result) = &ep.function.result {
            collect_locations(vertex, result.ty, result.binding.as_ref(), &mut produced);
        }
    }

    let mut consumed = BTreeSet::new();
    if let Some(ep) = find_entry(fragment, ShaderStage::Fragment) {
        for arg in &ep.function.arguments {
            collect_locations(fragment, arg.ty, arg.binding.as_ref(), &mut consumed);
        }
    }

    let missing: Vec<String> = consumed
        .difference(&produced)
        .map(|loc| format!("fragment input @location({loc}) is not written by the vertex stage"))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RenderError::ShaderLink { log: missing.join("\n") })
    }
}

fn find_entry(module: &naga::Module, stage: ShaderStage) -> Option<&naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga() && ep.name == stage.entry_point())
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPRITE_VS: &str = include_str!("shaders/sprite_vs.wgsl");
    const SPRITE_FS: &str = include_str!("shaders/sprite_fs.wgsl");
    const CRT_VS: &str = include_str!("shaders/crt_vs.wgsl");
    const CRT_FS: &str = include_str!("shaders/crt_fs.wgsl");

    fn compile_pair(vs: &str, fs: &str) -> Result<(), RenderError> {
        let vs = compile_stage(ShaderStage::Vertex, vs)?;
        let fs = compile_stage(ShaderStage::Fragment, fs)?;
        link_stages(&vs, &fs)
    }

    // ── built-in programs ─────────────────────────────────────────────────

    #[test]
    fn sprite_program_compiles_and_links() {
        compile_pair(SPRITE_VS, SPRITE_FS).unwrap();
    }

    #[test]
    fn crt_program_compiles_and_links() {
        compile_pair(CRT_VS, CRT_FS).unwrap();
    }

    // ── compile errors ────────────────────────────────────────────────────

    #[test]
    fn syntax_error_reports_stage_and_log() {
        let err = compile_stage(ShaderStage::Vertex, "fn vs_main( -> {").unwrap_err();
        match err {
            RenderError::ShaderCompile { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let err = compile_stage(ShaderStage::Fragment, src).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ShaderCompile { stage: ShaderStage::Fragment, .. }
        ));
    }

    #[test]
    fn missing_entry_point_is_a_compile_error() {
        // A vertex-only source handed in as the fragment stage.
        let err = compile_stage(ShaderStage::Fragment, CRT_VS).unwrap_err();
        match err {
            RenderError::ShaderCompile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.contains("fs_main"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── link errors ───────────────────────────────────────────────────────

    #[test]
    fn unmatched_fragment_input_fails_to_link() {
        let fs = "@fragment fn fs_main(@location(3) v: vec4<f32>) -> @location(0) vec4<f32> { return v; }";
        let err = compile_pair(CRT_VS, fs).unwrap_err();
        match err {
            RenderError::ShaderLink { log } => assert!(log.contains("@location(3)")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fragment_reading_subset_of_outputs_links() {
        let fs = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        compile_pair(SPRITE_VS, fs).unwrap();
    }
}
