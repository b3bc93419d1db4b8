//! Program compiler backed by naga.
//!
//! Parses each stage with the naga GLSL frontend, validates the module and
//! reflects bindings and locations from the IR. Only the Vulkan dialect is
//! accepted by the frontend: loose uniforms must live in blocks, which the
//! crafter guarantees on Vulkan through uniform block consolidation.
//!
//! naga keeps unused globals, so nothing is reported as eliminated.

use std::collections::HashMap;

use ngl_core::profiling::profile_scope;

use super::{ProgramCompiler, ProgramReflection, VariableInfo};
use crate::error::{GraphicsError, GraphicsResult};
use crate::shader::ShaderStage;

/// Program compiler parsing GLSL with naga.
#[derive(Debug, Default, Clone, Copy)]
pub struct NagaCompiler;

impl NagaCompiler {
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, source: &str, stage: ShaderStage) -> GraphicsResult<naga::Module> {
        profile_scope!("naga_parse");

        let naga_stage = match stage {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
            ShaderStage::Compute => naga::ShaderStage::Compute,
        };
        let options = naga::front::glsl::Options {
            stage: naga_stage,
            defines: naga::FastHashMap::default(),
        };

        let mut frontend = naga::front::glsl::Frontend::default();
        let module = frontend.parse(&options, source).map_err(|errors| {
            GraphicsError::ShaderCompilationFailed(format!("{stage} GLSL parse error:\n{errors}"))
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).map_err(|e| {
            GraphicsError::ShaderCompilationFailed(format!("{stage} validation error: {e}"))
        })?;

        Ok(module)
    }
}

#[derive(Default)]
struct Reflector {
    uniforms: HashMap<String, VariableInfo>,
    buffer_blocks: HashMap<String, VariableInfo>,
    attributes: HashMap<String, VariableInfo>,
}

impl Reflector {
    fn add_globals(&mut self, module: &naga::Module) {
        for (_, var) in module.global_variables.iter() {
            let binding = var.binding.as_ref().map(|b| b.binding);
            match var.space {
                naga::AddressSpace::Handle => {
                    if let Some(name) = &var.name {
                        self.uniforms.insert(
                            name.clone(),
                            VariableInfo {
                                location: None,
                                binding,
                            },
                        );
                    }
                }
                naga::AddressSpace::Uniform | naga::AddressSpace::Storage { .. } => {
                    let info = VariableInfo {
                        location: None,
                        binding,
                    };
                    let block_name = module.types[var.ty].name.clone();
                    for name in block_name.iter().chain(var.name.iter()) {
                        self.buffer_blocks.insert(name.clone(), info);
                    }
                }
                _ => {}
            }
        }
    }

    fn add_vertex_inputs(&mut self, module: &naga::Module) {
        let Some(entry) = module
            .entry_points
            .iter()
            .find(|ep| ep.stage == naga::ShaderStage::Vertex)
        else {
            return;
        };

        for argument in &entry.function.arguments {
            if let Some(naga::Binding::Location { location, .. }) = &argument.binding {
                if let Some(name) = &argument.name {
                    self.attributes
                        .insert(name.clone(), VariableInfo::with_location(*location));
                }
                continue;
            }
            if let naga::TypeInner::Struct { members, .. } = &module.types[argument.ty].inner {
                for member in members {
                    if let (Some(name), Some(naga::Binding::Location { location, .. })) =
                        (&member.name, &member.binding)
                    {
                        self.attributes
                            .insert(name.clone(), VariableInfo::with_location(*location));
                    }
                }
            }
        }
    }

    fn finish(self, graphics: bool) -> ProgramReflection {
        ProgramReflection {
            uniforms: Some(self.uniforms),
            buffer_blocks: Some(self.buffer_blocks),
            attributes: graphics.then_some(self.attributes),
        }
    }
}

impl ProgramCompiler for NagaCompiler {
    fn compile_graphics(&self, vertex: &str, fragment: &str) -> GraphicsResult<ProgramReflection> {
        profile_scope!("naga_compile_graphics");

        let vertex = self.parse(vertex, ShaderStage::Vertex)?;
        let fragment = self.parse(fragment, ShaderStage::Fragment)?;

        let mut reflector = Reflector::default();
        reflector.add_globals(&vertex);
        reflector.add_globals(&fragment);
        reflector.add_vertex_inputs(&vertex);
        Ok(reflector.finish(true))
    }

    fn compile_compute(&self, compute: &str) -> GraphicsResult<ProgramReflection> {
        profile_scope!("naga_compile_compute");

        let module = self.parse(compute, ShaderStage::Compute)?;
        let mut reflector = Reflector::default();
        reflector.add_globals(&module);
        Ok(reflector.finish(false))
    }

    fn name(&self) -> &'static str {
        "Naga Compiler"
    }
}
