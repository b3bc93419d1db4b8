//! Compiled programs and their reflection.
//!
//! Crafted sources are handed to a [`ProgramCompiler`] through the shared
//! [`ProgramCache`]. The compiler reports, per declared name, the location
//! and binding the program ended up with; names missing from the
//! reflection were eliminated as dead code.
//!
//! Two compilers ship with the crate:
//!
//! - [`DummyCompiler`] (feature `dummy`) - GPU-less, models dead-code
//!   elimination by looking for uses of each declared name
//! - [`NagaCompiler`] (feature `naga-reflection`) - parses and validates the
//!   sources with naga and reflects the resulting module

mod cache;
#[cfg(feature = "dummy")]
mod dummy;
#[cfg(feature = "naga-reflection")]
mod naga_compiler;

use std::collections::HashMap;

use crate::error::GraphicsResult;
use crate::shader::ShaderStage;

pub use cache::ProgramCache;
#[cfg(feature = "dummy")]
pub use dummy::DummyCompiler;
#[cfg(feature = "naga-reflection")]
pub use naga_compiler::NagaCompiler;

/// Location and binding of a reflected variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariableInfo {
    pub location: Option<u32>,
    pub binding: Option<u32>,
}

impl VariableInfo {
    pub fn with_location(location: u32) -> Self {
        Self {
            location: Some(location),
            binding: None,
        }
    }

    pub fn with_binding(binding: u32) -> Self {
        Self {
            location: None,
            binding: Some(binding),
        }
    }
}

/// Name-indexed reflection of a compiled program.
///
/// A `None` map means the compiler cannot reflect that kind of variable;
/// every declared element of the kind is then kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgramReflection {
    /// Loose uniforms, samplers and images.
    pub uniforms: Option<HashMap<String, VariableInfo>>,
    /// Uniform and storage blocks, keyed by block name.
    pub buffer_blocks: Option<HashMap<String, VariableInfo>>,
    /// Vertex inputs.
    pub attributes: Option<HashMap<String, VariableInfo>>,
}

/// A program compiled from crafted sources.
#[derive(Debug)]
pub struct CompiledProgram {
    key: String,
    sources: [Option<String>; ShaderStage::COUNT],
    reflection: ProgramReflection,
}

impl CompiledProgram {
    pub(crate) fn new(
        key: String,
        sources: [Option<String>; ShaderStage::COUNT],
        reflection: ProgramReflection,
    ) -> Self {
        Self {
            key,
            sources,
            reflection,
        }
    }

    /// Cache key: the concatenated stage sources.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Source of `stage`, if the program has that stage.
    pub fn source(&self, stage: ShaderStage) -> Option<&str> {
        self.sources[stage.index()].as_deref()
    }

    pub fn reflection(&self) -> &ProgramReflection {
        &self.reflection
    }

    /// Returns true for a single-stage compute program.
    pub fn is_compute(&self) -> bool {
        self.sources[ShaderStage::Compute.index()].is_some()
    }
}

/// Turns stage sources into a reflected program.
///
/// Implementations must be callable from any thread; calls are synchronous
/// and failures are reported as [`GraphicsError::ShaderCompilationFailed`].
///
/// [`GraphicsError::ShaderCompilationFailed`]: crate::GraphicsError::ShaderCompilationFailed
pub trait ProgramCompiler: Send + Sync {
    /// Compile a vertex/fragment pair.
    fn compile_graphics(&self, vertex: &str, fragment: &str) -> GraphicsResult<ProgramReflection>;

    /// Compile a compute program.
    fn compile_compute(&self, compute: &str) -> GraphicsResult<ProgramReflection>;

    /// Name used in logs.
    fn name(&self) -> &'static str;
}

static_assertions::assert_impl_all!(CompiledProgram: Send, Sync);
