//! # node.gl Graphics
//!
//! Shader crafting and resource binding for the node.gl scene renderer.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`CraftContext`] - target description, capability profile and program cache
//! - [`ProgramCraft`] - a session turning declarations and shader bodies into
//!   complete stage sources and a resolved set of [`PipelineResources`]
//! - [`shader`] - dialect profiles, sampling strategies and the pseudo-function
//!   preprocessor
//! - [`program`] - the [`ProgramCompiler`] seam with a GPU-less and a naga
//!   implementation
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ngl_graphics::*;
//!
//! let context = CraftContext::new(
//!     CraftConfig::new(TargetApi::OpenGlEs, 300),
//!     Arc::new(DummyCompiler::new()),
//! );
//! let mut craft = ProgramCraft::new(context);
//! craft.declare(Declarations::new().with_uniform(NamedUniform::new(
//!     "color",
//!     ValueType::Vec4,
//!     ShaderStage::Fragment,
//! )))?;
//! let resources = craft.craft(ProgramSources::graphics(
//!     "void main() { ngl_out_pos = vec4(0.0); }",
//!     "void main() { ngl_out_color = color; }",
//! ))?;
//! ```

pub mod context;
pub mod craft;
pub mod error;
pub mod pipeline;
pub mod program;
pub mod resources;
pub mod shader;
pub mod types;

// Re-export main types for convenience
pub use context::{CraftConfig, CraftContext};
pub use craft::{
    CraftState, Declarations, NamedAttribute, NamedBlock, NamedInterStageVar, NamedTexture,
    NamedUniform, Precision, ProgramCraft, ProgramSources, ResourceIndex, TextureInfo,
    TextureKind,
};
pub use error::{ErrorKind, GraphicsError, GraphicsResult};
pub use pipeline::{
    PipelineAttribute, PipelineBuffer, PipelineResources, PipelineTexture, PipelineUniform,
    UniformBlockBinding,
};
#[cfg(feature = "dummy")]
pub use program::DummyCompiler;
#[cfg(feature = "naga-reflection")]
pub use program::NagaCompiler;
pub use program::{CompiledProgram, ProgramCache, ProgramCompiler, ProgramReflection, VariableInfo};
pub use resources::{Buffer, Texture};
pub use shader::{
    CapabilityProfile, MediaPlatform, SamplingMode, SamplingStrategy, ShaderStage, TargetApi,
    TextureField,
};
pub use types::{
    Block, BlockKind, BlockLayout, BufferDescriptor, BufferUsage, Format, TextureDescriptor,
    TextureUsage, ValueType,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
pub fn init() {
    ngl_core::init();
    log::info!("node.gl Graphics v{} initialized", VERSION);
}
