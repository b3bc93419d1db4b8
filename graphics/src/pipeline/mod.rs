//! Pipeline elements produced by crafting.
//!
//! Injection registers *declared* elements whose locations and bindings may
//! still be unknown. Probing turns them into the *filtered* elements handed
//! to the pipeline builder: only resources the compiled program really uses,
//! each with a resolved location or binding.

use std::sync::Arc;

use crate::program::CompiledProgram;
use crate::resources::{Buffer, Texture};
use crate::shader::ShaderStage;
use crate::types::{Block, BlockKind, Format, ValueType};

/// A loose uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineUniform {
    pub name: String,
    pub ty: ValueType,
    pub stage: ShaderStage,
    /// Number of elements, at least 1.
    pub count: u32,
    /// Location reported by the program, when it has one.
    pub location: Option<u32>,
}

/// A sampler or image uniform.
#[derive(Debug, Clone)]
pub struct PipelineTexture {
    pub name: String,
    pub ty: ValueType,
    pub stage: ShaderStage,
    pub location: Option<u32>,
    pub binding: Option<u32>,
    pub texture: Option<Arc<Texture>>,
}

/// A uniform or storage block.
#[derive(Debug, Clone)]
pub struct PipelineBuffer {
    /// GLSL block name, `<name>_block`.
    pub name: String,
    pub kind: BlockKind,
    pub stage: ShaderStage,
    pub binding: Option<u32>,
    pub buffer: Option<Arc<Buffer>>,
}

/// Location of a declared attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeLocation {
    /// Assigned by the crafter with a `layout(location=N)` qualifier.
    Explicit(u32),
    /// Assigned by the program compiler. `column` is added to the location
    /// reported for the attribute name, so each column of a matrix lands on
    /// its own location.
    Pending { column: u32 },
}

/// A vertex attribute as registered by injection.
#[derive(Debug, Clone)]
pub struct DeclaredAttribute {
    pub name: String,
    pub location: AttributeLocation,
    pub format: Format,
    pub stride: u32,
    pub offset: u32,
    pub rate: u32,
    pub buffer: Arc<Buffer>,
}

/// A vertex attribute with its resolved location.
#[derive(Debug, Clone)]
pub struct PipelineAttribute {
    pub name: String,
    pub location: u32,
    pub format: Format,
    pub stride: u32,
    pub offset: u32,
    pub rate: u32,
    pub buffer: Arc<Buffer>,
}

/// The per-stage block loose uniforms were packed into.
///
/// The caller writes uniform values into `buffer` at the offsets of
/// `block`'s fields once crafting succeeded.
#[derive(Debug, Clone)]
pub struct UniformBlockBinding {
    pub stage: ShaderStage,
    pub block: Block,
    pub buffer: Arc<Buffer>,
}

/// Elements registered while injecting declarations.
#[derive(Debug, Clone, Default)]
pub struct DeclaredResources {
    pub uniforms: Vec<PipelineUniform>,
    pub textures: Vec<PipelineTexture>,
    pub buffers: Vec<PipelineBuffer>,
    pub attributes: Vec<DeclaredAttribute>,
}

/// Everything a pipeline builder needs to bind a crafted program.
#[derive(Debug, Clone)]
pub struct PipelineResources {
    pub program: Arc<CompiledProgram>,
    pub uniforms: Vec<PipelineUniform>,
    pub textures: Vec<PipelineTexture>,
    pub buffers: Vec<PipelineBuffer>,
    pub attributes: Vec<PipelineAttribute>,
    /// Consolidated uniform blocks, one per stage that declared uniforms.
    pub uniform_blocks: Vec<UniformBlockBinding>,
}

impl PipelineResources {
    /// Consolidated uniform block of `stage`, if any.
    pub fn uniform_block(&self, stage: ShaderStage) -> Option<&UniformBlockBinding> {
        self.uniform_blocks.iter().find(|b| b.stage == stage)
    }

    /// Filtered uniform called `name`.
    pub fn uniform(&self, name: &str) -> Option<&PipelineUniform> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    /// Filtered texture called `name`.
    pub fn texture(&self, name: &str) -> Option<&PipelineTexture> {
        self.textures.iter().find(|t| t.name == name)
    }

    /// Filtered buffer called `name`.
    pub fn buffer(&self, name: &str) -> Option<&PipelineBuffer> {
        self.buffers.iter().find(|b| b.name == name)
    }

    /// Filtered attribute entries called `name`, one per occupied location.
    pub fn attributes_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a PipelineAttribute> + 'a {
        self.attributes.iter().filter(move |a| a.name == name)
    }
}
