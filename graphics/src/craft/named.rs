//! Caller-supplied declarations.
//!
//! Each descriptor names a resource the shader body may use. Declarations are
//! collected into a [`Declarations`] batch and handed to
//! [`ProgramCraft::declare`](super::ProgramCraft::declare).

use std::sync::Arc;

use crate::resources::{Buffer, Texture};
use crate::shader::ShaderStage;
use crate::types::{Block, Format, ValueType};

/// Precision hint of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// Use the default of the declaration kind.
    #[default]
    Auto,
    High,
    Medium,
    Low,
}

impl Precision {
    /// GLSL qualifier, `None` for [`Precision::Auto`].
    pub fn qualifier(&self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::High => Some("highp"),
            Self::Medium => Some("mediump"),
            Self::Low => Some("lowp"),
        }
    }
}

/// Shape of a logical texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureKind {
    /// Sampled 2D texture, possibly fed with video frames.
    #[default]
    Texture2D,
    /// 2D texture accessed as a storage image.
    Image2D,
    /// Sampled 3D texture.
    Texture3D,
    /// Sampled cube map.
    Cube,
}

/// A loose uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedUniform {
    pub name: String,
    pub ty: ValueType,
    pub stage: ShaderStage,
    /// Array length, `0` for a non-array uniform.
    pub count: u32,
    pub precision: Precision,
}

impl NamedUniform {
    /// Declare a uniform of type `ty` in `stage`.
    pub fn new(name: impl Into<String>, ty: ValueType, stage: ShaderStage) -> Self {
        Self {
            name: name.into(),
            ty,
            stage,
            count: 0,
            precision: Precision::Auto,
        }
    }

    /// Turn the uniform into an array of `count` elements.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the precision hint.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

/// A logical texture, expanded into several fields when crafted.
#[derive(Debug, Clone)]
pub struct NamedTexture {
    pub name: String,
    pub kind: TextureKind,
    pub stage: ShaderStage,
    pub precision: Precision,
    /// Storage images are declared `writeonly` instead of `readonly`.
    pub writable: bool,
    /// Texel format, required for [`TextureKind::Image2D`].
    pub format: Option<Format>,
    pub texture: Option<Arc<Texture>>,
}

impl NamedTexture {
    /// Declare a texture of `kind` in `stage`.
    pub fn new(name: impl Into<String>, kind: TextureKind, stage: ShaderStage) -> Self {
        Self {
            name: name.into(),
            kind,
            stage,
            precision: Precision::Auto,
            writable: false,
            format: None,
            texture: None,
        }
    }

    /// Set the texel format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Mark the image as written by the shader.
    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    /// Attach the backing texture. Also sets the format when none is set.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.format.get_or_insert(texture.format());
        self.texture = Some(texture);
        self
    }

    /// Set the precision hint.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

/// A uniform or storage block backed by a buffer.
#[derive(Debug, Clone)]
pub struct NamedBlock {
    /// Base name. The GLSL block is called `<name>_block`.
    pub name: String,
    pub stage: ShaderStage,
    pub block: Block,
    pub buffer: Option<Arc<Buffer>>,
    /// The last array field is declared unsized (`field[]`).
    pub variadic: bool,
    /// Instance name. Defaults to `name`; an empty name declares an
    /// anonymous block whose fields are accessed like loose uniforms.
    pub instance_name: Option<String>,
}

impl NamedBlock {
    /// Declare `block` in `stage`.
    pub fn new(name: impl Into<String>, stage: ShaderStage, block: Block) -> Self {
        Self {
            name: name.into(),
            stage,
            block,
            buffer: None,
            variadic: false,
            instance_name: None,
        }
    }

    /// Attach the backing buffer.
    pub fn with_buffer(mut self, buffer: Arc<Buffer>) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// Declare the last array field unsized.
    pub fn with_variadic(mut self, variadic: bool) -> Self {
        self.variadic = variadic;
        self
    }

    /// Override the instance name.
    pub fn with_instance_name(mut self, instance_name: impl Into<String>) -> Self {
        self.instance_name = Some(instance_name.into());
        self
    }
}

/// A vertex attribute.
#[derive(Debug, Clone)]
pub struct NamedAttribute {
    pub name: String,
    pub ty: ValueType,
    pub precision: Precision,
    /// Format of one element (one column for matrices).
    pub format: Format,
    pub stride: u32,
    pub offset: u32,
    /// Instancing divisor, `0` for per-vertex data.
    pub rate: u32,
    /// Without a buffer the attribute is declared but never bound.
    pub buffer: Option<Arc<Buffer>>,
}

impl NamedAttribute {
    /// Declare an attribute of type `ty` whose elements are in `format`.
    pub fn new(name: impl Into<String>, ty: ValueType, format: Format) -> Self {
        Self {
            name: name.into(),
            ty,
            precision: Precision::Auto,
            format,
            stride: format.bytes_per_pixel() * ty.attribute_location_count(),
            offset: 0,
            rate: 0,
            buffer: None,
        }
    }

    /// Attach the backing buffer.
    pub fn with_buffer(mut self, buffer: Arc<Buffer>) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// Set the stride and offset inside the buffer.
    pub fn with_layout(mut self, stride: u32, offset: u32) -> Self {
        self.stride = stride;
        self.offset = offset;
        self
    }

    /// Set the instancing divisor.
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Set the precision hint.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

/// A variable written by the vertex stage and read by the fragment stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedInterStageVar {
    pub name: String,
    pub ty: ValueType,
}

impl NamedInterStageVar {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A batch of declarations.
///
/// # Example
///
/// ```ignore
/// let batch = Declarations::new()
///     .with_uniform(NamedUniform::new("color", ValueType::Vec4, ShaderStage::Fragment))
///     .with_texture(NamedTexture::new("tex0", TextureKind::Texture2D, ShaderStage::Fragment))
///     .with_inter_stage_var(NamedInterStageVar::new("uv", ValueType::Vec2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    pub uniforms: Vec<NamedUniform>,
    pub textures: Vec<NamedTexture>,
    pub blocks: Vec<NamedBlock>,
    pub attributes: Vec<NamedAttribute>,
    pub inter_stage_vars: Vec<NamedInterStageVar>,
}

impl Declarations {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniform(mut self, uniform: NamedUniform) -> Self {
        self.uniforms.push(uniform);
        self
    }

    pub fn with_texture(mut self, texture: NamedTexture) -> Self {
        self.textures.push(texture);
        self
    }

    pub fn with_block(mut self, block: NamedBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_attribute(mut self, attribute: NamedAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_inter_stage_var(mut self, var: NamedInterStageVar) -> Self {
        self.inter_stage_vars.push(var);
        self
    }

    /// Append every declaration of `other`.
    pub fn append(&mut self, mut other: Declarations) {
        self.uniforms.append(&mut other.uniforms);
        self.textures.append(&mut other.textures);
        self.blocks.append(&mut other.blocks);
        self.attributes.append(&mut other.attributes);
        self.inter_stage_vars.append(&mut other.inter_stage_vars);
    }

    /// Returns true if the batch declares nothing.
    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
            && self.textures.is_empty()
            && self.blocks.is_empty()
            && self.attributes.is_empty()
            && self.inter_stage_vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TextureDescriptor, TextureUsage};

    #[test]
    fn test_texture_inherits_format() {
        let texture = Arc::new(Texture::new(TextureDescriptor::new_2d(
            8,
            8,
            Format::R32Float,
            TextureUsage::STORAGE,
        )));
        let named = NamedTexture::new("img", TextureKind::Image2D, ShaderStage::Compute)
            .with_texture(texture);
        assert_eq!(named.format, Some(Format::R32Float));

        let named = NamedTexture::new("img", TextureKind::Image2D, ShaderStage::Compute)
            .with_format(Format::Rgba8Unorm)
            .with_texture(named.texture.unwrap());
        assert_eq!(named.format, Some(Format::Rgba8Unorm));
    }

    #[test]
    fn test_attribute_default_stride() {
        let attr = NamedAttribute::new("transform", ValueType::Mat4, Format::Rgba32Float);
        assert_eq!(attr.stride, 64);
    }

    #[test]
    fn test_append_batches() {
        let mut batch = Declarations::new().with_uniform(NamedUniform::new(
            "a",
            ValueType::Float,
            ShaderStage::Vertex,
        ));
        assert!(!batch.is_empty());
        batch.append(Declarations::new().with_inter_stage_var(NamedInterStageVar::new(
            "uv",
            ValueType::Vec2,
        )));
        assert_eq!(batch.uniforms.len(), 1);
        assert_eq!(batch.inter_stage_vars.len(), 1);
    }
}
