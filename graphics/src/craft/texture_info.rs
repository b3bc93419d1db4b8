//! Expansion of logical textures into their underlying fields.

use std::sync::Arc;

use crate::resources::Texture;
use crate::shader::{SamplingStrategy, ShaderStage, TextureField};
use crate::types::{Format, ValueType};

use super::named::{NamedTexture, Precision, TextureKind};

/// Where a resolved field lives among the crafted resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceIndex {
    /// Index into the filtered textures.
    Texture(usize),
    /// Index into the filtered uniforms.
    Uniform(usize),
    /// Field of the consolidated uniform block of `stage`.
    BlockField { stage: ShaderStage, field: usize },
}

/// One declared field of a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfoField {
    /// `<texture>_<suffix>`.
    pub name: String,
    pub ty: ValueType,
    pub stage: ShaderStage,
    /// Resolved after probing, `None` when the program does not use it.
    pub index: Option<ResourceIndex>,
}

const COMMON_2D: &[(TextureField, ValueType)] = &[
    (TextureField::DefaultSampler, ValueType::Sampler2D),
    (TextureField::CoordinateMatrix, ValueType::Mat4),
    (TextureField::Dimensions, ValueType::Vec2),
    (TextureField::Timestamp, ValueType::Float),
];

const IMAGE_2D: &[(TextureField, ValueType)] = &[
    (TextureField::DefaultSampler, ValueType::Image2D),
    (TextureField::CoordinateMatrix, ValueType::Mat4),
    (TextureField::Dimensions, ValueType::Vec2),
    (TextureField::Timestamp, ValueType::Float),
];

const TEXTURE_3D: &[(TextureField, ValueType)] = &[
    (TextureField::DefaultSampler, ValueType::Sampler3D),
    (TextureField::Dimensions, ValueType::Vec3),
];

const CUBE: &[(TextureField, ValueType)] = &[(TextureField::DefaultSampler, ValueType::SamplerCube)];

/// A logical texture with its expanded fields.
#[derive(Debug, Clone)]
pub struct TextureInfo {
    pub name: String,
    pub kind: TextureKind,
    pub stage: ShaderStage,
    pub precision: Precision,
    pub writable: bool,
    pub format: Option<Format>,
    pub texture: Option<Arc<Texture>>,
    fields: [Option<TextureInfoField>; TextureField::COUNT],
}

impl TextureInfo {
    /// Expand `named` with the fields `strategy` requires.
    ///
    /// In graphics programs the coordinate matrix is read by the vertex
    /// stage, whatever stage samples the texture.
    pub fn expand(named: &NamedTexture, strategy: SamplingStrategy, graphics: bool) -> Self {
        let mut fields: [Option<TextureInfoField>; TextureField::COUNT] = Default::default();

        let (common, video): (&[_], &[_]) = match named.kind {
            TextureKind::Texture2D => (COMMON_2D, strategy.video_fields()),
            TextureKind::Image2D => (IMAGE_2D, &[]),
            TextureKind::Texture3D => (TEXTURE_3D, &[]),
            TextureKind::Cube => (CUBE, &[]),
        };

        for &(kind, ty) in common.iter().chain(video) {
            let stage = if graphics && kind == TextureField::CoordinateMatrix {
                ShaderStage::Vertex
            } else {
                named.stage
            };
            fields[kind.index()] = Some(TextureInfoField {
                name: format!("{}_{}", named.name, kind.suffix()),
                ty,
                stage,
                index: None,
            });
        }

        Self {
            name: named.name.clone(),
            kind: named.kind,
            stage: named.stage,
            precision: named.precision,
            writable: named.writable,
            format: named.format,
            texture: named.texture.clone(),
            fields,
        }
    }

    /// Field of `kind`, `None` when this texture does not declare it.
    pub fn field(&self, kind: TextureField) -> Option<&TextureInfoField> {
        self.fields[kind.index()].as_ref()
    }

    pub(crate) fn field_mut(&mut self, kind: TextureField) -> Option<&mut TextureInfoField> {
        self.fields[kind.index()].as_mut()
    }

    /// Declared fields, in field index order.
    pub fn fields(&self) -> impl Iterator<Item = (TextureField, &TextureInfoField)> {
        TextureField::ALL
            .iter()
            .zip(self.fields.iter())
            .filter_map(|(kind, field)| field.as_ref().map(|f| (*kind, f)))
    }

    /// Resolved index of the field of `kind`.
    pub fn index(&self, kind: TextureField) -> Option<ResourceIndex> {
        self.field(kind).and_then(|f| f.index)
    }
}
