//! Reconciliation of declared resources with program reflection.
//!
//! Declared elements the compiled program does not use are dropped: the
//! compiler eliminated them as dead code. Buffers with a binding and
//! attributes with a location chosen at injection time are kept without a
//! lookup. Textures are always looked up by name, since a binding alone
//! does not prove the sampler survived; the reflected binding only fills
//! in a missing one. Texture-info fields are then pointed at the position
//! of their element among the kept ones.

use ngl_core::profiling::profile_scope;

use super::texture_info::{ResourceIndex, TextureInfo};
use crate::error::{GraphicsError, GraphicsResult};
use crate::pipeline::{
    AttributeLocation, DeclaredResources, PipelineAttribute, PipelineBuffer, PipelineTexture,
    PipelineUniform, UniformBlockBinding,
};
use crate::program::ProgramReflection;
use crate::shader::{ShaderStage, TextureField};

/// Filtered elements.
#[derive(Debug, Clone, Default)]
pub(crate) struct Probed {
    pub uniforms: Vec<PipelineUniform>,
    pub textures: Vec<PipelineTexture>,
    pub buffers: Vec<PipelineBuffer>,
    pub attributes: Vec<PipelineAttribute>,
}

pub(crate) fn probe(
    declared: &DeclaredResources,
    reflection: &ProgramReflection,
) -> GraphicsResult<Probed> {
    profile_scope!("probe_bindings");

    let mut probed = Probed::default();

    for uniform in &declared.uniforms {
        let location = match &reflection.uniforms {
            None => None,
            Some(uniforms) => match uniforms.get(&uniform.name) {
                Some(info) => info.location,
                None => {
                    log::trace!("uniform {} dropped", uniform.name);
                    continue;
                }
            },
        };
        probed.uniforms.try_reserve(1)?;
        probed.uniforms.push(PipelineUniform {
            location,
            ..uniform.clone()
        });
    }

    for buffer in &declared.buffers {
        let binding = match (buffer.binding, &reflection.buffer_blocks) {
            (Some(binding), _) => Some(binding),
            (None, None) => None,
            (None, Some(blocks)) => match blocks.get(&buffer.name).and_then(|b| b.binding) {
                Some(binding) => Some(binding),
                None => {
                    log::trace!("block {} dropped", buffer.name);
                    continue;
                }
            },
        };
        probed.buffers.try_reserve(1)?;
        probed.buffers.push(PipelineBuffer {
            binding,
            ..buffer.clone()
        });
    }

    for texture in &declared.textures {
        let mut texture = texture.clone();
        if texture.location.is_none() {
            if let Some(uniforms) = &reflection.uniforms {
                let Some(info) = uniforms.get(&texture.name) else {
                    log::trace!("texture {} dropped", texture.name);
                    continue;
                };
                texture.location = info.location;
                texture.binding = texture.binding.or(info.binding);
                if texture.location.is_none() && texture.binding.is_none() {
                    log::trace!("texture {} has neither location nor binding", texture.name);
                    continue;
                }
            }
        }
        probed.textures.try_reserve(1)?;
        probed.textures.push(texture);
    }

    for attribute in &declared.attributes {
        let location = match attribute.location {
            AttributeLocation::Explicit(location) => location,
            AttributeLocation::Pending { column } => {
                let Some(attributes) = &reflection.attributes else {
                    log::error!("no attribute reflection to resolve {}", attribute.name);
                    return Err(GraphicsError::NotFound(format!(
                        "attribute {}: program exposes no attribute locations",
                        attribute.name
                    )));
                };
                let Some(info) = attributes.get(&attribute.name) else {
                    log::trace!("attribute {} dropped", attribute.name);
                    continue;
                };
                let Some(base) = info.location else {
                    log::error!("attribute {} has no location", attribute.name);
                    return Err(GraphicsError::NotFound(format!(
                        "attribute {}: no location assigned by the program",
                        attribute.name
                    )));
                };
                base + column
            }
        };
        probed.attributes.try_reserve(1)?;
        probed.attributes.push(PipelineAttribute {
            name: attribute.name.clone(),
            location,
            format: attribute.format,
            stride: attribute.stride,
            offset: attribute.offset,
            rate: attribute.rate,
            buffer: attribute.buffer.clone(),
        });
    }

    log::debug!(
        "probe: uniforms {}/{}, textures {}/{}, buffers {}/{}, attributes {}/{}",
        probed.uniforms.len(),
        declared.uniforms.len(),
        probed.textures.len(),
        declared.textures.len(),
        probed.buffers.len(),
        declared.buffers.len(),
        probed.attributes.len(),
        declared.attributes.len(),
    );

    Ok(probed)
}

/// Index of the plain uniform `name` of `stage` among the filtered
/// uniforms, or its field in the consolidated block of `stage`.
pub(crate) fn uniform_index(
    name: &str,
    stage: ShaderStage,
    uniforms: &[PipelineUniform],
    uniform_blocks: &[UniformBlockBinding],
) -> Option<ResourceIndex> {
    if let Some(binding) = uniform_blocks.iter().find(|b| b.stage == stage) {
        if let Some(field) = binding.block.field_index(name) {
            return Some(ResourceIndex::BlockField { stage, field });
        }
    }
    uniforms
        .iter()
        .position(|u| u.name == name && u.stage == stage)
        .map(ResourceIndex::Uniform)
}

/// Point every texture field at its filtered element.
pub(crate) fn resolve_texture_infos(
    infos: &mut [TextureInfo],
    probed: &Probed,
    uniform_blocks: &[UniformBlockBinding],
) {
    for info in infos {
        for kind in TextureField::ALL {
            let Some(field) = info.field_mut(kind) else {
                continue;
            };
            field.index = if field.ty.is_sampler_or_image() {
                probed
                    .textures
                    .iter()
                    .position(|t| t.name == field.name && t.stage == field.stage)
                    .map(ResourceIndex::Texture)
            } else {
                uniform_index(&field.name, field.stage, &probed.uniforms, uniform_blocks)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::pipeline::DeclaredAttribute;
    use crate::program::VariableInfo;
    use crate::resources::Buffer;
    use crate::types::{BlockKind, BufferDescriptor, BufferUsage, Format, ValueType};

    fn info(location: Option<u32>, binding: Option<u32>) -> VariableInfo {
        VariableInfo { location, binding }
    }

    fn map(entries: &[(&str, VariableInfo)]) -> Option<HashMap<String, VariableInfo>> {
        Some(
            entries
                .iter()
                .map(|(name, info)| (name.to_string(), *info))
                .collect(),
        )
    }

    fn uniform(name: &str) -> PipelineUniform {
        PipelineUniform {
            name: name.into(),
            ty: ValueType::Vec4,
            stage: ShaderStage::Fragment,
            count: 1,
            location: None,
        }
    }

    fn attribute(name: &str, location: AttributeLocation) -> DeclaredAttribute {
        DeclaredAttribute {
            name: name.into(),
            location,
            format: Format::Rgba32Float,
            stride: 64,
            offset: 0,
            rate: 0,
            buffer: Arc::new(Buffer::new(BufferDescriptor::new(64, BufferUsage::VERTEX)).unwrap()),
        }
    }

    #[test]
    fn test_unused_uniform_is_dropped() {
        let declared = DeclaredResources {
            uniforms: vec![uniform("used"), uniform("unused")],
            ..Default::default()
        };
        let reflection = ProgramReflection {
            uniforms: map(&[("used", info(Some(3), None))]),
            ..Default::default()
        };
        let probed = probe(&declared, &reflection).unwrap();
        assert_eq!(probed.uniforms.len(), 1);
        assert_eq!(probed.uniforms[0].name, "used");
        assert_eq!(probed.uniforms[0].location, Some(3));
    }

    #[test]
    fn test_missing_reflection_keeps_everything() {
        let declared = DeclaredResources {
            uniforms: vec![uniform("a"), uniform("b")],
            buffers: vec![PipelineBuffer {
                name: "data_block".into(),
                kind: BlockKind::Storage,
                stage: ShaderStage::Compute,
                binding: None,
                buffer: None,
            }],
            ..Default::default()
        };
        let probed = probe(&declared, &ProgramReflection::default()).unwrap();
        assert_eq!(probed.uniforms.len(), 2);
        assert_eq!(probed.buffers.len(), 1);
    }

    #[test]
    fn test_explicit_buffer_binding_skips_lookup() {
        let declared = DeclaredResources {
            buffers: vec![
                PipelineBuffer {
                    name: "a_block".into(),
                    kind: BlockKind::Uniform,
                    stage: ShaderStage::Vertex,
                    binding: Some(5),
                    buffer: None,
                },
                PipelineBuffer {
                    name: "b_block".into(),
                    kind: BlockKind::Uniform,
                    stage: ShaderStage::Vertex,
                    binding: None,
                    buffer: None,
                },
            ],
            ..Default::default()
        };
        let reflection = ProgramReflection {
            buffer_blocks: map(&[]),
            ..Default::default()
        };
        let probed = probe(&declared, &reflection).unwrap();
        assert_eq!(probed.buffers.len(), 1);
        assert_eq!(probed.buffers[0].binding, Some(5));
    }

    #[test]
    fn test_texture_takes_reflected_binding() {
        let declared = DeclaredResources {
            textures: vec![PipelineTexture {
                name: "tex0_sampler".into(),
                ty: ValueType::Sampler2D,
                stage: ShaderStage::Fragment,
                location: None,
                binding: None,
                texture: None,
            }],
            ..Default::default()
        };
        let reflection = ProgramReflection {
            uniforms: map(&[("tex0_sampler", info(Some(1), Some(2)))]),
            ..Default::default()
        };
        let probed = probe(&declared, &reflection).unwrap();
        assert_eq!(probed.textures[0].location, Some(1));
        assert_eq!(probed.textures[0].binding, Some(2));
    }

    #[test]
    fn test_texture_binding_does_not_skip_lookup() {
        let texture = |name: &str| PipelineTexture {
            name: name.into(),
            ty: ValueType::Sampler2D,
            stage: ShaderStage::Fragment,
            location: None,
            binding: Some(4),
            texture: None,
        };
        let declared = DeclaredResources {
            textures: vec![texture("used_sampler"), texture("unused_sampler")],
            ..Default::default()
        };
        let reflection = ProgramReflection {
            uniforms: map(&[("used_sampler", info(None, Some(9)))]),
            ..Default::default()
        };
        let probed = probe(&declared, &reflection).unwrap();
        assert_eq!(probed.textures.len(), 1);
        assert_eq!(probed.textures[0].name, "used_sampler");
        assert_eq!(probed.textures[0].binding, Some(4));
    }

    #[test]
    fn test_pending_attribute_columns() {
        let declared = DeclaredResources {
            attributes: (0..4)
                .map(|column| attribute("transform", AttributeLocation::Pending { column }))
                .collect(),
            ..Default::default()
        };
        let reflection = ProgramReflection {
            attributes: map(&[("transform", info(Some(2), None))]),
            ..Default::default()
        };
        let probed = probe(&declared, &reflection).unwrap();
        let locations: Vec<_> = probed.attributes.iter().map(|a| a.location).collect();
        assert_eq!(locations, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_unused_attribute_is_dropped() {
        let declared = DeclaredResources {
            attributes: vec![attribute("unused", AttributeLocation::Pending { column: 0 })],
            ..Default::default()
        };
        let reflection = ProgramReflection {
            attributes: map(&[]),
            ..Default::default()
        };
        assert!(probe(&declared, &reflection).unwrap().attributes.is_empty());
    }

    #[test]
    fn test_attribute_without_location_is_not_found() {
        let declared = DeclaredResources {
            attributes: vec![attribute("position", AttributeLocation::Pending { column: 0 })],
            ..Default::default()
        };
        let reflection = ProgramReflection {
            attributes: map(&[("position", info(None, None))]),
            ..Default::default()
        };
        let err = probe(&declared, &reflection).unwrap_err();
        assert!(matches!(err, GraphicsError::NotFound(_)));
    }

    #[test]
    fn test_explicit_attribute_skips_lookup() {
        let declared = DeclaredResources {
            attributes: vec![attribute("position", AttributeLocation::Explicit(7))],
            ..Default::default()
        };
        let probed = probe(&declared, &ProgramReflection::default()).unwrap();
        assert_eq!(probed.attributes[0].location, 7);
    }
}
