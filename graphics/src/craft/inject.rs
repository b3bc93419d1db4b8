//! Declaration injection.
//!
//! Each stage is written in a fixed order: header, stage boilerplate,
//! inter-stage variables, uniforms, texture fields, blocks, attributes
//! (vertex only), the consolidated uniform block and finally the body.
//! Bindings and locations are assigned in that emission order.

use std::sync::Arc;

use ngl_core::profiling::profile_scope;

use super::bindings::{BindingAllocator, BindingKind};
use super::named::{Declarations, NamedAttribute, NamedBlock, NamedUniform, Precision, TextureKind};
use super::texture_info::TextureInfo;
use crate::error::{GraphicsError, GraphicsResult};
use crate::pipeline::{
    AttributeLocation, DeclaredAttribute, DeclaredResources, PipelineBuffer, PipelineTexture,
    PipelineUniform, UniformBlockBinding,
};
use crate::resources::Buffer;
use crate::shader::{CapabilityProfile, ShaderStage, ShaderText, preprocess};
use crate::types::{Block, BlockKind, BlockLayout, BufferDescriptor, BufferUsage, ValueType};

/// Result of injecting every stage of a program.
#[derive(Debug, Default)]
pub(crate) struct Injected {
    pub declared: DeclaredResources,
    pub uniform_blocks: Vec<UniformBlockBinding>,
}

/// Writes the declarations of one program, stage by stage.
pub(crate) struct Injector<'a> {
    profile: &'a CapabilityProfile,
    bindings: BindingAllocator,
    declared: DeclaredResources,
    uniform_blocks: [Option<Block>; ShaderStage::COUNT],
    uniform_buffers: Vec<UniformBlockBinding>,
}

impl<'a> Injector<'a> {
    pub fn new(profile: &'a CapabilityProfile) -> Self {
        Self {
            profile,
            bindings: BindingAllocator::new(profile),
            declared: DeclaredResources::default(),
            uniform_blocks: Default::default(),
            uniform_buffers: Vec::new(),
        }
    }

    /// Vertex stage of a graphics program.
    pub fn craft_vertex(
        &mut self,
        decls: &Declarations,
        textures: &[TextureInfo],
        body: &str,
    ) -> GraphicsResult<String> {
        profile_scope!("craft_vertex");

        let stage = ShaderStage::Vertex;
        let mut text = ShaderText::new();
        self.inject_header(&mut text, decls)?;
        text.push_str("#define ngl_out_pos gl_Position\n")?;
        self.inject_inter_stage_vars(&mut text, decls, stage)?;
        self.inject_uniforms(&mut text, decls, stage)?;
        self.inject_texture_infos(&mut text, textures, stage)?;
        self.inject_blocks(&mut text, decls, stage)?;
        self.inject_attributes(&mut text, decls)?;
        self.inject_uniform_block(&mut text, stage)?;
        text.push_str(body)?;
        self.finish_stage(text)
    }

    /// Fragment stage of a graphics program writing `outputs` colors.
    pub fn craft_fragment(
        &mut self,
        decls: &Declarations,
        textures: &[TextureInfo],
        body: &str,
        outputs: u32,
    ) -> GraphicsResult<String> {
        profile_scope!("craft_fragment");

        let stage = ShaderStage::Fragment;
        let mut text = ShaderText::new();
        self.inject_header(&mut text, decls)?;
        if self.profile.has_precision_qualifiers {
            text.push_str(
                "#if GL_FRAGMENT_PRECISION_HIGH\n\
                 precision highp float;\n\
                 #else\n\
                 precision mediump float;\n\
                 #endif\n",
            )?;
        }
        self.inject_fragment_output(&mut text, outputs)?;
        self.inject_inter_stage_vars(&mut text, decls, stage)?;
        self.inject_uniforms(&mut text, decls, stage)?;
        self.inject_texture_infos(&mut text, textures, stage)?;
        self.inject_blocks(&mut text, decls, stage)?;
        self.inject_uniform_block(&mut text, stage)?;
        text.push_str(body)?;
        self.finish_stage(text)
    }

    /// Single stage of a compute program.
    pub fn craft_compute(
        &mut self,
        decls: &Declarations,
        textures: &[TextureInfo],
        body: &str,
    ) -> GraphicsResult<String> {
        profile_scope!("craft_compute");

        let stage = ShaderStage::Compute;
        let mut text = ShaderText::new();
        self.inject_header(&mut text, decls)?;
        self.inject_uniforms(&mut text, decls, stage)?;
        self.inject_texture_infos(&mut text, textures, stage)?;
        self.inject_blocks(&mut text, decls, stage)?;
        self.inject_uniform_block(&mut text, stage)?;
        text.push_str(body)?;
        self.finish_stage(text)
    }

    pub fn finish(self) -> Injected {
        Injected {
            declared: self.declared,
            uniform_blocks: self.uniform_buffers,
        }
    }

    fn finish_stage(&self, text: ShaderText) -> GraphicsResult<String> {
        let out = preprocess(text.as_str(), self.profile)?;
        Ok(out.text)
    }

    // ========================================================================
    // Stage boilerplate
    // ========================================================================

    fn inject_header(&self, text: &mut ShaderText, decls: &Declarations) -> GraphicsResult<()> {
        let profile = self.profile;
        text.push_fmt(format_args!("{}\n", profile.version_directive()))?;

        if decls.textures.is_empty() {
            return text.push_str("\n");
        }

        if profile.sampling.requires_oes_extension() {
            text.push_str("#extension GL_OES_EGL_image_external : require\n")?;
        }
        let modern = profile.has_modern_texture_picking;
        let pick = |legacy: &'static str| if modern { "texture" } else { legacy };
        text.push_fmt(format_args!(
            "#define ngli_tex2d   {}\n\
             #define ngli_tex3d   {}\n\
             #define ngli_texcube {}\n\
             #define ngli_img2d  imageLoad\n\
             #define ngli_imgsz  imageSize\n\
             #define ngli_texlod textureLod\n\n",
            pick("texture2D"),
            pick("texture3D"),
            pick("textureCube"),
        ))
    }

    fn inject_fragment_output(&mut self, text: &mut ShaderText, outputs: u32) -> GraphicsResult<()> {
        if !self.profile.has_in_out_qualifiers {
            let target = if outputs > 1 { "gl_FragData" } else { "gl_FragColor" };
            return text.push_fmt(format_args!("#define ngl_out_color {target}\n"));
        }

        let count = outputs.max(1);
        if let Some(location) = self.bindings.next_out_locations(ShaderStage::Fragment, count) {
            text.push_fmt(format_args!("layout(location={location}) "))?;
        }
        if outputs > 1 {
            text.push_fmt(format_args!("out vec4 ngl_out_color[{outputs}];\n"))
        } else {
            text.push_str("out vec4 ngl_out_color;\n")
        }
    }

    fn inject_inter_stage_vars(
        &mut self,
        text: &mut ShaderText,
        decls: &Declarations,
        stage: ShaderStage,
    ) -> GraphicsResult<()> {
        let qualifier = match (self.profile.has_in_out_qualifiers, stage) {
            (false, _) => "varying",
            (true, ShaderStage::Vertex) => "out",
            (true, _) => "in",
        };

        for var in &decls.inter_stage_vars {
            let count = var.ty.attribute_location_count();
            let location = match stage {
                ShaderStage::Vertex => self.bindings.next_out_locations(stage, count),
                _ => self.bindings.next_in_locations(stage, count),
            };
            if let Some(location) = location {
                text.push_fmt(format_args!("layout(location={location}) "))?;
            }
            text.push_fmt(format_args!(
                "{qualifier} {} {};\n",
                var.ty.glsl_type(),
                var.name
            ))?;
        }
        Ok(())
    }

    // ========================================================================
    // Uniforms
    // ========================================================================

    fn precision_prefix(&self, ty: ValueType, precision: Precision, default: Precision) -> String {
        if !self.profile.has_precision_qualifiers || ty == ValueType::Bool {
            return String::new();
        }
        let precision = if precision == Precision::Auto { default } else { precision };
        precision
            .qualifier()
            .map(|qualifier| format!("{qualifier} "))
            .unwrap_or_default()
    }

    fn inject_uniforms(
        &mut self,
        text: &mut ShaderText,
        decls: &Declarations,
        stage: ShaderStage,
    ) -> GraphicsResult<()> {
        for uniform in decls.uniforms.iter().filter(|u| u.stage == stage) {
            self.inject_uniform(text, uniform)?;
        }
        Ok(())
    }

    fn inject_uniform(&mut self, text: &mut ShaderText, uniform: &NamedUniform) -> GraphicsResult<()> {
        if uniform.ty.is_block() {
            log::error!("uniform {} cannot have a block type", uniform.name);
            return Err(GraphicsError::InvalidArgument(format!(
                "uniform {} is declared with block type {}",
                uniform.name,
                uniform.ty.glsl_type()
            )));
        }

        if self.profile.use_uniform_block && !uniform.ty.is_sampler_or_image() {
            let block = self.uniform_blocks[uniform.stage.index()]
                .get_or_insert_with(|| Block::new(BlockLayout::Std140, BlockKind::Uniform));
            block.add_field(uniform.name.clone(), uniform.ty, uniform.count)?;
            return Ok(());
        }

        let precision = self.precision_prefix(uniform.ty, uniform.precision, Precision::High);
        text.push_fmt(format_args!(
            "uniform {precision}{} {}",
            uniform.ty.glsl_type(),
            uniform.name
        ))?;
        if uniform.count > 0 {
            text.push_fmt(format_args!("[{}]", uniform.count))?;
        }
        text.push_str(";\n")?;

        self.declared.uniforms.try_reserve(1)?;
        self.declared.uniforms.push(PipelineUniform {
            name: uniform.name.clone(),
            ty: uniform.ty,
            stage: uniform.stage,
            count: uniform.count.max(1),
            location: None,
        });
        Ok(())
    }

    // ========================================================================
    // Textures
    // ========================================================================

    fn inject_texture_infos(
        &mut self,
        text: &mut ShaderText,
        textures: &[TextureInfo],
        stage: ShaderStage,
    ) -> GraphicsResult<()> {
        for info in textures {
            for (_, field) in info.fields().filter(|(_, f)| f.stage == stage) {
                if !field.ty.is_sampler_or_image() {
                    let uniform = NamedUniform::new(field.name.clone(), field.ty, stage);
                    self.inject_uniform(text, &uniform)?;
                    continue;
                }

                let binding = self.bindings.next_binding(stage, BindingKind::Texture);
                let precision = self.precision_prefix(field.ty, info.precision, Precision::Low);

                if info.kind == TextureKind::Image2D {
                    let format = info.format.ok_or_else(|| {
                        log::error!("texture {} accessed as an image has no format", info.name);
                        GraphicsError::InvalidArgument(format!(
                            "{}: format must be set when accessing a texture as an image",
                            info.name
                        ))
                    })?;
                    let qualifier = format.glsl_format().ok_or_else(|| {
                        log::error!("format {format:?} has no GLSL image qualifier");
                        GraphicsError::Unsupported(format!(
                            "{}: format {format:?} cannot be used as an image",
                            info.name
                        ))
                    })?;
                    text.push_fmt(format_args!("layout({qualifier}"))?;
                    if let Some(binding) = binding {
                        text.push_fmt(format_args!(", binding={binding}"))?;
                    }
                    let access = if info.writable { "writeonly" } else { "readonly" };
                    text.push_fmt(format_args!(") {access} "))?;
                } else if let Some(binding) = binding {
                    text.push_fmt(format_args!("layout(binding={binding}) "))?;
                }

                text.push_fmt(format_args!(
                    "uniform {precision}{} {};\n",
                    field.ty.glsl_type(),
                    field.name
                ))?;

                self.declared.textures.try_reserve(1)?;
                self.declared.textures.push(PipelineTexture {
                    name: field.name.clone(),
                    ty: field.ty,
                    stage,
                    location: None,
                    binding,
                    texture: info.texture.clone(),
                });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    fn inject_blocks(
        &mut self,
        text: &mut ShaderText,
        decls: &Declarations,
        stage: ShaderStage,
    ) -> GraphicsResult<()> {
        for named in decls.blocks.iter().filter(|b| b.stage == stage) {
            self.inject_block(text, named)?;
        }
        Ok(())
    }

    fn inject_block(&mut self, text: &mut ShaderText, named: &NamedBlock) -> GraphicsResult<()> {
        let block_name = format!("{}_block", named.name);
        let instance_name = named.instance_name.as_deref().unwrap_or(&named.name);
        let binding = self
            .bindings
            .next_binding(named.stage, named.block.kind().into());

        self.write_block(text, &block_name, instance_name, &named.block, binding, named.variadic)?;

        self.declared.buffers.try_reserve(1)?;
        self.declared.buffers.push(PipelineBuffer {
            name: block_name,
            kind: named.block.kind(),
            stage: named.stage,
            binding,
            buffer: named.buffer.clone(),
        });
        Ok(())
    }

    fn write_block(
        &self,
        text: &mut ShaderText,
        block_name: &str,
        instance_name: &str,
        block: &Block,
        binding: Option<u32>,
        variadic: bool,
    ) -> GraphicsResult<()> {
        text.push_fmt(format_args!("layout({}", block.layout().glsl_name()))?;
        if let Some(binding) = binding {
            text.push_fmt(format_args!(",binding={binding}"))?;
        }
        let keyword = match block.kind() {
            BlockKind::Uniform => "uniform",
            BlockKind::Storage => "buffer",
        };
        text.push_fmt(format_args!(") {keyword} {block_name} {{\n"))?;

        let last = block.fields().len().saturating_sub(1);
        for (i, field) in block.fields().iter().enumerate() {
            text.push_fmt(format_args!("    {} {}", field.ty.glsl_type(), field.name))?;
            if variadic && i == last {
                text.push_str("[]")?;
            } else if field.count > 0 {
                text.push_fmt(format_args!("[{}]", field.count))?;
            }
            text.push_str(";\n")?;
        }
        text.push_fmt(format_args!("}} {instance_name};\n"))
    }

    fn inject_uniform_block(&mut self, text: &mut ShaderText, stage: ShaderStage) -> GraphicsResult<()> {
        let Some(block) = self.uniform_blocks[stage.index()].take() else {
            return Ok(());
        };
        if block.is_empty() {
            return Ok(());
        }

        let block_name = format!("ngl_{}_block", stage.short_name());
        let binding = self.bindings.next_binding(stage, BindingKind::UniformBlock);
        self.write_block(text, &block_name, "", &block, binding, false)?;

        let descriptor = BufferDescriptor::new(
            u64::from(block.size()),
            BufferUsage::UNIFORM | BufferUsage::DYNAMIC,
        )
        .with_label(block_name.clone());
        let buffer = Arc::new(Buffer::new(descriptor)?);

        self.declared.buffers.try_reserve(1)?;
        self.declared.buffers.push(PipelineBuffer {
            name: block_name,
            kind: BlockKind::Uniform,
            stage,
            binding,
            buffer: Some(Arc::clone(&buffer)),
        });

        self.uniform_buffers.try_reserve(1)?;
        self.uniform_buffers.push(UniformBlockBinding {
            stage,
            block: block.clone(),
            buffer,
        });
        self.uniform_blocks[stage.index()] = Some(block);
        Ok(())
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    fn inject_attributes(&mut self, text: &mut ShaderText, decls: &Declarations) -> GraphicsResult<()> {
        for attribute in &decls.attributes {
            self.inject_attribute(text, attribute)?;
        }
        Ok(())
    }

    fn inject_attribute(&mut self, text: &mut ShaderText, attribute: &NamedAttribute) -> GraphicsResult<()> {
        let count = attribute.ty.attribute_location_count();
        let base = self.bindings.next_in_locations(ShaderStage::Vertex, count);

        if let Some(location) = base {
            text.push_fmt(format_args!("layout(location={location}) "))?;
        }
        let precision = self.precision_prefix(attribute.ty, attribute.precision, Precision::High);
        text.push_fmt(format_args!(
            "{} {precision}{} {};\n",
            self.profile.attribute_qualifier(),
            attribute.ty.glsl_type(),
            attribute.name
        ))?;

        let Some(buffer) = &attribute.buffer else {
            return Ok(());
        };

        let column_size = attribute.format.bytes_per_pixel();
        self.declared.attributes.try_reserve(count as usize)?;
        for column in 0..count {
            let location = match base {
                Some(base) => AttributeLocation::Explicit(base + column),
                None => AttributeLocation::Pending { column },
            };
            self.declared.attributes.push(DeclaredAttribute {
                name: attribute.name.clone(),
                location,
                format: attribute.format,
                stride: attribute.stride,
                offset: attribute.offset + column * column_size,
                rate: attribute.rate,
                buffer: Arc::clone(buffer),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::craft::named::{NamedInterStageVar, NamedTexture};
    use crate::shader::{SamplingStrategy, TargetApi};
    use crate::types::Format;

    fn expand(decls: &Declarations, profile: &CapabilityProfile) -> Vec<TextureInfo> {
        decls
            .textures
            .iter()
            .map(|t| TextureInfo::expand(t, profile.sampling, true))
            .collect()
    }

    fn vertex_buffer() -> Arc<Buffer> {
        Arc::new(Buffer::new(BufferDescriptor::new(256, BufferUsage::VERTEX)).unwrap())
    }

    #[test]
    fn test_empty_fragment_gles() {
        let profile = CapabilityProfile::new(TargetApi::OpenGlEs, 300);
        let mut injector = Injector::new(&profile);
        let text = injector
            .craft_fragment(&Declarations::new(), &[], "void main(){}\n", 1)
            .unwrap();
        assert_eq!(
            text,
            "#version 300 es\n\n\
             #if GL_FRAGMENT_PRECISION_HIGH\n\
             precision highp float;\n\
             #else\n\
             precision mediump float;\n\
             #endif\n\
             out vec4 ngl_out_color;\n\
             void main(){}\n"
        );
    }

    #[test]
    fn test_legacy_fragment_output_define() {
        let profile = CapabilityProfile::new(TargetApi::OpenGl, 120);
        let mut injector = Injector::new(&profile);
        let text = injector
            .craft_fragment(&Declarations::new(), &[], "", 1)
            .unwrap();
        assert!(text.contains("#define ngl_out_color gl_FragColor\n"));
        assert!(!text.contains("precision"));
    }

    #[test]
    fn test_vulkan_declares_locations() {
        let profile = CapabilityProfile::new(TargetApi::Vulkan, 110);
        let decls = Declarations::new()
            .with_inter_stage_var(NamedInterStageVar::new("uv", ValueType::Vec2))
            .with_inter_stage_var(NamedInterStageVar::new("normal", ValueType::Vec3));
        let mut injector = Injector::new(&profile);
        let vertex = injector.craft_vertex(&decls, &[], "").unwrap();
        let fragment = injector.craft_fragment(&decls, &[], "", 2).unwrap();

        assert!(vertex.contains("layout(location=0) out vec2 uv;\n"));
        assert!(vertex.contains("layout(location=1) out vec3 normal;\n"));
        assert!(fragment.contains("layout(location=0) out vec4 ngl_out_color[2];\n"));
        assert!(fragment.contains("layout(location=0) in vec2 uv;\n"));
        assert!(fragment.contains("layout(location=1) in vec3 normal;\n"));
    }

    #[test]
    fn test_legacy_inter_stage_vars_are_varyings() {
        let profile = CapabilityProfile::new(TargetApi::OpenGlEs, 200);
        let decls =
            Declarations::new().with_inter_stage_var(NamedInterStageVar::new("uv", ValueType::Vec2));
        let mut injector = Injector::new(&profile);
        let vertex = injector.craft_vertex(&decls, &[], "").unwrap();
        assert!(vertex.contains("varying vec2 uv;\n"));
    }

    #[test]
    fn test_uniform_precision_and_arrays() {
        let profile = CapabilityProfile::new(TargetApi::OpenGlEs, 300);
        let decls = Declarations::new()
            .with_uniform(NamedUniform::new("color", ValueType::Vec4, ShaderStage::Fragment))
            .with_uniform(
                NamedUniform::new("weights", ValueType::Float, ShaderStage::Fragment)
                    .with_count(4)
                    .with_precision(Precision::Medium),
            )
            .with_uniform(NamedUniform::new("enabled", ValueType::Bool, ShaderStage::Fragment));
        let mut injector = Injector::new(&profile);
        let text = injector.craft_fragment(&decls, &[], "", 1).unwrap();
        assert!(text.contains("uniform highp vec4 color;\n"));
        assert!(text.contains("uniform mediump float weights[4];\n"));
        assert!(text.contains("uniform bool enabled;\n"));

        let declared = injector.finish().declared;
        assert_eq!(declared.uniforms.len(), 3);
        assert_eq!(declared.uniforms[1].count, 4);
        assert_eq!(declared.uniforms[0].count, 1);
    }

    #[test]
    fn test_texture_header_and_fields() {
        let profile = CapabilityProfile::new(TargetApi::OpenGlEs, 200);
        let decls = Declarations::new().with_texture(NamedTexture::new(
            "tex0",
            TextureKind::Texture2D,
            ShaderStage::Fragment,
        ));
        let textures = expand(&decls, &profile);
        let mut injector = Injector::new(&profile);
        let vertex = injector.craft_vertex(&decls, &textures, "").unwrap();
        let fragment = injector.craft_fragment(&decls, &textures, "", 1).unwrap();

        assert!(vertex.contains("#define ngli_tex2d   texture2D\n"));
        assert!(vertex.contains("uniform highp mat4 tex0_coord_matrix;\n"));
        assert!(!fragment.contains("tex0_coord_matrix"));
        assert!(fragment.contains("uniform lowp sampler2D tex0_sampler;\n"));
        assert!(fragment.contains("uniform highp vec2 tex0_dimensions;\n"));
        assert!(fragment.contains("uniform highp float tex0_ts;\n"));

        let declared = injector.finish().declared;
        assert_eq!(declared.textures.len(), 1);
        assert_eq!(declared.textures[0].binding, None);
        assert_eq!(declared.uniforms.len(), 3);
    }

    #[test]
    fn test_oes_extension_is_required() {
        let profile = CapabilityProfile::new(TargetApi::OpenGlEs, 300)
            .with_sampling(SamplingStrategy::ExternalOes);
        let decls = Declarations::new().with_texture(NamedTexture::new(
            "tex0",
            TextureKind::Texture2D,
            ShaderStage::Fragment,
        ));
        let textures = expand(&decls, &profile);
        let mut injector = Injector::new(&profile);
        let fragment = injector.craft_fragment(&decls, &textures, "", 1).unwrap();
        assert!(fragment.contains("#extension GL_OES_EGL_image_external : require\n"));
        assert!(fragment.contains("uniform lowp samplerExternalOES tex0_external_sampler;\n"));
        assert!(fragment.contains("uniform highp int tex0_sampling_mode;\n"));
    }

    #[test]
    fn test_image_declaration() {
        let profile = CapabilityProfile::new(TargetApi::OpenGlEs, 310);
        let decls = Declarations::new().with_texture(
            NamedTexture::new("img", TextureKind::Image2D, ShaderStage::Compute)
                .with_format(Format::Rgba8Unorm)
                .with_writable(true),
        );
        let textures: Vec<_> = decls
            .textures
            .iter()
            .map(|t| TextureInfo::expand(t, profile.sampling, false))
            .collect();
        let mut injector = Injector::new(&profile);
        let text = injector.craft_compute(&decls, &textures, "").unwrap();
        assert!(text.contains("layout(rgba8) writeonly uniform lowp image2D img_sampler;\n"));
    }

    #[test]
    fn test_image_without_format_fails() {
        let profile = CapabilityProfile::new(TargetApi::OpenGlEs, 310);
        let decls = Declarations::new().with_texture(NamedTexture::new(
            "img",
            TextureKind::Image2D,
            ShaderStage::Compute,
        ));
        let textures = expand(&decls, &profile);
        let mut injector = Injector::new(&profile);
        let err = injector.craft_compute(&decls, &textures, "").unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidArgument(_)));
    }

    #[test]
    fn test_image_with_unsupported_format_fails() {
        let profile = CapabilityProfile::new(TargetApi::OpenGlEs, 310);
        let decls = Declarations::new().with_texture(
            NamedTexture::new("img", TextureKind::Image2D, ShaderStage::Compute)
                .with_format(Format::Depth32Float),
        );
        let textures = expand(&decls, &profile);
        let mut injector = Injector::new(&profile);
        let err = injector.craft_compute(&decls, &textures, "").unwrap_err();
        assert!(matches!(err, GraphicsError::Unsupported(_)));
    }

    #[test]
    fn test_storage_block_with_binding() {
        let profile = CapabilityProfile::new(TargetApi::OpenGl, 430);
        let mut block = Block::new(BlockLayout::Std430, BlockKind::Storage);
        block.add_field("count", ValueType::UInt, 0).unwrap();
        block.add_field("values", ValueType::Float, 1).unwrap();
        let decls = Declarations::new().with_block(
            NamedBlock::new("data", ShaderStage::Compute, block).with_variadic(true),
        );
        let mut injector = Injector::new(&profile);
        let text = injector.craft_compute(&decls, &[], "").unwrap();
        assert!(text.contains(
            "layout(std430,binding=0) buffer data_block {\n    uint count;\n    float values[];\n} data;\n"
        ));
        let declared = injector.finish().declared;
        assert_eq!(declared.buffers[0].name, "data_block");
        assert_eq!(declared.buffers[0].binding, Some(0));
    }

    #[test]
    fn test_vulkan_consolidates_uniforms() {
        let profile = CapabilityProfile::new(TargetApi::Vulkan, 110);
        let decls = Declarations::new()
            .with_uniform(NamedUniform::new("color", ValueType::Vec4, ShaderStage::Fragment))
            .with_uniform(NamedUniform::new("scale", ValueType::Float, ShaderStage::Fragment));
        let mut injector = Injector::new(&profile);
        let text = injector.craft_fragment(&decls, &[], "", 1).unwrap();
        assert!(text.contains(
            "layout(std140,binding=0) uniform ngl_frag_block {\n    vec4 color;\n    float scale;\n} ;\n"
        ));
        assert!(!text.contains("uniform vec4 color;"));

        let injected = injector.finish();
        assert!(injected.declared.uniforms.is_empty());
        assert_eq!(injected.uniform_blocks.len(), 1);
        let binding = &injected.uniform_blocks[0];
        assert_eq!(binding.stage, ShaderStage::Fragment);
        assert_eq!(binding.buffer.size(), 32);
        assert_eq!(injected.declared.buffers[0].name, "ngl_frag_block");
    }

    #[test]
    fn test_attribute_spans() {
        let profile = CapabilityProfile::new(TargetApi::Vulkan, 110);
        let buffer = vertex_buffer();
        let decls = Declarations::new()
            .with_attribute(
                NamedAttribute::new("transform", ValueType::Mat4, Format::Rgba32Float)
                    .with_buffer(Arc::clone(&buffer)),
            )
            .with_attribute(
                NamedAttribute::new("position", ValueType::Vec3, Format::Rgb32Float)
                    .with_buffer(buffer),
            )
            .with_attribute(NamedAttribute::new("unused", ValueType::Vec2, Format::Rg32Float));
        let mut injector = Injector::new(&profile);
        let text = injector.craft_vertex(&decls, &[], "").unwrap();
        assert!(text.contains("layout(location=0) in mat4 transform;\n"));
        assert!(text.contains("layout(location=4) in vec3 position;\n"));
        assert!(text.contains("layout(location=5) in vec2 unused;\n"));

        let declared = injector.finish().declared;
        let locations: Vec<_> = declared.attributes.iter().map(|a| a.location).collect();
        assert_eq!(
            locations,
            (0..5).map(AttributeLocation::Explicit).collect::<Vec<_>>()
        );
        assert_eq!(declared.attributes[1].offset, 16);
        assert_eq!(declared.attributes[0].stride, 64);
    }

    #[test]
    fn test_attribute_locations_pending_without_explicit_locations() {
        let profile = CapabilityProfile::new(TargetApi::OpenGl, 330);
        let decls = Declarations::new().with_attribute(
            NamedAttribute::new("transform", ValueType::Mat4, Format::Rgba32Float)
                .with_buffer(vertex_buffer()),
        );
        let mut injector = Injector::new(&profile);
        let text = injector.craft_vertex(&decls, &[], "").unwrap();
        assert!(text.contains("in mat4 transform;\n"));
        assert!(!text.contains("layout(location"));

        let declared = injector.finish().declared;
        let columns: Vec<_> = declared.attributes.iter().map(|a| a.location).collect();
        assert_eq!(
            columns,
            (0..4)
                .map(|column| AttributeLocation::Pending { column })
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_block_typed_uniform_is_rejected() {
        let profile = CapabilityProfile::new(TargetApi::OpenGl, 330);
        let decls = Declarations::new().with_uniform(NamedUniform::new(
            "data",
            ValueType::UniformBuffer,
            ShaderStage::Vertex,
        ));
        let mut injector = Injector::new(&profile);
        let err = injector.craft_vertex(&decls, &[], "").unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidArgument(_)));
    }
}
