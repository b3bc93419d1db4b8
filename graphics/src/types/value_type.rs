//! Logical value types and their GLSL spelling.

/// Type of a uniform, block field, attribute or texture field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    IVec2,
    IVec3,
    IVec4,
    UInt,
    UVec2,
    UVec3,
    UVec4,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
    Bool,
    Sampler2D,
    Sampler2DRect,
    Sampler3D,
    SamplerCube,
    SamplerExternalOes,
    SamplerExternal2DY2YExt,
    Image2D,
    /// A `uniform` interface block.
    UniformBuffer,
    /// A `buffer` interface block.
    StorageBuffer,
}

impl ValueType {
    /// Every value type, in declaration order.
    pub const ALL: [ValueType; 24] = [
        Self::Int,
        Self::IVec2,
        Self::IVec3,
        Self::IVec4,
        Self::UInt,
        Self::UVec2,
        Self::UVec3,
        Self::UVec4,
        Self::Float,
        Self::Vec2,
        Self::Vec3,
        Self::Vec4,
        Self::Mat3,
        Self::Mat4,
        Self::Bool,
        Self::Sampler2D,
        Self::Sampler2DRect,
        Self::Sampler3D,
        Self::SamplerCube,
        Self::SamplerExternalOes,
        Self::SamplerExternal2DY2YExt,
        Self::Image2D,
        Self::UniformBuffer,
        Self::StorageBuffer,
    ];

    /// Returns the GLSL keyword for this type.
    ///
    /// Interface block types map to their storage qualifier (`uniform` or
    /// `buffer`).
    pub fn glsl_type(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::IVec2 => "ivec2",
            Self::IVec3 => "ivec3",
            Self::IVec4 => "ivec4",
            Self::UInt => "uint",
            Self::UVec2 => "uvec2",
            Self::UVec3 => "uvec3",
            Self::UVec4 => "uvec4",
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Mat3 => "mat3",
            Self::Mat4 => "mat4",
            Self::Bool => "bool",
            Self::Sampler2D => "sampler2D",
            Self::Sampler2DRect => "sampler2DRect",
            Self::Sampler3D => "sampler3D",
            Self::SamplerCube => "samplerCube",
            Self::SamplerExternalOes => "samplerExternalOES",
            Self::SamplerExternal2DY2YExt => "__samplerExternal2DY2YEXT",
            Self::Image2D => "image2D",
            Self::UniformBuffer => "uniform",
            Self::StorageBuffer => "buffer",
        }
    }

    /// Returns true for opaque sampler and image types.
    pub fn is_sampler_or_image(&self) -> bool {
        matches!(
            self,
            Self::Sampler2D
                | Self::Sampler2DRect
                | Self::Sampler3D
                | Self::SamplerCube
                | Self::SamplerExternalOes
                | Self::SamplerExternal2DY2YExt
                | Self::Image2D
        )
    }

    /// Returns true for interface block types.
    pub fn is_block(&self) -> bool {
        matches!(self, Self::UniformBuffer | Self::StorageBuffer)
    }

    /// Returns `(size, alignment)` in bytes of a single element inside a
    /// std140/std430 block, or `None` for opaque and block types.
    ///
    /// Matrix columns are padded to a full `vec4` in both layouts.
    pub fn block_size_align(&self) -> Option<(u32, u32)> {
        let layout = match self {
            Self::Int | Self::UInt | Self::Float | Self::Bool => (4, 4),
            Self::IVec2 | Self::UVec2 | Self::Vec2 => (8, 8),
            Self::IVec3 | Self::UVec3 | Self::Vec3 => (12, 16),
            Self::IVec4 | Self::UVec4 | Self::Vec4 => (16, 16),
            Self::Mat3 => (48, 16),
            Self::Mat4 => (64, 16),
            Self::Sampler2D
            | Self::Sampler2DRect
            | Self::Sampler3D
            | Self::SamplerCube
            | Self::SamplerExternalOes
            | Self::SamplerExternal2DY2YExt
            | Self::Image2D
            | Self::UniformBuffer
            | Self::StorageBuffer => return None,
        };
        Some(layout)
    }

    /// Number of consecutive vertex input locations an attribute of this
    /// type occupies.
    pub fn attribute_location_count(&self) -> u32 {
        if *self == Self::Mat4 { 4 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_types_have_keywords() {
        let keywords: HashSet<_> = ValueType::ALL.iter().map(|t| t.glsl_type()).collect();
        assert_eq!(keywords.len(), ValueType::ALL.len());
        assert!(keywords.iter().all(|k| !k.is_empty()));
    }

    #[test]
    fn test_plain_types_have_block_layout() {
        for ty in ValueType::ALL {
            let plain = !ty.is_sampler_or_image() && !ty.is_block();
            assert_eq!(ty.block_size_align().is_some(), plain, "{ty:?}");
        }
    }

    #[test]
    fn test_opaque_predicate() {
        assert!(ValueType::Image2D.is_sampler_or_image());
        assert!(ValueType::SamplerExternalOes.is_sampler_or_image());
        assert!(!ValueType::Mat4.is_sampler_or_image());
        assert!(!ValueType::UniformBuffer.is_sampler_or_image());
    }

    #[test]
    fn test_attribute_location_count() {
        assert_eq!(ValueType::Mat4.attribute_location_count(), 4);
        assert_eq!(ValueType::Vec3.attribute_location_count(), 1);
    }
}
