//! Logical pixel formats.
//!
//! A [`Format`] describes the memory layout of one texel or one vertex
//! attribute element. The crafter needs three facts about it: how many
//! components it has, how many bytes one element occupies (used to offset
//! the columns of matrix attributes) and the GLSL image-layout qualifier,
//! if the format can back a storage image at all.

/// Pixel and vertex element format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    // 8-bit per component
    /// 8-bit red channel, unsigned normalized.
    R8Unorm,
    /// 8-bit red channel, signed normalized.
    R8Snorm,
    /// 8-bit red channel, unsigned integer.
    R8Uint,
    /// 8-bit red channel, signed integer.
    R8Sint,
    /// 8-bit RG channels, unsigned normalized.
    Rg8Unorm,
    /// 8-bit RG channels, signed normalized.
    Rg8Snorm,
    /// 8-bit RG channels, unsigned integer.
    Rg8Uint,
    /// 8-bit RG channels, signed integer.
    Rg8Sint,
    /// 8-bit RGB channels, unsigned normalized.
    Rgb8Unorm,
    /// 8-bit RGB channels, signed normalized.
    Rgb8Snorm,
    /// 8-bit RGB channels, unsigned integer.
    Rgb8Uint,
    /// 8-bit RGB channels, signed integer.
    Rgb8Sint,
    /// 8-bit RGB channels, sRGB.
    Rgb8UnormSrgb,
    /// 8-bit RGBA channels, unsigned normalized.
    #[default]
    Rgba8Unorm,
    /// 8-bit RGBA channels, signed normalized.
    Rgba8Snorm,
    /// 8-bit RGBA channels, unsigned integer.
    Rgba8Uint,
    /// 8-bit RGBA channels, signed integer.
    Rgba8Sint,
    /// 8-bit RGBA channels, sRGB.
    Rgba8UnormSrgb,
    /// 8-bit BGRA channels, unsigned normalized.
    Bgra8Unorm,
    /// 8-bit BGRA channels, signed normalized.
    Bgra8Snorm,
    /// 8-bit BGRA channels, unsigned integer.
    Bgra8Uint,
    /// 8-bit BGRA channels, signed integer.
    Bgra8Sint,

    // 16-bit per component
    /// 16-bit red channel, unsigned normalized.
    R16Unorm,
    /// 16-bit red channel, signed normalized.
    R16Snorm,
    /// 16-bit red channel, unsigned integer.
    R16Uint,
    /// 16-bit red channel, signed integer.
    R16Sint,
    /// 16-bit red channel, float.
    R16Float,
    /// 16-bit RG channels, unsigned normalized.
    Rg16Unorm,
    /// 16-bit RG channels, signed normalized.
    Rg16Snorm,
    /// 16-bit RG channels, unsigned integer.
    Rg16Uint,
    /// 16-bit RG channels, signed integer.
    Rg16Sint,
    /// 16-bit RG channels, float.
    Rg16Float,
    /// 16-bit RGB channels, unsigned normalized.
    Rgb16Unorm,
    /// 16-bit RGB channels, signed normalized.
    Rgb16Snorm,
    /// 16-bit RGB channels, unsigned integer.
    Rgb16Uint,
    /// 16-bit RGB channels, signed integer.
    Rgb16Sint,
    /// 16-bit RGB channels, float.
    Rgb16Float,
    /// 16-bit RGBA channels, unsigned normalized.
    Rgba16Unorm,
    /// 16-bit RGBA channels, signed normalized.
    Rgba16Snorm,
    /// 16-bit RGBA channels, unsigned integer.
    Rgba16Uint,
    /// 16-bit RGBA channels, signed integer.
    Rgba16Sint,
    /// 16-bit RGBA channels, float.
    Rgba16Float,

    // 32/64-bit per component
    /// 32-bit red channel, unsigned integer.
    R32Uint,
    /// 32-bit red channel, signed integer.
    R32Sint,
    /// 64-bit red channel, signed integer.
    R64Sint,
    /// 32-bit red channel, float.
    R32Float,
    /// 32-bit RG channels, unsigned integer.
    Rg32Uint,
    /// 32-bit RG channels, signed integer.
    Rg32Sint,
    /// 32-bit RG channels, float.
    Rg32Float,
    /// 32-bit RGB channels, unsigned integer.
    Rgb32Uint,
    /// 32-bit RGB channels, signed integer.
    Rgb32Sint,
    /// 32-bit RGB channels, float.
    Rgb32Float,
    /// 32-bit RGBA channels, unsigned integer.
    Rgba32Uint,
    /// 32-bit RGBA channels, signed integer.
    Rgba32Sint,
    /// 32-bit RGBA channels, float.
    Rgba32Float,

    // Depth/stencil
    /// 16-bit depth.
    Depth16Unorm,
    /// 24-bit depth packed in 32 bits.
    Depth24Unorm,
    /// 32-bit depth, float.
    Depth32Float,
    /// 24-bit depth with 8-bit stencil.
    Depth24UnormStencil8,
    /// 32-bit float depth with 8-bit stencil.
    Depth32FloatStencil8,
    /// 8-bit stencil.
    Stencil8,
}

impl Format {
    /// Every format, in declaration order.
    pub const ALL: [Format; 61] = [
        Self::R8Unorm,
        Self::R8Snorm,
        Self::R8Uint,
        Self::R8Sint,
        Self::Rg8Unorm,
        Self::Rg8Snorm,
        Self::Rg8Uint,
        Self::Rg8Sint,
        Self::Rgb8Unorm,
        Self::Rgb8Snorm,
        Self::Rgb8Uint,
        Self::Rgb8Sint,
        Self::Rgb8UnormSrgb,
        Self::Rgba8Unorm,
        Self::Rgba8Snorm,
        Self::Rgba8Uint,
        Self::Rgba8Sint,
        Self::Rgba8UnormSrgb,
        Self::Bgra8Unorm,
        Self::Bgra8Snorm,
        Self::Bgra8Uint,
        Self::Bgra8Sint,
        Self::R16Unorm,
        Self::R16Snorm,
        Self::R16Uint,
        Self::R16Sint,
        Self::R16Float,
        Self::Rg16Unorm,
        Self::Rg16Snorm,
        Self::Rg16Uint,
        Self::Rg16Sint,
        Self::Rg16Float,
        Self::Rgb16Unorm,
        Self::Rgb16Snorm,
        Self::Rgb16Uint,
        Self::Rgb16Sint,
        Self::Rgb16Float,
        Self::Rgba16Unorm,
        Self::Rgba16Snorm,
        Self::Rgba16Uint,
        Self::Rgba16Sint,
        Self::Rgba16Float,
        Self::R32Uint,
        Self::R32Sint,
        Self::R64Sint,
        Self::R32Float,
        Self::Rg32Uint,
        Self::Rg32Sint,
        Self::Rg32Float,
        Self::Rgb32Uint,
        Self::Rgb32Sint,
        Self::Rgb32Float,
        Self::Rgba32Uint,
        Self::Rgba32Sint,
        Self::Rgba32Float,
        Self::Depth16Unorm,
        Self::Depth24Unorm,
        Self::Depth32Float,
        Self::Depth24UnormStencil8,
        Self::Depth32FloatStencil8,
        Self::Stencil8,
    ];

    /// Returns the number of components.
    pub fn component_count(&self) -> u32 {
        match self {
            Self::R8Unorm
            | Self::R8Snorm
            | Self::R8Uint
            | Self::R8Sint
            | Self::R16Unorm
            | Self::R16Snorm
            | Self::R16Uint
            | Self::R16Sint
            | Self::R16Float
            | Self::R32Uint
            | Self::R32Sint
            | Self::R64Sint
            | Self::R32Float
            | Self::Depth16Unorm
            | Self::Depth32Float
            | Self::Stencil8 => 1,
            Self::Rg8Unorm
            | Self::Rg8Snorm
            | Self::Rg8Uint
            | Self::Rg8Sint
            | Self::Rg16Unorm
            | Self::Rg16Snorm
            | Self::Rg16Uint
            | Self::Rg16Sint
            | Self::Rg16Float
            | Self::Rg32Uint
            | Self::Rg32Sint
            | Self::Rg32Float
            | Self::Depth24Unorm
            | Self::Depth24UnormStencil8 => 2,
            Self::Rgb8Unorm
            | Self::Rgb8Snorm
            | Self::Rgb8Uint
            | Self::Rgb8Sint
            | Self::Rgb8UnormSrgb
            | Self::Rgb16Unorm
            | Self::Rgb16Snorm
            | Self::Rgb16Uint
            | Self::Rgb16Sint
            | Self::Rgb16Float
            | Self::Rgb32Uint
            | Self::Rgb32Sint
            | Self::Rgb32Float
            | Self::Depth32FloatStencil8 => 3,
            Self::Rgba8Unorm
            | Self::Rgba8Snorm
            | Self::Rgba8Uint
            | Self::Rgba8Sint
            | Self::Rgba8UnormSrgb
            | Self::Bgra8Unorm
            | Self::Bgra8Snorm
            | Self::Bgra8Uint
            | Self::Bgra8Sint
            | Self::Rgba16Unorm
            | Self::Rgba16Snorm
            | Self::Rgba16Uint
            | Self::Rgba16Sint
            | Self::Rgba16Float
            | Self::Rgba32Uint
            | Self::Rgba32Sint
            | Self::Rgba32Float => 4,
        }
    }

    /// Returns the size in bytes of one element.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            Self::R8Unorm | Self::R8Snorm | Self::R8Uint | Self::R8Sint | Self::Stencil8 => 1,
            Self::Rg8Unorm
            | Self::Rg8Snorm
            | Self::Rg8Uint
            | Self::Rg8Sint
            | Self::R16Unorm
            | Self::R16Snorm
            | Self::R16Uint
            | Self::R16Sint
            | Self::R16Float
            | Self::Depth16Unorm => 2,
            Self::Rgb8Unorm
            | Self::Rgb8Snorm
            | Self::Rgb8Uint
            | Self::Rgb8Sint
            | Self::Rgb8UnormSrgb => 3,
            Self::Rgba8Unorm
            | Self::Rgba8Snorm
            | Self::Rgba8Uint
            | Self::Rgba8Sint
            | Self::Rgba8UnormSrgb
            | Self::Bgra8Unorm
            | Self::Bgra8Snorm
            | Self::Bgra8Uint
            | Self::Bgra8Sint
            | Self::Rg16Unorm
            | Self::Rg16Snorm
            | Self::Rg16Uint
            | Self::Rg16Sint
            | Self::Rg16Float
            | Self::R32Uint
            | Self::R32Sint
            | Self::R32Float
            | Self::Depth24Unorm
            | Self::Depth32Float
            | Self::Depth24UnormStencil8 => 4,
            Self::Rgb16Unorm
            | Self::Rgb16Snorm
            | Self::Rgb16Uint
            | Self::Rgb16Sint
            | Self::Rgb16Float => 6,
            Self::Rgba16Unorm
            | Self::Rgba16Snorm
            | Self::Rgba16Uint
            | Self::Rgba16Sint
            | Self::Rgba16Float
            | Self::R64Sint
            | Self::Rg32Uint
            | Self::Rg32Sint
            | Self::Rg32Float
            | Self::Depth32FloatStencil8 => 8,
            Self::Rgb32Uint | Self::Rgb32Sint | Self::Rgb32Float => 12,
            Self::Rgba32Uint | Self::Rgba32Sint | Self::Rgba32Float => 16,
        }
    }

    /// Returns the GLSL image-layout qualifier for this format.
    ///
    /// Three-component, sRGB, 64-bit and depth/stencil formats cannot back
    /// a storage image and return `None`. BGRA formats share the qualifier
    /// of their RGBA counterpart.
    pub fn glsl_format(&self) -> Option<&'static str> {
        let qualifier = match self {
            Self::R8Unorm => "r8",
            Self::R8Snorm => "r8_snorm",
            Self::R8Uint => "r8ui",
            Self::R8Sint => "r8i",
            Self::Rg8Unorm => "rg8",
            Self::Rg8Snorm => "rg8_snorm",
            Self::Rg8Uint => "rg8ui",
            Self::Rg8Sint => "rg8i",
            Self::Rgba8Unorm | Self::Bgra8Unorm => "rgba8",
            Self::Rgba8Snorm | Self::Bgra8Snorm => "rgba8_snorm",
            Self::Rgba8Uint | Self::Bgra8Uint => "rgba8ui",
            Self::Rgba8Sint | Self::Bgra8Sint => "rgba8i",
            Self::R16Unorm => "r16",
            Self::R16Snorm => "r16_snorm",
            Self::R16Uint => "r16ui",
            Self::R16Sint => "r16i",
            Self::R16Float => "r16f",
            Self::Rg16Unorm => "rg16",
            Self::Rg16Snorm => "rg16_snorm",
            Self::Rg16Uint => "rg16ui",
            Self::Rg16Sint => "rg16i",
            Self::Rg16Float => "rg16f",
            Self::Rgba16Unorm => "rgba16",
            Self::Rgba16Snorm => "rgba16_snorm",
            Self::Rgba16Uint => "rgba16ui",
            Self::Rgba16Sint => "rgba16i",
            Self::Rgba16Float => "rgba16f",
            Self::R32Uint => "r32ui",
            Self::R32Sint => "r32i",
            Self::R32Float => "r32f",
            Self::Rg32Uint => "rg32ui",
            Self::Rg32Sint => "rg32i",
            Self::Rg32Float => "rg32f",
            Self::Rgba32Uint => "rgba32ui",
            Self::Rgba32Sint => "rgba32i",
            Self::Rgba32Float => "rgba32f",
            Self::Rgb8Unorm
            | Self::Rgb8Snorm
            | Self::Rgb8Uint
            | Self::Rgb8Sint
            | Self::Rgb8UnormSrgb
            | Self::Rgba8UnormSrgb
            | Self::Rgb16Unorm
            | Self::Rgb16Snorm
            | Self::Rgb16Uint
            | Self::Rgb16Sint
            | Self::Rgb16Float
            | Self::R64Sint
            | Self::Rgb32Uint
            | Self::Rgb32Sint
            | Self::Rgb32Float
            | Self::Depth16Unorm
            | Self::Depth24Unorm
            | Self::Depth32Float
            | Self::Depth24UnormStencil8
            | Self::Depth32FloatStencil8
            | Self::Stencil8 => return None,
        };
        Some(qualifier)
    }

    /// Returns true if this is a depth or stencil format.
    pub fn is_depth_stencil(&self) -> bool {
        matches!(
            self,
            Self::Depth16Unorm
                | Self::Depth24Unorm
                | Self::Depth32Float
                | Self::Depth24UnormStencil8
                | Self::Depth32FloatStencil8
                | Self::Stencil8
        )
    }
}
