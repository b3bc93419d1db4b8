//! Texture types and descriptors.

use super::Format;
use bitflags::bitflags;

bitflags! {
    /// Usage flags for textures.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// Texture can be sampled in a shader.
        const SAMPLED = 1 << 0;
        /// Texture can be read or written as a storage image.
        const STORAGE = 1 << 1;
        /// Texture can be used as a render attachment.
        const RENDER_ATTACHMENT = 1 << 2;
        /// Texture can be copied to.
        const COPY_DST = 1 << 3;
    }
}

impl Default for TextureUsage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Descriptor for creating a texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    /// Debug label for the texture.
    pub label: Option<String>,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth in texels (1 for 2D and cube textures).
    pub depth: u32,
    /// Texel format.
    pub format: Format,
    /// Usage flags.
    pub usage: TextureUsage,
}

impl TextureDescriptor {
    /// Create a new 2D texture descriptor.
    pub fn new_2d(width: u32, height: u32, format: Format, usage: TextureUsage) -> Self {
        Self {
            label: None,
            width,
            height,
            depth: 1,
            format,
            usage,
        }
    }

    /// Create a new 3D texture descriptor.
    pub fn new_3d(width: u32, height: u32, depth: u32, format: Format, usage: TextureUsage) -> Self {
        Self {
            depth,
            ..Self::new_2d(width, height, format, usage)
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Size in bytes of the base level.
    pub fn byte_size(&self) -> u64 {
        u64::from(self.width)
            * u64::from(self.height)
            * u64::from(self.depth)
            * u64::from(self.format.bytes_per_pixel())
    }
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        Self::new_2d(1, 1, Format::default(), TextureUsage::SAMPLED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_size() {
        let desc = TextureDescriptor::new_2d(4, 2, Format::Rgba8Unorm, TextureUsage::SAMPLED);
        assert_eq!(desc.byte_size(), 32);

        let desc = TextureDescriptor::new_3d(2, 2, 2, Format::R32Float, TextureUsage::STORAGE)
            .with_label("volume");
        assert_eq!(desc.byte_size(), 32);
        assert_eq!(desc.label.as_deref(), Some("volume"));
    }
}
