//! Texture resource.

use crate::types::{Format, TextureDescriptor};

/// A texture resource referenced by texture declarations.
pub struct Texture {
    descriptor: TextureDescriptor,
}

impl Texture {
    /// Create a texture from its descriptor.
    pub fn new(descriptor: TextureDescriptor) -> Self {
        Self { descriptor }
    }

    /// Get the texture descriptor.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// Texel format.
    pub fn format(&self) -> Format {
        self.descriptor.format
    }

    /// Width and height in texels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.descriptor.width, self.descriptor.height)
    }

    /// Get the texture label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.descriptor.width)
            .field("height", &self.descriptor.height)
            .field("format", &self.descriptor.format)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

static_assertions::assert_impl_all!(Texture: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextureUsage;

    #[test]
    fn test_texture_accessors() {
        let texture = Texture::new(
            TextureDescriptor::new_2d(640, 480, Format::Rgba8Unorm, TextureUsage::SAMPLED)
                .with_label("frame"),
        );
        assert_eq!(texture.dimensions(), (640, 480));
        assert_eq!(texture.format(), Format::Rgba8Unorm);
        assert_eq!(texture.label(), Some("frame"));
    }
}
