//! Resources referenced by crafted pipelines.
//!
//! - [`Buffer`] - host-visible memory backing attributes and blocks
//! - [`Texture`] - texture or image description
//!
//! Resources are reference-counted with [`Arc`] and can be shared across
//! threads. Declarations and pipeline elements hold clones of the handle.
//!
//! [`Arc`]: std::sync::Arc

mod buffer;
mod texture;

pub use buffer::Buffer;
pub use texture::Texture;
