//! Common types and descriptors.
//!
//! This module contains the format and value type tables, block layouts,
//! and the usage flags and descriptors of buffers and textures.

mod block;
mod buffer;
mod format;
mod texture;
mod value_type;

pub use block::{Block, BlockField, BlockKind, BlockLayout};
pub use buffer::{BufferDescriptor, BufferUsage};
pub use format::Format;
pub use texture::{TextureDescriptor, TextureUsage};
pub use value_type::ValueType;
