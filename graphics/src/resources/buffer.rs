//! Buffer resource.

use parking_lot::Mutex;

use crate::error::{GraphicsError, GraphicsResult};
use crate::types::BufferDescriptor;

/// A buffer resource.
///
/// The contents live in host memory until the renderer uploads them. The
/// crafter creates one per stage for the consolidated uniform block; callers
/// fill it after crafting and before the first draw.
///
/// # Example
///
/// ```ignore
/// let buffer = Buffer::new(BufferDescriptor::new(64, BufferUsage::UNIFORM))?;
/// buffer.write_pod(0, &[1.0f32, 0.0, 0.0, 1.0])?;
/// ```
pub struct Buffer {
    descriptor: BufferDescriptor,
    contents: Mutex<Vec<u8>>,
}

impl Buffer {
    /// Create a zero-filled buffer.
    pub fn new(descriptor: BufferDescriptor) -> GraphicsResult<Self> {
        let len = usize::try_from(descriptor.size).map_err(|_| GraphicsError::Memory)?;
        let mut contents = Vec::new();
        contents.try_reserve_exact(len)?;
        contents.resize(len, 0);
        Ok(Self {
            descriptor,
            contents: Mutex::new(contents),
        })
    }

    /// Get the buffer descriptor.
    pub fn descriptor(&self) -> &BufferDescriptor {
        &self.descriptor
    }

    /// Get the buffer size in bytes.
    pub fn size(&self) -> u64 {
        self.descriptor.size
    }

    /// Get the buffer label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    /// Copy `data` into the buffer at `offset`.
    pub fn write(&self, offset: usize, data: &[u8]) -> GraphicsResult<()> {
        let mut contents = self.contents.lock();
        let end = offset
            .checked_add(data.len())
            .filter(|end| *end <= contents.len())
            .ok_or_else(|| {
                GraphicsError::InvalidArgument(format!(
                    "write of {} bytes at offset {offset} overflows a {} byte buffer",
                    data.len(),
                    contents.len()
                ))
            })?;
        contents[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Copy a plain-old-data value into the buffer at `offset`.
    pub fn write_pod<T: bytemuck::Pod>(&self, offset: usize, value: &T) -> GraphicsResult<()> {
        self.write(offset, bytemuck::bytes_of(value))
    }

    /// Snapshot of the current contents.
    pub fn read(&self) -> Vec<u8> {
        self.contents.lock().clone()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.descriptor.size)
            .field("usage", &self.descriptor.usage)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

// Ensure Buffer is Send + Sync
static_assertions::assert_impl_all!(Buffer: Send, Sync);
