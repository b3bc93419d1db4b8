//! Interface block layouts.
//!
//! A [`Block`] is an ordered list of plain-typed fields laid out with the
//! std140 or std430 rules. It describes both caller-supplied uniform and
//! storage blocks and the per-stage block the crafter accumulates loose
//! uniforms into.

use super::ValueType;
use crate::error::{GraphicsError, GraphicsResult};

/// Memory layout rules of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockLayout {
    #[default]
    Std140,
    Std430,
}

impl BlockLayout {
    /// GLSL layout qualifier.
    pub fn glsl_name(&self) -> &'static str {
        match self {
            Self::Std140 => "std140",
            Self::Std430 => "std430",
        }
    }
}

/// Whether a block is bound as a uniform or a storage buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    #[default]
    Uniform,
    Storage,
}

impl BlockKind {
    /// The matching interface block value type.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Uniform => ValueType::UniformBuffer,
            Self::Storage => ValueType::StorageBuffer,
        }
    }
}

/// A field of a [`Block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockField {
    /// Field name.
    pub name: String,
    /// Element type.
    pub ty: ValueType,
    /// Array length, `0` for a non-array field.
    pub count: u32,
    /// Byte offset from the start of the block.
    pub offset: u32,
    /// Byte size of the whole field.
    pub size: u32,
    /// Distance between two array elements, `0` for a non-array field.
    pub stride: u32,
}

/// An interface block description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    layout: BlockLayout,
    kind: BlockKind,
    fields: Vec<BlockField>,
    end: u32,
    max_align: u32,
}

fn align_up(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

impl Block {
    /// Create an empty block.
    pub fn new(layout: BlockLayout, kind: BlockKind) -> Self {
        Self {
            layout,
            kind,
            fields: Vec::new(),
            end: 0,
            max_align: 0,
        }
    }

    /// Append a field, returning its index.
    ///
    /// Opaque and interface block types cannot live inside a block.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        ty: ValueType,
        count: u32,
    ) -> GraphicsResult<usize> {
        let name = name.into();
        let (size, mut align) = ty.block_size_align().ok_or_else(|| {
            GraphicsError::InvalidArgument(format!(
                "field {name} of type {} cannot be stored in a block",
                ty.glsl_type()
            ))
        })?;

        let too_large = || {
            GraphicsError::InvalidArgument(format!("field {name} does not fit in a block"))
        };
        let (size, stride) = if count > 0 {
            if self.layout == BlockLayout::Std140 {
                align = align_up(align, 16);
            }
            let stride = align_up(size, align);
            (stride.checked_mul(count).ok_or_else(too_large)?, stride)
        } else {
            (size, 0)
        };

        let offset = self.end.checked_next_multiple_of(align).ok_or_else(too_large)?;
        let end = offset.checked_add(size).ok_or_else(too_large)?;
        // The padded block size must stay representable as well.
        end.checked_next_multiple_of(16).ok_or_else(too_large)?;
        self.fields.try_reserve(1)?;
        self.fields.push(BlockField {
            name,
            ty,
            count,
            offset,
            size,
            stride,
        });
        self.end = end;
        self.max_align = self.max_align.max(align);
        Ok(self.fields.len() - 1)
    }

    /// Layout rules of this block.
    pub fn layout(&self) -> BlockLayout {
        self.layout
    }

    /// Uniform or storage.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[BlockField] {
        &self.fields
    }

    /// Position of the field called `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns true if no field was added.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total size in bytes, padded to the block's base alignment.
    pub fn size(&self) -> u32 {
        if self.fields.is_empty() {
            return 0;
        }
        let base = match self.layout {
            BlockLayout::Std140 => 16,
            BlockLayout::Std430 => self.max_align,
        };
        align_up(self.end, base)
    }
}
