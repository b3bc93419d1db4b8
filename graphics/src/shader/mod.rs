//! Shader dialects and text processing.
//!
//! - [`CapabilityProfile`] - syntax features of the target dialect
//! - [`SamplingStrategy`] - how video frames are sampled on the platform
//! - [`ShaderText`] - fallible text buffer the stages are written into
//! - [`preprocess`] - rewriting of the `ngl_*` texture picking calls

mod preprocess;
mod profile;
mod sampling;
mod text;

pub use preprocess::{Occurrence, Preprocessed, PseudoFunction, preprocess, scan};
pub use profile::{CapabilityProfile, MediaPlatform, TargetApi};
pub use sampling::{SamplingMode, SamplingStrategy, TextureField};
pub use text::ShaderText;

/// Shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment,
    /// Compute shader.
    Compute,
}

impl ShaderStage {
    /// Number of stages.
    pub const COUNT: usize = 3;

    /// Every stage, in index order.
    pub const ALL: [ShaderStage; Self::COUNT] = [Self::Vertex, Self::Fragment, Self::Compute];

    /// Position of the stage in per-stage arrays.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Short name used to build per-stage identifiers (`ngl_frag_block`).
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::Fragment => "frag",
            Self::Compute => "comp",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
            Self::Compute => f.write_str("compute"),
        }
    }
}
