//! Graphics error types.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur while crafting and binding programs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// Growing a shader text buffer failed.
    #[error("out of memory while building shader text")]
    Memory,
    /// A declaration or a pseudo-function call is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The target dialect has no representation for a requested feature.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// A resource required by the pipeline could not be resolved.
    #[error("not found: {0}")]
    NotFound(String),
    /// The program compiler rejected the crafted sources.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),
    /// An operation was called in the wrong lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Error category without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Memory,
    InvalidArgument,
    Unsupported,
    NotFound,
    ShaderCompilationFailed,
    InvalidState,
}

impl GraphicsError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Memory => ErrorKind::Memory,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ShaderCompilationFailed(_) => ErrorKind::ShaderCompilationFailed,
            Self::InvalidState(_) => ErrorKind::InvalidState,
        }
    }
}

impl From<TryReserveError> for GraphicsError {
    fn from(_: TryReserveError) -> Self {
        Self::Memory
    }
}

/// Result alias used across the crate.
pub type GraphicsResult<T> = Result<T, GraphicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphicsError::Memory;
        assert_eq!(err.to_string(), "out of memory while building shader text");

        let err = GraphicsError::Unsupported("no GLSL image format for Rgb8Unorm".to_string());
        assert_eq!(
            err.to_string(),
            "unsupported: no GLSL image format for Rgb8Unorm"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            GraphicsError::NotFound("pos".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(GraphicsError::Memory.kind(), ErrorKind::Memory);
    }

    #[test]
    fn test_try_reserve_maps_to_memory() {
        let mut text = String::new();
        let err = text.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(GraphicsError::from(err), GraphicsError::Memory);
    }
}
