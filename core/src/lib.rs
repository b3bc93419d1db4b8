//! # node.gl Core
//!
//! Utilities shared by the node.gl crates. At the moment this is the
//! Tracy-backed [`profiling`] instrumentation used by the shader crafter.

pub mod profiling;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the core crate version.
pub fn init() {
    log::info!("node.gl core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
