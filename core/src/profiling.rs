//! Profiling support via Tracy.
//!
//! Instrumentation is compiled in only with the `profiling` Cargo feature;
//! without it every macro expands to nothing.
//!
//! ```toml
//! [dependencies]
//! ngl-core = { version = "0.1", features = ["profiling"] }
//! ```
//!
//! ```ignore
//! use ngl_core::profiling::{profile_function, profile_scope};
//!
//! fn craft_stage() {
//!     profile_function!();
//!
//!     {
//!         profile_scope!("inject_uniforms");
//!         // ...
//!     }
//! }
//! ```
//!
//! Connect the Tracy viewer (<https://github.com/wolfpld/tracy/releases>) to
//! the running process to see the spans.

#[cfg(feature = "profiling")]
pub use tracy_client::{self, span};

/// Create a profiling span for the current scope.
///
/// The span ends when the enclosing scope exits.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Create a profiling span covering the whole enclosing function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Create a function span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

pub use profile_function;
pub use profile_scope;

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_compile() {
        profile_scope!("test_scope");
        profile_function!();
    }
}
