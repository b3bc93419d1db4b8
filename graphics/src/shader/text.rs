//! Growable shader text buffer with fallible allocation.

use std::fmt;

use crate::error::{GraphicsError, GraphicsResult};

/// Text of one shader stage under construction.
///
/// Every append reserves memory with `try_reserve`, so running out of
/// memory surfaces as [`GraphicsError::Memory`] instead of aborting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderText {
    buf: String,
}

struct FallibleSink<'a> {
    buf: &'a mut String,
    out_of_memory: bool,
}

impl fmt::Write for FallibleSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.buf.try_reserve(s.len()).is_err() {
            self.out_of_memory = true;
            return Err(fmt::Error);
        }
        self.buf.push_str(s);
        Ok(())
    }
}

impl ShaderText {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a string slice.
    pub fn push_str(&mut self, s: &str) -> GraphicsResult<()> {
        self.buf.try_reserve(s.len())?;
        self.buf.push_str(s);
        Ok(())
    }

    /// Append formatted text, typically built with `format_args!`.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> GraphicsResult<()> {
        let mut sink = FallibleSink {
            buf: &mut self.buf,
            out_of_memory: false,
        };
        match fmt::write(&mut sink, args) {
            Ok(()) => Ok(()),
            Err(_) if sink.out_of_memory => Err(GraphicsError::Memory),
            Err(e) => Err(GraphicsError::InvalidArgument(format!(
                "formatting shader text failed: {e}"
            ))),
        }
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the buffer, returning the text.
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Display for ShaderText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}
