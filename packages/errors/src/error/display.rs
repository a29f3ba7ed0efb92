//! Display and trait implementations for Error

use super::types::Error;
use crate::frame::StackFrame;
use crate::signal::ErrorWithStackFrames;
use std::fmt;

impl fmt::Display for Error {
    /// `{}` writes the message, `{:#}` adds one line per frame
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())?;

        if f.alternate() {
            for frame in self.stack_frames() {
                write!(f, "\n{frame}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message())
            .field("type_name", &self.type_name())
            .field("frames", &self.stack_frames())
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source.as_ref().and_then(|value| value.source())
    }
}

impl ErrorWithStackFrames for Error {
    fn stack_frames(&self) -> Vec<StackFrame> {
        Error::stack_frames(self).to_vec()
    }
}
