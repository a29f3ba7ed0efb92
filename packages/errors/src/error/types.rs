//! Core error type

use crate::capture::RawStack;
use crate::frame::StackFrame;
use once_cell::sync::OnceCell;
use std::error::Error as StdError;
use std::sync::Arc;

/// Error value carrying a message, the failing value's type name and the
/// call stack it was created on.
///
/// Cloning is cheap and every clone shares one stack and one frame cache.
#[derive(Clone)]
pub struct Error {
    pub(super) inner: Arc<ErrorInner>,
}

pub(super) struct ErrorInner {
    pub message: String,
    pub type_name: &'static str,
    /// The wrapped value, when the signal was an error
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    /// Set once at construction
    pub stack: RawStack,
    /// Filled from `stack` on first access
    pub frames: OnceCell<Vec<StackFrame>>,
}

// Shared state is only written once, through the frame cache
impl std::panic::UnwindSafe for Error {}
impl std::panic::RefUnwindSafe for Error {}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
