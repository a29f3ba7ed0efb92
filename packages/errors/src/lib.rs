//! Stack-trace capturing errors for the snag project
//!
//! Any failure signal (a message, a format string, an existing error, a
//! panic payload of any type, or nothing) becomes one [`Error`] carrying:
//! - the message
//! - the type name of the original value
//! - the call stack at construction, parsed into [`StackFrame`]s on demand
//!
//! ```
//! use snag_errors::Error;
//!
//! let err = Error::new("disk full", 0);
//! assert_eq!(err.to_string(), "disk full");
//! assert!(Error::ptr_eq(&Error::new(err.clone(), 3), &err));
//! ```

pub mod capture;
pub mod error;
pub mod frame;
pub mod parse;
pub mod recover;
pub mod report;
pub mod signal;

pub use capture::RawStack;
pub use error::*;
pub use frame::{FrameError, StackFrame};
pub use recover::{catch_panic, catch_panic_with_skip};
pub use report::ExceptionReport;
pub use signal::{ErrorWithStackFrames, Message, Signal};

/// Most frames kept for one stack, both when capturing and when parsing
pub const MAX_STACK_DEPTH: usize = 50;
