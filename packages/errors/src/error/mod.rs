//! Stack-carrying errors
//!
//! - [`Error`] normalizes any failure signal and keeps the stack it was
//!   created on
//! - `errorf!`, `bail!` and `ensure!` build errors from format strings
//! - [`ResultExt`] and [`OptionExt`] attach stacks to foreign failures
//! - [`ErrorLog`] writes errors to the `log` facade

pub mod constructors;
pub mod display;
pub mod extensions;
pub mod logging;
pub mod macros;
pub mod types;

pub use extensions::{OptionExt, ResultExt};
pub use logging::ErrorLog;
pub use types::{Error, Result};
