//! Extension traits that attach stacks to foreign failures
//!
//! The methods hide their own frame, so the stack starts where they are
//! called.

use super::types::{Error, Result};
use crate::signal::Signal;
use std::error::Error as StdError;

/// Convert the error side of a result into an [`Error`]
pub trait ResultExt<T, E> {
    /// Normalize through the error's [`Signal`] conversion
    ///
    /// # Errors
    ///
    /// Returns the normalized error when `self` is `Err`.
    fn stacked(self) -> Result<T>
    where
        E: Into<Signal>;

    /// Normalize any standard error, keeping it reachable through
    /// [`Error::downcast_ref`]
    ///
    /// # Errors
    ///
    /// Returns the normalized error when `self` is `Err`.
    fn stacked_error(self) -> Result<T>
    where
        E: StdError + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E> {
    #[inline(never)]
    fn stacked(self) -> Result<T>
    where
        E: Into<Signal>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::new(err, 1)),
        }
    }

    #[inline(never)]
    fn stacked_error(self) -> Result<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::new(Signal::error(err), 1)),
        }
    }
}

/// Turn a missing value into an [`Error`]
pub trait OptionExt<T> {
    /// # Errors
    ///
    /// Returns an error with `message` when `self` is `None`.
    fn ok_or_stack(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline(never)]
    fn ok_or_stack(self, message: &str) -> Result<T> {
        match self {
            Some(value) => Ok(value),
            None => Err(Error::new(message, 1)),
        }
    }
}
