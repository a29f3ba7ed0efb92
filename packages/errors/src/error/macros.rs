//! Macros for error creation and handling

/// Build an [`Error`](crate::Error) from a format string.
///
/// The captured stack starts at the macro call site.
///
/// ```
/// let e = snag_errors::errorf!("can only halve even numbers, got {}", 1);
/// assert_eq!(e.to_string(), "can only halve even numbers, got 1");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::Error::from_args(::std::format_args!($($arg)*))
    };
}

/// Return early with an error built by [`errorf!`]
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return ::std::result::Result::Err(::std::convert::From::from($crate::errorf!($($arg)*)))
    };
}

/// Return early with an error built by [`errorf!`] unless a condition holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail!($($arg)*);
        }
    };
}
