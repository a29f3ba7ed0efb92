//! Failure signals
//!
//! Everything [`Error::new`](crate::Error::new) accepts is first turned into
//! a [`Signal`]. The variants are listed in the order they are probed, the
//! last one accepts any value at all.

use crate::error::Error;
use crate::frame::StackFrame;
use std::any::{type_name, type_name_of_val, Any};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Wrapper that stands in for plain message signals.
///
/// Errors built from strings, format arguments or nothing at all report this
/// type's name from [`Error::type_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(pub String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

/// A value that already knows the stack it failed on.
///
/// Normalizing such a value copies its frames instead of capturing new ones.
pub trait ErrorWithStackFrames: StdError {
    /// Frames recorded when the value was created, innermost first
    fn stack_frames(&self) -> Vec<StackFrame>;
}

/// A failure value that reports its own frames, see [`Signal::framed`]
#[derive(Debug)]
pub struct Framed {
    pub(crate) message: String,
    pub(crate) frames: Vec<StackFrame>,
    pub(crate) type_name: &'static str,
    pub(crate) value: Box<dyn StdError + Send + Sync>,
}

/// Any failure signal, classified
#[derive(Debug)]
pub enum Signal {
    /// No value at all
    Nil,
    /// An error that already carries a stack
    Normalized(Error),
    /// A value that reports its own frames
    Framed(Framed),
    /// A plain error without frames
    Error {
        /// The original error
        value: Box<dyn StdError + Send + Sync>,
        /// Type name of the original error
        type_name: &'static str,
    },
    /// A plain message
    Message(String),
    /// Anything else, shown through its printed form
    Other {
        /// Printed form of the value
        message: String,
        /// Type name of the value
        type_name: &'static str,
    },
}

impl Signal {
    /// Classify an error value.
    ///
    /// An [`Error`] passed here stays that same error.
    pub fn error<E>(value: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let type_name = type_name::<E>();
        Self::from_boxed(Box::new(value), type_name)
    }

    /// Classify a value that reports its own frames
    pub fn framed<T>(value: T) -> Self
    where
        T: ErrorWithStackFrames + Send + Sync + 'static,
    {
        if (&value as &dyn Any).is::<Error>() {
            return Self::error(value);
        }
        Self::Framed(Framed {
            message: value.to_string(),
            frames: value.stack_frames(),
            type_name: type_name::<T>(),
            value: Box::new(value),
        })
    }

    /// Classify any printable value by its `Debug` form.
    ///
    /// Errors, strings and empty options are recognised first and classified
    /// as [`Signal::Normalized`], [`Signal::Message`] and [`Signal::Nil`].
    pub fn other<T>(value: T) -> Self
    where
        T: fmt::Debug + 'static,
    {
        let any = &value as &dyn Any;
        if let Some(err) = any.downcast_ref::<Error>() {
            return Self::Normalized(err.clone());
        }
        if let Some(message) = any.downcast_ref::<&'static str>() {
            return Self::Message((*message).to_string());
        }
        if let Some(message) = any.downcast_ref::<String>() {
            return Self::Message(message.clone());
        }
        if let Some(message) = any.downcast_ref::<Option<&'static str>>() {
            return (*message).map_or(Self::Nil, Self::from);
        }
        if let Some(message) = any.downcast_ref::<Option<String>>() {
            return message.clone().map_or(Self::Nil, Self::from);
        }
        if let Some(err) = any.downcast_ref::<Option<Error>>() {
            return err.clone().map_or(Self::Nil, Self::Normalized);
        }
        Self::Other {
            message: format!("{value:?}"),
            type_name: type_name::<T>(),
        }
    }

    /// Classify the payload of a caught panic
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Error>() {
            Ok(err) => return Self::Normalized(*err),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<Box<dyn StdError + Send + Sync>>() {
            Ok(boxed) => return Self::from(*boxed),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::Message(*message),
            Err(payload) => payload,
        };
        match payload.downcast::<&'static str>() {
            Ok(message) => Self::Message((*message).to_string()),
            Err(payload) => Self::from_opaque(&*payload),
        }
    }

    fn from_boxed(value: Box<dyn StdError + Send + Sync>, type_name: &'static str) -> Self {
        match value.downcast::<Error>() {
            Ok(err) => Self::Normalized(*err),
            Err(value) => Self::Error { value, type_name },
        }
    }

    /// Scalars print their value, anything else only its shape
    fn from_opaque(payload: &(dyn Any + Send)) -> Self {
        macro_rules! probe {
            ($($ty:ty),* $(,)?) => {
                $(
                    if let Some(value) = payload.downcast_ref::<$ty>() {
                        return Self::Other {
                            message: format!("{value}"),
                            type_name: type_name::<$ty>(),
                        };
                    }
                )*
            };
        }
        probe!(char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

        Self::Other {
            message: "Box<dyn Any>".to_string(),
            type_name: type_name_of_val(payload),
        }
    }

    /// Message and type name for signals that need a fresh stack
    pub(crate) fn describe(&self) -> (String, &'static str) {
        match self {
            Self::Nil => ("<nil>".to_string(), type_name::<Message>()),
            Self::Normalized(err) => (err.message().to_string(), err.type_name()),
            Self::Framed(framed) => (framed.message.clone(), framed.type_name),
            Self::Error { value, type_name } => (value.to_string(), *type_name),
            Self::Message(message) => (message.clone(), type_name::<Message>()),
            Self::Other { message, type_name } => (message.clone(), *type_name),
        }
    }
}

impl From<Error> for Signal {
    fn from(err: Error) -> Self {
        Self::Normalized(err)
    }
}

impl From<&Error> for Signal {
    fn from(err: &Error) -> Self {
        Self::Normalized(err.clone())
    }
}

impl From<&str> for Signal {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for Signal {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<Cow<'_, str>> for Signal {
    fn from(message: Cow<'_, str>) -> Self {
        Self::Message(message.into_owned())
    }
}

impl From<Message> for Signal {
    fn from(message: Message) -> Self {
        Self::Message(message.0)
    }
}

impl<T: Into<Signal>> From<Option<T>> for Signal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

impl From<Box<dyn StdError + Send + Sync>> for Signal {
    fn from(value: Box<dyn StdError + Send + Sync>) -> Self {
        let type_name = type_name_of_val(&*value);
        Self::from_boxed(value, type_name)
    }
}

impl From<std::io::Error> for Signal {
    fn from(value: std::io::Error) -> Self {
        Self::error(value)
    }
}

impl From<fmt::Error> for Signal {
    fn from(value: fmt::Error) -> Self {
        Self::error(value)
    }
}

impl From<Box<dyn Any + Send>> for Signal {
    fn from(payload: Box<dyn Any + Send>) -> Self {
        Self::from_panic(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_are_messages() {
        assert!(matches!(Signal::from("boom"), Signal::Message(m) if m == "boom"));
        assert!(matches!(Signal::from(String::from("x")), Signal::Message(m) if m == "x"));
        assert!(matches!(Signal::from(None::<&str>), Signal::Nil));
        assert!(matches!(Signal::from(Some("y")), Signal::Message(m) if m == "y"));
    }

    #[test]
    fn test_panic_payload_probing() {
        let signal = Signal::from_panic(Box::new('a'));
        assert!(matches!(
            signal,
            Signal::Other { ref message, type_name: "char" } if message == "a"
        ));

        let signal = Signal::from_panic(Box::new(97_i32));
        assert_eq!(signal.describe(), ("97".to_string(), "i32"));

        let signal = Signal::from_panic(Box::new("static message"));
        assert!(matches!(signal, Signal::Message(m) if m == "static message"));

        struct Opaque;
        let signal = Signal::from_panic(Box::new(Opaque));
        assert!(matches!(signal, Signal::Other { ref message, .. } if message == "Box<dyn Any>"));
    }

    #[test]
    fn test_other_recognises_strings_and_nil() {
        assert!(matches!(Signal::other("boom"), Signal::Message(m) if m == "boom"));
        assert!(matches!(Signal::other(String::from("x")), Signal::Message(m) if m == "x"));
        assert!(matches!(Signal::other(None::<&str>), Signal::Nil));
        assert!(matches!(Signal::other(None::<String>), Signal::Nil));
        assert!(matches!(Signal::other(Some("y")), Signal::Message(m) if m == "y"));
        assert!(matches!(Signal::other(None::<Error>), Signal::Nil));
    }

    #[test]
    fn test_other_keeps_type_name() {
        let signal = Signal::other(vec![1_u8, 2]);
        assert_eq!(
            signal.describe(),
            ("[1, 2]".to_string(), "alloc::vec::Vec<u8>")
        );
    }

    #[test]
    fn test_error_records_concrete_type() {
        let signal = Signal::error(std::fmt::Error);
        assert_eq!(
            signal.describe(),
            ("an error occurred when formatting an argument".to_string(), "core::fmt::Error")
        );
    }
}
