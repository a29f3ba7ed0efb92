//! Error constructors and accessors

use super::types::{Error, ErrorInner};
use crate::capture::{capture, RawStack};
use crate::frame::StackFrame;
use crate::parse::parse;
use crate::signal::{Framed, Message, Signal};
use crate::MAX_STACK_DEPTH;
use once_cell::sync::OnceCell;
use std::any::{type_name, Any};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

impl Error {
    /// Normalize any failure signal into an [`Error`].
    ///
    /// `skip` is the number of innermost caller frames to leave out of the
    /// captured stack. With 0 the stack starts at the function calling `new`.
    ///
    /// An [`Error`] comes back unchanged, and a value implementing
    /// [`ErrorWithStackFrames`](crate::ErrorWithStackFrames) keeps its own
    /// frames. In both cases `skip` is ignored.
    #[inline(never)]
    #[must_use]
    pub fn new(signal: impl Into<Signal>, skip: usize) -> Self {
        match signal.into() {
            Signal::Normalized(err) => err,
            Signal::Framed(framed) => Self::from_framed(framed),
            signal => Self::assemble(signal, capture(skip)),
        }
    }

    /// Build an error from format arguments, see [`errorf!`](crate::errorf)
    ///
    /// The stack starts at the caller.
    #[inline(never)]
    #[must_use]
    pub fn from_args(args: fmt::Arguments<'_>) -> Self {
        let stack = capture(0);
        Self::from_parts(
            fmt::format(args),
            type_name::<Message>(),
            None,
            stack,
            OnceCell::new(),
        )
    }

    /// Normalize the payload of a panic caught with
    /// [`std::panic::catch_unwind`].
    ///
    /// The stack is captured here, at the recovery site. Use
    /// [`catch_panic`](crate::catch_panic) to keep the panicking frames.
    #[inline(never)]
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>, skip: usize) -> Self {
        match Signal::from_panic(payload) {
            Signal::Normalized(err) => err,
            Signal::Framed(framed) => Self::from_framed(framed),
            signal => Self::assemble(signal, capture(skip)),
        }
    }

    /// Normalize with a stack captured elsewhere
    pub(crate) fn with_stack(signal: Signal, stack: RawStack) -> Self {
        match signal {
            Signal::Normalized(err) => err,
            Signal::Framed(framed) => Self::from_framed(framed),
            signal => Self::assemble(signal, stack),
        }
    }

    fn assemble(signal: Signal, stack: RawStack) -> Self {
        let (message, type_name) = signal.describe();
        let source = match signal {
            Signal::Error { value, .. } => Some(value),
            _ => None,
        };
        Self::from_parts(message, type_name, source, stack, OnceCell::new())
    }

    fn from_framed(framed: Framed) -> Self {
        let Framed {
            message,
            mut frames,
            type_name,
            value,
        } = framed;
        frames.truncate(MAX_STACK_DEPTH);
        Self::from_parts(
            message,
            type_name,
            Some(value),
            RawStack::empty(),
            OnceCell::with_value(frames),
        )
    }

    fn from_parts(
        message: String,
        type_name: &'static str,
        source: Option<Box<dyn StdError + Send + Sync>>,
        stack: RawStack,
        frames: OnceCell<Vec<StackFrame>>,
    ) -> Self {
        Self {
            inner: Arc::new(ErrorInner {
                message,
                type_name,
                source,
                stack,
                frames,
            }),
        }
    }

    /// The error message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Type name of the value this error was built from
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name
    }

    /// Parsed frames, innermost first.
    ///
    /// Parsing happens on the first call only.
    #[must_use]
    pub fn stack_frames(&self) -> &[StackFrame] {
        self.inner.frames.get_or_init(|| parse(&self.inner.stack))
    }

    /// The stack rendered one frame per line
    #[must_use]
    pub fn stack(&self) -> Vec<u8> {
        self.stack_frames()
            .iter()
            .map(|frame| format!("{frame}\n"))
            .collect::<String>()
            .into_bytes()
    }

    /// Type name, message and rendered stack in one block
    #[must_use]
    pub fn error_stack(&self) -> String {
        format!(
            "{} {}\n{}",
            self.type_name(),
            self.message(),
            String::from_utf8_lossy(&self.stack())
        )
    }

    /// Raw program counters, empty when frames were copied from another value
    #[must_use]
    pub fn callers(&self) -> &[usize] {
        self.inner.stack.program_counters()
    }

    /// The wrapped value, if this error was built from one of type `T`
    #[must_use]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        self.inner.source.as_deref()?.downcast_ref::<T>()
    }

    /// Whether both handles point at the same error
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }
}
