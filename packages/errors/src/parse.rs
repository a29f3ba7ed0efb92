//! Frame parsing
//!
//! Turns the program counters of a [`RawStack`] into [`StackFrame`]s using
//! the symbol information the `backtrace` crate can find at runtime.

use crate::capture::RawStack;
use crate::frame::StackFrame;
use crate::MAX_STACK_DEPTH;
use std::ffi::c_void;

/// Resolve every captured program counter into a frame.
///
/// The result lines up with the raw stack position by position. Frames with
/// no symbol information keep empty fields instead of being dropped.
#[must_use]
pub fn parse(stack: &RawStack) -> Vec<StackFrame> {
    let frames: Vec<StackFrame> = stack
        .program_counters()
        .iter()
        .take(MAX_STACK_DEPTH)
        .map(|&pc| resolve(pc))
        .collect();

    tracing::trace!(
        frames = frames.len(),
        unresolved = frames.iter().filter(|f| f.is_unresolved()).count(),
        "parsed stack frames"
    );
    frames
}

fn resolve(pc: usize) -> StackFrame {
    let mut frame = StackFrame {
        program_counter: pc,
        ..StackFrame::default()
    };

    // return addresses point past the call instruction
    let lookup = pc.saturating_sub(1);
    backtrace::resolve(lookup as *mut c_void, |symbol| {
        // inlined symbols come first, the last one is the real function
        // with its fully qualified name and the call site line
        let (package, function) = symbol
            .name()
            .map(|name| split_symbol(&format!("{name:#}")))
            .unwrap_or_default();
        frame.package = package;
        frame.name = function;
        frame.file = symbol
            .filename()
            .map(|file| file.display().to_string())
            .unwrap_or_default();
        frame.line_number = symbol.lineno().unwrap_or(0);
    });

    frame
}

/// Split a demangled symbol into `(package, name)`.
///
/// The name keeps trailing closure markers and the types that own the
/// function, the package is the module path in front of them.
pub(crate) fn split_symbol(symbol: &str) -> (String, String) {
    let segments = split_path(symbol);

    let mut start = segments.len();
    while start > 0 && segments[start - 1].starts_with('{') {
        start -= 1;
    }
    start = start.saturating_sub(1);
    while start > 0 && is_owner(segments[start - 1]) {
        start -= 1;
    }

    let name = segments[start..]
        .iter()
        .map(|segment| impl_self(segment).unwrap_or(*segment))
        .collect::<Vec<_>>()
        .join("::");
    let package = if start > 0 {
        segments[..start].join("::")
    } else {
        segments
            .first()
            .and_then(|first| qualified_self(first))
            .map(|self_ty| split_symbol(self_ty).0)
            .unwrap_or_default()
    };
    (package, name)
}

/// Split on `::` outside of generic brackets, keeping `::<T>` turbofish
/// arguments attached to the segment before them. Legacy `<impl T>` blocks
/// stay segments of their own.
fn split_path(symbol: &str) -> Vec<&str> {
    let bytes = symbol.as_bytes();
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    let push = |ranges: &mut Vec<(usize, usize)>, from: usize, to: usize| {
        match ranges.last_mut() {
            Some(last) if is_turbofish(&symbol[from..to]) => last.1 = to,
            _ => ranges.push((from, to)),
        }
    };

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                push(&mut ranges, start, i);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    push(&mut ranges, start, bytes.len());

    ranges.into_iter().map(|(from, to)| &symbol[from..to]).collect()
}

fn is_turbofish(segment: &str) -> bool {
    segment.starts_with('<') && !segment.starts_with("<impl ")
}

fn is_owner(segment: &str) -> bool {
    segment
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c == '<')
}

/// `<impl a::B>` -> `B`
fn impl_self(segment: &str) -> Option<&str> {
    let self_ty = segment.strip_prefix("<impl ")?.strip_suffix('>')?;
    split_path(self_ty).last().copied()
}

/// `<a::B as c::D>` -> `a::B`
fn qualified_self(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('<')?.strip_suffix('>')?;
    Some(inner.split(" as ").next().unwrap_or(inner).trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(symbol: &str) -> (String, String) {
        split_symbol(symbol)
    }

    #[test]
    fn test_plain_function() {
        assert_eq!(
            split("snag_errors::capture::capture"),
            ("snag_errors::capture".into(), "capture".into())
        );
        assert_eq!(split("main"), (String::new(), "main".into()));
        assert_eq!(split(""), (String::new(), String::new()));
    }

    #[test]
    fn test_closures_stay_with_their_function() {
        assert_eq!(
            split("stack_frames::parse_stack::{{closure}}"),
            ("stack_frames".into(), "parse_stack::{{closure}}".into())
        );
        assert_eq!(
            split("stack_frames::parse_stack::{closure#0}"),
            ("stack_frames".into(), "parse_stack::{closure#0}".into())
        );
    }

    #[test]
    fn test_methods_keep_their_type() {
        assert_eq!(
            split("snag_errors::error::Error::new"),
            ("snag_errors::error".into(), "Error::new".into())
        );
        assert_eq!(
            split("snag_errors::error::constructors::<impl snag_errors::error::types::Error>::new"),
            ("snag_errors::error::constructors".into(), "Error::new".into())
        );
        assert_eq!(
            split("demo::<impl demo::Wrapper<T>>::get::{{closure}}"),
            ("demo".into(), "Wrapper<T>::get::{{closure}}".into())
        );
    }

    #[test]
    fn test_trait_impls_use_self_type_package() {
        assert_eq!(
            split("<snag_errors::error::Error as core::fmt::Display>::fmt"),
            (
                "snag_errors::error".into(),
                "<snag_errors::error::Error as core::fmt::Display>::fmt".into()
            )
        );
    }

    #[test]
    fn test_turbofish_is_not_a_segment() {
        assert_eq!(
            split("std::rt::lang_start::<()>::{{closure}}"),
            ("std::rt".into(), "lang_start::<()>::{{closure}}".into())
        );
        assert_eq!(
            split("core::ops::function::FnOnce::call_once::<fn() -> u8, ()>"),
            (
                "core::ops::function".into(),
                "FnOnce::call_once::<fn() -> u8, ()>".into()
            )
        );
    }

    #[test]
    fn test_parse_keeps_positions_for_bogus_addresses() {
        let stack = RawStack::from_program_counters(vec![0, 1, 2]);
        let frames = parse(&stack);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].program_counter, 2);
    }
}
