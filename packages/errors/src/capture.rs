//! Stack capture
//!
//! Records the program counters of the current call stack without resolving
//! any symbols. Resolution is left to [`crate::parse`].

use crate::MAX_STACK_DEPTH;

#[cfg(feature = "full-backtrace")]
/// Frames between `capture` and the user's call site that always belong to
/// the normalizer: the public constructor that called `capture`.
const ENTRY_FRAMES: usize = 1;

#[cfg(feature = "full-backtrace")]
/// Unwinder frames tolerated above `capture` before its own frame is found.
const UNWINDER_HEADROOM: usize = 16;

/// Opaque snapshot of a call stack, innermost frame first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStack {
    pcs: Vec<usize>,
}

impl RawStack {
    /// An empty stack, used for errors whose frames were copied in
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a raw stack from already known program counters
    ///
    /// Anything past [`MAX_STACK_DEPTH`] is dropped.
    #[must_use]
    pub fn from_program_counters(mut pcs: Vec<usize>) -> Self {
        pcs.truncate(MAX_STACK_DEPTH);
        Self { pcs }
    }

    /// Program counters, innermost first
    #[must_use]
    pub fn program_counters(&self) -> &[usize] {
        &self.pcs
    }

    /// Number of captured frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.pcs.len()
    }

    /// Whether nothing was captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pcs.is_empty()
    }
}

/// Capture the calling stack.
///
/// The frames of the unwinder, of `capture` itself and of the constructor
/// that called it are always removed. `skip` removes that many more frames
/// starting from the innermost one.
#[cfg(feature = "full-backtrace")]
#[inline(never)]
pub fn capture(skip: usize) -> RawStack {
    let marker = capture as *const () as usize;
    let wanted = ENTRY_FRAMES.saturating_add(skip).saturating_add(MAX_STACK_DEPTH);
    let mut pcs = Vec::with_capacity(wanted.min(64));
    let mut found = false;

    backtrace::trace(|frame| {
        pcs.push(frame.ip() as usize);
        // clear the unwinder's frames, and start with our caller
        if !found && frame.symbol_address() as usize == marker {
            pcs.clear();
            found = true;
        }
        let limit = if found {
            wanted
        } else {
            wanted.saturating_add(UNWINDER_HEADROOM)
        };
        pcs.len() < limit
    });

    let skipped = ENTRY_FRAMES.saturating_add(skip).min(pcs.len());
    pcs.drain(..skipped);
    pcs.truncate(MAX_STACK_DEPTH);

    tracing::trace!(
        skip,
        frames = pcs.len(),
        marker_found = found,
        "captured raw stack"
    );
    RawStack { pcs }
}

/// Capture the calling stack.
///
/// Without the `full-backtrace` feature nothing is recorded.
#[cfg(not(feature = "full-backtrace"))]
#[inline(never)]
pub fn capture(skip: usize) -> RawStack {
    tracing::trace!(skip, "stack capture disabled");
    RawStack::empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_program_counters_truncates() {
        let stack = RawStack::from_program_counters((1..=MAX_STACK_DEPTH + 10).collect());
        assert_eq!(stack.len(), MAX_STACK_DEPTH);
        assert_eq!(stack.program_counters()[0], 1);
    }

    #[test]
    fn test_empty_stack() {
        let stack = RawStack::empty();
        assert!(stack.is_empty());
        assert_eq!(stack.program_counters(), &[] as &[usize]);
    }

    #[cfg(feature = "full-backtrace")]
    #[test]
    fn test_capture_is_bounded_and_nonempty() {
        let stack = capture(0);
        assert!(!stack.is_empty());
        assert!(stack.len() <= MAX_STACK_DEPTH);
    }

    #[cfg(feature = "full-backtrace")]
    #[test]
    fn test_huge_skip_yields_empty_stack() {
        assert!(capture(10_000).is_empty());
        assert!(capture(usize::MAX).is_empty());
        assert!(capture(usize::MAX - 1).is_empty());
    }
}
