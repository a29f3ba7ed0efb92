//! Panic recovery that keeps the panicking frames
//!
//! A panic unwinds the stack before `catch_unwind` returns, so the frames
//! are captured by a panic hook while they still exist. The hook is
//! installed once per process and only records on threads that are inside
//! [`catch_panic`]; everywhere else it defers to the previous hook.

use crate::capture::{capture, RawStack};
use crate::error::{Error, ErrorLog};
use crate::signal::Signal;
use std::cell::RefCell;
use std::panic::{self, UnwindSafe};
use std::sync::Once;

/// Frames between the panic runtime and `record`: the hook closure
const HOOK_FRAMES: usize = 1;

static INSTALL_HOOK: Once = Once::new();

struct Armed {
    skip: usize,
    stack: Option<RawStack>,
}

thread_local! {
    static ARMED: RefCell<Vec<Armed>> = const { RefCell::new(Vec::new()) };
}

/// Run `f`, turning a panic into an [`Error`] whose stack starts inside the
/// panic runtime and continues through the panicking function.
///
/// # Errors
///
/// Returns the normalized panic payload when `f` panics.
pub fn catch_panic<F, R>(f: F) -> Result<R, Error>
where
    F: FnOnce() -> R + UnwindSafe,
{
    catch_panic_with_skip(0, f)
}

/// Like [`catch_panic`], leaving out `skip` more innermost frames.
///
/// # Errors
///
/// Returns the normalized panic payload when `f` panics.
pub fn catch_panic_with_skip<F, R>(skip: usize, f: F) -> Result<R, Error>
where
    F: FnOnce() -> R + UnwindSafe,
{
    install_hook();
    ARMED.with(|armed| armed.borrow_mut().push(Armed { skip, stack: None }));

    let outcome = panic::catch_unwind(f);
    let armed = ARMED.with(|armed| armed.borrow_mut().pop());

    match outcome {
        Ok(value) => Ok(value),
        Err(payload) => {
            let err = match armed.and_then(|armed| armed.stack) {
                Some(stack) => Error::with_stack(Signal::from_panic(payload), stack),
                // another hook replaced ours, fall back to this frame
                None => Error::from_panic(payload, 0),
            };
            ErrorLog::log_recovered_panic(&err);
            Err(err)
        }
    }
}

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !record() {
                previous(info);
            }
        }));
    });
}

/// Capture for the innermost armed [`catch_panic`] on this thread
#[inline(never)]
fn record() -> bool {
    let skip = ARMED
        .try_with(|armed| armed.borrow().last().map(|armed| armed.skip))
        .ok()
        .flatten();
    let Some(skip) = skip else {
        return false;
    };

    let stack = capture(HOOK_FRAMES.saturating_add(skip));
    ARMED
        .try_with(|armed| {
            if let Some(armed) = armed.borrow_mut().last_mut() {
                armed.stack = Some(stack);
            }
        })
        .is_ok()
}
