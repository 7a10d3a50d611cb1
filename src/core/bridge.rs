//! core::bridge
//!
//! Adapts the engine's two enumeration conventions to closures.
//!
//! # One-shot callbacks
//!
//! The engine invokes a fixed-signature trampoline once per element,
//! passing back an opaque payload pointer. [`CallbackState`] is the
//! stack-allocated context: it holds the caller's closure plus a slot
//! for a captured panic, and its address is the payload. Each call site
//! defines its own `extern "C"` trampoline (argument shapes differ per
//! operation) that recovers the state with [`CallbackState::from_payload`]
//! and runs the closure through [`CallbackState::invoke`].
//!
//! A panic raised inside the closure must not unwind across the foreign
//! frame: `invoke` catches it, stows the payload, and returns [`HALT`] so
//! the engine stops enumerating. [`CallbackState::finish`] re-raises the
//! panic once control is back in a Rust frame, and otherwise maps the
//! final status - the engine does not distinguish "caller asked to stop"
//! from "callback failed", so a halt surfaces as plain completion.
//!
//! # Cursor resources
//!
//! Iterator-style enumerations return a cursor advanced by repeated
//! calls until the end-of-iteration sentinel. [`step`] maps one advance
//! status onto the three cursor outcomes: element ready, finished, or
//! failed. The iterator types built on it hold the cursor in an owned
//! [`Handle`](crate::core::handle::Handle), so release is guaranteed on
//! every exit path, including an error returned from the middle of a
//! visitor loop.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use libc::{c_int, c_void};

use crate::core::error::{check, Error};
use crate::raw;

/// Trampoline return value that halts enumeration.
pub(crate) const HALT: c_int = raw::GIT_EUSER;

/// Stack-allocated context passed to the engine as the opaque payload.
pub(crate) struct CallbackState<F> {
    callback: F,
    panic: Option<Box<dyn Any + Send>>,
}

impl<F> CallbackState<F> {
    pub(crate) fn new(callback: F) -> CallbackState<F> {
        CallbackState {
            callback,
            panic: None,
        }
    }

    /// The opaque payload handed to the engine.
    pub(crate) fn payload(&mut self) -> *mut c_void {
        self as *mut CallbackState<F> as *mut c_void
    }

    /// Recover the context from the payload inside a trampoline.
    ///
    /// # Safety
    ///
    /// `payload` must be the pointer produced by [`CallbackState::payload`]
    /// on a state that is still alive in the calling frame.
    pub(crate) unsafe fn from_payload<'a>(payload: *mut c_void) -> &'a mut CallbackState<F> {
        &mut *(payload as *mut CallbackState<F>)
    }

    /// Run one visitor invocation, translating a panic into [`HALT`].
    pub(crate) fn invoke(&mut self, call: impl FnOnce(&mut F) -> c_int) -> c_int {
        // Already panicked on a previous element: keep halting until the
        // native call returns.
        if self.panic.is_some() {
            return HALT;
        }
        match panic::catch_unwind(AssertUnwindSafe(|| call(&mut self.callback))) {
            Ok(code) => code,
            Err(payload) => {
                self.panic = Some(payload);
                HALT
            }
        }
    }

    /// Finish the enumeration: re-raise a captured panic now that the
    /// native frame has returned, otherwise translate the final status.
    ///
    /// A [`HALT`] status is the bridge's own stop signal echoed back by
    /// the engine and surfaces as success.
    pub(crate) fn finish(mut self, code: c_int) -> Result<(), Error> {
        if let Some(payload) = self.panic.take() {
            panic::resume_unwind(payload);
        }
        match code {
            0 | HALT => Ok(()),
            other => check(other).map(|_| ()),
        }
    }
}

/// Map one cursor advance status onto the enumeration state machine.
///
/// `Some(Ok(()))` means an element is ready, `None` means the sentinel
/// was observed and the enumeration is finished, `Some(Err(_))` means it
/// failed. The sentinel is consumed here; callers never see it as an
/// error.
pub(crate) fn step(code: c_int) -> Option<Result<(), Error>> {
    match code {
        c if c >= 0 => Some(Ok(())),
        raw::GIT_ITEROVER => None,
        c => Some(Err(Error::last(c))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorCode;

    mod one_shot {
        use super::*;

        #[test]
        fn closure_output_is_forwarded() {
            let mut state = CallbackState::new(|n: i32| n * 2);
            let code = state.invoke(|callback| callback(21));
            assert_eq!(code, 42);
            assert!(state.finish(0).is_ok());
        }

        #[test]
        fn halt_surfaces_as_completion() {
            let state = CallbackState::new(());
            assert!(state.finish(HALT).is_ok());
        }

        #[test]
        fn genuine_failure_still_raises() {
            let state = CallbackState::new(());
            let err = state.finish(raw::GIT_ELOCKED).unwrap_err();
            assert_eq!(err.code(), ErrorCode::Locked);
        }

        #[test]
        fn panic_is_stowed_and_resumed() {
            let mut state = CallbackState::new(());
            let code = state.invoke(|_| panic!("visitor failed"));
            assert_eq!(code, HALT);

            // Further invocations keep halting instead of re-entering the
            // closure.
            let code = state.invoke(|_| 0);
            assert_eq!(code, HALT);

            let result = std::panic::catch_unwind(AssertUnwindSafe(|| state.finish(HALT)));
            assert!(result.is_err());
        }
    }

    mod cursor {
        use super::*;

        #[test]
        fn element_ready() {
            assert!(matches!(step(0), Some(Ok(()))));
        }

        #[test]
        fn sentinel_is_consumed() {
            assert!(step(raw::GIT_ITEROVER).is_none());
        }

        #[test]
        fn other_negative_fails() {
            let outcome = step(raw::GIT_ENOTFOUND);
            match outcome {
                Some(Err(err)) => assert_eq!(err.code(), ErrorCode::NotFound),
                _ => panic!("expected failure"),
            }
        }
    }
}
