//! core::engine
//!
//! Process-wide engine init/shutdown lifecycle.
//!
//! The engine requires one initialization call before any other
//! operation and one shutdown call after the last handle is released.
//! Both are reference counted here, behind a single synchronization
//! point, exactly once per process - no matter how many wrapper types
//! are instantiated, and never re-entering initialization while the
//! engine is already up.
//!
//! Every wrapper that owns a native resource whose release must be able
//! to reach the engine (repositories, indexes, owned signatures, byte
//! buffers) holds an [`Engine`] guard. Cloning a guard only increments
//! the count; dropping the last guard tears the engine down.

use std::sync::Mutex;

use tracing::debug;

use crate::core::error::{check, Error};
use crate::raw;

static ENGINE_REFS: Mutex<usize> = Mutex::new(0);

/// A reference-counted guard over the engine's global state.
///
/// The first acquisition initializes the engine; the last drop shuts it
/// down. Acquiring while already initialized only increments the count.
pub struct Engine {
    _priv: (),
}

impl Engine {
    /// Acquire a guard, initializing the engine if this is the first
    /// holder in the process.
    pub fn acquire() -> Result<Engine, Error> {
        let mut refs = lock_refs();
        if *refs == 0 {
            check(unsafe { raw::git_libgit2_init() })?;
            debug!("engine initialized");
        }
        *refs += 1;
        Ok(Engine { _priv: () })
    }

    /// The engine's version as a `(major, minor, patch)` triple.
    pub fn version() -> Result<(i32, i32, i32), Error> {
        let _guard = Engine::acquire()?;
        let mut major = 0;
        let mut minor = 0;
        let mut patch = 0;
        check(unsafe { raw::git_libgit2_version(&mut major, &mut minor, &mut patch) })?;
        Ok((major, minor, patch))
    }

    /// Number of live guards in the process. Useful when chasing a
    /// wrapper that is kept alive longer than intended.
    pub fn active_guards() -> usize {
        *lock_refs()
    }
}

fn lock_refs() -> std::sync::MutexGuard<'static, usize> {
    // The guarded value is a plain counter; a panic while holding the
    // lock cannot leave it inconsistent.
    ENGINE_REFS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Clone for Engine {
    fn clone(&self) -> Engine {
        let mut refs = lock_refs();
        *refs += 1;
        Engine { _priv: () }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let mut refs = lock_refs();
        *refs -= 1;
        if *refs == 0 {
            unsafe {
                raw::git_libgit2_shutdown();
            }
            debug!("engine shut down");
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish()
    }
}
