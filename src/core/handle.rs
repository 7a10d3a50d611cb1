//! core::handle
//!
//! The ownership-tagged handle: a native resource pointer plus an
//! explicit [`Ownership`] tag. Every wrapped entity type in the crate is
//! a specialization of this one wrapper.
//!
//! # Ownership
//!
//! Constructing a handle from a raw pointer requires the caller to state
//! the tag explicitly - there is no default inferred from pointer
//! provenance. An [`Ownership::Owned`] handle is the unique releaser of
//! its resource: release happens exactly once, on drop or when the
//! pointer is transferred out with [`Handle::into_parts`]. An
//! [`Ownership::Borrowed`] handle never releases; its resource belongs
//! to a longer-lived owner, and the wrapper types built on borrowed
//! handles carry a lifetime parameter so the borrow cannot outlive that
//! owner.
//!
//! # Moves and copies
//!
//! Handles are move-only. A moved-from handle does not exist anymore in
//! Rust, and [`Handle::into_parts`] leaves an explicit null, inert state
//! behind, so arbitrary transfer chains still release exactly once.
//! Copying exists only where the engine exposes an explicit duplicate
//! operation: [`Handle::try_clone`] is available iff the resource type
//! implements [`Duplicate`] - absence is a compile-time error, not a
//! runtime one.

use libc::c_int;

use crate::core::error::{check, Error};

/// Whether a wrapper is the unique releaser of its native resource.
///
/// Every constructor in the crate that accepts a raw engine pointer
/// takes one of these explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// This wrapper releases the resource exactly once when dropped.
    Owned,
    /// The resource belongs to a longer-lived owner; this wrapper never
    /// releases it.
    Borrowed,
}

/// A native resource type with an engine release operation.
///
/// # Safety
///
/// `release` must be the engine's release call for this resource family,
/// and must be safe to call exactly once on a pointer previously handed
/// out by the engine.
pub(crate) unsafe trait Release {
    /// Release one resource. Called only on non-null, owned pointers.
    unsafe fn release(ptr: *mut Self);
}

/// A native resource type with an explicit engine duplicate operation.
///
/// # Safety
///
/// `duplicate` must be the engine's duplicate call for this resource
/// family, writing a fresh, independently-releasable pointer to `out` on
/// success and returning a status code.
pub(crate) unsafe trait Duplicate: Release {
    /// Duplicate the resource, writing the copy to `out`.
    unsafe fn duplicate(out: *mut *mut Self, ptr: *mut Self) -> c_int;
}

/// A native resource pointer tagged with its ownership.
pub(crate) struct Handle<T: Release> {
    ptr: *mut T,
    ownership: Ownership,
}

impl<T: Release> Handle<T> {
    /// Wrap a raw resource pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live pointer handed out by the engine for
    /// this resource family, and `ownership` must faithfully state
    /// whether this wrapper is the unique releaser.
    pub(crate) unsafe fn from_raw(ptr: *mut T, ownership: Ownership) -> Handle<T> {
        Handle { ptr, ownership }
    }

    /// The inert state: null pointer, nothing to release.
    pub(crate) fn null() -> Handle<T> {
        Handle {
            ptr: std::ptr::null_mut(),
            ownership: Ownership::Borrowed,
        }
    }

    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr
    }

    pub(crate) fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    #[allow(dead_code)]
    pub(crate) fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Transfer the pointer and tag out, leaving this handle null and
    /// inert. The caller inherits the release responsibility the tag
    /// describes.
    pub(crate) fn into_parts(mut self) -> (*mut T, Ownership) {
        let ptr = std::mem::replace(&mut self.ptr, std::ptr::null_mut());
        (ptr, self.ownership)
    }

    /// Copy the resource through the engine's duplicate operation,
    /// producing a new owned handle. A null handle clones to null.
    pub(crate) fn try_clone(&self) -> Result<Handle<T>, Error>
    where
        T: Duplicate,
    {
        if self.ptr.is_null() {
            return Ok(Handle::null());
        }
        let mut out = std::ptr::null_mut();
        unsafe {
            check(T::duplicate(&mut out, self.ptr))?;
            Ok(Handle::from_raw(out, Ownership::Owned))
        }
    }
}

impl<T: Release> Drop for Handle<T> {
    fn drop(&mut self) {
        if self.ownership == Ownership::Owned && !self.ptr.is_null() {
            unsafe { T::release(self.ptr) }
        }
    }
}

impl<T: Release> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("ptr", &self.ptr)
            .field("ownership", &self.ownership)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Probe resource counting its own releases in the pointee, so each
    /// test observes an isolated count.
    struct Probe {
        releases: Cell<usize>,
    }

    impl Probe {
        fn new() -> Probe {
            Probe {
                releases: Cell::new(0),
            }
        }
    }

    unsafe impl Release for Probe {
        unsafe fn release(ptr: *mut Probe) {
            let probe = &*ptr;
            probe.releases.set(probe.releases.get() + 1);
        }
    }

    unsafe impl Duplicate for Probe {
        unsafe fn duplicate(out: *mut *mut Probe, ptr: *mut Probe) -> c_int {
            // Alias the original so both handles report into one counter.
            *out = ptr;
            0
        }
    }

    mod owned {
        use super::*;

        #[test]
        fn releases_exactly_once() {
            let mut probe = Probe::new();
            {
                let handle = unsafe { Handle::from_raw(&mut probe, Ownership::Owned) };
                drop(handle);
            }
            assert_eq!(probe.releases.get(), 1);
        }

        #[test]
        fn releases_once_after_move_chain() {
            let mut probe = Probe::new();
            {
                let a = unsafe { Handle::from_raw(&mut probe, Ownership::Owned) };
                let b = a;
                let c = returned(b);
                let mut slot = Vec::new();
                slot.push(c);
                drop(slot);
            }
            assert_eq!(probe.releases.get(), 1);
        }

        fn returned(handle: Handle<Probe>) -> Handle<Probe> {
            handle
        }

        #[test]
        fn transfer_out_neutralizes_source() {
            let mut probe = Probe::new();
            let handle = unsafe { Handle::from_raw(&mut probe, Ownership::Owned) };
            let (ptr, ownership) = handle.into_parts();
            assert_eq!(ownership, Ownership::Owned);
            assert!(!ptr.is_null());
            // The source handle was dropped inside into_parts with a null
            // pointer: no release happened.
            assert_eq!(probe.releases.get(), 0);
            unsafe { Probe::release(ptr) };
            assert_eq!(probe.releases.get(), 1);
        }

        #[test]
        fn releases_during_unwind() {
            // A visitor failing mid-enumeration drops the cursor's owned
            // handle while unwinding; the release must still happen.
            let mut probe = Probe::new();
            let ptr: *mut Probe = &mut probe;
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _handle = unsafe { Handle::from_raw(ptr, Ownership::Owned) };
                panic!("visitor failed");
            }));
            assert!(result.is_err());
            assert_eq!(probe.releases.get(), 1);
        }

        #[test]
        fn null_owned_is_inert() {
            let handle =
                unsafe { Handle::<Probe>::from_raw(std::ptr::null_mut(), Ownership::Owned) };
            drop(handle);
            // No fault, no release: nothing to observe beyond "did not crash".
        }
    }

    mod borrowed {
        use super::*;

        #[test]
        fn never_releases() {
            let mut probe = Probe::new();
            {
                let handle = unsafe { Handle::from_raw(&mut probe, Ownership::Borrowed) };
                drop(handle);
            }
            assert_eq!(probe.releases.get(), 0);
        }

        #[test]
        fn never_releases_on_unwind() {
            let mut probe = Probe::new();
            let ptr: *mut Probe = &mut probe;
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _handle = unsafe { Handle::from_raw(ptr, Ownership::Borrowed) };
                panic!("visitor failed");
            }));
            assert!(result.is_err());
            assert_eq!(probe.releases.get(), 0);
        }
    }

    mod duplicate {
        use super::*;

        #[test]
        fn copy_is_owned_and_both_release() {
            let mut probe = Probe::new();
            {
                let original = unsafe { Handle::from_raw(&mut probe, Ownership::Owned) };
                let copy = original.try_clone().unwrap();
                assert_eq!(copy.ownership(), Ownership::Owned);
                drop(copy);
                drop(original);
            }
            assert_eq!(probe.releases.get(), 2);
        }

        #[test]
        fn copy_of_borrowed_is_still_owned() {
            let mut probe = Probe::new();
            {
                let borrowed = unsafe { Handle::from_raw(&mut probe, Ownership::Borrowed) };
                let copy = borrowed.try_clone().unwrap();
                drop(borrowed);
                assert_eq!(probe.releases.get(), 0);
                drop(copy);
            }
            assert_eq!(probe.releases.get(), 1);
        }

        #[test]
        fn null_clones_to_null() {
            let handle = Handle::<Probe>::null();
            let copy = handle.try_clone().unwrap();
            assert!(copy.is_null());
        }
    }
}
