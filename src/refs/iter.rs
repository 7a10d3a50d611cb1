//! refs::iter
//!
//! Cursor-backed enumeration of references and branches.
//!
//! Both iterators own their engine cursor through the handle layer, so
//! the cursor is released on every exit path - normal exhaustion, an
//! error surfaced mid-loop, or the caller dropping the iterator early.
//! Entering a terminal state (finished or failed) releases the cursor
//! immediately rather than waiting for drop.

use std::ffi::CStr;
use std::marker::PhantomData;

use crate::core::bridge::step;
use crate::core::error::{check, Error};
use crate::core::handle::{Handle, Ownership, Release};
use crate::raw;
use crate::refs::Reference;
use crate::repo::Repository;

unsafe impl Release for raw::git_reference_iterator {
    unsafe fn release(ptr: *mut raw::git_reference_iterator) {
        raw::git_reference_iterator_free(ptr)
    }
}

unsafe impl Release for raw::git_branch_iterator {
    unsafe fn release(ptr: *mut raw::git_branch_iterator) {
        raw::git_branch_iterator_free(ptr)
    }
}

/// Iterator over the references of a repository.
///
/// Yields each reference as an owned value; the engine may reuse cursor
/// storage on advance, so nothing borrowed from the cursor survives past
/// one step.
pub struct References<'repo> {
    cursor: Handle<raw::git_reference_iterator>,
    done: bool,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> References<'repo> {
    pub(crate) unsafe fn from_raw(ptr: *mut raw::git_reference_iterator) -> References<'repo> {
        References {
            cursor: Handle::from_raw(ptr, Ownership::Owned),
            done: false,
            _marker: PhantomData,
        }
    }

    /// Release the cursor on entry to a terminal state.
    fn finish(&mut self) {
        self.done = true;
        self.cursor = Handle::null();
    }
}

impl<'repo> Iterator for References<'repo> {
    type Item = Result<Reference<'repo>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut ptr = std::ptr::null_mut();
        match step(unsafe { raw::git_reference_next(&mut ptr, self.cursor.as_ptr()) }) {
            Some(Ok(())) => Some(Ok(unsafe { Reference::from_raw(ptr, Ownership::Owned) })),
            Some(Err(err)) => {
                self.finish();
                Some(Err(err))
            }
            None => {
                self.finish();
                None
            }
        }
    }
}

/// Which branch namespaces to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    /// Local branches.
    Local,
    /// Remote-tracking branches.
    Remote,
}

impl BranchKind {
    pub(crate) fn from_raw(kind: raw::git_branch_t) -> BranchKind {
        if kind == raw::GIT_BRANCH_REMOTE {
            BranchKind::Remote
        } else {
            BranchKind::Local
        }
    }

    pub(crate) fn raw_filter(filter: Option<BranchKind>) -> raw::git_branch_t {
        match filter {
            Some(BranchKind::Local) => raw::GIT_BRANCH_LOCAL,
            Some(BranchKind::Remote) => raw::GIT_BRANCH_REMOTE,
            None => raw::GIT_BRANCH_ALL,
        }
    }
}

/// A branch: a reference in one of the branch namespaces.
pub struct Branch<'repo> {
    reference: Reference<'repo>,
}

impl<'repo> Branch<'repo> {
    pub(crate) fn wrap(reference: Reference<'repo>) -> Branch<'repo> {
        Branch { reference }
    }

    /// The branch name with the namespace prefix stripped.
    pub fn name(&self) -> Result<Option<&str>, Error> {
        let mut ptr = std::ptr::null();
        unsafe {
            check(raw::git_branch_name(&mut ptr, self.reference.raw()))?;
            if ptr.is_null() {
                Ok(None)
            } else {
                Ok(std::str::from_utf8(CStr::from_ptr(ptr).to_bytes()).ok())
            }
        }
    }

    /// The underlying reference.
    pub fn reference(&self) -> &Reference<'repo> {
        &self.reference
    }

    /// Unwrap into the underlying reference.
    pub fn into_reference(self) -> Reference<'repo> {
        self.reference
    }
}

impl std::fmt::Debug for Branch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Branch")
            .field("reference", &self.reference)
            .finish()
    }
}

/// Iterator over the branches of a repository.
pub struct Branches<'repo> {
    cursor: Handle<raw::git_branch_iterator>,
    done: bool,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> Branches<'repo> {
    pub(crate) unsafe fn from_raw(ptr: *mut raw::git_branch_iterator) -> Branches<'repo> {
        Branches {
            cursor: Handle::from_raw(ptr, Ownership::Owned),
            done: false,
            _marker: PhantomData,
        }
    }

    fn finish(&mut self) {
        self.done = true;
        self.cursor = Handle::null();
    }
}

impl<'repo> Iterator for Branches<'repo> {
    type Item = Result<(Branch<'repo>, BranchKind), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut ptr = std::ptr::null_mut();
        let mut kind = raw::GIT_BRANCH_ALL;
        match step(unsafe { raw::git_branch_next(&mut ptr, &mut kind, self.cursor.as_ptr()) }) {
            Some(Ok(())) => {
                let branch =
                    Branch::wrap(unsafe { Reference::from_raw(ptr, Ownership::Owned) });
                Some(Ok((branch, BranchKind::from_raw(kind))))
            }
            Some(Err(err)) => {
                self.finish();
                Some(Err(err))
            }
            None => {
                self.finish();
                None
            }
        }
    }
}
