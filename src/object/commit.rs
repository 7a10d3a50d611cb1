//! object::commit

use std::ffi::CStr;
use std::marker::PhantomData;

use libc::c_uint;

use crate::core::error::{check, Error};
use crate::core::handle::{Handle, Ownership, Release};
use crate::object::Tree;
use crate::oid::Oid;
use crate::raw;
use crate::repo::Repository;
use crate::signature::{Signature, Time};

unsafe impl Release for raw::git_commit {
    unsafe fn release(ptr: *mut raw::git_commit) {
        raw::git_commit_free(ptr)
    }
}

/// A commit.
pub struct Commit<'repo> {
    handle: Handle<raw::git_commit>,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> Commit<'repo> {
    pub(crate) unsafe fn from_raw(
        ptr: *mut raw::git_commit,
        ownership: Ownership,
    ) -> Commit<'repo> {
        Commit {
            handle: Handle::from_raw(ptr, ownership),
            _marker: PhantomData,
        }
    }

    /// The commit's id.
    pub fn id(&self) -> Oid {
        unsafe { Oid::from_raw(raw::git_commit_id(self.handle.as_ptr())) }
    }

    /// The full message, if valid UTF-8.
    pub fn message(&self) -> Option<&str> {
        std::str::from_utf8(self.message_bytes()).ok()
    }

    /// The full message as raw bytes.
    pub fn message_bytes(&self) -> &[u8] {
        unsafe { CStr::from_ptr(raw::git_commit_message(self.handle.as_ptr())).to_bytes() }
    }

    /// The first paragraph of the message, collapsed to a single line.
    pub fn summary(&self) -> Option<&str> {
        unsafe {
            let ptr = raw::git_commit_summary(self.handle.as_ptr());
            if ptr.is_null() {
                None
            } else {
                std::str::from_utf8(CStr::from_ptr(ptr).to_bytes()).ok()
            }
        }
    }

    /// The author identity, borrowed from this commit.
    pub fn author(&self) -> Signature<'_> {
        unsafe { Signature::from_raw_borrowed(raw::git_commit_author(self.handle.as_ptr())) }
    }

    /// The committer identity, borrowed from this commit.
    pub fn committer(&self) -> Signature<'_> {
        unsafe { Signature::from_raw_borrowed(raw::git_commit_committer(self.handle.as_ptr())) }
    }

    /// The commit time (committer time).
    pub fn time(&self) -> Time {
        unsafe {
            Time::new(
                raw::git_commit_time(self.handle.as_ptr()),
                raw::git_commit_time_offset(self.handle.as_ptr()),
            )
        }
    }

    /// The tree this commit points to.
    pub fn tree(&self) -> Result<Tree<'repo>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_commit_tree(&mut ptr, self.handle.as_ptr()))?;
            Ok(Tree::from_raw(ptr, Ownership::Owned))
        }
    }

    /// The id of the tree this commit points to.
    pub fn tree_id(&self) -> Oid {
        unsafe { Oid::from_raw(raw::git_commit_tree_id(self.handle.as_ptr())) }
    }

    /// Number of parents.
    pub fn parent_count(&self) -> usize {
        unsafe { raw::git_commit_parentcount(self.handle.as_ptr()) as usize }
    }

    /// The `n`th parent commit.
    pub fn parent(&self, n: usize) -> Result<Commit<'repo>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_commit_parent(
                &mut ptr,
                self.handle.as_ptr(),
                n as c_uint,
            ))?;
            Ok(Commit::from_raw(ptr, Ownership::Owned))
        }
    }

    /// The `n`th parent's id, if in range.
    pub fn parent_id(&self, n: usize) -> Option<Oid> {
        unsafe {
            let ptr = raw::git_commit_parent_id(self.handle.as_ptr(), n as c_uint);
            if ptr.is_null() {
                None
            } else {
                Some(Oid::from_raw(ptr))
            }
        }
    }

    pub(crate) fn raw_const(&self) -> *const raw::git_commit {
        self.handle.as_ptr()
    }
}

impl std::fmt::Debug for Commit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commit")
            .field("id", &self.id())
            .field("summary", &self.summary())
            .finish()
    }
}
