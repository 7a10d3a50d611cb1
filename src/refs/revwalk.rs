//! refs::revwalk
//!
//! Revision walking.
//!
//! A [`Revwalk`] is a pushable walker resource: roots are pushed, ids
//! are drawn until the end-of-iteration sentinel, and [`Revwalk::reset`]
//! rearms it for another pass. The ordering of the walk is entirely the
//! engine's; this layer only configures it.

use std::ffi::CString;
use std::marker::PhantomData;
use std::ops::BitOr;

use libc::c_uint;

use crate::core::bridge::step;
use crate::core::error::{check, Error};
use crate::core::handle::{Handle, Ownership, Release};
use crate::oid::Oid;
use crate::raw;
use crate::repo::Repository;

unsafe impl Release for raw::git_revwalk {
    unsafe fn release(ptr: *mut raw::git_revwalk) {
        raw::git_revwalk_free(ptr)
    }
}

/// Ordering flags for a revision walk. Combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort(u32);

impl Sort {
    /// The engine's default ordering.
    pub const NONE: Sort = Sort(raw::GIT_SORT_NONE as u32);
    /// Parents after all of their children.
    pub const TOPOLOGICAL: Sort = Sort(raw::GIT_SORT_TOPOLOGICAL as u32);
    /// Commit timestamp order.
    pub const TIME: Sort = Sort(raw::GIT_SORT_TIME as u32);
    /// Reverse of the selected ordering.
    pub const REVERSE: Sort = Sort(raw::GIT_SORT_REVERSE as u32);

    /// Whether every flag in `other` is set.
    pub fn contains(&self, other: Sort) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Sort {
    type Output = Sort;

    fn bitor(self, rhs: Sort) -> Sort {
        Sort(self.0 | rhs.0)
    }
}

impl Default for Sort {
    fn default() -> Sort {
        Sort::NONE
    }
}

/// A revision walker over a repository's commit graph.
pub struct Revwalk<'repo> {
    handle: Handle<raw::git_revwalk>,
    done: bool,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> Revwalk<'repo> {
    pub(crate) unsafe fn from_raw(ptr: *mut raw::git_revwalk) -> Revwalk<'repo> {
        Revwalk {
            handle: Handle::from_raw(ptr, Ownership::Owned),
            done: false,
            _marker: PhantomData,
        }
    }

    /// Add a root commit to the walk.
    pub fn push(&mut self, id: Oid) -> Result<(), Error> {
        check(unsafe { raw::git_revwalk_push(self.handle.as_ptr(), id.raw()) })?;
        Ok(())
    }

    /// Add the repository HEAD as a root.
    pub fn push_head(&mut self) -> Result<(), Error> {
        check(unsafe { raw::git_revwalk_push_head(self.handle.as_ptr()) })?;
        Ok(())
    }

    /// Add every reference matching `glob` as a root.
    pub fn push_glob(&mut self, glob: &str) -> Result<(), Error> {
        let glob = CString::new(glob).map_err(|_| Error::invalid("glob contains a NUL byte"))?;
        check(unsafe { raw::git_revwalk_push_glob(self.handle.as_ptr(), glob.as_ptr()) })?;
        Ok(())
    }

    /// Add a `from..to` range.
    pub fn push_range(&mut self, range: &str) -> Result<(), Error> {
        let range =
            CString::new(range).map_err(|_| Error::invalid("range contains a NUL byte"))?;
        check(unsafe { raw::git_revwalk_push_range(self.handle.as_ptr(), range.as_ptr()) })?;
        Ok(())
    }

    /// Hide a commit and its ancestors from the walk.
    pub fn hide(&mut self, id: Oid) -> Result<(), Error> {
        check(unsafe { raw::git_revwalk_hide(self.handle.as_ptr(), id.raw()) })?;
        Ok(())
    }

    /// Hide HEAD and its ancestors from the walk.
    pub fn hide_head(&mut self) -> Result<(), Error> {
        check(unsafe { raw::git_revwalk_hide_head(self.handle.as_ptr()) })?;
        Ok(())
    }

    /// Select the ordering for the walk.
    pub fn sorting(&mut self, sort: Sort) -> Result<(), Error> {
        check(unsafe { raw::git_revwalk_sorting(self.handle.as_ptr(), sort.0 as c_uint) })?;
        Ok(())
    }

    /// Follow only first parents.
    pub fn simplify_first_parent(&mut self) -> Result<(), Error> {
        check(unsafe { raw::git_revwalk_simplify_first_parent(self.handle.as_ptr()) })?;
        Ok(())
    }

    /// Rearm the walker for another pass.
    pub fn reset(&mut self) -> Result<(), Error> {
        check(unsafe { raw::git_revwalk_reset(self.handle.as_ptr()) })?;
        self.done = false;
        Ok(())
    }
}

impl<'repo> Iterator for Revwalk<'repo> {
    type Item = Result<Oid, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut id = Oid::zero();
        match step(unsafe { raw::git_revwalk_next(id.raw_mut(), self.handle.as_ptr()) }) {
            Some(Ok(())) => Some(Ok(id)),
            Some(Err(err)) => {
                self.done = true;
                Some(Err(err))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl std::fmt::Debug for Revwalk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Revwalk").field("done", &self.done).finish()
    }
}
