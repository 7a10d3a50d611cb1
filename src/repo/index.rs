//! repo::index
//!
//! The repository index (staging area).
//!
//! The engine hands out the index as an independently-released resource,
//! so [`Index`] carries its own engine guard instead of a repository
//! lifetime.

use std::path::Path;

use libc::c_uint;

use crate::core::engine::Engine;
use crate::core::error::{check, Error};
use crate::core::handle::{Handle, Ownership, Release};
use crate::core::strarray::StrArray;
use crate::oid::Oid;
use crate::raw;

unsafe impl Release for raw::git_index {
    unsafe fn release(ptr: *mut raw::git_index) {
        raw::git_index_free(ptr)
    }
}

/// A repository's index.
pub struct Index {
    handle: Handle<raw::git_index>,
    _engine: Engine,
}

impl Index {
    pub(crate) unsafe fn from_raw(ptr: *mut raw::git_index, engine: Engine) -> Index {
        Index {
            handle: Handle::from_raw(ptr, Ownership::Owned),
            _engine: engine,
        }
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        unsafe { raw::git_index_entrycount(self.handle.as_ptr()) as usize }
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-read the index from disk, discarding in-memory changes when
    /// `force` is set.
    pub fn read(&mut self, force: bool) -> Result<(), Error> {
        check(unsafe { raw::git_index_read(self.handle.as_ptr(), force as libc::c_int) })?;
        Ok(())
    }

    /// Stage the file at `path`, relative to the working directory.
    pub fn add_path(&mut self, path: &Path) -> Result<(), Error> {
        let path = super::path_to_cstring(path)?;
        check(unsafe { raw::git_index_add_bypath(self.handle.as_ptr(), path.as_ptr()) })?;
        Ok(())
    }

    /// Stage every working-directory file matching `pathspecs`.
    pub fn add_all(&mut self, pathspecs: &StrArray) -> Result<(), Error> {
        let spec = pathspecs.as_raw();
        check(unsafe {
            raw::git_index_add_all(
                self.handle.as_ptr(),
                &spec,
                raw::GIT_INDEX_ADD_DEFAULT as c_uint,
                None,
                std::ptr::null_mut(),
            )
        })?;
        Ok(())
    }

    /// Write the index back to disk.
    pub fn write(&mut self) -> Result<(), Error> {
        check(unsafe { raw::git_index_write(self.handle.as_ptr()) })?;
        Ok(())
    }

    /// Write the staged content as a tree into the owning repository's
    /// object database, returning the tree id.
    pub fn write_tree(&mut self) -> Result<Oid, Error> {
        let mut id = Oid::zero();
        check(unsafe { raw::git_index_write_tree(id.raw_mut(), self.handle.as_ptr()) })?;
        Ok(id)
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index").field("len", &self.len()).finish()
    }
}
