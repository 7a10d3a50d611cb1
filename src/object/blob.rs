//! object::blob

use std::marker::PhantomData;

use crate::core::handle::{Handle, Ownership, Release};
use crate::oid::Oid;
use crate::raw;
use crate::repo::Repository;

unsafe impl Release for raw::git_blob {
    unsafe fn release(ptr: *mut raw::git_blob) {
        raw::git_blob_free(ptr)
    }
}

/// A blob: raw file content stored in the object database.
pub struct Blob<'repo> {
    handle: Handle<raw::git_blob>,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> Blob<'repo> {
    pub(crate) unsafe fn from_raw(ptr: *mut raw::git_blob, ownership: Ownership) -> Blob<'repo> {
        Blob {
            handle: Handle::from_raw(ptr, ownership),
            _marker: PhantomData,
        }
    }

    /// The blob's id.
    pub fn id(&self) -> Oid {
        unsafe { Oid::from_raw(raw::git_blob_id(self.handle.as_ptr())) }
    }

    /// Content size in bytes.
    pub fn size(&self) -> usize {
        unsafe { raw::git_blob_rawsize(self.handle.as_ptr()) as usize }
    }

    /// The full content, embedded NUL bytes included.
    pub fn content(&self) -> &[u8] {
        unsafe {
            let ptr = raw::git_blob_rawcontent(self.handle.as_ptr());
            if ptr.is_null() {
                &[]
            } else {
                std::slice::from_raw_parts(ptr as *const u8, self.size())
            }
        }
    }

    /// The engine's own binary heuristic over the content.
    pub fn is_binary(&self) -> bool {
        unsafe { raw::git_blob_is_binary(self.handle.as_ptr()) != 0 }
    }
}

impl std::fmt::Debug for Blob<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("id", &self.id())
            .field("size", &self.size())
            .finish()
    }
}
