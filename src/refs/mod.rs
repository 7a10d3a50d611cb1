//! refs
//!
//! References and reference enumeration.
//!
//! [`Reference`] wraps one named pointer into the object graph.
//! Enumeration comes in the engine's cursor shape: [`References`] and
//! [`Branches`] own an iterator resource for the duration of the loop
//! and release it on every exit path, converting the end-of-iteration
//! sentinel into ordinary loop termination.

mod iter;
mod revwalk;

pub use iter::{Branch, BranchKind, Branches, References};
pub use revwalk::{Revwalk, Sort};

use std::ffi::CStr;
use std::marker::PhantomData;

use crate::core::error::{check, Error};
use crate::core::handle::{Handle, Ownership, Release};
use crate::object::{Object, ObjectKind};
use crate::oid::Oid;
use crate::raw;
use crate::repo::Repository;

unsafe impl Release for raw::git_reference {
    unsafe fn release(ptr: *mut raw::git_reference) {
        raw::git_reference_free(ptr)
    }
}

/// Whether a reference points at an id or at another reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Points directly at an object id.
    Direct,
    /// Points at another reference by name.
    Symbolic,
}

/// A named reference into the object graph.
pub struct Reference<'repo> {
    handle: Handle<raw::git_reference>,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> Reference<'repo> {
    pub(crate) unsafe fn from_raw(
        ptr: *mut raw::git_reference,
        ownership: Ownership,
    ) -> Reference<'repo> {
        Reference {
            handle: Handle::from_raw(ptr, ownership),
            _marker: PhantomData,
        }
    }

    /// The full reference name, if valid UTF-8.
    pub fn name(&self) -> Option<&str> {
        std::str::from_utf8(self.name_bytes()).ok()
    }

    /// The full reference name as raw bytes.
    pub fn name_bytes(&self) -> &[u8] {
        unsafe { CStr::from_ptr(raw::git_reference_name(self.handle.as_ptr())).to_bytes() }
    }

    /// The name with well-known prefixes stripped, if valid UTF-8.
    pub fn shorthand(&self) -> Option<&str> {
        unsafe {
            let ptr = raw::git_reference_shorthand(self.handle.as_ptr());
            if ptr.is_null() {
                None
            } else {
                std::str::from_utf8(CStr::from_ptr(ptr).to_bytes()).ok()
            }
        }
    }

    /// Whether the reference lives under the local-branch namespace.
    pub fn is_branch(&self) -> bool {
        unsafe { raw::git_reference_is_branch(self.handle.as_ptr()) != 0 }
    }

    /// Whether the reference lives under the remote-tracking namespace.
    pub fn is_remote(&self) -> bool {
        unsafe { raw::git_reference_is_remote(self.handle.as_ptr()) != 0 }
    }

    /// Whether the reference lives under the tag namespace.
    pub fn is_tag(&self) -> bool {
        unsafe { raw::git_reference_is_tag(self.handle.as_ptr()) != 0 }
    }

    /// Whether the reference lives under the notes namespace.
    pub fn is_note(&self) -> bool {
        unsafe { raw::git_reference_is_note(self.handle.as_ptr()) != 0 }
    }

    /// Direct or symbolic.
    pub fn kind(&self) -> ReferenceKind {
        if self.symbolic_target_bytes().is_some() {
            ReferenceKind::Symbolic
        } else {
            ReferenceKind::Direct
        }
    }

    /// The id a direct reference points at.
    pub fn target(&self) -> Option<Oid> {
        unsafe {
            let ptr = raw::git_reference_target(self.handle.as_ptr());
            if ptr.is_null() {
                None
            } else {
                Some(Oid::from_raw(ptr))
            }
        }
    }

    /// The name a symbolic reference points at, if valid UTF-8.
    pub fn symbolic_target(&self) -> Option<&str> {
        std::str::from_utf8(self.symbolic_target_bytes()?).ok()
    }

    fn symbolic_target_bytes(&self) -> Option<&[u8]> {
        unsafe {
            let ptr = raw::git_reference_symbolic_target(self.handle.as_ptr());
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr).to_bytes())
            }
        }
    }

    /// Follow symbolic links until a direct reference is reached.
    pub fn resolve(&self) -> Result<Reference<'repo>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_reference_resolve(&mut ptr, self.handle.as_ptr()))?;
            Ok(Reference::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Peel the reference until an object of `target` kind is reached.
    pub fn peel(&self, target: ObjectKind) -> Result<Object<'repo>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_reference_peel(
                &mut ptr,
                self.handle.as_ptr(),
                target.raw(),
            ))?;
            Ok(Object::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Delete the reference from the repository.
    ///
    /// The wrapper keeps ownership of the now-dangling handle and still
    /// releases it on drop.
    pub fn delete(&mut self) -> Result<(), Error> {
        unsafe {
            check(raw::git_reference_delete(self.handle.as_ptr()))?;
        }
        Ok(())
    }

    pub(crate) fn raw(&self) -> *mut raw::git_reference {
        self.handle.as_ptr()
    }
}

impl std::fmt::Debug for Reference<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reference")
            .field("name", &String::from_utf8_lossy(self.name_bytes()))
            .field("kind", &self.kind())
            .finish()
    }
}
