//! object::tag

use std::ffi::CStr;
use std::marker::PhantomData;

use crate::core::error::{check, Error};
use crate::core::handle::{Handle, Ownership, Release};
use crate::object::Object;
use crate::oid::Oid;
use crate::raw;
use crate::repo::Repository;
use crate::signature::Signature;

unsafe impl Release for raw::git_tag {
    unsafe fn release(ptr: *mut raw::git_tag) {
        raw::git_tag_free(ptr)
    }
}

/// An annotated tag.
pub struct Tag<'repo> {
    handle: Handle<raw::git_tag>,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> Tag<'repo> {
    pub(crate) unsafe fn from_raw(ptr: *mut raw::git_tag, ownership: Ownership) -> Tag<'repo> {
        Tag {
            handle: Handle::from_raw(ptr, ownership),
            _marker: PhantomData,
        }
    }

    /// The tag's own id.
    pub fn id(&self) -> Oid {
        unsafe { Oid::from_raw(raw::git_tag_id(self.handle.as_ptr())) }
    }

    /// The tag name, if valid UTF-8.
    pub fn name(&self) -> Option<&str> {
        std::str::from_utf8(self.name_bytes()).ok()
    }

    /// The tag name as raw bytes.
    pub fn name_bytes(&self) -> &[u8] {
        unsafe { CStr::from_ptr(raw::git_tag_name(self.handle.as_ptr())).to_bytes() }
    }

    /// The tag message, if present and valid UTF-8.
    pub fn message(&self) -> Option<&str> {
        unsafe {
            let ptr = raw::git_tag_message(self.handle.as_ptr());
            if ptr.is_null() {
                None
            } else {
                std::str::from_utf8(CStr::from_ptr(ptr).to_bytes()).ok()
            }
        }
    }

    /// The tagger identity, if recorded, borrowed from this tag.
    pub fn tagger(&self) -> Option<Signature<'_>> {
        unsafe {
            let ptr = raw::git_tag_tagger(self.handle.as_ptr());
            if ptr.is_null() {
                None
            } else {
                Some(Signature::from_raw_borrowed(ptr))
            }
        }
    }

    /// The id of the tagged object.
    pub fn target_id(&self) -> Oid {
        unsafe { Oid::from_raw(raw::git_tag_target_id(self.handle.as_ptr())) }
    }

    /// The tagged object.
    pub fn target(&self) -> Result<Object<'repo>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_tag_target(&mut ptr, self.handle.as_ptr()))?;
            Ok(Object::from_raw(ptr, Ownership::Owned))
        }
    }
}

impl std::fmt::Debug for Tag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tag")
            .field("id", &self.id())
            .field("name", &String::from_utf8_lossy(self.name_bytes()))
            .finish()
    }
}
