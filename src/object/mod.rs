//! object
//!
//! Git objects: the type-erased [`Object`] and its four concrete kinds.
//!
//! The engine represents blobs, commits, trees and tags behind one
//! native resource type, discriminated by a runtime type code. This
//! module surfaces that as [`ObjectKind`] plus explicit, fallible
//! downcasts: converting to the wrong kind raises a typed invalid-input
//! failure, never an unchecked cast.

mod blob;
mod commit;
mod tag;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tag::Tag;
pub use tree::{Tree, TreeEntry, TreeWalkMode};

use std::marker::PhantomData;

use crate::core::buffer::Buf;
use crate::core::error::{check, Error, ErrorClass, ErrorCode};
use crate::core::handle::{Handle, Ownership, Release};
use crate::oid::Oid;
use crate::raw;
use crate::repo::Repository;

unsafe impl Release for raw::git_object {
    unsafe fn release(ptr: *mut raw::git_object) {
        raw::git_object_free(ptr)
    }
}

/// The concrete kind of a git object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A commit.
    Commit,
    /// A tree.
    Tree,
    /// A blob.
    Blob,
    /// An annotated tag.
    Tag,
}

impl ObjectKind {
    pub(crate) fn from_raw(kind: raw::git_object_t) -> Option<ObjectKind> {
        match kind {
            raw::GIT_OBJECT_COMMIT => Some(ObjectKind::Commit),
            raw::GIT_OBJECT_TREE => Some(ObjectKind::Tree),
            raw::GIT_OBJECT_BLOB => Some(ObjectKind::Blob),
            raw::GIT_OBJECT_TAG => Some(ObjectKind::Tag),
            _ => None,
        }
    }

    pub(crate) fn raw(self) -> raw::git_object_t {
        match self {
            ObjectKind::Commit => raw::GIT_OBJECT_COMMIT,
            ObjectKind::Tree => raw::GIT_OBJECT_TREE,
            ObjectKind::Blob => raw::GIT_OBJECT_BLOB,
            ObjectKind::Tag => raw::GIT_OBJECT_TAG,
        }
    }

    /// The object kind's canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Commit => "commit",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
            ObjectKind::Tag => "tag",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type-erased git object borrowed from a repository.
pub struct Object<'repo> {
    handle: Handle<raw::git_object>,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> Object<'repo> {
    pub(crate) unsafe fn from_raw(ptr: *mut raw::git_object, ownership: Ownership) -> Object<'repo> {
        Object {
            handle: Handle::from_raw(ptr, ownership),
            _marker: PhantomData,
        }
    }

    /// The object's id.
    pub fn id(&self) -> Oid {
        unsafe { Oid::from_raw(raw::git_object_id(self.handle.as_ptr())) }
    }

    /// The object's runtime kind, if the engine reports a known one.
    pub fn kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_raw(unsafe { raw::git_object_type(self.handle.as_ptr()) })
    }

    /// The shortest unambiguous hex abbreviation of the id.
    pub fn short_id(&self) -> Result<Buf, Error> {
        let mut buf = Buf::new()?;
        unsafe {
            check(raw::git_object_short_id(buf.raw_mut(), self.handle.as_ptr()))?;
        }
        Ok(buf)
    }

    /// Peel recursively until an object of `target` kind is reached.
    pub fn peel(&self, target: ObjectKind) -> Result<Object<'repo>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_object_peel(
                &mut ptr,
                self.handle.as_ptr(),
                target.raw(),
            ))?;
            Ok(Object::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Downcast into a commit.
    ///
    /// # Errors
    ///
    /// Raises a typed invalid failure when the object is another kind.
    pub fn into_commit(self) -> Result<Commit<'repo>, Error> {
        match self.kind() {
            Some(ObjectKind::Commit) => {
                let (ptr, ownership) = self.handle.into_parts();
                Ok(unsafe { Commit::from_raw(ptr as *mut raw::git_commit, ownership) })
            }
            _ => Err(kind_mismatch(ObjectKind::Commit)),
        }
    }

    /// Downcast into a tree.
    ///
    /// # Errors
    ///
    /// Raises a typed invalid failure when the object is another kind.
    pub fn into_tree(self) -> Result<Tree<'repo>, Error> {
        match self.kind() {
            Some(ObjectKind::Tree) => {
                let (ptr, ownership) = self.handle.into_parts();
                Ok(unsafe { Tree::from_raw(ptr as *mut raw::git_tree, ownership) })
            }
            _ => Err(kind_mismatch(ObjectKind::Tree)),
        }
    }

    /// Downcast into a blob.
    ///
    /// # Errors
    ///
    /// Raises a typed invalid failure when the object is another kind.
    pub fn into_blob(self) -> Result<Blob<'repo>, Error> {
        match self.kind() {
            Some(ObjectKind::Blob) => {
                let (ptr, ownership) = self.handle.into_parts();
                Ok(unsafe { Blob::from_raw(ptr as *mut raw::git_blob, ownership) })
            }
            _ => Err(kind_mismatch(ObjectKind::Blob)),
        }
    }

    /// Downcast into an annotated tag.
    ///
    /// # Errors
    ///
    /// Raises a typed invalid failure when the object is another kind.
    pub fn into_tag(self) -> Result<Tag<'repo>, Error> {
        match self.kind() {
            Some(ObjectKind::Tag) => {
                let (ptr, ownership) = self.handle.into_parts();
                Ok(unsafe { Tag::from_raw(ptr as *mut raw::git_tag, ownership) })
            }
            _ => Err(kind_mismatch(ObjectKind::Tag)),
        }
    }
}

fn kind_mismatch(wanted: ObjectKind) -> Error {
    Error::new(
        ErrorCode::Invalid,
        ErrorClass::Invalid,
        format!("object is not a {}", wanted),
    )
}

impl std::fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .finish()
    }
}
