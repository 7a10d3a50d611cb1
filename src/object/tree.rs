//! object::tree
//!
//! Trees and tree entries.
//!
//! Entries looked up by index or name are transient, borrowed views into
//! the tree's own storage; entries looked up by path (and duplicates)
//! are independently owned and released here. [`Tree::walk`] runs the
//! engine's recursive traversal through the callback bridge.

use std::ffi::{CStr, CString};
use std::marker::PhantomData;

use libc::{c_char, c_int, c_void};

use crate::core::bridge::{CallbackState, HALT};
use crate::core::error::{check, Error};
use crate::core::handle::{Duplicate, Handle, Ownership, Release};
use crate::object::{Object, ObjectKind};
use crate::oid::Oid;
use crate::raw;
use crate::repo::Repository;

unsafe impl Release for raw::git_tree {
    unsafe fn release(ptr: *mut raw::git_tree) {
        raw::git_tree_free(ptr)
    }
}

unsafe impl Release for raw::git_tree_entry {
    unsafe fn release(ptr: *mut raw::git_tree_entry) {
        raw::git_tree_entry_free(ptr)
    }
}

unsafe impl Duplicate for raw::git_tree_entry {
    unsafe fn duplicate(
        out: *mut *mut raw::git_tree_entry,
        ptr: *mut raw::git_tree_entry,
    ) -> c_int {
        raw::git_tree_entry_dup(out, ptr)
    }
}

/// Traversal order for [`Tree::walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeWalkMode {
    /// Parents before children.
    PreOrder,
    /// Children before parents.
    PostOrder,
}

impl TreeWalkMode {
    fn raw(self) -> raw::git_treewalk_mode {
        match self {
            TreeWalkMode::PreOrder => raw::GIT_TREEWALK_PRE,
            TreeWalkMode::PostOrder => raw::GIT_TREEWALK_POST,
        }
    }
}

/// A tree: one level of the directory structure.
pub struct Tree<'repo> {
    handle: Handle<raw::git_tree>,
    _marker: PhantomData<&'repo Repository>,
}

impl<'repo> Tree<'repo> {
    pub(crate) unsafe fn from_raw(ptr: *mut raw::git_tree, ownership: Ownership) -> Tree<'repo> {
        Tree {
            handle: Handle::from_raw(ptr, ownership),
            _marker: PhantomData,
        }
    }

    pub(crate) fn raw_const(&self) -> *const raw::git_tree {
        self.handle.as_ptr()
    }

    /// The tree's id.
    pub fn id(&self) -> Oid {
        unsafe { Oid::from_raw(raw::git_tree_id(self.handle.as_ptr())) }
    }

    /// Number of entries at this level.
    pub fn len(&self) -> usize {
        unsafe { raw::git_tree_entrycount(self.handle.as_ptr()) }
    }

    /// Whether this level has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The entry at `index`, borrowed from the tree.
    pub fn get(&self, index: usize) -> Option<TreeEntry<'_>> {
        unsafe {
            let ptr = raw::git_tree_entry_byindex(self.handle.as_ptr(), index);
            if ptr.is_null() {
                None
            } else {
                Some(TreeEntry::from_raw_borrowed(ptr))
            }
        }
    }

    /// The entry named `name` at this level, borrowed from the tree.
    pub fn get_name(&self, name: &str) -> Option<TreeEntry<'_>> {
        let name = CString::new(name).ok()?;
        unsafe {
            let ptr = raw::git_tree_entry_byname(self.handle.as_ptr(), name.as_ptr());
            if ptr.is_null() {
                None
            } else {
                Some(TreeEntry::from_raw_borrowed(ptr))
            }
        }
    }

    /// The entry at a slash-separated `path` below this tree, owned.
    pub fn get_path(&self, path: &str) -> Result<TreeEntry<'static>, Error> {
        let path =
            CString::new(path).map_err(|_| Error::invalid("path contains a NUL byte"))?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_tree_entry_bypath(
                &mut ptr,
                self.handle.as_ptr(),
                path.as_ptr(),
            ))?;
            Ok(TreeEntry::from_raw_owned(ptr))
        }
    }

    /// Recursively traverse this tree and every subtree.
    ///
    /// The visitor receives the slash-terminated root relative to this
    /// tree (empty at the top level) and a transient view of one entry,
    /// valid only for that invocation. Returning `false` halts the
    /// traversal; halting is not an error. A panicking visitor halts the
    /// same way and the panic resumes once the native traversal has
    /// returned.
    pub fn walk<F>(&self, mode: TreeWalkMode, visitor: F) -> Result<(), Error>
    where
        F: FnMut(&str, &TreeEntry<'_>) -> bool,
    {
        let mut state = CallbackState::new(visitor);
        let code = unsafe {
            raw::git_tree_walk(
                self.handle.as_ptr(),
                mode.raw(),
                walk_trampoline::<F>,
                state.payload(),
            )
        };
        state.finish(code)
    }
}

extern "C" fn walk_trampoline<F>(
    root: *const c_char,
    entry: *const raw::git_tree_entry,
    payload: *mut c_void,
) -> c_int
where
    F: FnMut(&str, &TreeEntry<'_>) -> bool,
{
    let state = unsafe { CallbackState::<F>::from_payload(payload) };
    state.invoke(|visitor| {
        let root = if root.is_null() {
            ""
        } else {
            unsafe { CStr::from_ptr(root) }.to_str().unwrap_or("")
        };
        let entry = unsafe { TreeEntry::from_raw_borrowed(entry) };
        if visitor(root, &entry) {
            0
        } else {
            HALT
        }
    })
}

impl std::fmt::Debug for Tree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("id", &self.id())
            .field("len", &self.len())
            .finish()
    }
}

/// One entry of a tree: a name plus the id and kind of what it names.
pub struct TreeEntry<'a> {
    handle: Handle<raw::git_tree_entry>,
    _marker: PhantomData<&'a ()>,
}

impl<'a> TreeEntry<'a> {
    pub(crate) unsafe fn from_raw_borrowed(ptr: *const raw::git_tree_entry) -> TreeEntry<'a> {
        TreeEntry {
            handle: Handle::from_raw(ptr as *mut raw::git_tree_entry, Ownership::Borrowed),
            _marker: PhantomData,
        }
    }

    pub(crate) unsafe fn from_raw_owned(ptr: *mut raw::git_tree_entry) -> TreeEntry<'static> {
        TreeEntry {
            handle: Handle::from_raw(ptr, Ownership::Owned),
            _marker: PhantomData,
        }
    }

    /// The entry's file name, if valid UTF-8.
    pub fn name(&self) -> Option<&str> {
        std::str::from_utf8(self.name_bytes()).ok()
    }

    /// The entry's file name as raw bytes.
    pub fn name_bytes(&self) -> &[u8] {
        unsafe { CStr::from_ptr(raw::git_tree_entry_name(self.handle.as_ptr())).to_bytes() }
    }

    /// The id of the object the entry names.
    pub fn id(&self) -> Oid {
        unsafe { Oid::from_raw(raw::git_tree_entry_id(self.handle.as_ptr())) }
    }

    /// The kind of the object the entry names.
    pub fn kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_raw(unsafe { raw::git_tree_entry_type(self.handle.as_ptr()) })
    }

    /// The entry's UNIX file mode.
    pub fn filemode(&self) -> i32 {
        unsafe { raw::git_tree_entry_filemode(self.handle.as_ptr()) as i32 }
    }

    /// Look up the object this entry names in `repo`.
    pub fn to_object<'repo>(&self, repo: &'repo Repository) -> Result<Object<'repo>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_tree_entry_to_object(
                &mut ptr,
                repo.raw(),
                self.handle.as_ptr(),
            ))?;
            Ok(Object::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Copy this entry through the engine's duplicate operation into an
    /// independently owned entry.
    pub fn to_owned(&self) -> Result<TreeEntry<'static>, Error> {
        let handle = self.handle.try_clone()?;
        Ok(TreeEntry {
            handle,
            _marker: PhantomData,
        })
    }
}

impl std::fmt::Debug for TreeEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeEntry")
            .field("name", &String::from_utf8_lossy(self.name_bytes()))
            .field("id", &self.id())
            .field("kind", &self.kind())
            .finish()
    }
}
