//! repo
//!
//! Repository lifecycle and lookups.
//!
//! [`Repository`] is the doorway to everything else: objects, references
//! and walkers are borrowed from it and cannot outlive it. Opening a
//! repository acquires the engine lifecycle guard; every entity handed
//! out below it rides on that guard through its lifetime parameter.

mod index;

pub use index::Index;

use std::ffi::{CStr, CString};
use std::path::{Path, PathBuf};

use libc::c_uint;

use tracing::debug;

use crate::core::buffer::Buf;
use crate::core::engine::Engine;
use crate::core::error::{check, check_bool, Error};
use crate::core::handle::{Handle, Ownership, Release};
use crate::core::strarray::StrArray;
use crate::object::{Blob, Commit, Object, ObjectKind, Tag, Tree};
use crate::oid::Oid;
use crate::raw;
use crate::refs::{BranchKind, Branches, Reference, References, Revwalk};
use crate::signature::Signature;

// libgit2-sys 0.18 does not expose a binding for git_reference_list, which
// the bundled libgit2 exports. Declare it here so reference_names can call
// through to the engine; it links against the same vendored library.
extern "C" {
    fn git_reference_list(
        array: *mut raw::git_strarray,
        repo: *mut raw::git_repository,
    ) -> libc::c_int;
}

unsafe impl Release for raw::git_repository {
    unsafe fn release(ptr: *mut raw::git_repository) {
        raw::git_repository_free(ptr)
    }
}

/// An in-progress operation the repository is paused in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    /// No operation in progress.
    Clean,
    /// Merge in progress.
    Merge,
    /// Revert in progress.
    Revert,
    /// Revert sequence in progress.
    RevertSequence,
    /// Cherry-pick in progress.
    CherryPick,
    /// Cherry-pick sequence in progress.
    CherryPickSequence,
    /// Bisect in progress.
    Bisect,
    /// Rebase in progress.
    Rebase,
    /// Interactive rebase in progress.
    RebaseInteractive,
    /// Rebase merge in progress.
    RebaseMerge,
    /// Mailbox apply in progress.
    ApplyMailbox,
    /// Mailbox apply or rebase in progress.
    ApplyMailboxOrRebase,
}

impl RepositoryState {
    fn from_raw(state: libc::c_int) -> RepositoryState {
        match state as c_uint {
            raw::GIT_REPOSITORY_STATE_MERGE => RepositoryState::Merge,
            raw::GIT_REPOSITORY_STATE_REVERT => RepositoryState::Revert,
            raw::GIT_REPOSITORY_STATE_REVERT_SEQUENCE => RepositoryState::RevertSequence,
            raw::GIT_REPOSITORY_STATE_CHERRYPICK => RepositoryState::CherryPick,
            raw::GIT_REPOSITORY_STATE_CHERRYPICK_SEQUENCE => {
                RepositoryState::CherryPickSequence
            }
            raw::GIT_REPOSITORY_STATE_BISECT => RepositoryState::Bisect,
            raw::GIT_REPOSITORY_STATE_REBASE => RepositoryState::Rebase,
            raw::GIT_REPOSITORY_STATE_REBASE_INTERACTIVE => RepositoryState::RebaseInteractive,
            raw::GIT_REPOSITORY_STATE_REBASE_MERGE => RepositoryState::RebaseMerge,
            raw::GIT_REPOSITORY_STATE_APPLY_MAILBOX => RepositoryState::ApplyMailbox,
            raw::GIT_REPOSITORY_STATE_APPLY_MAILBOX_OR_REBASE => {
                RepositoryState::ApplyMailboxOrRebase
            }
            _ => RepositoryState::Clean,
        }
    }

    /// Whether any operation is in progress.
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, RepositoryState::Clean)
    }
}

/// An open repository.
pub struct Repository {
    handle: Handle<raw::git_repository>,
    engine: Engine,
}

impl Repository {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the repository at `path` (a `.git` directory or a working
    /// directory containing one).
    pub fn open(path: &Path) -> Result<Repository, Error> {
        let engine = Engine::acquire()?;
        let c_path = path_to_cstring(path)?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_repository_open(&mut ptr, c_path.as_ptr()))?;
        }
        debug!(path = %path.display(), "opened repository");
        Ok(Repository {
            handle: unsafe { Handle::from_raw(ptr, Ownership::Owned) },
            engine,
        })
    }

    /// Create a new repository with a working directory at `path`.
    pub fn init(path: &Path) -> Result<Repository, Error> {
        Repository::init_inner(path, false)
    }

    /// Create a new bare repository at `path`.
    pub fn init_bare(path: &Path) -> Result<Repository, Error> {
        Repository::init_inner(path, true)
    }

    fn init_inner(path: &Path, bare: bool) -> Result<Repository, Error> {
        let engine = Engine::acquire()?;
        let c_path = path_to_cstring(path)?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_repository_init(
                &mut ptr,
                c_path.as_ptr(),
                bare as c_uint,
            ))?;
        }
        debug!(path = %path.display(), bare, "initialized repository");
        Ok(Repository {
            handle: unsafe { Handle::from_raw(ptr, Ownership::Owned) },
            engine,
        })
    }

    /// Walk up from `path` until a repository is found and open it.
    pub fn discover(path: &Path) -> Result<Repository, Error> {
        let c_path = path_to_cstring(path)?;
        let mut found = Buf::new()?;
        unsafe {
            check(raw::git_repository_discover(
                found.raw_mut(),
                c_path.as_ptr(),
                1,
                std::ptr::null(),
            ))?;
        }
        Repository::open(&bytes_to_path(found.as_bytes()))
    }

    // =========================================================================
    // Repository info and state
    // =========================================================================

    /// Path to the `.git` directory.
    pub fn path(&self) -> &Path {
        unsafe {
            let ptr = raw::git_repository_path(self.handle.as_ptr());
            cstr_to_path(CStr::from_ptr(ptr))
        }
    }

    /// Path to the working directory, absent for bare repositories.
    pub fn workdir(&self) -> Option<&Path> {
        unsafe {
            let ptr = raw::git_repository_workdir(self.handle.as_ptr());
            if ptr.is_null() {
                None
            } else {
                Some(cstr_to_path(CStr::from_ptr(ptr)))
            }
        }
    }

    /// Whether the repository is bare.
    pub fn is_bare(&self) -> bool {
        unsafe { raw::git_repository_is_bare(self.handle.as_ptr()) != 0 }
    }

    /// Whether the repository was just created and has no commits.
    pub fn is_empty(&self) -> Result<bool, Error> {
        check_bool(unsafe { raw::git_repository_is_empty(self.handle.as_ptr()) })
    }

    /// Whether HEAD points directly at a commit instead of a branch.
    pub fn head_detached(&self) -> Result<bool, Error> {
        check_bool(unsafe { raw::git_repository_head_detached(self.handle.as_ptr()) })
    }

    /// The operation the repository is currently paused in, if any.
    pub fn state(&self) -> RepositoryState {
        RepositoryState::from_raw(unsafe { raw::git_repository_state(self.handle.as_ptr()) })
    }

    // =========================================================================
    // References
    // =========================================================================

    /// The reference HEAD points at.
    ///
    /// # Errors
    ///
    /// Raises the unborn-branch failure on a repository whose HEAD names
    /// a branch with no commits, and the bare-repo/not-found failures
    /// per the engine's contract.
    pub fn head(&self) -> Result<Reference<'_>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_repository_head(&mut ptr, self.handle.as_ptr()))?;
            Ok(Reference::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Look up a reference by its full name.
    pub fn find_reference(&self, name: &str) -> Result<Reference<'_>, Error> {
        let name = cstring(name)?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_reference_lookup(
                &mut ptr,
                self.handle.as_ptr(),
                name.as_ptr(),
            ))?;
            Ok(Reference::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Resolve a reference name straight to the id it points at.
    pub fn refname_to_id(&self, name: &str) -> Result<Oid, Error> {
        let name = cstring(name)?;
        let mut id = Oid::zero();
        unsafe {
            check(raw::git_reference_name_to_id(
                id.raw_mut(),
                self.handle.as_ptr(),
                name.as_ptr(),
            ))?;
        }
        Ok(id)
    }

    /// Create a direct reference pointing at `id`.
    pub fn reference(
        &self,
        name: &str,
        id: Oid,
        force: bool,
        log_message: &str,
    ) -> Result<Reference<'_>, Error> {
        let name = cstring(name)?;
        let log_message = cstring(log_message)?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_reference_create(
                &mut ptr,
                self.handle.as_ptr(),
                name.as_ptr(),
                id.raw(),
                force as libc::c_int,
                log_message.as_ptr(),
            ))?;
            Ok(Reference::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Iterate over every reference.
    pub fn references(&self) -> Result<References<'_>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_reference_iterator_new(
                &mut ptr,
                self.handle.as_ptr(),
            ))?;
            Ok(References::from_raw(ptr))
        }
    }

    /// Iterate over the references whose names match `glob`.
    pub fn references_glob(&self, glob: &str) -> Result<References<'_>, Error> {
        let glob = cstring(glob)?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_reference_iterator_glob_new(
                &mut ptr,
                self.handle.as_ptr(),
                glob.as_ptr(),
            ))?;
            Ok(References::from_raw(ptr))
        }
    }

    /// Every reference name, deep-copied out of the engine's bulk list.
    pub fn reference_names(&self) -> Result<StrArray, Error> {
        let mut engine_array = raw::git_strarray {
            strings: std::ptr::null_mut(),
            count: 0,
        };
        unsafe {
            check(git_reference_list(
                &mut engine_array,
                self.handle.as_ptr(),
            ))?;
            let names = StrArray::copy_from_raw(&engine_array);
            raw::git_strarray_free(&mut engine_array);
            Ok(names)
        }
    }

    /// Iterate over branches, optionally restricted to one namespace.
    pub fn branches(&self, filter: Option<BranchKind>) -> Result<Branches<'_>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_branch_iterator_new(
                &mut ptr,
                self.handle.as_ptr(),
                BranchKind::raw_filter(filter),
            ))?;
            Ok(Branches::from_raw(ptr))
        }
    }

    // =========================================================================
    // Objects
    // =========================================================================

    /// Look up the object `id` names, optionally requiring a kind.
    pub fn find_object(&self, id: Oid, kind: Option<ObjectKind>) -> Result<Object<'_>, Error> {
        let raw_kind = kind.map(ObjectKind::raw).unwrap_or(raw::GIT_OBJECT_ANY);
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_object_lookup(
                &mut ptr,
                self.handle.as_ptr(),
                id.raw(),
                raw_kind,
            ))?;
            Ok(Object::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Look up a commit.
    pub fn find_commit(&self, id: Oid) -> Result<Commit<'_>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_commit_lookup(
                &mut ptr,
                self.handle.as_ptr(),
                id.raw(),
            ))?;
            Ok(Commit::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Look up a tree.
    pub fn find_tree(&self, id: Oid) -> Result<Tree<'_>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_tree_lookup(
                &mut ptr,
                self.handle.as_ptr(),
                id.raw(),
            ))?;
            Ok(Tree::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Look up a blob.
    pub fn find_blob(&self, id: Oid) -> Result<Blob<'_>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_blob_lookup(
                &mut ptr,
                self.handle.as_ptr(),
                id.raw(),
            ))?;
            Ok(Blob::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Look up an annotated tag.
    pub fn find_tag(&self, id: Oid) -> Result<Tag<'_>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_tag_lookup(
                &mut ptr,
                self.handle.as_ptr(),
                id.raw(),
            ))?;
            Ok(Tag::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Resolve a single revision spec (`HEAD`, `v1`, `main~2`, ...).
    pub fn revparse_single(&self, spec: &str) -> Result<Object<'_>, Error> {
        let spec = cstring(spec)?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_revparse_single(
                &mut ptr,
                self.handle.as_ptr(),
                spec.as_ptr(),
            ))?;
            Ok(Object::from_raw(ptr, Ownership::Owned))
        }
    }

    /// Every tag name, deep-copied out of the engine's bulk list.
    pub fn tag_names(&self) -> Result<StrArray, Error> {
        let mut engine_array = raw::git_strarray {
            strings: std::ptr::null_mut(),
            count: 0,
        };
        unsafe {
            check(raw::git_tag_list(&mut engine_array, self.handle.as_ptr()))?;
            let names = StrArray::copy_from_raw(&engine_array);
            raw::git_strarray_free(&mut engine_array);
            Ok(names)
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// A new revision walker over this repository.
    pub fn revwalk(&self) -> Result<Revwalk<'_>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_revwalk_new(&mut ptr, self.handle.as_ptr()))?;
            Ok(Revwalk::from_raw(ptr))
        }
    }

    /// The best common ancestor of two commits.
    pub fn merge_base(&self, one: Oid, two: Oid) -> Result<Oid, Error> {
        let mut out = Oid::zero();
        unsafe {
            check(raw::git_merge_base(
                out.raw_mut(),
                self.handle.as_ptr(),
                one.raw(),
                two.raw(),
            ))?;
        }
        Ok(out)
    }

    /// Whether `commit` is a descendant of `ancestor`.
    pub fn graph_descendant_of(&self, commit: Oid, ancestor: Oid) -> Result<bool, Error> {
        check_bool(unsafe {
            raw::git_graph_descendant_of(self.handle.as_ptr(), commit.raw(), ancestor.raw())
        })
    }

    /// Create a commit from a tree and parents, optionally updating a
    /// reference to point at it.
    pub fn commit(
        &self,
        update_ref: Option<&str>,
        author: &Signature<'_>,
        committer: &Signature<'_>,
        message: &str,
        tree: &Tree<'_>,
        parents: &[&Commit<'_>],
    ) -> Result<Oid, Error> {
        let update_ref = update_ref.map(cstring).transpose()?;
        let message = cstring(message)?;
        let mut parent_ptrs: Vec<*const raw::git_commit> =
            parents.iter().map(|p| p.raw_const()).collect();
        let mut id = Oid::zero();
        unsafe {
            check(raw::git_commit_create(
                id.raw_mut(),
                self.handle.as_ptr(),
                update_ref.as_ref().map_or(std::ptr::null(), |s| s.as_ptr()),
                author.raw_const(),
                committer.raw_const(),
                std::ptr::null(),
                message.as_ptr(),
                tree.raw_const(),
                parent_ptrs.len(),
                parent_ptrs.as_mut_ptr(),
            ))?;
        }
        Ok(id)
    }

    // =========================================================================
    // Index and identity
    // =========================================================================

    /// The repository's index.
    pub fn index(&self) -> Result<Index, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_repository_index(&mut ptr, self.handle.as_ptr()))?;
            Ok(Index::from_raw(ptr, self.engine.clone()))
        }
    }

    /// The identity configured for this repository, stamped with the
    /// current time.
    pub fn signature(&self) -> Result<Signature<'static>, Error> {
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_signature_default(&mut ptr, self.handle.as_ptr()))?;
            Ok(Signature::from_raw_owned(ptr, self.engine.clone()))
        }
    }

    pub(crate) fn raw(&self) -> *mut raw::git_repository {
        self.handle.as_ptr()
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path())
            .finish()
    }
}

fn cstring(s: &str) -> Result<CString, Error> {
    CString::new(s).map_err(|_| Error::invalid("string contains an interior NUL byte"))
}

#[cfg(unix)]
fn path_to_cstring(path: &Path) -> Result<CString, Error> {
    use std::os::unix::ffi::OsStrExt;
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| Error::invalid("path contains a NUL byte"))
}

#[cfg(windows)]
fn path_to_cstring(path: &Path) -> Result<CString, Error> {
    let utf8 = path
        .to_str()
        .ok_or_else(|| Error::invalid("path is not valid UTF-8"))?;
    CString::new(utf8).map_err(|_| Error::invalid("path contains a NUL byte"))
}

#[cfg(unix)]
fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(windows)]
fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(unix)]
fn cstr_to_path(cstr: &CStr) -> &Path {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    Path::new(OsStr::from_bytes(cstr.to_bytes()))
}

#[cfg(windows)]
fn cstr_to_path(cstr: &CStr) -> &Path {
    Path::new(cstr.to_str().unwrap_or(""))
}
