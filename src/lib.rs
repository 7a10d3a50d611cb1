//! Grapple - safe, ownership-aware Rust bindings to the libgit2 engine
//!
//! Grapple wraps libgit2's native object graph (repositories, objects,
//! references, indexes, revision walkers) in safe, idiomatic Rust values.
//! The git algorithms themselves - merging, diffing, revision ordering,
//! object storage - are delegated wholesale to the engine; what this crate
//! supplies is the plumbing that makes delegating to them safe.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Generic plumbing every entity specializes: the error
//!   translation layer, the ownership-tagged handle, the callback/iterator
//!   bridge, the buffer and string-array adapters, and the engine
//!   init/shutdown lifecycle
//! - [`object`] - Git objects (blob, commit, tree, tag) and the type-erased
//!   [`Object`] with checked downcasts
//! - [`refs`] - References, reference/branch iteration, revision walking
//! - [`repo`] - Repository lifecycle, lookups, and the index
//!
//! # Correctness Invariants
//!
//! Grapple maintains the following invariants:
//!
//! 1. Every native resource is released exactly once: wrappers constructed
//!    with [`Ownership::Owned`] release on drop, wrappers constructed with
//!    [`Ownership::Borrowed`] never release
//! 2. Every failing engine status is translated into a typed [`Error`]
//!    carrying the failure class, failure domain, and engine message, read
//!    from the engine's last-error slot at the failing call site
//! 3. Callbacks never unwind across the foreign boundary: a panicking
//!    visitor halts enumeration and the panic resumes after the native
//!    call returns
//! 4. Engine global state is initialized once per process, reference
//!    counted, and torn down when the last holder is dropped
//!
//! # Example
//!
//! ```ignore
//! use grapple::{Repository, Sort};
//!
//! let repo = Repository::discover(std::path::Path::new("."))?;
//! let head = repo.head()?;
//! println!("HEAD is {}", head.name().unwrap_or("<non-utf8>"));
//!
//! let mut walk = repo.revwalk()?;
//! walk.push_head()?;
//! walk.sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
//! for id in walk {
//!     println!("{}", id?);
//! }
//! ```

#![warn(missing_docs)]

pub(crate) use libgit2_sys as raw;

pub mod core;
pub mod object;
pub mod oid;
pub mod refs;
pub mod repo;
pub mod signature;

pub use crate::core::buffer::Buf;
pub use crate::core::engine::Engine;
pub use crate::core::error::{Error, ErrorClass, ErrorCode};
pub use crate::core::handle::Ownership;
pub use crate::core::strarray::StrArray;
pub use crate::object::{Blob, Commit, Object, ObjectKind, Tag, Tree, TreeEntry, TreeWalkMode};
pub use crate::oid::Oid;
pub use crate::refs::{Branch, BranchKind, Branches, Reference, ReferenceKind, References};
pub use crate::refs::{Revwalk, Sort};
pub use crate::repo::{Index, Repository, RepositoryState};
pub use crate::signature::{Signature, Time};
