//! core
//!
//! Generic plumbing shared by every wrapped entity type.
//!
//! Roughly forty native resource families flow through this crate, and
//! every one of them is a specialization of the same four mechanisms:
//!
//! - [`error`] - Translation of the engine's integer status protocol and
//!   thread-local last-error slot into typed, recoverable errors
//! - [`handle`] - The ownership-tagged handle: a native resource pointer
//!   plus an explicit owned/borrowed tag, released exactly once
//! - `bridge` - Adaptation of the engine's function-pointer-plus-payload
//!   callback convention to closures, and of its cursor resources to
//!   iterators
//! - [`buffer`] / [`strarray`] - Owned adapters for the engine's growable
//!   byte-buffer and string-array return conventions
//!
//! [`engine`] holds the process-wide, reference-counted init/shutdown
//! lifecycle the engine requires before any other call.

pub(crate) mod bridge;
pub mod buffer;
pub mod engine;
pub mod error;
pub mod handle;
pub mod strarray;

pub use buffer::Buf;
pub use engine::Engine;
pub use error::{Error, ErrorClass, ErrorCode};
pub use handle::Ownership;
pub use strarray::StrArray;
