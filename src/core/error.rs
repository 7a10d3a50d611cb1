//! core::error
//!
//! Typed failure taxonomy and status-code translation.
//!
//! Every call into the engine returns a signed integer: zero means
//! success, a small positive value may carry a boolean or a count, and
//! any negative value identifies a failure class from a closed set. On
//! failure the engine additionally records a message and a failure domain
//! in a thread-local last-error slot.
//!
//! [`check`] and [`check_bool`] are the two translators. Both read the
//! last-error slot *immediately* at the failing call site - deferring the
//! read would let the next engine call overwrite it.
//!
//! # Errors
//!
//! Callers always receive an [`Error`] carrying the failure class
//! ([`ErrorCode`]), the originating failure domain ([`ErrorClass`]), and
//! the engine-supplied message. There is no "something went wrong"
//! without at least the failure class populated.

use std::ffi::CStr;

use libc::c_int;

use crate::raw;

/// A failure raised by the engine, translated at the call site.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    class: ErrorClass,
    message: String,
}

/// Failure class: what kind of error occurred.
///
/// Mirrors the engine's closed set of negative status codes. The special
/// [`ErrorCode::IterOver`] value is the end-of-iteration sentinel; the
/// iterator bridge consumes it internally and it is never surfaced by
/// enumeration APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Generic error with no more specific class.
    GenericError,
    /// Requested object could not be found.
    NotFound,
    /// Object exists, preventing the operation.
    Exists,
    /// More than one object matches.
    Ambiguous,
    /// Output buffer too short to hold data.
    BufferTooShort,
    /// A user callback refused the operation.
    User,
    /// Operation not allowed on a bare repository.
    BareRepo,
    /// HEAD refers to a branch with no commits.
    UnbornBranch,
    /// A merge in progress prevented the operation.
    Unmerged,
    /// The reference was not fast-forwardable.
    NotFastForward,
    /// A name or ref spec was not in a valid format.
    InvalidSpec,
    /// Checkout conflicts prevented the operation.
    Conflict,
    /// A lock file prevented the operation.
    Locked,
    /// The reference value does not match expected.
    Modified,
    /// Authentication failed.
    Auth,
    /// The server certificate is invalid.
    Certificate,
    /// The patch or merge has already been applied.
    Applied,
    /// The requested peel operation is not possible.
    Peel,
    /// Unexpected end of file.
    Eof,
    /// Invalid operation or input.
    Invalid,
    /// Uncommitted changes in the index prevented the operation.
    Uncommitted,
    /// The operation is not valid for a directory.
    Directory,
    /// A merge conflict exists and the operation cannot continue.
    MergeConflict,
    /// A user-configured callback refused to act.
    Passthrough,
    /// Enumeration is exhausted (sentinel, consumed by the iterator
    /// bridge; never a user-visible failure).
    IterOver,
    /// Internal retry signal.
    Retry,
    /// Hashsum mismatch in an object.
    HashsumMismatch,
    /// Unsaved changes in the index would be overwritten.
    IndexDirty,
    /// Patch application failed.
    ApplyFail,
}

/// Failure domain: which engine subsystem raised the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorClass {
    /// No error class set.
    None,
    /// Out of memory.
    NoMemory,
    /// Operating system error.
    Os,
    /// Invalid input.
    Invalid,
    /// Reference subsystem.
    Reference,
    /// Zlib compression.
    Zlib,
    /// Repository subsystem.
    Repository,
    /// Configuration subsystem.
    Config,
    /// Regular expression handling.
    Regex,
    /// Object database.
    Odb,
    /// Index subsystem.
    Index,
    /// Object subsystem.
    Object,
    /// Network layer.
    Net,
    /// Tag subsystem.
    Tag,
    /// Tree subsystem.
    Tree,
    /// Pack indexer.
    Indexer,
    /// SSL layer.
    Ssl,
    /// Submodule subsystem.
    Submodule,
    /// Threading layer.
    Thread,
    /// Stash subsystem.
    Stash,
    /// Checkout machinery.
    Checkout,
    /// FETCH_HEAD handling.
    FetchHead,
    /// Merge machinery.
    Merge,
    /// SSH transport.
    Ssh,
    /// Filter subsystem.
    Filter,
    /// Revert machinery.
    Revert,
    /// A user callback.
    Callback,
    /// Cherry-pick machinery.
    CherryPick,
    /// Describe machinery.
    Describe,
    /// Rebase machinery.
    Rebase,
    /// Filesystem layer.
    Filesystem,
    /// Patch handling.
    Patch,
    /// Worktree subsystem.
    Worktree,
    /// HTTP transport.
    Http,
    /// Engine internals.
    Internal,
}

impl Error {
    /// Create an error from explicit parts. Used for failures detected on
    /// the host side of the boundary (invalid input, bad downcasts).
    pub(crate) fn new(
        code: ErrorCode,
        class: ErrorClass,
        message: impl Into<String>,
    ) -> Self {
        Error {
            code,
            class,
            message: message.into(),
        }
    }

    /// Shorthand for host-side invalid-input failures.
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::Invalid, ErrorClass::Invalid, message)
    }

    /// Build an error for a failing status code by reading the engine's
    /// thread-local last-error slot.
    ///
    /// The slot is read and cleared immediately so a subsequent engine
    /// call cannot overwrite the detail before we capture it. When the
    /// slot is empty (some paths fail without setting it) the error still
    /// carries the failure class derived from the code.
    pub(crate) fn last(code: c_int) -> Self {
        let (message, class) = unsafe {
            let last = raw::git_error_last();
            if last.is_null() || (*last).message.is_null() {
                ("an unknown error occurred".to_string(), ErrorClass::None)
            } else {
                let message = CStr::from_ptr((*last).message)
                    .to_string_lossy()
                    .into_owned();
                let class = ErrorClass::from_raw((*last).klass);
                raw::git_error_clear();
                (message, class)
            }
        };

        Error {
            code: ErrorCode::from_raw(code),
            class,
            message,
        }
    }

    /// The failure class.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The failure domain that raised the error.
    pub fn class(&self) -> ErrorClass {
        self.class
    }

    /// The engine-supplied (or host-supplied) message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ErrorCode {
    /// Map a raw negative status onto the closed failure-class set.
    pub(crate) fn from_raw(code: c_int) -> ErrorCode {
        match code {
            raw::GIT_ENOTFOUND => ErrorCode::NotFound,
            raw::GIT_EEXISTS => ErrorCode::Exists,
            raw::GIT_EAMBIGUOUS => ErrorCode::Ambiguous,
            raw::GIT_EBUFS => ErrorCode::BufferTooShort,
            raw::GIT_EUSER => ErrorCode::User,
            raw::GIT_EBAREREPO => ErrorCode::BareRepo,
            raw::GIT_EUNBORNBRANCH => ErrorCode::UnbornBranch,
            raw::GIT_EUNMERGED => ErrorCode::Unmerged,
            raw::GIT_ENONFASTFORWARD => ErrorCode::NotFastForward,
            raw::GIT_EINVALIDSPEC => ErrorCode::InvalidSpec,
            raw::GIT_ECONFLICT => ErrorCode::Conflict,
            raw::GIT_ELOCKED => ErrorCode::Locked,
            raw::GIT_EMODIFIED => ErrorCode::Modified,
            raw::GIT_EAUTH => ErrorCode::Auth,
            raw::GIT_ECERTIFICATE => ErrorCode::Certificate,
            raw::GIT_EAPPLIED => ErrorCode::Applied,
            raw::GIT_EPEEL => ErrorCode::Peel,
            raw::GIT_EEOF => ErrorCode::Eof,
            raw::GIT_EINVALID => ErrorCode::Invalid,
            raw::GIT_EUNCOMMITTED => ErrorCode::Uncommitted,
            raw::GIT_EDIRECTORY => ErrorCode::Directory,
            raw::GIT_EMERGECONFLICT => ErrorCode::MergeConflict,
            raw::GIT_PASSTHROUGH => ErrorCode::Passthrough,
            raw::GIT_ITEROVER => ErrorCode::IterOver,
            -32 => ErrorCode::Retry,
            raw::GIT_EMISMATCH => ErrorCode::HashsumMismatch,
            raw::GIT_EINDEXDIRTY => ErrorCode::IndexDirty,
            raw::GIT_EAPPLYFAIL => ErrorCode::ApplyFail,
            _ => ErrorCode::GenericError,
        }
    }
}

impl ErrorClass {
    /// Map a raw failure-domain value onto the domain enumeration.
    pub(crate) fn from_raw(klass: c_int) -> ErrorClass {
        match klass as u32 {
            raw::GIT_ERROR_NONE => ErrorClass::None,
            raw::GIT_ERROR_NOMEMORY => ErrorClass::NoMemory,
            raw::GIT_ERROR_OS => ErrorClass::Os,
            raw::GIT_ERROR_INVALID => ErrorClass::Invalid,
            raw::GIT_ERROR_REFERENCE => ErrorClass::Reference,
            raw::GIT_ERROR_ZLIB => ErrorClass::Zlib,
            raw::GIT_ERROR_REPOSITORY => ErrorClass::Repository,
            raw::GIT_ERROR_CONFIG => ErrorClass::Config,
            raw::GIT_ERROR_REGEX => ErrorClass::Regex,
            raw::GIT_ERROR_ODB => ErrorClass::Odb,
            raw::GIT_ERROR_INDEX => ErrorClass::Index,
            raw::GIT_ERROR_OBJECT => ErrorClass::Object,
            raw::GIT_ERROR_NET => ErrorClass::Net,
            raw::GIT_ERROR_TAG => ErrorClass::Tag,
            raw::GIT_ERROR_TREE => ErrorClass::Tree,
            raw::GIT_ERROR_INDEXER => ErrorClass::Indexer,
            raw::GIT_ERROR_SSL => ErrorClass::Ssl,
            raw::GIT_ERROR_SUBMODULE => ErrorClass::Submodule,
            raw::GIT_ERROR_THREAD => ErrorClass::Thread,
            raw::GIT_ERROR_STASH => ErrorClass::Stash,
            raw::GIT_ERROR_CHECKOUT => ErrorClass::Checkout,
            raw::GIT_ERROR_FETCHHEAD => ErrorClass::FetchHead,
            raw::GIT_ERROR_MERGE => ErrorClass::Merge,
            raw::GIT_ERROR_SSH => ErrorClass::Ssh,
            raw::GIT_ERROR_FILTER => ErrorClass::Filter,
            raw::GIT_ERROR_REVERT => ErrorClass::Revert,
            raw::GIT_ERROR_CALLBACK => ErrorClass::Callback,
            raw::GIT_ERROR_CHERRYPICK => ErrorClass::CherryPick,
            raw::GIT_ERROR_DESCRIBE => ErrorClass::Describe,
            raw::GIT_ERROR_REBASE => ErrorClass::Rebase,
            raw::GIT_ERROR_FILESYSTEM => ErrorClass::Filesystem,
            raw::GIT_ERROR_PATCH => ErrorClass::Patch,
            raw::GIT_ERROR_WORKTREE => ErrorClass::Worktree,
            raw::GIT_ERROR_HTTP => ErrorClass::Http,
            // libgit2-sys 0.18 omits the binding for GIT_ERROR_INTERNAL,
            // which is the last variant (35) of the bundled libgit2's
            // git_error_t enum; reference it by value.
            35 => ErrorClass::Internal,
            _ => ErrorClass::None,
        }
    }
}

/// Translate a status result.
///
/// Zero and positive values pass through unchanged (the engine returns
/// meaningful positives, e.g. init counts); any negative value is raised
/// as a typed [`Error`] built from the last-error slot.
pub(crate) fn check(code: c_int) -> Result<c_int, Error> {
    if code >= 0 {
        Ok(code)
    } else {
        Err(Error::last(code))
    }
}

/// Translate a tri-state status result.
///
/// Positive is true, zero is false, negative raises identically to
/// [`check`].
pub(crate) fn check_bool(code: c_int) -> Result<bool, Error> {
    match check(code)? {
        0 => Ok(false),
        _ => Ok(true),
    }
}
