//! oid
//!
//! Git object identifiers.
//!
//! [`Oid`] is a plain value type over the engine's 20-byte identifier.
//! Parsing delegates to the engine; formatting, ordering and hashing are
//! host-side over the raw bytes.

use std::ffi::CString;
use std::str::FromStr;

use crate::core::engine::Engine;
use crate::core::error::{check, Error};
use crate::raw;

/// Raw size of an object id in bytes.
const RAW_SIZE: usize = 20;

/// A git object identifier (SHA-1).
#[derive(Clone, Copy)]
pub struct Oid {
    raw: raw::git_oid,
}

impl Oid {
    /// Parse a full 40-character hex string.
    ///
    /// # Errors
    ///
    /// Raises the engine's invalid-format failure for malformed input.
    pub fn from_hex(hex: &str) -> Result<Oid, Error> {
        let hex = CString::new(hex).map_err(|_| Error::invalid("id contains a NUL byte"))?;
        let _guard = Engine::acquire()?;
        let mut id = Oid::zero();
        check(unsafe { raw::git_oid_fromstr(&mut id.raw, hex.as_ptr()) })?;
        Ok(id)
    }

    /// Build from exactly 20 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Oid, Error> {
        if bytes.len() != RAW_SIZE {
            return Err(Error::invalid(format!(
                "expected {} raw id bytes, got {}",
                RAW_SIZE,
                bytes.len()
            )));
        }
        let mut id = Oid::zero();
        id.raw.id.copy_from_slice(bytes);
        Ok(id)
    }

    /// The all-zero id.
    pub fn zero() -> Oid {
        Oid {
            raw: raw::git_oid { id: [0; RAW_SIZE] },
        }
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.raw.id.iter().all(|&b| b == 0)
    }

    /// The raw id bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw.id
    }

    /// Copy an id out of engine storage.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live engine id.
    pub(crate) unsafe fn from_raw(ptr: *const raw::git_oid) -> Oid {
        Oid { raw: *ptr }
    }

    pub(crate) fn raw(&self) -> *const raw::git_oid {
        &self.raw
    }

    pub(crate) fn raw_mut(&mut self) -> *mut raw::git_oid {
        &mut self.raw
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Oid, Error> {
        Oid::from_hex(s)
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.raw.id {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl PartialEq for Oid {
    fn eq(&self, other: &Oid) -> bool {
        self.raw.id == other.raw.id
    }
}

impl Eq for Oid {}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Oid) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Oid) -> std::cmp::Ordering {
        self.raw.id.cmp(&other.raw.id)
    }
}

impl std::hash::Hash for Oid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.id.hash(state)
    }
}
