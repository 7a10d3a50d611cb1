//! core::strarray
//!
//! Owned adapter for the engine's bulk string-array convention.
//!
//! The engine passes collections of strings as `{count, array of string
//! pointers}`. Arrays the engine hands back are call-scoped - their
//! storage may be reused or freed once the producing call returns - so
//! this adapter *never aliases* engine storage: constructing from an
//! engine array deep-copies every element, and constructing from host
//! strings allocates one independent string per element. Cloning is a
//! full deep duplicate.

use std::ffi::{CStr, CString};

use libc::c_char;

use crate::core::error::Error;
use crate::raw;

/// An owned, deep-copied array of strings exchanged with the engine.
pub struct StrArray {
    strings: Vec<CString>,
    // Pointer table mirroring `strings`, kept alive for raw views.
    ptrs: Vec<*mut c_char>,
}

impl StrArray {
    /// An empty array.
    pub fn new() -> StrArray {
        StrArray {
            strings: Vec::new(),
            ptrs: Vec::new(),
        }
    }

    /// Build from a host-side collection, allocating one independent
    /// string per element.
    ///
    /// # Errors
    ///
    /// Raises a typed invalid-input error when an element contains an
    /// interior NUL byte, which the engine's convention cannot carry.
    pub fn from_strings<I, S>(items: I) -> Result<StrArray, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let mut strings = Vec::new();
        for item in items {
            let string = CString::new(item)
                .map_err(|_| Error::invalid("string contains an interior NUL byte"))?;
            strings.push(string);
        }
        Ok(StrArray::from_cstrings(strings))
    }

    fn from_cstrings(strings: Vec<CString>) -> StrArray {
        let ptrs = strings
            .iter()
            .map(|s| s.as_ptr() as *mut c_char)
            .collect();
        StrArray { strings, ptrs }
    }

    /// Deep-copy an engine-owned array.
    ///
    /// The engine array's lifetime is call-scoped; every element is
    /// copied into independently owned storage before this returns.
    ///
    /// # Safety
    ///
    /// `array` must point to a live engine array whose `count` entries
    /// are valid NUL-terminated strings.
    pub(crate) unsafe fn copy_from_raw(array: *const raw::git_strarray) -> StrArray {
        let count = (*array).count;
        let mut strings = Vec::with_capacity(count);
        for i in 0..count {
            let ptr = *(*array).strings.add(i);
            strings.push(CStr::from_ptr(ptr).to_owned());
        }
        StrArray::from_cstrings(strings)
    }

    /// Borrowed raw view for passing the array to an engine call.
    ///
    /// The view aliases this adapter's storage and is valid only while
    /// `self` is alive and unmodified.
    pub(crate) fn as_raw(&self) -> raw::git_strarray {
        raw::git_strarray {
            strings: self.ptrs.as_ptr() as *mut *mut c_char,
            count: self.strings.len(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Element at `index` as UTF-8, if in range and valid.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index)?.to_str().ok()
    }

    /// Element at `index` as raw bytes (without the terminator).
    pub fn get_bytes(&self, index: usize) -> Option<&[u8]> {
        Some(self.strings.get(index)?.as_bytes())
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &CStr> + '_ {
        self.strings.iter().map(|s| s.as_c_str())
    }

    /// Convert back to a host-side ordered sequence.
    ///
    /// Non-UTF-8 elements are replaced lossily; use [`StrArray::get_bytes`]
    /// for exact contents.
    pub fn to_vec(&self) -> Vec<String> {
        self.strings
            .iter()
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }
}

impl Default for StrArray {
    fn default() -> StrArray {
        StrArray::new()
    }
}

impl Clone for StrArray {
    fn clone(&self) -> StrArray {
        StrArray::from_cstrings(self.strings.clone())
    }
}

impl std::fmt::Debug for StrArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}
