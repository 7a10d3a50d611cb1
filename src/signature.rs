//! signature
//!
//! Author/committer identities.
//!
//! A [`Signature`] is either owned (allocated by the engine on request,
//! released here exactly once) or borrowed from a commit or tag, in
//! which case its lifetime parameter ties it to that owner.

use std::ffi::{CStr, CString};
use std::marker::PhantomData;

use crate::core::engine::Engine;
use crate::core::error::{check, Error};
use crate::core::handle::{Handle, Ownership, Release};
use crate::raw;

unsafe impl Release for raw::git_signature {
    unsafe fn release(ptr: *mut raw::git_signature) {
        raw::git_signature_free(ptr)
    }
}

/// An action timestamp: seconds since epoch plus a timezone offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    seconds: i64,
    offset_minutes: i32,
}

impl Time {
    /// Build a timestamp from seconds since epoch and a timezone offset
    /// in minutes.
    pub fn new(seconds: i64, offset_minutes: i32) -> Time {
        Time {
            seconds,
            offset_minutes,
        }
    }

    /// Seconds since epoch.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Timezone offset in minutes from UTC.
    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }
}

/// A name/email/time identity attached to commits and tags.
pub struct Signature<'a> {
    handle: Handle<raw::git_signature>,
    _engine: Option<Engine>,
    _marker: PhantomData<&'a ()>,
}

impl Signature<'static> {
    /// Create an identity with an explicit timestamp.
    pub fn new(name: &str, email: &str, when: Time) -> Result<Signature<'static>, Error> {
        let name = cstring(name)?;
        let email = cstring(email)?;
        let engine = Engine::acquire()?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_signature_new(
                &mut ptr,
                name.as_ptr(),
                email.as_ptr(),
                when.seconds,
                when.offset_minutes,
            ))?;
            Ok(Signature {
                handle: Handle::from_raw(ptr, Ownership::Owned),
                _engine: Some(engine),
                _marker: PhantomData,
            })
        }
    }

    /// Create an identity stamped with the current time.
    pub fn now(name: &str, email: &str) -> Result<Signature<'static>, Error> {
        let name = cstring(name)?;
        let email = cstring(email)?;
        let engine = Engine::acquire()?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_signature_now(
                &mut ptr,
                name.as_ptr(),
                email.as_ptr(),
            ))?;
            Ok(Signature {
                handle: Handle::from_raw(ptr, Ownership::Owned),
                _engine: Some(engine),
                _marker: PhantomData,
            })
        }
    }

    /// Take ownership of an engine-allocated signature.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live signature the caller is entitled to release.
    pub(crate) unsafe fn from_raw_owned(
        ptr: *mut raw::git_signature,
        engine: Engine,
    ) -> Signature<'static> {
        Signature {
            handle: Handle::from_raw(ptr, Ownership::Owned),
            _engine: Some(engine),
            _marker: PhantomData,
        }
    }
}

impl<'a> Signature<'a> {
    /// Borrow a signature owned by a longer-lived entity.
    ///
    /// # Safety
    ///
    /// `ptr` must stay live for `'a`; this wrapper never releases it.
    pub(crate) unsafe fn from_raw_borrowed(ptr: *const raw::git_signature) -> Signature<'a> {
        Signature {
            handle: Handle::from_raw(ptr as *mut raw::git_signature, Ownership::Borrowed),
            _engine: None,
            _marker: PhantomData,
        }
    }

    /// The identity name, if valid UTF-8.
    pub fn name(&self) -> Option<&str> {
        std::str::from_utf8(self.name_bytes()).ok()
    }

    /// The identity name as raw bytes.
    pub fn name_bytes(&self) -> &[u8] {
        unsafe { CStr::from_ptr((*self.handle.as_ptr()).name).to_bytes() }
    }

    /// The email address, if valid UTF-8.
    pub fn email(&self) -> Option<&str> {
        std::str::from_utf8(self.email_bytes()).ok()
    }

    /// The email address as raw bytes.
    pub fn email_bytes(&self) -> &[u8] {
        unsafe { CStr::from_ptr((*self.handle.as_ptr()).email).to_bytes() }
    }

    /// When the action happened.
    pub fn when(&self) -> Time {
        unsafe {
            let when = &(*self.handle.as_ptr()).when;
            Time::new(when.time, when.offset)
        }
    }

    /// Copy this identity into an independently owned signature.
    pub fn to_owned(&self) -> Result<Signature<'static>, Error> {
        let name = CString::new(self.name_bytes())
            .map_err(|_| Error::invalid("signature name contains a NUL byte"))?;
        let email = CString::new(self.email_bytes())
            .map_err(|_| Error::invalid("signature email contains a NUL byte"))?;
        let when = self.when();
        let engine = Engine::acquire()?;
        let mut ptr = std::ptr::null_mut();
        unsafe {
            check(raw::git_signature_new(
                &mut ptr,
                name.as_ptr(),
                email.as_ptr(),
                when.seconds,
                when.offset_minutes,
            ))?;
            Ok(Signature::from_raw_owned(ptr, engine))
        }
    }

    pub(crate) fn raw_const(&self) -> *const raw::git_signature {
        self.handle.as_ptr()
    }
}

impl std::fmt::Debug for Signature<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signature")
            .field("name", &String::from_utf8_lossy(self.name_bytes()))
            .field("email", &String::from_utf8_lossy(self.email_bytes()))
            .finish()
    }
}

impl std::fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} <{}>",
            String::from_utf8_lossy(self.name_bytes()),
            String::from_utf8_lossy(self.email_bytes())
        )
    }
}

fn cstring(s: &str) -> Result<CString, Error> {
    CString::new(s).map_err(|_| Error::invalid("string contains an interior NUL byte"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_timestamp() {
        let sig = Signature::new("Ada", "ada@example.com", Time::new(1_700_000_000, 120)).unwrap();
        assert_eq!(sig.name(), Some("Ada"));
        assert_eq!(sig.email(), Some("ada@example.com"));
        assert_eq!(sig.when().seconds(), 1_700_000_000);
        assert_eq!(sig.when().offset_minutes(), 120);
        assert_eq!(sig.to_string(), "Ada <ada@example.com>");
    }

    #[test]
    fn now_stamps_a_time() {
        let sig = Signature::now("Ada", "ada@example.com").unwrap();
        assert!(sig.when().seconds() > 0);
    }

    #[test]
    fn to_owned_is_independent() {
        let copy = {
            let original =
                Signature::new("Ada", "ada@example.com", Time::new(42, 0)).unwrap();
            original.to_owned().unwrap()
        };
        assert_eq!(copy.name(), Some("Ada"));
        assert_eq!(copy.when().seconds(), 42);
    }

    #[test]
    fn interior_nul_is_rejected() {
        assert!(Signature::now("A\0da", "a@example.com").is_err());
    }
}
