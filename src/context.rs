//! RAII owner of the native chromaprint context.
//!
//! The lifecycle is `create → use → release`, mapped onto Rust ownership:
//! the only path to `chromaprint_free` is [`Drop`], and dropping requires
//! owning the value, so a second release is unrepresentable rather than
//! merely checked. The native free call is not guaranteed to tolerate an
//! already-freed handle, which is why this must hold structurally.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::ptr::NonNull;
use tracing::debug;

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::ffi::raw;

/// Exclusive owner of one native context.
///
/// Not `Clone`, and the raw-pointer field keeps it `!Send`/`!Sync`: the
/// native context has no internal synchronization, so exclusive
/// single-owner access is the correctness invariant.
#[derive(Debug)]
pub(crate) struct NativeContext {
    ptr: NonNull<c_void>,
}

impl NativeContext {
    /// Invoke the native factory.
    ///
    /// # Errors
    /// [`Error::ContextCreationFailed`] if the factory returns null; the
    /// caller's construction aborts with nothing to clean up.
    pub(crate) fn create(algorithm: Algorithm) -> Result<Self> {
        let ptr = unsafe { raw::chromaprint_new(algorithm.code()) };
        let ptr = NonNull::new(ptr).ok_or(Error::ContextCreationFailed(algorithm.code()))?;
        debug!(algorithm = algorithm.name(), "created chromaprint context");
        Ok(Self { ptr })
    }

    /// Native pointer identity, recorded in the overlay's reserved entry.
    pub(crate) fn identity(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Forward an option to the native side.
    ///
    /// Best-effort by contract: the native call's return value carries no
    /// usable signal across library builds, so it is ignored and nothing
    /// downstream depends on the option having applied. A name with an
    /// interior NUL cannot be represented to C and is dropped.
    pub(crate) fn set_option(&self, name: &str, value: i32) {
        if let Ok(name) = CString::new(name) {
            let _ = unsafe {
                raw::chromaprint_set_option(self.ptr.as_ptr(), name.as_ptr(), value as c_int)
            };
        }
    }

    /// Advisory native algorithm query. A stub in some library builds;
    /// never used as a source of truth.
    pub(crate) fn query_algorithm(&self) -> i32 {
        unsafe { raw::chromaprint_get_algorithm(self.ptr.as_ptr()) }
    }

    pub(crate) fn start(&mut self, sample_rate: u32, num_channels: u8) -> Result<()> {
        let result = unsafe {
            raw::chromaprint_start(self.ptr.as_ptr(), sample_rate as c_int, num_channels as c_int)
        };

        if result == 0 {
            Err(Error::StartFailed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn feed(&mut self, samples: &[i16]) -> Result<()> {
        let result = unsafe {
            raw::chromaprint_feed(self.ptr.as_ptr(), samples.as_ptr(), samples.len() as c_int)
        };

        if result == 0 {
            Err(Error::FeedFailed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn finish(&mut self) -> Result<()> {
        let result = unsafe { raw::chromaprint_finish(self.ptr.as_ptr()) };

        if result == 0 {
            Err(Error::FinishFailed)
        } else {
            Ok(())
        }
    }

    /// Copy out the compressed fingerprint and return the native buffer.
    pub(crate) fn fingerprint(&self) -> Result<String> {
        let mut c_fingerprint: *mut c_char = std::ptr::null_mut();

        let result =
            unsafe { raw::chromaprint_get_fingerprint(self.ptr.as_ptr(), &mut c_fingerprint) };

        if result == 0 {
            return Err(Error::FingerprintGenerationFailed);
        }

        if c_fingerprint.is_null() {
            return Err(Error::NullPointerReturned);
        }

        let fingerprint = unsafe {
            let c_str = CStr::from_ptr(c_fingerprint);
            c_str.to_string_lossy().into_owned()
        };

        // The native side owns the buffer; hand it back or it leaks.
        unsafe {
            raw::chromaprint_dealloc(c_fingerprint as *mut c_void);
        }

        Ok(fingerprint)
    }
}

impl Drop for NativeContext {
    fn drop(&mut self) {
        unsafe {
            raw::chromaprint_free(self.ptr.as_ptr());
        }
        debug!("released chromaprint context");
    }
}

/// Chromaprint library version reported by the active backend.
pub fn version() -> String {
    unsafe {
        let c_version = raw::chromaprint_get_version();
        let c_str = CStr::from_ptr(c_version);
        c_str.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_yields_nonzero_identity() {
        let ctx = NativeContext::create(Algorithm::Test2).unwrap();
        assert_ne!(ctx.identity(), 0);
    }

    #[test]
    fn test_set_option_never_fails() {
        let ctx = NativeContext::create(Algorithm::Test2).unwrap();
        // No return value to assert on; the contract is that this cannot
        // fail the caller.
        ctx.set_option("silence_threshold", 100);
        ctx.set_option("not_a_real_option", -5);
        ctx.set_option("nul\0bearing", 1);
    }

    #[test]
    fn test_get_version() {
        let version = version();
        assert!(!version.is_empty(), "Version string should not be empty");
        assert!(version.contains('.'), "Version should contain dot separator");
    }

    #[cfg(not(feature = "system-chromaprint"))]
    #[test]
    fn test_stub_algorithm_query_is_advisory_only() {
        let ctx = NativeContext::create(Algorithm::Test4).unwrap();
        // The stub backend mirrors native builds where the query is
        // unimplemented; the answer is not the configured code.
        assert_eq!(ctx.query_algorithm(), -1);
    }
}
