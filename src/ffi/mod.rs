//! Native chromaprint surface consumed by the crate.
//!
//! Two interchangeable backends provide the same function set:
//! - `system-chromaprint` feature: links the system libchromaprint.
//! - default: the in-process [`stub`] backend, which honors the same
//!   contract and adds the instrumentation the lifecycle tests need
//!   (live-context counting, allocation-failure injection).
//!
//! The real library offers no way to observe handle leaks or to force
//! allocation failure, and linking it is a build-environment requirement
//! this crate should not impose by default.

use std::os::raw::c_void;

/// Opaque native context pointer. Validity is not independently
/// inspectable; ownership rules in `context.rs` are the only guard.
pub type ChromaprintContextPtr = *mut c_void;

#[cfg(not(feature = "system-chromaprint"))]
pub mod stub;

#[cfg(not(feature = "system-chromaprint"))]
pub(crate) use self::stub as raw;

#[cfg(feature = "system-chromaprint")]
mod sys {
    use super::ChromaprintContextPtr;
    use std::os::raw::{c_char, c_int, c_void};

    #[link(name = "chromaprint")]
    extern "C" {
        pub fn chromaprint_new(algorithm: c_int) -> ChromaprintContextPtr;
        pub fn chromaprint_free(ctx: ChromaprintContextPtr);

        // Returns int in the C header, but no caller in this crate may
        // depend on it: across library builds it carries no usable signal.
        pub fn chromaprint_set_option(
            ctx: ChromaprintContextPtr,
            name: *const c_char,
            value: c_int,
        ) -> c_int;

        // Advisory only; a stub in some library builds.
        pub fn chromaprint_get_algorithm(ctx: ChromaprintContextPtr) -> c_int;

        pub fn chromaprint_start(
            ctx: ChromaprintContextPtr,
            sample_rate: c_int,
            num_channels: c_int,
        ) -> c_int;

        pub fn chromaprint_feed(
            ctx: ChromaprintContextPtr,
            data: *const i16,
            size: c_int,
        ) -> c_int;

        pub fn chromaprint_finish(ctx: ChromaprintContextPtr) -> c_int;

        pub fn chromaprint_get_fingerprint(
            ctx: ChromaprintContextPtr,
            fingerprint: *mut *mut c_char,
        ) -> c_int;

        pub fn chromaprint_dealloc(ptr: *mut c_void);

        pub fn chromaprint_get_version() -> *const c_char;
    }
}

#[cfg(feature = "system-chromaprint")]
pub(crate) use self::sys as raw;
