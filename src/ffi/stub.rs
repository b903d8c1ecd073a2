//! In-process stand-in for libchromaprint.
//!
//! Same signatures as the real C API so `context.rs` compiles identically
//! against either backend. Fingerprints are deterministic (SHA-256 over the
//! fed PCM, base64-encoded), which is enough for callers exercising the
//! binding layer; nothing here approximates the real algorithm.
//!
//! The module also exposes what the real library cannot: a live-context
//! counter, a one-shot allocation-failure switch, and the most recently
//! applied option. Lifecycle tests are built on these.

use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::ChromaprintContextPtr;

static LIVE_CONTEXTS: AtomicUsize = AtomicUsize::new(0);
static FAIL_NEXT_CREATE: AtomicBool = AtomicBool::new(false);
static LAST_OPTION: Mutex<Option<(String, c_int)>> = Mutex::new(None);

/// Number of stub contexts currently allocated.
///
/// Process-wide; tests reading it must be serialized against tests that
/// create or drop contexts.
pub fn live_contexts() -> usize {
    LIVE_CONTEXTS.load(Ordering::SeqCst)
}

/// Make the next [`chromaprint_new`] call return null, mimicking native
/// allocation failure. One-shot; the flag clears when consumed.
pub fn fail_next_create() {
    FAIL_NEXT_CREATE.store(true, Ordering::SeqCst);
}

/// The most recent `(name, value)` passed to [`chromaprint_set_option`],
/// across all contexts.
pub fn last_option() -> Option<(String, c_int)> {
    LAST_OPTION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

struct StubContext {
    algorithm: c_int,
    started: bool,
    finished: bool,
    samples: Vec<i16>,
    fingerprint: Option<String>,
}

pub unsafe fn chromaprint_new(algorithm: c_int) -> ChromaprintContextPtr {
    if FAIL_NEXT_CREATE.swap(false, Ordering::SeqCst) {
        return std::ptr::null_mut();
    }
    LIVE_CONTEXTS.fetch_add(1, Ordering::SeqCst);
    Box::into_raw(Box::new(StubContext {
        algorithm,
        started: false,
        finished: false,
        samples: Vec::new(),
        fingerprint: None,
    })) as ChromaprintContextPtr
}

pub unsafe fn chromaprint_free(ctx: ChromaprintContextPtr) {
    drop(Box::from_raw(ctx as *mut StubContext));
    LIVE_CONTEXTS.fetch_sub(1, Ordering::SeqCst);
}

pub unsafe fn chromaprint_set_option(
    ctx: ChromaprintContextPtr,
    name: *const c_char,
    value: c_int,
) -> c_int {
    let _ = &*(ctx as *mut StubContext);
    let name = CStr::from_ptr(name).to_string_lossy().into_owned();
    *LAST_OPTION.lock().unwrap_or_else(PoisonError::into_inner) = Some((name, value));
    1
}

/// Mirrors the native builds where this entry point is an unimplemented
/// stub: the return value is not the configured algorithm.
pub unsafe fn chromaprint_get_algorithm(_ctx: ChromaprintContextPtr) -> c_int {
    -1
}

pub unsafe fn chromaprint_start(
    ctx: ChromaprintContextPtr,
    sample_rate: c_int,
    num_channels: c_int,
) -> c_int {
    if sample_rate <= 0 || num_channels <= 0 {
        return 0;
    }
    let ctx = &mut *(ctx as *mut StubContext);
    ctx.started = true;
    ctx.finished = false;
    ctx.samples.clear();
    ctx.fingerprint = None;
    1
}

pub unsafe fn chromaprint_feed(
    ctx: ChromaprintContextPtr,
    data: *const i16,
    size: c_int,
) -> c_int {
    let ctx = &mut *(ctx as *mut StubContext);
    if !ctx.started || ctx.finished || size < 0 {
        return 0;
    }
    ctx.samples
        .extend_from_slice(std::slice::from_raw_parts(data, size as usize));
    1
}

pub unsafe fn chromaprint_finish(ctx: ChromaprintContextPtr) -> c_int {
    let ctx = &mut *(ctx as *mut StubContext);
    if !ctx.started {
        return 0;
    }
    let mut hasher = Sha256::new();
    hasher.update(ctx.algorithm.to_le_bytes());
    for sample in &ctx.samples {
        hasher.update(sample.to_le_bytes());
    }
    ctx.fingerprint = Some(general_purpose::STANDARD.encode(hasher.finalize()));
    ctx.finished = true;
    1
}

pub unsafe fn chromaprint_get_fingerprint(
    ctx: ChromaprintContextPtr,
    fingerprint: *mut *mut c_char,
) -> c_int {
    let ctx = &*(ctx as *mut StubContext);
    match &ctx.fingerprint {
        // Base64 output has no interior NULs, but stay on the C
        // convention of signalling failure rather than panicking.
        Some(fp) => match CString::new(fp.as_str()) {
            Ok(c_fp) => {
                *fingerprint = c_fp.into_raw();
                1
            }
            Err(_) => 0,
        },
        None => 0,
    }
}

pub unsafe fn chromaprint_dealloc(ptr: *mut c_void) {
    drop(CString::from_raw(ptr as *mut c_char));
}

pub unsafe fn chromaprint_get_version() -> *const c_char {
    static VERSION: &CStr = c"1.5.1-stub";
    VERSION.as_ptr()
}
