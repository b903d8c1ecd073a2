//! Safe binding layer for a chromaprint-style native audio fingerprinter.
//!
//! One [`Fingerprinter`] exclusively owns one opaque native context for its
//! whole life. Construction takes a flat, duck-typed key/value pair list;
//! recognized options (`algorithm`, `silence_threshold`) configure the
//! native side, everything else lands in a host-visible attribute overlay
//! that never touches the handle.
//!
//! Release happens exactly once, either when the [`Fingerprinter`] is
//! dropped or through the consuming [`Fingerprinter::close`] for callers
//! that need deterministic timing. There is no third path to the native
//! free call.
//!
//! # Backends
//! By default the crate uses the bundled in-process [`stub`] backend so it
//! builds and tests without libchromaprint installed. Enable the
//! `system-chromaprint` feature to link the system library instead.
//!
//! # Thread safety
//! The native context has no internal synchronization; [`Fingerprinter`]
//! is deliberately `!Send`/`!Sync`. Cross-thread use requires external
//! mutual exclusion supplied by the caller.

mod algorithm;
mod attributes;
mod config;
mod context;
mod error;
mod ffi;
mod fingerprinter;

pub use crate::algorithm::Algorithm;
pub use crate::attributes::{AttributeOverlay, RESERVED_CONTEXT_KEY};
pub use crate::config::{ALGORITHM_KEY, SILENCE_THRESHOLD_KEY};
pub use crate::context::version;
pub use crate::error::{ConfigurationWarning, Error, Result};
pub use crate::fingerprinter::Fingerprinter;

/// Instrumented stand-in for libchromaprint, active unless the
/// `system-chromaprint` feature links the real library.
#[cfg(not(feature = "system-chromaprint"))]
pub use crate::ffi::stub;
