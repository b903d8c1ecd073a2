//! Error and warning types for the binding layer.

use thiserror::Error;

/// Fatal errors raised by construction, attribute writes, and the
/// fingerprinting session.
///
/// Every variant is surfaced synchronously at the failing call; nothing in
/// this crate retries. Release of the native context has no error variant
/// at all — a double release is made unrepresentable by ownership, not
/// caught at runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// Constructor arguments did not form key/value pairs
    #[error("constructor arguments must form key/value pairs, got {0} items")]
    OddArgumentCount(usize),

    /// Constructor key was not a string
    #[error("attribute key must be a string, got {0}")]
    NonStringKey(String),

    /// Native context allocation failed
    #[error("failed to create chromaprint context (algorithm code {0})")]
    ContextCreationFailed(i32),

    /// Attempted write to the reserved handle-identity attribute
    #[error("attribute `{0}` is reserved and cannot be set")]
    ProtectedKey(String),

    /// Sample rate outside valid range (8000-192000 Hz)
    #[error("invalid sample rate: {0} Hz (must be 8000-192000 Hz)")]
    InvalidSampleRate(u32),

    /// Channel count not supported (must be 1 or 2)
    #[error("invalid channel count: {0} (must be 1 or 2)")]
    InvalidChannelCount(u8),

    /// Failed to start a fingerprinting session
    #[error("failed to start fingerprinting")]
    StartFailed,

    /// Failed to feed audio data to the fingerprinter
    #[error("failed to feed audio data")]
    FeedFailed,

    /// Failed to finalize fingerprinting
    #[error("failed to finish fingerprinting")]
    FinishFailed,

    /// Failed to generate the fingerprint string
    #[error("failed to generate fingerprint")]
    FingerprintGenerationFailed,

    /// Native call returned a null pointer where it promised a value
    #[error("FFI returned null pointer")]
    NullPointerReturned,
}

/// Result type for chromafp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal construction diagnostics.
///
/// Construction proceeds past these; they are emitted through
/// `tracing::warn!` as they are found and retained on the built
/// [`Fingerprinter`](crate::Fingerprinter) for callers that want to
/// inspect them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationWarning {
    /// Unrecognized algorithm name; the prior resolution is kept
    #[error("unknown algorithm `{requested}`, keeping `{kept}`")]
    UnknownAlgorithm {
        requested: String,
        kept: &'static str,
    },

    /// Unusable silence threshold (non-integer or outside 0-32767); skipped
    #[error("unusable silence_threshold value {value} (expected integer 0-32767), ignored")]
    InvalidSilenceThreshold { value: String },
}
