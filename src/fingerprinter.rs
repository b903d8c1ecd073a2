//! The managed fingerprinter object.
//!
//! Composes one exclusively-owned [`NativeContext`] with the host-visible
//! [`AttributeOverlay`]. Construction follows one fixed sequence: translate
//! arguments, create the context, apply recognized options, then finalize
//! the overlay. A failure anywhere aborts the whole construction; no
//! partially-built object escapes.

use serde_json::Value;

use crate::algorithm::Algorithm;
use crate::attributes::AttributeOverlay;
use crate::config::{self, ALGORITHM_KEY, SILENCE_THRESHOLD_KEY};
use crate::context::NativeContext;
use crate::error::{ConfigurationWarning, Error, Result};

/// Audio fingerprinter bound to one native chromaprint context.
///
/// Deliberately `!Send`/`!Sync` (via the owned context): the native side
/// has no internal synchronization, so cross-thread use needs external
/// mutual exclusion supplied by the caller.
#[derive(Debug)]
pub struct Fingerprinter {
    context: NativeContext,
    attributes: AttributeOverlay,
    algorithm: Algorithm,
    warnings: Vec<ConfigurationWarning>,
}

impl Fingerprinter {
    /// Construct from an ordered key/value pair list.
    ///
    /// Recognized keys: `algorithm` (symbolic name from the catalog;
    /// unknown values keep the prior resolution and surface a warning,
    /// duplicates apply last-write-wins) and `silence_threshold` (integer
    /// 0-32767, forwarded to the fresh context best-effort). Every other
    /// pair passes through verbatim into the attribute overlay.
    ///
    /// # Errors
    /// - [`Error::OddArgumentCount`] / [`Error::NonStringKey`] /
    ///   [`Error::ProtectedKey`] for malformed input, raised before any
    ///   native resource is touched.
    /// - [`Error::ContextCreationFailed`] if the native factory signals
    ///   allocation failure.
    ///
    /// # Example
    /// ```
    /// use chromafp::Fingerprinter;
    /// use serde_json::json;
    ///
    /// let fp = Fingerprinter::new([
    ///     json!("algorithm"), json!("test4"),
    ///     json!("artist"), json!("Le Tigre"),
    /// ])?;
    /// assert_eq!(fp.algorithm(), "test4");
    /// assert_eq!(fp.attribute("artist"), Some(&json!("Le Tigre")));
    /// # Ok::<(), chromafp::Error>(())
    /// ```
    pub fn new<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut resolved = config::resolve(args)?;

        let context = NativeContext::create(resolved.algorithm)?;
        if let Some(threshold) = resolved.silence_threshold {
            context.set_option(SILENCE_THRESHOLD_KEY, threshold);
        }

        resolved.attributes.record_context_identity(context.identity());
        // Host-visible mirror of the resolution; the typed field below
        // stays authoritative for `algorithm()`.
        resolved
            .attributes
            .set(ALGORITHM_KEY, Value::from(resolved.algorithm.name()))?;

        Ok(Self {
            context,
            attributes: resolved.attributes,
            algorithm: resolved.algorithm,
            warnings: resolved.warnings,
        })
    }

    /// Symbolic name of the resolved algorithm.
    ///
    /// Answered from the resolution cached at construction, never from
    /// `chromaprint_get_algorithm`: that entry point is an unimplemented
    /// stub in some native library builds, so a native round-trip cannot
    /// be the source of truth. See
    /// [`query_native_algorithm`](Self::query_native_algorithm) for the
    /// advisory native answer.
    pub fn algorithm(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Advisory native algorithm query. Diagnostic only: where the native
    /// build does not implement it, the value is meaningless.
    pub fn query_native_algorithm(&self) -> i32 {
        self.context.query_algorithm()
    }

    /// Construction diagnostics (unknown algorithm names, unusable
    /// silence thresholds). Also emitted through `tracing::warn!` when
    /// they were found.
    pub fn warnings(&self) -> &[ConfigurationWarning] {
        &self.warnings
    }

    /// Immutable view of an attribute, `None` if absent.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Write an attribute. Never touches the native context.
    ///
    /// # Errors
    /// [`Error::ProtectedKey`] for the reserved identity entry; the
    /// fingerprinter remains fully usable afterwards.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        self.attributes.set(key, value)
    }

    /// The whole overlay, read-only.
    pub fn attributes(&self) -> &AttributeOverlay {
        &self.attributes
    }

    /// Release the native context now instead of at drop time.
    ///
    /// Drop timing follows scope, which can be too late when many
    /// fingerprinters are held alive together; this is the deterministic
    /// path. Consuming `self` makes a second release a compile error, so
    /// this and the implicit drop path are mutually exclusive by
    /// construction.
    pub fn close(self) {
        drop(self.context);
    }

    /// Begin a fingerprinting session.
    ///
    /// # Errors
    /// Parameter validation (`sample_rate` 8000-192000 Hz, `num_channels`
    /// 1 or 2) happens before any native call.
    pub fn start(&mut self, sample_rate: u32, num_channels: u8) -> Result<()> {
        validate_parameters(sample_rate, num_channels)?;
        self.context.start(sample_rate, num_channels)
    }

    /// Feed 16-bit PCM samples into the current session.
    pub fn feed(&mut self, samples: &[i16]) -> Result<()> {
        self.context.feed(samples)
    }

    /// Finalize the current session.
    pub fn finish(&mut self) -> Result<()> {
        self.context.finish()
    }

    /// Retrieve the compressed fingerprint of the finished session as an
    /// owned base64 string.
    pub fn fingerprint(&self) -> Result<String> {
        self.context.fingerprint()
    }

    /// Generate a fingerprint from f32 samples in one call.
    ///
    /// # Arguments
    /// * `samples` - audio samples in f32 format [-1.0, 1.0]
    /// * `sample_rate` - sample rate in Hz (e.g., 44100)
    /// * `num_channels` - 1 (mono) or 2 (stereo)
    ///
    /// # Errors
    /// Returns an error if the parameters are out of range or any native
    /// session call fails.
    ///
    /// # Example
    /// ```
    /// use chromafp::Fingerprinter;
    ///
    /// let mut fp = Fingerprinter::new([])?;
    /// let samples = vec![0.0f32; 44100]; // 1 second of silence
    /// let fingerprint = fp.generate_fingerprint(&samples, 44100, 1)?;
    /// assert!(!fingerprint.is_empty());
    /// # Ok::<(), chromafp::Error>(())
    /// ```
    pub fn generate_fingerprint(
        &mut self,
        samples: &[f32],
        sample_rate: u32,
        num_channels: u8,
    ) -> Result<String> {
        validate_parameters(sample_rate, num_channels)?;
        self.context.start(sample_rate, num_channels)?;

        let pcm_samples = convert_f32_to_i16(samples);
        self.context.feed(&pcm_samples)?;
        self.context.finish()?;

        self.context.fingerprint()
    }
}

fn validate_parameters(sample_rate: u32, num_channels: u8) -> Result<()> {
    // Chromaprint supports 8kHz - 192kHz
    if !(8000..=192000).contains(&sample_rate) {
        return Err(Error::InvalidSampleRate(sample_rate));
    }

    // Only mono or stereo
    if !(1..=2).contains(&num_channels) {
        return Err(Error::InvalidChannelCount(num_channels));
    }

    Ok(())
}

/// Convert f32 samples [-1.0, 1.0] to i16 PCM [-32768, 32767], clamping
/// out-of-range input.
fn convert_f32_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&sample| {
            let scaled = sample * 32767.0;
            scaled.clamp(-32768.0, 32767.0) as i16
        })
        .collect()
}
