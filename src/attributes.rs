//! Host-visible attribute overlay, decoupled from the native handle.
//!
//! Reads and writes of non-protected keys never touch the native context.
//! The one exception to the generic surface is the reserved identity entry,
//! written once during construction and rejected on the generic write path,
//! so that what looks like "just an attribute" can never reach the live
//! resource.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Reserved key recording the native handle identity.
///
/// Written once at construction; [`AttributeOverlay::set`] rejects it.
pub const RESERVED_CONTEXT_KEY: &str = "_context";

/// Generic key/value state bag.
///
/// Values are owned outright: storing moves the value in, so later
/// caller-side mutation of a source can never reach stored state, and
/// [`AttributeOverlay::get`] hands out a shared view with no write path
/// back in.
#[derive(Debug, Default)]
pub struct AttributeOverlay {
    entries: HashMap<String, Value>,
}

impl AttributeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable view of an attribute, `None` if absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Store an attribute, overwriting any prior value for that key.
    ///
    /// # Errors
    /// Returns [`Error::ProtectedKey`] if `key` is [`RESERVED_CONTEXT_KEY`].
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        let key = key.into();
        if key == RESERVED_CONTEXT_KEY {
            return Err(Error::ProtectedKey(key));
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// One-time write of the reserved identity entry, bypassing the
    /// protection that applies to the generic path. Lifecycle-manager use
    /// only.
    pub(crate) fn record_context_identity(&mut self, identity: usize) {
        self.entries
            .insert(RESERVED_CONTEXT_KEY.to_string(), Value::from(identity as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_then_get_roundtrip() {
        let mut overlay = AttributeOverlay::new();
        overlay.set("artist", json!("Le Tigre")).unwrap();
        assert_eq!(overlay.get("artist"), Some(&json!("Le Tigre")));
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let mut overlay = AttributeOverlay::new();
        overlay.set("year", json!(1999)).unwrap();
        overlay.set("year", json!(2004)).unwrap();
        assert_eq!(overlay.get("year"), Some(&json!(2004)));
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn test_missing_key_is_none() {
        let overlay = AttributeOverlay::new();
        assert_eq!(overlay.get("missing"), None);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_reserved_key_rejected() {
        let mut overlay = AttributeOverlay::new();
        let err = overlay.set(RESERVED_CONTEXT_KEY, json!(0)).unwrap_err();
        assert!(matches!(err, Error::ProtectedKey(_)));
        assert!(!overlay.contains(RESERVED_CONTEXT_KEY));
    }

    #[test]
    fn test_reserved_entry_written_internally() {
        let mut overlay = AttributeOverlay::new();
        overlay.record_context_identity(0xdead_beef);
        assert_eq!(
            overlay.get(RESERVED_CONTEXT_KEY),
            Some(&json!(0xdead_beef_u64))
        );
        // Still protected after the internal write.
        assert!(overlay.set(RESERVED_CONTEXT_KEY, json!(1)).is_err());
    }
}
