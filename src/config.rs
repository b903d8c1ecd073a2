//! Constructor-argument translation.
//!
//! Splits the flat, duck-typed pair list into the native-affecting options
//! (`algorithm`, `silence_threshold`) and the opaque attribute overlay.
//! Translation runs to completion before any native resource is touched,
//! so a malformed argument list can never leak a context.

use serde_json::Value;
use tracing::warn;

use crate::algorithm::Algorithm;
use crate::attributes::AttributeOverlay;
use crate::error::{ConfigurationWarning, Error, Result};

/// Key selecting the fingerprint algorithm.
pub const ALGORITHM_KEY: &str = "algorithm";

/// Key carrying the silence threshold, applied to the fresh context
/// post-creation (best-effort).
pub const SILENCE_THRESHOLD_KEY: &str = "silence_threshold";

/// libchromaprint's documented domain for silence_threshold.
const SILENCE_THRESHOLD_MAX: i64 = 32767;

#[derive(Debug)]
pub(crate) struct ResolvedConfig {
    pub algorithm: Algorithm,
    pub silence_threshold: Option<i32>,
    pub attributes: AttributeOverlay,
    pub warnings: Vec<ConfigurationWarning>,
}

/// Translate the ordered pair list into a [`ResolvedConfig`].
///
/// Recognized keys apply last-write-wins. Unknown algorithm names and
/// unusable thresholds downgrade to [`ConfigurationWarning`]s; only a
/// malformed list (odd length, non-string key) or a write to the reserved
/// identity key is fatal.
pub(crate) fn resolve<I>(args: I) -> Result<ResolvedConfig>
where
    I: IntoIterator<Item = Value>,
{
    let args: Vec<Value> = args.into_iter().collect();
    if args.len() % 2 != 0 {
        return Err(Error::OddArgumentCount(args.len()));
    }

    let mut resolved = ResolvedConfig {
        algorithm: Algorithm::default(),
        silence_threshold: None,
        attributes: AttributeOverlay::new(),
        warnings: Vec::new(),
    };

    let mut items = args.into_iter();
    while let (Some(key), Some(value)) = (items.next(), items.next()) {
        let key = match key {
            Value::String(key) => key,
            other => return Err(Error::NonStringKey(other.to_string())),
        };
        match key.as_str() {
            ALGORITHM_KEY => resolve_algorithm(&value, &mut resolved),
            SILENCE_THRESHOLD_KEY => resolve_threshold(&value, &mut resolved),
            _ => resolved.attributes.set(key, value)?,
        }
    }

    Ok(resolved)
}

fn resolve_algorithm(value: &Value, resolved: &mut ResolvedConfig) {
    match value.as_str().and_then(Algorithm::from_name) {
        Some(algorithm) => resolved.algorithm = algorithm,
        None => {
            let requested = value
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| value.to_string());
            let warning = ConfigurationWarning::UnknownAlgorithm {
                requested,
                kept: resolved.algorithm.name(),
            };
            warn!("{warning}");
            resolved.warnings.push(warning);
        }
    }
}

fn resolve_threshold(value: &Value, resolved: &mut ResolvedConfig) {
    // Numeric strings are accepted; callers migrating from stringly-typed
    // option bags pass thresholds both ways.
    let parsed = value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()));
    match parsed {
        Some(threshold) if (0..=SILENCE_THRESHOLD_MAX).contains(&threshold) => {
            resolved.silence_threshold = Some(threshold as i32);
        }
        _ => {
            let warning = ConfigurationWarning::InvalidSilenceThreshold {
                value: value.to_string(),
            };
            warn!("{warning}");
            resolved.warnings.push(warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::RESERVED_CONTEXT_KEY;
    use serde_json::json;

    #[test]
    fn test_empty_args_resolve_to_defaults() {
        let resolved = resolve([]).unwrap();
        assert_eq!(resolved.algorithm, Algorithm::Test2);
        assert_eq!(resolved.silence_threshold, None);
        assert!(resolved.attributes.is_empty());
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_odd_argument_count_fails() {
        let err = resolve([json!("algorithm")]).unwrap_err();
        assert!(matches!(err, Error::OddArgumentCount(1)));

        let err = resolve([json!("a"), json!(1), json!("b")]).unwrap_err();
        assert!(matches!(err, Error::OddArgumentCount(3)));
    }

    #[test]
    fn test_non_string_key_fails() {
        let err = resolve([json!(42), json!("value")]).unwrap_err();
        assert!(matches!(err, Error::NonStringKey(_)));
    }

    #[test]
    fn test_known_algorithm_resolves() {
        let resolved = resolve([json!("algorithm"), json!("test4")]).unwrap();
        assert_eq!(resolved.algorithm, Algorithm::Test4);
        assert!(resolved.warnings.is_empty());
        // Recognized key is not an opaque attribute.
        assert!(!resolved.attributes.contains(ALGORITHM_KEY));
    }

    #[test]
    fn test_unknown_algorithm_warns_and_keeps_default() {
        let resolved = resolve([json!("algorithm"), json!("bogus")]).unwrap();
        assert_eq!(resolved.algorithm, Algorithm::Test2);
        assert_eq!(
            resolved.warnings,
            vec![ConfigurationWarning::UnknownAlgorithm {
                requested: "bogus".into(),
                kept: "test2",
            }]
        );
    }

    #[test]
    fn test_duplicate_algorithm_last_write_wins() {
        let resolved = resolve([
            json!("algorithm"),
            json!("test1"),
            json!("algorithm"),
            json!("test3"),
        ])
        .unwrap();
        assert_eq!(resolved.algorithm, Algorithm::Test3);
    }

    #[test]
    fn test_unknown_algorithm_keeps_earlier_resolution() {
        let resolved = resolve([
            json!("algorithm"),
            json!("test4"),
            json!("algorithm"),
            json!("bogus"),
        ])
        .unwrap();
        assert_eq!(resolved.algorithm, Algorithm::Test4);
        assert_eq!(
            resolved.warnings,
            vec![ConfigurationWarning::UnknownAlgorithm {
                requested: "bogus".into(),
                kept: "test4",
            }]
        );
    }

    #[test]
    fn test_opaque_pairs_land_in_overlay() {
        let resolved = resolve([
            json!("artist"),
            json!("Le Tigre"),
            json!("year"),
            json!(1999),
        ])
        .unwrap();
        assert_eq!(resolved.attributes.get("artist"), Some(&json!("Le Tigre")));
        assert_eq!(resolved.attributes.get("year"), Some(&json!(1999)));
        assert_eq!(resolved.attributes.len(), 2);
    }

    #[test]
    fn test_threshold_parsed_from_integer_and_string() {
        let resolved = resolve([json!("silence_threshold"), json!(100)]).unwrap();
        assert_eq!(resolved.silence_threshold, Some(100));

        let resolved = resolve([json!("silence_threshold"), json!("250")]).unwrap();
        assert_eq!(resolved.silence_threshold, Some(250));
    }

    #[test]
    fn test_unusable_threshold_warns_and_skips() {
        for bad in [json!(-1), json!(40000), json!("loud"), json!(1.5)] {
            let resolved = resolve([json!("silence_threshold"), bad]).unwrap();
            assert_eq!(resolved.silence_threshold, None);
            assert!(matches!(
                resolved.warnings[0],
                ConfigurationWarning::InvalidSilenceThreshold { .. }
            ));
        }
    }

    #[test]
    fn test_reserved_key_in_args_fails() {
        let err = resolve([json!(RESERVED_CONTEXT_KEY), json!(7)]).unwrap_err();
        assert!(matches!(err, Error::ProtectedKey(_)));
    }
}
