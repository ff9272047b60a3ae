//! Rewrite configuration.

use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sources whose primary export already lives under `.default`.
///
/// Babel's runtime helpers are compiled this way, so a lone default import of
/// one of them must read `require(..).default` instead of the module object.
pub const BABEL_RUNTIME_PATTERN: &str = r"@babel/runtime[\\/]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteOptions {
    /// Regular expressions matched against import sources. A match marks the
    /// source as already interop-normalized.
    pub interop_default_patterns: Vec<String>,
    /// Rename user bindings called `module`, `exports` or `require` before
    /// rewriting.
    pub rename_reserved: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            interop_default_patterns: vec![BABEL_RUNTIME_PATTERN.to_string()],
            rename_reserved: true,
        }
    }
}

impl RewriteOptions {
    pub fn compile(&self) -> Result<InteropPolicy, ConfigError> {
        let patterns = self
            .interop_default_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidInteropPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InteropPolicy { patterns })
    }
}

/// Compiled form of [`RewriteOptions::interop_default_patterns`].
#[derive(Debug, Clone, Default)]
pub struct InteropPolicy {
    patterns: Vec<Regex>,
}

impl InteropPolicy {
    /// Whether `source` stores its primary export under `.default`.
    pub fn is_normalized(&self, source: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_babel_runtime_helpers() {
        let policy = RewriteOptions::default().compile().unwrap();
        assert!(policy.is_normalized("@babel/runtime/helpers/interopRequireDefault"));
        assert!(policy.is_normalized(r"@babel/runtime\helpers\extends"));
        assert!(!policy.is_normalized("@babel/runtime"));
        assert!(!policy.is_normalized("@babel/core"));
        assert!(!policy.is_normalized("lodash"));
    }

    #[test]
    fn test_empty_policy_matches_nothing() {
        let policy = InteropPolicy::default();
        assert!(!policy.is_normalized("@babel/runtime/helpers/x"));
    }

    #[test]
    fn test_invalid_pattern() {
        let options = RewriteOptions {
            interop_default_patterns: vec!["(".to_string()],
            ..Default::default()
        };
        let err = options.compile().unwrap_err();
        assert!(err.to_string().starts_with("invalid interop pattern `(`"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let options: RewriteOptions =
            serde_json::from_str(r#"{ "rename_reserved": false }"#).unwrap();
        assert!(!options.rename_reserved);
        assert_eq!(options.interop_default_patterns, vec![BABEL_RUNTIME_PATTERN]);

        let err = serde_json::from_str::<RewriteOptions>(r#"{ "unknown": 1 }"#);
        assert!(err.is_err());
    }
}
