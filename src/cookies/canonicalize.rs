//! Stable names for instance-specific cookies.
//!
//! Some cookies embed timestamps, ids or nonces in their *name*
//! (`_cs_1567795486325`, `KRTBCOOKIE_244`). Reports group them under a
//! template name so the same cookie is recognized across scans.

use crate::base::scanerror::ScanError;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

/// Built-in rules, applied in order.
pub const DEFAULT_NAME_RULES: &[(&str, &str)] = &[
    (r"^_cs_\d+", "_cs_x"),
    (r"^OpenIdConnect\.nonce\..+", "OpenIdConnect.nonce.x"),
    (r"^SignInMessage\..+", "SignInMessage.x"),
    (r"^KRTBCOOKIE_.+", "KRTBCOOKIE_x"),
    (r"^uid-bp-.+", "uid-bp-x"),
    (r"^sync_\d+", "sync_x"),
    (r"^adm_.+", "adm_x"),
    (r"^ra1_pd_.+", "ra1_pd_x"),
];

/// A (pattern, replacement) pair as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRule {
    pub pattern: String,
    pub replacement: String,
}

impl NameRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// The built-in rule list.
    pub fn defaults() -> Vec<NameRule> {
        DEFAULT_NAME_RULES
            .iter()
            .map(|(pattern, replacement)| NameRule::new(*pattern, *replacement))
            .collect()
    }
}

/// Ordered list of compiled rename rules.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    rules: Vec<(Regex, String)>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        let rules = DEFAULT_NAME_RULES
            .iter()
            .map(|(pattern, replacement)| {
                (
                    Regex::new(pattern).expect("Invalid built-in cookie name pattern"),
                    replacement.to_string(),
                )
            })
            .collect();
        Self { rules }
    }
}

impl Canonicalizer {
    /// Compile configured rules. Fails on the first invalid pattern.
    pub fn from_rules(rules: &[NameRule]) -> Result<Self, ScanError> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.replacement.clone()))
                    .map_err(|e| ScanError::invalid_name_pattern(rule.pattern.as_str(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// A canonicalizer that never renames.
    pub fn identity() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order over the name. Each rule replaces its first
    /// match literally, so one name can be rewritten by several rules.
    pub fn canonicalize(&self, name: &str) -> String {
        self.rules
            .iter()
            .fold(name.to_string(), |name, (pattern, replacement)| {
                pattern
                    .replace(&name, NoExpand(replacement.as_str()))
                    .into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules() {
        let canonicalizer = Canonicalizer::default();
        assert_eq!(canonicalizer.canonicalize("_cs_1567795486325"), "_cs_x");
        assert_eq!(
            canonicalizer.canonicalize("OpenIdConnect.nonce.6FhPBNvmcAm8CguZQiol%2FTo3es8eW1jo3Vyq68P8sRI%3D"),
            "OpenIdConnect.nonce.x"
        );
        assert_eq!(
            canonicalizer.canonicalize("SignInMessage.d2ff5a0c98a576c3cef63e1c073807a6"),
            "SignInMessage.x"
        );
        assert_eq!(canonicalizer.canonicalize("KRTBCOOKIE_244"), "KRTBCOOKIE_x");
        assert_eq!(canonicalizer.canonicalize("uid-bp-11554"), "uid-bp-x");
        assert_eq!(canonicalizer.canonicalize("sync_16248314"), "sync_x");
        assert_eq!(canonicalizer.canonicalize("adm_DLDdwoAvzlrj4hE36dBo-g"), "adm_x");
        assert_eq!(canonicalizer.canonicalize("ra1_pd_454828976"), "ra1_pd_x");
    }

    #[test]
    fn test_unmatched_names_pass_through() {
        let canonicalizer = Canonicalizer::default();
        assert_eq!(canonicalizer.canonicalize("_ga"), "_ga");
        assert_eq!(canonicalizer.canonicalize("sync_abc"), "sync_abc");
        assert_eq!(canonicalizer.canonicalize("x_cs_123"), "x_cs_123");
    }

    #[test]
    fn test_rules_apply_in_sequence() {
        let canonicalizer = Canonicalizer::from_rules(&[
            NameRule::new(r"^tmp_\d+", "session_1"),
            NameRule::new(r"^session_\d+", "session_x"),
        ])
        .unwrap();
        assert_eq!(canonicalizer.canonicalize("tmp_42"), "session_x");
    }

    #[test]
    fn test_replacement_is_literal() {
        let canonicalizer = Canonicalizer::from_rules(&[NameRule::new(r"^(a)_\d+", "$1_x")]).unwrap();
        assert_eq!(canonicalizer.canonicalize("a_1"), "$1_x");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Canonicalizer::from_rules(&[NameRule::new("(", "x")]).unwrap_err();
        assert!(matches!(err, ScanError::InvalidNamePattern { .. }));
    }

    #[test]
    fn test_idempotent() {
        let canonicalizer = Canonicalizer::default();
        for name in ["_cs_1", "KRTBCOOKIE_x", "OpenIdConnect.nonce.x", "adm_x", "plain"] {
            let once = canonicalizer.canonicalize(name);
            assert_eq!(canonicalizer.canonicalize(&once), once);
        }
    }

    #[test]
    fn test_defaults_match_builtin() {
        let configured = Canonicalizer::from_rules(&NameRule::defaults()).unwrap();
        assert_eq!(configured.len(), Canonicalizer::default().len());
    }
}
