//! Scan configuration.
//!
//! Loaded from JSON with camelCase keys:
//!
//! ```json
//! {
//!   "firstPartyDomain": "wikipedia.org",
//!   "allowedProtocols": ["http", "https"],
//!   "canonicalNames": [{ "pattern": "^_cs_\\d+", "replacement": "_cs_x" }]
//! }
//! ```
//!
//! Every key is optional; omitted keys take the defaults below.

use crate::base::context::{IoResultExt, JsonResultExt};
use crate::base::scanerror::ScanError;
use crate::cookies::canonicalize::{Canonicalizer, NameRule};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_allowed_protocols() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    /// Site under scan; cookies outside its eTLD+1 are third-party.
    pub first_party_domain: String,
    /// URL schemes that can carry cookies ("https" or "https:").
    pub allowed_protocols: Vec<String>,
    /// Ordered cookie name rewrite rules.
    pub canonical_names: Vec<NameRule>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            first_party_domain: String::new(),
            allowed_protocols: default_allowed_protocols(),
            canonical_names: NameRule::defaults(),
        }
    }
}

impl ScanConfig {
    pub fn new(first_party_domain: impl Into<String>) -> Self {
        Self {
            first_party_domain: first_party_domain.into().to_lowercase(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        let mut config: ScanConfig = serde_json::from_str(json).json_context("scan configuration")?;
        config.first_party_domain = config.first_party_domain.to_lowercase();
        tracing::debug!(
            first_party_domain = %config.first_party_domain,
            rules = config.canonical_names.len(),
            "loaded scan configuration"
        );
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).config_context(path)?;
        Self::from_json(&json)
    }

    /// Compile the configured name rules.
    pub fn canonicalizer(&self) -> Result<Canonicalizer, ScanError> {
        Canonicalizer::from_rules(&self.canonical_names)
    }

    /// Whether a URL's scheme may carry cookies.
    pub fn allows_url(&self, url: &str) -> bool {
        url.split_once(':').is_some_and(|(scheme, _)| {
            self.allowed_protocols
                .iter()
                .any(|allowed| allowed.trim_end_matches(':').eq_ignore_ascii_case(scheme))
        })
    }
}
