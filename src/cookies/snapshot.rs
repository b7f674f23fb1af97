//! Cookies read back from a browser cookie store.
//!
//! At the end of a scan the browser's own jar is dumped and reported next
//! to the observed cookies, as a cross-check. Stored rows carry no
//! creation time or initiator, so the lifespan is estimated from "now".

use crate::base::timestamp::Timestamp;
use crate::cookies::canonicalize::Canonicalizer;
use crate::cookies::classify::{lifespan_days, MergedCookie};
use crate::cookies::psl::is_first_party;
use serde::{Deserialize, Serialize};

/// One cookie from a store snapshot (devtools `Network.getAllCookies` shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    #[serde(default)]
    pub value: String,
    /// Store domain; a leading dot marks a domain cookie.
    pub domain: String,
    pub path: String,
    /// Seconds since the epoch, fractional. Ignored for session cookies.
    #[serde(default)]
    pub expires: f64,
    pub session: bool,
}

impl StoredCookie {
    /// Host without the store's leading dot.
    pub fn host(&self) -> &str {
        self.domain.strip_prefix('.').unwrap_or(&self.domain)
    }

    /// Whole days left before expiry, counted from `now`, never negative.
    pub fn remaining_days(&self, now: Timestamp) -> u64 {
        let expires = Timestamp::from_millis_f64(self.expires * 1000.0);
        lifespan_days(expires.millis_since(now))
    }

    pub fn to_merged(
        &self,
        first_party_domain: &str,
        canonicalizer: &Canonicalizer,
        now: Timestamp,
    ) -> MergedCookie {
        let host = self.host();

        MergedCookie {
            name: canonicalizer.canonicalize(&self.name),
            host: host.to_string(),
            path: self.path.clone(),
            is_session: self.session,
            is_third_party: !is_first_party(host, first_party_domain),
            life_span: self.remaining_days(now),
            initiator: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(domain: &str, expires: f64, session: bool) -> StoredCookie {
        StoredCookie {
            name: "KRTBCOOKIE_244".into(),
            value: "v".into(),
            domain: domain.into(),
            path: "/".into(),
            expires,
            session,
        }
    }

    #[test]
    fn test_strips_leading_dot() {
        assert_eq!(stored(".example.com", 0.0, true).host(), "example.com");
        assert_eq!(stored("example.com", 0.0, true).host(), "example.com");
    }

    #[test]
    fn test_remaining_days() {
        let now = Timestamp::from_millis(0);
        assert_eq!(stored("a.com", 86_400.0, false).remaining_days(now), 1);
        assert_eq!(stored("a.com", 86_401.0, false).remaining_days(now), 2);
        assert_eq!(stored("a.com", -1.0, true).remaining_days(now), 0);
    }

    #[test]
    fn test_to_merged() {
        let row = stored(".ads.tracker.net", 10.0 * 86_400.0, false).to_merged(
            "example.com",
            &Canonicalizer::default(),
            Timestamp::from_millis(0),
        );
        assert_eq!(row.name, "KRTBCOOKIE_x");
        assert_eq!(row.host, "ads.tracker.net");
        assert!(row.is_third_party);
        assert!(!row.is_session);
        assert_eq!(row.life_span, 10);
        assert!(row.initiator.is_empty());
    }

    #[test]
    fn test_deserialize_store_row() {
        let row: StoredCookie = serde_json::from_str(
            r#"{"name":"a","value":"1","domain":".example.com","path":"/","expires":-1,"session":true}"#,
        )
        .unwrap();
        assert!(row.session);
        assert_eq!(row.expires, -1.0);
    }
}
