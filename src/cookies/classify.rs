//! Report-facing cookie rows and their ordering.

use crate::base::timestamp::MILLIS_PER_DAY;
use crate::cookies::canonicalize::Canonicalizer;
use crate::cookies::cookierecord::CookieRecord;
use crate::cookies::psl::is_first_party;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of a cookie report.
///
/// This is the stable output shape consumed by CSV/HTML/JSON renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedCookie {
    pub name: String,
    pub host: String,
    pub path: String,
    pub is_session: bool,
    pub is_third_party: bool,
    /// Whole days, never negative. Zero for session cookies.
    pub life_span: u64,
    /// Flattened initiator; empty when unknown.
    #[serde(default)]
    pub initiator: String,
}

/// Ceil of a millisecond lifetime in days, floored at zero.
pub fn lifespan_days(max_age_millis: i64) -> u64 {
    if max_age_millis <= 0 {
        return 0;
    }
    let days = max_age_millis / MILLIS_PER_DAY + i64::from(max_age_millis % MILLIS_PER_DAY != 0);
    days as u64
}

/// Derive the report row for a parsed cookie.
///
/// A cookie with Max-Age=0 is persistent by RFC 6265 but reported as a
/// session cookie, since it never outlives the page.
pub fn classify(
    record: &CookieRecord,
    first_party_domain: &str,
    canonicalizer: &Canonicalizer,
) -> MergedCookie {
    let max_age = record.max_age_millis();

    MergedCookie {
        name: canonicalizer.canonicalize(record.name()),
        host: record.domain().to_string(),
        path: record.path().to_string(),
        is_session: !record.persistent() || max_age <= 0,
        is_third_party: !is_first_party(record.domain(), first_party_domain),
        life_span: if record.persistent() {
            lifespan_days(max_age)
        } else {
            0
        },
        initiator: record
            .initiator()
            .map(|initiator| initiator.flatten())
            .unwrap_or_default(),
    }
}

// `str` ordering is by code point. UTF-16 unit order differs only between
// supplementary characters and U+E000..=U+FFFF.
fn compare(a: &MergedCookie, b: &MergedCookie) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.host.cmp(&b.host))
        .then_with(|| a.path.cmp(&b.path))
}

/// Sort by (name, host, path), case-sensitive ascending. Stable.
pub fn sort_cookies(cookies: &mut [MergedCookie]) {
    cookies.sort_by(compare);
}
