//! Report pipeline: classify, merge, sort.

use crate::base::context::JsonResultExt;
use crate::base::scanerror::ScanError;
use crate::base::timestamp::Timestamp;
use crate::cookies::classify::{classify, sort_cookies, MergedCookie};
use crate::cookies::cookierecord::CookieRecord;
use crate::cookies::merger::merge_cookies;
use crate::cookies::snapshot::StoredCookie;
use crate::scan::config::ScanConfig;
use serde::{Deserialize, Serialize};

/// Ordered, deduplicated cookie rows. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieReport {
    cookies: Vec<MergedCookie>,
}

impl CookieReport {
    /// Build a report from records in arrival order.
    pub fn from_records(records: &[CookieRecord], config: &ScanConfig) -> Result<Self, ScanError> {
        let canonicalizer = config.canonicalizer()?;
        let rows = records
            .iter()
            .map(|record| classify(record, &config.first_party_domain, &canonicalizer));
        Ok(Self::from_rows(rows))
    }

    /// Build a report from a cookie store snapshot taken at `now`.
    pub fn from_snapshot(
        stored: &[StoredCookie],
        config: &ScanConfig,
        now: Timestamp,
    ) -> Result<Self, ScanError> {
        let canonicalizer = config.canonicalizer()?;
        let rows = stored
            .iter()
            .map(|cookie| cookie.to_merged(&config.first_party_domain, &canonicalizer, now));
        Ok(Self::from_rows(rows))
    }

    /// Merge and sort already classified rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = MergedCookie>,
    {
        let mut cookies = merge_cookies(rows);
        sort_cookies(&mut cookies);
        tracing::debug!(cookies = cookies.len(), "built cookie report");
        Self { cookies }
    }

    pub fn cookies(&self) -> &[MergedCookie] {
        &self.cookies
    }

    pub fn into_cookies(self) -> Vec<MergedCookie> {
        self.cookies
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn third_party(&self) -> impl Iterator<Item = &MergedCookie> {
        self.cookies.iter().filter(|c| c.is_third_party)
    }

    pub fn to_json(&self) -> Result<String, ScanError> {
        serde_json::to_string_pretty(self).json_context("cookie report")
    }
}
