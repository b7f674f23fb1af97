//! Ergonomic error context helpers.
//!
//! Extension traits that attach the offending input to `url`, `std::io`
//! and `serde_json` failures, converting them into [`ScanError`] variants.

use crate::base::scanerror::ScanError;
use std::io;
use std::path::Path;

/// Extension trait for adding context to URL parse results.
pub trait UrlResultExt<T> {
    /// Attach the initiator URL that failed to parse.
    ///
    /// # Example
    /// ```
    /// use cookiescan::base::context::UrlResultExt;
    ///
    /// let err = url::Url::parse("not a url").initiator_context("not a url").unwrap_err();
    /// assert!(err.to_string().contains("not a url"));
    /// ```
    fn initiator_context(self, url: &str) -> Result<T, ScanError>;
}

impl<T> UrlResultExt<T> for Result<T, url::ParseError> {
    fn initiator_context(self, url: &str) -> Result<T, ScanError> {
        self.map_err(|e| ScanError::invalid_initiator_url(url, e))
    }
}

/// Extension trait for adding context to IO results.
pub trait IoResultExt<T> {
    /// Attach the configuration path that could not be read.
    fn config_context(self, path: &Path) -> Result<T, ScanError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn config_context(self, path: &Path) -> Result<T, ScanError> {
        self.map_err(|e| ScanError::config_io(path.display().to_string(), e))
    }
}

/// Extension trait for adding context to JSON decoding results.
pub trait JsonResultExt<T> {
    fn json_context(self, what: &'static str) -> Result<T, ScanError>;
}

impl<T> JsonResultExt<T> for Result<T, serde_json::Error> {
    fn json_context(self, what: &'static str) -> Result<T, ScanError> {
        self.map_err(|e| ScanError::json(what, e))
    }
}
