use thiserror::Error;

/// Setup-time failures.
///
/// Per-cookie problems are never surfaced as errors; they are reported as
/// [`Diagnostic`](crate::base::diagnostic::Diagnostic)s and the batch continues.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid initiator URL {url:?}: {source}")]
    InvalidInitiatorUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Initiator URL {url:?} has no host")]
    InitiatorWithoutHost { url: String },

    #[error("Invalid cookie name pattern {pattern:?}: {source}")]
    InvalidNamePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read configuration {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ScanError {
    pub fn invalid_initiator_url(url: impl Into<String>, source: url::ParseError) -> Self {
        ScanError::InvalidInitiatorUrl {
            url: url.into(),
            source,
        }
    }

    pub fn initiator_without_host(url: impl Into<String>) -> Self {
        ScanError::InitiatorWithoutHost { url: url.into() }
    }

    pub fn invalid_name_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        ScanError::InvalidNamePattern {
            pattern: pattern.into(),
            source,
        }
    }

    pub fn config_io(path: impl Into<String>, source: std::io::Error) -> Self {
        ScanError::ConfigIo {
            path: path.into(),
            source,
        }
    }

    pub fn json(what: &'static str, source: serde_json::Error) -> Self {
        ScanError::Json { what, source }
    }
}
