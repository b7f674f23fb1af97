use crate::base::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed cookie, as it would be stored after RFC 6265 section 5.3.
///
/// Built once by the parser (or a [`CookieRecordBuilder`]) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    name: String,
    value: String,
    creation_time: Timestamp,
    expiry_time: Timestamp,
    persistent: bool,
    host_only: bool,
    domain: String,
    path: String,
    secure_only: bool,
    http_only: bool,
    same_site: SameSite,
    initiator: Option<Initiator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    #[default]
    None,
}

impl SameSite {
    const ALL: [SameSite; 3] = [SameSite::Strict, SameSite::Lax, SameSite::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    /// Case-insensitive lookup of an attribute value. Unknown values map to `None`.
    pub fn from_attribute(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::ALL.into_iter().find(|s| s.as_str().eq_ignore_ascii_case(v)))
            .unwrap_or_default()
    }
}

/// What caused a cookie to be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitiatorType {
    /// A `Set-Cookie` response header.
    Network,
    /// A `document.cookie` write.
    Script,
}

/// One resolved call-stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub url: String,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.url, self.line, self.col)
    }
}

/// The script or network exchange that set a cookie.
///
/// Stack frames are opaque `url:line:col` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initiator {
    pub kind: InitiatorType,
    pub url: String,
    pub stack: Vec<String>,
}

impl Initiator {
    pub fn new(kind: InitiatorType, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            stack: Vec::new(),
        }
    }

    pub fn network(url: impl Into<String>) -> Self {
        Self::new(InitiatorType::Network, url)
    }

    pub fn script(url: impl Into<String>) -> Self {
        Self::new(InitiatorType::Script, url)
    }

    pub fn with_stack<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack = frames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_frames(self, frames: &[StackFrame]) -> Self {
        self.with_stack(frames.iter().map(StackFrame::to_string))
    }

    /// Report text: the URL for network initiators, then each stack frame, one per line.
    pub fn flatten(&self) -> String {
        let url = match self.kind {
            InitiatorType::Network if !self.url.is_empty() => Some(self.url.as_str()),
            _ => None,
        };

        url.into_iter()
            .chain(self.stack.iter().map(String::as_str).filter(|f| !f.is_empty()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl CookieRecord {
    pub fn builder() -> CookieRecordBuilder {
        CookieRecordBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn creation_time(&self) -> Timestamp {
        self.creation_time
    }

    pub fn expiry_time(&self) -> Timestamp {
        self.expiry_time
    }

    /// True iff a valid Max-Age or Expires attribute was present.
    pub fn persistent(&self) -> bool {
        self.persistent
    }

    pub fn host_only(&self) -> bool {
        self.host_only
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn secure_only(&self) -> bool {
        self.secure_only
    }

    pub fn http_only(&self) -> bool {
        self.http_only
    }

    pub fn same_site(&self) -> SameSite {
        self.same_site
    }

    pub fn initiator(&self) -> Option<&Initiator> {
        self.initiator.as_ref()
    }

    /// Signed lifetime `expiry - creation` in milliseconds.
    pub fn max_age_millis(&self) -> i64 {
        self.expiry_time.millis_since(self.creation_time)
    }

    pub fn is_expired(&self, current_time: Timestamp) -> bool {
        self.expiry_time <= current_time
    }
}

/// Named, fully-defaulted construction of a [`CookieRecord`].
///
/// Defaults follow RFC 6265: empty name and value, session expiry
/// ([`Timestamp::MAX`]), host-only, path "/", SameSite=None.
#[derive(Debug, Clone)]
pub struct CookieRecordBuilder {
    record: CookieRecord,
}

impl Default for CookieRecordBuilder {
    fn default() -> Self {
        Self {
            record: CookieRecord {
                name: String::new(),
                value: String::new(),
                creation_time: Timestamp::now(),
                expiry_time: Timestamp::MAX,
                persistent: false,
                host_only: true,
                domain: String::new(),
                path: "/".to_string(),
                secure_only: false,
                http_only: false,
                same_site: SameSite::None,
                initiator: None,
            },
        }
    }
}

impl CookieRecordBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.name = name.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.record.value = value.into();
        self
    }

    pub fn creation_time(mut self, creation_time: Timestamp) -> Self {
        self.record.creation_time = creation_time;
        self
    }

    pub fn expiry_time(mut self, expiry_time: Timestamp) -> Self {
        self.record.expiry_time = expiry_time;
        self
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.record.persistent = persistent;
        self
    }

    pub fn host_only(mut self, host_only: bool) -> Self {
        self.record.host_only = host_only;
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.record.domain = domain.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.record.path = path.into();
        self
    }

    pub fn secure_only(mut self, secure_only: bool) -> Self {
        self.record.secure_only = secure_only;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.record.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.record.same_site = same_site;
        self
    }

    pub fn initiator(mut self, initiator: Option<Initiator>) -> Self {
        self.record.initiator = initiator;
        self
    }

    pub fn build(self) -> CookieRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let record = CookieRecord::builder()
            .creation_time(Timestamp::EPOCH)
            .build();

        assert_eq!(record.name(), "");
        assert_eq!(record.value(), "");
        assert_eq!(record.expiry_time(), Timestamp::MAX);
        assert!(!record.persistent());
        assert!(record.host_only());
        assert_eq!(record.path(), "/");
        assert_eq!(record.same_site(), SameSite::None);
        assert!(record.initiator().is_none());
    }

    #[test]
    fn test_same_site_from_attribute() {
        assert_eq!(SameSite::from_attribute(Some("strict")), SameSite::Strict);
        assert_eq!(SameSite::from_attribute(Some("LAX")), SameSite::Lax);
        assert_eq!(SameSite::from_attribute(Some("none")), SameSite::None);
        assert_eq!(SameSite::from_attribute(Some("invalid")), SameSite::None);
        assert_eq!(SameSite::from_attribute(None), SameSite::None);
    }

    #[test]
    fn test_flatten_network_initiator() {
        let initiator = Initiator::network("https://example.com/")
            .with_stack(["https://example.com/app.js:10:4"]);
        assert_eq!(
            initiator.flatten(),
            "https://example.com/\nhttps://example.com/app.js:10:4"
        );
    }

    #[test]
    fn test_flatten_script_initiator_skips_url() {
        let initiator = Initiator::script("https://example.com/").with_frames(&[StackFrame {
            url: "https://cdn.example.net/t.js".into(),
            line: 1,
            col: 200,
        }]);
        assert_eq!(initiator.flatten(), "https://cdn.example.net/t.js:1:200");
    }

    #[test]
    fn test_max_age_millis() {
        let record = CookieRecord::builder()
            .creation_time(Timestamp::from_millis(1_000))
            .expiry_time(Timestamp::from_millis(61_000))
            .persistent(true)
            .build();
        assert_eq!(record.max_age_millis(), 60_000);
        assert!(!record.is_expired(Timestamp::from_millis(2_000)));
        assert!(record.is_expired(Timestamp::from_millis(61_000)));
    }
}
