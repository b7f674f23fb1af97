//! `Set-Cookie` / `document.cookie` parsing into [`CookieRecord`]s.
//!
//! Follows RFC 6265 sections 4.1, 5.2 and 5.3 (steps 1 to 10). Storage
//! steps 11 and 12 (replacing an existing cookie, eviction) belong to a
//! cookie store and are not applied here.
//!
//! Parsing never fails. An attribute with an unusable value is ignored,
//! a cookie that breaks a rule is dropped, and both are reported to the
//! parser's [`DiagnosticSink`].

use crate::base::context::UrlResultExt;
use crate::base::diagnostic::{Diagnostic, DiagnosticSink, RejectReason, TracingSink};
use crate::base::scanerror::ScanError;
use crate::base::timestamp::Timestamp;
use crate::cookies::cookiedate::parse_cookie_date;
use crate::cookies::cookierecord::{CookieRecord, Initiator, InitiatorType, SameSite};
use crate::cookies::psl::{is_public_suffix, match_domain};
use std::sync::Arc;
use url::Url;

/// Where and when a cookie string was observed.
#[derive(Debug, Clone)]
pub struct ParseContext {
    initiator: Initiator,
    creation_time: Timestamp,
    host: String,
    path: String,
}

impl ParseContext {
    /// Resolve the initiator URL's host and path up front.
    ///
    /// Fails when the URL does not parse or has no host (`data:`, `about:blank`).
    pub fn new(initiator: Initiator, creation_time: Timestamp) -> Result<Self, ScanError> {
        let url = Url::parse(&initiator.url).initiator_context(&initiator.url)?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ScanError::initiator_without_host(initiator.url.as_str()))?
            .to_lowercase();
        let path = url.path().to_string();

        Ok(Self {
            initiator,
            creation_time,
            host,
            path,
        })
    }

    pub fn initiator(&self) -> &Initiator {
        &self.initiator
    }

    pub fn creation_time(&self) -> Timestamp {
        self.creation_time
    }

    /// Canonical host of the initiator URL.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path of the initiator URL; the default cookie path.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn url(&self) -> &str {
        &self.initiator.url
    }
}

/// One `Set-Cookie` value split into its name/value pair and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookieLine<'a> {
    pub name: &'a str,
    pub value: &'a str,
    /// Attribute names as written, in order. Values are trimmed; flags have "".
    pub attributes: Vec<(&'a str, &'a str)>,
}

impl<'a> SetCookieLine<'a> {
    /// Last value given for an attribute (names are case-insensitive).
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    /// Last non-empty value given for an attribute.
    pub fn non_empty_attribute(&self, name: &str) -> Option<&'a str> {
        self.attribute(name).filter(|v| !v.is_empty())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

fn split_pair(pair: &str) -> (&str, &str) {
    match pair.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (pair.trim(), ""),
    }
}

/// Split a raw string into one [`SetCookieLine`] per non-blank line.
///
/// Cookie stores and the devtools protocol join several `Set-Cookie`
/// headers with line breaks.
pub fn split_set_cookie(raw: &str) -> Vec<SetCookieLine<'_>> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut parts = line.split(';');
            let (name, value) = split_pair(parts.next().unwrap_or(""));
            let attributes = parts
                .map(split_pair)
                .filter(|(key, _)| !key.is_empty())
                .collect();

            SetCookieLine {
                name,
                value,
                attributes,
            }
        })
        .collect()
}

/// Signed decimal integer only; anything else is invalid.
/// Out-of-range integers saturate. Returns milliseconds.
fn parse_max_age(raw: &str) -> Option<i64> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let seconds = raw
        .parse::<i64>()
        .unwrap_or(if negative { i64::MIN } else { i64::MAX });
    Some(seconds.saturating_mul(1000))
}

/// RFC 6265 cookie parser.
#[derive(Clone)]
pub struct CookieParser {
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for CookieParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CookieParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieParser").finish_non_exhaustive()
    }
}

impl CookieParser {
    /// Parser that logs diagnostics through `tracing`.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Parse a raw cookie string observed in `context`.
    ///
    /// An empty (or blank) string is a cookie read/clear probe and yields
    /// exactly one empty session record bound to the initiator's host and path.
    pub fn parse(&self, raw: &str, context: &ParseContext) -> Vec<CookieRecord> {
        if raw.trim().is_empty() {
            return vec![CookieRecord::builder()
                .creation_time(context.creation_time)
                .expiry_time(Timestamp::MAX)
                .domain(context.host.as_str())
                .path(context.path.as_str())
                .initiator(Some(context.initiator.clone()))
                .build()];
        }

        let cookies: Vec<CookieRecord> = split_set_cookie(raw)
            .iter()
            .filter_map(|line| self.parse_line(line, raw, context))
            .collect();

        tracing::trace!(
            url = %context.url(),
            count = cookies.len(),
            "parsed cookie string"
        );
        cookies
    }

    fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(&diagnostic);
    }

    fn reject(&self, reason: RejectReason, line: &SetCookieLine<'_>, context: &ParseContext) {
        self.report(Diagnostic::CookieRejected {
            reason,
            cookie: line.name.to_string(),
            url: context.url().to_string(),
        });
    }

    fn attribute_invalid(
        &self,
        attribute: &'static str,
        value: &str,
        line: &SetCookieLine<'_>,
        context: &ParseContext,
    ) {
        self.report(Diagnostic::AttributeInvalid {
            attribute,
            value: value.to_string(),
            cookie: line.name.to_string(),
            url: context.url().to_string(),
        });
    }

    fn parse_line(
        &self,
        line: &SetCookieLine<'_>,
        raw: &str,
        context: &ParseContext,
    ) -> Option<CookieRecord> {
        if line.name.is_empty() && line.value.is_empty() {
            self.report(Diagnostic::MalformedInput {
                input: raw.to_string(),
                url: context.url().to_string(),
                detail: "cookie has neither name nor value".to_string(),
            });
            return None;
        }

        // Max-Age: section 5.2.2
        let max_age = line.non_empty_attribute("max-age").and_then(|raw_max_age| {
            let parsed = parse_max_age(raw_max_age);
            if parsed.is_none() {
                self.attribute_invalid("Max-Age", raw_max_age, line, context);
            }
            parsed
        });

        // Expires: section 5.2.1
        let expires = line.non_empty_attribute("expires").and_then(|raw_expires| {
            let parsed = parse_cookie_date(raw_expires);
            if parsed.is_none() {
                self.attribute_invalid("Expires", raw_expires, line, context);
            }
            parsed
        });

        // Section 5.3 step 3, Max-Age has precedence over Expires
        let expiry_time = match (max_age, expires) {
            (Some(millis), _) if millis <= 0 => Timestamp::MIN,
            (Some(millis), _) => context.creation_time.saturating_add_millis(millis),
            (None, Some(expires)) => expires,
            (None, None) => Timestamp::MAX,
        };
        let persistent = max_age.is_some() || expires.is_some();

        // Section 5.3 steps 4 to 6
        let raw_domain = line.attribute("domain").unwrap_or("");
        let mut domain = raw_domain
            .strip_prefix('.')
            .unwrap_or(raw_domain)
            .to_lowercase();

        if is_public_suffix(&domain) {
            if domain != context.host {
                self.reject(RejectReason::PublicSuffixDomain, line, context);
                return None;
            }
            // Setting host is itself a public suffix: fall back to host-only.
            domain.clear();
        }

        let host_only = if domain.is_empty() {
            domain = context.host.clone();
            true
        } else {
            if !match_domain(&domain, &context.host) {
                self.reject(RejectReason::DomainMismatch, line, context);
                return None;
            }
            false
        };

        // Section 5.2.4, a path that does not start with "/" is the default path
        let path = line
            .non_empty_attribute("path")
            .filter(|p| p.starts_with('/'))
            .unwrap_or(context.path.as_str());

        // Section 5.3 steps 8 to 10
        let secure_only = line.has_attribute("secure");
        let http_only = line.has_attribute("httponly");
        if http_only && context.initiator.kind != InitiatorType::Network {
            self.reject(RejectReason::HttpOnlyFromScript, line, context);
            return None;
        }

        let same_site = SameSite::from_attribute(line.attribute("samesite"));

        tracing::debug!(
            name = %line.name,
            domain = %domain,
            persistent,
            "accepted cookie"
        );

        Some(
            CookieRecord::builder()
                .name(line.name)
                .value(line.value)
                .creation_time(context.creation_time)
                .expiry_time(expiry_time)
                .persistent(persistent)
                .host_only(host_only)
                .domain(domain)
                .path(path)
                .secure_only(secure_only)
                .http_only(http_only)
                .same_site(same_site)
                .initiator(Some(context.initiator.clone()))
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::diagnostic::CollectingSink;

    fn context(url: &str) -> ParseContext {
        ParseContext::new(Initiator::network(url), Timestamp::from_millis(1_000_000)).unwrap()
    }

    #[test]
    fn test_split_single_cookie() {
        let lines = split_set_cookie("a=1; Path=/; Secure");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "a");
        assert_eq!(lines[0].value, "1");
        assert_eq!(lines[0].attribute("path"), Some("/"));
        assert!(lines[0].has_attribute("SECURE"));
    }

    #[test]
    fn test_split_multiple_lines() {
        let lines = split_set_cookie("a=1; Path=/\n\nb=2\r\nc");
        let names: Vec<_> = lines.iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(lines[2].value, "");
    }

    #[test]
    fn test_last_attribute_wins() {
        let lines = split_set_cookie("a=1; Path=/one; path=/two");
        assert_eq!(lines[0].attribute("Path"), Some("/two"));
    }

    #[test]
    fn test_value_keeps_equals() {
        let lines = split_set_cookie("token=abc==; Secure");
        assert_eq!(lines[0].value, "abc==");
    }

    #[test]
    fn test_parse_max_age() {
        assert_eq!(parse_max_age("10"), Some(10_000));
        assert_eq!(parse_max_age("-5"), Some(-5_000));
        assert_eq!(parse_max_age("0"), Some(0));
        assert_eq!(parse_max_age("1.5"), None);
        assert_eq!(parse_max_age("+5"), None);
        assert_eq!(parse_max_age("-"), None);
        assert_eq!(parse_max_age("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_context_rejects_hostless_url() {
        let err = ParseContext::new(Initiator::script("data:text/html,x"), Timestamp::EPOCH);
        assert!(matches!(err, Err(ScanError::InitiatorWithoutHost { .. })));
    }

    #[test]
    fn test_invalid_max_age_keeps_cookie() {
        let sink = Arc::new(CollectingSink::new());
        let parser = CookieParser::with_sink(sink.clone());

        let cookies = parser.parse("a=1; Max-Age=soon", &context("http://example.com"));
        assert_eq!(cookies.len(), 1);
        assert!(!cookies[0].persistent());

        let diagnostics = sink.take();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            Diagnostic::AttributeInvalid { attribute: "Max-Age", .. }
        ));
    }

    #[test]
    fn test_negative_max_age_expires_immediately() {
        let parser = CookieParser::new();
        let cookies = parser.parse("a=1; Max-Age=-1", &context("http://example.com"));
        assert_eq!(cookies[0].expiry_time(), Timestamp::MIN);
        assert!(cookies[0].persistent());
    }

    #[test]
    fn test_huge_max_age_clamps() {
        let parser = CookieParser::new();
        let cookies = parser.parse(
            "a=1; Max-Age=99999999999999999999",
            &context("http://example.com"),
        );
        assert_eq!(cookies[0].expiry_time(), Timestamp::MAX);
        assert!(cookies[0].persistent());
    }

    #[test]
    fn test_relative_path_uses_default() {
        let parser = CookieParser::new();
        let context = context("http://example.com/docs/page");

        let cookies = parser.parse("a=1; Path=foo\nb=2; Path=/api", &context);
        assert_eq!(cookies[0].path(), "/docs/page");
        assert_eq!(cookies[1].path(), "/api");
    }

    #[test]
    fn test_empty_name_and_value_is_malformed() {
        let sink = Arc::new(CollectingSink::new());
        let parser = CookieParser::with_sink(sink.clone());

        let cookies = parser.parse("=; Path=/\nb=2", &context("http://example.com"));
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name(), "b");
        assert!(matches!(sink.take()[0], Diagnostic::MalformedInput { .. }));
    }
}
