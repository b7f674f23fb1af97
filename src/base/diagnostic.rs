//! Non-fatal diagnostics raised while parsing and ingesting cookies.
//!
//! Nothing in the cookie engine aborts a batch. Every attribute that is
//! ignored and every cookie that is dropped produces one [`Diagnostic`],
//! delivered to a [`DiagnosticSink`] chosen when the parser is built.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default truncation limit for URLs and cookie strings in messages.
pub const TRUNCATE_LIMIT: usize = 60;

/// Why a whole cookie was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Domain attribute is a public suffix different from the setting host.
    PublicSuffixDomain,
    /// Domain attribute does not domain-match the setting host.
    DomainMismatch,
    /// `document.cookie` write claiming HttpOnly.
    HttpOnlyFromScript,
    /// Initiator URL scheme cannot carry cookies (`about:`, `data:`, ...).
    DisallowedOrigin,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::PublicSuffixDomain => "public suffix domain",
            RejectReason::DomainMismatch => "domain mismatch",
            RejectReason::HttpOnlyFromScript => "HttpOnly from script",
            RejectReason::DisallowedOrigin => "disallowed origin",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// One attribute had an unusable value and was ignored; the cookie was kept.
    AttributeInvalid {
        attribute: &'static str,
        value: String,
        cookie: String,
        url: String,
    },
    /// The cookie was dropped; the rest of the batch continues.
    CookieRejected {
        reason: RejectReason,
        cookie: String,
        url: String,
    },
    /// Input that is not cookie-shaped.
    MalformedInput {
        input: String,
        url: String,
        detail: String,
    },
}

impl Diagnostic {
    /// Name of the cookie (or raw input) the diagnostic is about.
    pub fn subject(&self) -> &str {
        match self {
            Diagnostic::AttributeInvalid { cookie, .. } => cookie,
            Diagnostic::CookieRejected { cookie, .. } => cookie,
            Diagnostic::MalformedInput { input, .. } => input,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Diagnostic::CookieRejected { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AttributeInvalid {
                attribute,
                value,
                cookie,
                url,
            } => write!(
                f,
                "Ignore {} attribute with invalid value {:?} for the cookie {:?} from {:?}",
                attribute,
                value,
                cookie,
                truncate_middle(url, TRUNCATE_LIMIT)
            ),
            Diagnostic::CookieRejected {
                reason,
                cookie,
                url,
            } => write!(
                f,
                "Ignore cookie {:?} from {:?}: {}",
                truncate_middle(cookie, TRUNCATE_LIMIT),
                truncate_middle(url, TRUNCATE_LIMIT),
                reason
            ),
            Diagnostic::MalformedInput { input, url, detail } => write!(
                f,
                "Malformed cookie input {:?} from {:?}: {}",
                truncate_middle(input, TRUNCATE_LIMIT),
                truncate_middle(url, TRUNCATE_LIMIT),
                detail
            ),
        }
    }
}

/// Receiver for diagnostics.
///
/// Implemented for any `Fn(&Diagnostic)` closure.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Logs every diagnostic at `warn` level through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::CookieRejected { reason, .. } => {
                tracing::warn!(reason = %reason, "{}", diagnostic);
            }
            _ => tracing::warn!("{}", diagnostic),
        }
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A panic while holding the lock leaves the collected list intact.
    fn entries(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drain collected diagnostics in report order.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.entries().push(diagnostic.clone());
    }
}

/// Shorten `value` to at most `limit` characters, keeping both ends.
///
/// `"0123456789"` with limit 6 becomes `"012…789"`.
pub fn truncate_middle(value: &str, limit: usize) -> String {
    let limit = if limit == 0 { TRUNCATE_LIMIT } else { limit };
    let count = value.chars().count();
    if count <= limit {
        return value.to_string();
    }

    let head = limit / 2;
    let tail = limit - head;
    let mut out: String = value.chars().take(head).collect();
    out.push('…');
    out.extend(value.chars().skip(count - tail));
    out
}
