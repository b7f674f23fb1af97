//! Cookie semantics: parsing, domain rules, canonicalization and merging.
//!
//! This module turns raw cookie-setting events into report rows:
//!
//! - **Parsing**: `Set-Cookie` values and `document.cookie` writes into
//!   [`CookieRecord`](cookierecord::CookieRecord)s ([`parser`])
//! - **Domain rules**: public suffixes, RFC 6265 domain matching, first-party checks ([`psl`])
//! - **Canonicalization**: stable names for instance-specific cookies ([`canonicalize`])
//! - **Classification**: session/persistent, third-party, lifespan in days ([`classify`])
//! - **Merging**: one row per (name, host) with first-observation-wins semantics ([`merger`])
//!
//! # Architecture
//!
//! | Stage | Type | Responsibility |
//! |-------|------|----------------|
//! | Parse | [`CookieParser`](parser::CookieParser) | RFC 6265 sections 5.2 and 5.3, diagnostics |
//! | Record | [`CookieRecord`](cookierecord::CookieRecord) | Immutable parsed cookie |
//! | Classify | [`classify`](classify::classify) | Report row per record |
//! | Merge | [`CookieMerger`](merger::CookieMerger) | Deduplicate rows |
//! | Sort | [`sort_cookies`](classify::sort_cookies) | Deterministic order |
//!
//! # Parsing a response header
//!
//! ```rust
//! use cookiescan::base::timestamp::Timestamp;
//! use cookiescan::cookies::cookierecord::Initiator;
//! use cookiescan::cookies::parser::{CookieParser, ParseContext};
//!
//! let context = ParseContext::new(
//!     Initiator::network("https://www.example.com/login"),
//!     Timestamp::from_millis(1_600_000_000_000),
//! )?;
//! let cookies = CookieParser::new().parse("sid=abc; Domain=.example.com; Max-Age=3600", &context);
//!
//! assert_eq!(cookies.len(), 1);
//! assert_eq!(cookies[0].domain(), "example.com");
//! assert!(!cookies[0].host_only());
//! # Ok::<(), cookiescan::base::scanerror::ScanError>(())
//! ```
//!
//! # RFC References
//!
//! - Cookie parsing: RFC 6265 section 5.2
//! - Storage model: RFC 6265 section 5.3 (steps 11 and 12 are left to the cookie store)
//! - Date parsing: RFC 6265 section 5.1.1
//! - Domain matching: RFC 6265 section 5.1.3

pub mod canonicalize;
pub mod classify;
pub mod cookiedate;
pub mod cookierecord;
pub mod merger;
pub mod parser;
pub mod psl;
pub mod snapshot;
