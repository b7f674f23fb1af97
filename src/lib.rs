//! # cookiescan
//!
//! RFC 6265 cookie semantics for privacy scanners.
//!
//! `cookiescan` takes the cookie writes a browser scan observes (response
//! `Set-Cookie` headers and `document.cookie` assignments) and turns them
//! into a deduplicated, classified cookie report.
//!
//! ## Features
//!
//! - **Parsing**: RFC 6265 attribute processing, cookie-date algorithm, Max-Age precedence
//! - **Domain rules**: Public Suffix List checks, domain matching, eTLD+1 first-party test
//! - **Classification**: session/persistent, first/third-party, lifespan in days
//! - **Canonicalization**: configurable name templates for instance-specific cookies
//! - **Merging**: one row per (name, host), first observation wins
//!
//! ## Quick Start
//!
//! ```rust
//! use cookiescan::scan::config::ScanConfig;
//! use cookiescan::scan::event::CookieEvent;
//! use cookiescan::scan::observer::CookieObserver;
//! use cookiescan::scan::report::CookieReport;
//!
//! let config = ScanConfig::new("example.com");
//! let mut observer = CookieObserver::new(config.clone());
//!
//! let event = CookieEvent::from_json(r#"{
//!     "cookie": "sid=1; Max-Age=86400",
//!     "domain": "www.example.com",
//!     "timestamp": 1600000000000,
//!     "initiator": {"url": "https://www.example.com/", "type": "network"}
//! }"#)?;
//! observer.observe(&event);
//!
//! let report = CookieReport::from_records(&observer.take_records(), &config)?;
//! assert_eq!(report.cookies()[0].life_span, 1);
//! # Ok::<(), cookiescan::base::scanerror::ScanError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Timestamps, errors and diagnostics
//! - [`cookies`] - Parsing, domain rules, classification and merging
//! - [`scan`] - Configuration, event ingestion and the report pipeline

pub mod base;
pub mod cookies;
pub mod scan;
