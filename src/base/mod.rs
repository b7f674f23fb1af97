//! Base types and error handling.
//!
//! Foundational types shared by the cookie engine:
//! - [`Timestamp`](timestamp::Timestamp): millisecond instants with the browser clock range
//! - [`ScanError`](scanerror::ScanError): setup-time failures
//! - [`Diagnostic`](diagnostic::Diagnostic): non-fatal per-cookie findings

pub mod context;
pub mod diagnostic;
pub mod scanerror;
pub mod timestamp;
