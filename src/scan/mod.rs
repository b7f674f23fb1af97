//! Scan-level plumbing around the cookie engine.
//!
//! - [`config`]: `ScanConfig`, loaded from JSON
//! - [`event`]: inbound `CookieEvent`s from the automation layer
//! - [`observer`]: `CookieObserver`, parses events in arrival order
//! - [`report`]: `CookieReport`, the classify/merge/sort pipeline

pub mod config;
pub mod event;
pub mod observer;
pub mod report;
