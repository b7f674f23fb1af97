//! Event ingestion.
//!
//! [`CookieObserver`] is the entry point for live scans: the automation
//! layer hands it every cookie write it sees, in arrival order, and reads
//! the accepted [`CookieRecord`]s back when the page is done.

use crate::base::diagnostic::{Diagnostic, DiagnosticSink, RejectReason};
use crate::cookies::cookierecord::CookieRecord;
use crate::cookies::parser::{CookieParser, ParseContext};
use crate::scan::config::ScanConfig;
use crate::scan::event::CookieEvent;
use std::sync::Arc;

#[derive(Debug)]
pub struct CookieObserver {
    parser: CookieParser,
    config: ScanConfig,
    records: Vec<CookieRecord>,
    events: usize,
}

impl CookieObserver {
    /// Observer that logs diagnostics through `tracing`.
    pub fn new(config: ScanConfig) -> Self {
        Self::with_parser(config, CookieParser::new())
    }

    pub fn with_sink(config: ScanConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_parser(config, CookieParser::with_sink(sink))
    }

    pub fn with_parser(config: ScanConfig, parser: CookieParser) -> Self {
        Self {
            parser,
            config,
            records: Vec::new(),
            events: 0,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Parse one event and keep its records. Returns how many were accepted.
    ///
    /// Events from a scheme outside `allowedProtocols` are rejected with
    /// [`RejectReason::DisallowedOrigin`]; an initiator URL that does not
    /// parse is reported as malformed input.
    pub fn observe(&mut self, event: &CookieEvent) -> usize {
        self.events += 1;
        let url = event.initiator.url.as_str();

        if !self.config.allows_url(url) {
            self.parser.sink().report(&Diagnostic::CookieRejected {
                reason: RejectReason::DisallowedOrigin,
                cookie: event.cookie.clone(),
                url: url.to_string(),
            });
            return 0;
        }

        let context = match ParseContext::new(event.initiator.to_initiator(), event.creation_time()) {
            Ok(context) => context,
            Err(e) => {
                self.parser.sink().report(&Diagnostic::MalformedInput {
                    input: event.cookie.clone(),
                    url: url.to_string(),
                    detail: e.to_string(),
                });
                return 0;
            }
        };

        let parsed = self.parser.parse(&event.cookie, &context);
        let accepted = parsed.len();
        self.records.extend(parsed);

        tracing::trace!(url = %url, accepted, "observed cookie event");
        accepted
    }

    pub fn observe_all<'a, I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = &'a CookieEvent>,
    {
        events.into_iter().map(|event| self.observe(event)).sum()
    }

    /// Accepted records in arrival order.
    pub fn records(&self) -> &[CookieRecord] {
        &self.records
    }

    /// Number of events seen, accepted or not.
    pub fn event_count(&self) -> usize {
        self.events
    }

    /// Drain accepted records, leaving the observer ready for the next page.
    pub fn take_records(&mut self) -> Vec<CookieRecord> {
        tracing::debug!(
            events = self.events,
            records = self.records.len(),
            "draining observed cookies"
        );
        self.events = 0;
        std::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::diagnostic::CollectingSink;
    use crate::cookies::cookierecord::InitiatorType;
    use crate::scan::event::EventInitiator;

    fn event(cookie: &str, url: &str, kind: InitiatorType) -> CookieEvent {
        CookieEvent {
            cookie: cookie.into(),
            domain: String::new(),
            timestamp: 1_000.0,
            initiator: EventInitiator {
                url: url.into(),
                kind,
                stack: None,
            },
        }
    }

    fn observer() -> (CookieObserver, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let observer = CookieObserver::with_sink(ScanConfig::new("example.com"), sink.clone());
        (observer, sink)
    }

    #[test]
    fn test_observe_accumulates_in_order() {
        let (mut observer, sink) = observer();
        observer.observe(&event("a=1\nb=2", "https://example.com/", InitiatorType::Network));
        observer.observe(&event("c=3", "https://example.com/x", InitiatorType::Script));

        let names: Vec<_> = observer.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_disallowed_origin() {
        let (mut observer, sink) = observer();
        assert_eq!(observer.observe(&event("a=1", "about:blank", InitiatorType::Script)), 0);
        assert!(observer.records().is_empty());

        let diagnostics = sink.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].reject_reason(), Some(RejectReason::DisallowedOrigin));
    }

    #[test]
    fn test_hostless_url_is_malformed() {
        let (mut observer, sink) = observer();
        assert_eq!(observer.observe(&event("a=1", "http://", InitiatorType::Network)), 0);
        let diagnostics = sink.take();
        assert!(matches!(diagnostics[0], Diagnostic::MalformedInput { .. }));
    }

    #[test]
    fn test_take_records_drains() {
        let (mut observer, _sink) = observer();
        observer.observe(&event("a=1", "https://example.com/", InitiatorType::Network));
        assert_eq!(observer.event_count(), 1);

        let records = observer.take_records();
        assert_eq!(records.len(), 1);
        assert!(observer.records().is_empty());
        assert_eq!(observer.event_count(), 0);
    }
}
