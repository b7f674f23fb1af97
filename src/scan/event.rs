//! Inbound cookie events from the browser automation layer.
//!
//! ```json
//! {
//!   "cookie": "sid=abc; Path=/",
//!   "domain": "www.example.com",
//!   "timestamp": 1600000000000.5,
//!   "initiator": {
//!     "url": "https://www.example.com/app.js",
//!     "type": "script",
//!     "stack": [{ "url": "https://www.example.com/app.js", "line": 10, "col": 4 }]
//!   }
//! }
//! ```

use crate::base::context::JsonResultExt;
use crate::base::scanerror::ScanError;
use crate::base::timestamp::Timestamp;
use crate::cookies::cookierecord::{Initiator, InitiatorType, StackFrame};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInitiator {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: InitiatorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<StackFrame>>,
}

impl EventInitiator {
    pub fn to_initiator(&self) -> Initiator {
        let initiator = Initiator::new(self.kind, self.url.as_str());
        match &self.stack {
            Some(frames) => initiator.with_frames(frames),
            None => initiator,
        }
    }
}

/// One observed cookie write: a `Set-Cookie` header or a `document.cookie` assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieEvent {
    /// Raw cookie string, possibly several lines.
    pub cookie: String,
    /// Page host the event was observed on.
    #[serde(default)]
    pub domain: String,
    /// Milliseconds since the epoch, may be fractional.
    pub timestamp: f64,
    pub initiator: EventInitiator,
}

impl CookieEvent {
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        serde_json::from_str(json).json_context("cookie event")
    }

    /// Decode a JSON array of events.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, ScanError> {
        serde_json::from_str(json).json_context("cookie event list")
    }

    /// Event time, truncated to whole milliseconds.
    pub fn creation_time(&self) -> Timestamp {
        Timestamp::from_millis_f64(self.timestamp)
    }
}
