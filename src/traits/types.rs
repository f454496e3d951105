//! Shared host types.
//!
//! These types cross the boundary between the monitor and its host
//! collaborators: event kinds the monitor listens for, and the events the
//! host dispatches.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of host event.
///
/// Every kind except [`EventKind::Blur`] may be configured as a collection
/// trigger. `Blur` is the focus-loss signal and always cancels collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Document finished parsing.
    #[serde(rename = "DOMContentLoaded")]
    DomContentLoaded,
    /// Surface scrolled.
    #[serde(rename = "scroll")]
    Scroll,
    /// Pointer click.
    #[serde(rename = "click")]
    Click,
    /// Window gained focus.
    #[serde(rename = "focus")]
    Focus,
    /// Window lost focus.
    #[serde(rename = "blur")]
    Blur,
}

impl EventKind {
    /// Default set of triggering event kinds.
    pub const DEFAULT_TRIGGERS: [Self; 4] =
        [Self::DomContentLoaded, Self::Scroll, Self::Click, Self::Focus];

    /// Host-facing name of the event kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Scroll => "scroll",
            Self::Click => "click",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }

    /// Returns true if the kind may arm a collection trigger.
    #[must_use]
    pub const fn is_trigger(self) -> bool {
        !matches!(self, Self::Blur)
    }

    /// Returns true if the host should register the listener as passive.
    #[must_use]
    pub const fn is_passive(self) -> bool {
        matches!(self, Self::Scroll)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "DOMContentLoaded" | "domcontentloaded" => Ok(Self::DomContentLoaded),
            "scroll" => Ok(Self::Scroll),
            "click" => Ok(Self::Click),
            "focus" => Ok(Self::Focus),
            "blur" => Ok(Self::Blur),
            other => Err(UnknownEventKind(other.to_string())),
        }
    }
}

/// An event dispatched by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEvent {
    /// Event kind.
    pub kind: EventKind,
    /// Wall-clock time the host dispatched the event.
    pub timestamp: DateTime<Utc>,
}

impl HostEvent {
    /// Create an event of the given kind stamped with the current time.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }
}
