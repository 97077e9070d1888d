//! # Determination Audit Trail
//!
//! Records stage-boundary events for every line the pipeline processes,
//! for operational review and observability export. The trail is a
//! capacity-bounded ring buffer: when the configured maximum is exceeded,
//! the oldest 10% of events are trimmed. Trimmed events are NOT lost by
//! contract — production deployments should drain the trail to durable
//! storage before trimming becomes a concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DeterminationEventType
// ---------------------------------------------------------------------------

/// The type of determination trail event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeterminationEventType {
    /// A line entered the pipeline.
    LineStarted,
    /// A pipeline stage finished for a line.
    StageCompleted,
    /// The generative fallback was invoked for a line.
    FallbackInvoked,
    /// A line left the pipeline with its final result.
    LineCompleted,
}

impl DeterminationEventType {
    /// Return the string value for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LineStarted => "line_started",
            Self::StageCompleted => "stage_completed",
            Self::FallbackInvoked => "fallback_invoked",
            Self::LineCompleted => "line_completed",
        }
    }
}

impl std::fmt::Display for DeterminationEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DeterminationEvent
// ---------------------------------------------------------------------------

/// A single entry in the determination trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeterminationEvent {
    /// The type of event.
    pub event_type: DeterminationEventType,
    /// UTC timestamp when the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Batch line index this event belongs to, if any.
    pub line_index: Option<usize>,
    /// Optional structured metadata payload.
    pub metadata: Option<serde_json::Value>,
}

impl DeterminationEvent {
    /// Create an event stamped with the current UTC time.
    pub fn new(
        event_type: DeterminationEventType,
        line_index: Option<usize>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            line_index,
            metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// DeterminationTrail
// ---------------------------------------------------------------------------

/// Append-only, capacity-bounded trail of determination events.
///
/// ## Thread Safety
///
/// Not `Sync` by itself — the pipeline owns one trail and appends through
/// `&mut self`. Use external synchronisation (e.g. `Arc<Mutex<..>>`) when
/// sharing a pipeline across request handlers.
pub struct DeterminationTrail {
    events: Vec<DeterminationEvent>,
    max_events: usize,
}

impl DeterminationTrail {
    /// Create a trail with the given maximum capacity.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event. When the trail exceeds capacity, the oldest 10%
    /// (at least one) of events are trimmed.
    pub fn append(&mut self, event: DeterminationEvent) {
        self.events.push(event);
        if self.events.len() > self.max_events {
            let trim_count = (self.max_events / 10).max(1);
            self.events.drain(..trim_count);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[DeterminationEvent] {
        &self.events
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events recorded for one batch line.
    pub fn events_for_line(&self, line_index: usize) -> Vec<&DeterminationEvent> {
        self.events
            .iter()
            .filter(|e| e.line_index == Some(line_index))
            .collect()
    }

    /// Events of one type.
    pub fn events_by_type(&self, event_type: DeterminationEventType) -> Vec<&DeterminationEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// The last N events (or all, if fewer exist).
    pub fn last_n(&self, n: usize) -> &[DeterminationEvent] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }
}

impl Default for DeterminationTrail {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Debug for DeterminationTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeterminationTrail")
            .field("events", &self.events.len())
            .field("max_events", &self.max_events)
            .finish()
    }
}
