//! Bounded log of notable world events.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A logged world event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Simulation time when the event occurred
    pub time: f32,
    /// Tick when the event occurred
    pub tick: u64,
    /// What happened
    pub kind: EventKind,
    /// Human-readable description of the event
    pub description: String,
}

/// Categories of world events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// An epidemic broke out
    EpidemicStart,
    /// An epidemic ran its course
    EpidemicEnd,
    /// Extra food was spawned to rescue a small population
    FoodBloom,
    /// No agent is left alive
    PopulationCollapse,
}

/// Event log that keeps the most recent world events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    /// Recent events, newest first
    events: VecDeque<LoggedEvent>,
    /// Maximum number of events to keep
    max_events: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(50)
    }
}

impl EventLog {
    /// Creates a new event log with specified capacity
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Adds a new event to the log
    pub fn log(&mut self, time: f32, tick: u64, kind: EventKind, description: String) {
        self.events.push_front(LoggedEvent {
            time,
            tick,
            kind,
            description,
        });

        while self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// Returns all events, newest first
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.events
    }

    /// Number of logged events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether any retained event has the given kind
    pub fn contains(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }

    /// Clears all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
