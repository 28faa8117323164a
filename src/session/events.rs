//! Session event log

use serde::{Deserialize, Serialize};

use crate::core::types::{BehaviorClass, SimTime};

/// A notable occurrence during a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub time: SimTime,
    pub kind: EventKind,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<BehaviorClass>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Reinforcement,
    /// A punisher followed the target behavior; not a reinforcer
    Punishment,
    BurstDetected,
    Satiation,
    BehaviorOccurred,
    SessionEnded,
    InterventionChanged,
}

/// Append-only, time-ordered event log
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        time: SimTime,
        kind: EventKind,
        details: impl Into<String>,
        behavior: Option<BehaviorClass>,
    ) {
        debug_assert!(
            self.events.last().map_or(true, |last| last.time <= time),
            "events must be appended in time order"
        );
        self.events.push(Event {
            time,
            kind,
            details: details.into(),
            behavior,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Behavior occurrences of one class, in time order
    pub fn occurrences(&self, class: BehaviorClass) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.kind == EventKind::BehaviorOccurred && e.behavior == Some(class))
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }

    /// The most recent `n` events, newest last
    pub fn recent(&self, n: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_filter() {
        let mut log = EventLog::new();
        log.record(0.1, EventKind::BehaviorOccurred, "Target behavior occurred", Some(BehaviorClass::Target));
        log.record(0.5, EventKind::BehaviorOccurred, "Alternative behavior occurred", Some(BehaviorClass::Alternative));
        log.record(0.5, EventKind::Reinforcement, "Reinforced: alt behavior (treat)", Some(BehaviorClass::Alternative));
        log.record(1.2, EventKind::BehaviorOccurred, "Target behavior occurred", Some(BehaviorClass::Target));

        assert_eq!(log.len(), 4);
        assert_eq!(log.occurrences(BehaviorClass::Target).count(), 2);
        assert_eq!(log.occurrences(BehaviorClass::Alternative).count(), 1);
        assert_eq!(log.of_kind(EventKind::Reinforcement).count(), 1);
        assert!(!log.contains(EventKind::BurstDetected));
    }

    #[test]
    fn test_recent_window() {
        let mut log = EventLog::new();
        for i in 0..5 {
            log.record(i as f64, EventKind::Satiation, "full", None);
        }
        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].time, 4.0);
        assert_eq!(log.recent(10).len(), 5);
    }
}
