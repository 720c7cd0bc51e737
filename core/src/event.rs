//! The life log: what happened, year by year.
//!
//! RULE: the log is observational only. Nothing in the simulation reads it
//! back to decide anything.
//! Entries are stored in the order they happened and handed out
//! newest-first.

use crate::types::Age;
use serde::{Deserialize, Serialize};

/// Coarse category of a log entry.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeEventKind {
    Main,
    Activity,
    Age,
    Random,
    Career,
    Relationship,
    Milestone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub age:         Age,
    pub title:       String,
    pub description: String,
    /// Comma-joined summary of the changes applied, e.g. "Health -5, Money +300".
    pub impact:      Option<String>,
    pub kind:        LifeEventKind,
}

impl LifeEvent {
    pub fn new(
        age: Age,
        kind: LifeEventKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            age,
            title: title.into(),
            description: description.into(),
            impact: None,
            kind,
        }
    }

    pub fn with_impact(mut self, impact: Option<String>) -> Self {
        self.impact = impact;
        self
    }
}

/// Append-only event log owned by one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LifeLog {
    entries: Vec<LifeEvent>,
}

impl LifeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: LifeEvent) {
        self.entries.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = LifeEvent>) {
        self.entries.extend(events);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest entry first.
    pub fn newest_first(&self) -> impl Iterator<Item = &LifeEvent> {
        self.entries.iter().rev()
    }

    /// Oldest entry first.
    pub fn chronological(&self) -> &[LifeEvent] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&LifeEvent> {
        self.entries.last()
    }

    pub fn count_kind(&self, kind: LifeEventKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_comes_first() {
        let mut log = LifeLog::new();
        log.push(LifeEvent::new(0, LifeEventKind::Main, "Born", "You were born."));
        log.push(LifeEvent::new(1, LifeEventKind::Age, "Another year passed", ""));
        let titles: Vec<&str> = log.newest_first().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Another year passed", "Born"]);
        assert_eq!(log.latest().map(|e| e.age), Some(1));
        assert_eq!(log.count_kind(LifeEventKind::Main), 1);
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut log = LifeLog::new();
        log.push(
            LifeEvent::new(3, LifeEventKind::Random, "Lucky day", "")
                .with_impact(Some("Luck +5".into())),
        );
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["kind"], "random");
        assert_eq!(json[0]["impact"], "Luck +5");
    }
}
