//! Append-only log of sequence edits.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Insert,
    Delete,
}

/// One recorded edit. The `operation` text is the compact human-readable
/// form (`@<position>+<bases>` for inserts, `@<position>-<bases>` for
/// deletions).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStep {
    pub kind: HistoryKind,
    pub position: usize,
    pub value: String,
    pub operation: String,
    pub timestamp_ms: u128,
}

impl HistoryStep {
    pub fn insert(position: usize, bases: &str) -> Self {
        Self {
            kind: HistoryKind::Insert,
            position,
            value: bases.to_string(),
            operation: format!("@{position}+{bases}"),
            timestamp_ms: now_unix_ms(),
        }
    }

    pub fn delete(position: usize, removed: &str) -> Self {
        Self {
            kind: HistoryKind::Delete,
            position,
            value: removed.to_string(),
            operation: format!("@{position}-{removed}"),
            timestamp_ms: now_unix_ms(),
        }
    }
}

/// The edit log. Steps are only ever appended; nothing in the engine reads
/// them back or rewrites them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditHistory {
    steps: Vec<HistoryStep>,
}

impl EditHistory {
    pub fn add(&mut self, step: HistoryStep) {
        self.steps.push(step);
    }

    #[inline(always)]
    pub fn steps(&self) -> &[HistoryStep] {
        &self.steps
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
