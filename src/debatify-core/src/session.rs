//! Session records and aggregate statistics.
//!
//! Defines the data that survives an interaction: one record per scored
//! session, plus the running aggregate that the dashboard reads.

use serde::{Deserialize, Serialize};

/// How many sessions the recent-history window retains.
pub const HISTORY_LIMIT: usize = 10;

/// Which module produced a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionKind {
    /// Conversational coach turn (chat, never persisted as a session).
    Coach,
    /// Practice Arena speech analysis.
    Practice,
    /// Smart Judge transcript adjudication.
    Judge,
}

impl SessionKind {
    pub fn display_name(&self) -> &str {
        match self {
            SessionKind::Coach => "AI Debate Coach",
            SessionKind::Practice => "Practice Arena",
            SessionKind::Judge => "Smart Judge",
        }
    }
}

/// One completed, scored interaction.
///
/// Created exactly once when a model call succeeds, never mutated
/// afterwards. Records live only inside [`AggregateStats::history`] and
/// fall out of storage once evicted from the window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub kind: SessionKind,
    /// Overall quality score, nominally 0-100.
    pub score: u32,
    /// Calendar date of creation, e.g. "2026-08-25".
    pub date: String,
    /// Recording length; practice sessions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// Transcript size in bytes; judge sessions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_length: Option<usize>,
    /// The motion argued; practice sessions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<String>,
}

/// The single persisted summary of all recorded sessions.
///
/// `total_sessions` and `total_minutes` are lifetime counters and never
/// shrink; `average_score` covers only the retained history window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateStats {
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub average_score: u32,
    /// Newest first, at most [`HISTORY_LIMIT`] entries.
    pub history: Vec<SessionRecord>,
}

impl AggregateStats {
    /// Fold one record into the aggregate.
    ///
    /// Whole minutes only: a 59-second session adds nothing to
    /// `total_minutes`.
    pub fn apply(&mut self, entry: SessionRecord) {
        self.total_sessions += 1;
        if let Some(seconds) = entry.duration_seconds {
            self.total_minutes += u64::from(seconds / 60);
        }
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_LIMIT);
        self.average_score = rounded_mean(&self.history);
    }
}

/// Rounded mean of the scores in the window; 0 for an empty window.
fn rounded_mean(history: &[SessionRecord]) -> u32 {
    if history.is_empty() {
        return 0;
    }
    let total: u64 = history.iter().map(|s| u64::from(s.score)).sum();
    let count = history.len() as u64;
    ((total + count / 2) / count) as u32
}
