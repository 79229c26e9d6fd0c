//! JSON view of a session for inspection and host output.
//!
//! Field names are camelCase so a web front end can consume the same shape.

use serde::Serialize;
use uuid::Uuid;

use crate::permission::InputMode;
use crate::progress::RoundPhase;
use crate::session::ShakeSession;

pub const SNAPSHOT_VERSION: &str = "1";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub version: &'static str,
    pub session_id: Uuid,
    pub mode: InputMode,
    pub prompt: &'static str,
    pub phase: RoundPhase,
    pub progress: u8,
    pub message: Option<String>,
    pub display_intensity: f64,
    pub accepted_events: u64,
    pub dropped_samples: u64,
    pub rounds_revealed: u64,
}

impl SessionSnapshot {
    pub fn of(session: &ShakeSession) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            session_id: session.id(),
            mode: session.mode(),
            prompt: session.mode().prompt(),
            phase: session.phase(),
            progress: session.progress(),
            message: session.message().map(str::to_string),
            display_intensity: session.display_intensity(),
            accepted_events: session.accepted_events(),
            dropped_samples: session.dropped_samples(),
            rounds_revealed: session.rounds_revealed(),
        }
    }
}

impl ShakeSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(self)
    }
}

/// Serialize a session snapshot as pretty JSON.
pub fn export_snapshot(session: &ShakeSession) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&session.snapshot())
}
