//! Timed input for headless runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Action;
use crate::engine::time::Timestamp;
use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Press,
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub at_ms: u64,
    pub action: Action,
    pub kind: EdgeKind,
}

impl ScriptEvent {
    /// Parse the command-line form `ACTION@MILLISECONDS`, e.g. `jump@120`.
    pub fn parse(text: &str, kind: EdgeKind) -> Result<Self> {
        let (name, at) = text
            .split_once('@')
            .ok_or_else(|| GameError::BadScriptEntry(text.to_string()))?;
        let action =
            Action::from_name(name.trim()).ok_or_else(|| GameError::UnknownAction(name.to_string()))?;
        let at_ms = at
            .trim()
            .parse()
            .map_err(|_| GameError::BadScriptEntry(text.to_string()))?;
        Ok(Self { at_ms, action, kind })
    }
}

/// Events ordered by time, handed out as the simulation clock passes them.
#[derive(Clone, Debug, Default)]
pub struct InputScript {
    events: Vec<ScriptEvent>,
    cursor: usize,
}

impl InputScript {
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        // Stable: same-time events keep their given order.
        events.sort_by_key(|e| e.at_ms);
        Self { events, cursor: 0 }
    }

    /// Load a JSON array of events.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let events = serde_json::from_str(&text).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(events))
    }

    pub fn extend(&mut self, more: impl IntoIterator<Item = ScriptEvent>) {
        let mut events: Vec<ScriptEvent> = self.events.drain(self.cursor..).collect();
        events.extend(more);
        *self = Self::new(events);
    }

    /// Events due at or before `now` that have not been handed out yet.
    pub fn due(&mut self, now: Timestamp) -> &[ScriptEvent] {
        let start = self.cursor;
        while self
            .events
            .get(self.cursor)
            .is_some_and(|e| e.at_ms <= now.as_millis())
        {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
