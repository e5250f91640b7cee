use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Default save file, relative to the working directory.
pub const SAVE_PATH: &str = "save.json";

/// Points accumulated during the current run.
pub struct Score {
    pub value: f32,
    /// Points per second.
    pub rate: f32,
    running: bool,
}

impl Score {
    pub fn new(rate: f32) -> Self {
        Self {
            value: 0.0,
            rate,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.value = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self, dt: f32) {
        if self.running {
            self.value += self.rate * dt;
        }
    }

    /// Whole points, zero-padded to five digits.
    pub fn label(&self) -> String {
        format!("{:05}", self.value.floor() as u64)
    }
}

pub struct HighScore {
    pub best: f32,
}

impl HighScore {
    pub fn new(best: f32) -> Self {
        Self { best }
    }

    /// Keep `score` if it beats the best so far. Returns whether it did.
    pub fn submit(&mut self, score: f32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    pub fn label(&self) -> String {
        format!("HI {:05}", self.best.floor() as u64)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub high_score: f32,
}

impl SaveData {
    /// Read save data from `path`. A missing file is a fresh save.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(GameError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), high_score = self.high_score, "saved");
        Ok(())
    }
}
