use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::bindings::InputMap;
use crate::engine::input::{Input, Key};
use crate::error::{GameError, Result};

/// Logical actions the game reads. Names are the snake_case forms used in
/// config files and input scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Jump,
    Duck,
    ToggleBuffer,
    Pause,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Jump, Action::Duck, Action::ToggleBuffer, Action::Pause];

    pub fn name(self) -> &'static str {
        match self {
            Action::Jump => "jump",
            Action::Duck => "duck",
            Action::ToggleBuffer => "toggle_buffer",
            Action::Pause => "pause",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.name() == name)
    }
}

/// Movement and pacing numbers. Pixels, seconds, y axis pointing down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration while airborne.
    pub gravity: f32,
    /// Replaces `gravity` for the rest of the ascent once jump is released.
    pub short_hop_gravity: f32,
    /// Upward speed the moment the dino leaves the ground.
    pub initial_jump_speed: f32,
    /// Score points per second.
    pub score_rate: f32,
    pub treadmill_speed: f32,
    pub treadmill_acceleration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2400.0,
            short_hop_gravity: 4800.0,
            initial_jump_speed: 800.0,
            score_rate: 10.0,
            treadmill_speed: 600.0,
            treadmill_acceleration: 2.0,
        }
    }
}

pub fn default_bindings() -> InputMap<Action> {
    InputMap::new()
        .with(
            Action::Jump,
            &[Input::Key(Key::Space), Input::Key(Key::Up), Input::Key(Key::W), Input::Button(0)],
        )
        .with(
            Action::Duck,
            &[Input::Key(Key::Down), Input::Key(Key::S), Input::Button(1)],
        )
        .with(Action::ToggleBuffer, &[Input::Key(Key::B)])
        .with(Action::Pause, &[Input::Key(Key::P), Input::Button(7)])
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub bindings: InputMap<Action>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            bindings: default_bindings(),
        }
    }
}

impl GameConfig {
    /// Read a JSON config. Missing fields keep their defaults; a present
    /// `bindings` object replaces the default bindings entirely.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
