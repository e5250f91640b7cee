//! Dino runner: a small side-scrolling jump game built around a reusable
//! hierarchical state machine and a time-windowed input buffer.

pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod obstacle;
pub mod score;
pub mod script;
pub mod systems;
pub mod weighted;

pub use app::{GameApp, GameState};
pub use error::{GameError, Result};
