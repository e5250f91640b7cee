use glam::Vec2;

use crate::components::physics::{Body, Floor, Hitbox};
use crate::config::{Action, Tuning};
use crate::engine::buffer::InputBuffer;
use crate::engine::input::InputState;
use crate::engine::time::Timestamp;
use crate::fsm::StateMachine;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Top-level dino states.
///
/// Behaviour for each lives in `src/systems/dino.rs`; this file stays data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DinoState {
    /// On the floor. Owns the [`Stance`] sub-machine.
    Grounded,
    /// Airborne after a jump, until the floor is touched again.
    Jumping,
}

/// Sub-states of [`DinoState::Grounded`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stance {
    Running,
    Ducking,
}

/// Animation the sprite should show. Played by whatever renders the dino.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Animation {
    Run,
    Duck,
    Jump,
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Everything the dino's state callbacks read and write.
pub struct DinoWorld {
    pub body: Body,
    pub floor: Floor,
    pub hitbox: Hitbox,
    pub ducking: bool,
    /// Number of hitbox swaps so far; each duck and each stand-up is one.
    pub hitbox_swaps: u32,
    pub animation: Animation,
    pub tuning: Tuning,
    pub input: InputState,
    pub buffer: InputBuffer<Action>,
    /// Time of the frame being simulated.
    pub now: Timestamp,
    /// When off, jumps need a press on the current frame.
    pub buffering: bool,
}

impl DinoWorld {
    pub fn new(tuning: Tuning, buffer: InputBuffer<Action>) -> Self {
        let floor = Floor::default();
        Self {
            body: Body::at(Vec2::new(0.0, floor.y), tuning.gravity),
            floor,
            hitbox: Hitbox::STANDING,
            ducking: false,
            hitbox_swaps: 0,
            animation: Animation::Run,
            tuning,
            input: InputState::new(),
            buffer,
            now: Timestamp::ZERO,
            buffering: true,
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.buffer.bindings().is_held(&self.input, action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.buffer.bindings().just_pressed(&self.input, action)
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.buffer.bindings().just_released(&self.input, action)
    }

    /// Consume a jump press: buffered within the window, or on this frame
    /// only when buffering is off.
    pub fn take_jump(&mut self) -> bool {
        if self.buffering {
            self.buffer.is_buffered(Action::Jump, self.now)
        } else {
            self.just_pressed(Action::Jump)
        }
    }

    /// Centre of the active hitbox; the body position is the dino's feet.
    pub fn hitbox_centre(&self) -> Vec2 {
        self.hitbox.centre_above(self.body.position)
    }

    pub fn set_ducking(&mut self, ducking: bool) {
        if self.ducking == ducking {
            return;
        }
        self.ducking = ducking;
        self.hitbox = if ducking { Hitbox::DUCKING } else { Hitbox::STANDING };
        self.hitbox_swaps += 1;
    }
}

/// Dino controller: [`DinoState`] machine over a [`DinoWorld`].
pub type DinoFsm = StateMachine<DinoState, DinoWorld>;
