use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::engine::input::{Input, InputState};

/// Maps each logical action to the physical inputs that trigger it.
///
/// Action-level edges treat the bound inputs as one virtual button: it is
/// held while any of them is held, goes down when the first one is pressed
/// and comes up when the last one is released.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "A: Serialize + Eq + Hash",
    deserialize = "A: Deserialize<'de> + Eq + Hash"
))]
#[serde(transparent)]
pub struct InputMap<A> {
    bindings: HashMap<A, Vec<Input>>,
}

impl<A: Eq + Hash> PartialEq for InputMap<A> {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl<A: Eq + Hash> Eq for InputMap<A> {}

impl<A> Default for InputMap<A> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<A: Copy + Eq + Hash> InputMap<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `input` to `action`'s bindings. Binding the same input twice is a no-op.
    ///
    /// An input may serve several actions, but an [`InputBuffer`] keeps one
    /// press per input, so such a press is consumed by whichever action is
    /// queried first. That case is logged.
    ///
    /// [`InputBuffer`]: crate::engine::buffer::InputBuffer
    pub fn bind(&mut self, action: A, input: Input) -> &mut Self {
        if self.actions_for(input).any(|bound| bound != action) {
            tracing::warn!(
                ?input,
                "input bound to more than one action; buffered presses are shared"
            );
        }
        let inputs = self.bindings.entry(action).or_default();
        if !inputs.contains(&input) {
            inputs.push(input);
        }
        self
    }

    pub fn with(mut self, action: A, inputs: &[Input]) -> Self {
        for input in inputs {
            self.bind(action, *input);
        }
        self
    }

    /// Bound inputs of `action`; empty for an unmapped action.
    pub fn inputs(&self, action: A) -> &[Input] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every input bound to any action.
    pub fn all_inputs(&self) -> impl Iterator<Item = Input> + '_ {
        self.bindings.values().flatten().copied()
    }

    /// Actions `input` is bound to.
    pub fn actions_for(&self, input: Input) -> impl Iterator<Item = A> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, inputs)| inputs.contains(&input))
            .map(|(action, _)| *action)
    }

    pub fn is_held(&self, state: &InputState, action: A) -> bool {
        self.inputs(action).iter().any(|i| state.is_held(*i))
    }

    /// True on the frame the action goes down: some bound input was pressed
    /// and no other bound input was already held.
    pub fn just_pressed(&self, state: &InputState, action: A) -> bool {
        let inputs = self.inputs(action);
        let pressed = inputs.iter().any(|i| state.just_pressed(*i));
        let held_before = inputs
            .iter()
            .any(|i| state.is_held(*i) && !state.just_pressed(*i));
        pressed && !held_before
    }

    /// True on the frame the last held bound input is released.
    pub fn just_released(&self, state: &InputState, action: A) -> bool {
        let inputs = self.inputs(action);
        inputs.iter().any(|i| state.just_released(*i)) && !self.is_held(state, action)
    }
}
