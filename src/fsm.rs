use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

/// Anything usable as a state key: usually a fieldless `enum`.
pub trait StateId: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> StateId for T {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    /// The key has no [`StateSpec`] in the machine's table.
    #[error("unknown state `{0}`")]
    UnknownState(String),
}

impl FsmError {
    fn unknown<S: Debug>(state: S) -> Self {
        Self::UnknownState(format!("{state:?}"))
    }
}

type HookFn<C> = Box<dyn FnMut(&mut C)>;
type UpdateFn<S, C> = Box<dyn FnMut(&mut C, f32) -> Option<S>>;

/// Behaviour of one state: up to three callbacks plus an optional child machine.
///
/// Missing callbacks are no-ops. `update` returns `Some(next)` to request a
/// transition, which the owning machine performs as soon as the callback returns.
pub struct StateSpec<S, C> {
    enter: Option<HookFn<C>>,
    update: Option<UpdateFn<S, C>>,
    exit: Option<HookFn<C>>,
    child: Option<Box<dyn Submachine<C>>>,
}

impl<S, C> Default for StateSpec<S, C> {
    fn default() -> Self {
        Self {
            enter: None,
            update: None,
            exit: None,
            child: None,
        }
    }
}

impl<S, C> StateSpec<S, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&mut C, f32) -> Option<S> + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_exit(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.exit = Some(Box::new(f));
        self
    }

    /// Attach a child machine that is updated after this state's own
    /// `update` for as long as this state is active.
    ///
    /// When the parent leaves this state the child is sent back to its
    /// initial state (child exit, then child initial enter) before the
    /// parent's `exit` runs, so every visit starts from the same sub-state.
    pub fn with_child<S2: StateId>(mut self, child: StateMachine<S2, C>) -> Self
    where
        C: 'static,
    {
        self.child = Some(Box::new(child));
        self
    }
}

/// Type-erased view of a child machine, so a parent keyed by `S` can own a
/// child keyed by any other state type sharing the same context.
pub trait Submachine<C> {
    fn update(&mut self, ctx: &mut C, dt: f32) -> Result<(), FsmError>;

    /// Return to the initial state. No-op when already there.
    fn reset(&mut self, ctx: &mut C) -> Result<(), FsmError>;
}

/// Hierarchical finite-state machine.
///
/// `S` is the state key (usually an enum), `C` the context every callback
/// receives mutably: the object whose behaviour the machine structures. The
/// machine itself is a dispatch table plus the current key; all domain logic
/// lives in the callbacks.
///
/// Ordering guarantees:
/// - the initial state's `enter` fires once, during [`StateMachine::new`];
/// - a transition runs `exit` of the old state strictly before `enter` of the
///   new one, including self-transitions;
/// - a child machine is updated only after the parent's own `update` returned
///   without requesting a transition.
///
/// Dropping the machine does not fire any `exit`.
///
/// # Usage
/// ```
/// use std::collections::HashMap;
/// use dino_runner::fsm::{StateMachine, StateSpec};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Light { Red, Green }
///
/// let mut elapsed = 0.0_f32;
/// let table = HashMap::from([
///     (Light::Red, StateSpec::new().on_update(|t: &mut f32, dt| {
///         *t += dt;
///         (*t > 1.0).then_some(Light::Green)
///     })),
///     (Light::Green, StateSpec::new().on_enter(|t: &mut f32| *t = 0.0)),
/// ]);
/// let mut fsm = StateMachine::new(table, Light::Red, &mut elapsed).unwrap();
/// fsm.update(&mut elapsed, 0.6).unwrap();
/// fsm.update(&mut elapsed, 0.6).unwrap();
/// assert_eq!(fsm.current(), Light::Green);
/// ```
pub struct StateMachine<S: StateId, C> {
    states: HashMap<S, StateSpec<S, C>>,
    current: S,
    previous: S,
    initial: S,
}

impl<S: StateId, C> StateMachine<S, C> {
    /// Store `states`, start in `initial` and fire its `enter`.
    pub fn new(
        states: HashMap<S, StateSpec<S, C>>,
        initial: S,
        ctx: &mut C,
    ) -> Result<Self, FsmError> {
        let mut machine = Self {
            states,
            current: initial,
            previous: initial,
            initial,
        };
        let spec = machine
            .states
            .get_mut(&initial)
            .ok_or_else(|| FsmError::unknown(initial))?;
        if let Some(enter) = spec.enter.as_mut() {
            enter(ctx);
        }
        tracing::debug!(state = ?initial, "state machine started");
        Ok(machine)
    }

    pub fn current(&self) -> S {
        self.current
    }

    /// State active before the most recent transition (the initial state
    /// until the first transition).
    pub fn previous(&self) -> S {
        self.previous
    }

    /// Run the current state's `update`, then apply the transition it
    /// requested or, if none, update the state's child machine.
    ///
    /// `dt` is only forwarded to callbacks; the machine keeps no clock.
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> Result<(), FsmError> {
        let current = self.current;
        let requested = {
            let spec = self
                .states
                .get_mut(&current)
                .ok_or_else(|| FsmError::unknown(current))?;
            spec.update.as_mut().and_then(|update| update(ctx, dt))
        };

        if let Some(next) = requested {
            return self.transition_to(ctx, next);
        }

        if let Some(child) = self
            .states
            .get_mut(&current)
            .and_then(|spec| spec.child.as_mut())
        {
            child.update(ctx, dt)?;
        }
        Ok(())
    }

    /// Leave the current state and enter `next`.
    ///
    /// There is no same-state guard: `transition_to(current)` fires `exit`
    /// then `enter`. An unknown `next` fails before any callback runs.
    pub fn transition_to(&mut self, ctx: &mut C, next: S) -> Result<(), FsmError> {
        if !self.states.contains_key(&next) {
            return Err(FsmError::unknown(next));
        }

        let prev = self.current;
        if let Some(spec) = self.states.get_mut(&prev) {
            if let Some(child) = spec.child.as_mut() {
                child.reset(ctx)?;
            }
            if let Some(exit) = spec.exit.as_mut() {
                exit(ctx);
            }
        }

        self.previous = prev;
        self.current = next;

        if let Some(enter) = self
            .states
            .get_mut(&next)
            .and_then(|spec| spec.enter.as_mut())
        {
            enter(ctx);
        }

        tracing::debug!(from = ?prev, to = ?next, "state transition");
        Ok(())
    }
}

impl<S: StateId, C> Submachine<C> for StateMachine<S, C> {
    fn update(&mut self, ctx: &mut C, dt: f32) -> Result<(), FsmError> {
        StateMachine::update(self, ctx, dt)
    }

    fn reset(&mut self, ctx: &mut C) -> Result<(), FsmError> {
        if self.current == self.initial {
            return Ok(());
        }
        self.transition_to(ctx, self.initial)
    }
}
