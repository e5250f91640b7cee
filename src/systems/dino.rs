use std::collections::HashMap;

use crate::components::{Animation, DinoFsm, DinoState, DinoWorld, Stance};
use crate::config::Action;
use crate::fsm::{FsmError, StateMachine, StateSpec};
use crate::systems::physics::{integrate, slide_on_floor};

// ---------------------------------------------------------------------------
// Grounded
// ---------------------------------------------------------------------------

fn grounded_enter(w: &mut DinoWorld) {
    w.body.velocity.y = 0.0;
    w.body.gravity = w.tuning.gravity;
    w.animation = Animation::Run;
}

fn grounded_update(w: &mut DinoWorld, _dt: f32) -> Option<DinoState> {
    w.take_jump().then_some(DinoState::Jumping)
}

// Stance sub-machine. Ducking starts on the press edge and ends on the
// release edge; holding the key across frames never re-triggers it.

fn running_update(w: &mut DinoWorld, _dt: f32) -> Option<Stance> {
    w.just_pressed(Action::Duck).then_some(Stance::Ducking)
}

fn ducking_enter(w: &mut DinoWorld) {
    w.set_ducking(true);
    w.animation = Animation::Duck;
}

fn ducking_update(w: &mut DinoWorld, _dt: f32) -> Option<Stance> {
    w.just_released(Action::Duck).then_some(Stance::Running)
}

fn ducking_exit(w: &mut DinoWorld) {
    w.set_ducking(false);
    w.animation = Animation::Run;
}

// ---------------------------------------------------------------------------
// Jumping
// ---------------------------------------------------------------------------

fn jumping_enter(w: &mut DinoWorld) {
    w.body.velocity.y = -w.tuning.initial_jump_speed;
    w.body.gravity = w.tuning.gravity;
    w.animation = Animation::Jump;
}

/// Variable jump height: rising without jump held (released mid-air, tapped
/// within one frame, or let go before a buffered jump started) switches to the
/// heavier short-hop gravity until the apex, where regular gravity returns.
fn jumping_update(w: &mut DinoWorld, dt: f32) -> Option<DinoState> {
    if w.body.is_rising() && !w.is_held(Action::Jump) {
        w.body.gravity = w.tuning.short_hop_gravity;
    }

    integrate(&mut w.body, dt);

    if !w.body.is_rising() {
        w.body.gravity = w.tuning.gravity;
    }

    slide_on_floor(&mut w.body, w.floor).then_some(DinoState::Grounded)
}

fn jumping_exit(w: &mut DinoWorld) {
    w.body.gravity = w.tuning.gravity;
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the dino controller. Starts `Grounded` / `Running`; the enter
/// callbacks of both initial states run against `world` here.
pub fn dino_fsm(world: &mut DinoWorld) -> Result<DinoFsm, FsmError> {
    let stance = StateMachine::new(
        HashMap::from([
            (Stance::Running, StateSpec::new().on_update(running_update)),
            (
                Stance::Ducking,
                StateSpec::new()
                    .on_enter(ducking_enter)
                    .on_update(ducking_update)
                    .on_exit(ducking_exit),
            ),
        ]),
        Stance::Running,
        world,
    )?;

    StateMachine::new(
        HashMap::from([
            (
                DinoState::Grounded,
                StateSpec::new()
                    .on_enter(grounded_enter)
                    .on_update(grounded_update)
                    .with_child(stance),
            ),
            (
                DinoState::Jumping,
                StateSpec::new()
                    .on_enter(jumping_enter)
                    .on_update(jumping_update)
                    .on_exit(jumping_exit),
            ),
        ]),
        DinoState::Grounded,
        world,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Hitbox;
    use crate::config::{default_bindings, Tuning};
    use crate::engine::buffer::InputBuffer;
    use crate::engine::input::{Input, Key};
    use crate::engine::time::Timestamp;

    // Power-of-two step keeps the gravity arithmetic exact.
    const DT: f32 = 1.0 / 64.0;
    const SPACE: Input = Input::Key(Key::Space);
    const DOWN: Input = Input::Key(Key::Down);

    #[derive(Clone, Copy)]
    enum Edge {
        Press(Input),
        Release(Input),
    }

    struct Harness {
        world: DinoWorld,
        fsm: DinoFsm,
        frame: u32,
    }

    impl Harness {
        fn new() -> Self {
            let mut world = DinoWorld::new(Tuning::default(), InputBuffer::new(default_bindings()));
            let fsm = dino_fsm(&mut world).unwrap();
            Self { world, fsm, frame: 0 }
        }

        fn step(&mut self, edges: &[Edge]) {
            self.frame += 1;
            self.world.now = Timestamp::from_secs_f64(f64::from(self.frame) * f64::from(DT));
            self.world.input.begin_frame();
            for edge in edges {
                match *edge {
                    Edge::Press(input) => self.world.input.press(input),
                    Edge::Release(input) => self.world.input.release(input),
                }
            }
            self.world.buffer.record_frame(&self.world.input, self.world.now);
            self.fsm.update(&mut self.world, DT).unwrap();
        }

        fn idle(&mut self) {
            self.step(&[]);
        }

        fn state(&self) -> DinoState {
            self.fsm.current()
        }
    }

    /// Run `frames` frames from a fresh dino and return the state after each
    /// one; index 0 is the state before the first frame.
    fn play(script: &[(u32, Edge)], frames: u32, buffering: bool) -> Vec<DinoState> {
        let mut h = Harness::new();
        h.world.buffering = buffering;
        let mut states = vec![h.state()];
        for frame in 1..=frames {
            let edges: Vec<Edge> = script
                .iter()
                .filter(|(at, _)| *at == frame)
                .map(|(_, edge)| *edge)
                .collect();
            h.step(&edges);
            states.push(h.state());
        }
        states
    }

    fn first_landing(states: &[DinoState]) -> usize {
        states
            .windows(2)
            .position(|w| w[0] == DinoState::Jumping && w[1] == DinoState::Grounded)
            .map(|i| i + 1)
            .expect("dino never landed")
    }

    #[test]
    fn starts_grounded_and_running() {
        let h = Harness::new();
        assert_eq!(h.state(), DinoState::Grounded);
        assert_eq!(h.world.animation, Animation::Run);
        assert!(!h.world.ducking);
        assert_eq!(h.world.hitbox_swaps, 0);
    }

    #[test]
    fn short_hop_switches_gravity_until_apex() {
        let mut h = Harness::new();
        h.step(&[Edge::Press(SPACE)]);
        assert_eq!(h.state(), DinoState::Jumping);
        assert_eq!(h.world.body.velocity.y, -800.0);
        assert_eq!(h.world.body.gravity, 2400.0);

        h.step(&[Edge::Release(SPACE)]);
        assert_eq!(h.world.body.gravity, 4800.0);
        assert_eq!(h.world.body.velocity.y, -725.0);

        let mut ticks = 0;
        while h.world.body.is_rising() {
            assert_eq!(h.world.body.gravity, 4800.0);
            h.idle();
            ticks += 1;
            assert!(ticks < 64, "still rising after {ticks} ticks");
        }
        assert_eq!(h.world.body.gravity, 2400.0);

        while h.state() == DinoState::Jumping {
            h.idle();
            ticks += 1;
            assert!(ticks < 256, "never landed");
        }
        assert_eq!(h.world.body.position.y, h.world.floor.y);
        assert_eq!(h.world.body.velocity.y, 0.0);
        assert_eq!(h.world.animation, Animation::Run);
    }

    #[test]
    fn holding_jump_keeps_regular_gravity() {
        let mut h = Harness::new();
        h.step(&[Edge::Press(SPACE)]);
        let mut apex = 0.0_f32;
        while h.state() == DinoState::Jumping {
            assert_eq!(h.world.body.gravity, 2400.0);
            h.idle();
            apex = apex.min(h.world.body.position.y);
        }

        let mut hop = Harness::new();
        hop.step(&[Edge::Press(SPACE)]);
        hop.step(&[Edge::Release(SPACE)]);
        let mut hop_apex = hop.world.body.position.y;
        while hop.state() == DinoState::Jumping {
            hop.idle();
            hop_apex = hop_apex.min(hop.world.body.position.y);
        }

        // y points down: the full jump reaches further up.
        assert!(apex < hop_apex);
    }

    fn apex_of(script: &[(u32, Edge)]) -> f32 {
        let mut h = Harness::new();
        let mut apex = 0.0_f32;
        for frame in 1..=200 {
            let edges: Vec<Edge> = script
                .iter()
                .filter(|(at, _)| *at == frame)
                .map(|(_, edge)| *edge)
                .collect();
            h.step(&edges);
            apex = apex.min(h.world.body.position.y);
        }
        apex
    }

    #[test]
    fn same_frame_tap_is_a_short_hop() {
        let held = apex_of(&[(1, Edge::Press(SPACE))]);
        let tap = apex_of(&[(1, Edge::Press(SPACE)), (1, Edge::Release(SPACE))]);
        let next_tick = apex_of(&[(1, Edge::Press(SPACE)), (2, Edge::Release(SPACE))]);

        assert_eq!(tap, next_tick);
        assert!(held < tap, "held {held}, tap {tap}");
    }

    #[test]
    fn buffered_jump_released_before_landing_is_a_short_hop() {
        let base = [(1, Edge::Press(SPACE)), (5, Edge::Release(SPACE))];
        let landing = first_landing(&play(&base, 200, true)) as u32;

        let mut h = Harness::new();
        for frame in 1..=landing + 1 {
            let edge = match frame {
                1 => Some(Edge::Press(SPACE)),
                5 => Some(Edge::Release(SPACE)),
                f if f == landing - 3 => Some(Edge::Press(SPACE)),
                f if f == landing - 1 => Some(Edge::Release(SPACE)),
                _ => None,
            };
            match edge {
                Some(edge) => h.step(&[edge]),
                None => h.idle(),
            }
        }
        assert_eq!(h.state(), DinoState::Jumping);
        assert_eq!(h.world.body.velocity.y, -800.0);

        h.idle();
        assert_eq!(h.world.body.gravity, 4800.0);
        assert_eq!(h.world.body.velocity.y, -725.0);
    }

    #[test]
    fn releasing_on_the_way_down_changes_nothing() {
        let mut h = Harness::new();
        h.step(&[Edge::Press(SPACE)]);
        while h.world.body.is_rising() {
            h.idle();
        }
        h.step(&[Edge::Release(SPACE)]);
        assert_eq!(h.world.body.gravity, 2400.0);
    }

    #[test]
    fn duck_toggles_once_per_edge() {
        let mut h = Harness::new();
        h.step(&[Edge::Press(DOWN)]);
        assert!(h.world.ducking);
        assert_eq!(h.world.hitbox, Hitbox::DUCKING);
        assert_eq!(h.world.hitbox_swaps, 1);
        assert_eq!(h.world.animation, Animation::Duck);

        // OS key repeat while held.
        for _ in 0..5 {
            h.step(&[Edge::Press(DOWN)]);
            assert!(h.world.ducking);
            assert_eq!(h.world.hitbox_swaps, 1);
        }

        h.step(&[Edge::Release(DOWN)]);
        assert!(!h.world.ducking);
        assert_eq!(h.world.hitbox, Hitbox::STANDING);
        assert_eq!(h.world.hitbox_swaps, 2);

        h.idle();
        assert_eq!(h.world.hitbox_swaps, 2);
        assert_eq!(h.state(), DinoState::Grounded);
    }

    #[test]
    fn jumping_from_a_duck_stands_up_first() {
        let mut h = Harness::new();
        h.step(&[Edge::Press(DOWN)]);
        h.step(&[Edge::Press(SPACE)]);
        assert_eq!(h.state(), DinoState::Jumping);
        assert!(!h.world.ducking);
        assert_eq!(h.world.hitbox, Hitbox::STANDING);
        assert_eq!(h.world.animation, Animation::Jump);

        // Duck still held on landing: no new press edge, so no duck.
        while h.state() == DinoState::Jumping {
            h.idle();
        }
        h.idle();
        assert!(!h.world.ducking);
    }

    #[test]
    fn press_just_before_landing_is_buffered() {
        let base = [(1, Edge::Press(SPACE)), (5, Edge::Release(SPACE))];
        let landing = first_landing(&play(&base, 200, true));
        let frames = landing as u32 + 1;

        let early = landing as u32 - 3;
        let script = [base[0], base[1], (early, Edge::Press(SPACE))];
        let states = play(&script, frames, true);
        assert_eq!(states[landing], DinoState::Grounded);
        assert_eq!(states[landing + 1], DinoState::Jumping);
    }

    #[test]
    fn press_outside_the_window_is_dropped() {
        let base = [(1, Edge::Press(SPACE)), (5, Edge::Release(SPACE))];
        let landing = first_landing(&play(&base, 200, true));
        let frames = landing as u32 + 1;

        let too_early = landing as u32 - 12;
        let script = [base[0], base[1], (too_early, Edge::Press(SPACE))];
        let states = play(&script, frames, true);
        assert_eq!(states[landing + 1], DinoState::Grounded);
    }

    #[test]
    fn without_buffering_early_press_is_lost() {
        let base = [(1, Edge::Press(SPACE)), (5, Edge::Release(SPACE))];
        let landing = first_landing(&play(&base, 200, false));
        let frames = landing as u32 + 1;

        let early = landing as u32 - 3;
        let script = [base[0], base[1], (early, Edge::Press(SPACE))];
        let states = play(&script, frames, false);
        assert_eq!(states[landing + 1], DinoState::Grounded);
    }

    #[test]
    fn without_buffering_press_on_ground_still_jumps() {
        let states = play(&[(2, Edge::Press(SPACE))], 2, false);
        assert_eq!(states[1], DinoState::Grounded);
        assert_eq!(states[2], DinoState::Jumping);
    }

    #[test]
    fn one_press_gives_one_jump() {
        let mut h = Harness::new();
        h.step(&[Edge::Press(SPACE)]);
        while h.state() == DinoState::Jumping {
            h.idle();
        }
        // The press that started the first jump was consumed.
        h.idle();
        assert_eq!(h.state(), DinoState::Grounded);
    }
}
