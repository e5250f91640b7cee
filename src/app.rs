use std::path::{Path, PathBuf};

use crate::components::{DinoFsm, DinoState, DinoWorld};
use crate::config::{Action, GameConfig};
use crate::engine::buffer::InputBuffer;
use crate::engine::input::InputState;
use crate::engine::time::Timestamp;
use crate::error::Result;
use crate::obstacle::{ObstacleKind, Treadmill};
use crate::score::{HighScore, SaveData, Score};
use crate::script::{EdgeKind, InputScript, ScriptEvent};
use crate::systems::dino_fsm;

/// Simulation step used by headless runs.
pub const FIXED_DT: f32 = 1.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Paused,
    /// The dino hit an obstacle. A jump press starts a new run.
    GameOver,
}

/// One play session: the dino, its input, the track and the scores.
///
/// The host owns the clock and the event source. Each frame it clears last
/// frame's edges via [`input_mut`](Self::input_mut), feeds new events, then
/// calls [`frame`](Self::frame).
pub struct GameApp {
    world: DinoWorld,
    fsm: DinoFsm,
    treadmill: Treadmill,
    score: Score,
    high_score: HighScore,
    focused: bool,
    manual_pause: bool,
    save_path: PathBuf,
    /// Fixed steps simulated by `run_script` so far; its clock.
    ticks: u64,
}

impl GameApp {
    pub fn new(config: GameConfig, save_path: impl Into<PathBuf>, seed: u64) -> Result<Self> {
        let save_path = save_path.into();
        let save = SaveData::load(&save_path)?;

        let tuning = config.tuning;
        let treadmill = Treadmill::new(tuning.treadmill_speed, tuning.treadmill_acceleration, seed);
        let mut score = Score::new(tuning.score_rate);
        score.start();

        let mut world = DinoWorld::new(tuning, InputBuffer::new(config.bindings));
        let fsm = dino_fsm(&mut world)?;

        tracing::info!(high_score = save.high_score, seed, "session started");
        Ok(Self {
            world,
            fsm,
            treadmill,
            score,
            high_score: HighScore::new(save.high_score),
            focused: true,
            manual_pause: false,
            save_path,
            ticks: 0,
        })
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.world.input
    }

    pub fn world(&self) -> &DinoWorld {
        &self.world
    }

    pub fn state(&self) -> DinoState {
        self.fsm.current()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn treadmill(&self) -> &Treadmill {
        &self.treadmill
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn game_state(&self) -> GameState {
        if !self.focused || self.manual_pause {
            GameState::Paused
        } else if !self.score.is_running() {
            GameState::GameOver
        } else {
            GameState::Running
        }
    }

    /// Losing window focus pauses the game; regaining it resumes.
    pub fn set_focus(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            tracing::info!(focused, "window focus changed");
        }
    }

    /// Advance one frame ending at `now`.
    ///
    /// Presses are recorded into the input buffer even while paused, so a
    /// press made right before resuming still counts.
    pub fn frame(&mut self, dt: f32, now: Timestamp) -> Result<()> {
        self.world.now = now;
        self.world.buffer.record_frame(&self.world.input, now);
        self.handle_toggles();

        match self.game_state() {
            GameState::Paused => return Ok(()),
            GameState::GameOver => {
                if self.world.just_pressed(Action::Jump) {
                    self.retry()?;
                }
                return Ok(());
            }
            GameState::Running => {}
        }

        let before = self.fsm.current();
        self.fsm.update(&mut self.world, dt)?;
        let after = self.fsm.current();
        if after != before {
            tracing::info!(t_ms = now.as_millis(), from = ?before, to = ?after, "dino");
        }

        self.treadmill.tick(dt);
        self.score.tick(dt);

        let hit = self
            .treadmill
            .hit_by(self.world.hitbox, self.world.hitbox_centre())
            .map(|o| o.kind);
        if let Some(kind) = hit {
            self.game_over(kind);
        }
        Ok(())
    }

    fn game_over(&mut self, kind: ObstacleKind) {
        self.score.stop();
        let record = self.high_score.submit(self.score.value);
        tracing::info!(?kind, score = self.score.value, record, "dino hit, game over");
    }

    /// Start a new run: empty track at the starting speed, score from zero,
    /// dino standing on the floor. The press that asked for the retry is
    /// consumed and does not jump.
    pub fn retry(&mut self) -> Result<()> {
        self.treadmill.reset();
        self.score.start();
        self.world.body.position.y = self.world.floor.y;
        self.world.buffer.invalidate(Action::Jump);
        self.fsm.transition_to(&mut self.world, DinoState::Grounded)?;
        tracing::info!("retry");
        Ok(())
    }

    fn handle_toggles(&mut self) {
        if self.world.just_pressed(Action::ToggleBuffer) {
            self.world.buffering = !self.world.buffering;
            let label = if self.world.buffering { "ON" } else { "OFF" };
            tracing::info!("Input buffer {label}");
        }
        if self.world.just_pressed(Action::Pause) {
            self.manual_pause = !self.manual_pause;
            tracing::info!(paused = self.manual_pause, "pause toggled");
        }
    }

    /// Scores plus dino state, e.g. `HI 00042  00017  Jumping`.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "{}  {}  {:?}",
            self.high_score.label(),
            self.score.label(),
            self.fsm.current()
        );
        match self.game_state() {
            GameState::Paused => line.push_str("  (paused)"),
            GameState::GameOver => line.push_str("  (game over, jump to retry)"),
            GameState::Running => {}
        }
        line
    }

    fn apply(&mut self, event: ScriptEvent) {
        let Some(&input) = self.world.buffer.bindings().inputs(event.action).first() else {
            tracing::warn!(action = event.action.name(), "scripted action has no bindings");
            return;
        };
        match event.kind {
            EdgeKind::Press => self.world.input.press(input),
            EdgeKind::Release => self.world.input.release(input),
        }
    }

    /// Headless loop: `seconds` of fixed-step frames driven by `script`,
    /// continuing the clock of earlier calls. Returns the number of frames
    /// simulated.
    pub fn run_script(&mut self, script: &mut InputScript, seconds: f32) -> Result<u32> {
        let frames = (seconds.max(0.0) / FIXED_DT).ceil() as u32;
        for _ in 0..frames {
            self.ticks += 1;
            let now = Timestamp::from_secs_f64(self.ticks as f64 * f64::from(FIXED_DT));
            self.world.input.begin_frame();
            for event in script.due(now) {
                self.apply(*event);
            }
            self.frame(FIXED_DT, now)?;
        }
        Ok(frames)
    }

    /// End the session: keep the score if it is a new best and write the
    /// save file. Returns the high score.
    pub fn finish(mut self) -> Result<f32> {
        self.score.stop();
        if self.high_score.submit(self.score.value) {
            tracing::info!(score = self.score.value, "new high score");
        }
        SaveData {
            high_score: self.high_score.best,
        }
        .save(&self.save_path)?;
        Ok(self.high_score.best)
    }

    /// Interactive loop on an SDL2 window until the window closes or Escape
    /// is pressed.
    #[cfg(feature = "window")]
    pub fn run_window(&mut self, host: &mut crate::engine::window::WindowHost) -> Result<()> {
        use crate::engine::time::FrameTimer;

        /// Longest step simulated at once, so a stall does not tunnel the dino
        /// through the floor.
        const MAX_FRAME_DT: f32 = 0.05;

        let mut timer = FrameTimer::new();
        loop {
            timer.tick();
            self.world.input.begin_frame();
            let focus = host.poll(&mut self.world.input);
            if self.world.input.should_quit() {
                break;
            }
            if let Some(focused) = focus {
                self.set_focus(focused);
            }

            self.frame(timer.dt.min(MAX_FRAME_DT), timer.now())?;
            host.draw(&self.world, &self.treadmill);
            host.set_status(&self.status_line());
        }
        Ok(())
    }
}
