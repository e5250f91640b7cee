use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dino_runner::config::GameConfig;
use dino_runner::script::{EdgeKind, InputScript, ScriptEvent};
use dino_runner::score::SAVE_PATH;
use dino_runner::GameApp;

#[derive(Parser)]
#[command(name = "dino-runner", about = "Endless runner with a buffered jump")]
struct Args {
    /// Tuning and key bindings as JSON. Built-in defaults otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the high score is kept.
    #[arg(long, global = true, default_value = SAVE_PATH)]
    save: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run without a window, feeding timed inputs.
    Simulate {
        /// JSON array of `{"at_ms", "action", "kind"}` events.
        #[arg(long)]
        script: Option<PathBuf>,

        /// Press an action at a time, e.g. `jump@120`. Repeatable.
        #[arg(long = "press", value_name = "ACTION@MS")]
        presses: Vec<String>,

        /// Release an action at a time, e.g. `jump@180`. Repeatable.
        #[arg(long = "release", value_name = "ACTION@MS")]
        releases: Vec<String>,

        /// Simulated seconds.
        #[arg(long, default_value_t = 3.0)]
        seconds: f32,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Play in an SDL2 window.
    #[cfg(feature = "window")]
    Play {
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = GameConfig::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Simulate {
            script,
            presses,
            releases,
            seconds,
            seed,
        } => {
            let mut input = match &script {
                Some(path) => InputScript::load(path)
                    .with_context(|| format!("loading input script {}", path.display()))?,
                None => InputScript::default(),
            };
            let mut extra = Vec::with_capacity(presses.len() + releases.len());
            for text in &presses {
                extra.push(ScriptEvent::parse(text, EdgeKind::Press)?);
            }
            for text in &releases {
                extra.push(ScriptEvent::parse(text, EdgeKind::Release)?);
            }
            input.extend(extra);

            let mut app = GameApp::new(config, &args.save, seed)?;
            let frames = app.run_script(&mut input, seconds)?;
            println!("{}", app.status_line());
            let best = app.finish()?;
            tracing::info!(frames, best, "simulation finished");
        }

        #[cfg(feature = "window")]
        Command::Play { seed } => {
            let mut host = dino_runner::engine::window::WindowHost::new("Dino Runner", 800, 400)?;
            let mut app = GameApp::new(config, &args.save, seed)?;
            app.run_window(&mut host)?;
            let best = app.finish()?;
            println!("HI {:05}", best.floor() as u64);
        }
    }

    Ok(())
}
