use std::path::PathBuf;

use blockfit_engine::{GameConfig, SessionSeed};
use clap::{Parser, Subcommand};

use self::{play::PlayArg, simulate::SimulateArg};
use crate::util;

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (keyboard or mouse)
    Play(#[clap(flatten)] PlayArg),
    /// Let the greedy auto-player run games and report the results as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that starts a session.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Path to a game configuration file (JSON format)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible session (32 hex digits)
    #[clap(long)]
    seed: Option<SessionSeed>,
}

impl SessionArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<GameConfig> {
        let config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => GameConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
