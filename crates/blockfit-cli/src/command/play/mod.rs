use std::{io, path::PathBuf};

use anyhow::Context as _;
use blockfit_engine::GameSession;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};

use self::app::PlayApp;
use crate::{best_score_file::BestScoreFile, command::SessionArg};

mod app;
mod event_loop;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionArg,
    /// File the best score is kept in between runs
    #[clap(long, default_value = "./data/best_score.json")]
    best_score_file: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            session: SessionArg::default(),
            best_score_file: PathBuf::from("./data/best_score.json"),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        session,
        best_score_file,
    } = arg;

    let config = session.load_config()?;
    let store = BestScoreFile::open_or_reset(best_score_file.clone());
    let errors = store.clone();
    let session = match session.seed {
        Some(seed) => GameSession::with_seed(config, seed, store)?,
        None => GameSession::new(config, store)?,
    };

    let mut app = PlayApp::new(session);
    ratatui::run(|terminal| {
        crossterm::execute!(io::stdout(), EnableMouseCapture)?;
        let result = app.run(terminal);
        crossterm::execute!(io::stdout(), DisableMouseCapture)?;
        result
    })
    .context("terminal session failed")?;

    let session = app.session();
    eprintln!(
        "Final score: {} (best: {}, seed: {})",
        session.score(),
        session.best_score(),
        session.seed()
    );
    if let Some(err) = errors.take_write_error() {
        eprintln!(
            "Warning: failed to save the best score to {}: {err:#}",
            errors.path().display()
        );
    }
    Ok(())
}
