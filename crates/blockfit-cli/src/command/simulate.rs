use std::path::PathBuf;

use blockfit_engine::{
    Board, GameConfig, GameSession, GameStats, MemoryBestScore, PieceId, PieceInstance, Position,
    SessionSeed, clear_award, placement_award, scan_clears, valid_anchors,
};
use chrono::{DateTime, Utc};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::SessionArg, util};

const PROGRESS_INTERVAL: usize = 10;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Stop a game after this many placements
    #[arg(long, default_value_t = 10000)]
    max_moves: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    generated_at: DateTime<Utc>,
    seed: SessionSeed,
    config: GameConfig,
    mean_score: f64,
    best_score: u64,
    games: Vec<GameReport>,
}

#[derive(Debug, Serialize)]
struct GameReport {
    seed: SessionSeed,
    score: u64,
    moves: usize,
    game_over: bool,
    stats: GameStats,
    final_board: Vec<String>,
}

/// A placement the auto-player considered, with the points it earns immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Move {
    piece: PieceId,
    anchor: Position,
    award: u64,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session,
        games,
        max_moves,
        output,
    } = arg;

    let config = session.load_config()?;
    let seed = session.seed.unwrap_or_else(|| rand::rng().random());
    let mut seeds = Pcg32::from_seed(seed.to_bytes());

    eprintln!("Simulating {games} games from seed {seed}...");

    let mut reports = Vec::with_capacity(*games);
    for game in 0..*games {
        let game_seed: SessionSeed = seeds.random();
        let mut session = GameSession::with_seed(config, game_seed, MemoryBestScore::default())?;
        let moves = play_greedy(&mut session, *max_moves);
        reports.push(GameReport {
            seed: game_seed,
            score: session.score(),
            moves,
            game_over: session.session_state().is_game_over(),
            stats: session.stats().clone(),
            final_board: session.board().to_string().lines().map(str::to_owned).collect(),
        });
        if (game + 1).is_multiple_of(PROGRESS_INTERVAL) {
            eprintln!("Played {} games", game + 1);
        }
    }

    let best_score = reports.iter().map(|report| report.score).max().unwrap_or(0);
    let mean_score = mean(reports.iter().map(|report| report.score));
    eprintln!(
        "Finished {} games: mean score {mean_score:.1}, best score {best_score}",
        reports.len()
    );

    let report = SimulationReport {
        generated_at: Utc::now(),
        seed,
        config,
        mean_score,
        best_score,
        games: reports,
    };
    util::write_json(&report, output.as_deref())?;

    Ok(())
}

/// Plays until game over or `max_moves` placements, returning the number of placements.
fn play_greedy(session: &mut GameSession, max_moves: usize) -> usize {
    let mut moves = 0;
    while moves < max_moves && session.session_state().is_playing() {
        let Some(best) = choose_move(session.board(), session.offered_pieces()) else {
            break;
        };
        if let Err(err) = session.place(best.piece, best.anchor) {
            eprintln!("Warning: auto-player move rejected: {err}");
            break;
        }
        // Events are only for front-ends.
        session.drain_events().for_each(drop);
        moves += 1;
    }
    moves
}

/// Picks the placement with the highest immediate award.
///
/// Ties go to the earliest offered piece and the first anchor in row-major order.
fn choose_move(board: &Board, offered: &[PieceInstance]) -> Option<Move> {
    let mut best: Option<Move> = None;
    for piece in offered {
        for anchor in valid_anchors(board, piece.shape()) {
            let mut after = board.clone();
            after.place(piece.shape(), anchor, piece.color(), piece.kind());
            let award = placement_award(piece.shape()) + clear_award(&scan_clears(&after));
            if best.is_none_or(|best| award > best.award) {
                best = Some(Move {
                    piece: piece.id(),
                    anchor,
                    award,
                });
            }
        }
    }
    best
}

#[expect(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = u64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<u64>() as f64 / len as f64
}
