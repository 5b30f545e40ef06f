//! Game rules and session orchestration.
//!
//! This module builds the game on top of the core data structures:
//!
//! - [`is_valid_placement`] and [`resolve_snap`] - Where a piece may go, and where a
//!   dragged piece lands
//! - [`resolve_clears`] - Full lines, bomb explosions and star bonuses
//! - [`GameStats`] - Score and running totals
//! - [`Dock`] and [`SpawnConfig`] - The offered pieces and how they are drawn
//! - [`GameSession`] - One game from first offer to game over
//!
//! # Game Flow
//!
//! 1. A [`GameSession`] starts: the board gets a few neutral noise cells and the dock
//!    receives its first offer
//! 2. The player places an offered piece, directly or through a drag gesture
//! 3. Full rows and columns are cleared together with any bomb blasts, and the
//!    placement and clear awards are added to the score
//! 4. Once every offered piece is placed, a new offer is spawned
//! 5. The game ends when no offered piece fits anywhere
//!
//! # Example
//!
//! ```
//! use blockfit_engine::{GameConfig, GameSession, GameEvent, MemoryBestScore, valid_anchors};
//!
//! let mut session = GameSession::new(GameConfig::default(), MemoryBestScore::default())?;
//!
//! for _ in 0..20 {
//!     if session.session_state().is_game_over() {
//!         break;
//!     }
//!     let piece = session.offered_pieces()[0];
//!     let anchor = valid_anchors(session.board(), piece.shape()).next().unwrap();
//!     session.place(piece.id(), anchor)?;
//!
//!     for event in session.drain_events() {
//!         if let GameEvent::GameOver { score } = event {
//!             println!("Game over: {score}");
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    best_score::*, config::*, dock::*, drag::*, event::*, game_over::*, game_session::*,
    line_clear::*, placement::*, scoring::*,
};

mod best_score;
mod config;
mod dock;
mod drag;
mod event;
mod game_over;
mod game_session;
mod line_clear;
mod placement;
mod scoring;
