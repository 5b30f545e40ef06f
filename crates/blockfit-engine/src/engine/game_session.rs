use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    ConfigError, DragError, PlaceError,
    core::{Board, CellSet, PieceId, PieceInstance, Position},
};

use super::{
    best_score::{BestScore, BestScoreStore},
    config::GameConfig,
    dock::{Dock, SessionSeed},
    drag::{Drag, DragState, DropOutcome},
    event::GameEvent,
    game_over::is_terminal,
    line_clear::{ClearReport, resolve_clears},
    placement::{PointerPosition, SnapTarget, is_valid_placement},
    scoring::GameStats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// What a committed placement did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub piece: PieceId,
    pub anchor: Position,
    pub filled: CellSet,
    pub placement_award: u64,
    pub clear: ClearReport,
    pub clear_award: u64,
    /// True when this placement left no offered piece able to fit.
    pub game_over: bool,
}

/// A single game from the first offer to game over.
///
/// Owns the board, the dock, the score and the drag gesture, and runs every
/// placement through validation, commit, clear resolution, scoring, refill and the
/// game-over check, in that order. Nothing is rendered here; observers drain
/// [`GameEvent`]s with [`drain_events`](Self::drain_events).
///
/// # Example
///
/// ```
/// use blockfit_engine::{GameConfig, GameSession, MemoryBestScore, valid_anchors};
///
/// let mut session =
///     GameSession::new(GameConfig::default(), MemoryBestScore::default()).unwrap();
///
/// let piece = session.offered_pieces()[0];
/// let anchor = valid_anchors(session.board(), piece.shape()).next().unwrap();
/// let outcome = session.place(piece.id(), anchor).unwrap();
///
/// assert!(session.score() >= outcome.placement_award);
/// ```
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    seed: SessionSeed,
    rng: Pcg32,
    board: Board,
    dock: Dock,
    stats: GameStats,
    best_score: BestScore,
    drag: Drag,
    session_state: SessionState,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Starts a session with a random seed.
    pub fn new<S>(config: GameConfig, store: S) -> Result<Self, ConfigError>
    where
        S: BestScoreStore + 'static,
    {
        Self::with_seed(config, rand::rng().random(), store)
    }

    /// Like [`Self::new`], but deterministic for a given seed.
    pub fn with_seed<S>(config: GameConfig, seed: SessionSeed, store: S) -> Result<Self, ConfigError>
    where
        S: BestScoreStore + 'static,
    {
        config.validate()?;
        let mut this = Self {
            config,
            seed,
            rng: Pcg32::from_seed(seed.to_bytes()),
            board: Board::EMPTY,
            dock: Dock::new(config.spawn),
            stats: GameStats::new(),
            best_score: BestScore::new(Box::new(store)),
            drag: Drag::default(),
            session_state: SessionState::Playing,
            events: Vec::new(),
        };
        this.start();
        Ok(this)
    }

    /// Discards the current game and starts over with a fresh random seed.
    ///
    /// The best score survives; everything else is reset.
    pub fn restart(&mut self) {
        self.restart_with_seed(rand::rng().random());
    }

    pub fn restart_with_seed(&mut self, seed: SessionSeed) {
        self.seed = seed;
        self.rng = Pcg32::from_seed(seed.to_bytes());
        self.dock = Dock::new(self.config.spawn);
        self.stats = GameStats::new();
        self.drag = Drag::default();
        self.session_state = SessionState::Playing;
        self.events.clear();
        self.start();
    }

    fn start(&mut self) {
        self.board = Board::EMPTY;
        let noise = self.board.seed_noise(self.config.noise_cells, &mut self.rng);
        log::debug!("session {} started with {} noise cells", self.seed, noise.len());
        self.events.push(GameEvent::BoardReset { noise });
        self.refill_dock();
        self.check_game_over();
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn seed(&self) -> SessionSeed {
        self.seed
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The pieces currently offered, in offer order.
    #[must_use]
    pub fn offered_pieces(&self) -> &[PieceInstance] {
        self.dock.pieces()
    }

    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&PieceInstance> {
        self.dock.get(id)
    }

    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub const fn best_score(&self) -> u64 {
        self.best_score.value()
    }

    #[must_use]
    pub const fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub const fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Removes and returns all pending events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Returns true if `piece` is offered and fits at `anchor`.
    #[must_use]
    pub fn can_place(&self, piece: PieceId, anchor: Position) -> bool {
        self.check_placement(piece, anchor).is_ok()
    }

    /// Places an offered piece directly, without a drag gesture.
    ///
    /// On error nothing changes: the board, the dock and the score are untouched.
    pub fn place(
        &mut self,
        piece: PieceId,
        anchor: Position,
    ) -> Result<PlacementOutcome, PlaceError> {
        if let Some(dragged) = self.drag.state().piece() {
            return Err(PlaceError::DragInProgress { piece: dragged });
        }
        self.commit(piece, anchor)
    }

    /// Picks up an offered piece.
    pub fn begin_drag(&mut self, piece: PieceId) -> Result<(), DragError> {
        if self.session_state.is_game_over() {
            return Err(DragError::GameOver);
        }
        if self.dock.get(piece).is_none() {
            return Err(DragError::UnknownPiece { piece });
        }
        self.drag.begin(piece)
    }

    /// Moves the dragged piece and returns its new drop target.
    pub fn drag_to(&mut self, pointer: PointerPosition) -> Result<Option<SnapTarget>, DragError> {
        let piece = self.drag.state().piece().ok_or(DragError::NotDragging)?;
        let shape = self
            .dock
            .get(piece)
            .ok_or(DragError::UnknownPiece { piece })?
            .shape();
        self.drag.update(&self.board, shape, pointer)
    }

    /// Releases the dragged piece.
    ///
    /// Commits it at the current target if there is one; otherwise the piece returns
    /// to the dock. The gesture ends either way.
    pub fn drop_piece(&mut self) -> Result<DropOutcome, DragError> {
        let (piece, target) = self.drag.release()?;
        let outcome = match target.map(|target| self.commit(piece, target.anchor)) {
            Some(Ok(outcome)) => DropOutcome::Placed(outcome),
            Some(Err(err)) => {
                log::debug!("drop of {piece} rejected: {err}");
                DropOutcome::Returned(piece)
            }
            None => DropOutcome::Returned(piece),
        };
        self.drag.reset();
        Ok(outcome)
    }

    /// Abandons the current drag, returning the piece to the dock.
    pub fn cancel_drag(&mut self) -> Option<PieceId> {
        self.drag.reset()
    }

    fn check_placement(
        &self,
        piece: PieceId,
        anchor: Position,
    ) -> Result<PieceInstance, PlaceError> {
        if self.session_state.is_game_over() {
            return Err(PlaceError::GameOver);
        }
        let instance = *self
            .dock
            .get(piece)
            .ok_or(PlaceError::UnknownPiece { piece })?;
        let (row, col) = anchor.signed();
        if !is_valid_placement(&self.board, instance.shape(), row, col) {
            return Err(PlaceError::InvalidPlacement { piece, anchor });
        }
        Ok(instance)
    }

    fn commit(&mut self, piece: PieceId, anchor: Position) -> Result<PlacementOutcome, PlaceError> {
        let instance = self.check_placement(piece, anchor)?;
        self.dock.take(piece);

        let filled = self.board.place(
            instance.shape(),
            anchor,
            instance.color(),
            instance.kind(),
        );
        self.events.push(GameEvent::CellsFilled {
            piece,
            cells: filled,
            color: instance.color(),
            kind: instance.kind(),
        });
        let placement_award = self.stats.record_placement(instance.shape());
        self.score_changed();

        let clear = resolve_clears(&mut self.board);
        let mut clear_award = 0;
        if !clear.is_empty() {
            let explosion_cells = clear.clear_set() & clear.explosion_cells();
            self.events.push(GameEvent::CellsCleared {
                line_cells: clear.clear_set() - explosion_cells,
                explosion_cells,
                bonus_multiplier: clear.bonus_multiplier(),
            });
            clear_award = self.stats.record_clear(&clear);
            log::debug!(
                "cleared {} lines and {} cells for {clear_award} points (x{})",
                clear.lines_cleared(),
                clear.clear_set().len(),
                clear.bonus_multiplier(),
            );
            self.score_changed();
        }

        if self.dock.is_empty() {
            self.refill_dock();
        }
        let game_over = self.check_game_over();

        Ok(PlacementOutcome {
            piece,
            anchor,
            filled,
            placement_award,
            clear,
            clear_award,
            game_over,
        })
    }

    fn refill_dock(&mut self) {
        let pieces = self
            .dock
            .spawn_offer(&mut self.rng)
            .iter()
            .map(PieceInstance::id)
            .collect();
        self.events.push(GameEvent::OfferSpawned { pieces });
    }

    fn score_changed(&mut self) {
        let score = self.stats.score();
        if self.best_score.observe(score) {
            log::trace!("new best score {score}");
        }
        self.events.push(GameEvent::ScoreChanged {
            score,
            best_score: self.best_score.value(),
        });
    }

    fn check_game_over(&mut self) -> bool {
        if !is_terminal(self.dock.pieces(), &self.board) {
            return false;
        }
        let score = self.stats.score();
        log::info!("game over with score {score} (best {})", self.best_score.value());
        self.session_state = SessionState::GameOver;
        self.events.push(GameEvent::GameOver { score });
        true
    }
}
