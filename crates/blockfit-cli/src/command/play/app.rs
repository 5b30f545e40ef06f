use std::{
    io,
    time::{Duration, Instant},
};

use blockfit_engine::{
    Board, CellSet, DragState, DropOutcome, GameEvent, GameSession, PieceInstance, PointerPosition,
    Position, SessionState,
};
use crossterm::event::{Event, KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    text::Text,
};

use super::event_loop::{EventLoop, LoopEvent};
use crate::ui::widgets::{Preview, SessionDisplay, style};

const TICK_RATE: f64 = 30.0;
const FLASH_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug)]
struct Flash {
    cells: CellSet,
    until: Instant,
}

#[derive(Debug)]
pub(super) struct PlayApp {
    session: GameSession,
    selected: usize,
    cursor: Position,
    /// Cell of the dragged piece's bounding box held by the mouse.
    grab: (f64, f64),
    flash: Option<Flash>,
    message: Option<String>,
    /// Where the session was last drawn, for mapping mouse positions.
    session_area: Rect,
    is_exiting: bool,
}

impl PlayApp {
    pub(super) fn new(session: GameSession) -> Self {
        let mut app = Self {
            session,
            selected: 0,
            cursor: Position::new(0, 0),
            grab: (0.0, 0.0),
            flash: None,
            message: None,
            session_area: Rect::default(),
            is_exiting: false,
        };
        app.absorb_events();
        app
    }

    pub(super) fn session(&self) -> &GameSession {
        &self.session
    }

    pub(super) fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        let mut events = EventLoop::new(TICK_RATE);
        while !self.is_exiting {
            match events.next()? {
                LoopEvent::Tick => {
                    if self.update(Instant::now()) {
                        events.mark_dirty();
                    }
                }
                LoopEvent::Render => {
                    terminal.draw(|frame| self.draw(frame))?;
                }
                LoopEvent::Terminal(event) => self.handle_event(&event),
            }
        }
        Ok(())
    }

    /// Expires the clear highlight. Returns true if the screen changed.
    fn update(&mut self, now: Instant) -> bool {
        if self.flash.as_ref().is_some_and(|flash| flash.until <= now) {
            self.flash = None;
            return true;
        }
        false
    }

    fn selected_piece(&self) -> Option<PieceInstance> {
        self.session.offered_pieces().get(self.selected).copied()
    }

    fn session_display(&self) -> SessionDisplay<'_> {
        SessionDisplay::new(&self.session)
            .selected(self.selected_piece().map(|piece| piece.id()))
            .cursor(Some(self.cursor))
            .preview(self.preview())
            .flash(self.flash.as_ref().map_or(CellSet::EMPTY, |flash| flash.cells))
    }

    /// Outline of where the dragged or selected piece would land.
    fn preview(&self) -> Option<Preview> {
        let (piece, anchor, valid) = match *self.session.drag_state() {
            DragState::Dragging {
                piece,
                target: Some(target),
                ..
            } => (piece, target.anchor.signed(), true),
            DragState::Dragging {
                piece,
                pointer: Some(pointer),
                target: None,
            } => (piece, pointer.nearest_cell(), false),
            DragState::Dragging { .. } | DragState::Resolving { .. } => return None,
            DragState::Idle => {
                let piece = self.selected_piece()?;
                let valid = self.session.can_place(piece.id(), self.cursor);
                (piece.id(), self.cursor.signed(), valid)
            }
        };
        let piece = self.session.piece(piece)?;
        let cells = piece.shape().cells_at(anchor.0, anchor.1)?;
        Some(Preview {
            cells,
            color: piece.color(),
            kind: piece.kind(),
            valid,
        })
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let display = self.session_display();
        let help_text = match self.session.session_state() {
            SessionState::Playing => {
                "Controls: ← ↑ → ↓ (Move) | Tab 1 2 3 (Select) | Enter (Place) | Mouse (Drag) | R (Restart) | Q (Quit)"
            }
            SessionState::GameOver => "Controls: R (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();
        let message = Text::from(self.message.as_deref().unwrap_or_default())
            .style(style::DEFAULT)
            .centered();

        let [main_area, help_area, message_area] = Layout::vertical([
            Constraint::Length(display.height()),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas::<3>(frame.area());
        frame.render_widget(&display, main_area);
        frame.render_widget(help_text, help_area);
        frame.render_widget(message, message_area);
        self.session_area = main_area;
    }

    fn handle_event(&mut self, event: &Event) {
        if let Some(event) = event.as_key_event() {
            self.handle_key(event.code);
        } else if let Some(event) = event.as_mouse_event() {
            self.handle_mouse(event);
        }
        self.absorb_events();
    }

    fn handle_key(&mut self, code: KeyCode) {
        let is_playing = self.session.session_state().is_playing();
        let offered = self.session.offered_pieces().len();
        match code {
            KeyCode::Left if is_playing => self.move_cursor(0, -1),
            KeyCode::Right if is_playing => self.move_cursor(0, 1),
            KeyCode::Up if is_playing => self.move_cursor(-1, 0),
            KeyCode::Down if is_playing => self.move_cursor(1, 0),
            KeyCode::Tab if is_playing && offered > 0 => {
                self.selected = (self.selected + 1) % offered;
            }
            KeyCode::BackTab if is_playing && offered > 0 => {
                self.selected = (self.selected + offered - 1) % offered;
            }
            KeyCode::Char(c @ '1'..='3') if is_playing => {
                let index = ('1'..='3').position(|digit| digit == c).unwrap_or_default();
                if index < offered {
                    self.selected = index;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') if is_playing => self.place_selected(),
            KeyCode::Esc => _ = self.session.cancel_drag(),
            KeyCode::Char('r') => {
                self.session.restart();
                self.message = Some(format!("New game, seed {}", self.session.seed()));
            }
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }

    fn move_cursor(&mut self, d_row: i32, d_col: i32) {
        let (row, col) = self.cursor.signed();
        let last = i32::try_from(Board::SIZE).unwrap_or(i32::MAX) - 1;
        if let Some(cursor) = Position::checked(
            (row + d_row).clamp(0, last),
            (col + d_col).clamp(0, last),
        ) {
            self.cursor = cursor;
        }
    }

    fn place_selected(&mut self) {
        let Some(piece) = self.selected_piece() else {
            return;
        };
        if let Err(err) = self.session.place(piece.id(), self.cursor) {
            self.message = Some(format!("Cannot place {piece}: {err}", piece = piece.id()));
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        let area = self.session_area;
        let (column, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self.session_display().dock_hit(area, column, row);
                if let Some(hit) = hit {
                    if let Some(index) = self
                        .session
                        .offered_pieces()
                        .iter()
                        .position(|piece| piece.id() == hit.piece)
                    {
                        self.selected = index;
                    }
                    self.grab = (f64::from(hit.grab_row), f64::from(hit.grab_col));
                    if self.session.begin_drag(hit.piece).is_ok() {
                        self.drag_to(column, row);
                    }
                } else if let Some(cell) = self.board_cell(column, row) {
                    self.cursor = cell;
                    self.place_selected();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => self.drag_to(column, row),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Ok(DropOutcome::Returned(_)) = self.session.drop_piece() {
                    self.message = Some("No room there".to_owned());
                }
            }
            MouseEventKind::Moved => {
                if let Some(cell) = self.board_cell(column, row) {
                    self.cursor = cell;
                }
            }
            _ => {}
        }
    }

    fn board_pointer(&self, column: u16, row: u16) -> PointerPosition {
        self.session_display()
            .board_pointer(self.session_area, column, row)
    }

    fn board_cell(&self, column: u16, row: u16) -> Option<Position> {
        let (row, col) = self.board_pointer(column, row).nearest_cell();
        Position::checked(row, col)
    }

    fn drag_to(&mut self, column: u16, row: u16) {
        let pointer = self.board_pointer(column, row);
        let origin = PointerPosition::new(pointer.row - self.grab.0, pointer.col - self.grab.1);
        _ = self.session.drag_to(origin);
    }

    /// Turns pending session events into screen effects.
    fn absorb_events(&mut self) {
        let mut new_offer = false;
        for event in self.session.drain_events() {
            match event {
                GameEvent::BoardReset { .. } => self.flash = None,
                GameEvent::OfferSpawned { .. } => new_offer = true,
                GameEvent::CellsCleared {
                    line_cells,
                    explosion_cells,
                    bonus_multiplier,
                } => {
                    self.flash = Some(Flash {
                        cells: line_cells | explosion_cells,
                        until: Instant::now() + FLASH_DURATION,
                    });
                    if bonus_multiplier > 1 {
                        self.message = Some(format!("Star bonus x{bonus_multiplier}!"));
                    }
                }
                GameEvent::CellsFilled { .. } | GameEvent::ScoreChanged { .. } => {}
                GameEvent::GameOver { score } => {
                    self.message = Some(format!("Game over with {score} points"));
                }
            }
        }
        let offered = self.session.offered_pieces().len();
        if new_offer || self.selected >= offered {
            self.selected = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfit_engine::{GameConfig, MemoryBestScore, SessionSeed, valid_anchors};
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn app() -> PlayApp {
        let session = GameSession::with_seed(
            GameConfig::default(),
            SessionSeed::from_u128(42),
            MemoryBestScore::default(),
        )
        .unwrap();
        let mut app = PlayApp::new(session);
        app.session_area = Rect::new(0, 0, 62, 25);
        app
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = app();
        for _ in 0..3 {
            app.handle_event(&key(KeyCode::Up));
            app.handle_event(&key(KeyCode::Left));
        }
        assert_eq!(app.cursor, Position::new(0, 0));
        for _ in 0..12 {
            app.handle_event(&key(KeyCode::Down));
            app.handle_event(&key(KeyCode::Right));
        }
        assert_eq!(app.cursor, Position::new(9, 9));
    }

    #[test]
    fn test_enter_places_selected_piece_at_cursor() {
        let mut app = app();
        let piece = app.selected_piece().unwrap();
        let anchor = valid_anchors(app.session.board(), piece.shape())
            .next()
            .unwrap();
        app.cursor = anchor;

        app.handle_event(&key(KeyCode::Enter));
        assert_eq!(app.session.stats().placed_pieces(), 1);
        assert!(app.session.score() >= u64::try_from(piece.shape().len()).unwrap());
    }

    #[test]
    fn test_invalid_enter_reports_message() {
        let mut app = app();
        let piece = app.selected_piece().unwrap();
        // The default config seeds noise cells, so some anchor is always blocked.
        app.cursor = (0..100)
            .map(Position::from_index)
            .find(|&anchor| !app.session.can_place(piece.id(), anchor))
            .unwrap();
        app.handle_event(&key(KeyCode::Enter));
        assert_eq!(app.session.stats().placed_pieces(), 0);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_mouse_drag_from_dock_places_piece() {
        let mut app = app();
        let piece = app.selected_piece().unwrap();
        let anchor = valid_anchors(app.session.board(), piece.shape())
            .next()
            .unwrap();

        // Grab the top-left cell of the first dock slot (see the session layout).
        let display = app.session_display();
        let (column, row) = (0..app.session_area.width)
            .flat_map(|x| (0..app.session_area.height).map(move |y| (x, y)))
            .find(|&(x, y)| {
                display
                    .dock_hit(app.session_area, x, y)
                    .is_some_and(|hit| hit.grab_row == 0 && hit.grab_col == 0)
            })
            .unwrap();
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        assert!(app.session.drag_state().is_dragging());

        // The board grid starts at (26, 1) in a 62-column area.
        let board_column = 26 + u16::try_from(anchor.col()).unwrap() * 2;
        let board_row = 1 + u16::try_from(anchor.row()).unwrap();
        app.handle_event(&mouse(
            MouseEventKind::Drag(MouseButton::Left),
            board_column,
            board_row,
        ));
        assert_eq!(
            app.session.drag_state().target().map(|target| target.anchor),
            Some(anchor)
        );
        assert!(app.preview().is_some_and(|preview| preview.valid));

        app.handle_event(&mouse(
            MouseEventKind::Up(MouseButton::Left),
            board_column,
            board_row,
        ));
        assert!(app.session.drag_state().is_idle());
        assert_eq!(app.session.stats().placed_pieces(), 1);
    }

    #[test]
    fn test_flash_expires() {
        let mut app = app();
        let now = Instant::now();
        app.flash = Some(Flash {
            cells: CellSet::row(0),
            until: now + FLASH_DURATION,
        });
        assert!(!app.update(now));
        assert!(app.update(now + FLASH_DURATION));
        assert!(app.flash.is_none());
    }

    #[test]
    fn test_quit_and_restart() {
        let mut app = app();
        let seed = app.session.seed();
        app.handle_event(&key(KeyCode::Char('r')));
        assert_ne!(app.session.seed(), seed);
        assert!(!app.is_exiting);
        app.handle_event(&key(KeyCode::Char('q')));
        assert!(app.is_exiting);
    }
}
