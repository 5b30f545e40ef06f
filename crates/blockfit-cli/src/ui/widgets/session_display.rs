use blockfit_engine::{CellSet, GameSession, PieceId, PointerPosition, Position, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{
    BoardDisplay, DockDisplay, DockHit, Preview, StatsDisplay, pointer_in_grid, style,
};

/// The whole play screen: stats on the left, the board, and the dock on the right.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    selected: Option<PieceId>,
    cursor: Option<Position>,
    preview: Option<Preview>,
    flash: CellSet,
    horizontal_padding: u16,
    vertical_padding: u16,
}

struct Widgets<'a> {
    stats: StatsDisplay<'a>,
    board: BoardDisplay<'a>,
    dock: DockDisplay<'a>,
}

/// Screen rectangles of the three panels.
#[derive(Debug, Clone, Copy)]
struct Areas {
    stats: Rect,
    board: Rect,
    dock: Rect,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            selected: None,
            cursor: None,
            preview: None,
            flash: CellSet::EMPTY,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn selected(self, selected: Option<PieceId>) -> Self {
        Self { selected, ..self }
    }

    pub fn cursor(self, cursor: Option<Position>) -> Self {
        Self { cursor, ..self }
    }

    pub fn preview(self, preview: Option<Preview>) -> Self {
        Self { preview, ..self }
    }

    pub fn flash(self, flash: CellSet) -> Self {
        Self { flash, ..self }
    }

    /// Total height needed to draw every panel.
    pub fn height(&self) -> u16 {
        let widgets = self.widgets();
        widgets
            .stats
            .height()
            .max(widgets.board.height())
            .max(widgets.dock.height())
    }

    /// Maps a terminal position to board coordinates.
    pub fn board_pointer(&self, area: Rect, column: u16, row: u16) -> PointerPosition {
        let widgets = self.widgets();
        let areas = Self::areas(&widgets, area);
        pointer_in_grid(widgets.board.grid_area(areas.board), column, row)
    }

    /// Finds the offered piece under a terminal position.
    pub fn dock_hit(&self, area: Rect, column: u16, row: u16) -> Option<DockHit> {
        let widgets = self.widgets();
        let areas = Self::areas(&widgets, area);
        widgets.dock.hit(areas.dock, column, row)
    }

    fn widgets(&self) -> Widgets<'a> {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.session_state() {
            SessionState::Playing => style::BORDER_PLAYING,
            SessionState::GameOver => style::BORDER_GAME_OVER,
        };
        let dragged = self.session.drag_state().piece();

        let board = BoardDisplay::new(self.session.board())
            .preview(self.preview)
            .cursor(self.cursor)
            .flash(self.flash)
            .block(Block::bordered().border_style(border_style).style(style::DEFAULT));
        let dock = DockDisplay::new(self.session.offered_pieces())
            .selected(self.selected)
            .hidden(dragged)
            .block(
                Block::bordered()
                    .title(Line::from("DOCK").centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let stats = StatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        Widgets { stats, board, dock }
    }

    fn areas(widgets: &Widgets<'_>, area: Rect) -> Areas {
        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(widgets.stats.width()),
            Constraint::Length(widgets.board.width()),
            Constraint::Length(widgets.dock.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats] =
            Layout::vertical([Constraint::Length(widgets.stats.height())]).areas(left_column);
        let [board] =
            Layout::vertical([Constraint::Length(widgets.board.height())]).areas(center_column);
        let [dock] =
            Layout::vertical([Constraint::Length(widgets.dock.height())]).areas(right_column);
        Areas { stats, board, dock }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let widgets = self.widgets();
        let areas = SessionDisplay::areas(&widgets, area);
        let board_width = widgets.board.width();

        widgets.stats.render(areas.stats, buf);
        widgets.board.render(areas.board, buf);
        widgets.dock.render(areas.dock, buf);

        if self.session.session_state().is_game_over() {
            let style = style::GAME_OVER_POPUP;
            let block = Block::new().style(style);
            let text = Text::styled("GAME OVER!!", style).centered();
            let area = areas
                .board
                .centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
