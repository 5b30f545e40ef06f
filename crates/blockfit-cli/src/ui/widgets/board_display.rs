use blockfit_engine::{BlockKind, Board, CellSet, ColorToken, PointerPosition, Position};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::{CellDisplay, style};

/// A piece drawn over the board where it would land.
#[derive(Debug, Clone, Copy)]
pub struct Preview {
    pub cells: CellSet,
    pub color: ColorToken,
    pub kind: BlockKind,
    pub valid: bool,
}

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    preview: Option<Preview>,
    cursor: Option<Position>,
    flash: CellSet,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            preview: None,
            cursor: None,
            flash: CellSet::EMPTY,
            block: None,
        }
    }

    pub fn preview(self, preview: Option<Preview>) -> Self {
        Self { preview, ..self }
    }

    pub fn cursor(self, cursor: Option<Position>) -> Self {
        Self { cursor, ..self }
    }

    /// Cells being cleared, drawn highlighted.
    pub fn flash(self, flash: CellSet) -> Self {
        Self { flash, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        grid_width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        grid_height() + super::block_vertical_margin(self.block.as_ref())
    }

    /// The area the cells are drawn in, for mapping mouse positions.
    pub fn grid_area(&self, area: Rect) -> Rect {
        let inner = self.block.inner_if_some(area);
        Rect::new(inner.x, inner.y, grid_width(), grid_height()).intersection(inner)
    }

    fn cell_display(&self, pos: Position) -> CellDisplay {
        if self.flash.contains(pos) {
            return CellDisplay::flash();
        }
        if let Some(preview) = self.preview
            && preview.cells.contains(pos)
        {
            return CellDisplay::preview(preview.color, preview.kind, preview.valid);
        }
        let cell = self.board.cell(pos);
        let display = CellDisplay::from_cell(cell, true);
        if self.cursor == Some(pos) {
            display.with_style(style::CURSOR)
        } else {
            display
        }
    }
}

#[expect(clippy::cast_possible_truncation)]
const fn grid_width() -> u16 {
    Board::SIZE as u16 * CellDisplay::WIDTH
}

#[expect(clippy::cast_possible_truncation)]
const fn grid_height() -> u16 {
    Board::SIZE as u16 * CellDisplay::HEIGHT
}

/// Converts a terminal position into board coordinates.
///
/// Each board cell spans two terminal columns, so the horizontal coordinate is the
/// centre of the terminal column, measured in cells: `-0.25` and `0.25` for the two
/// halves of column 0.
pub fn pointer_in_grid(grid: Rect, column: u16, row: u16) -> PointerPosition {
    let dx = f64::from(column) - f64::from(grid.x);
    let dy = f64::from(row) - f64::from(grid.y);
    let cell_width = f64::from(CellDisplay::WIDTH);
    PointerPosition::new(dy, (dx + 0.5) / cell_width - 0.5)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let grid = self.grid_area(area);

        for row in 0..Board::SIZE {
            for col in 0..Board::SIZE {
                let pos = Position::new(row, col);
                let cell_area = cell_rect(grid, pos);
                if cell_area.is_empty() {
                    continue;
                }
                self.cell_display(pos).render(cell_area, buf);
            }
        }
    }
}

fn cell_rect(grid: Rect, pos: Position) -> Rect {
    let (row, col) = (
        u16::try_from(pos.row()).unwrap_or(u16::MAX),
        u16::try_from(pos.col()).unwrap_or(u16::MAX),
    );
    Rect::new(
        grid.x.saturating_add(col * CellDisplay::WIDTH),
        grid.y.saturating_add(row * CellDisplay::HEIGHT),
        CellDisplay::WIDTH,
        CellDisplay::HEIGHT,
    )
    .intersection(grid)
}
