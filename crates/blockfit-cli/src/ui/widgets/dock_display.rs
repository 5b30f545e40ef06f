use blockfit_engine::{MAX_OFFER_SIZE, PieceId, PieceInstance};
use ratatui::{
    layout::Rect,
    prelude::Buffer,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{CellDisplay, style};

/// Side of the square a slot reserves for its piece, in cells.
const SLOT_CELLS: u16 = 5;
/// A slot is bordered on every side.
const SLOT_WIDTH: u16 = SLOT_CELLS * CellDisplay::WIDTH + 2;
const SLOT_HEIGHT: u16 = SLOT_CELLS * CellDisplay::HEIGHT + 2;

/// The offered pieces, one bordered slot each, stacked vertically.
#[derive(Debug)]
pub struct DockDisplay<'a> {
    pieces: &'a [PieceInstance],
    selected: Option<PieceId>,
    hidden: Option<PieceId>,
    block: Option<BlockWidget<'a>>,
}

/// Location of a terminal position inside the dock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockHit {
    pub piece: PieceId,
    /// Cell of the piece's bounding box under the pointer.
    pub grab_row: u16,
    pub grab_col: u16,
}

impl<'a> DockDisplay<'a> {
    pub fn new(pieces: &'a [PieceInstance]) -> Self {
        Self {
            pieces,
            selected: None,
            hidden: None,
            block: None,
        }
    }

    pub fn selected(self, selected: Option<PieceId>) -> Self {
        Self { selected, ..self }
    }

    /// Leaves the slot of a piece empty, e.g. while it is dragged over the board.
    pub fn hidden(self, hidden: Option<PieceId>) -> Self {
        Self { hidden, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        SLOT_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        SLOT_HEIGHT * MAX_OFFER_SIZE as u16 + super::block_vertical_margin(self.block.as_ref())
    }

    fn slot_area(&self, area: Rect, index: usize) -> Rect {
        let inner = self.block.inner_if_some(area);
        let index = u16::try_from(index).unwrap_or(u16::MAX);
        Rect::new(
            inner.x,
            inner.y.saturating_add(index.saturating_mul(SLOT_HEIGHT)),
            SLOT_WIDTH,
            SLOT_HEIGHT,
        )
        .intersection(inner)
    }

    /// Finds the piece and the cell of its bounding box at a terminal position.
    pub fn hit(&self, area: Rect, column: u16, row: u16) -> Option<DockHit> {
        self.pieces.iter().enumerate().find_map(|(index, piece)| {
            let grid = BlockWidget::bordered().inner(self.slot_area(area, index));
            if !grid.contains(ratatui::layout::Position::new(column, row)) {
                return None;
            }
            let shape = piece.shape();
            let last_row = u16::try_from(shape.height()).unwrap_or(1).saturating_sub(1);
            let last_col = u16::try_from(shape.width()).unwrap_or(1).saturating_sub(1);
            Some(DockHit {
                piece: piece.id(),
                grab_row: ((row - grid.y) / CellDisplay::HEIGHT).min(last_row),
                grab_col: ((column - grid.x) / CellDisplay::WIDTH).min(last_col),
            })
        })
    }
}

impl Widget for DockDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &DockDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);

        for (index, piece) in self.pieces.iter().enumerate() {
            let slot = self.slot_area(area, index);
            let border = if self.selected == Some(piece.id()) {
                style::BORDER_SELECTED
            } else {
                style::BORDER_PLAYING
            };
            let slot_block = BlockWidget::bordered()
                .title(Line::from(format!("{}", index + 1)).centered())
                .border_style(border)
                .style(style::DEFAULT);
            let grid = slot_block.inner(slot);
            slot_block.render(slot, buf);

            if self.hidden == Some(piece.id()) {
                continue;
            }
            let display = CellDisplay::block(piece.color(), piece.kind());
            for (row, col) in piece.shape().offsets() {
                let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(col)) else {
                    continue;
                };
                let cell = Rect::new(
                    grid.x + col * CellDisplay::WIDTH,
                    grid.y + row * CellDisplay::HEIGHT,
                    CellDisplay::WIDTH,
                    CellDisplay::HEIGHT,
                )
                .intersection(grid);
                display.render(cell, buf);
            }
        }
    }
}
