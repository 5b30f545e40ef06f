use blockfit_engine::{BlockKind, Cell, ColorToken};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::style;

/// One board cell drawn as two terminal columns.
#[derive(Debug, Clone, Copy)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell {
            Cell::Empty if show_dots => Self::new(style::EMPTY_DOT, "."),
            Cell::Empty => Self::new(style::EMPTY, ""),
            Cell::Occupied { color, kind } => Self::block(color, kind),
        }
    }

    pub fn block(color: ColorToken, kind: BlockKind) -> Self {
        match kind {
            BlockKind::Bomb => Self::new(style::BOMB, "()"),
            BlockKind::Star => Self::new(style::STAR, "**"),
            BlockKind::Normal => Self::new(color_style(color), ""),
        }
    }

    /// A translucent outline of a piece that would land here.
    pub fn preview(color: ColorToken, kind: BlockKind, valid: bool) -> Self {
        if !valid {
            return Self::new(style::PREVIEW_INVALID, "[]");
        }
        let base = Self::block(color, kind);
        let symbol = if base.symbol.is_empty() { "[]" } else { base.symbol };
        Self::new(base.style, symbol)
    }

    pub const fn flash() -> Self {
        Self::new(style::FLASH, "")
    }

    pub fn with_style(self, style: Style) -> Self {
        Self { style, ..self }
    }
}

fn color_style(color: ColorToken) -> Style {
    match color {
        ColorToken::Color1 => style::COLOR1,
        ColorToken::Color2 => style::COLOR2,
        ColorToken::Color3 => style::COLOR3,
        ColorToken::Color4 => style::COLOR4,
        ColorToken::Color5 => style::COLOR5,
        ColorToken::Color6 => style::COLOR6,
        ColorToken::Color7 => style::COLOR7,
        ColorToken::Neutral => style::NEUTRAL,
        ColorToken::Bomb => style::BOMB,
        ColorToken::Star => style::STAR,
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
