use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, dock_display::*, session_display::*, stats_display::*,
};

mod board_display;
mod cell_display;
mod dock_display;
mod session_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(48, 48, 48);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const HELP: Style = fg_bg(color::GRAY, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const CURSOR: Style = fg_bg(color::WHITE, color::DARK_GRAY);
    pub const PREVIEW_INVALID: Style = fg_bg(color::RED, color::BLACK);
    pub const FLASH: Style = bg_only(color::WHITE);

    pub const NEUTRAL: Style = bg_only(color::GRAY);
    pub const BOMB: Style = fg_bg(color::RED, color::DARK_GRAY);
    pub const STAR: Style = fg_bg(color::YELLOW, color::DARK_GRAY);

    pub const COLOR1: Style = bg_only(color::CYAN);
    pub const COLOR2: Style = bg_only(color::YELLOW);
    pub const COLOR3: Style = bg_only(color::GREEN);
    pub const COLOR4: Style = bg_only(color::RED);
    pub const COLOR5: Style = bg_only(color::BLUE);
    pub const COLOR6: Style = bg_only(color::ORANGE);
    pub const COLOR7: Style = bg_only(color::MAGENTA);

    pub const BORDER_PLAYING: Color = color::WHITE;
    pub const BORDER_GAME_OVER: Color = color::RED;
    pub const BORDER_SELECTED: Color = color::YELLOW;
    pub const GAME_OVER_POPUP: Style = fg_bg(color::WHITE, color::RED);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
