use std::iter;

use blockfit_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

#[derive(Debug)]
pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS.len() as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameSession) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameSession) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|session| session.score().to_string()),
    Row::FullLabel("BEST:"),
    Row::FullValue(&|session| session.best_score().to_string()),
    Row::Empty,
    Row::LabelValue("PIECES:", &|session| {
        session.stats().placed_pieces().to_string()
    }),
    Row::LabelValue("LINES:", &|session| {
        session.stats().cleared_lines().to_string()
    }),
    Row::LabelValue("CELLS:", &|session| {
        session.stats().cleared_cells().to_string()
    }),
    Row::Empty,
    Row::LabelValue("BOMBS:", &|session| {
        session.stats().bombs_detonated().to_string()
    }),
    Row::LabelValue("STARS:", &|session| {
        session.stats().stars_collected().to_string()
    }),
    Row::LabelValue("BEST CLEAR:", &|session| {
        session.stats().best_clear_award().to_string()
    }),
    Row::LabelValue("COMBOS:", &|session| {
        let counter = session.stats().line_cleared_counter();
        counter[2..].iter().sum::<usize>().to_string()
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(2),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
