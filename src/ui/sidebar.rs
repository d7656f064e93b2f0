use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph, Widget},
};

use crate::exposure::ExposureDuration;
use crate::round::GameSession;

/// Settings and score panel on the right of the screen
pub struct Sidebar<'a> {
    session: &'a GameSession,
    exposure: ExposureDuration,
}

impl<'a> Sidebar<'a> {
    pub fn new(session: &'a GameSession, exposure: ExposureDuration) -> Self {
        Self { session, exposure }
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let block = Block::default().borders(Borders::ALL).title("settings");
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(1)
            .constraints([
                Constraint::Length(1), // label
                Constraint::Length(1), // gauge
                Constraint::Length(1), // range
                Constraint::Length(1), // padding
                Constraint::Length(1), // score
                Constraint::Length(1), // rounds
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(Span::styled("exposure", bold_style)).render(chunks[0], buf);

        LineGauge::default()
            .ratio(self.exposure.ratio())
            .label(self.exposure.to_string())
            .filled_style(Style::default().fg(Color::Magenta))
            .unfilled_style(dim_style)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled("0.10s - 1.00s  (↑↓)", dim_style)).render(chunks[2], buf);

        let score = self.session.score();
        Paragraph::new(Line::from(vec![
            Span::styled(format!("score {score}"), bold_style.fg(Color::Green)),
        ]))
        .render(chunks[4], buf);

        let rounds = self.session.rounds_played();
        Paragraph::new(Span::styled(format!("rounds {rounds}"), dim_style)).render(chunks[5], buf);
    }
}
