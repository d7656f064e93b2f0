use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::round::{GameSession, Phase};

pub const GLYPH_BOX_HEIGHT: u16 = 7;
const TILE_WIDTH: usize = 7;
const PLACEHOLDER: char = '?';

const FLASH_COLOR: Color = Color::Rgb(255, 75, 75);

/// The glyph tile: the target while it is on display, a placeholder otherwise
pub struct GlyphBox<'a> {
    session: &'a GameSession,
}

impl<'a> GlyphBox<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self { session }
    }

    fn shown(&self) -> (char, Style) {
        match (self.session.phase(), self.session.target()) {
            (Phase::Displaying, Some(target)) => (
                target,
                Style::default()
                    .fg(Color::White)
                    .bg(FLASH_COLOR)
                    .add_modifier(Modifier::BOLD),
            ),
            _ => (
                PLACEHOLDER,
                Style::default()
                    .fg(Color::Gray)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ),
        }
    }
}

/// Pad a glyph so narrow and wide glyphs sit in tiles of equal width
pub fn tile_row(glyph: char) -> (String, String) {
    let width = glyph.width().unwrap_or(1).min(TILE_WIDTH);
    let left = (TILE_WIDTH - width) / 2;
    let right = TILE_WIDTH - width - left;
    let blank = " ".repeat(TILE_WIDTH);
    let middle = format!("{}{glyph}{}", " ".repeat(left), " ".repeat(right));
    (blank, middle)
}

impl Widget for GlyphBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let (glyph, tile_style) = self.shown();
        let (blank, middle) = tile_row(glyph);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(blank.clone(), tile_style)),
            Line::from(Span::styled(middle, tile_style)),
            Line::from(Span::styled(blank, tile_style)),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().add_modifier(Modifier::DIM)),
            )
            .render(area, buf);
    }
}
