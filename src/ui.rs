pub mod glyph;
pub mod sidebar;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    round::{Outcome, Phase},
};

const HORIZONTAL_MARGIN: u16 = 3;
const VERTICAL_MARGIN: u16 = 1;
const SIDEBAR_WIDTH: u16 = 28;

/// Screen regions shared by the widget and the cursor placement
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub title: Rect,
    pub glyph: Rect,
    pub input: Rect,
    pub message: Rect,
    pub hint: Rect,
    pub legend: Rect,
    pub sidebar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
            .split(area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Length(glyph::GLYPH_BOX_HEIGHT),
                Constraint::Length(3), // input field
                Constraint::Length(1), // result message
                Constraint::Length(1), // hint
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(columns[0]);

        Self {
            title: rows[0],
            glyph: rows[1],
            input: rows[2],
            message: rows[3],
            hint: rows[4],
            legend: rows[6],
            sidebar: columns[1],
        }
    }
}

/// Draw the whole screen and park the terminal cursor in the guess field
pub fn draw(app: &App, f: &mut Frame) {
    let area = f.area();
    f.render_widget(app, area);

    if app.phase() == Phase::AwaitingInput {
        let input = AppLayout::new(area).input;
        if input.width > 2 && input.height > 2 {
            let x = input.x + 1 + (app.guess.width() as u16).min(input.width - 2);
            f.set_cursor_position((x, input.y + 1));
        }
    }
}

fn legend_text(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "(enter) start / (↑↓) exposure / (esc)ape",
        Phase::Displaying => "(↑↓) exposure / (esc)ape",
        Phase::AwaitingInput => "type + (enter) submit / (backspace) clear / (esc)ape",
        Phase::Resolved => "(n)ext / (r)estart / (↑↓) exposure / (esc)ape",
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session();
        let phase = session.phase();
        let layout = AppLayout::new(area);

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let title = Paragraph::new(vec![
            Line::from(Span::styled("glimpse", bold_style.fg(Color::Cyan))),
            Line::from(Span::styled(
                "a glyph flashes by - type what you saw",
                italic_style.add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center);
        title.render(layout.title, buf);

        glyph::GlyphBox::new(session).render(layout.glyph, buf);

        let input_enabled = phase == Phase::AwaitingInput;
        let input_content = if !self.guess.is_empty() {
            Span::styled(self.guess.as_str(), bold_style)
        } else if input_enabled {
            Span::styled("type the glyph here...", italic_style.add_modifier(Modifier::DIM))
        } else {
            Span::raw("")
        };
        let input = Paragraph::new(Line::from(input_content))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("what was it?")
                    .border_style(if input_enabled {
                        Style::default().fg(Color::Yellow)
                    } else {
                        dim_style
                    }),
            )
            .style(if input_enabled {
                Style::default()
            } else {
                dim_style
            });
        input.render(layout.input, buf);

        if let Some(outcome) = session.last_outcome() {
            let (symbol, color) = match outcome {
                Outcome::Correct => ("✔", Color::Green),
                Outcome::Incorrect => ("✘", Color::Red),
            };
            let message = Paragraph::new(Span::styled(
                format!("{symbol} {}", session.last_message()),
                bold_style.fg(color),
            ))
            .alignment(Alignment::Center);
            message.render(layout.message, buf);
        }

        let hint = match phase {
            Phase::Idle => Some("press (enter) to start a game"),
            Phase::AwaitingInput => Some("type the glyph you saw"),
            _ => None,
        };
        if let Some(hint) = hint {
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center)
                .render(layout.hint, buf);
        }

        Paragraph::new(Span::styled(legend_text(phase), italic_style)).render(layout.legend, buf);

        sidebar::Sidebar::new(session, self.exposure).render(layout.sidebar, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::ScriptedPicker;
    use crate::exposure::ExposureDuration;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn create_test_app(glyph: char) -> App {
        App::with_picker(
            ExposureDuration::default(),
            Box::new(ScriptedPicker::new([glyph])),
        )
    }

    fn render_to_string(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn hide(app: &mut App) {
        let started = app.session().display_started_at().unwrap();
        app.on_tick(started + app.exposure.as_duration());
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_idle_screen() {
        let app = create_test_app('a');
        let rendered = render_to_string(&app, Rect::new(0, 0, 100, 30));

        assert!(rendered.contains("glimpse"));
        assert!(rendered.contains("(enter) start"));
        assert!(rendered.contains("0.20s"));
        assert!(rendered.contains("?"));
    }

    #[test]
    fn test_displaying_shows_target() {
        let mut app = create_test_app('ㄱ');
        app.start_game();
        let rendered = render_to_string(&app, Rect::new(0, 0, 100, 30));
        assert!(rendered.contains('ㄱ'));
    }

    #[test]
    fn test_awaiting_input_hides_target() {
        let mut app = create_test_app('ㄱ');
        app.start_game();
        hide(&mut app);

        let rendered = render_to_string(&app, Rect::new(0, 0, 100, 30));
        assert!(!rendered.contains('ㄱ'));
        assert!(rendered.contains("type the glyph you saw"));
    }

    #[test]
    fn test_resolved_incorrect_reveals_answer() {
        let mut app = create_test_app('ㄱ');
        app.start_game();
        hide(&mut app);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Enter);

        let rendered = render_to_string(&app, Rect::new(0, 0, 100, 30));
        assert!(rendered.contains("incorrect, answer was"));
        assert!(rendered.contains('ㄱ'));
        assert!(rendered.contains("(n)ext"));
    }

    #[test]
    fn test_resolved_correct_shows_score() {
        let mut app = create_test_app('q');
        app.start_game();
        hide(&mut app);
        press(&mut app, KeyCode::Char('Q'));
        press(&mut app, KeyCode::Enter);

        let rendered = render_to_string(&app, Rect::new(0, 0, 100, 30));
        assert!(rendered.contains("correct"));
        assert!(rendered.contains("score 1"));
    }

    #[test]
    fn test_legend_per_phase() {
        assert!(legend_text(Phase::Idle).contains("start"));
        assert!(legend_text(Phase::AwaitingInput).contains("submit"));
        assert!(legend_text(Phase::Resolved).contains("(r)estart"));
        assert!(!legend_text(Phase::Displaying).contains("submit"));
    }

    #[test]
    fn test_extreme_sizes_do_not_panic() {
        let mut app = create_test_app('ㅘ');
        app.start_game();

        for area in [
            Rect::new(0, 0, 1, 1),
            Rect::new(0, 0, 10, 5),
            Rect::new(0, 0, 200, 5),
            Rect::new(0, 0, 20, 50),
            Rect::new(0, 0, 300, 120),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }
    }

    #[test]
    fn test_layout_regions_stay_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = AppLayout::new(area);
        for region in [
            layout.title,
            layout.glyph,
            layout.input,
            layout.message,
            layout.hint,
            layout.legend,
            layout.sidebar,
        ] {
            assert!(area.union(region) == area);
        }
        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
    }

    #[test]
    fn test_ui_constants_consistency() {
        const _: () = assert!(HORIZONTAL_MARGIN * 2 + SIDEBAR_WIDTH < 80);
        const _: () = assert!(VERTICAL_MARGIN * 2 < 24);
    }
}
