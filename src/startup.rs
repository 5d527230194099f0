use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::engine::PowerUpKind;
use crate::game::{power_up_look, Game};
use crate::logo::Logo;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{read, Event};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect, Size},
    style::Style,
    text::{Line, Span, Text},
    widgets::Widget,
    Frame,
};
use std::io;

/// The title screen: the logo, how to play, and the keys to start or quit
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct StartupScreen;

impl StartupScreen {
    const TEXT_WIDTH: u16 = 60;

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&self) -> io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&self, event: Event) -> Option<Screen> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::N | Command::Enter => Some(Screen::Game(Game::new())),
            Command::Q | Command::Quit => Some(Screen::Quit),
            _ => None,
        }
    }
}

impl Widget for &StartupScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [_, logo_area, _, text_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(Logo::HEIGHT),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(display);
        Logo.render(
            center_rect(logo_area, Size::new(Logo::WIDTH, Logo::HEIGHT)),
            buf,
        );
        let text = instructions();
        let height = u16::try_from(text.height()).unwrap_or(u16::MAX);
        text.render(
            center_rect(text_area, Size::new(StartupScreen::TEXT_WIDTH, height)),
            buf,
        );
    }
}

fn instructions() -> Text<'static> {
    let mut lines = vec![
        Line::from_iter([
            Span::raw("Eat the "),
            glyph(consts::ITEM_SYMBOL, consts::ITEM_STYLE),
            Span::raw(" items to grow and score points."),
        ]),
        Line::from_iter([
            Span::raw("Don't run into the walls, the "),
            glyph(consts::OBSTACLE_SYMBOL, consts::OBSTACLE_STYLE),
            Span::raw(" blocks, or yourself!"),
        ]),
        Line::default(),
        Line::raw("Power-ups:"),
    ];
    for (kind, blurb) in [
        (
            PowerUpKind::WallPass,
            "Wall pass: slip through walls & blocks for a while",
        ),
        (
            PowerUpKind::ScoreMultiplier,
            "Score multiplier: items are worth more for a while",
        ),
        (
            PowerUpKind::Magnet,
            "Magnet: items are drawn towards you for a while",
        ),
        (
            PowerUpKind::ObstacleClear,
            "Obstacle clear: every block vanishes",
        ),
    ] {
        let (symbol, style) = power_up_look(kind);
        lines.push(Line::from_iter([
            Span::raw("  "),
            glyph(symbol, style),
            Span::raw("  "),
            Span::raw(blurb),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from_iter([
        Span::raw("Steer: "),
        Span::styled("←↑↓→", consts::KEY_STYLE),
        Span::raw(" / "),
        Span::styled("wasd", consts::KEY_STYLE),
        Span::raw(" / "),
        Span::styled("hjkl", consts::KEY_STYLE),
        Span::raw("    Pause: "),
        Span::styled("Esc", consts::KEY_STYLE),
        Span::raw(" / "),
        Span::styled("p", consts::KEY_STYLE),
    ]));
    lines.push(Line::default());
    lines.push(Line::from_iter([
        Span::raw("Start ("),
        Span::styled("n", consts::KEY_STYLE),
        Span::raw(") — Quit ("),
        Span::styled("q", consts::KEY_STYLE),
        Span::raw(")"),
    ]));
    Text::from(lines)
}

fn glyph(symbol: char, style: Style) -> Span<'static> {
    Span::styled(String::from(symbol), style)
}
