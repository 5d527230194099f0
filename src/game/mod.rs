mod paused;
use self::paused::{PauseOpt, Paused};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::engine::{Direction, Engine, EngineState, Modifier, Position, PowerUpKind};
use crate::startup::StartupScreen;
use crate::util::center_rect;
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::io;
use std::time::{Duration, Instant};

/// The play screen.  The round itself lives in the [`Engine`]; this tracks
/// pausing & frame timing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game {
    state: GameState,

    /// When the engine was last advanced.  `None` while the clock is stopped.
    last_frame: Option<Instant>,
}

impl Game {
    pub(crate) fn new() -> Game {
        Game {
            state: GameState::Running,
            last_frame: None,
        }
    }

    /// Wait for input until the next frame is due, then either advance the
    /// engine or act on the input
    pub(crate) fn process_input<R: Rng>(
        &mut self,
        engine: &mut Engine<R>,
    ) -> io::Result<Option<Screen>> {
        if self.playing(engine) {
            let last = *self.last_frame.get_or_insert_with(Instant::now);
            let wait = (last + consts::FRAME_PERIOD).saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                let now = Instant::now();
                engine.tick(now.saturating_duration_since(last));
                self.last_frame = Some(now);
                Ok(None)
            } else {
                Ok(self.handle_event(read()?, engine))
            }
        } else {
            Ok(self.handle_event(read()?, engine))
        }
    }

    pub(crate) fn draw<R>(&self, frame: &mut Frame<'_>, engine: &Engine<R>) {
        frame.render_widget(GameView { game: self, engine }, frame.area());
    }

    fn handle_event<R: Rng>(&mut self, event: Event, engine: &mut Engine<R>) -> Option<Screen> {
        match self.state {
            GameState::Running if engine.is_over() => {
                match Command::from_key_event(event.as_key_press_event()?)? {
                    Command::R => self.restart(engine),
                    Command::M => return Some(Game::main_menu(engine)),
                    Command::Quit | Command::Q => return Some(Screen::Quit),
                    _ => (),
                }
            }
            GameState::Running => {
                if event == Event::FocusLost {
                    self.pause();
                } else {
                    match Command::from_key_event(event.as_key_press_event()?)? {
                        Command::Quit => return Some(Screen::Quit),
                        Command::Up => engine.handle_direction_input(Direction::Up),
                        Command::Left => engine.handle_direction_input(Direction::Left),
                        Command::Down => engine.handle_direction_input(Direction::Down),
                        Command::Right => engine.handle_direction_input(Direction::Right),
                        Command::Esc | Command::P => self.pause(),
                        _ => (),
                    }
                }
            }
            GameState::Paused(ref mut paused) => match paused.handle_event(event)? {
                PauseOpt::Resume => self.state = GameState::Running,
                PauseOpt::Restart => self.restart(engine),
                PauseOpt::MainMenu => return Some(Game::main_menu(engine)),
                PauseOpt::Quit => return Some(Screen::Quit),
            },
        }
        None
    }

    fn playing<R>(&self, engine: &Engine<R>) -> bool {
        self.state == GameState::Running && engine.running()
    }

    fn pause(&mut self) {
        self.state = GameState::Paused(Paused::new());
        self.last_frame = None;
    }

    fn restart<R: Rng>(&mut self, engine: &mut Engine<R>) {
        engine.reset();
        *self = Game::new();
    }

    /// Abandon the round and go back to the title screen, leaving a fresh
    /// round ready for the next game
    fn main_menu<R: Rng>(engine: &mut Engine<R>) -> Screen {
        engine.reset();
        Screen::Startup(StartupScreen)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GameState {
    Running,
    Paused(Paused),
}

/// Everything shown on the play screen
#[derive(Debug)]
struct GameView<'a, R> {
    game: &'a Game,
    engine: &'a Engine<R>,
}

impl<R> Widget for GameView<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = self.engine;
        let bounds = engine.bounds();
        let block_size = Size {
            width: bounds.width.saturating_add(2),
            height: bounds.height.saturating_add(2),
        };
        let needed = display_size(block_size);
        let display = center_rect(area, needed);
        let [score_area, block_area, mods_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(
                " Score: {}  Items: {}  Level: {}  Time: {}s",
                engine.score(),
                engine.items_eaten(),
                engine.speed_level(),
                engine.elapsed().as_secs()
            ),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let block_area = center_rect(block_area, block_size);
        if block_area.width < block_size.width || block_area.height < block_size.height {
            let msg = format!(
                "Enlarge the terminal to {}x{} to see the playfield",
                needed.width, needed.height
            );
            Line::from(msg).centered().render(
                center_rect(block_area, Size::new(block_area.width, 1)),
                buf,
            );
        } else {
            self.render_field(block_area, buf);
        }

        Line::from_iter(engine.modifiers().active().map(|(m, left)| {
            Span::styled(
                format!(" {m}: {}s ", whole_seconds(left)),
                consts::MODIFIERS_STYLE,
            )
        }))
        .render(mods_area, buf);

        match (self.game.state, engine.state()) {
            (GameState::Paused(paused), _) => {
                let pause_area = center_rect(
                    display,
                    Size {
                        width: Paused::WIDTH,
                        height: Paused::HEIGHT,
                    },
                );
                paused.render(pause_area, buf);
            }
            (GameState::Running, EngineState::Over(over)) => {
                Span::from(format!(" — GAME OVER: The snake {} —", over.cause))
                    .render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Choose One: Restart ("),
                    Span::styled("r", consts::KEY_STYLE),
                    Span::raw(") — Main Menu ("),
                    Span::styled("m", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
            (GameState::Running, EngineState::Running) => (),
        }
    }
}

impl<R> GameView<'_, R> {
    /// Draw the bordered playfield and everything on it into `block_area`,
    /// which must be big enough to hold the whole grid
    fn render_field(&self, block_area: Rect, buf: &mut Buffer) {
        let engine = self.engine;
        if engine.modifiers().is_active(Modifier::WallPass) {
            DottedBorder.render(block_area, buf);
        } else {
            Block::bordered().render(block_area, buf);
        }

        let mut field = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for &pos in engine.obstacles() {
            field.draw_cell(pos, consts::OBSTACLE_SYMBOL, consts::OBSTACLE_STYLE);
        }
        for &pos in engine.items() {
            field.draw_cell(pos, consts::ITEM_SYMBOL, consts::ITEM_STYLE);
        }
        for pu in engine.power_ups() {
            let (symbol, style) = power_up_look(pu.kind);
            field.draw_cell(pu.pos, symbol, style);
        }
        for &pos in engine.snake().iter().skip(1) {
            field.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        field.draw_cell(
            engine.head(),
            head_symbol(engine.direction()),
            consts::SNAKE_STYLE,
        );
        if let EngineState::Over(over) = engine.state() {
            field.draw_cell(over.at, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
        }
    }
}

/// The size of the area the play screen needs: at least the standard display
/// size, grown to fit the bordered playfield and the text rows around it
fn display_size(block_size: Size) -> Size {
    Size {
        width: block_size.width.max(consts::DISPLAY_SIZE.width),
        height: block_size
            .height
            .saturating_add(TEXT_ROWS)
            .max(consts::DISPLAY_SIZE.height),
    }
}

/// Rows of the play screen outside the playfield: the score bar, the
/// modifiers line & two message lines
const TEXT_ROWS: u16 = 4;

fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
    }
}

pub(crate) fn power_up_look(kind: PowerUpKind) -> (char, Style) {
    match kind {
        PowerUpKind::WallPass => (consts::WALL_PASS_SYMBOL, consts::WALL_PASS_STYLE),
        PowerUpKind::ScoreMultiplier => (
            consts::SCORE_MULTIPLIER_SYMBOL,
            consts::SCORE_MULTIPLIER_STYLE,
        ),
        PowerUpKind::Magnet => (consts::MAGNET_SYMBOL, consts::MAGNET_STYLE),
        PowerUpKind::ObstacleClear => (consts::OBSTACLE_CLEAR_SYMBOL, consts::OBSTACLE_CLEAR_STYLE),
    }
}

/// Round a remaining time up to whole seconds
fn whole_seconds(d: Duration) -> u64 {
    d.as_secs()
        .saturating_add(u64::from(d.subsec_nanos() > 0))
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Return the buffer coordinates of `pos`, if it lies within the canvas
    fn locate(&self, pos: Position) -> Option<(u16, u16)> {
        let x = u16::try_from(pos.x).ok().filter(|&x| x < self.area.width)?;
        let y = u16::try_from(pos.y).ok().filter(|&y| y < self.area.height)?;
        Some((self.area.x.checked_add(x)?, self.area.y.checked_add(y)?))
    }

    fn draw_char(&mut self, pos: Position, symbol: char) {
        if let Some(cell) = self.locate(pos).and_then(|xy| self.buf.cell_mut(xy)) {
            cell.set_char(symbol);
        }
    }

    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        if let Some(cell) = self.locate(pos).and_then(|xy| self.buf.cell_mut(xy)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// A border drawn while the walls can be passed through
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let max_x = i32::from(area.width.saturating_sub(1));
        let max_y = i32::from(area.height.saturating_sub(1));
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(Position::new(0, 0), '·');
        canvas.draw_char(Position::new(max_x, 0), '·');
        canvas.draw_char(Position::new(max_x, max_y), '·');
        canvas.draw_char(Position::new(0, max_y), '·');
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯');
            canvas.draw_char(Position::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮');
            canvas.draw_char(Position::new(max_x, y), '⋮');
        }
    }
}
