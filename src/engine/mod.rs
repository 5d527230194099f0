//! The game simulation: all of the rules, none of the drawing.
//!
//! An [`Engine`] owns the complete state of a round.  The caller feeds it
//! direction input and elapsed time and reads the state back for display.
mod config;
mod direction;
mod grid;
mod powerups;
mod snake;
mod spawn;
pub(crate) use self::config::{EngineConfig, InvalidConfig};
pub(crate) use self::direction::Direction;
pub(crate) use self::grid::Position;
pub(crate) use self::powerups::{Modifier, PowerUpKind};
use self::config::SpawnKind;
use self::grid::Bounds;
use self::powerups::{Modifiers, PowerUp};
use self::snake::Snake;
use enum_map::EnumMap;
use rand::{rngs::StdRng, Rng};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct Engine<R = StdRng> {
    config: EngineConfig,
    bounds: Bounds,
    rng: R,
    state: EngineState,
    snake: Snake,
    items: Vec<Position>,
    obstacles: Vec<Position>,
    power_ups: Vec<PowerUp>,
    modifiers: Modifiers,
    spawn_timers: EnumMap<SpawnKind, Duration>,
    move_timer: Duration,
    elapsed: Duration,
    score: u32,
    items_eaten: u32,
    /// Move steps for which the tail should stay put
    growth: u32,
}

impl<R: Rng> Engine<R> {
    /// Create an engine for a fresh round.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `config` does not describe a playable game.
    pub(crate) fn new(config: EngineConfig, rng: R) -> Result<Engine<R>, InvalidConfig> {
        config.validate()?;
        let bounds = config.bounds();
        let snake = Snake::new(config.start, config.start_direction, config.initial_length);
        let mut engine = Engine {
            config,
            bounds,
            rng,
            state: EngineState::Running,
            snake,
            items: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            modifiers: Modifiers::default(),
            spawn_timers: EnumMap::default(),
            move_timer: Duration::ZERO,
            elapsed: Duration::ZERO,
            score: 0,
            items_eaten: 0,
            growth: 0,
        };
        engine.populate();
        Ok(engine)
    }

    /// Throw away the current round and start a new one
    pub(crate) fn reset(&mut self) {
        self.state = EngineState::Running;
        self.snake = Snake::new(
            self.config.start,
            self.config.start_direction,
            self.config.initial_length,
        );
        self.items.clear();
        self.obstacles.clear();
        self.power_ups.clear();
        self.modifiers = Modifiers::default();
        self.spawn_timers = EnumMap::default();
        self.move_timer = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.score = 0;
        self.items_eaten = 0;
        self.growth = 0;
        self.populate();
        log::info!("Starting a new round");
    }

    /// Advance the simulation by `delta` of game time
    pub(crate) fn tick(&mut self, delta: Duration) {
        if !self.running() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(delta);
        let move_delay = self.move_delay();
        self.modifiers.tick(delta);
        self.snake.commit_turn();
        if self.modifiers.is_active(Modifier::Magnet) {
            self.pull_items();
        }
        self.run_spawners(delta);
        self.move_timer = self.move_timer.saturating_add(delta);
        if self.move_timer >= move_delay {
            self.move_timer = Duration::ZERO;
            self.step();
        }
    }

    fn populate(&mut self) {
        for _ in 0..self.config.initial_items {
            self.spawn(SpawnKind::Item);
        }
        for _ in 0..self.config.initial_obstacles {
            self.spawn(SpawnKind::Obstacle);
        }
    }
}

impl<R> Engine<R> {
    /// Ask the snake to turn.  Turning back on itself, or "turning" the way
    /// it's already going, is ignored.  The turn takes effect on the next
    /// tick.
    pub(crate) fn handle_direction_input(&mut self, direction: Direction) {
        if self.running() && !self.snake.turn(direction) {
            log::trace!("Ignoring turn towards {direction:?}");
        }
    }

    /// Move the snake one cell and resolve whatever it runs into
    fn step(&mut self) {
        let head = self.snake.head();
        let direction = self.snake.direction();
        let phasing = self.modifiers.is_active(Modifier::WallPass);
        let Some(next) = direction.advance(head, self.bounds, phasing) else {
            self.game_over(GameOverCause::Wall, head);
            return;
        };
        if self.snake.contains(next) {
            self.game_over(GameOverCause::Snake, next);
            return;
        }
        if self.obstacles.contains(&next) && !(phasing && self.config.wall_pass_ignores_obstacles) {
            self.game_over(GameOverCause::Obstacle, next);
            return;
        }
        self.snake.push_head(next);
        log::debug!("Snake moved {direction:?} to {next}");
        let eaten = remove_at(&mut self.items, next);
        self.eat_items(eaten);
        let (picked, rest) = std::mem::take(&mut self.power_ups)
            .into_iter()
            .partition::<Vec<_>, _>(|pu| pu.pos == next);
        self.power_ups = rest;
        for pu in picked {
            self.apply_power_up(pu.kind);
        }
        if self.growth > 0 {
            self.growth -= 1;
        } else {
            self.snake.pop_tail();
        }
    }

    /// Drag items one cell towards the head on each axis, eating whatever
    /// arrives
    fn pull_items(&mut self) {
        let head = self.snake.head();
        let range = self.config.magnet_range.map(i64::from);
        for item in &mut self.items {
            let dx = head.x - item.x;
            let dy = head.y - item.y;
            let in_range = range.is_none_or(|r| {
                let (dx, dy) = (i64::from(dx), i64::from(dy));
                dx * dx + dy * dy <= r * r
            });
            if in_range {
                *item = item.offset(dx.signum(), dy.signum());
            }
        }
        let eaten = remove_at(&mut self.items, head);
        if eaten > 0 {
            log::debug!("Magnet pulled {eaten} item(s) into the snake's mouth");
            self.eat_items(eaten);
        }
    }

    fn eat_items(&mut self, qty: usize) {
        for _ in 0..qty {
            let mut points = self.config.item_value;
            if self.modifiers.is_active(Modifier::ScoreMultiplier) {
                points = points.saturating_mul(self.config.score_multiplier);
            }
            self.score = self.score.saturating_add(points);
            self.items_eaten = self.items_eaten.saturating_add(1);
            self.growth = self.growth.saturating_add(1);
        }
    }

    fn apply_power_up(&mut self, kind: PowerUpKind) {
        if let Some(modifier) = kind.modifier() {
            log::info!("Picked up a {kind} power-up");
            self.modifiers.activate(modifier, self.config.modifier_duration);
        } else {
            log::info!("Obstacle clear: removed {} obstacle(s)", self.obstacles.len());
            self.obstacles.clear();
            self.score = self.score.saturating_add(self.config.obstacle_clear_bonus);
        }
    }

    fn game_over(&mut self, cause: GameOverCause, at: Position) {
        log::info!("Game over: {cause} at {at}; score {}", self.score);
        self.state = EngineState::Over(GameOver { cause, at });
    }

    /// The current speed level, starting at 1
    pub(crate) fn speed_level(&self) -> u32 {
        let by_items = self
            .items_eaten
            .checked_div(self.config.items_per_level)
            .unwrap_or(0);
        let by_time = self
            .config
            .seconds_per_level
            .and_then(|period| self.elapsed.as_nanos().checked_div(period.as_nanos()))
            .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX));
        1u32.saturating_add(by_items).saturating_add(by_time)
    }

    /// The time between move steps at the current speed level
    pub(crate) fn move_delay(&self) -> Duration {
        let level = f64::from(self.speed_level().saturating_sub(1));
        let speed = self.config.speed_step.mul_add(level, self.config.base_speed);
        Duration::try_from_secs_f64(speed.recip())
            .map_or(self.config.min_move_delay, |d| d.max(self.config.min_move_delay))
    }

    pub(crate) fn state(&self) -> EngineState {
        self.state
    }

    pub(crate) fn running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub(crate) fn is_over(&self) -> bool {
        !self.running()
    }

    /// The cells of the snake, head first
    pub(crate) fn snake(&self) -> &VecDeque<Position> {
        self.snake.body()
    }

    pub(crate) fn head(&self) -> Position {
        self.snake.head()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.snake.direction()
    }

    pub(crate) fn items(&self) -> &[Position] {
        &self.items
    }

    pub(crate) fn obstacles(&self) -> &[Position] {
        &self.obstacles
    }

    pub(crate) fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub(crate) fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn items_eaten(&self) -> u32 {
        self.items_eaten
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Remove every occurrence of `pos` from `cells` and return how many there
/// were
fn remove_at(cells: &mut Vec<Position>, pos: Position) -> usize {
    let before = cells.len();
    cells.retain(|&p| p != pos);
    before - cells.len()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EngineState {
    Running,
    Over(GameOver),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GameOver {
    pub(crate) cause: GameOverCause,

    /// Where the collision happened.  For a wall, this is the last cell the
    /// head occupied.
    pub(crate) at: Position,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameOverCause {
    Wall,
    Snake,
    Obstacle,
}

impl fmt::Display for GameOverCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            GameOverCause::Wall => "hit a wall",
            GameOverCause::Snake => "hit itself",
            GameOverCause::Obstacle => "hit an obstacle",
        };
        f.pad(what)
    }
}
