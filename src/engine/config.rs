use super::direction::Direction;
use super::grid::{Bounds, Position};
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, TryFromFloatSecsError};
use thiserror::Error;

/// Every tunable parameter of the simulation, fixed for the lifetime of an
/// [`Engine`][super::Engine]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "RawEngineConfig")]
pub(crate) struct EngineConfig {
    /// Width of the window the playfield is laid out in
    pub(crate) window_width: u16,

    /// Height of the window the playfield is laid out in
    pub(crate) window_height: u16,

    /// Size of a cell in window units; the playfield is the window divided
    /// into cells of this size
    pub(crate) cell_size: u16,

    /// Where the snake's head starts
    pub(crate) start: Position,

    /// Which way the snake starts out moving
    pub(crate) start_direction: Direction,

    /// Length of the snake at the start of a round
    pub(crate) initial_length: usize,

    /// Points for eating an item
    pub(crate) item_value: u32,

    /// Factor applied to `item_value` while the score multiplier is active
    pub(crate) score_multiplier: u32,

    /// Points for picking up an obstacle clear
    pub(crate) obstacle_clear_bonus: u32,

    /// How long a timed power-up lasts
    pub(crate) modifier_duration: Duration,

    /// Move steps per second at speed level 1
    pub(crate) base_speed: f64,

    /// Additional move steps per second for each speed level above 1
    pub(crate) speed_step: f64,

    /// Items that must be eaten to gain a speed level
    pub(crate) items_per_level: u32,

    /// If set, the speed level also increases once per this much play time
    pub(crate) seconds_per_level: Option<Duration>,

    /// The move delay never drops below this
    pub(crate) min_move_delay: Duration,

    pub(crate) item_spawn_delay: Duration,
    pub(crate) power_up_spawn_delay: Duration,
    pub(crate) obstacle_spawn_delay: Duration,

    pub(crate) max_items: usize,
    pub(crate) max_power_ups: usize,
    pub(crate) max_obstacles: usize,

    /// Items placed when a round starts
    pub(crate) initial_items: usize,

    /// Obstacles placed when a round starts
    pub(crate) initial_obstacles: usize,

    /// Which cells a newly-spawned entity may not land on
    pub(crate) spawn_policy: SpawnPolicy,

    /// Whether an active wall pass also lets the snake through obstacles
    pub(crate) wall_pass_ignores_obstacles: bool,

    /// If set, the magnet only pulls items within this many cells of the
    /// snake's head
    pub(crate) magnet_range: Option<u16>,
}

impl EngineConfig {
    /// Return the size of the playfield in cells
    pub(crate) fn bounds(&self) -> Bounds {
        Bounds {
            width: self.window_width.checked_div(self.cell_size).unwrap_or(0),
            height: self.window_height.checked_div(self.cell_size).unwrap_or(0),
        }
    }

    pub(crate) fn spawn_delay(&self, kind: SpawnKind) -> Duration {
        match kind {
            SpawnKind::Item => self.item_spawn_delay,
            SpawnKind::PowerUp => self.power_up_spawn_delay,
            SpawnKind::Obstacle => self.obstacle_spawn_delay,
        }
    }

    pub(crate) fn max_count(&self, kind: SpawnKind) -> usize {
        match kind {
            SpawnKind::Item => self.max_items,
            SpawnKind::PowerUp => self.max_power_ups,
            SpawnKind::Obstacle => self.max_obstacles,
        }
    }

    /// Check that the configuration describes a playable game.
    ///
    /// # Errors
    ///
    /// Returns `Err` describing the first problem found.
    pub(crate) fn validate(&self) -> Result<(), InvalidConfig> {
        if self.cell_size == 0 {
            return Err(InvalidConfig::ZeroCellSize);
        }
        let bounds = self.bounds();
        if bounds.width == 0 || bounds.height == 0 {
            return Err(InvalidConfig::EmptyGrid {
                width: bounds.width,
                height: bounds.height,
            });
        }
        if self.initial_length == 0 {
            return Err(InvalidConfig::ZeroLength);
        }
        let (dx, dy) = self.start_direction.reverse().delta();
        let fits = std::iter::successors(Some(self.start), |p| Some(p.offset(dx, dy)))
            .take(self.initial_length)
            .all(|p| bounds.contains(p));
        if !fits {
            return Err(InvalidConfig::SnakeOutOfBounds {
                start: self.start,
                length: self.initial_length,
                width: bounds.width,
                height: bounds.height,
            });
        }
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            return Err(InvalidConfig::BaseSpeed(self.base_speed));
        }
        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            return Err(InvalidConfig::SpeedStep(self.speed_step));
        }
        if self.min_move_delay.is_zero() {
            return Err(InvalidConfig::ZeroMoveDelay);
        }
        if self.items_per_level == 0 {
            return Err(InvalidConfig::ZeroItemsPerLevel);
        }
        if self.seconds_per_level.is_some_and(|d| d.is_zero()) {
            return Err(InvalidConfig::ZeroSecondsPerLevel);
        }
        if self.score_multiplier == 0 {
            return Err(InvalidConfig::ZeroScoreMultiplier);
        }
        if self.modifier_duration.is_zero() {
            return Err(InvalidConfig::ZeroModifierDuration);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            window_width: 960,
            window_height: 432,
            cell_size: 24,
            start: Position::new(10, 10),
            start_direction: Direction::Right,
            initial_length: 3,
            item_value: 1,
            score_multiplier: 2,
            obstacle_clear_bonus: 5,
            modifier_duration: Duration::from_secs(8),
            base_speed: 6.0,
            speed_step: 2.0,
            items_per_level: 5,
            seconds_per_level: None,
            min_move_delay: Duration::from_millis(50),
            item_spawn_delay: Duration::from_secs(2),
            power_up_spawn_delay: Duration::from_secs(6),
            obstacle_spawn_delay: Duration::from_secs(4),
            max_items: 6,
            max_power_ups: 3,
            max_obstacles: 25,
            initial_items: 6,
            initial_obstacles: 10,
            spawn_policy: SpawnPolicy::default(),
            wall_pass_ignores_obstacles: true,
            magnet_range: None,
        }
    }
}

/// The categories of entity that are spawned on timers
#[derive(Clone, Copy, Debug, enum_map::Enum, Eq, PartialEq)]
pub(crate) enum SpawnKind {
    Item,
    PowerUp,
    Obstacle,
}

impl SpawnKind {
    pub(crate) const ALL: [SpawnKind; 3] = [SpawnKind::Item, SpawnKind::PowerUp, SpawnKind::Obstacle];
}

impl fmt::Display for SpawnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpawnKind::Item => "item",
            SpawnKind::PowerUp => "power-up",
            SpawnKind::Obstacle => "obstacle",
        };
        f.pad(name)
    }
}

/// Which occupied cells rule out a spawn position
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SpawnPolicy {
    /// Only cells occupied by the snake are refused; entities may pile up on
    /// the same cell.
    #[default]
    Lenient,

    /// Cells occupied by the snake or by any item, obstacle, or power-up are
    /// refused.
    Strict,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub(crate) enum InvalidConfig {
    #[error("cell size must be nonzero")]
    ZeroCellSize,
    #[error("playfield is empty ({width}x{height} cells)")]
    EmptyGrid { width: u16, height: u16 },
    #[error("initial snake length must be nonzero")]
    ZeroLength,
    #[error("a snake of length {length} starting at {start} does not fit in a {width}x{height} playfield")]
    SnakeOutOfBounds {
        start: Position,
        length: usize,
        width: u16,
        height: u16,
    },
    #[error("base speed must be a positive number, got {0}")]
    BaseSpeed(f64),
    #[error("speed step must be a nonnegative number, got {0}")]
    SpeedStep(f64),
    #[error("minimum move delay must be nonzero")]
    ZeroMoveDelay,
    #[error("items per level must be nonzero")]
    ZeroItemsPerLevel,
    #[error("seconds per level must be nonzero")]
    ZeroSecondsPerLevel,
    #[error("score multiplier must be nonzero")]
    ZeroScoreMultiplier,
    #[error("modifier duration must be nonzero")]
    ZeroModifierDuration,
    #[error("invalid duration for {field}")]
    Duration {
        field: &'static str,
        #[source]
        source: TryFromFloatSecsError,
    },
}

/// The on-disk form of [`EngineConfig`], with durations given as seconds
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawEngineConfig {
    window_width: u16,
    window_height: u16,
    cell_size: u16,
    start: Position,
    start_direction: Direction,
    initial_length: usize,
    item_value: u32,
    score_multiplier: u32,
    obstacle_clear_bonus: u32,
    modifier_duration: f64,
    base_speed: f64,
    speed_step: f64,
    items_per_level: u32,
    seconds_per_level: Option<f64>,
    min_move_delay: f64,
    item_spawn_delay: f64,
    power_up_spawn_delay: f64,
    obstacle_spawn_delay: f64,
    max_items: usize,
    max_power_ups: usize,
    max_obstacles: usize,
    initial_items: usize,
    initial_obstacles: usize,
    spawn_policy: SpawnPolicy,
    wall_pass_ignores_obstacles: bool,
    magnet_range: Option<u16>,
}

impl Default for RawEngineConfig {
    fn default() -> RawEngineConfig {
        RawEngineConfig::from(EngineConfig::default())
    }
}

impl From<EngineConfig> for RawEngineConfig {
    fn from(value: EngineConfig) -> RawEngineConfig {
        RawEngineConfig {
            window_width: value.window_width,
            window_height: value.window_height,
            cell_size: value.cell_size,
            start: value.start,
            start_direction: value.start_direction,
            initial_length: value.initial_length,
            item_value: value.item_value,
            score_multiplier: value.score_multiplier,
            obstacle_clear_bonus: value.obstacle_clear_bonus,
            modifier_duration: value.modifier_duration.as_secs_f64(),
            base_speed: value.base_speed,
            speed_step: value.speed_step,
            items_per_level: value.items_per_level,
            seconds_per_level: value.seconds_per_level.map(|d| d.as_secs_f64()),
            min_move_delay: value.min_move_delay.as_secs_f64(),
            item_spawn_delay: value.item_spawn_delay.as_secs_f64(),
            power_up_spawn_delay: value.power_up_spawn_delay.as_secs_f64(),
            obstacle_spawn_delay: value.obstacle_spawn_delay.as_secs_f64(),
            max_items: value.max_items,
            max_power_ups: value.max_power_ups,
            max_obstacles: value.max_obstacles,
            initial_items: value.initial_items,
            initial_obstacles: value.initial_obstacles,
            spawn_policy: value.spawn_policy,
            wall_pass_ignores_obstacles: value.wall_pass_ignores_obstacles,
            magnet_range: value.magnet_range,
        }
    }
}

impl TryFrom<RawEngineConfig> for EngineConfig {
    type Error = InvalidConfig;

    fn try_from(value: RawEngineConfig) -> Result<EngineConfig, InvalidConfig> {
        let config = EngineConfig {
            window_width: value.window_width,
            window_height: value.window_height,
            cell_size: value.cell_size,
            start: value.start,
            start_direction: value.start_direction,
            initial_length: value.initial_length,
            item_value: value.item_value,
            score_multiplier: value.score_multiplier,
            obstacle_clear_bonus: value.obstacle_clear_bonus,
            modifier_duration: seconds("modifier-duration", value.modifier_duration)?,
            base_speed: value.base_speed,
            speed_step: value.speed_step,
            items_per_level: value.items_per_level,
            seconds_per_level: value
                .seconds_per_level
                .map(|secs| seconds("seconds-per-level", secs))
                .transpose()?,
            min_move_delay: seconds("min-move-delay", value.min_move_delay)?,
            item_spawn_delay: seconds("item-spawn-delay", value.item_spawn_delay)?,
            power_up_spawn_delay: seconds("power-up-spawn-delay", value.power_up_spawn_delay)?,
            obstacle_spawn_delay: seconds("obstacle-spawn-delay", value.obstacle_spawn_delay)?,
            max_items: value.max_items,
            max_power_ups: value.max_power_ups,
            max_obstacles: value.max_obstacles,
            initial_items: value.initial_items,
            initial_obstacles: value.initial_obstacles,
            spawn_policy: value.spawn_policy,
            wall_pass_ignores_obstacles: value.wall_pass_ignores_obstacles,
            magnet_range: value.magnet_range,
        };
        config.validate()?;
        Ok(config)
    }
}

fn seconds(field: &'static str, secs: f64) -> Result<Duration, InvalidConfig> {
    Duration::try_from_secs_f64(secs).map_err(|source| InvalidConfig::Duration { field, source })
}
