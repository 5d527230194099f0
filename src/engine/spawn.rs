use super::config::{SpawnKind, SpawnPolicy};
use super::grid::Position;
use super::powerups::{PowerUp, PowerUpKind};
use super::Engine;
use rand::Rng;
use std::time::Duration;

impl<R: Rng> Engine<R> {
    /// Advance every spawn timer by `delta`, making one spawn attempt for each
    /// timer that comes due
    pub(super) fn run_spawners(&mut self, delta: Duration) {
        for kind in SpawnKind::ALL {
            let timer = &mut self.spawn_timers[kind];
            *timer = timer.saturating_add(delta);
            if *timer >= self.config.spawn_delay(kind) {
                *timer = Duration::ZERO;
                self.spawn(kind);
            }
        }
    }

    /// Try to place one new entity of the given kind on a random cell.
    /// Returns `false` if the kind is already at its limit or the chosen cell
    /// was unavailable.
    pub(super) fn spawn(&mut self, kind: SpawnKind) -> bool {
        if self.count(kind) >= self.config.max_count(kind) {
            log::trace!("Not spawning {kind}: limit reached");
            return false;
        }
        let pos = self.bounds.random_cell(&mut self.rng);
        if self.occupied(pos) {
            log::debug!("Could not spawn {kind} at {pos}: cell is taken");
            return false;
        }
        match kind {
            SpawnKind::Item => self.items.push(pos),
            SpawnKind::Obstacle => self.obstacles.push(pos),
            SpawnKind::PowerUp => {
                let kind = PowerUpKind::random(&mut self.rng);
                self.power_ups.push(PowerUp { pos, kind });
            }
        }
        log::debug!("Spawned {kind} at {pos}");
        true
    }
}

impl<R> Engine<R> {
    fn count(&self, kind: SpawnKind) -> usize {
        match kind {
            SpawnKind::Item => self.items.len(),
            SpawnKind::PowerUp => self.power_ups.len(),
            SpawnKind::Obstacle => self.obstacles.len(),
        }
    }

    /// Is `pos` ruled out as a spawn location under the configured policy?
    fn occupied(&self, pos: Position) -> bool {
        if self.snake.contains(pos) {
            return true;
        }
        match self.config.spawn_policy {
            SpawnPolicy::Lenient => false,
            SpawnPolicy::Strict => {
                self.items.contains(&pos)
                    || self.obstacles.contains(&pos)
                    || self.power_ups.iter().any(|pu| pu.pos == pos)
            }
        }
    }
}
