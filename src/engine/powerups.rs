use super::grid::Position;
use enum_map::{Enum, EnumMap};
use rand::Rng;
use std::fmt;
use std::time::Duration;

/// The kinds of power-up that can appear on the playfield
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum PowerUpKind {
    /// Pass through the walls (and, by default, obstacles) for a while
    WallPass,

    /// Items are worth more for a while
    ScoreMultiplier,

    /// Items are pulled towards the snake's head for a while
    Magnet,

    /// Remove every obstacle from the playfield at once
    ObstacleClear,
}

impl PowerUpKind {
    /// Choose a kind uniformly at random
    pub(crate) fn random<R: Rng>(rng: &mut R) -> PowerUpKind {
        PowerUpKind::from_usize(rng.random_range(0..PowerUpKind::LENGTH))
    }

    /// The timed modifier this power-up activates, if any
    pub(crate) fn modifier(self) -> Option<Modifier> {
        match self {
            PowerUpKind::WallPass => Some(Modifier::WallPass),
            PowerUpKind::ScoreMultiplier => Some(Modifier::ScoreMultiplier),
            PowerUpKind::Magnet => Some(Modifier::Magnet),
            PowerUpKind::ObstacleClear => None,
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier() {
            Some(m) => write!(f, "{m}"),
            None => f.pad("obstacle clear"),
        }
    }
}

/// A power-up lying on the playfield
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct PowerUp {
    pub(crate) pos: Position,
    pub(crate) kind: PowerUpKind,
}

/// A timed effect of a power-up
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum Modifier {
    WallPass,
    ScoreMultiplier,
    Magnet,
}

impl Modifier {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Modifier::WallPass => "wall pass",
            Modifier::ScoreMultiplier => "score multiplier",
            Modifier::Magnet => "magnet",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The remaining time of every timed modifier.  A modifier is active exactly
/// when its remaining time is nonzero.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Modifiers(EnumMap<Modifier, Duration>);

impl Modifiers {
    pub(crate) fn is_active(&self, modifier: Modifier) -> bool {
        !self.remaining(modifier).is_zero()
    }

    pub(crate) fn remaining(&self, modifier: Modifier) -> Duration {
        self.0[modifier]
    }

    /// Iterate over the active modifiers and their remaining times
    pub(crate) fn active(&self) -> impl Iterator<Item = (Modifier, Duration)> + '_ {
        self.0
            .iter()
            .filter(|(_, left)| !left.is_zero())
            .map(|(m, &left)| (m, left))
    }

    /// Activate `modifier`, replacing whatever time it had left with
    /// `duration`
    pub(super) fn activate(&mut self, modifier: Modifier, duration: Duration) {
        self.0[modifier] = duration;
    }

    /// Count down every active modifier by `delta`, stopping at zero
    pub(super) fn tick(&mut self, delta: Duration) {
        for (modifier, left) in &mut self.0 {
            if !left.is_zero() {
                *left = left.saturating_sub(delta);
                if left.is_zero() {
                    log::info!("The {modifier} wore off");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::HashSet;

    #[test]
    fn countdown_snaps_to_zero() {
        let mut mods = Modifiers::default();
        mods.activate(Modifier::Magnet, Duration::from_millis(250));
        mods.tick(Duration::from_millis(100));
        assert!(mods.is_active(Modifier::Magnet));
        assert_eq!(mods.remaining(Modifier::Magnet), Duration::from_millis(150));
        mods.tick(Duration::from_millis(400));
        assert!(!mods.is_active(Modifier::Magnet));
        assert_eq!(mods.remaining(Modifier::Magnet), Duration::ZERO);
        assert_eq!(mods.active().count(), 0);
    }

    #[test]
    fn reactivation_resets_duration() {
        let mut mods = Modifiers::default();
        mods.activate(Modifier::WallPass, Duration::from_secs(8));
        mods.tick(Duration::from_secs(5));
        mods.activate(Modifier::WallPass, Duration::from_secs(8));
        assert_eq!(mods.remaining(Modifier::WallPass), Duration::from_secs(8));
        assert_eq!(
            mods.active().collect::<Vec<_>>(),
            [(Modifier::WallPass, Duration::from_secs(8))]
        );
    }

    #[test]
    fn inactive_modifiers_are_untouched() {
        let mut mods = Modifiers::default();
        mods.activate(Modifier::ScoreMultiplier, Duration::from_secs(1));
        mods.tick(Duration::from_millis(10));
        assert!(!mods.is_active(Modifier::WallPass));
        assert!(!mods.is_active(Modifier::Magnet));
    }

    #[test]
    fn random_kinds_cover_all() {
        let mut rng = ChaCha12Rng::seed_from_u64(0x0123456789ABCDEF);
        let kinds = (0..200)
            .map(|_| PowerUpKind::random(&mut rng))
            .collect::<HashSet<_>>();
        assert_eq!(kinds.len(), PowerUpKind::LENGTH);
    }

    #[test]
    fn only_obstacle_clear_is_instant() {
        assert_eq!(PowerUpKind::ObstacleClear.modifier(), None);
        assert_eq!(PowerUpKind::Magnet.modifier(), Some(Modifier::Magnet));
    }
}
