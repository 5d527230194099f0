use rand::Rng;
use serde::Deserialize;
use std::fmt;

/// A cell of the playfield.  The origin is the top-left cell; `x` grows
/// rightwards and `y` grows downwards.
///
/// Coordinates are signed so that a head that has just left the playfield
/// can be represented before it is wrapped or declared out of bounds.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
pub(crate) struct Position {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Position {
    pub(crate) const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// Return the position offset by `(dx, dy)`
    pub(crate) fn offset(self, dx: i32, dy: i32) -> Position {
        Position {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The dimensions of the playfield, in cells
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Bounds {
    pub(crate) fn contains(self, pos: Position) -> bool {
        (0..i32::from(self.width)).contains(&pos.x) && (0..i32::from(self.height)).contains(&pos.y)
    }

    /// Wrap `pos` onto the playfield, each axis independently.
    ///
    /// The playfield must not be empty.
    pub(crate) fn wrap(self, pos: Position) -> Position {
        Position {
            x: pos.x.rem_euclid(i32::from(self.width.max(1))),
            y: pos.y.rem_euclid(i32::from(self.height.max(1))),
        }
    }

    /// Choose a cell of the playfield uniformly at random
    pub(crate) fn random_cell<R: Rng>(self, rng: &mut R) -> Position {
        Position {
            x: rng.random_range(0..i32::from(self.width.max(1))),
            y: rng.random_range(0..i32::from(self.height.max(1))),
        }
    }
}
