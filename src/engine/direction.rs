use super::grid::{Bounds, Position};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// The unit vector for the direction as `(dx, dy)`
    pub(crate) fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Return the cell one step from `pos` in this direction.  If that cell is
    /// outside `bounds`, it is wrapped around to the opposite edge when `wrap`
    /// is true, and `None` is returned otherwise.
    pub(crate) fn advance(self, pos: Position, bounds: Bounds, wrap: bool) -> Option<Position> {
        let (dx, dy) = self.delta();
        let next = pos.offset(dx, dy);
        if bounds.contains(next) {
            Some(next)
        } else if wrap {
            Some(bounds.wrap(next))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BOUNDS: Bounds = Bounds {
        width: 10,
        height: 15,
    };

    #[rstest]
    #[case(Direction::Up, Position::new(2, 7), false, Some(Position::new(2, 6)))]
    #[case(Direction::Down, Position::new(2, 7), false, Some(Position::new(2, 8)))]
    #[case(Direction::Right, Position::new(2, 7), false, Some(Position::new(3, 7)))]
    #[case(Direction::Left, Position::new(2, 7), false, Some(Position::new(1, 7)))]
    #[case(Direction::Up, Position::new(2, 0), false, None)]
    #[case(Direction::Up, Position::new(2, 0), true, Some(Position::new(2, 14)))]
    #[case(Direction::Down, Position::new(2, 14), false, None)]
    #[case(Direction::Down, Position::new(2, 14), true, Some(Position::new(2, 0)))]
    #[case(Direction::Right, Position::new(9, 7), false, None)]
    #[case(Direction::Right, Position::new(9, 7), true, Some(Position::new(0, 7)))]
    #[case(Direction::Left, Position::new(0, 7), false, None)]
    #[case(Direction::Left, Position::new(0, 7), true, Some(Position::new(9, 7)))]
    fn test_direction_advance(
        #[case] d: Direction,
        #[case] pos: Position,
        #[case] wrap: bool,
        #[case] r: Option<Position>,
    ) {
        assert_eq!(d.advance(pos, BOUNDS, wrap), r);
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Right)]
    #[case(Direction::Down)]
    #[case(Direction::Left)]
    fn reverse_cancels_delta(#[case] d: Direction) {
        let (dx, dy) = d.delta();
        let (rx, ry) = d.reverse().delta();
        assert_eq!((dx + rx, dy + ry), (0, 0));
        assert_eq!(d.reverse().reverse(), d);
    }
}
