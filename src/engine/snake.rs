use super::direction::Direction;
use super::grid::Position;
use std::collections::VecDeque;

/// The snake: its body and where it is going
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Snake {
    /// The cells of the snake, head first
    pub(super) body: VecDeque<Position>,

    /// The direction in which the next move step will go
    pub(super) direction: Direction,

    /// The direction of the most recent move step
    pub(super) heading: Direction,

    /// A turn requested since the last tick
    pub(super) pending: Option<Direction>,
}

impl Snake {
    /// Create a snake of `length` cells with its head at `head`, facing in
    /// `direction`, with the rest of the body trailing straight behind it.
    pub(super) fn new(head: Position, direction: Direction, length: usize) -> Snake {
        let (dx, dy) = direction.reverse().delta();
        let body = std::iter::successors(Some(head), |p| Some(p.offset(dx, dy)))
            .take(length.max(1))
            .collect();
        Snake {
            body,
            direction,
            heading: direction,
            pending: None,
        }
    }

    pub(super) fn head(&self) -> Position {
        // `body` is never empty
        self.body.front().copied().unwrap_or_default()
    }

    pub(super) fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub(super) fn direction(&self) -> Direction {
        self.direction
    }

    pub(super) fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Request a turn towards `direction`, to be committed on the next tick.
    /// Returns `false` if the request was ignored because it would go
    /// nowhere new or would send the snake back into its own neck.
    pub(super) fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.direction
            || direction == self.direction.reverse()
            || direction == self.heading.reverse()
        {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    pub(super) fn commit_turn(&mut self) {
        if let Some(d) = self.pending.take() {
            self.direction = d;
        }
    }

    /// Add `pos` as the new head after a move in the current direction
    pub(super) fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
        self.heading = self.direction;
    }

    pub(super) fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            let _ = self.body.pop_back();
        }
    }
}
