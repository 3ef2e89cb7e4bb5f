use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel position of the top-left corner of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// One cell over in `dir`. `Direction::None` stays put.
    pub fn step(self, dir: Direction, cell: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx * cell, self.y + dy * cell)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance in pixels.
    pub fn manhattan(self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }

    // Prevent 180 degree turns: the flip of a heading is its negation
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Direction::None
    }
}

/// The four moves the learner can pick. `Direction::None` is never an action,
/// so every Q-table row has exactly one slot per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Action> {
        Action::ALL.get(i).copied()
    }

    pub fn direction(self) -> Direction {
        match self {
            Action::Up => Direction::Up,
            Action::Down => Direction::Down,
            Action::Left => Direction::Left,
            Action::Right => Direction::Right,
        }
    }

    pub fn from_direction(dir: Direction) -> Option<Action> {
        match dir {
            Direction::Up => Some(Action::Up),
            Direction::Down => Some(Action::Down),
            Direction::Left => Some(Action::Left),
            Direction::Right => Some(Action::Right),
            Direction::None => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rectangle of playable cells, in pixels. `left` and `top` are inclusive,
/// `right` and `bottom` exclusive; all of them are cell aligned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playfield {
    pub cell: i32,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Playfield {
    pub fn new(cell: i32, left: i32, columns: i32, rows: i32) -> Self {
        Self { cell, left, top: 0, right: left + columns * cell, bottom: rows * cell }
    }

    pub fn columns(&self) -> i32 {
        (self.right - self.left) / self.cell
    }

    pub fn rows(&self) -> i32 {
        (self.bottom - self.top) / self.cell
    }

    pub fn cell_count(&self) -> usize {
        (self.columns() * self.rows()) as usize
    }

    pub fn contains(&self, p: Pos) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// Teleports a position that left the field by one cell to the opposite edge.
    pub fn wrap(&self, p: Pos) -> Pos {
        let x = if p.x < self.left {
            self.right - self.cell
        } else if p.x >= self.right {
            self.left
        } else {
            p.x
        };
        let y = if p.y < self.top {
            self.bottom - self.cell
        } else if p.y >= self.bottom {
            self.top
        } else {
            p.y
        };
        Pos::new(x, y)
    }

    /// Cell at grid coordinates (column, row).
    pub fn cell_at(&self, column: i32, row: i32) -> Pos {
        Pos::new(self.left + column * self.cell, self.top + row * self.cell)
    }

    /// Grid coordinates of a position inside the field.
    pub fn grid_of(&self, p: Pos) -> (i32, i32) {
        ((p.x - self.left) / self.cell, (p.y - self.top) / self.cell)
    }

    pub fn center(&self) -> Pos {
        self.cell_at(self.columns() / 2, self.rows() / 2)
    }

    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows()).flat_map(move |r| (0..self.columns()).map(move |c| self.cell_at(c, r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for d in Direction::CARDINAL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn action_index_round_trips() {
        for a in Action::ALL {
            assert_eq!(Action::from_index(a.index()), Some(a));
            assert_eq!(Action::from_direction(a.direction()), Some(a));
        }
        assert_eq!(Action::from_direction(Direction::None), None);
    }

    #[test]
    fn wrap_moves_to_the_far_edge() {
        let field = Playfield::new(40, 0, 20, 15);
        assert_eq!(field.wrap(Pos::new(-40, 80)), Pos::new(760, 80));
        assert_eq!(field.wrap(Pos::new(800, 80)), Pos::new(0, 80));
        assert_eq!(field.wrap(Pos::new(40, -40)), Pos::new(40, 560));
        assert_eq!(field.wrap(Pos::new(40, 600)), Pos::new(40, 0));
    }

    #[test]
    fn offset_field_bounds() {
        let field = Playfield::new(40, 160, 10, 10);
        assert!(!field.contains(Pos::new(120, 0)));
        assert!(field.contains(Pos::new(160, 0)));
        assert!(!field.contains(Pos::new(560, 0)));
        assert_eq!(field.cells().count(), 100);
        assert_eq!(field.grid_of(Pos::new(200, 80)), (1, 2));
    }
}
