use crate::geometry::{Direction, Pos};
use ahash::AHashSet;
use std::collections::VecDeque;

pub type Rgb = (u8, u8, u8);

pub const HEAD_COLOR: Rgb = (124, 252, 0);
pub const TAIL_COLOR: Rgb = (0, 128, 255);
pub const FOOD_COLOR: Rgb = (255, 0, 100);
pub const OBSTACLE_COLOR: Rgb = (220, 220, 220);

/// A grid-aligned square. Colour is display metadata only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub pos: Pos,
    pub color: Option<Rgb>,
}

impl Block {
    pub fn new(pos: Pos) -> Self {
        Self { pos, color: None }
    }

    pub fn colored(pos: Pos, color: Rgb) -> Self {
        Self { pos, color: Some(color) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    pub head: Pos,
    /// Front is the oldest segment (dropped on a plain move), back sits next to the head.
    pub tail: VecDeque<Pos>,
    pub heading: Direction,
}

impl Snake {
    pub fn new(head: Pos, heading: Direction) -> Self {
        Self { head, tail: VecDeque::new(), heading }
    }

    /// `tail` is given oldest first.
    pub fn with_tail(head: Pos, heading: Direction, tail: impl IntoIterator<Item = Pos>) -> Self {
        Self { head, tail: tail.into_iter().collect(), heading }
    }

    pub fn len(&self) -> usize {
        self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tail.is_empty()
    }

    /// Ignores a reversal once the snake has a body; a bare head may turn around.
    /// `None` is not a steering input and is ignored.
    pub fn change_direction(&mut self, dir: Direction) {
        if dir.is_none() || (!self.tail.is_empty() && dir == self.heading.opposite()) {
            return;
        }
        self.heading = dir;
    }

    pub fn tail_contains(&self, p: Pos) -> bool {
        self.tail.iter().any(|&s| s == p)
    }

    pub fn occupies(&self, p: Pos) -> bool {
        self.head == p || self.tail_contains(p)
    }

    // The oldest segment moves out of the way this tick unless the snake eats
    pub fn blocks_move_into(&self, p: Pos) -> bool {
        self.tail.iter().skip(1).any(|&s| s == p)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    pub pos: Pos,
}

impl Food {
    pub fn new(pos: Pos) -> Self {
        Self { pos }
    }
}

/// Fixed blocks placed once per game.
#[derive(Clone, Debug, Default)]
pub struct Obstacles {
    blocks: Vec<Block>,
    cells: AHashSet<Pos>,
}

impl Obstacles {
    pub fn new(cells: impl IntoIterator<Item = Pos>) -> Self {
        let mut obstacles = Self::default();
        for p in cells {
            obstacles.insert(p);
        }
        obstacles
    }

    pub fn insert(&mut self, p: Pos) -> bool {
        if self.cells.insert(p) {
            self.blocks.push(Block::colored(p, OBSTACLE_COLOR));
            true
        } else {
            false
        }
    }

    pub fn remove_last(&mut self) -> Option<Pos> {
        let block = self.blocks.pop()?;
        self.cells.remove(&block.pos);
        Some(block.pos)
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.cells.contains(&p)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
