//! Maps a board to the 12-bit key the Q-table is indexed by.
//!
//! Layout, most significant bit first:
//!
//! ```text
//! [ TL T TR R BR B BL L ][ food quadrant ][ heading ]
//!          8 bits               2 bits       2 bits
//! ```
//!
//! A neighbour bit is set when that cell is off the playfield, holds a body
//! segment or holds an obstacle. Only cells relative to the head are looked at,
//! so the same local picture gives the same key anywhere on the board.

use crate::entity::{Food, Obstacles, Snake};
use crate::error::SnakeError;
use crate::game::Game;
use crate::geometry::{Direction, Playfield, Pos};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STATE_BITS: u32 = 12;
const MASK: u16 = (1 << STATE_BITS) - 1;

/// Clockwise from the top-left, in cells.
const NEIGHBOURS: [(i32, i32); 8] = [(-1, -1), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct StateKey(u16);

impl StateKey {
    pub fn from_bits(bits: u16) -> Self {
        StateKey(bits & MASK)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn neighbours(self) -> u8 {
        (self.0 >> 4) as u8
    }

    pub fn quadrant(self) -> u8 {
        ((self.0 >> 2) & 0b11) as u8
    }

    pub fn heading(self) -> u8 {
        (self.0 & 0b11) as u8
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:012b}", self.0)
    }
}

impl FromStr for StateKey {
    type Err = SnakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != STATE_BITS as usize {
            return Err(SnakeError::InvalidConfig(format!("state key must be {STATE_BITS} bits, got {s:?}")));
        }
        u16::from_str_radix(s, 2)
            .map(StateKey)
            .map_err(|_| SnakeError::InvalidConfig(format!("state key is not binary: {s:?}")))
    }
}

// Ties go to the upper/right side
fn quadrant_bits(head: Pos, food: Pos) -> u16 {
    if food.x > head.x && food.y <= head.y {
        0b00
    } else if food.x <= head.x && food.y < head.y {
        0b01
    } else if food.x < head.x && food.y >= head.y {
        0b10
    } else {
        0b11
    }
}

fn heading_bits(heading: Direction) -> u16 {
    match heading {
        Direction::Up => 0b00,
        Direction::Left => 0b01,
        Direction::Down => 0b10,
        Direction::Right | Direction::None => 0b11,
    }
}

pub fn encode(field: &Playfield, snake: &Snake, food: &Food, obstacles: &Obstacles) -> StateKey {
    let mut bits: u16 = 0;
    for (dx, dy) in NEIGHBOURS {
        let p = snake.head.offset(dx * field.cell, dy * field.cell);
        let occupied = !field.contains(p) || snake.tail_contains(p) || obstacles.contains(p);
        bits = (bits << 1) | occupied as u16;
    }
    bits = (bits << 2) | quadrant_bits(snake.head, food.pos);
    bits = (bits << 2) | heading_bits(snake.heading);
    StateKey::from_bits(bits)
}

pub fn encode_game(game: &Game) -> StateKey {
    encode(game.playfield(), &game.snake, &game.food, &game.obstacles)
}
