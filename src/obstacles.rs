use crate::entity::Obstacles;
use crate::error::{Result, SnakeError};
use crate::geometry::{Direction, Playfield, Pos};
use ahash::AHashSet;
use rand::Rng;
use std::collections::VecDeque;

const ATTEMPTS_PER_BLOCK: usize = 200;

/// Free cells reachable from `origin` by cardinal moves.
pub fn reachable_cells(field: &Playfield, obstacles: &Obstacles, origin: Pos, wrap: bool) -> AHashSet<Pos> {
    let mut seen = AHashSet::new();
    if !field.contains(origin) || obstacles.contains(origin) {
        return seen;
    }
    let mut queue = VecDeque::new();
    seen.insert(origin);
    queue.push_back(origin);
    while let Some(p) = queue.pop_front() {
        for d in Direction::CARDINAL {
            let mut n = p.step(d, field.cell);
            if !field.contains(n) {
                if !wrap {
                    continue;
                }
                n = field.wrap(n);
            }
            if obstacles.contains(n) || !seen.insert(n) {
                continue;
            }
            queue.push_back(n);
        }
    }
    seen
}

/// True when every free cell can be reached from `origin`.
pub fn is_fully_connected(field: &Playfield, obstacles: &Obstacles, origin: Pos, wrap: bool) -> bool {
    let free = field.cell_count() - obstacles.len();
    reachable_cells(field, obstacles, origin, wrap).len() == free
}

/// Drops `count` blocks on random cells, rejecting any block that would seal
/// off part of the board from `start`. The start cell and its neighbours stay clear.
pub fn place_obstacles<R: Rng + ?Sized>(
    field: &Playfield,
    count: usize,
    start: Pos,
    wrap: bool,
    rng: &mut R,
) -> Result<Obstacles> {
    let mut reserved = vec![start];
    for d in Direction::CARDINAL {
        let n = start.step(d, field.cell);
        if field.contains(n) {
            reserved.push(n);
        } else if wrap {
            reserved.push(field.wrap(n));
        }
    }

    let mut obstacles = Obstacles::default();
    while obstacles.len() < count {
        let mut placed = false;
        for _ in 0..ATTEMPTS_PER_BLOCK {
            let p = field.cell_at(rng.gen_range(0..field.columns()), rng.gen_range(0..field.rows()));
            if reserved.contains(&p) || !obstacles.insert(p) {
                continue;
            }
            if is_fully_connected(field, &obstacles, start, wrap) {
                placed = true;
                break;
            }
            obstacles.remove_last();
        }
        if !placed {
            return Err(SnakeError::ObstaclePlacement { placed: obstacles.len(), requested: count });
        }
    }
    Ok(obstacles)
}
