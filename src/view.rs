use crate::entity::{Block, FOOD_COLOR, HEAD_COLOR, OBSTACLE_COLOR, TAIL_COLOR};
use crate::game::{Game, Status};
use std::fmt;

/// Everything a renderer needs, back to front: obstacles, food, tail, head.
pub fn blocks(game: &Game) -> Vec<Block> {
    let mut out = Vec::with_capacity(game.obstacles.len() + game.snake.len() + 2);
    out.extend(game.obstacles.blocks().iter().map(|b| Block::colored(b.pos, OBSTACLE_COLOR)));
    out.push(Block::colored(game.food.pos, FOOD_COLOR));
    out.extend(game.snake.tail.iter().map(|&p| Block::colored(p, TAIL_COLOR)));
    out.push(Block::colored(game.snake.head, HEAD_COLOR));
    out
}

fn glyph(game: &Game, column: i32, row: i32) -> char {
    let p = game.playfield().cell_at(column, row);
    if p == game.snake.head {
        '@'
    } else if game.snake.tail_contains(p) {
        'o'
    } else if game.obstacles.contains(p) {
        '#'
    } else if p == game.food.pos {
        '*'
    } else {
        '.'
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.playfield();
        let status = match self.status() {
            Status::Running => "running".to_string(),
            Status::Dead(cause) => format!("dead ({cause:?})"),
            Status::BoardFull => "board full".to_string(),
            Status::Quit => "quit".to_string(),
        };
        writeln!(f, "score {} | {}", self.score, status)?;

        let edge = if self.config().no_boundary { '~' } else { '+' };
        let border = "-".repeat(field.columns() as usize);
        writeln!(f, "{edge}{border}{edge}")?;
        for row in 0..field.rows() {
            let line: String = (0..field.columns()).map(|c| glyph(self, c, row)).collect();
            writeln!(f, "|{line}|")?;
        }
        write!(f, "{edge}{border}{edge}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::{Food, Obstacles, Snake};
    use crate::geometry::{Direction, Pos};

    fn small() -> Game {
        let config = GameConfig { columns: 4, rows: 3, ..GameConfig::default() };
        let snake = Snake::with_tail(Pos::new(40, 40), Direction::Right, [Pos::new(0, 40)]);
        Game::from_parts(config, snake, Food::new(Pos::new(120, 0)), Obstacles::new([Pos::new(80, 80)])).unwrap()
    }

    #[test]
    fn blocks_end_with_the_head() {
        let g = small();
        let b = blocks(&g);
        assert_eq!(b.len(), 4);
        assert_eq!(b[0], Block::colored(Pos::new(80, 80), OBSTACLE_COLOR));
        assert_eq!(b[1].color, Some(FOOD_COLOR));
        assert_eq!(b.last(), Some(&Block::colored(Pos::new(40, 40), HEAD_COLOR)));
    }

    #[test]
    fn ascii_board() {
        let expected = "score 1 | running\n+----+\n|...*|\n|o@..|\n|..#.|\n+----+";
        assert_eq!(small().to_string(), expected);
    }
}
