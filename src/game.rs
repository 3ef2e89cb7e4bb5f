use crate::config::{GameConfig, ObstacleMode};
use crate::entity::{Food, Obstacles, Snake};
use crate::error::Result;
use crate::geometry::{Direction, Playfield, Pos};
use crate::obstacles::place_obstacles;
use rand::Rng;
use rand::seq::SliceRandom;

// Random rolls before falling back to scanning every free cell
const FOOD_ROLLS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collision {
    Wall,
    Body,
    Obstacle,
}

/// What a single tick did to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing moved: no heading yet, or the game is already over.
    Idle,
    Moved { ate: bool },
    Wrapped { ate: bool },
    /// A collision was avoided by turning to a safe direction.
    Redirected { cause: Collision, ate: bool },
    Died(Collision),
}

impl Outcome {
    pub fn ate(self) -> bool {
        match self {
            Outcome::Moved { ate } | Outcome::Wrapped { ate } | Outcome::Redirected { ate, .. } => ate,
            Outcome::Idle | Outcome::Died(_) => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Outcome::Died(_))
    }

    pub fn collision(self) -> Option<Collision> {
        match self {
            Outcome::Redirected { cause, .. } | Outcome::Died(cause) => Some(cause),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Dead(Collision),
    /// No free cell was left for the food.
    BoardFull,
    Quit,
}

#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    field: Playfield,
    pub snake: Snake,
    pub food: Food,
    pub obstacles: Obstacles,
    pub score: u32,
    status: Status,
}

impl Game {
    /// Fresh board: head in the middle, no heading, obstacles placed, food on a free cell.
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let field = config.playfield();
        let start = field.center();
        let obstacles = place_obstacles(&field, config.obstacles, start, config.no_boundary, rng)?;
        let mut game = Self {
            config,
            field,
            snake: Snake::new(start, Direction::None),
            food: Food::new(start),
            obstacles,
            score: 0,
            status: Status::Running,
        };
        if !game.place_food(rng) {
            game.status = Status::BoardFull;
        }
        Ok(game)
    }

    /// Builds a game around an existing arrangement. The score starts at the tail length.
    pub fn from_parts(config: GameConfig, snake: Snake, food: Food, obstacles: Obstacles) -> Result<Self> {
        config.validate()?;
        let field = config.playfield();
        let score = snake.len() as u32;
        Ok(Self { config, field, snake, food, obstacles, score, status: Status::Running })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn playfield(&self) -> &Playfield {
        &self.field
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn death(&self) -> Option<Collision> {
        match self.status {
            Status::Dead(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn quit(&mut self) {
        if self.is_running() {
            self.status = Status::Quit;
        }
    }

    /// Manhattan distance from head to food, in cells.
    pub fn distance_to_food(&self) -> i32 {
        self.snake.head.manhattan(self.food.pos) / self.field.cell
    }

    pub fn change_direction(&mut self, dir: Direction) {
        if self.is_running() {
            self.snake.change_direction(dir);
        }
    }

    pub fn is_free(&self, p: Pos) -> bool {
        !self.snake.occupies(p) && !self.obstacles.contains(p)
    }

    /// Moves the food to a random free cell. Returns false when none is left.
    pub fn place_food<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        for _ in 0..FOOD_ROLLS {
            let p = self.field.cell_at(rng.gen_range(0..self.field.columns()), rng.gen_range(0..self.field.rows()));
            if self.is_free(p) {
                self.food.pos = p;
                return true;
            }
        }
        let free: Vec<Pos> = self.field.cells().filter(|&p| self.is_free(p)).collect();
        match free.choose(rng) {
            Some(&p) => {
                self.food.pos = p;
                true
            }
            None => false,
        }
    }

    /// Advances the snake one cell along its heading.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Outcome {
        if !self.is_running() || self.snake.heading.is_none() {
            return Outcome::Idle;
        }

        let mut heading = self.snake.heading;
        let mut target = self.snake.head.step(heading, self.field.cell);
        let mut wrapped = false;
        let mut redirected = None;

        let hit = if self.field.contains(target) {
            self.collision_at(target)
        } else if self.config.no_boundary {
            target = self.field.wrap(target);
            wrapped = true;
            self.collision_at(target)
        } else {
            Some(Collision::Wall)
        };

        if let Some(cause) = hit {
            match self.redirect(cause, rng) {
                Some((dir, pos, via_wrap)) => {
                    heading = dir;
                    target = pos;
                    wrapped = via_wrap;
                    redirected = Some(cause);
                }
                None => {
                    self.status = Status::Dead(cause);
                    log::debug!("snake died on {:?} at {} with score {}", cause, self.snake.head, self.score);
                    return Outcome::Died(cause);
                }
            }
        }

        let ate = target == self.food.pos;
        self.advance(heading, target, ate);
        if ate {
            self.score += 1;
            if !self.place_food(rng) {
                log::warn!("board full at score {}", self.score);
                self.status = Status::BoardFull;
            }
        }

        match redirected {
            Some(cause) => Outcome::Redirected { cause, ate },
            None if wrapped => Outcome::Wrapped { ate },
            None => Outcome::Moved { ate },
        }
    }

    // Food never shares a cell with the body, so a cell holding food is never a body hit
    fn collision_at(&self, p: Pos) -> Option<Collision> {
        if self.obstacles.contains(p) {
            Some(Collision::Obstacle)
        } else if p != self.food.pos && self.snake.blocks_move_into(p) {
            Some(Collision::Body)
        } else {
            None
        }
    }

    fn redirect<R: Rng + ?Sized>(&self, cause: Collision, rng: &mut R) -> Option<(Direction, Pos, bool)> {
        let bounce = self.config.assist
            || (cause == Collision::Obstacle && self.config.obstacle_mode == ObstacleMode::Redirect);
        if !bounce {
            return None;
        }
        self.safe_moves().choose(rng).copied()
    }

    /// Non-reversing moves from the head that hit nothing this tick, with
    /// their landing cell and whether they wrapped.
    pub fn safe_moves(&self) -> Vec<(Direction, Pos, bool)> {
        let back = self.snake.heading.opposite();
        Direction::CARDINAL
            .into_iter()
            .filter(|&d| d != back)
            .filter_map(|d| {
                let mut p = self.snake.head.step(d, self.field.cell);
                let mut wrapped = false;
                if !self.field.contains(p) {
                    if !self.config.no_boundary {
                        return None;
                    }
                    p = self.field.wrap(p);
                    wrapped = true;
                }
                match self.collision_at(p) {
                    Some(_) => None,
                    None => Some((d, p, wrapped)),
                }
            })
            .collect()
    }

    fn advance(&mut self, heading: Direction, target: Pos, grow: bool) {
        let old_head = self.snake.head;
        self.snake.heading = heading;
        self.snake.head = target;
        self.snake.tail.push_back(old_head);
        if !grow {
            self.snake.tail.pop_front();
        }
    }
}
