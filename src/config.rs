use crate::error::{Result, SnakeError};
use crate::geometry::Playfield;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the snake reacts to running into an obstacle block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleMode {
    /// Acts like a wall, except that it never wraps.
    Solid,
    /// Always bounces the snake to a safe direction, assist or not.
    #[default]
    Redirect,
}

/// Board and movement rules. Fixed for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cell_size: i32,
    pub columns: i32,
    pub rows: i32,
    /// Pixel x of the left edge of the playfield.
    pub left_boundary: i32,
    pub no_boundary: bool,
    pub assist: bool,
    pub obstacles: usize,
    pub obstacle_mode: ObstacleMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 40,
            columns: 20,
            rows: 15,
            left_boundary: 0,
            no_boundary: false,
            assist: false,
            obstacles: 0,
            obstacle_mode: ObstacleMode::Redirect,
        }
    }
}

impl GameConfig {
    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.cell_size, self.left_boundary, self.columns, self.rows)
    }

    pub fn right_boundary(&self) -> i32 {
        self.left_boundary + self.columns * self.cell_size
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size <= 0 {
            return Err(SnakeError::InvalidConfig(format!("cell_size must be positive, got {}", self.cell_size)));
        }
        if self.columns < 3 || self.rows < 3 {
            return Err(SnakeError::InvalidConfig(format!(
                "board must be at least 3x3 cells, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.left_boundary % self.cell_size != 0 {
            return Err(SnakeError::InvalidConfig(format!(
                "left_boundary {} is not a multiple of cell_size {}",
                self.left_boundary, self.cell_size
            )));
        }
        // start cell and its four neighbours are kept clear
        let free = (self.columns * self.rows) as usize;
        if self.obstacles + 5 >= free {
            return Err(SnakeError::InvalidConfig(format!(
                "{} obstacles do not fit on a {}x{} board",
                self.obstacles, self.columns, self.rows
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub learning_rate: f32,
    pub discount_factor: f32,
    /// Probability of taking an exploratory turn instead of the greedy action.
    pub epsilon: f32,
    /// Ticks after which an episode that is still running is cut off.
    pub tick_limit: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self { learning_rate: 0.1, discount_factor: 0.9, epsilon: 0.1, tick_limit: 10_000 }
    }
}

impl LearningConfig {
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f32| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(SnakeError::InvalidConfig(format!("{name} must lie in [0, 1], got {v}")))
            }
        };
        unit("learning_rate", self.learning_rate)?;
        unit("discount_factor", self.discount_factor)?;
        unit("epsilon", self.epsilon)?;
        if self.tick_limit == 0 {
            return Err(SnakeError::InvalidConfig("tick_limit must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub learning: LearningConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.learning.validate()
    }
}
