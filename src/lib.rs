//! Snake with a tabular Q-learning agent.
//!
//! The game core (`game`, `entity`, `geometry`, `obstacles`) knows nothing
//! about learning. `encoder` squeezes a board into a 12-bit key, `qtable`
//! learns over those keys, `session` ties one game to one table, and
//! `experiment` runs many sessions in parallel and hands the final scores
//! to `results`.

pub mod config;
pub mod encoder;
pub mod entity;
pub mod error;
pub mod experiment;
pub mod game;
pub mod geometry;
pub mod obstacles;
pub mod qtable;
pub mod results;
pub mod session;
pub mod view;

pub use config::{Config, GameConfig, LearningConfig, ObstacleMode};
pub use encoder::{StateKey, encode, encode_game};
pub use error::{Result, SnakeError};
pub use game::{Collision, Game, Outcome, Status};
pub use geometry::{Action, Direction, Playfield, Pos};
pub use qtable::QTable;
pub use results::{Summary, TrainingRecord};
pub use session::{EpisodeSummary, ResetOptions, Session};
