use crate::config::Config;
use crate::encoder::{StateKey, encode_game};
use crate::error::Result;
use crate::game::{Collision, Game, Outcome};
use crate::geometry::Action;
use crate::qtable::QTable;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub const FOOD_REWARD: f32 = 1.0;
pub const DEATH_REWARD: f32 = -100.0;
/// Bouncing off a redirect block is punished like a death.
pub const REDIRECT_REWARD: f32 = -100.0;
pub const CLOSER_REWARD: f32 = 0.1;
pub const AWAY_REWARD: f32 = -0.2;

/// Dense shaping reward for one tick. Anything that is not strictly closer
/// to the food than before is penalised.
pub fn reward(outcome: Outcome, previous_distance: i32, current_distance: i32) -> f32 {
    if outcome.ate() {
        FOOD_REWARD
    } else if outcome.is_terminal() {
        DEATH_REWARD
    } else if matches!(outcome, Outcome::Redirected { cause: Collision::Obstacle, .. }) {
        REDIRECT_REWARD
    } else if current_distance < previous_distance {
        CLOSER_REWARD
    } else {
        AWAY_REWARD
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub action: Action,
    pub outcome: Outcome,
    pub state: StateKey,
    pub reward: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub score: u32,
    pub ticks: u64,
    pub death: Option<Collision>,
}

/// Overrides applied when a session starts its next episode.
#[derive(Clone, Debug, Default)]
pub struct ResetOptions {
    pub learning_rate: Option<f32>,
    pub discount_factor: Option<f32>,
    pub assist: Option<bool>,
    pub no_boundary: Option<bool>,
    /// Throw the learned table away instead of carrying it over.
    pub new_table: bool,
}

/// One learner playing one game at a time. The Q-table outlives resets.
pub struct Session {
    config: Config,
    game: Game,
    table: QTable,
    rng: SmallRng,
    state: StateKey,
    last_distance: i32,
    ticks: u64,
}

impl Session {
    pub fn new(config: Config, seed: u64) -> Result<Self> {
        let table = QTable::from_config(&config.learning);
        Self::with_table(config, table, seed)
    }

    pub fn with_table(config: Config, table: QTable, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let game = Game::new(config.game.clone(), &mut rng)?;
        Ok(Self::from_game(config, game, table, rng))
    }

    /// Wraps an already built game, e.g. a hand-made board.
    pub fn from_game(config: Config, game: Game, table: QTable, rng: SmallRng) -> Self {
        let state = encode_game(&game);
        let last_distance = game.distance_to_food();
        Self { config, game, table, rng, state, last_distance, ticks: 0 }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn into_table(self) -> QTable {
        self.table
    }

    pub fn state(&self) -> StateKey {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_over(&self) -> bool {
        !self.game.is_running() || self.ticks >= self.config.learning.tick_limit
    }

    /// Choose, move, encode, reward, learn. `None` once the episode is over.
    pub fn step(&mut self) -> Option<StepReport> {
        if self.is_over() {
            return None;
        }
        let action = self.table.choose_action(
            self.state,
            self.game.snake.heading,
            !self.game.snake.is_empty(),
            self.config.learning.epsilon,
            &mut self.rng,
        );
        self.game.change_direction(action.direction());
        let outcome = self.game.tick(&mut self.rng);

        let prev = self.state;
        self.state = encode_game(&self.game);
        let distance = self.game.distance_to_food();
        let reward = reward(outcome, self.last_distance, distance);
        self.last_distance = distance;
        self.table.update(prev, self.state, action, reward);
        self.ticks += 1;

        Some(StepReport { action, outcome, state: self.state, reward })
    }

    /// Steps until the snake dies, the game stops or the tick limit is hit.
    pub fn play_episode(&mut self) -> EpisodeSummary {
        while !self.is_over() {
            self.step();
        }
        if self.game.is_running() {
            log::debug!("episode cut off after {} ticks at score {}", self.ticks, self.game.score);
        }
        EpisodeSummary { score: self.game.score, ticks: self.ticks, death: self.game.death() }
    }

    /// Fresh snake, food and score; the table is kept.
    pub fn reset(&mut self) -> Result<()> {
        self.reset_with(ResetOptions::default())
    }

    pub fn reset_with(&mut self, options: ResetOptions) -> Result<()> {
        if let Some(lr) = options.learning_rate {
            self.config.learning.learning_rate = lr;
        }
        if let Some(gamma) = options.discount_factor {
            self.config.learning.discount_factor = gamma;
        }
        if let Some(assist) = options.assist {
            self.config.game.assist = assist;
        }
        if let Some(no_boundary) = options.no_boundary {
            self.config.game.no_boundary = no_boundary;
        }
        self.config.validate()?;

        if options.new_table {
            self.table = QTable::from_config(&self.config.learning);
        } else {
            self.table.set_learning(self.config.learning.learning_rate);
            self.table.set_discount(self.config.learning.discount_factor);
        }
        self.game = Game::new(self.config.game.clone(), &mut self.rng)?;
        self.state = encode_game(&self.game);
        self.last_distance = self.game.distance_to_food();
        self.ticks = 0;
        Ok(())
    }
}
