use crate::config::LearningConfig;
use crate::encoder::StateKey;
use crate::error::Result;
use crate::geometry::{Action, Direction};
use ahash::AHashMap;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Action values indexed by `Action::index`.
pub type Row = [f32; 4];

#[derive(Clone, Debug)]
pub struct QTable {
    rows: AHashMap<StateKey, Row>,
    pub learning_rate: f32,
    pub discount_factor: f32,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    learning_rate: f32,
    discount_factor: f32,
    rows: Vec<(StateKey, Row)>,
}

fn row_max(row: &Row) -> f32 {
    row.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

impl QTable {
    pub fn new(learning_rate: f32, discount_factor: f32) -> Self {
        Self { rows: AHashMap::new(), learning_rate, discount_factor }
    }

    pub fn from_config(cfg: &LearningConfig) -> Self {
        Self::new(cfg.learning_rate, cfg.discount_factor)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `state`, inserting zeros the first time it is seen.
    pub fn get_or_create(&mut self, state: StateKey) -> &mut Row {
        self.rows.entry(state).or_insert([0.0; 4])
    }

    pub fn row(&self, state: StateKey) -> Option<&Row> {
        self.rows.get(&state)
    }

    pub fn value(&self, state: StateKey, action: Action) -> f32 {
        self.rows.get(&state).map_or(0.0, |r| r[action.index()])
    }

    pub fn set_learning(&mut self, learning_rate: f32) {
        self.learning_rate = learning_rate;
    }

    pub fn set_discount(&mut self, discount_factor: f32) {
        self.discount_factor = discount_factor;
    }

    /// Epsilon-greedy pick. Exploration turns left or right of `heading`
    /// (any action when there is no heading yet); exploitation takes the best
    /// value, ties broken at random. The reversal of `heading` is never
    /// returned while the snake has a body.
    pub fn choose_action<R: Rng + ?Sized>(
        &mut self,
        state: StateKey,
        heading: Direction,
        has_body: bool,
        epsilon: f32,
        rng: &mut R,
    ) -> Action {
        let back = heading.opposite();

        if rng.r#gen::<f32>() < epsilon {
            let turns: Vec<Action> = Action::ALL
                .into_iter()
                .filter(|a| heading.is_none() || (a.direction() != heading && a.direction() != back))
                .collect();
            if let Some(&a) = turns.choose(rng) {
                return a;
            }
        }

        let row = *self.get_or_create(state);
        let allowed: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|a| !(has_body && !heading.is_none() && a.direction() == back))
            .collect();
        let best = allowed.iter().map(|a| row[a.index()]).fold(f32::NEG_INFINITY, f32::max);
        let ties: Vec<Action> = allowed.into_iter().filter(|a| row[a.index()] == best).collect();
        *ties.choose(rng).unwrap_or(&Action::ALL[0])
    }

    /// One-step Q-learning:
    /// `Q[prev][a] += lr * (reward + gamma * max(Q[next]) - Q[prev][a])`.
    pub fn update(&mut self, prev: StateKey, next: StateKey, action: Action, reward: f32) {
        let next_max = row_max(self.get_or_create(next));
        let (lr, gamma) = (self.learning_rate, self.discount_factor);
        let q = &mut self.get_or_create(prev)[action.index()];
        *q += lr * (reward + gamma * next_max - *q);
    }

    /// Rows sorted by key.
    pub fn snapshot(&self) -> Vec<(StateKey, Row)> {
        let mut rows: Vec<(StateKey, Row)> = self.rows.iter().map(|(k, v)| (*k, *v)).collect();
        rows.sort_by_key(|(k, _)| *k);
        rows
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = Snapshot {
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
            rows: self.snapshot(),
        };
        let bytes = bincode::serde::encode_to_vec(&snapshot, bincode::config::standard())?;
        fs::write(path, bytes)?;
        log::info!("saved q-table with {} states to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let (snapshot, _): (Snapshot, usize) = bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
        let mut table = Self::new(snapshot.learning_rate, snapshot.discount_factor);
        table.rows.extend(snapshot.rows);
        log::info!("loaded q-table with {} states from {}", table.len(), path.display());
        Ok(table)
    }
}
