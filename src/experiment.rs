use crate::config::Config;
use crate::error::Result;
use crate::results::TrainingRecord;
use crate::session::Session;
use rayon::prelude::*;

/// Seed for one replication; distinct per (trials, replication) pair.
pub fn replication_seed(base: u64, trials: u32, replication: u32) -> u64 {
    base.wrapping_add((trials as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(replication as u64)
}

/// Each replication trains a fresh table for `trials` episodes, then plays
/// one more episode whose score is recorded.
pub fn run_experiment(config: &Config, replications: u32, trials: u32, seed: u64) -> Result<Vec<u32>> {
    let mut final_scores = Vec::with_capacity(replications as usize);
    for replication in 0..replications {
        let mut session = Session::new(config.clone(), replication_seed(seed, trials, replication))?;
        for _ in 0..trials {
            session.play_episode();
            session.reset()?;
        }
        let last = session.play_episode();
        log::debug!(
            "trials={} replication={} final score {} after {} ticks",
            trials,
            replication,
            last.score,
            last.ticks
        );
        final_scores.push(last.score);
    }
    Ok(final_scores)
}

/// Runs one experiment per trial count in parallel. Records come back in
/// the order of `trial_set`.
pub fn train(config: &Config, replications: u32, trial_set: &[u32], seed: u64) -> Result<Vec<TrainingRecord>> {
    config.validate()?;
    log::info!(
        "training {} trial counts x {} replications on {} threads",
        trial_set.len(),
        replications,
        rayon::current_num_threads()
    );

    trial_set
        .par_iter()
        .map(|&trials| -> Result<TrainingRecord> {
            let final_scores = run_experiment(config, replications, trials, seed)?;
            log::info!("finished trials={trials} ({replications} replications)");
            Ok(TrainingRecord { trials, replications, final_scores })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> Config {
        let mut config = Config::default();
        config.learning.tick_limit = 300;
        config
    }

    #[test]
    fn seeds_differ_per_replication_and_trials() {
        assert_ne!(replication_seed(1, 10, 0), replication_seed(1, 10, 1));
        assert_ne!(replication_seed(1, 10, 0), replication_seed(1, 20, 0));
        assert_eq!(replication_seed(7, 3, 2), replication_seed(7, 3, 2));
    }

    #[test]
    fn one_score_per_replication() {
        let scores = run_experiment(&quick_config(), 3, 2, 42).unwrap();
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn records_follow_trial_order_and_are_reproducible() {
        let config = quick_config();
        let a = train(&config, 2, &[3, 1, 2], 9).unwrap();
        let b = train(&config, 2, &[3, 1, 2], 9).unwrap();
        assert_eq!(a.iter().map(|r| r.trials).collect::<Vec<_>>(), [3, 1, 2]);
        assert!(a.iter().all(|r| r.replications == 2 && r.final_scores.len() == 2));
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = quick_config();
        config.learning.epsilon = 2.0;
        assert!(train(&config, 1, &[1], 0).is_err());
    }
}
