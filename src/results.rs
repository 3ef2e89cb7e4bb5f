//! Results file shared by training runs and whatever analyses them.
//!
//! ```text
//! Count = 2
//! Training: 1
//! [ ...records... ]
//! Training: 2
//! [ ...records... ]
//! ```
//!
//! Every append bumps the `Count` header and adds one `Training: k` block.
//! Record arrays are pretty printed so the closing `]` sits on its own line.

use crate::error::{Result, SnakeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const COUNT_KEY: &str = "Count";
const SESSION_PREFIX: &str = "Training: ";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub trials: u32,
    pub replications: u32,
    /// Stored as one space separated string.
    #[serde(with = "score_list")]
    pub final_scores: Vec<u32>,
}

pub fn parse_scores(s: &str) -> Result<Vec<u32>> {
    s.split_whitespace()
        .map(|tok| tok.parse::<u32>().map_err(|_| SnakeError::MalformedScores(s.to_string())))
        .collect()
}

mod score_list {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(scores: &[u32], serializer: S) -> Result<S::Ok, S::Error> {
        let joined = scores.iter().map(u32::to_string).collect::<Vec<_>>().join(" ");
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u32>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_scores(&s).map_err(D::Error::custom)
    }
}

fn parse_count(line: &str) -> Result<u64> {
    line.split_once('=')
        .filter(|(key, _)| key.trim() == COUNT_KEY)
        .and_then(|(_, value)| value.trim().parse().ok())
        .ok_or(SnakeError::MissingCountHeader)
}

/// Appends `records` as a new training session and returns its number.
pub fn append_session(path: &Path, records: &[TrainingRecord]) -> Result<u64> {
    let existing = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let (count, body) = if existing.trim().is_empty() {
        (0, "")
    } else {
        let (header, rest) = existing.split_once('\n').unwrap_or((existing.as_str(), ""));
        (parse_count(header)?, rest)
    };

    let session = count + 1;
    let mut out = format!("{COUNT_KEY} = {session}\n");
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(SESSION_PREFIX);
    out.push_str(&session.to_string());
    out.push('\n');
    out.push_str(&serde_json::to_string_pretty(records)?);
    out.push('\n');

    fs::write(path, out)?;
    log::info!("wrote training session {} ({} records) to {}", session, records.len(), path.display());
    Ok(session)
}

/// Reads one session's records; the latest one when `session` is `None`.
pub fn read_session(path: &Path, session: Option<u64>) -> Result<(u64, Vec<TrainingRecord>)> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();
    let count = parse_count(lines.next().ok_or(SnakeError::MissingCountHeader)?)?;
    let wanted = session.filter(|&s| s != 0).unwrap_or(count);

    let marker = format!("{SESSION_PREFIX}{wanted}");
    let rest: Vec<&str> = lines.collect();
    let start = rest
        .iter()
        .rposition(|l| l.trim() == marker)
        .map(|i| i + 1)
        .ok_or(SnakeError::SessionNotFound(wanted))?;
    let end = rest[start..]
        .iter()
        .position(|l| matches!(l.trim(), "]" | "[]"))
        .map(|i| start + i + 1)
        .ok_or(SnakeError::SessionNotFound(wanted))?;

    let records = serde_json::from_str(&rest[start..end].join("\n"))?;
    Ok((wanted, records))
}

/// Descriptive statistics over one record's final scores.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    /// Sample variance (n - 1 in the denominator).
    pub variance: f64,
}

impl Summary {
    pub fn of(scores: &[u32]) -> Option<Self> {
        let min = *scores.iter().min()?;
        let max = *scores.iter().max()?;
        let n = scores.len() as f64;
        let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = if scores.len() > 1 {
            scores.iter().map(|&s| (s as f64 - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        Some(Self { count: scores.len(), min, max, mean, variance })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nobs={} minmax=({}, {}) mean={:.4} variance={:.4}",
            self.count, self.min, self.max, self.mean, self.variance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(trials: u32, scores: &[u32]) -> TrainingRecord {
        TrainingRecord { trials, replications: scores.len() as u32, final_scores: scores.to_vec() }
    }

    #[test]
    fn record_json_uses_space_separated_scores() {
        let json = serde_json::to_string(&record(10, &[3, 12, 0])).unwrap();
        assert_eq!(json, r#"{"trials":10,"replications":3,"final_scores":"3 12 0"}"#);
        let back: TrainingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.final_scores, [3, 12, 0]);
    }

    #[test]
    fn bad_scores_are_rejected() {
        assert!(parse_scores("1 2 x").is_err());
        assert_eq!(parse_scores("").unwrap(), Vec::<u32>::new());
        let err = serde_json::from_str::<TrainingRecord>(r#"{"trials":1,"replications":1,"final_scores":"-4"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn appending_bumps_count_and_adds_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train_file.txt");

        assert_eq!(append_session(&path, &[record(10, &[1, 2])]).unwrap(), 1);
        assert_eq!(append_session(&path, &[record(20, &[4, 5]), record(30, &[7])]).unwrap(), 2);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Count = 2\nTraining: 1\n["));
        assert_eq!(text.matches("Training: ").count(), 2);

        let (n, latest) = read_session(&path, None).unwrap();
        assert_eq!(n, 2);
        assert_eq!(latest, [record(20, &[4, 5]), record(30, &[7])]);

        let (_, first) = read_session(&path, Some(1)).unwrap();
        assert_eq!(first, [record(10, &[1, 2])]);

        assert!(matches!(read_session(&path, Some(9)), Err(SnakeError::SessionNotFound(9))));
    }

    #[test]
    fn empty_session_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        append_session(&path, &[]).unwrap();
        assert_eq!(read_session(&path, None).unwrap(), (1, vec![]));
    }

    #[test]
    fn missing_header_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.txt");
        fs::write(&path, "Training: 1\n[]\n").unwrap();
        assert!(matches!(append_session(&path, &[]), Err(SnakeError::MissingCountHeader)));
        assert!(matches!(read_session(&path, None), Err(SnakeError::MissingCountHeader)));
    }

    #[test]
    fn summary_statistics() {
        let s = Summary::of(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_eq!((s.count, s.min, s.max), (8, 2, 9));
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.variance - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(Summary::of(&[3]).unwrap().variance, 0.0);
        assert!(Summary::of(&[]).is_none());
    }
}
