use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnakeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not place obstacle {placed} of {requested} without sealing off part of the board")]
    ObstaclePlacement { placed: usize, requested: usize },

    #[error("results file is missing its `Count = N` header")]
    MissingCountHeader,

    #[error("training session {0} not found in results file")]
    SessionNotFound(u64),

    #[error("malformed score list: {0:?}")]
    MalformedScores(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("q-table encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("q-table decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

pub type Result<T> = std::result::Result<T, SnakeError>;
