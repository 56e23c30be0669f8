use thiserror::Error;

/// Why a player action was refused. A refused action never changes machine state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("reels are still spinning")]
    Spinning,
    #[error("game over, restart to keep playing")]
    GameOver,
    #[error("not enough credits: required {required}, available {available}")]
    InsufficientCredits { required: i64, available: i64 },
}

pub type GameResult<T> = Result<T, GameError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
