//! Error types for the decode, load and move stages.
//!
//! Each stage has its own enum so callers can pick the right user-facing
//! message without inspecting error strings.

use thiserror::Error;

/// Transport-level failure: the fragment could not be turned into JSON.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no game payload in location fragment")]
    MissingFragment,
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The payload decoded but does not describe a playable board.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("payload has no `game_data` section")]
    MissingGameData,
    #[error("payload has no `players` section")]
    MissingPlayers,
    #[error("payload has an unexpected shape: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("grid size {0} is too small (need at least 2 dots per side)")]
    GridTooSmall(usize),
    #[error("grid size {0} is too large")]
    GridTooLarge(usize),
    #[error("expected {expected} line markers, got {actual}")]
    LineCount { expected: usize, actual: usize },
    #[error("expected {expected} box markers, got {actual}")]
    BoxCount { expected: usize, actual: usize },
    #[error("player order references unknown player `{0}`")]
    UnknownPlayer(String),
    #[error("player order lists `{0}` more than once")]
    DuplicatePlayer(String),
}

/// Why the page came up without a board.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Local rejection of a line selection. Nothing is sent to the host when one
/// of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("a move was already sent; waiting for the next board")]
    Locked,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("line {0} is not available")]
    LineUnavailable(usize),
    #[error("game has no room code")]
    MissingRoomCode,
    #[error("could not serialize move: {0}")]
    Encode(String),
}

/// Host bridge could not be reached.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no browser window")]
    NoWindow,
    #[error("host bridge `{0}` is not available")]
    Unavailable(&'static str),
}
