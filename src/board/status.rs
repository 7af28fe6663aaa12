//! Status line and score labels derived from a snapshot.

use std::fmt;

use crate::error::{DecodeError, StartupError};
use crate::state::{GameState, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    YourTurn,
    WaitingFor(String),
    InvalidTurn,
    UnsupportedPlayers(usize),
    Sending,
    NoGameData,
    InvalidGameData,
    LoadFailed,
}

impl From<&StartupError> for StatusMessage {
    fn from(err: &StartupError) -> Self {
        match err {
            StartupError::Decode(DecodeError::MissingFragment) => StatusMessage::NoGameData,
            StartupError::Decode(_) => StatusMessage::InvalidGameData,
            StartupError::Load(_) => StatusMessage::LoadFailed,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::YourTurn => f.write_str("Your Turn!"),
            StatusMessage::WaitingFor(name) => write!(f, "Waiting for {name}..."),
            StatusMessage::InvalidTurn => f.write_str("Error: invalid turn data"),
            StatusMessage::UnsupportedPlayers(n) => write!(f, "Unsupported number of players ({n})"),
            StatusMessage::Sending => f.write_str("Sending move..."),
            StatusMessage::NoGameData => f.write_str("No game data found."),
            StatusMessage::InvalidGameData => f.write_str("Invalid game data."),
            StatusMessage::LoadFailed => f.write_str("Could not load game data."),
        }
    }
}

/// Everything the text elements around the board show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusView {
    /// `"<name>: <score>"` per seat; only set for two-player games.
    pub scores: Option<[String; 2]>,
    pub message: StatusMessage,
}

impl StatusView {
    pub fn derive(state: &GameState, viewer: Option<&PlayerId>) -> Self {
        if state.players.len() != 2 {
            return Self {
                scores: None,
                message: StatusMessage::UnsupportedPlayers(state.players.len()),
            };
        }
        let label = |i: usize| {
            let p = &state.players[i];
            format!("{}: {}", p.name, state.score_of(&p.id))
        };
        let message = match state.current_turn.as_ref() {
            Some(turn) if Some(turn) == viewer => StatusMessage::YourTurn,
            Some(turn) => match state.player(turn) {
                Some(p) => StatusMessage::WaitingFor(p.name.clone()),
                None => StatusMessage::InvalidTurn,
            },
            None => StatusMessage::InvalidTurn,
        };
        Self {
            scores: Some([label(0), label(1)]),
            message,
        }
    }

    /// Status for a load that never produced a board.
    pub fn failed(message: StatusMessage) -> Self {
        Self {
            scores: None,
            message,
        }
    }
}
