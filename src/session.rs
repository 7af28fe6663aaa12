//! One page load worth of interaction: a snapshot, the viewer, and the
//! host bridge. Handles line selection and the optimistic lock.

use serde::Serialize;

use crate::board::status::{StatusMessage, StatusView};
use crate::bridge::HostBridge;
use crate::error::{MoveError, StartupError};
use crate::fragment;
use crate::state::{GameState, PlayerId};

/// Decode the location fragment and build the snapshot for this page load.
/// On failure the error picks the status line (see `StatusMessage::from`).
pub fn load_board(hash: &str) -> Result<GameState, StartupError> {
    let payload = fragment::decode(hash)?;
    Ok(GameState::from_payload(&payload)?)
}

/// Action tag the bot dispatches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    ClaimLine,
}

/// Outbound move. Field names are part of the bot contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveIntent {
    pub action: MoveAction,
    pub index: usize,
    pub room_code: String,
}

impl MoveIntent {
    pub fn claim_line(index: usize, room_code: impl Into<String>) -> Self {
        Self {
            action: MoveAction::ClaimLine,
            index,
            room_code: room_code.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Interactive,
    /// A move was sent. Only a fresh payload (page reload) leaves this phase.
    Locked,
}

pub const NOT_YOUR_TURN_ALERT: &str = "It's not your turn!";
pub const MISSING_ROOM_ALERT: &str = "Error: missing room code.";

pub struct BoardSession<B: HostBridge> {
    state: GameState,
    viewer: Option<PlayerId>,
    bridge: B,
    phase: Phase,
}

impl<B: HostBridge> BoardSession<B> {
    pub fn new(state: GameState, bridge: B) -> Self {
        let viewer = bridge.current_user_id();
        Self {
            state,
            viewer,
            bridge,
            phase: Phase::Interactive,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn viewer(&self) -> Option<&PlayerId> {
        self.viewer.as_ref()
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.phase == Phase::Locked
    }

    pub fn status(&self) -> StatusView {
        let mut view = StatusView::derive(&self.state, self.viewer.as_ref());
        if self.is_locked() {
            view.message = StatusMessage::Sending;
        }
        view
    }

    /// Turn a click on line `index` into a move for the bot.
    ///
    /// The turn check here is only a courtesy; the bot re-validates turn
    /// ownership and line availability.
    pub fn handle_selection(&mut self, index: usize) -> Result<MoveIntent, MoveError> {
        if self.is_locked() {
            return Err(MoveError::Locked);
        }
        if !self.state.is_turn_of(self.viewer.as_ref()) {
            self.bridge.show_alert(NOT_YOUR_TURN_ALERT);
            return Err(MoveError::NotYourTurn);
        }
        if !self.state.is_line_available(index) {
            return Err(MoveError::LineUnavailable(index));
        }
        let Some(room_code) = self.state.room_code.as_ref() else {
            self.bridge.show_alert(MISSING_ROOM_ALERT);
            return Err(MoveError::MissingRoomCode);
        };

        let intent = MoveIntent::claim_line(index, room_code.as_str());
        let payload =
            serde_json::to_string(&intent).map_err(|e| MoveError::Encode(e.to_string()))?;
        self.bridge.send_data(&payload);
        self.phase = Phase::Locked;
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ThemeParams;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeBridge {
        user: Option<PlayerId>,
        sent: RefCell<Vec<String>>,
        alerts: RefCell<Vec<String>>,
    }

    impl HostBridge for FakeBridge {
        fn ready(&self) {}
        fn expand(&self) {}
        fn send_data(&self, data: &str) {
            self.sent.borrow_mut().push(data.to_string());
        }
        fn show_alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }
        fn current_user_id(&self) -> Option<PlayerId> {
            self.user.clone()
        }
        fn theme_params(&self) -> ThemeParams {
            ThemeParams::default()
        }
    }

    fn state(room: serde_json::Value) -> GameState {
        GameState::from_payload(&json!({
            "room_code": room,
            "game_data": {
                "grid_size": 2,
                "lines": [1, 0, 0, 0],
                "boxes": [0],
                "scores": {},
                "current_turn_id": 1
            },
            "players": {"1": {"name": "A"}, "2": {"name": "B"}}
        }))
        .unwrap()
    }

    fn session(user: i64, room: serde_json::Value) -> BoardSession<FakeBridge> {
        let bridge = FakeBridge {
            user: Some(PlayerId::from(user)),
            ..FakeBridge::default()
        };
        BoardSession::new(state(room), bridge)
    }

    #[test]
    fn test_load_board_outcomes() {
        let err = load_board("").unwrap_err();
        assert_eq!(StatusMessage::from(&err), StatusMessage::NoGameData);

        let err = load_board("#%%%").unwrap_err();
        assert_eq!(StatusMessage::from(&err), StatusMessage::InvalidGameData);

        let hash = format!("#{}", fragment::encode(&json!({"game_data": {}})));
        let err = load_board(&hash).unwrap_err();
        assert_eq!(StatusMessage::from(&err), StatusMessage::LoadFailed);

        let hash = format!("#{}", fragment::encode(&state(json!("ROOM")).to_payload()));
        assert_eq!(load_board(&hash).unwrap(), state(json!("ROOM")));
    }

    #[test]
    fn test_numeric_room_code_sent_as_string() {
        let mut s = session(1, json!(4242));
        s.handle_selection(2).unwrap();
        let v: serde_json::Value = serde_json::from_str(&s.bridge().sent.borrow()[0]).unwrap();
        assert_eq!(v["room_code"], json!("4242"));
    }

    #[test]
    fn test_move_intent_wire_format() {
        let intent = MoveIntent::claim_line(3, "ROOM");
        assert_eq!(
            serde_json::to_value(&intent).unwrap(),
            json!({"action": "claim_line", "index": 3, "room_code": "ROOM"})
        );
    }

    #[test]
    fn test_selection_sends_and_locks() {
        let mut s = session(1, json!("ROOM"));
        let intent = s.handle_selection(3).unwrap();
        assert_eq!(intent, MoveIntent::claim_line(3, "ROOM"));
        assert_eq!(s.phase(), Phase::Locked);
        assert_eq!(s.status().message, StatusMessage::Sending);
        let sent = s.bridge().sent.borrow();
        assert_eq!(sent.len(), 1);
        let v: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(v, json!({"action": "claim_line", "index": 3, "room_code": "ROOM"}));
    }

    #[test]
    fn test_second_selection_is_ignored() {
        let mut s = session(1, json!("ROOM"));
        s.handle_selection(2).unwrap();
        assert_eq!(s.handle_selection(3), Err(MoveError::Locked));
        assert_eq!(s.bridge().sent.borrow().len(), 1);
        assert!(s.bridge().alerts.borrow().is_empty());
    }

    #[test]
    fn test_out_of_turn_alerts_and_stays_interactive() {
        let mut s = session(2, json!("ROOM"));
        assert_eq!(s.handle_selection(3), Err(MoveError::NotYourTurn));
        assert!(s.bridge().sent.borrow().is_empty());
        assert_eq!(s.bridge().alerts.borrow().as_slice(), [NOT_YOUR_TURN_ALERT]);
        assert_eq!(s.phase(), Phase::Interactive);
        assert_eq!(s.status().message, StatusMessage::WaitingFor("A".into()));
    }

    #[test]
    fn test_unknown_viewer_cannot_move() {
        let mut s = BoardSession::new(state(json!("ROOM")), FakeBridge::default());
        assert_eq!(s.handle_selection(1), Err(MoveError::NotYourTurn));
        assert!(s.bridge().sent.borrow().is_empty());
    }

    #[test]
    fn test_claimed_line_rejected() {
        let mut s = session(1, json!("ROOM"));
        assert_eq!(s.handle_selection(0), Err(MoveError::LineUnavailable(0)));
        assert_eq!(s.handle_selection(4), Err(MoveError::LineUnavailable(4)));
        assert!(s.bridge().sent.borrow().is_empty());
        assert!(!s.is_locked());
    }

    #[test]
    fn test_missing_room_code_blocks_send() {
        let mut s = session(1, serde_json::Value::Null);
        assert_eq!(s.handle_selection(1), Err(MoveError::MissingRoomCode));
        assert!(s.bridge().sent.borrow().is_empty());
        assert_eq!(s.bridge().alerts.borrow().as_slice(), [MISSING_ROOM_ALERT]);
        assert!(!s.is_locked());
    }
}
