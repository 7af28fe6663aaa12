//! Game state snapshot received from the bot.
//!
//! Identifiers arrive as JSON numbers in some places and strings in others
//! (object keys are always strings). Everything is folded into [`PlayerId`]
//! here so the rest of the crate compares plain values.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::board::layout::{checked_box_count, checked_line_count};
use crate::error::LoadError;

// --- Identifiers ------------------------------------------------------------

/// Canonical player identifier (trimmed decimal or opaque string).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The zero sentinel the server uses for "nobody".
    fn is_unclaimed(&self) -> bool {
        self.0.is_empty() || self.0 == "0"
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for PlayerId {
    fn from(v: i64) -> Self {
        Self(v.to_string())
    }
}

impl From<&str> for PlayerId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Numeric ids go back out as numbers, matching what the bot sends.
        match self.0.parse::<i64>() {
            Ok(n) if n.to_string() == self.0 => serializer.serialize_i64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

struct IdVisitor;

impl Visitor<'_> for IdVisitor {
    type Value = PlayerId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an id (integer or string)")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PlayerId, E> {
        Ok(PlayerId::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PlayerId, E> {
        Ok(PlayerId(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PlayerId, E> {
        Ok(PlayerId::new(v))
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

/// Owner marker of a line or box: `None` when unclaimed.
pub type Owner = Option<PlayerId>;

#[derive(Deserialize)]
#[serde(transparent)]
struct OwnerMarker(Option<PlayerId>);

impl From<OwnerMarker> for Owner {
    fn from(marker: OwnerMarker) -> Self {
        marker.0.filter(|id| !id.is_unclaimed())
    }
}

fn deserialize_owners<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Owner>, D::Error> {
    let raw: Vec<OwnerMarker> = Vec::deserialize(d)?;
    Ok(raw.into_iter().map(Owner::from).collect())
}

fn serialize_owners<S: Serializer>(owners: &[Owner], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(owners.iter().map(|o| match o {
        Some(id) => serde_json::to_value(id).unwrap_or(Value::Null),
        None => Value::from(0),
    }))
}

/// Opaque session identifier correlating this board with the bot's game.
/// Accepted as a string or a number; always written back as a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = deserializer.deserialize_any(IdVisitor)?;
        Ok(RoomCode(id.0))
    }
}

// --- Players ----------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// Seat decides colour. Only two seats exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Seat {
    One,
    Two,
}

#[derive(Deserialize, Serialize)]
struct PlayerInfo {
    #[serde(default)]
    name: String,
}

/// Players object in document order. A `HashMap` would lose which key came first.
struct OrderedPlayers(Vec<Player>);

impl<'de> Deserialize<'de> for OrderedPlayers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlayersVisitor;

        impl<'de> Visitor<'de> for PlayersVisitor {
            type Value = OrderedPlayers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of player id to player info")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut players = Vec::with_capacity(map.size_hint().unwrap_or(2));
                while let Some((id, info)) = map.next_entry::<PlayerId, PlayerInfo>()? {
                    players.push(Player { id, name: info.name });
                }
                Ok(OrderedPlayers(players))
            }
        }

        deserializer.deserialize_map(PlayersVisitor)
    }
}

impl Serialize for OrderedPlayers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for p in &self.0 {
            map.serialize_entry(p.id.as_str(), &PlayerInfo { name: p.name.clone() })?;
        }
        map.end()
    }
}

// --- Wire shape -------------------------------------------------------------

#[derive(Deserialize, Serialize)]
struct WireGameData {
    #[serde(alias = "gridSize")]
    grid_size: usize,
    #[serde(deserialize_with = "deserialize_owners", serialize_with = "serialize_owners")]
    lines: Vec<Owner>,
    #[serde(deserialize_with = "deserialize_owners", serialize_with = "serialize_owners")]
    boxes: Vec<Owner>,
    #[serde(default)]
    scores: HashMap<PlayerId, u32>,
    #[serde(default, alias = "currentTurnId")]
    current_turn_id: Option<OwnerMarker>,
}

#[derive(Deserialize, Serialize)]
struct WireState {
    #[serde(default, alias = "roomCode", skip_serializing_if = "Option::is_none")]
    room_code: Option<RoomCode>,
    game_data: WireGameData,
    players: OrderedPlayers,
    #[serde(default, alias = "playerOrder", skip_serializing_if = "Option::is_none")]
    player_order: Option<Vec<PlayerId>>,
}

impl Serialize for OwnerMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(id) => id.serialize(serializer),
            None => serializer.serialize_i64(0),
        }
    }
}

// --- GameState --------------------------------------------------------------

/// One immutable board snapshot. Built once per page load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub room_code: Option<RoomCode>,
    pub grid_size: usize,
    pub lines: Vec<Owner>,
    pub boxes: Vec<Owner>,
    pub scores: HashMap<PlayerId, u32>,
    pub current_turn: Option<PlayerId>,
    /// Seat order: index 0 is player 1.
    pub players: Vec<Player>,
}

impl GameState {
    /// Validate a decoded payload and build the snapshot.
    pub fn from_payload(payload: &Value) -> Result<Self, LoadError> {
        if payload.get("game_data").is_none_or(Value::is_null) {
            return Err(LoadError::MissingGameData);
        }
        if payload.get("players").is_none_or(Value::is_null) {
            return Err(LoadError::MissingPlayers);
        }
        let wire: WireState = serde_json::from_value(payload.clone()).map_err(LoadError::Malformed)?;

        let n = wire.game_data.grid_size;
        if n < 2 {
            return Err(LoadError::GridTooSmall(n));
        }
        let (Some(expected_lines), Some(expected_boxes)) =
            (checked_line_count(n), checked_box_count(n))
        else {
            return Err(LoadError::GridTooLarge(n));
        };
        if wire.game_data.lines.len() != expected_lines {
            return Err(LoadError::LineCount {
                expected: expected_lines,
                actual: wire.game_data.lines.len(),
            });
        }
        if wire.game_data.boxes.len() != expected_boxes {
            return Err(LoadError::BoxCount {
                expected: expected_boxes,
                actual: wire.game_data.boxes.len(),
            });
        }

        let players = match wire.player_order {
            Some(order) => seat_players(wire.players.0, &order)?,
            None => wire.players.0,
        };

        Ok(Self {
            room_code: wire.room_code.filter(|rc| !rc.as_str().trim().is_empty()),
            grid_size: n,
            lines: wire.game_data.lines,
            boxes: wire.game_data.boxes,
            scores: wire.game_data.scores,
            current_turn: wire.game_data.current_turn_id.and_then(Owner::from),
            players,
        })
    }

    /// Wire representation, with the seat order written out explicitly.
    pub fn to_payload(&self) -> Value {
        let wire = WireState {
            room_code: self.room_code.clone(),
            game_data: WireGameData {
                grid_size: self.grid_size,
                lines: self.lines.clone(),
                boxes: self.boxes.clone(),
                scores: self.scores.clone(),
                current_turn_id: Some(OwnerMarker(self.current_turn.clone())),
            },
            players: OrderedPlayers(self.players.clone()),
            player_order: Some(self.players.iter().map(|p| p.id.clone()).collect()),
        };
        serde_json::to_value(wire).unwrap_or(Value::Null)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn score_of(&self, id: &PlayerId) -> u32 {
        self.scores.get(id).copied().unwrap_or(0)
    }

    /// Map an owner onto a seat. The first seated player is `Seat::One`; every
    /// other owner is `Seat::Two`, so this is only meaningful for two players.
    pub fn owner_seat(&self, owner: &Owner) -> Option<Seat> {
        let id = owner.as_ref()?;
        match self.players.first() {
            Some(first) if &first.id == id => Some(Seat::One),
            _ => Some(Seat::Two),
        }
    }

    pub fn is_line_available(&self, index: usize) -> bool {
        matches!(self.lines.get(index), Some(None))
    }

    pub fn is_turn_of(&self, viewer: Option<&PlayerId>) -> bool {
        matches!((self.current_turn.as_ref(), viewer), (Some(turn), Some(v)) if turn == v)
    }
}

/// Reorder players by an explicit seat list. Players missing from the list
/// keep their document order after the listed ones.
fn seat_players(mut players: Vec<Player>, order: &[PlayerId]) -> Result<Vec<Player>, LoadError> {
    let mut seated: Vec<Player> = Vec::with_capacity(players.len());
    for id in order {
        if seated.iter().any(|p| &p.id == id) {
            return Err(LoadError::DuplicatePlayer(id.to_string()));
        }
        let pos = players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| LoadError::UnknownPlayer(id.to_string()))?;
        seated.push(players.remove(pos));
    }
    seated.extend(players);
    Ok(seated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_3x3() -> Value {
        json!({
            "room_code": "ROOM1",
            "game_data": {
                "grid_size": 3,
                "lines": [0, 456, "0", 0, 0, 0, "123", 0, 0, 0, 0, null],
                "boxes": [0, 123, 0, 0],
                "scores": {"123": 1, "456": 0},
                "current_turn_id": 456
            },
            "players": {"456": {"name": "Bob"}, "123": {"name": "Ann"}}
        })
    }

    #[test]
    fn test_ids_are_normalized() {
        let a: PlayerId = serde_json::from_value(json!(123)).unwrap();
        let b: PlayerId = serde_json::from_value(json!("123")).unwrap();
        let c: PlayerId = serde_json::from_value(json!(" 123 ")).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(serde_json::to_value(&a).unwrap(), json!(123));
        assert_eq!(serde_json::to_value(PlayerId::new("abc")).unwrap(), json!("abc"));
    }

    #[test]
    fn test_owner_markers() {
        let state = GameState::from_payload(&payload_3x3()).unwrap();
        assert_eq!(state.lines.len(), 12);
        assert_eq!(state.lines[0], None);
        assert_eq!(state.lines[1], Some(PlayerId::new("456")));
        assert_eq!(state.lines[2], None);
        assert_eq!(state.lines[6], Some(PlayerId::new("123")));
        assert_eq!(state.lines[11], None);
        assert!(state.is_line_available(0));
        assert!(!state.is_line_available(1));
        assert!(!state.is_line_available(12));
    }

    #[test]
    fn test_document_order_decides_seats() {
        let state = GameState::from_payload(&payload_3x3()).unwrap();
        assert_eq!(state.players[0].name, "Bob");
        assert_eq!(state.players[1].name, "Ann");
        assert_eq!(state.owner_seat(&Some(PlayerId::new("456"))), Some(Seat::One));
        assert_eq!(state.owner_seat(&Some(PlayerId::new("123"))), Some(Seat::Two));
        assert_eq!(state.owner_seat(&None), None);
    }

    #[test]
    fn test_explicit_player_order_wins() {
        let mut payload = payload_3x3();
        payload["player_order"] = json!(["123", 456]);
        let state = GameState::from_payload(&payload).unwrap();
        assert_eq!(state.players[0].name, "Ann");
        assert_eq!(state.owner_seat(&Some(PlayerId::new("123"))), Some(Seat::One));

        payload["player_order"] = json!([999]);
        assert!(matches!(
            GameState::from_payload(&payload),
            Err(LoadError::UnknownPlayer(id)) if id == "999"
        ));
    }

    #[test]
    fn test_repeated_player_order_entry() {
        let mut payload = payload_3x3();
        payload["player_order"] = json!([123, "123"]);
        assert!(matches!(
            GameState::from_payload(&payload),
            Err(LoadError::DuplicatePlayer(id)) if id == "123"
        ));
    }

    #[test]
    fn test_missing_sections() {
        let mut payload = payload_3x3();
        payload.as_object_mut().unwrap().remove("players");
        assert!(matches!(GameState::from_payload(&payload), Err(LoadError::MissingPlayers)));

        let mut payload = payload_3x3();
        payload.as_object_mut().unwrap().remove("game_data");
        assert!(matches!(GameState::from_payload(&payload), Err(LoadError::MissingGameData)));

        assert!(matches!(
            GameState::from_payload(&json!([1, 2])),
            Err(LoadError::MissingGameData)
        ));
    }

    #[test]
    fn test_shape_validation() {
        let mut payload = payload_3x3();
        payload["game_data"]["lines"] = json!([0, 0]);
        assert!(matches!(
            GameState::from_payload(&payload),
            Err(LoadError::LineCount { expected: 12, actual: 2 })
        ));

        let mut payload = payload_3x3();
        payload["game_data"]["boxes"] = json!([0]);
        assert!(matches!(
            GameState::from_payload(&payload),
            Err(LoadError::BoxCount { expected: 4, actual: 1 })
        ));

        let mut payload = payload_3x3();
        payload["game_data"]["grid_size"] = json!(1);
        assert!(matches!(GameState::from_payload(&payload), Err(LoadError::GridTooSmall(1))));

        let mut payload = payload_3x3();
        payload["game_data"]["grid_size"] = json!(u64::from(u32::MAX) + 1);
        payload["game_data"]["lines"] = json!([]);
        if usize::BITS > 32 {
            assert!(matches!(
                GameState::from_payload(&payload),
                Err(LoadError::GridTooLarge(n)) if n as u64 == 1 << 32
            ));
        } else {
            assert!(matches!(GameState::from_payload(&payload), Err(LoadError::Malformed(_))));
        }

        let mut payload = payload_3x3();
        payload["game_data"]["lines"] = json!("nope");
        assert!(matches!(GameState::from_payload(&payload), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn test_camel_case_aliases() {
        let payload = json!({
            "roomCode": "R",
            "game_data": {
                "gridSize": 2,
                "lines": [0, 0, 0, 0],
                "boxes": [0],
                "currentTurnId": "7"
            },
            "players": {"7": {"name": "Sam"}, "8": {"name": "Kit"}}
        });
        let state = GameState::from_payload(&payload).unwrap();
        assert_eq!(state.room_code, Some(RoomCode::new("R")));
        assert_eq!(state.current_turn, Some(PlayerId::new("7")));
        assert_eq!(state.score_of(&PlayerId::new("7")), 0);
    }

    #[test]
    fn test_blank_room_code_is_absent() {
        let mut payload = payload_3x3();
        payload["room_code"] = json!("  ");
        let state = GameState::from_payload(&payload).unwrap();
        assert_eq!(state.room_code, None);
    }

    #[test]
    fn test_numeric_room_code() {
        let mut payload = payload_3x3();
        payload["room_code"] = json!(4242);
        let state = GameState::from_payload(&payload).unwrap();
        assert_eq!(state.room_code, Some(RoomCode::new("4242")));
        assert_eq!(state.to_payload()["room_code"], json!("4242"));
    }

    #[test]
    fn test_payload_round_trip() {
        let state = GameState::from_payload(&payload_3x3()).unwrap();
        let again = GameState::from_payload(&state.to_payload()).unwrap();
        assert_eq!(state, again);
    }
}
