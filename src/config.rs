//! Board configuration: host element ids, geometry and colours.
//!
//! The host page may pass a JSON object to `start_board_with_config`; any
//! field left out keeps its default.

use serde::Deserialize;

use crate::board::layout::DEFAULT_PADDING;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub svg_id: String,
    pub status_id: String,
    pub p1_score_id: String,
    pub p2_score_id: String,
    pub padding: f64,
    pub dot_radius: f64,
    pub box_opacity: f64,
    pub player_one_color: String,
    pub player_two_color: String,
    /// Used when the host theme has no text colour.
    pub dot_color: String,
    pub fallback_bg_color: String,
    pub fallback_text_color: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            svg_id: "game-board-svg".into(),
            status_id: "status-message".into(),
            p1_score_id: "p1-score".into(),
            p2_score_id: "p2-score".into(),
            padding: DEFAULT_PADDING,
            dot_radius: 2.0,
            box_opacity: 0.5,
            player_one_color: "#ff6b6b".into(),
            player_two_color: "#4dabf7".into(),
            dot_color: "#ccc".into(),
            fallback_bg_color: "#212121".into(),
            fallback_text_color: "#ffffff".into(),
        }
    }
}

impl BoardConfig {
    /// Parse host overrides. An empty string means "all defaults".
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

/// Resolved colours for one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub dot: String,
    pub player_one: String,
    pub player_two: String,
}

impl Palette {
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            dot: config.dot_color.clone(),
            player_one: config.player_one_color.clone(),
            player_two: config.player_two_color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let cfg = BoardConfig::from_json(r#"{"padding": 5, "player_one_color": "red"}"#).unwrap();
        assert_eq!(cfg.padding, 5.0);
        assert_eq!(cfg.player_one_color, "red");
        assert_eq!(cfg.player_two_color, BoardConfig::default().player_two_color);
        assert_eq!(cfg.svg_id, "game-board-svg");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(BoardConfig::from_json("  ").unwrap(), BoardConfig::default());
        assert!(BoardConfig::from_json("{oops").is_err());
    }
}
