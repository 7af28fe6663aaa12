//! Location fragment transport: URL-safe Base64 wrapped JSON.
//!
//! The bot opens the mini app with `#<payload>` where payload is the game
//! state as JSON, Base64 encoded with the URL-safe alphabet and usually
//! without padding. The host may append its own `tgWebApp*` launch parameters
//! to the same fragment, separated by `&`.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use serde_json::Value;

use crate::error::DecodeError;

/// Prefix of launch parameters the host injects into the fragment.
const HOST_PARAM_PREFIX: &str = "tgWebApp";

/// Pick the game payload segment out of a raw `location.hash` value.
pub fn payload_segment(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
    body.split('&')
        .map(str::trim)
        .find(|seg| !seg.is_empty() && !seg.starts_with(HOST_PARAM_PREFIX))
}

/// Decode a raw fragment into a JSON document.
pub fn decode(raw: &str) -> Result<Value, DecodeError> {
    let segment = payload_segment(raw).ok_or(DecodeError::MissingFragment)?;
    let bytes = STANDARD.decode(to_standard_alphabet(segment))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Encode a JSON document the way the bot does when building a launch link.
pub fn encode(payload: &Value) -> String {
    // Value serialization to a Vec cannot fail: all map keys are strings.
    let json = serde_json::to_vec(payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// URL-safe alphabet to standard alphabet, with padding restored.
fn to_standard_alphabet(segment: &str) -> String {
    let mut out: String = segment
        .replace("%3D", "=")
        .replace("%3d", "=")
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let unpadded = out.trim_end_matches('=').len();
    out.truncate(unpadded);
    while out.len() % 4 != 0 {
        out.push('=');
    }
    out
}
