// ---------------------------------------------------------------------------
// Suggestion payload — construct the submission body for the external endpoint
// ---------------------------------------------------------------------------
//
// The endpoint is an external collaborator; transport is fire-and-forget and
// outside this crate. The obligation here ends at a correctly-shaped
// `{ type, suggestion, timestamp }` payload.
// ---------------------------------------------------------------------------

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionPayload {
	#[serde(rename = "type")]
	pub kind: String,
	pub suggestion: String,
	/// ISO 8601 / RFC 3339, UTC.
	pub timestamp: String,
}

/// Build a suggestion payload from an explicit `now`. Empty suggestion text
/// is rejected before anything reaches the network.
pub fn build_payload(
	kind: &str,
	suggestion: &str,
	now: DateTime<Utc>,
) -> Result<SuggestionPayload, CatalogError> {
	let trimmed = suggestion.trim();
	if trimmed.is_empty() {
		return Err(CatalogError::EmptyField("suggestion".into()));
	}
	let kind = kind.trim();
	if kind.is_empty() {
		return Err(CatalogError::EmptyField("type".into()));
	}
	Ok(SuggestionPayload {
		kind: kind.to_string(),
		suggestion: trimmed.to_string(),
		timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
	})
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn payload_has_wire_shape() {
		let now = Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).unwrap();
		let payload = build_payload("restaurant", "Try the new ramen place", now).unwrap();
		let json = serde_json::to_value(&payload).unwrap();

		assert_eq!(json["type"], "restaurant");
		assert_eq!(json["suggestion"], "Try the new ramen place");
		assert_eq!(json["timestamp"], "2024-05-17T12:30:00.000Z");
	}

	#[test]
	fn suggestion_text_is_trimmed() {
		let payload = build_payload("film", "  Heat  ", Utc::now()).unwrap();
		assert_eq!(payload.suggestion, "Heat");
	}

	#[test]
	fn empty_suggestion_is_rejected() {
		let err = build_payload("film", "   ", Utc::now()).unwrap_err();
		assert_eq!(err.code(), "CATALOG_EMPTY_FIELD");
	}

	#[test]
	fn empty_kind_is_rejected() {
		assert!(build_payload("", "something", Utc::now()).is_err());
	}

	#[test]
	fn payload_round_trips() {
		let payload = build_payload("book", "The Quiet American", Utc::now()).unwrap();
		let json = serde_json::to_string(&payload).unwrap();
		let parsed: SuggestionPayload = serde_json::from_str(&json).unwrap();
		assert_eq!(parsed, payload);
	}
}
