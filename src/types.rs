use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Field values and records
// ---------------------------------------------------------------------------

/// A single field of a catalog record. Records are flat: scalars or small
/// string arrays, nothing nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	Flag(bool),
	Number(f64),
	Text(String),
	List(Vec<String>),
}

impl FieldValue {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_flag(&self) -> Option<bool> {
		match self {
			Self::Flag(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[String]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}
}

/// A flat, immutable catalog record. Loaded once, never mutated; every query
/// produces a derived view instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
	#[serde(flatten)]
	pub fields: HashMap<String, FieldValue>,
}

impl Record {
	pub fn new(fields: HashMap<String, FieldValue>) -> Self {
		Self { fields }
	}

	pub fn get(&self, field: &str) -> Option<&FieldValue> {
		self.fields.get(field)
	}

	pub fn text(&self, field: &str) -> Option<&str> {
		self.fields.get(field).and_then(FieldValue::as_text)
	}

	pub fn number(&self, field: &str) -> Option<f64> {
		self.fields.get(field).and_then(FieldValue::as_number)
	}

	pub fn flag(&self, field: &str) -> Option<bool> {
		self.fields.get(field).and_then(FieldValue::as_flag)
	}

	pub fn list(&self, field: &str) -> Option<&[String]> {
		self.fields.get(field).and_then(FieldValue::as_list)
	}
}

/// A named, ordered sequence of records of one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
	pub name: String,
	pub records: Vec<Record>,
}

/// A loaded catalog document: one or more named collections plus an optional
/// facet sidecar enumerating valid filter values.
#[derive(Debug, Clone, Default)]
pub struct CatalogDocument {
	/// Collections in document encounter order.
	pub collections: Vec<Collection>,
	/// Valid facet values from a `filters` / `categories` sidecar array.
	pub facets: Vec<String>,
}

impl CatalogDocument {
	pub fn collection(&self, name: &str) -> Option<&Collection> {
		self.collections.iter().find(|c| c.name == name)
	}
}

// ---------------------------------------------------------------------------
// Preference records — tasks
// ---------------------------------------------------------------------------

/// Lifecycle state of a task. Only `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
	Pending,
	InProgress,
	Done,
}

impl TaskStatus {
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Done)
	}
}

impl std::fmt::Display for TaskStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Pending => write!(f, "pending"),
			Self::InProgress => write!(f, "in_progress"),
			Self::Done => write!(f, "done"),
		}
	}
}

impl std::str::FromStr for TaskStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(Self::Pending),
			"in_progress" => Ok(Self::InProgress),
			"done" | "completed" => Ok(Self::Done),
			other => Err(format!("Unknown task status: {}", other)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
	Low,
	Medium,
	High,
}

impl std::fmt::Display for TaskPriority {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Low => write!(f, "low"),
			Self::Medium => write!(f, "medium"),
			Self::High => write!(f, "high"),
		}
	}
}

impl std::str::FromStr for TaskPriority {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"low" => Ok(Self::Low),
			"medium" => Ok(Self::Medium),
			"high" => Ok(Self::High),
			other => Err(format!("Unknown task priority: {}", other)),
		}
	}
}

/// A user-authored task, persisted in the preference store. Created on
/// explicit submit; mutated only by explicit status change or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
	pub id: Uuid,
	pub title: String,
	pub priority: TaskPriority,
	pub category: String,
	pub status: TaskStatus,
	#[serde(rename = "createdAt")]
	pub created_at: DateTime<Utc>,
	#[serde(rename = "updatedAt")]
	pub updated_at: Option<DateTime<Utc>>,
}

/// A user-authored note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
	pub id: Uuid,
	pub text: String,
	#[serde(rename = "createdAt")]
	pub created_at: DateTime<Utc>,
}

/// The persisted "song of the day" pick. Keyed by calendar date so repeated
/// reads within one day return the same pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongPick {
	pub date: NaiveDate,
	pub identity: String,
	pub title: String,
	pub artist: String,
}

// ---------------------------------------------------------------------------
// Spotlight (song of the day) inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
	pub title: String,
	pub artist: String,
	#[serde(default)]
	pub highlighted: bool,
}

/// A named sub-collection of tracks. `high_rotation` marks playlists whose
/// tracks qualify for the shortlist on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
	pub name: String,
	#[serde(rename = "highRotation", default)]
	pub high_rotation: bool,
	pub tracks: Vec<PlaylistTrack>,
}

/// One logical track after merging duplicates across playlists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightEntry {
	pub identity: String,
	pub title: String,
	pub artist: String,
	/// OR of the highlight flags across every occurrence.
	pub highlighted: bool,
	/// Number of playlists this track appears in.
	#[serde(rename = "playlistCount")]
	pub playlist_count: usize,
	/// Names of the playlists it came from, in encounter order.
	pub playlists: Vec<String>,
	/// Whether any source playlist was marked high-rotation.
	#[serde(rename = "highRotation")]
	pub high_rotation: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
