// ---------------------------------------------------------------------------
// CatalogEngine — central state manager
// ---------------------------------------------------------------------------
//
// Integrates the sub-modules (record_store, filter, group, score, spotlight,
// derived, prefs, journal) into a single stateful struct: load the static
// catalog once, then serve filtered, grouped, and scored snapshots overlaid
// with session preference state.
// ---------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::CatalogError;
use crate::filter::{self, FilterState};
use crate::group::{self, Grouped};
use crate::journal::Journal;
use crate::prefs::{FileBackend, MemoryBackend, PreferenceStore, StorageBackend};
use crate::record_store;
use crate::spotlight::{self, SpotlightWeights};
use crate::suggestion::{self, SuggestionPayload};
use crate::types::{CatalogDocument, Collection, FieldValue, Playlist, Record, SongPick};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub struct EngineConfig {
	/// Snapshot file for the preference store. `None` keeps preferences
	/// in memory for the session.
	pub prefs_path: Option<PathBuf>,
	pub overdue_threshold: Duration,
	pub spotlight_weights: SpotlightWeights,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			prefs_path: None,
			overdue_threshold: crate::derived::overdue_threshold(),
			spotlight_weights: SpotlightWeights::default(),
		}
	}
}

// ---------------------------------------------------------------------------
// Macro for ensuring the catalog is loaded
// ---------------------------------------------------------------------------

macro_rules! ensure_loaded {
	($self:expr) => {
		if !$self.loaded {
			return Err(CatalogError::NotLoaded);
		}
	};
}

// ---------------------------------------------------------------------------
// CatalogEngine
// ---------------------------------------------------------------------------

pub struct CatalogEngine {
	config: EngineConfig,
	document: CatalogDocument,
	journal: Journal,
	loaded: bool,
}

impl CatalogEngine {
	/// Create an engine with empty state. Not yet loaded.
	pub fn new(config: EngineConfig) -> Self {
		let backend: Box<dyn StorageBackend> = match &config.prefs_path {
			Some(path) => match FileBackend::open(path) {
				Ok(backend) => Box::new(backend),
				Err(e) => {
					// Preference storage failures are recovered locally:
					// fall back to an ephemeral session store.
					tracing::warn!("Preference snapshot unavailable: {}", e);
					Box::new(MemoryBackend::new())
				}
			},
			None => Box::new(MemoryBackend::new()),
		};
		let store = PreferenceStore::new(backend);
		let journal = Journal::with_overdue_threshold(store, config.overdue_threshold);

		Self {
			config,
			document: CatalogDocument::default(),
			journal,
			loaded: false,
		}
	}

	/// Load the static catalog document and hydrate the preference store.
	/// A malformed document is fatal: the caller must not render from a
	/// partial catalog.
	pub fn initialize(&mut self, catalog_path: &Path) -> Result<(), CatalogError> {
		self.document = record_store::load_document(catalog_path)?;
		self.journal.store_mut().hydrate();
		self.loaded = true;
		Ok(())
	}

	/// Load from an in-memory JSON document instead of a file.
	pub fn initialize_from_str(&mut self, json: &str) -> Result<(), CatalogError> {
		self.document = record_store::parse_document(json)?;
		self.journal.store_mut().hydrate();
		self.loaded = true;
		Ok(())
	}

	// -- Catalog access --------------------------------------------------------

	pub fn collection(&self, name: &str) -> Result<&Collection, CatalogError> {
		ensure_loaded!(self);
		self.document
			.collection(name)
			.ok_or_else(|| CatalogError::CollectionNotFound(name.to_string()))
	}

	/// Collection names in document order.
	pub fn collection_names(&self) -> Result<Vec<&str>, CatalogError> {
		ensure_loaded!(self);
		Ok(self
			.document
			.collections
			.iter()
			.map(|c| c.name.as_str())
			.collect())
	}

	/// Valid facet values from the document sidecar.
	pub fn facets(&self) -> Result<&[String], CatalogError> {
		ensure_loaded!(self);
		Ok(&self.document.facets)
	}

	// -- Queries ---------------------------------------------------------------

	/// Filtered snapshot of a collection, preserving input order. The
	/// collection itself is never mutated; callers own the returned records.
	pub fn query(
		&self,
		collection: &str,
		state: &FilterState,
	) -> Result<Vec<Record>, CatalogError> {
		let collection = self.collection(collection)?;
		Ok(filter::apply(&collection.records, state)
			.into_iter()
			.cloned()
			.collect())
	}

	/// Filter, then partition by the rendered value of `key_field`. Records
	/// missing the field fall into an `"unknown"` group so the partition
	/// stays complete.
	pub fn query_grouped(
		&self,
		collection: &str,
		state: &FilterState,
		key_field: &str,
	) -> Result<Grouped<String, Record>, CatalogError> {
		let records = self.query(collection, state)?;
		Ok(group::group_by(records, |record| {
			group_key(record, key_field)
		}))
	}

	// -- Preference state ------------------------------------------------------

	pub fn journal(&self) -> &Journal {
		&self.journal
	}

	pub fn journal_mut(&mut self) -> &mut Journal {
		&mut self.journal
	}

	// -- Song of the day -------------------------------------------------------

	/// The pick for `today`, computed once per calendar day and persisted:
	/// merge playlists, apply the inclusion rule, rank with the session's
	/// favorites, then take the date-seeded entry.
	pub fn song_of_the_day(
		&mut self,
		playlists: &[Playlist],
		today: NaiveDate,
	) -> Result<Option<SongPick>, CatalogError> {
		ensure_loaded!(self);

		if let Some(existing) = self.journal.song_pick() {
			if existing.date == today {
				return Ok(Some(existing));
			}
		}

		let entries = spotlight::shortlist(spotlight::merge_playlists(playlists));
		let ranked = spotlight::rank_entries(
			entries,
			&self.journal.favorites(),
			&self.config.spotlight_weights,
		);

		let Some(scored) = spotlight::pick_for_date(&ranked, today) else {
			return Ok(None);
		};

		let pick = SongPick {
			date: today,
			identity: scored.item.identity.clone(),
			title: scored.item.title.clone(),
			artist: scored.item.artist.clone(),
		};
		self.journal.set_song_pick(&pick);
		Ok(Some(pick))
	}

	// -- Suggestions -----------------------------------------------------------

	/// Build the submission payload for the external suggestion endpoint.
	pub fn suggestion(
		&self,
		kind: &str,
		text: &str,
		now: DateTime<Utc>,
	) -> Result<SuggestionPayload, CatalogError> {
		suggestion::build_payload(kind, text, now)
	}
}

/// Render a record field as a grouping key.
fn group_key(record: &Record, field: &str) -> String {
	match record.get(field) {
		Some(FieldValue::Text(s)) => s.clone(),
		// f64 Display already renders integral values without a fraction,
		// and stays exact where an i64 cast would saturate.
		Some(FieldValue::Number(n)) => n.to_string(),
		Some(FieldValue::Flag(b)) => b.to_string(),
		Some(FieldValue::List(items)) => items.join(", "),
		None => "unknown".to_string(),
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
