// ---------------------------------------------------------------------------
// Journal — preference-record lifecycle over the preference store
// ---------------------------------------------------------------------------
//
// Tasks, notes, favorites, and the song-of-the-day pick each live under one
// fixed store key. Records are created on explicit submit, mutated only by
// explicit status change, and removed only by explicit delete — there is no
// background expiry.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::derived;
use crate::prefs::PreferenceStore;
use crate::types::{Note, SongPick, Task, TaskPriority, TaskStatus};

pub const TASKS_KEY: &str = "tasks";
pub const NOTES_KEY: &str = "notes";
pub const FAVORITES_KEY: &str = "favorites";
pub const SONG_PICK_KEY: &str = "song-of-the-day";

/// User-authored state layered over the static catalog.
#[derive(Debug)]
pub struct Journal {
	store: PreferenceStore,
	overdue_threshold: Duration,
}

impl Journal {
	pub fn new(store: PreferenceStore) -> Self {
		Self {
			store,
			overdue_threshold: derived::overdue_threshold(),
		}
	}

	pub fn with_overdue_threshold(store: PreferenceStore, threshold: Duration) -> Self {
		Self {
			store,
			overdue_threshold: threshold,
		}
	}

	pub fn store(&self) -> &PreferenceStore {
		&self.store
	}

	pub fn store_mut(&mut self) -> &mut PreferenceStore {
		&mut self.store
	}

	// -- Tasks ---------------------------------------------------------------

	pub fn tasks(&self) -> Vec<Task> {
		self.store.get(TASKS_KEY, Vec::new())
	}

	/// Create a task with a generated id and `created_at = now`.
	pub fn add_task(
		&mut self,
		title: &str,
		priority: TaskPriority,
		category: &str,
		now: DateTime<Utc>,
	) -> Task {
		let task = Task {
			id: Uuid::new_v4(),
			title: title.to_string(),
			priority,
			category: category.to_string(),
			status: TaskStatus::Pending,
			created_at: now,
			updated_at: None,
		};
		let mut tasks = self.tasks();
		tasks.push(task.clone());
		self.store.set(TASKS_KEY, &tasks);
		task
	}

	/// Change a task's status. Returns false when the id is unknown.
	pub fn update_status(&mut self, id: Uuid, status: TaskStatus, now: DateTime<Utc>) -> bool {
		let mut tasks = self.tasks();
		let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
			return false;
		};
		task.status = status;
		task.updated_at = Some(now);
		self.store.set(TASKS_KEY, &tasks);
		true
	}

	/// Delete a task. Returns false when the id is unknown.
	pub fn delete_task(&mut self, id: Uuid) -> bool {
		let mut tasks = self.tasks();
		let before = tasks.len();
		tasks.retain(|t| t.id != id);
		if tasks.len() == before {
			return false;
		}
		self.store.set(TASKS_KEY, &tasks);
		true
	}

	/// Open tasks strictly older than the overdue threshold.
	pub fn overdue_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
		self.tasks()
			.into_iter()
			.filter(|t| derived::is_overdue(t.status, t.created_at, now, self.overdue_threshold))
			.collect()
	}

	// -- Notes ---------------------------------------------------------------

	pub fn notes(&self) -> Vec<Note> {
		self.store.get(NOTES_KEY, Vec::new())
	}

	pub fn add_note(&mut self, text: &str, now: DateTime<Utc>) -> Note {
		let note = Note {
			id: Uuid::new_v4(),
			text: text.to_string(),
			created_at: now,
		};
		let mut notes = self.notes();
		notes.push(note.clone());
		self.store.set(NOTES_KEY, &notes);
		note
	}

	pub fn delete_note(&mut self, id: Uuid) -> bool {
		let mut notes = self.notes();
		let before = notes.len();
		notes.retain(|n| n.id != id);
		if notes.len() == before {
			return false;
		}
		self.store.set(NOTES_KEY, &notes);
		true
	}

	// -- Favorites -----------------------------------------------------------

	pub fn favorites(&self) -> HashSet<String> {
		self.store.get(FAVORITES_KEY, HashSet::new())
	}

	pub fn is_favorite(&self, identity: &str) -> bool {
		derived::is_favorite(identity, &self.favorites())
	}

	/// Toggle a normalized identity in the favorites set. Returns the new
	/// membership state.
	pub fn toggle_favorite(&mut self, identity: &str) -> bool {
		let mut favorites = self.favorites();
		let added = if favorites.contains(identity) {
			favorites.remove(identity);
			false
		} else {
			favorites.insert(identity.to_string());
			true
		};
		self.store.set(FAVORITES_KEY, &favorites);
		added
	}

	// -- Song of the day -------------------------------------------------------

	pub fn song_pick(&self) -> Option<SongPick> {
		self.store.get(SONG_PICK_KEY, None)
	}

	pub fn set_song_pick(&mut self, pick: &SongPick) {
		self.store.set(SONG_PICK_KEY, &Some(pick.clone()));
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
