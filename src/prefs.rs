// ---------------------------------------------------------------------------
// Local Preference Store — hydrated key-value wrapper over opaque storage
// ---------------------------------------------------------------------------
//
// The boundary is string keys and JSON-string values; the backend may be an
// in-process map or a gzipped snapshot file. Consumers follow a two-phase
// load: until `hydrate` has run, reads return the caller-supplied fallback
// verbatim. Read and write failures are caught, logged, and replaced with
// the fallback — they never cross this module's boundary.
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Corruption: {0}")]
	Corruption(String),
	#[error("Serialization: {0}")]
	Serialization(String),
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// The opaque key-value service of the persistence boundary:
/// `get(key) -> string | null` and `set(key, string)`.
pub trait StorageBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
	fn remove(&mut self, key: &str) -> Result<(), StorageError>;
	fn keys(&self) -> Result<Vec<String>, StorageError>;
}

// ---------------------------------------------------------------------------
// MemoryBackend
// ---------------------------------------------------------------------------

/// Ephemeral in-process backend for tests and sessions without persistence.
#[derive(Debug, Default)]
pub struct MemoryBackend {
	entries: HashMap<String, String>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}
}

impl StorageBackend for MemoryBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.entries.get(key).cloned())
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		self.entries.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&mut self, key: &str) -> Result<(), StorageError> {
		self.entries.remove(key);
		Ok(())
	}

	fn keys(&self) -> Result<Vec<String>, StorageError> {
		Ok(self.entries.keys().cloned().collect())
	}
}

// ---------------------------------------------------------------------------
// FileBackend — gzipped versioned JSON snapshot
// ---------------------------------------------------------------------------

/// On-disk snapshot structure.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotV1 {
	version: u32,
	entries: HashMap<String, String>,
}

const SNAPSHOT_VERSION: u32 = 1;

/// Check if data starts with gzip magic bytes (0x1f, 0x8b).
fn is_gzipped(data: &[u8]) -> bool {
	data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

fn compress(data: &[u8]) -> Result<Vec<u8>, StorageError> {
	let mut encoder = GzEncoder::new(Vec::new(), Compression::new(6));
	encoder.write_all(data)?;
	Ok(encoder.finish()?)
}

fn decompress(data: &[u8]) -> Result<Vec<u8>, StorageError> {
	let mut decoder = GzDecoder::new(data);
	let mut out = Vec::new();
	decoder.read_to_end(&mut out)?;
	Ok(out)
}

/// File-backed storage: the whole key space lives in one gzipped JSON
/// snapshot, read once at open and rewritten on every mutation. Preference
/// data is small; a full rewrite keeps writes atomic from the caller's view.
#[derive(Debug)]
pub struct FileBackend {
	path: PathBuf,
	entries: HashMap<String, String>,
}

impl FileBackend {
	/// Open a snapshot file, reading existing entries. A missing file is an
	/// empty store; a malformed or unsupported snapshot is an error the
	/// caller decides how to treat.
	pub fn open(path: &Path) -> Result<Self, StorageError> {
		let entries = if path.exists() {
			let raw = std::fs::read(path)?;
			let json_bytes = if is_gzipped(&raw) {
				decompress(&raw)?
			} else {
				raw
			};
			let json = std::str::from_utf8(&json_bytes)
				.map_err(|e| StorageError::Corruption(format!("Invalid UTF-8: {}", e)))?;
			let snapshot: SnapshotV1 = serde_json::from_str(json)
				.map_err(|e| StorageError::Corruption(format!("Invalid snapshot: {}", e)))?;
			if snapshot.version != SNAPSHOT_VERSION {
				return Err(StorageError::Corruption(format!(
					"Unsupported snapshot version: {}",
					snapshot.version
				)));
			}
			snapshot.entries
		} else {
			HashMap::new()
		};

		Ok(Self {
			path: path.to_path_buf(),
			entries,
		})
	}

	fn flush(&self) -> Result<(), StorageError> {
		if let Some(parent) = self.path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let snapshot = SnapshotV1 {
			version: SNAPSHOT_VERSION,
			entries: self.entries.clone(),
		};
		let json = serde_json::to_string(&snapshot)
			.map_err(|e| StorageError::Serialization(e.to_string()))?;
		let compressed = compress(json.as_bytes())?;

		// Write to a sibling temp file and rename over the snapshot so an
		// interrupted write can never leave a half-written file behind.
		let tmp = self.path.with_extension("tmp");
		std::fs::write(&tmp, compressed)?;
		std::fs::rename(&tmp, &self.path)?;
		Ok(())
	}
}

impl StorageBackend for FileBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.entries.get(key).cloned())
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		self.entries.insert(key.to_string(), value.to_string());
		self.flush()
	}

	fn remove(&mut self, key: &str) -> Result<(), StorageError> {
		self.entries.remove(key);
		self.flush()
	}

	fn keys(&self) -> Result<Vec<String>, StorageError> {
		Ok(self.entries.keys().cloned().collect())
	}
}

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

/// Thin typed wrapper over a storage backend with hydration-before-use
/// semantics. Values are JSON-serialized; failures never escape.
pub struct PreferenceStore {
	backend: Box<dyn StorageBackend>,
	cache: HashMap<String, String>,
	hydrated: bool,
}

impl PreferenceStore {
	pub fn new(backend: Box<dyn StorageBackend>) -> Self {
		Self {
			backend,
			cache: HashMap::new(),
			hydrated: false,
		}
	}

	/// Read every persisted key into memory and flip the loaded signal.
	/// A backend failure leaves the store hydrated-but-empty: the session
	/// proceeds on fallbacks rather than crashing the view.
	pub fn hydrate(&mut self) {
		match self.backend.keys() {
			Ok(keys) => {
				for key in keys {
					match self.backend.get(&key) {
						Ok(Some(value)) => {
							self.cache.insert(key, value);
						}
						Ok(None) => {}
						Err(e) => {
							tracing::warn!(key = %key, "Preference read failed: {}", e);
						}
					}
				}
			}
			Err(e) => {
				tracing::warn!("Preference hydration failed: {}", e);
			}
		}
		self.hydrated = true;
	}

	pub fn is_hydrated(&self) -> bool {
		self.hydrated
	}

	/// Typed read. Before hydration, or on any read/parse failure, returns
	/// the caller-supplied fallback verbatim.
	pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
		if !self.hydrated {
			return fallback;
		}
		let Some(raw) = self.cache.get(key) else {
			return fallback;
		};
		match serde_json::from_str(raw) {
			Ok(value) => value,
			Err(e) => {
				tracing::warn!(key = %key, "Malformed preference value: {}", e);
				fallback
			}
		}
	}

	/// Typed write-through. Synchronous from the caller's perspective: a
	/// read-back within the same tick sees the new value. Backend failures
	/// are logged and swallowed (the in-memory value still updates).
	pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
		let raw = match serde_json::to_string(value) {
			Ok(raw) => raw,
			Err(e) => {
				tracing::warn!(key = %key, "Preference serialization failed: {}", e);
				return;
			}
		};
		self.cache.insert(key.to_string(), raw.clone());
		if let Err(e) = self.backend.set(key, &raw) {
			tracing::warn!(key = %key, "Preference write failed: {}", e);
		}
	}

	/// Remove a key. Backend failures are logged and swallowed.
	pub fn remove(&mut self, key: &str) {
		self.cache.remove(key);
		if let Err(e) = self.backend.remove(key) {
			tracing::warn!(key = %key, "Preference delete failed: {}", e);
		}
	}
}

impl std::fmt::Debug for PreferenceStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PreferenceStore")
			.field("hydrated", &self.hydrated)
			.field("keys", &self.cache.len())
			.finish()
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
