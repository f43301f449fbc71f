// ---------------------------------------------------------------------------
// Record Store — one-shot load of static catalog documents
// ---------------------------------------------------------------------------
//
// A catalog document is a single JSON object. Every key whose value is an
// array of objects becomes a named Collection (document order preserved);
// a `filters` or `categories` key whose value is an array of strings becomes
// the facet sidecar. The load either fully succeeds or fails — there is no
// partial-collection fallback.
// ---------------------------------------------------------------------------

use std::path::Path;

use serde_json::Value;

use crate::error::CatalogError;
use crate::types::{CatalogDocument, Collection, Record};

/// Keys recognized as the facet sidecar rather than a record collection.
const FACET_KEYS: [&str; 2] = ["filters", "categories"];

/// Parse a catalog document from a JSON string.
///
/// Malformed input (not an object, a collection that mixes records with
/// non-objects, a facet array with non-strings) is fatal.
pub fn parse_document(json: &str) -> Result<CatalogDocument, CatalogError> {
	let root: Value = serde_json::from_str(json)
		.map_err(|e| CatalogError::Malformed(format!("Invalid JSON: {}", e)))?;

	let obj = root
		.as_object()
		.ok_or_else(|| CatalogError::Malformed("Document root must be an object".into()))?;

	let mut document = CatalogDocument::default();

	for (key, value) in obj {
		if FACET_KEYS.contains(&key.as_str()) {
			document.facets = parse_facets(key, value)?;
			continue;
		}

		let items = value.as_array().ok_or_else(|| {
			CatalogError::Malformed(format!("Top-level key '{}' must be an array", key))
		})?;

		let mut records = Vec::with_capacity(items.len());
		for (i, item) in items.iter().enumerate() {
			let record: Record = serde_json::from_value(item.clone()).map_err(|e| {
				CatalogError::Malformed(format!(
					"Collection '{}' entry {}: {}",
					key, i, e
				))
			})?;
			records.push(record);
		}

		document.collections.push(Collection {
			name: key.clone(),
			records,
		});
	}

	Ok(document)
}

fn parse_facets(key: &str, value: &Value) -> Result<Vec<String>, CatalogError> {
	let items = value.as_array().ok_or_else(|| {
		CatalogError::Malformed(format!("Facet sidecar '{}' must be an array", key))
	})?;
	items
		.iter()
		.map(|v| {
			v.as_str().map(|s| s.to_string()).ok_or_else(|| {
				CatalogError::Malformed(format!(
					"Facet sidecar '{}' must contain only strings",
					key
				))
			})
		})
		.collect()
}

/// Load a catalog document from a file. Fatal at startup on any failure —
/// the consuming view must not render from an inconsistent catalog.
pub fn load_document(path: &Path) -> Result<CatalogDocument, CatalogError> {
	let json = std::fs::read_to_string(path)?;
	parse_document(&json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
