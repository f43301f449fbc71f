// ---------------------------------------------------------------------------
// Predicate Filter — compose independent field criteria with logical AND
// ---------------------------------------------------------------------------
//
// A FilterState holds the named, independently-settable selections a view
// exposes (category dropdown, year picker, flag toggle, free-text search).
// Compiling a FilterState drops every dimension left at the "all" sentinel
// (or an empty text query) so the AND chain only contains live criteria.
// ---------------------------------------------------------------------------

use crate::types::{FieldValue, Record};

/// Sentinel selection meaning "match everything" for a dimension.
pub const ALL: &str = "all";

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// One compiled, independent predicate over a single record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
	/// Exact match on an enumerated text field. List fields match when any
	/// member equals the value.
	FieldEquals { field: String, value: String },
	/// Numeric equality (e.g. year).
	NumberEquals { field: String, value: f64 },
	/// Boolean equality on a flag field.
	FlagEquals { field: String, value: bool },
	/// Case-insensitive substring match. With `field: None` the query is
	/// matched against every text field of the record.
	TextContains { field: Option<String>, query: String },
}

impl Criterion {
	/// Whether a record satisfies this criterion. A missing field never
	/// matches — "all" dimensions are elided at compile time instead of
	/// being evaluated here.
	pub fn matches(&self, record: &Record) -> bool {
		match self {
			Self::FieldEquals { field, value } => match record.get(field) {
				Some(FieldValue::Text(s)) => s == value,
				Some(FieldValue::List(items)) => items.iter().any(|i| i == value),
				_ => false,
			},
			Self::NumberEquals { field, value } => {
				record.number(field).is_some_and(|n| n == *value)
			}
			Self::FlagEquals { field, value } => {
				record.flag(field).is_some_and(|f| f == *value)
			}
			Self::TextContains { field, query } => {
				let needle = query.to_lowercase();
				match field {
					Some(f) => record
						.text(f)
						.is_some_and(|s| s.to_lowercase().contains(&needle)),
					None => record.fields.values().any(|v| {
						v.as_text()
							.is_some_and(|s| s.to_lowercase().contains(&needle))
					}),
				}
			}
		}
	}
}

/// True iff every criterion matches. An empty list matches everything.
pub fn matches_all(record: &Record, criteria: &[Criterion]) -> bool {
	criteria.iter().all(|c| c.matches(record))
}

// ---------------------------------------------------------------------------
// FilterState
// ---------------------------------------------------------------------------

/// The active filter selections of a view. Dimensions are independent and
/// compose with AND; a dimension left at the "all" sentinel (or an empty
/// query) is excluded from the compiled chain entirely.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
	selections: Vec<(String, String)>,
	numbers: Vec<(String, f64)>,
	flags: Vec<(String, bool)>,
	query: Option<(Option<String>, String)>,
}

impl FilterState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set an enumerated selection. The `"all"` sentinel (case-insensitive)
	/// clears the dimension.
	pub fn select(&mut self, field: &str, value: &str) -> &mut Self {
		self.selections.retain(|(f, _)| f != field);
		if !value.eq_ignore_ascii_case(ALL) {
			self.selections.push((field.to_string(), value.to_string()));
		}
		self
	}

	/// Set a numeric selection. `None` clears the dimension.
	pub fn select_number(&mut self, field: &str, value: Option<f64>) -> &mut Self {
		self.numbers.retain(|(f, _)| f != field);
		if let Some(v) = value {
			self.numbers.push((field.to_string(), v));
		}
		self
	}

	/// Set a flag selection. `None` clears the dimension.
	pub fn set_flag(&mut self, field: &str, value: Option<bool>) -> &mut Self {
		self.flags.retain(|(f, _)| f != field);
		if let Some(v) = value {
			self.flags.push((field.to_string(), v));
		}
		self
	}

	/// Set the free-text query, scoped to one field or (with `field: None`)
	/// to every text field. An empty or whitespace query clears it.
	pub fn set_query(&mut self, field: Option<&str>, query: &str) -> &mut Self {
		let trimmed = query.trim();
		self.query = if trimmed.is_empty() {
			None
		} else {
			Some((field.map(|f| f.to_string()), trimmed.to_string()))
		};
		self
	}

	/// The "clear filters" affordance: back to matching everything.
	pub fn clear(&mut self) {
		self.selections.clear();
		self.numbers.clear();
		self.flags.clear();
		self.query = None;
	}

	pub fn is_empty(&self) -> bool {
		self.selections.is_empty()
			&& self.numbers.is_empty()
			&& self.flags.is_empty()
			&& self.query.is_none()
	}

	/// Compile the live dimensions into an AND chain of criteria.
	pub fn compile(&self) -> Vec<Criterion> {
		let mut criteria = Vec::new();
		for (field, value) in &self.selections {
			criteria.push(Criterion::FieldEquals {
				field: field.clone(),
				value: value.clone(),
			});
		}
		for (field, value) in &self.numbers {
			criteria.push(Criterion::NumberEquals {
				field: field.clone(),
				value: *value,
			});
		}
		for (field, value) in &self.flags {
			criteria.push(Criterion::FlagEquals {
				field: field.clone(),
				value: *value,
			});
		}
		if let Some((field, query)) = &self.query {
			criteria.push(Criterion::TextContains {
				field: field.clone(),
				query: query.clone(),
			});
		}
		criteria
	}
}

/// Apply a filter state to a record sequence, preserving input order.
pub fn apply<'a>(records: &'a [Record], state: &FilterState) -> Vec<&'a Record> {
	let criteria = state.compile();
	records
		.iter()
		.filter(|r| matches_all(r, &criteria))
		.collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn film(title: &str, status: &str, genre: &str, year: f64, seen: bool) -> Record {
		serde_json::from_value(serde_json::json!({
			"title": title,
			"status": status,
			"genre": genre,
			"year": year,
			"seen": seen,
			"themes": ["memory"],
		}))
		.unwrap()
	}

	fn sample() -> Vec<Record> {
		vec![
			film("A", "watched", "Drama", 1999.0, true),
			film("B", "watchlist", "Drama", 2004.0, false),
			film("C", "watched", "Comedy", 1999.0, true),
		]
	}

	#[test]
	fn status_filter_returns_exact_matches() {
		let records = sample();
		let mut state = FilterState::new();
		state.select("status", "watched");
		let out = apply(&records, &state);
		let titles: Vec<_> = out.iter().map(|r| r.text("title").unwrap()).collect();
		assert_eq!(titles, vec!["A", "C"]);
	}

	#[test]
	fn empty_state_matches_all_in_order() {
		let records = sample();
		let out = apply(&records, &FilterState::new());
		assert_eq!(out.len(), 3);
		assert_eq!(out[0].text("title"), Some("A"));
		assert_eq!(out[2].text("title"), Some("C"));
	}

	#[test]
	fn all_sentinel_compiles_to_nothing() {
		let mut state = FilterState::new();
		state.select("genre", "all");
		assert!(state.compile().is_empty());

		// Sentinel yields the same result as omitting the criterion entirely
		let records = sample();
		assert_eq!(apply(&records, &state).len(), records.len());
	}

	#[test]
	fn all_sentinel_is_case_insensitive() {
		let mut state = FilterState::new();
		state.select("genre", "All");
		assert!(state.compile().is_empty());
	}

	#[test]
	fn selecting_all_clears_previous_selection() {
		let mut state = FilterState::new();
		state.select("genre", "Drama");
		assert_eq!(state.compile().len(), 1);
		state.select("genre", "all");
		assert!(state.compile().is_empty());
	}

	#[test]
	fn criteria_compose_with_and() {
		let records = sample();
		let mut state = FilterState::new();
		state.select("status", "watched").select("genre", "Drama");
		let out = apply(&records, &state);
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].text("title"), Some("A"));
	}

	#[test]
	fn and_composition_is_commutative() {
		let records = sample();

		let mut ab = FilterState::new();
		ab.select("status", "watched").select("genre", "Comedy");

		let mut ba = FilterState::new();
		ba.select("genre", "Comedy").select("status", "watched");

		let titles = |state: &FilterState| {
			apply(&records, state)
				.iter()
				.map(|r| r.text("title").unwrap().to_string())
				.collect::<Vec<_>>()
		};
		assert_eq!(titles(&ab), titles(&ba));
	}

	#[test]
	fn numeric_equality() {
		let records = sample();
		let mut state = FilterState::new();
		state.select_number("year", Some(1999.0));
		assert_eq!(apply(&records, &state).len(), 2);

		state.select_number("year", None);
		assert_eq!(apply(&records, &state).len(), 3);
	}

	#[test]
	fn flag_equality() {
		let records = sample();
		let mut state = FilterState::new();
		state.set_flag("seen", Some(false));
		let out = apply(&records, &state);
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].text("title"), Some("B"));
	}

	#[test]
	fn text_query_is_case_insensitive_substring() {
		let records = vec![
			film("The Long Goodbye", "watched", "Noir", 1973.0, true),
			film("Heat", "watched", "Crime", 1995.0, true),
		];
		let mut state = FilterState::new();
		state.set_query(Some("title"), "goodbye");
		let out = apply(&records, &state);
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].text("title"), Some("The Long Goodbye"));
	}

	#[test]
	fn unscoped_query_searches_every_text_field() {
		let records = sample();
		let mut state = FilterState::new();
		state.set_query(None, "drama");
		assert_eq!(apply(&records, &state).len(), 2);
	}

	#[test]
	fn empty_query_is_cleared() {
		let mut state = FilterState::new();
		state.set_query(Some("title"), "   ");
		assert!(state.compile().is_empty());
	}

	#[test]
	fn missing_field_never_matches() {
		let records = sample();
		let mut state = FilterState::new();
		state.select("director", "Anyone");
		assert!(apply(&records, &state).is_empty());
	}

	#[test]
	fn list_field_matches_any_member() {
		let records = sample();
		let mut state = FilterState::new();
		state.select("themes", "memory");
		assert_eq!(apply(&records, &state).len(), 3);
	}

	#[test]
	fn clear_resets_everything() {
		let records = sample();
		let mut state = FilterState::new();
		state
			.select("genre", "Drama")
			.select_number("year", Some(1999.0))
			.set_flag("seen", Some(true))
			.set_query(None, "a");
		assert!(!state.is_empty());

		state.clear();
		assert!(state.is_empty());
		assert_eq!(apply(&records, &state).len(), 3);
	}

	#[test]
	fn empty_criteria_list_matches_everything() {
		let records = sample();
		assert!(matches_all(&records[0], &[]));
	}
}
