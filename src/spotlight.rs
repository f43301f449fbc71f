// ---------------------------------------------------------------------------
// Spotlight — merge, shortlist, and rank tracks for the song of the day
// ---------------------------------------------------------------------------
//
// Tracks duplicated across playlists are merged into one logical entry keyed
// by a normalized identity. Highlight flags OR together; occurrences are
// counted; the favorite bonus applies once per merged entry, not once per
// source playlist. Only entries passing the inclusion rule are ranked.
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::score::{rank, Scored};
use crate::types::{Playlist, SpotlightEntry};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The single normalized identity rule: `"{title} - {artist}"`, trimmed and
/// lowercased. Defined once so duplicate detection agrees everywhere.
pub fn identity_of(title: &str, artist: &str) -> String {
	format!("{} - {}", title.trim(), artist.trim()).to_lowercase()
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Point values for the spotlight ranking. The defaults reproduce the
/// observed tuning; callers may override any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotlightWeights {
	/// Points added per playlist occurrence.
	#[serde(rename = "perOccurrence")]
	pub per_occurrence: f64,
	/// Points when any occurrence carried the highlight flag.
	pub highlight: f64,
	/// Points when any source playlist is marked high-rotation.
	#[serde(rename = "highRotation")]
	pub high_rotation: f64,
	/// Points when the entry's identity is in the favorites set.
	/// Applied once per merged entry.
	pub favorite: f64,
}

impl Default for SpotlightWeights {
	fn default() -> Self {
		Self {
			per_occurrence: 20.0,
			highlight: 25.0,
			high_rotation: 30.0,
			favorite: 50.0,
		}
	}
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge playlists into logical entries keyed by normalized identity,
/// preserving first-encounter order.
pub fn merge_playlists(playlists: &[Playlist]) -> Vec<SpotlightEntry> {
	let mut order: Vec<String> = Vec::new();
	let mut merged: HashMap<String, SpotlightEntry> = HashMap::new();

	for playlist in playlists {
		for track in &playlist.tracks {
			let identity = identity_of(&track.title, &track.artist);
			match merged.get_mut(&identity) {
				Some(entry) => {
					entry.highlighted |= track.highlighted;
					entry.high_rotation |= playlist.high_rotation;
					if !entry.playlists.contains(&playlist.name) {
						entry.playlists.push(playlist.name.clone());
						entry.playlist_count += 1;
					}
				}
				None => {
					order.push(identity.clone());
					merged.insert(
						identity.clone(),
						SpotlightEntry {
							identity,
							title: track.title.trim().to_string(),
							artist: track.artist.trim().to_string(),
							highlighted: track.highlighted,
							playlist_count: 1,
							playlists: vec![playlist.name.clone()],
							high_rotation: playlist.high_rotation,
						},
					);
				}
			}
		}
	}

	order
		.into_iter()
		.filter_map(|identity| merged.remove(&identity))
		.collect()
}

// ---------------------------------------------------------------------------
// Shortlist
// ---------------------------------------------------------------------------

/// Inclusion rule: highlighted, or sourced from a high-rotation playlist,
/// or present in more than one playlist. Entries failing all three are
/// dropped even if they would score above zero.
pub fn qualifies(entry: &SpotlightEntry) -> bool {
	entry.highlighted || entry.high_rotation || entry.playlist_count > 1
}

pub fn shortlist(entries: Vec<SpotlightEntry>) -> Vec<SpotlightEntry> {
	entries.into_iter().filter(qualifies).collect()
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score one merged entry. Occurrence bonuses accumulate per playlist; the
/// highlight, high-rotation, and favorite bonuses each apply at most once.
pub fn score_entry(
	entry: &SpotlightEntry,
	favorites: &HashSet<String>,
	weights: &SpotlightWeights,
) -> f64 {
	let mut score = weights.per_occurrence * entry.playlist_count as f64;
	if entry.highlighted {
		score += weights.highlight;
	}
	if entry.high_rotation {
		score += weights.high_rotation;
	}
	if favorites.contains(&entry.identity) {
		score += weights.favorite;
	}
	score
}

/// Rank shortlisted entries by descending score, ties keeping merge order.
pub fn rank_entries(
	entries: Vec<SpotlightEntry>,
	favorites: &HashSet<String>,
	weights: &SpotlightWeights,
) -> Vec<Scored<SpotlightEntry>> {
	rank(entries, |entry| score_entry(entry, favorites, weights))
}

// ---------------------------------------------------------------------------
// Daily pick
// ---------------------------------------------------------------------------

/// Deterministic date-seeded selection from a ranked shortlist: the same
/// calendar day always lands on the same entry, and the index walks the
/// list as days pass.
pub fn pick_for_date(
	ranked: &[Scored<SpotlightEntry>],
	date: NaiveDate,
) -> Option<&Scored<SpotlightEntry>> {
	if ranked.is_empty() {
		return None;
	}
	let days = date.num_days_from_ce().unsigned_abs() as usize;
	ranked.get(days % ranked.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::PlaylistTrack;

	fn track(title: &str, artist: &str, highlighted: bool) -> PlaylistTrack {
		PlaylistTrack {
			title: title.into(),
			artist: artist.into(),
			highlighted,
		}
	}

	fn playlist(name: &str, high_rotation: bool, tracks: Vec<PlaylistTrack>) -> Playlist {
		Playlist {
			name: name.into(),
			high_rotation,
			tracks,
		}
	}

	#[test]
	fn identity_is_lowercased_and_trimmed() {
		assert_eq!(identity_of("  X ", " Y"), "x - y");
		assert_eq!(identity_of("X", "Y"), identity_of("x", "y"));
	}

	#[test]
	fn duplicate_across_playlists_merges_into_one_entry() {
		let playlists = vec![
			playlist("p1", false, vec![track("X", "Y", true)]),
			playlist("p2", false, vec![track("x", "y", false)]),
		];
		let merged = merge_playlists(&playlists);
		assert_eq!(merged.len(), 1);
		let entry = &merged[0];
		assert_eq!(entry.identity, "x - y");
		// Highlight flags OR together
		assert!(entry.highlighted);
		assert_eq!(entry.playlist_count, 2);
		assert_eq!(entry.playlists, vec!["p1", "p2"]);
	}

	#[test]
	fn merge_preserves_first_encounter_order() {
		let playlists = vec![
			playlist("p1", false, vec![track("B", "Z", false), track("A", "Z", false)]),
			playlist("p2", false, vec![track("C", "Z", false), track("B", "Z", false)]),
		];
		let merged = merge_playlists(&playlists);
		let ids: Vec<&str> = merged.iter().map(|e| e.identity.as_str()).collect();
		assert_eq!(ids, vec!["b - z", "a - z", "c - z"]);
	}

	#[test]
	fn same_playlist_twice_counts_once() {
		// A track repeated inside one playlist is still one occurrence
		let playlists = vec![playlist(
			"p1",
			false,
			vec![track("X", "Y", false), track("X", "Y", false)],
		)];
		let merged = merge_playlists(&playlists);
		assert_eq!(merged[0].playlist_count, 1);
	}

	#[test]
	fn high_rotation_flag_carries_over() {
		let playlists = vec![
			playlist("daily", true, vec![track("X", "Y", false)]),
			playlist("archive", false, vec![track("X", "Y", false)]),
		];
		let merged = merge_playlists(&playlists);
		assert!(merged[0].high_rotation);
	}

	#[test]
	fn inclusion_rule_drops_unqualified_entries() {
		let playlists = vec![playlist("p1", false, vec![track("Plain", "Nobody", false)])];
		let merged = merge_playlists(&playlists);
		// Not highlighted, not high-rotation, only one playlist
		assert!(shortlist(merged).is_empty());
	}

	#[test]
	fn any_single_qualifier_is_enough() {
		let highlighted = SpotlightEntry {
			identity: "a - b".into(),
			title: "A".into(),
			artist: "B".into(),
			highlighted: true,
			playlist_count: 1,
			playlists: vec!["p".into()],
			high_rotation: false,
		};
		assert!(qualifies(&highlighted));

		let rotated = SpotlightEntry {
			highlighted: false,
			high_rotation: true,
			..highlighted.clone()
		};
		assert!(qualifies(&rotated));

		let repeated = SpotlightEntry {
			highlighted: false,
			playlist_count: 2,
			..highlighted
		};
		assert!(qualifies(&repeated));
	}

	#[test]
	fn score_accumulates_per_occurrence() {
		let weights = SpotlightWeights::default();
		let entry = SpotlightEntry {
			identity: "x - y".into(),
			title: "X".into(),
			artist: "Y".into(),
			highlighted: false,
			playlist_count: 3,
			playlists: vec!["a".into(), "b".into(), "c".into()],
			high_rotation: false,
		};
		assert_eq!(
			score_entry(&entry, &HashSet::new(), &weights),
			3.0 * weights.per_occurrence
		);
	}

	#[test]
	fn favorite_bonus_applies_exactly_once() {
		let weights = SpotlightWeights::default();
		let favorites = HashSet::from(["x - y".to_string()]);
		let entry = SpotlightEntry {
			identity: "x - y".into(),
			title: "X".into(),
			artist: "Y".into(),
			highlighted: true,
			playlist_count: 2,
			playlists: vec!["a".into(), "b".into()],
			high_rotation: false,
		};
		let expected =
			2.0 * weights.per_occurrence + weights.highlight + weights.favorite;
		assert_eq!(score_entry(&entry, &favorites, &weights), expected);
	}

	#[test]
	fn rank_is_stable_for_tied_entries() {
		let weights = SpotlightWeights::default();
		let make = |title: &str| SpotlightEntry {
			identity: identity_of(title, "z"),
			title: title.into(),
			artist: "z".into(),
			highlighted: true,
			playlist_count: 1,
			playlists: vec!["p".into()],
			high_rotation: false,
		};
		let entries = vec![make("First"), make("Second"), make("Third")];
		let ranked = rank_entries(entries, &HashSet::new(), &weights);
		let titles: Vec<&str> = ranked.iter().map(|s| s.item.title.as_str()).collect();
		assert_eq!(titles, vec!["First", "Second", "Third"]);
	}

	#[test]
	fn pick_is_stable_within_a_day() {
		let weights = SpotlightWeights::default();
		let playlists = vec![playlist(
			"daily",
			true,
			vec![track("A", "Z", false), track("B", "Z", false), track("C", "Z", false)],
		)];
		let ranked = rank_entries(merge_playlists(&playlists), &HashSet::new(), &weights);
		let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
		let first = pick_for_date(&ranked, date).unwrap();
		let second = pick_for_date(&ranked, date).unwrap();
		assert_eq!(first.item.identity, second.item.identity);
	}

	#[test]
	fn pick_varies_across_consecutive_days() {
		let weights = SpotlightWeights::default();
		let playlists = vec![playlist(
			"daily",
			true,
			vec![track("A", "Z", false), track("B", "Z", false)],
		)];
		let ranked = rank_entries(merge_playlists(&playlists), &HashSet::new(), &weights);
		let day1 = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
		let day2 = day1.succ_opt().unwrap();
		let pick1 = pick_for_date(&ranked, day1).unwrap();
		let pick2 = pick_for_date(&ranked, day2).unwrap();
		assert_ne!(pick1.item.identity, pick2.item.identity);
	}

	#[test]
	fn pick_from_empty_shortlist_is_none() {
		assert!(pick_for_date(&[], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).is_none());
	}
}
