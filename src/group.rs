// ---------------------------------------------------------------------------
// Grouper — partition a filtered view by a derived key
// ---------------------------------------------------------------------------
//
// Splits grouping from key ordering: `group_by` partitions once, preserving
// both key encounter order and member order, and `sorted_keys` produces a
// display ordering without touching the partition. Views re-sort keys far
// more often than they re-partition.
// ---------------------------------------------------------------------------

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// A partition of records by key. Every input item belongs to exactly one
/// group; empty groups are never materialized.
#[derive(Debug, Clone)]
pub struct Grouped<K, T> {
	/// Keys in first-encounter order.
	keys: Vec<K>,
	groups: HashMap<K, Vec<T>>,
}

impl<K: Eq + Hash + Clone, T> Grouped<K, T> {
	/// Group keys in the order they were first encountered in the input.
	pub fn keys(&self) -> &[K] {
		&self.keys
	}

	pub fn get(&self, key: &K) -> Option<&[T]> {
		self.groups.get(key).map(|g| g.as_slice())
	}

	/// Number of groups.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Number of members in one group (0 for an unknown key).
	pub fn group_size(&self, key: &K) -> usize {
		self.groups.get(key).map_or(0, |g| g.len())
	}

	/// Total members across all groups.
	pub fn total(&self) -> usize {
		self.groups.values().map(|g| g.len()).sum()
	}

	/// Keys in caller-specified order, without mutating the partition.
	/// The sort is stable: keys that compare equal keep first-appearance order.
	pub fn sorted_keys<F>(&self, mut comparator: F) -> Vec<K>
	where
		F: FnMut(&K, &K) -> Ordering,
	{
		let mut keys = self.keys.clone();
		keys.sort_by(|a, b| comparator(a, b));
		keys
	}

	/// Iterate groups in key encounter order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> {
		self.keys
			.iter()
			.map(move |k| (k, self.groups[k].as_slice()))
	}
}

/// Partition `items` by `key_fn`. Member order within each group matches the
/// relative order of the input sequence.
pub fn group_by<I, K, T, F>(items: I, mut key_fn: F) -> Grouped<K, T>
where
	I: IntoIterator<Item = T>,
	K: Eq + Hash + Clone,
	F: FnMut(&T) -> K,
{
	let mut keys: Vec<K> = Vec::new();
	let mut groups: HashMap<K, Vec<T>> = HashMap::new();

	for item in items {
		let key = key_fn(&item);
		let bucket = groups.entry(key.clone()).or_insert_with(|| {
			keys.push(key.clone());
			Vec::new()
		});
		bucket.push(item);
	}

	Grouped { keys, groups }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
