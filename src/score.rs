// ---------------------------------------------------------------------------
// Scorer / Ranker — weighted rules over explicit session context
// ---------------------------------------------------------------------------
//
// Pure functions: a score is the sum of point values for every rule whose
// predicate holds, computed fresh on each call from (item, rules, context).
// Scores live on a transient wrapper and are never written back.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Session-derived facts a rule may consult. Passed explicitly so scoring is
/// deterministic and replayable with fixed inputs.
#[derive(Debug, Clone)]
pub struct ScoreContext {
	/// Normalized identity keys the user has favorited.
	pub favorites: HashSet<String>,
	pub now: DateTime<Utc>,
}

impl ScoreContext {
	pub fn new(favorites: HashSet<String>, now: DateTime<Utc>) -> Self {
		Self { favorites, now }
	}
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A predicate over (item, context) paired with a point value.
pub struct WeightedRule<T> {
	pub name: &'static str,
	pub points: f64,
	predicate: Box<dyn Fn(&T, &ScoreContext) -> bool>,
}

impl<T> WeightedRule<T> {
	pub fn new<F>(name: &'static str, points: f64, predicate: F) -> Self
	where
		F: Fn(&T, &ScoreContext) -> bool + 'static,
	{
		Self {
			name,
			points,
			predicate: Box::new(predicate),
		}
	}

	pub fn applies(&self, item: &T, ctx: &ScoreContext) -> bool {
		(self.predicate)(item, ctx)
	}
}

impl<T> std::fmt::Debug for WeightedRule<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WeightedRule")
			.field("name", &self.name)
			.field("points", &self.points)
			.finish()
	}
}

/// Sum of point values for rules whose predicate holds.
pub fn score<T>(item: &T, rules: &[WeightedRule<T>], ctx: &ScoreContext) -> f64 {
	rules
		.iter()
		.filter(|rule| rule.applies(item, ctx))
		.map(|rule| rule.points)
		.sum()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Transient (item, score) pair produced by ranking. The score is never
/// stored back on the item.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
	pub item: T,
	pub score: f64,
}

/// Sort by descending score. The sort is stable: items with equal scores
/// keep their relative order from the input sequence.
pub fn rank<T, F>(items: Vec<T>, mut score_fn: F) -> Vec<Scored<T>>
where
	F: FnMut(&T) -> f64,
{
	let mut scored: Vec<Scored<T>> = items
		.into_iter()
		.map(|item| {
			let score = score_fn(&item);
			Scored { item, score }
		})
		.collect();
	scored.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
	});
	scored
}

/// Rank using a weighted rule set and context.
pub fn rank_with_rules<T>(
	items: Vec<T>,
	rules: &[WeightedRule<T>],
	ctx: &ScoreContext,
) -> Vec<Scored<T>> {
	rank(items, |item| score(item, rules, ctx))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
