// ---------------------------------------------------------------------------
// Derived State Calculator — per-record flags from explicit inputs
// ---------------------------------------------------------------------------
//
// Pure functions over (record fields, session state, explicit now). Nothing
// here reads a clock or a global set, so every flag is replayable with
// fixed inputs.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::types::TaskStatus;

/// Age past which a non-terminal task counts as overdue.
pub fn overdue_threshold() -> Duration {
	Duration::days(3)
}

/// True iff the status is not terminal and the task is strictly older than
/// the threshold. A task created exactly at the threshold is not overdue;
/// a done task is never overdue regardless of age.
pub fn is_overdue(
	status: TaskStatus,
	created_at: DateTime<Utc>,
	now: DateTime<Utc>,
	threshold: Duration,
) -> bool {
	if status.is_terminal() {
		return false;
	}
	now.signed_duration_since(created_at) > threshold
}

/// True iff the record's normalized identity is in the favorites set.
pub fn is_favorite(identity: &str, favorites: &HashSet<String>) -> bool {
	favorites.contains(identity)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
