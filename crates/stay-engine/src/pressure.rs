//! View-pressure tracking: rolling per-visitor view counts that feed the
//! demand uplift, with a sticky cooldown after a booking.
//!
//! The state is a plain value object owned by the caller (typically round
//! tripped through a signed client-side token) and threaded explicitly
//! through every operation; the engine never holds ambient per-visitor
//! state.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Views older than this many days no longer create pricing pressure.
pub const VIEW_WINDOW_DAYS: i64 = 7;

/// Per-visitor pricing state.
///
/// `last_uplift` is the frozen uplift fraction; once
/// [`mark_uplift_applied`] stamps `last_applied`, tier resolution returns
/// the frozen value for the cooldown window even if the view count has
/// moved, so a guest does not watch the price flicker right after a
/// near-booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPressureState {
    pub views: Vec<DateTime<Utc>>,
    pub last_applied: Option<DateTime<Utc>>,
    pub last_uplift: Decimal,
}

impl ViewPressureState {
    /// Decode a persisted token. Garbage decodes to a fresh state: a
    /// tampered or ancient token must never break quoting.
    pub fn from_token(token: &str) -> Self {
        serde_json::from_str(token).unwrap_or_default()
    }

    pub fn to_token(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Drop view timestamps older than the trailing week. Runs on every
    /// read so stale state can never inflate the count.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let horizon = now - Duration::days(VIEW_WINDOW_DAYS);
        self.views.retain(|&t| t >= horizon);
    }

    /// Recent view count after pruning.
    pub fn recent_views(&mut self, now: DateTime<Utc>) -> usize {
        self.prune(now);
        self.views.len()
    }
}

/// Record a page view. Skips silently when the visitor opted out.
pub fn track_view(state: &mut ViewPressureState, do_not_track: bool, now: DateTime<Utc>) {
    if do_not_track {
        return;
    }
    state.prune(now);
    state.views.push(now);
}

/// Stamp the moment an uplift became real money: called exactly once when
/// a quote turns into a confirmed booking, not on every quote preview.
pub fn mark_uplift_applied(state: &mut ViewPressureState, do_not_track: bool, now: DateTime<Utc>) {
    if do_not_track {
        return;
    }
    state.last_applied = Some(now);
}
