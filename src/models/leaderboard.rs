use serde::{Deserialize, Serialize};

use crate::models::user::PublicUser;

/// Per-category bet tally (home, away or draw predictions).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub total: u32,
    pub correct: u32,
}

impl CategoryStats {
    /// correct / total * 100, defined as 0 when no bets were placed.
    pub fn success_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total) * 100.0
    }
}

/// One matchday bucket of the recent-form trend. Form covers the latest
/// three distinct matchdays; matchdays the user skipped are omitted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchdayForm {
    pub matchday: i32,
    pub correct: u32,
    pub total: u32,
    pub rate: f64,
}

/// One ranked leaderboard row. Derived on every read, never persisted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LeaderboardEntry {
    pub user: PublicUser,
    pub total_bets: u32,
    pub correct_predictions: u32,
    pub success_percentage: f64,
    pub home_bets: CategoryStats,
    pub home_success_percentage: f64,
    pub away_bets: CategoryStats,
    pub away_success_percentage: f64,
    pub draw_bets: CategoryStats,
    pub draw_success_percentage: f64,
    pub recent_form: Vec<MatchdayForm>,
}

/// Trailing correct/total window over the user's most recent bets,
/// shown on the competition list and the dashboard.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct RecentForm {
    pub correct: u32,
    pub total: u32,
}
