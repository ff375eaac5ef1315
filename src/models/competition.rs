use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::bet::{BetWithUser, MatchBet};
use crate::models::football::{FootballCompetition, FootballSeason, MatchWithTeams};
use crate::models::leaderboard::RecentForm;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Competition {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub football_season_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct CompetitionMember {
    pub user_id: Uuid,
    pub competition_id: Uuid,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
}

/// Competition as listed to users, with season info and counters.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompetitionSummary {
    pub competition: Competition,
    pub football_season: FootballSeason,
    pub football_competition: FootballCompetition,
    pub member_count: i64,
    pub bet_count: i64,
}

/// Per-competition snapshot shown on the user's competition list.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompetitionDashboard {
    pub upcoming_matches_count: i64,
    pub user_rank: Option<i64>,
    pub recent_form: RecentForm,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserCompetition {
    #[serde(flatten)]
    pub summary: CompetitionSummary,
    pub dashboard: CompetitionDashboard,
}

/// A future match carrying the requesting user's own bet, if any.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchWithUserBet {
    #[serde(flatten)]
    pub match_with_teams: MatchWithTeams,
    pub current_user_bet: Option<MatchBet>,
}

/// A played match carrying every bet placed in the competition.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchWithBets {
    #[serde(flatten)]
    pub match_with_teams: MatchWithTeams,
    pub bets: Vec<BetWithUser>,
}

/// One matchday worth of matches, split into calendar-date groups.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchdayGroup<T> {
    pub matchday: i32,
    /// Total fixtures of this matchday in the whole season, not just the page.
    pub total_matches: i64,
    pub date_groups: Vec<DateGroup<T>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DateGroup<T> {
    pub date: chrono::NaiveDate,
    pub matches: Vec<T>,
}

/// One page of matches grouped for display.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchPage<T> {
    pub matchdays: Vec<MatchdayGroup<T>>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchPageQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}
