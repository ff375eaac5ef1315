use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct FootballCompetition {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub emblem_url: Option<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct FootballSeason {
    pub id: Uuid,
    pub football_competition_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub current_matchday: i32,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct FootballTeam {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
    pub tla: String,
    pub crest_url: Option<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
}

impl From<String> for MatchStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "live" => MatchStatus::Live,
            "finished" => MatchStatus::Finished,
            "postponed" => MatchStatus::Postponed,
            _ => MatchStatus::Scheduled,
        }
    }
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
            MatchStatus::Postponed => "postponed",
        }
    }
}

/// The actual result of a finished match, derived from goal counts.
/// Never stored; also the value space of a prediction.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchOutcome {
    Home,
    Draw,
    Away,
}

impl MatchOutcome {
    /// Equal goals resolve to a draw.
    pub fn from_goals(home_goals: i32, away_goals: i32) -> Self {
        if home_goals > away_goals {
            MatchOutcome::Home
        } else if home_goals < away_goals {
            MatchOutcome::Away
        } else {
            MatchOutcome::Draw
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::Home => "HOME",
            MatchOutcome::Draw => "DRAW",
            MatchOutcome::Away => "AWAY",
        }
    }

    /// Parse the stored representation. None for anything else.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HOME" => Some(MatchOutcome::Home),
            "DRAW" => Some(MatchOutcome::Draw),
            "AWAY" => Some(MatchOutcome::Away),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FootballMatch {
    pub id: Uuid,
    pub season_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub matchday: i32,
    pub date: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FootballMatch {
    /// A match enters aggregation iff it is finished AND both goal counts
    /// are present. Gating on either condition alone is not enough.
    pub fn is_decided(&self) -> bool {
        self.status == MatchStatus::Finished
            && self.home_goals.is_some()
            && self.away_goals.is_some()
    }

    /// Derived outcome; None while the match is not decided.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if !self.is_decided() {
            return None;
        }
        Some(MatchOutcome::from_goals(self.home_goals?, self.away_goals?))
    }
}

/// Match enriched with both teams, as the API serves it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchWithTeams {
    #[serde(flatten)]
    pub match_info: FootballMatch,
    pub home_team: FootballTeam,
    pub away_team: FootballTeam,
}
