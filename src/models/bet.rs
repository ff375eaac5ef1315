use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::football::MatchOutcome;
use crate::models::user::PublicUser;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchBet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub competition_id: Uuid,
    pub prediction: MatchOutcome,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bet together with the bettor's public identity, as shown on past
/// matches and fed into the leaderboard aggregation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BetWithUser {
    pub user: PublicUser,
    pub prediction: MatchOutcome,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceBetRequest {
    pub match_id: Uuid,
    pub prediction: MatchOutcome,
}
