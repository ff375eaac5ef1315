use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::competition::error::{CompetitionError, Result};
use crate::competition::matches::MatchBetRow;
use crate::models::bet::{MatchBet, PlaceBetRequest};
use crate::models::football::MatchStatus;

/// Service managing a user's bets within a competition.
pub struct BetService {
    pool: PgPool,
}

impl BetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create or overwrite the user's bet on a match. At most one bet per
    /// (user, match, competition) exists; a repeated bet replaces the
    /// prediction.
    pub async fn place_bet(
        &self,
        user_id: Uuid,
        competition_id: Uuid,
        season_id: Uuid,
        request: &PlaceBetRequest,
    ) -> Result<MatchBet> {
        let target = sqlx::query_as::<_, BetTargetRow>(
            "SELECT season_id, status FROM football_matches WHERE id = $1",
        )
        .bind(request.match_id)
        .fetch_optional(&self.pool)
        .await?;

        let target = target.ok_or(CompetitionError::MatchNotFound)?;
        if target.season_id != season_id {
            // The match exists but belongs to a different season than the
            // competition is played on
            return Err(CompetitionError::MatchNotFound);
        }
        if MatchStatus::from(target.status) == MatchStatus::Finished {
            return Err(CompetitionError::MatchAlreadyDecided);
        }

        let row = sqlx::query_as::<_, MatchBetRow>(
            r#"
            INSERT INTO match_bets (id, user_id, match_id, competition_id, prediction, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            ON CONFLICT (user_id, match_id, competition_id)
            DO UPDATE SET prediction = EXCLUDED.prediction, updated_at = NOW()
            RETURNING id, user_id, match_id, competition_id, prediction, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.match_id)
        .bind(competition_id)
        .bind(request.prediction.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            "User {} predicted {} on match {} in competition {}",
            user_id,
            request.prediction.as_str(),
            request.match_id,
            competition_id
        );

        row.into_match_bet()
            .ok_or_else(|| CompetitionError::Database(sqlx::Error::RowNotFound))
    }
}

#[derive(FromRow)]
struct BetTargetRow {
    season_id: Uuid,
    status: String,
}
