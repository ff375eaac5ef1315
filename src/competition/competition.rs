use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::competition::bets::BetService;
use crate::competition::error::{CompetitionError, Result};
use crate::competition::leaderboard::LeaderboardService;
use crate::competition::matches::MatchService;
use crate::models::bet::{MatchBet, PlaceBetRequest};
use crate::models::competition::{
    Competition, CompetitionDashboard, CompetitionMember, CompetitionSummary, MatchPage,
    MatchWithBets, MatchWithUserBet, UserCompetition,
};
use crate::models::football::{FootballCompetition, FootballSeason};
use crate::models::leaderboard::LeaderboardEntry;

/// Window within which an unplayed, un-bet match counts as "needs my bet"
/// on the competition list.
const URGENT_BET_WINDOW_HOURS: i64 = 72;

/// Main competition service orchestrating membership, matches, bets and
/// leaderboards.
pub struct CompetitionService {
    pool: PgPool,
    matches: MatchService,
    bets: BetService,
    leaderboard: LeaderboardService,
}

impl CompetitionService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            matches: MatchService::new(pool.clone()),
            bets: BetService::new(pool.clone()),
            leaderboard: LeaderboardService::new(pool.clone()),
            pool,
        }
    }

    /// All active competitions, newest first. Public listing.
    pub async fn available_competitions(&self) -> Result<Vec<CompetitionSummary>> {
        let rows = sqlx::query_as::<_, CompetitionSummaryRow>(&summary_query(
            "c.is_active = TRUE",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CompetitionSummaryRow::into_summary).collect())
    }

    /// Competitions the user actively belongs to, newest first, each
    /// enriched with the user's dashboard snapshot.
    pub async fn user_competitions(&self, user_id: Uuid) -> Result<Vec<UserCompetition>> {
        let rows = sqlx::query_as::<_, CompetitionSummaryRow>(&summary_query(
            "c.is_active = TRUE AND EXISTS (
                SELECT 1 FROM competition_members cm
                WHERE cm.competition_id = c.id AND cm.user_id = $1 AND cm.is_active
            )",
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut competitions = Vec::with_capacity(rows.len());
        for row in rows {
            let summary = row.into_summary();
            let dashboard = self.competition_dashboard(&summary, user_id).await?;
            competitions.push(UserCompetition { summary, dashboard });
        }
        Ok(competitions)
    }

    /// Competition detail for an active member.
    pub async fn competition_for_member(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
    ) -> Result<CompetitionSummary> {
        self.validate_access(competition_id, user_id).await?;

        let row = sqlx::query_as::<_, CompetitionSummaryRow>(&summary_query(
            "c.id = $1 AND c.is_active = TRUE",
        ))
        .bind(competition_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CompetitionError::CompetitionNotFound)?;

        Ok(row.into_summary())
    }

    /// Join (or re-join) a competition. Membership rows are never deleted;
    /// joining reactivates a previously deactivated row.
    pub async fn join_competition(
        &self,
        user_id: Uuid,
        competition_id: Uuid,
    ) -> Result<CompetitionMember> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM competitions WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(competition_id)
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            return Err(CompetitionError::CompetitionNotFound);
        }

        let member = sqlx::query_as::<_, CompetitionMember>(
            r#"
            INSERT INTO competition_members (user_id, competition_id, is_active, joined_at)
            VALUES ($1, $2, TRUE, NOW())
            ON CONFLICT (user_id, competition_id) DO UPDATE SET is_active = TRUE
            RETURNING user_id, competition_id, is_active, joined_at
            "#,
        )
        .bind(user_id)
        .bind(competition_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("User {} joined competition {}", user_id, competition_id);
        Ok(member)
    }

    /// Deactivate the user's membership. Bets stay in place.
    pub async fn leave_competition(
        &self,
        user_id: Uuid,
        competition_id: Uuid,
    ) -> Result<CompetitionMember> {
        let member = sqlx::query_as::<_, CompetitionMember>(
            r#"
            UPDATE competition_members
            SET is_active = FALSE
            WHERE user_id = $1 AND competition_id = $2
            RETURNING user_id, competition_id, is_active, joined_at
            "#,
        )
        .bind(user_id)
        .bind(competition_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CompetitionError::MembershipNotFound)?;

        tracing::info!("User {} left competition {}", user_id, competition_id);
        Ok(member)
    }

    /// Upcoming fixtures for an active member, oldest first.
    pub async fn future_matches(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<MatchPage<MatchWithUserBet>> {
        let competition = self.validate_access(competition_id, user_id).await?;
        self.matches
            .future_matches(
                competition.football_season_id,
                competition_id,
                user_id,
                cursor,
                limit,
            )
            .await
    }

    /// Played matches with everyone's bets for an active member, newest first.
    pub async fn past_matches(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<MatchPage<MatchWithBets>> {
        let competition = self.validate_access(competition_id, user_id).await?;
        self.matches
            .past_matches(competition.football_season_id, competition_id, cursor, limit)
            .await
    }

    /// Place or overwrite a bet for an active member.
    pub async fn place_bet(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
        request: &PlaceBetRequest,
    ) -> Result<MatchBet> {
        let competition = self.validate_access(competition_id, user_id).await?;
        self.bets
            .place_bet(
                user_id,
                competition_id,
                competition.football_season_id,
                request,
            )
            .await
    }

    /// Ranked leaderboard for an active member.
    pub async fn leaderboard(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<LeaderboardEntry>> {
        let competition = self.validate_access(competition_id, user_id).await?;
        self.leaderboard
            .competition_leaderboard(competition_id, competition.football_season_id)
            .await
    }

    /// The competition itself if the user is an active member of an active
    /// competition; the guard in front of every per-competition read.
    pub async fn validate_access(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            "SELECT id, name, description, football_season_id, is_active, created_at, updated_at
             FROM competitions WHERE id = $1 AND is_active = TRUE",
        )
        .bind(competition_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CompetitionError::CompetitionNotFound)?;

        let is_member = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM competition_members
                WHERE competition_id = $1 AND user_id = $2 AND is_active
            )",
        )
        .bind(competition_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        if !is_member {
            return Err(CompetitionError::AccessDenied);
        }
        Ok(competition)
    }

    async fn competition_dashboard(
        &self,
        summary: &CompetitionSummary,
        user_id: Uuid,
    ) -> Result<CompetitionDashboard> {
        let now = Utc::now();
        let upcoming_matches_count = self
            .count_unbet_matches(
                summary.football_season.id,
                summary.competition.id,
                user_id,
                now,
                now + Duration::hours(URGENT_BET_WINDOW_HOURS),
            )
            .await?;

        let user_rank = self
            .leaderboard
            .user_rank(summary.competition.id, summary.football_season.id, user_id)
            .await?;

        let recent_form = self
            .leaderboard
            .user_recent_form(summary.competition.id, summary.football_season.id, user_id)
            .await?;

        Ok(CompetitionDashboard {
            upcoming_matches_count,
            user_rank,
            recent_form,
        })
    }

    /// Matches in the window the user has not bet on yet in this competition.
    async fn count_unbet_matches(
        &self,
        season_id: Uuid,
        competition_id: Uuid,
        user_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM football_matches m
            WHERE m.season_id = $1
              AND m.date > $2 AND m.date <= $3
              AND NOT EXISTS (
                  SELECT 1 FROM match_bets mb
                  WHERE mb.match_id = m.id
                    AND mb.user_id = $4
                    AND mb.competition_id = $5
              )
            "#,
        )
        .bind(season_id)
        .bind(from)
        .bind(until)
        .bind(user_id)
        .bind(competition_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

fn summary_query(filter: &str) -> String {
    format!(
        r#"
        SELECT c.id, c.name, c.description, c.football_season_id, c.is_active,
               c.created_at, c.updated_at,
               fs.start_date AS season_start_date, fs.end_date AS season_end_date,
               fs.current_matchday AS season_current_matchday,
               fc.id AS fc_id, fc.name AS fc_name, fc.code AS fc_code,
               fc.emblem_url AS fc_emblem_url, fc.last_updated AS fc_last_updated,
               (SELECT COUNT(*) FROM competition_members cm
                WHERE cm.competition_id = c.id AND cm.is_active) AS member_count,
               (SELECT COUNT(*) FROM match_bets mb
                WHERE mb.competition_id = c.id) AS bet_count
        FROM competitions c
        JOIN football_seasons fs ON fs.id = c.football_season_id
        JOIN football_competitions fc ON fc.id = fs.football_competition_id
        WHERE {filter}
        ORDER BY c.created_at DESC
        "#
    )
}

#[derive(FromRow)]
struct CompetitionSummaryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    football_season_id: Uuid,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    season_start_date: DateTime<Utc>,
    season_end_date: DateTime<Utc>,
    season_current_matchday: i32,
    fc_id: Uuid,
    fc_name: String,
    fc_code: String,
    fc_emblem_url: Option<String>,
    fc_last_updated: DateTime<Utc>,
    member_count: i64,
    bet_count: i64,
}

impl CompetitionSummaryRow {
    fn into_summary(self) -> CompetitionSummary {
        CompetitionSummary {
            competition: Competition {
                id: self.id,
                name: self.name,
                description: self.description,
                football_season_id: self.football_season_id,
                is_active: self.is_active,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            football_season: FootballSeason {
                id: self.football_season_id,
                football_competition_id: self.fc_id,
                start_date: self.season_start_date,
                end_date: self.season_end_date,
                current_matchday: self.season_current_matchday,
            },
            football_competition: FootballCompetition {
                id: self.fc_id,
                name: self.fc_name,
                code: self.fc_code,
                emblem_url: self.fc_emblem_url,
                last_updated: self.fc_last_updated,
            },
            member_count: self.member_count,
            bet_count: self.bet_count,
        }
    }
}
