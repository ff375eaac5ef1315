use actix_web::{web, HttpResponse, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::models::football::MatchOutcome;

/// Window within which an unplayed, un-bet match shows up on the dashboard.
const UPCOMING_WINDOW_HOURS: i64 = 48;
const UPCOMING_LIMIT: i64 = 10;
const ACTIVITY_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
struct CompetitionRef {
    id: Uuid,
    name: String,
}

#[derive(Debug, Serialize)]
struct TeamRef {
    id: Uuid,
    name: String,
    short_name: String,
    tla: String,
    crest_url: Option<String>,
}

#[derive(FromRow)]
struct UpcomingMatchRow {
    match_id: Uuid,
    date: DateTime<Utc>,
    matchday: i32,
    home_team_id: Uuid,
    home_team_name: String,
    home_team_short_name: String,
    home_team_tla: String,
    home_team_crest_url: Option<String>,
    away_team_id: Uuid,
    away_team_name: String,
    away_team_short_name: String,
    away_team_tla: String,
    away_team_crest_url: Option<String>,
    competition_id: Uuid,
    competition_name: String,
}

#[derive(Debug, Serialize)]
struct UpcomingMatch {
    id: Uuid,
    date: DateTime<Utc>,
    matchday: i32,
    home_team: TeamRef,
    away_team: TeamRef,
    competition: CompetitionRef,
}

/// Matches kicking off in the next 48 hours across the user's
/// competitions that the user has not bet on yet.
#[tracing::instrument(
    name = "Get dashboard upcoming matches",
    skip(pool, claims),
    fields(
        username = %claims.username
    )
)]
pub async fn get_upcoming_matches(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let now = Utc::now();
    let window_end = now + Duration::hours(UPCOMING_WINDOW_HOURS);

    let rows = sqlx::query_as::<_, UpcomingMatchRow>(
        r#"
        SELECT m.id AS match_id, m.date, m.matchday,
               ht.id AS home_team_id, ht.name AS home_team_name,
               ht.short_name AS home_team_short_name, ht.tla AS home_team_tla,
               ht.crest_url AS home_team_crest_url,
               aw.id AS away_team_id, aw.name AS away_team_name,
               aw.short_name AS away_team_short_name, aw.tla AS away_team_tla,
               aw.crest_url AS away_team_crest_url,
               c.id AS competition_id, c.name AS competition_name
        FROM football_matches m
        JOIN competitions c ON c.football_season_id = m.season_id AND c.is_active
        JOIN competition_members cm
            ON cm.competition_id = c.id AND cm.user_id = $1 AND cm.is_active
        JOIN football_teams ht ON ht.id = m.home_team_id
        JOIN football_teams aw ON aw.id = m.away_team_id
        WHERE m.date > $2 AND m.date <= $3
          AND NOT EXISTS (
              SELECT 1 FROM match_bets mb
              WHERE mb.match_id = m.id
                AND mb.user_id = $1
                AND mb.competition_id = c.id
          )
        ORDER BY m.date ASC
        LIMIT $4
        "#,
    )
    .bind(user_id)
    .bind(now)
    .bind(window_end)
    .bind(UPCOMING_LIMIT)
    .fetch_all(pool.get_ref())
    .await;

    match rows {
        Ok(rows) => {
            let matches: Vec<UpcomingMatch> = rows
                .into_iter()
                .map(|row| UpcomingMatch {
                    id: row.match_id,
                    date: row.date,
                    matchday: row.matchday,
                    home_team: TeamRef {
                        id: row.home_team_id,
                        name: row.home_team_name,
                        short_name: row.home_team_short_name,
                        tla: row.home_team_tla,
                        crest_url: row.home_team_crest_url,
                    },
                    away_team: TeamRef {
                        id: row.away_team_id,
                        name: row.away_team_name,
                        short_name: row.away_team_short_name,
                        tla: row.away_team_tla,
                        crest_url: row.away_team_crest_url,
                    },
                    competition: CompetitionRef {
                        id: row.competition_id,
                        name: row.competition_name,
                    },
                })
                .collect();

            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": matches
            })))
        }
        Err(e) => {
            tracing::error!("Failed to fetch upcoming matches: {}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to fetch upcoming matches"
            })))
        }
    }
}

#[derive(FromRow)]
struct SettledBetRow {
    home_goals: i32,
    away_goals: i32,
    prediction: String,
}

/// The user's overall hit rate across all their competitions.
#[tracing::instrument(
    name = "Get dashboard user stats",
    skip(pool, claims),
    fields(
        username = %claims.username
    )
)]
pub async fn get_user_stats(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let rows = sqlx::query_as::<_, SettledBetRow>(
        r#"
        SELECT m.home_goals, m.away_goals, mb.prediction
        FROM match_bets mb
        JOIN football_matches m ON m.id = mb.match_id
        JOIN competitions c ON c.id = mb.competition_id
        JOIN competition_members cm
            ON cm.competition_id = c.id AND cm.user_id = mb.user_id
        WHERE mb.user_id = $1
          AND cm.is_active AND c.is_active
          AND m.status = 'finished'
          AND m.home_goals IS NOT NULL AND m.away_goals IS NOT NULL
        "#,
    )
    .bind(user_id)
    .fetch_all(pool.get_ref())
    .await;

    match rows {
        Ok(rows) => {
            let mut total_bets = 0u32;
            let mut correct_predictions = 0u32;
            for row in &rows {
                let Some(prediction) = MatchOutcome::from_str(&row.prediction) else {
                    continue;
                };
                total_bets += 1;
                if prediction == MatchOutcome::from_goals(row.home_goals, row.away_goals) {
                    correct_predictions += 1;
                }
            }

            let success_rate = if total_bets > 0 {
                f64::from(correct_predictions) / f64::from(total_bets) * 100.0
            } else {
                0.0
            };

            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": {
                    "total_bets": total_bets,
                    "correct_predictions": correct_predictions,
                    "success_rate": success_rate
                }
            })))
        }
        Err(e) => {
            tracing::error!("Failed to fetch user stats: {}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to fetch user stats"
            })))
        }
    }
}

#[derive(FromRow)]
struct ActivityRow {
    match_id: Uuid,
    date: DateTime<Utc>,
    home_goals: i32,
    away_goals: i32,
    home_team_id: Uuid,
    home_team_name: String,
    home_team_short_name: String,
    home_team_tla: String,
    home_team_crest_url: Option<String>,
    away_team_id: Uuid,
    away_team_name: String,
    away_team_short_name: String,
    away_team_tla: String,
    away_team_crest_url: Option<String>,
    prediction: String,
    competition_id: Uuid,
    competition_name: String,
}

#[derive(Debug, Serialize)]
struct ActivityMatch {
    id: Uuid,
    date: DateTime<Utc>,
    home_team: TeamRef,
    away_team: TeamRef,
    home_goals: i32,
    away_goals: i32,
}

#[derive(Debug, Serialize)]
struct ActivityBet {
    prediction: MatchOutcome,
    is_correct: bool,
}

#[derive(Debug, Serialize)]
struct ActivityEntry {
    #[serde(rename = "match")]
    match_info: ActivityMatch,
    bet: ActivityBet,
    competition: CompetitionRef,
}

/// The user's bets on the most recently played matches, with hit/miss.
#[tracing::instrument(
    name = "Get dashboard recent activity",
    skip(pool, claims),
    fields(
        username = %claims.username
    )
)]
pub async fn get_recent_activity(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let rows = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT m.id AS match_id, m.date, m.home_goals, m.away_goals,
               ht.id AS home_team_id, ht.name AS home_team_name,
               ht.short_name AS home_team_short_name, ht.tla AS home_team_tla,
               ht.crest_url AS home_team_crest_url,
               aw.id AS away_team_id, aw.name AS away_team_name,
               aw.short_name AS away_team_short_name, aw.tla AS away_team_tla,
               aw.crest_url AS away_team_crest_url,
               mb.prediction,
               c.id AS competition_id, c.name AS competition_name
        FROM match_bets mb
        JOIN football_matches m ON m.id = mb.match_id
        JOIN competitions c ON c.id = mb.competition_id
        JOIN competition_members cm
            ON cm.competition_id = c.id AND cm.user_id = mb.user_id
        JOIN football_teams ht ON ht.id = m.home_team_id
        JOIN football_teams aw ON aw.id = m.away_team_id
        WHERE mb.user_id = $1
          AND cm.is_active AND c.is_active
          AND m.status = 'finished'
          AND m.home_goals IS NOT NULL AND m.away_goals IS NOT NULL
        ORDER BY m.date DESC, m.id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(ACTIVITY_LIMIT)
    .fetch_all(pool.get_ref())
    .await;

    match rows {
        Ok(rows) => {
            let activities: Vec<ActivityEntry> = rows
                .into_iter()
                .filter_map(|row| {
                    let prediction = MatchOutcome::from_str(&row.prediction)?;
                    let outcome = MatchOutcome::from_goals(row.home_goals, row.away_goals);
                    Some(ActivityEntry {
                        match_info: ActivityMatch {
                            id: row.match_id,
                            date: row.date,
                            home_team: TeamRef {
                                id: row.home_team_id,
                                name: row.home_team_name,
                                short_name: row.home_team_short_name,
                                tla: row.home_team_tla,
                                crest_url: row.home_team_crest_url,
                            },
                            away_team: TeamRef {
                                id: row.away_team_id,
                                name: row.away_team_name,
                                short_name: row.away_team_short_name,
                                tla: row.away_team_tla,
                                crest_url: row.away_team_crest_url,
                            },
                            home_goals: row.home_goals,
                            away_goals: row.away_goals,
                        },
                        bet: ActivityBet {
                            prediction,
                            is_correct: prediction == outcome,
                        },
                        competition: CompetitionRef {
                            id: row.competition_id,
                            name: row.competition_name,
                        },
                    })
                })
                .collect();

            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": activities
            })))
        }
        Err(e) => {
            tracing::error!("Failed to fetch recent activity: {}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to fetch recent activity"
            })))
        }
    }
}
