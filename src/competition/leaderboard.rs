use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::competition::error::Result;
use crate::models::bet::BetWithUser;
use crate::models::football::MatchOutcome;
use crate::models::leaderboard::{CategoryStats, LeaderboardEntry, MatchdayForm, RecentForm};
use crate::models::user::PublicUser;

/// Number of distinct matchdays covered by the leaderboard form trend.
pub const FORM_MATCHDAYS: usize = 3;

/// Number of most recently played matches in the per-user trailing window
/// shown on the competition list.
pub const RECENT_FORM_MATCHES: i64 = 5;

/// A decided match with the bets placed against it in one competition.
/// Input to the aggregation; expected most recently played first.
#[derive(Debug, Clone)]
pub struct DecidedMatch {
    pub id: Uuid,
    pub matchday: i32,
    pub date: DateTime<Utc>,
    pub outcome: MatchOutcome,
    pub bets: Vec<BetWithUser>,
}

/// Service computing leaderboards and per-user form for a competition.
///
/// Every read recomputes from the full set of decided matches of the
/// competition's season; there is no cached aggregate state.
pub struct LeaderboardService {
    pool: PgPool,
}

impl LeaderboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ranked rows for a competition, most accurate bettor first.
    pub async fn competition_leaderboard(
        &self,
        competition_id: Uuid,
        season_id: Uuid,
    ) -> Result<Vec<LeaderboardEntry>> {
        let matches = self
            .fetch_decided_matches(season_id, competition_id, None, None)
            .await?;
        Ok(compute_leaderboard(&matches))
    }

    /// 1-based rank of a user in the competition leaderboard, or None if
    /// the user has no bets on decided matches.
    pub async fn user_rank(
        &self,
        competition_id: Uuid,
        season_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<i64>> {
        let matches = self
            .fetch_decided_matches(season_id, competition_id, None, None)
            .await?;
        let leaderboard = compute_leaderboard(&matches);
        Ok(leaderboard
            .iter()
            .position(|entry| entry.user.id == user_id)
            .map(|index| (index + 1) as i64))
    }

    /// The user's hits over the most recently played matches of the season
    /// (the window covers the matches, not the user's bets: a skipped match
    /// simply doesn't count towards the total).
    pub async fn user_recent_form(
        &self,
        competition_id: Uuid,
        season_id: Uuid,
        user_id: Uuid,
    ) -> Result<RecentForm> {
        let matches = self
            .fetch_decided_matches(
                season_id,
                competition_id,
                Some(user_id),
                Some(RECENT_FORM_MATCHES),
            )
            .await?;

        let mut form = RecentForm::default();
        for decided in &matches {
            for bet in &decided.bets {
                form.total += 1;
                if bet.prediction == decided.outcome {
                    form.correct += 1;
                }
            }
        }
        Ok(form)
    }

    /// Fetch decided matches of a season ordered most recently played
    /// first, with the competition's bets attached. `user_filter` restricts
    /// the attached bets to a single user; `limit` bounds the match window.
    pub(crate) async fn fetch_decided_matches(
        &self,
        season_id: Uuid,
        competition_id: Uuid,
        user_filter: Option<Uuid>,
        limit: Option<i64>,
    ) -> Result<Vec<DecidedMatch>> {
        let match_rows = match limit {
            Some(limit) => {
                sqlx::query_as::<_, DecidedMatchRow>(
                    r#"
                    SELECT id, matchday, date, home_goals, away_goals
                    FROM football_matches
                    WHERE season_id = $1
                      AND status = 'finished'
                      AND home_goals IS NOT NULL
                      AND away_goals IS NOT NULL
                    ORDER BY date DESC, id DESC
                    LIMIT $2
                    "#,
                )
                .bind(season_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DecidedMatchRow>(
                    r#"
                    SELECT id, matchday, date, home_goals, away_goals
                    FROM football_matches
                    WHERE season_id = $1
                      AND status = 'finished'
                      AND home_goals IS NOT NULL
                      AND away_goals IS NOT NULL
                    ORDER BY date DESC, id DESC
                    "#,
                )
                .bind(season_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let match_ids: Vec<Uuid> = match_rows.iter().map(|row| row.id).collect();
        let mut bets_by_match = self
            .fetch_bets(competition_id, &match_ids, user_filter)
            .await?;

        Ok(match_rows
            .into_iter()
            .map(|row| DecidedMatch {
                id: row.id,
                matchday: row.matchday,
                date: row.date,
                outcome: MatchOutcome::from_goals(row.home_goals, row.away_goals),
                bets: bets_by_match.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn fetch_bets(
        &self,
        competition_id: Uuid,
        match_ids: &[Uuid],
        user_filter: Option<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<BetWithUser>>> {
        if match_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let bet_rows = match user_filter {
            Some(user_id) => {
                sqlx::query_as::<_, BetRow>(
                    r#"
                    SELECT mb.match_id, mb.prediction,
                           u.id AS user_id, u.username, u.profile_picture_url
                    FROM match_bets mb
                    JOIN users u ON u.id = mb.user_id
                    WHERE mb.competition_id = $1
                      AND mb.match_id = ANY($2)
                      AND mb.user_id = $3
                    "#,
                )
                .bind(competition_id)
                .bind(match_ids)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, BetRow>(
                    r#"
                    SELECT mb.match_id, mb.prediction,
                           u.id AS user_id, u.username, u.profile_picture_url
                    FROM match_bets mb
                    JOIN users u ON u.id = mb.user_id
                    WHERE mb.competition_id = $1
                      AND mb.match_id = ANY($2)
                    "#,
                )
                .bind(competition_id)
                .bind(match_ids)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut bets_by_match: HashMap<Uuid, Vec<BetWithUser>> = HashMap::new();
        for row in bet_rows {
            // A prediction the application never writes is dropped rather
            // than failing the whole leaderboard
            let Some(prediction) = MatchOutcome::from_str(&row.prediction) else {
                tracing::warn!("Skipping bet with unknown prediction '{}'", row.prediction);
                continue;
            };
            bets_by_match.entry(row.match_id).or_default().push(BetWithUser {
                user: PublicUser {
                    id: row.user_id,
                    username: row.username,
                    profile_picture_url: row.profile_picture_url,
                },
                prediction,
            });
        }
        Ok(bets_by_match)
    }
}

#[derive(FromRow)]
struct DecidedMatchRow {
    id: Uuid,
    matchday: i32,
    date: DateTime<Utc>,
    home_goals: i32,
    away_goals: i32,
}

#[derive(FromRow)]
struct BetRow {
    match_id: Uuid,
    prediction: String,
    user_id: Uuid,
    username: String,
    profile_picture_url: Option<String>,
}

struct UserTally {
    user: PublicUser,
    total: CategoryStats,
    home: CategoryStats,
    away: CategoryStats,
    draw: CategoryStats,
}

/// Rank every user who placed at least one bet on a decided match.
///
/// A pure fold over the input: one pass builds per-user tallies, a second
/// pass over the latest three distinct matchdays builds the form buckets.
/// Ordering is correct predictions descending, then total bets ascending
/// (fewer but better bets beat sheer volume), then user id for a stable
/// total order.
pub fn compute_leaderboard(matches: &[DecidedMatch]) -> Vec<LeaderboardEntry> {
    let mut tallies: HashMap<Uuid, UserTally> = HashMap::new();

    for decided in matches {
        for bet in &decided.bets {
            let tally = tallies.entry(bet.user.id).or_insert_with(|| UserTally {
                user: bet.user.clone(),
                total: CategoryStats::default(),
                home: CategoryStats::default(),
                away: CategoryStats::default(),
                draw: CategoryStats::default(),
            });

            let correct = bet.prediction == decided.outcome;
            tally.total.total += 1;
            if correct {
                tally.total.correct += 1;
            }

            let bucket = match bet.prediction {
                MatchOutcome::Home => &mut tally.home,
                MatchOutcome::Away => &mut tally.away,
                MatchOutcome::Draw => &mut tally.draw,
            };
            bucket.total += 1;
            if correct {
                bucket.correct += 1;
            }
        }
    }

    let recent_matchdays = latest_matchdays(matches, FORM_MATCHDAYS);

    let mut leaderboard: Vec<LeaderboardEntry> = tallies
        .into_values()
        .map(|tally| {
            let recent_form = matchday_form(matches, &recent_matchdays, tally.user.id);
            LeaderboardEntry {
                success_percentage: tally.total.success_percentage(),
                home_success_percentage: tally.home.success_percentage(),
                away_success_percentage: tally.away.success_percentage(),
                draw_success_percentage: tally.draw.success_percentage(),
                total_bets: tally.total.total,
                correct_predictions: tally.total.correct,
                home_bets: tally.home,
                away_bets: tally.away,
                draw_bets: tally.draw,
                recent_form,
                user: tally.user,
            }
        })
        .collect();

    leaderboard.sort_by(|a, b| {
        b.correct_predictions
            .cmp(&a.correct_predictions)
            .then(a.total_bets.cmp(&b.total_bets))
            .then(a.user.id.cmp(&b.user.id))
    });

    leaderboard
}

/// The latest `count` distinct matchdays present in the input, newest first.
fn latest_matchdays(matches: &[DecidedMatch], count: usize) -> Vec<i32> {
    let mut matchdays: Vec<i32> = matches.iter().map(|m| m.matchday).collect();
    matchdays.sort_unstable_by(|a, b| b.cmp(a));
    matchdays.dedup();
    matchdays.truncate(count);
    matchdays
}

/// Form buckets for one user over the given matchdays, in the order given.
/// Matchdays where the user placed no bet are omitted.
fn matchday_form(matches: &[DecidedMatch], matchdays: &[i32], user_id: Uuid) -> Vec<MatchdayForm> {
    matchdays
        .iter()
        .filter_map(|&matchday| {
            let mut correct = 0u32;
            let mut total = 0u32;
            for decided in matches.iter().filter(|m| m.matchday == matchday) {
                let Some(bet) = decided.bets.iter().find(|b| b.user.id == user_id) else {
                    continue;
                };
                total += 1;
                if bet.prediction == decided.outcome {
                    correct += 1;
                }
            }
            if total == 0 {
                return None;
            }
            Some(MatchdayForm {
                matchday,
                correct,
                total,
                rate: f64::from(correct) / f64::from(total) * 100.0,
            })
        })
        .collect()
}
