use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::competition::error::Result;
use crate::models::bet::{BetWithUser, MatchBet};
use crate::models::competition::{
    DateGroup, MatchPage, MatchWithBets, MatchWithUserBet, MatchdayGroup,
};
use crate::models::football::{FootballMatch, FootballTeam, MatchOutcome, MatchWithTeams};
use crate::models::user::PublicUser;
use crate::utils::cursor::next_cursor;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Display order of a match page: fixtures run oldest first, results
/// newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrder {
    OldestFirst,
    NewestFirst,
}

/// Service serving paginated, matchday-grouped match lists for a
/// competition's season.
pub struct MatchService {
    pool: PgPool,
}

impl MatchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Matches kicking off after now, oldest first, each carrying the
    /// requesting user's own bet in this competition.
    pub async fn future_matches(
        &self,
        season_id: Uuid,
        competition_id: Uuid,
        user_id: Uuid,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<MatchPage<MatchWithUserBet>> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let now = Utc::now();

        let rows = self
            .fetch_page(season_id, now, PageOrder::OldestFirst, cursor, limit)
            .await?;

        let page_cursor = next_cursor(&rows, limit as usize, |row| row.id);
        let rows: Vec<MatchTeamsRow> = rows.into_iter().take(limit as usize).collect();

        let match_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut own_bets = self
            .fetch_own_bets(competition_id, user_id, &match_ids)
            .await?;

        let matches: Vec<MatchWithUserBet> = rows
            .into_iter()
            .map(|row| {
                let current_user_bet = own_bets.remove(&row.id);
                MatchWithUserBet {
                    match_with_teams: row.into_match_with_teams(),
                    current_user_bet,
                }
            })
            .collect();

        let totals = self
            .matchday_totals(season_id, &distinct_matchdays(&matches, |m| {
                m.match_with_teams.match_info.matchday
            }))
            .await?;

        Ok(MatchPage {
            matchdays: group_by_matchday(
                matches,
                &totals,
                PageOrder::OldestFirst,
                |m| m.match_with_teams.match_info.matchday,
                |m| m.match_with_teams.match_info.date,
            ),
            next_cursor: page_cursor,
        })
    }

    /// Matches already kicked off, newest first, each carrying every bet
    /// placed in this competition with the bettor's public identity.
    pub async fn past_matches(
        &self,
        season_id: Uuid,
        competition_id: Uuid,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<MatchPage<MatchWithBets>> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let now = Utc::now();

        let rows = self
            .fetch_page(season_id, now, PageOrder::NewestFirst, cursor, limit)
            .await?;

        let page_cursor = next_cursor(&rows, limit as usize, |row| row.id);
        let rows: Vec<MatchTeamsRow> = rows.into_iter().take(limit as usize).collect();

        let match_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut all_bets = self.fetch_competition_bets(competition_id, &match_ids).await?;

        let matches: Vec<MatchWithBets> = rows
            .into_iter()
            .map(|row| {
                let bets = all_bets.remove(&row.id).unwrap_or_default();
                MatchWithBets {
                    match_with_teams: row.into_match_with_teams(),
                    bets,
                }
            })
            .collect();

        let totals = self
            .matchday_totals(season_id, &distinct_matchdays(&matches, |m| {
                m.match_with_teams.match_info.matchday
            }))
            .await?;

        Ok(MatchPage {
            matchdays: group_by_matchday(
                matches,
                &totals,
                PageOrder::NewestFirst,
                |m| m.match_with_teams.match_info.matchday,
                |m| m.match_with_teams.match_info.date,
            ),
            next_cursor: page_cursor,
        })
    }

    /// Fetch one page of `limit + 1` rows keyed strictly after/before the
    /// cursor row in (date, id) order. The extra row only signals that
    /// another page exists.
    async fn fetch_page(
        &self,
        season_id: Uuid,
        now: DateTime<Utc>,
        order: PageOrder,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<MatchTeamsRow>> {
        // A cursor pointing at an unknown row is treated as absent
        let cursor_date = match cursor {
            Some(cursor_id) => self
                .fetch_match_date(cursor_id)
                .await?
                .map(|date| (date, cursor_id)),
            None => None,
        };

        let rows = match (order, cursor_date) {
            (PageOrder::OldestFirst, None) => {
                sqlx::query_as::<_, MatchTeamsRow>(&page_query(
                    "m.date > $2",
                    "ORDER BY m.date ASC, m.id ASC LIMIT $3",
                ))
                .bind(season_id)
                .bind(now)
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await?
            }
            (PageOrder::OldestFirst, Some((date, id))) => {
                sqlx::query_as::<_, MatchTeamsRow>(&page_query(
                    "m.date > $2 AND (m.date, m.id) > ($3, $4)",
                    "ORDER BY m.date ASC, m.id ASC LIMIT $5",
                ))
                .bind(season_id)
                .bind(now)
                .bind(date)
                .bind(id)
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await?
            }
            (PageOrder::NewestFirst, None) => {
                sqlx::query_as::<_, MatchTeamsRow>(&page_query(
                    "m.date < $2",
                    "ORDER BY m.date DESC, m.id DESC LIMIT $3",
                ))
                .bind(season_id)
                .bind(now)
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await?
            }
            (PageOrder::NewestFirst, Some((date, id))) => {
                sqlx::query_as::<_, MatchTeamsRow>(&page_query(
                    "m.date < $2 AND (m.date, m.id) < ($3, $4)",
                    "ORDER BY m.date DESC, m.id DESC LIMIT $5",
                ))
                .bind(season_id)
                .bind(now)
                .bind(date)
                .bind(id)
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    async fn fetch_match_date(&self, match_id: Uuid) -> Result<Option<DateTime<Utc>>> {
        let date = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT date FROM football_matches WHERE id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(date)
    }

    /// Total fixtures per matchday across the whole season, so a partially
    /// fetched matchday still reports its full size.
    async fn matchday_totals(
        &self,
        season_id: Uuid,
        matchdays: &[i32],
    ) -> Result<HashMap<i32, i64>> {
        if matchdays.is_empty() {
            return Ok(HashMap::new());
        }

        let totals = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT matchday, COUNT(*)
            FROM football_matches
            WHERE season_id = $1 AND matchday = ANY($2)
            GROUP BY matchday
            "#,
        )
        .bind(season_id)
        .bind(matchdays)
        .fetch_all(&self.pool)
        .await?;

        Ok(totals.into_iter().collect())
    }

    async fn fetch_own_bets(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
        match_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, MatchBet>> {
        if match_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, MatchBetRow>(
            r#"
            SELECT id, user_id, match_id, competition_id, prediction, created_at, updated_at
            FROM match_bets
            WHERE competition_id = $1 AND user_id = $2 AND match_id = ANY($3)
            "#,
        )
        .bind(competition_id)
        .bind(user_id)
        .bind(match_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| Some((row.match_id, row.into_match_bet()?)))
            .collect())
    }

    async fn fetch_competition_bets(
        &self,
        competition_id: Uuid,
        match_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<BetWithUser>>> {
        if match_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, BetUserRow>(
            r#"
            SELECT mb.match_id, mb.prediction,
                   u.id AS user_id, u.username, u.profile_picture_url
            FROM match_bets mb
            JOIN users u ON u.id = mb.user_id
            WHERE mb.competition_id = $1 AND mb.match_id = ANY($2)
            "#,
        )
        .bind(competition_id)
        .bind(match_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut bets_by_match: HashMap<Uuid, Vec<BetWithUser>> = HashMap::new();
        for row in rows {
            let Some(prediction) = MatchOutcome::from_str(&row.prediction) else {
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

fn page_query(filter: &str, tail: &str) -> String {
    format!(
        r#"
        SELECT m.id, m.season_id, m.home_team_id, m.away_team_id,
               m.matchday, m.date, m.status, m.home_goals, m.away_goals,
               m.created_at, m.updated_at,
               ht.name AS home_team_name, ht.short_name AS home_team_short_name,
               ht.tla AS home_team_tla, ht.crest_url AS home_team_crest_url,
               ht.last_updated AS home_team_last_updated,
               aw.name AS away_team_name, aw.short_name AS away_team_short_name,
               aw.tla AS away_team_tla, aw.crest_url AS away_team_crest_url,
               aw.last_updated AS away_team_last_updated
        FROM football_matches m
        JOIN football_teams ht ON ht.id = m.home_team_id
        JOIN football_teams aw ON aw.id = m.away_team_id
        WHERE m.season_id = $1 AND {filter}
        {tail}
        "#
    )
}

#[derive(FromRow)]
struct MatchTeamsRow {
    id: Uuid,
    season_id: Uuid,
    home_team_id: Uuid,
    away_team_id: Uuid,
    matchday: i32,
    date: DateTime<Utc>,
    status: String,
    home_goals: Option<i32>,
    away_goals: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    home_team_name: String,
    home_team_short_name: String,
    home_team_tla: String,
    home_team_crest_url: Option<String>,
    home_team_last_updated: DateTime<Utc>,
    away_team_name: String,
    away_team_short_name: String,
    away_team_tla: String,
    away_team_crest_url: Option<String>,
    away_team_last_updated: DateTime<Utc>,
}

impl MatchTeamsRow {
    fn into_match_with_teams(self) -> MatchWithTeams {
        MatchWithTeams {
            match_info: FootballMatch {
                id: self.id,
                season_id: self.season_id,
                home_team_id: self.home_team_id,
                away_team_id: self.away_team_id,
                matchday: self.matchday,
                date: self.date,
                status: self.status.into(),
                home_goals: self.home_goals,
                away_goals: self.away_goals,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            home_team: FootballTeam {
                id: self.home_team_id,
                name: self.home_team_name,
                short_name: self.home_team_short_name,
                tla: self.home_team_tla,
                crest_url: self.home_team_crest_url,
                last_updated: self.home_team_last_updated,
            },
            away_team: FootballTeam {
                id: self.away_team_id,
                name: self.away_team_name,
                short_name: self.away_team_short_name,
                tla: self.away_team_tla,
                crest_url: self.away_team_crest_url,
                last_updated: self.away_team_last_updated,
            },
        }
    }
}

#[derive(FromRow)]
pub(crate) struct MatchBetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub competition_id: Uuid,
    pub prediction: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchBetRow {
    pub(crate) fn into_match_bet(self) -> Option<MatchBet> {
        Some(MatchBet {
            id: self.id,
            user_id: self.user_id,
            match_id: self.match_id,
            competition_id: self.competition_id,
            prediction: MatchOutcome::from_str(&self.prediction)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct BetUserRow {
    match_id: Uuid,
    prediction: String,
    user_id: Uuid,
    username: String,
    profile_picture_url: Option<String>,
}

fn distinct_matchdays<T>(matches: &[T], matchday_of: impl Fn(&T) -> i32) -> Vec<i32> {
    let mut matchdays: Vec<i32> = matches.iter().map(matchday_of).collect();
    matchdays.sort_unstable();
    matchdays.dedup();
    matchdays
}

/// Group a page of matches by matchday, then by calendar date within each
/// matchday. Fixtures run oldest first on every level, results newest
/// first. `totals` carries the season-wide fixture count per matchday and
/// falls back to the page size when a matchday is missing from it.
pub fn group_by_matchday<T>(
    matches: Vec<T>,
    totals: &HashMap<i32, i64>,
    order: PageOrder,
    matchday_of: impl Fn(&T) -> i32,
    date_of: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<MatchdayGroup<T>> {
    let mut by_matchday: HashMap<i32, Vec<T>> = HashMap::new();
    for m in matches {
        by_matchday.entry(matchday_of(&m)).or_default().push(m);
    }

    let mut matchdays: Vec<i32> = by_matchday.keys().copied().collect();
    match order {
        PageOrder::OldestFirst => matchdays.sort_unstable(),
        PageOrder::NewestFirst => matchdays.sort_unstable_by(|a, b| b.cmp(a)),
    }

    matchdays
        .into_iter()
        .map(|matchday| {
            let mut group_matches = by_matchday.remove(&matchday).unwrap_or_default();
            match order {
                PageOrder::OldestFirst => {
                    group_matches.sort_by_key(|m| (date_of(m)));
                }
                PageOrder::NewestFirst => {
                    group_matches.sort_by_key(|m| std::cmp::Reverse(date_of(m)));
                }
            }

            let total_matches = totals
                .get(&matchday)
                .copied()
                .unwrap_or(group_matches.len() as i64);

            let mut date_groups: Vec<DateGroup<T>> = Vec::new();
            for m in group_matches {
                let date = date_of(&m).date_naive();
                match date_groups.last_mut() {
                    Some(group) if group.date == date => group.matches.push(m),
                    _ => date_groups.push(DateGroup {
                        date,
                        matches: vec![m],
                    }),
                }
            }

            MatchdayGroup {
                matchday,
                total_matches,
                date_groups,
            }
        })
        .collect()
}
