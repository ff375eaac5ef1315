use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// A seeded football season with four teams.
pub struct SeasonFixture {
    pub season_id: Uuid,
    pub team_ids: Vec<Uuid>,
}

pub async fn seed_season(pool: &PgPool) -> SeasonFixture {
    let football_competition_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO football_competitions (id, name, code, emblem_url, last_updated)
        VALUES ($1, 'Premier League', $2, NULL, NOW())
        "#,
    )
    .bind(football_competition_id)
    // Unique code per fixture so seeding twice in one database works
    .bind(format!("PL{}", &Uuid::new_v4().simple().to_string()[..6]))
    .execute(pool)
    .await
    .expect("Failed to insert football competition");

    let season_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO football_seasons (id, football_competition_id, start_date, end_date, current_matchday)
        VALUES ($1, $2, $3, $4, 1)
        "#,
    )
    .bind(season_id)
    .bind(football_competition_id)
    .bind(Utc::now() - Duration::days(30))
    .bind(Utc::now() + Duration::days(250))
    .execute(pool)
    .await
    .expect("Failed to insert football season");

    let mut team_ids = Vec::new();
    for (name, short_name) in [
        ("Arsenal FC", "Arsenal"),
        ("Chelsea FC", "Chelsea"),
        ("Liverpool FC", "Liverpool"),
        ("Everton FC", "Everton"),
    ] {
        let team_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO football_teams (id, name, short_name, tla, crest_url, last_updated)
            VALUES ($1, $2, $3, $4, NULL, NOW())
            "#,
        )
        .bind(team_id)
        .bind(name)
        .bind(short_name)
        .bind(&Uuid::new_v4().simple().to_string()[..6])
        .execute(pool)
        .await
        .expect("Failed to insert football team");
        team_ids.push(team_id);
    }

    SeasonFixture {
        season_id,
        team_ids,
    }
}

pub async fn create_competition(pool: &PgPool, season_id: Uuid, name: &str) -> Uuid {
    let competition_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO competitions (id, name, description, football_season_id, is_active, created_at, updated_at)
        VALUES ($1, $2, 'Predict the season', $3, TRUE, NOW(), NOW())
        "#,
    )
    .bind(competition_id)
    .bind(name)
    .bind(season_id)
    .execute(pool)
    .await
    .expect("Failed to insert competition");
    competition_id
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_match(
    pool: &PgPool,
    season_id: Uuid,
    home_team_id: Uuid,
    away_team_id: Uuid,
    matchday: i32,
    date: DateTime<Utc>,
    status: &str,
    home_goals: Option<i32>,
    away_goals: Option<i32>,
) -> Uuid {
    let match_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO football_matches
            (id, season_id, home_team_id, away_team_id, matchday, date, status,
             home_goals, away_goals, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
        "#,
    )
    .bind(match_id)
    .bind(season_id)
    .bind(home_team_id)
    .bind(away_team_id)
    .bind(matchday)
    .bind(date)
    .bind(status)
    .bind(home_goals)
    .bind(away_goals)
    .execute(pool)
    .await
    .expect("Failed to insert football match");
    match_id
}

/// A finished match with both goal counts set.
pub async fn insert_finished_match(
    pool: &PgPool,
    season_id: Uuid,
    home_team_id: Uuid,
    away_team_id: Uuid,
    matchday: i32,
    date: DateTime<Utc>,
    home_goals: i32,
    away_goals: i32,
) -> Uuid {
    insert_match(
        pool,
        season_id,
        home_team_id,
        away_team_id,
        matchday,
        date,
        "finished",
        Some(home_goals),
        Some(away_goals),
    )
    .await
}

/// Insert a bet directly, bypassing the kickoff checks of the API.
pub async fn insert_bet(
    pool: &PgPool,
    user_id: Uuid,
    match_id: Uuid,
    competition_id: Uuid,
    prediction: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO match_bets (id, user_id, match_id, competition_id, prediction, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        ON CONFLICT (user_id, match_id, competition_id)
        DO UPDATE SET prediction = EXCLUDED.prediction, updated_at = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(match_id)
    .bind(competition_id)
    .bind(prediction)
    .execute(pool)
    .await
    .expect("Failed to insert bet");
}
