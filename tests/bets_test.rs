use chrono::{Duration, Utc};
use reqwest::{Client, Method};
use serde_json::json;

mod common;
use common::fixtures::{create_competition, insert_finished_match, insert_match, seed_season};
use common::utils::{create_test_user_and_login, make_authenticated_request, spawn_app};

#[tokio::test]
async fn placing_a_bet_stores_the_prediction() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let season = seed_season(&test_app.db_pool).await;
    let competition_id =
        create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;
    let match_id = insert_match(
        &test_app.db_pool,
        season.season_id,
        season.team_ids[0],
        season.team_ids[1],
        1,
        Utc::now() + Duration::days(2),
        "scheduled",
        None,
        None,
    )
    .await;

    make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/join", &test_app.address, competition_id),
        &user.token,
        None,
    )
    .await;

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/bets", &test_app.address, competition_id),
        &user.token,
        Some(json!({ "match_id": match_id, "prediction": "HOME" })),
    )
    .await;
    assert!(response.status().is_success());

    let saved = sqlx::query_as::<_, (String,)>(
        "SELECT prediction FROM match_bets
         WHERE user_id = $1 AND match_id = $2 AND competition_id = $3",
    )
    .bind(user.user_id)
    .bind(match_id)
    .bind(competition_id)
    .fetch_one(&test_app.db_pool)
    .await
    .expect("Failed to fetch saved bet.");
    assert_eq!(saved.0, "HOME");
}

#[tokio::test]
async fn repeating_a_bet_overwrites_the_prediction() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let season = seed_season(&test_app.db_pool).await;
    let competition_id =
        create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;
    let match_id = insert_match(
        &test_app.db_pool,
        season.season_id,
        season.team_ids[0],
        season.team_ids[1],
        1,
        Utc::now() + Duration::days(2),
        "scheduled",
        None,
        None,
    )
    .await;

    make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/join", &test_app.address, competition_id),
        &user.token,
        None,
    )
    .await;

    for prediction in ["HOME", "DRAW"] {
        let response = make_authenticated_request(
            &client,
            Method::POST,
            &format!("{}/competitions/{}/bets", &test_app.address, competition_id),
            &user.token,
            Some(json!({ "match_id": match_id, "prediction": prediction })),
        )
        .await;
        assert!(response.status().is_success());
    }

    // At most one bet per (user, match, competition)
    let bets = sqlx::query_as::<_, (String,)>(
        "SELECT prediction FROM match_bets
         WHERE user_id = $1 AND match_id = $2 AND competition_id = $3",
    )
    .bind(user.user_id)
    .bind(match_id)
    .bind(competition_id)
    .fetch_all(&test_app.db_pool)
    .await
    .expect("Failed to fetch bets.");
    assert_eq!(bets.len(), 1);
    assert_eq!(bets[0].0, "DRAW");
}

#[tokio::test]
async fn betting_requires_membership() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let outsider = create_test_user_and_login(&test_app).await;

    let season = seed_season(&test_app.db_pool).await;
    let competition_id =
        create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;
    let match_id = insert_match(
        &test_app.db_pool,
        season.season_id,
        season.team_ids[0],
        season.team_ids[1],
        1,
        Utc::now() + Duration::days(2),
        "scheduled",
        None,
        None,
    )
    .await;

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/bets", &test_app.address, competition_id),
        &outsider.token,
        Some(json!({ "match_id": match_id, "prediction": "HOME" })),
    )
    .await;
    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn betting_on_a_finished_match_is_rejected() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let season = seed_season(&test_app.db_pool).await;
    let competition_id =
        create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;
    let match_id = insert_finished_match(
        &test_app.db_pool,
        season.season_id,
        season.team_ids[0],
        season.team_ids[1],
        1,
        Utc::now() - Duration::days(1),
        2,
        1,
    )
    .await;

    make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/join", &test_app.address, competition_id),
        &user.token,
        None,
    )
    .await;

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/bets", &test_app.address, competition_id),
        &user.token,
        Some(json!({ "match_id": match_id, "prediction": "HOME" })),
    )
    .await;
    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn betting_on_a_match_outside_the_season_returns_404() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let season = seed_season(&test_app.db_pool).await;
    let other_season = seed_season(&test_app.db_pool).await;
    let competition_id =
        create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;
    let foreign_match_id = insert_match(
        &test_app.db_pool,
        other_season.season_id,
        other_season.team_ids[0],
        other_season.team_ids[1],
        1,
        Utc::now() + Duration::days(2),
        "scheduled",
        None,
        None,
    )
    .await;

    make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/join", &test_app.address, competition_id),
        &user.token,
        None,
    )
    .await;

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/bets", &test_app.address, competition_id),
        &user.token,
        Some(json!({ "match_id": foreign_match_id, "prediction": "HOME" })),
    )
    .await;
    assert_eq!(404, response.status().as_u16());
}
