use reqwest::{Client, Method};

mod common;
use common::fixtures::{create_competition, seed_season};
use common::utils::{create_test_user_and_login, make_authenticated_request, spawn_app};

#[tokio::test]
async fn available_competitions_are_listed_publicly() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let season = seed_season(&test_app.db_pool).await;
    create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;

    let response = client
        .get(format!("{}/competitions/available", &test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    let competitions = body["data"].as_array().expect("data should be an array");
    assert_eq!(competitions.len(), 1);
    assert_eq!(competitions[0]["competition"]["name"], "Premier Tips 25/26");
    assert_eq!(competitions[0]["member_count"], 0);
}

#[tokio::test]
async fn joining_a_competition_makes_it_appear_in_user_competitions() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let season = seed_season(&test_app.db_pool).await;
    let competition_id =
        create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;

    // Before joining, the list is empty
    let response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/competitions", &test_app.address),
        &user.token,
        None,
    )
    .await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let join_response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/join", &test_app.address, competition_id),
        &user.token,
        None,
    )
    .await;
    assert!(join_response.status().is_success());

    let response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/competitions", &test_app.address),
        &user.token,
        None,
    )
    .await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    let competitions = body["data"].as_array().unwrap();
    assert_eq!(competitions.len(), 1);
    assert_eq!(competitions[0]["member_count"], 1);

    // The dashboard snapshot is attached
    let dashboard = &competitions[0]["dashboard"];
    assert_eq!(dashboard["upcoming_matches_count"], 0);
    assert!(dashboard["user_rank"].is_null());
    assert_eq!(dashboard["recent_form"]["total"], 0);
}

#[tokio::test]
async fn competition_detail_requires_membership() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let member = create_test_user_and_login(&test_app).await;
    let outsider = create_test_user_and_login(&test_app).await;

    let season = seed_season(&test_app.db_pool).await;
    let competition_id =
        create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;

    make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/join", &test_app.address, competition_id),
        &member.token,
        None,
    )
    .await;

    let member_response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/competitions/{}", &test_app.address, competition_id),
        &member.token,
        None,
    )
    .await;
    assert_eq!(200, member_response.status().as_u16());

    let outsider_response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/competitions/{}", &test_app.address, competition_id),
        &outsider.token,
        None,
    )
    .await;
    assert_eq!(403, outsider_response.status().as_u16());
}

#[tokio::test]
async fn leaving_deactivates_membership_and_rejoining_restores_it() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let season = seed_season(&test_app.db_pool).await;
    let competition_id =
        create_competition(&test_app.db_pool, season.season_id, "Premier Tips 25/26").await;

    for _ in 0..2 {
        // Joining twice is an upsert, not an error
        let join = make_authenticated_request(
            &client,
            Method::POST,
            &format!("{}/competitions/{}/join", &test_app.address, competition_id),
            &user.token,
            None,
        )
        .await;
        assert!(join.status().is_success());
    }

    let leave = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/leave", &test_app.address, competition_id),
        &user.token,
        None,
    )
    .await;
    assert!(leave.status().is_success());

    // The membership row survives, deactivated
    let (is_active,) = sqlx::query_as::<_, (bool,)>(
        "SELECT is_active FROM competition_members WHERE user_id = $1 AND competition_id = $2",
    )
    .bind(user.user_id)
    .bind(competition_id)
    .fetch_one(&test_app.db_pool)
    .await
    .expect("Membership row should still exist");
    assert!(!is_active);

    let response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/competitions", &test_app.address),
        &user.token,
        None,
    )
    .await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Re-joining reactivates the same row
    let rejoin = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/competitions/{}/join", &test_app.address, competition_id),
        &user.token,
        None,
    )
    .await;
    assert!(rejoin.status().is_success());

    let response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/competitions", &test_app.address),
        &user.token,
        None,
    )
    .await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn joining_unknown_competition_returns_404() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!(
            "{}/competitions/{}/join",
            &test_app.address,
            uuid::Uuid::new_v4()
        ),
        &user.token,
        None,
    )
    .await;
    assert_eq!(404, response.status().as_u16());
}
