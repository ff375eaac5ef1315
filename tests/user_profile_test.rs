use reqwest::{Client, Method};
use serde_json::json;

mod common;
use common::utils::{create_test_user_and_login, make_authenticated_request, spawn_app};

#[tokio::test]
async fn users_are_listed_publicly_without_email() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let response = client
        .get(format!("{}/users", &test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    let users = body["data"].as_array().unwrap();
    let listed = users
        .iter()
        .find(|u| u["username"] == user.username.as_str())
        .expect("Registered user should be listed");
    assert!(listed.get("email").is_none());
}

#[tokio::test]
async fn profile_lookup_requires_authentication() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let unauthenticated = client
        .get(format!("{}/users/{}", &test_app.address, user.user_id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, unauthenticated.status().as_u16());

    let response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/users/{}", &test_app.address, user.user_id),
        &user.token,
        None,
    )
    .await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], user.username.as_str());
}

#[tokio::test]
async fn users_can_update_their_own_profile() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let user = create_test_user_and_login(&test_app).await;

    let new_username = format!("renamed{}", uuid::Uuid::new_v4());
    let response = make_authenticated_request(
        &client,
        Method::PUT,
        &format!("{}/users/me", &test_app.address),
        &user.token,
        Some(json!({ "username": new_username })),
    )
    .await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], new_username.as_str());

    let saved = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to fetch user.");
    assert_eq!(saved, new_username);
}

#[tokio::test]
async fn taking_an_existing_username_is_rejected() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let first = create_test_user_and_login(&test_app).await;
    let second = create_test_user_and_login(&test_app).await;

    let response = make_authenticated_request(
        &client,
        Method::PUT,
        &format!("{}/users/me", &test_app.address),
        &second.token,
        Some(json!({ "username": first.username })),
    )
    .await;
    assert_eq!(409, response.status().as_u16());
}
