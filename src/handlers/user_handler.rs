use actix_web::{web, HttpResponse, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::models::user::UpdateUserRequest;

#[derive(Debug, FromRow, Serialize)]
struct UserProfileRow {
    id: Uuid,
    username: String,
    email: String,
    profile_picture_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
struct UserListRow {
    id: Uuid,
    username: String,
    profile_picture_url: Option<String>,
    created_at: DateTime<Utc>,
}

/// Get a user's profile by id.
pub async fn get_user(
    user_id: Uuid,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let user = sqlx::query_as::<_, UserProfileRow>(
        r#"
        SELECT id, username, email, profile_picture_url, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await;

    match user {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "User not found"
        }))),
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", user_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to fetch user"
            })))
        }
    }
}

/// List users, newest first. Only public fields.
pub async fn get_all_users(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let users = sqlx::query_as::<_, UserListRow>(
        r#"
        SELECT id, username, profile_picture_url, created_at
        FROM users
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await;

    match users {
        Ok(users) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": users
        }))),
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to list users"
            })))
        }
    }
}

/// Update the authenticated user's own profile.
#[tracing::instrument(
    name = "Update user profile",
    skip(pool, claims, request),
    fields(
        username = %claims.username
    )
)]
pub async fn update_profile(
    request: web::Json<UpdateUserRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let updated = sqlx::query_as::<_, UserProfileRow>(
        r#"
        UPDATE users
        SET username = COALESCE($1, username),
            email = COALESCE($2, email),
            updated_at = NOW()
        WHERE id = $3
        RETURNING id, username, email, profile_picture_url, created_at, updated_at
        "#,
    )
    .bind(&request.username)
    .bind(&request.email)
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await;

    match updated {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Profile updated",
            "data": user
        }))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "User not found"
        }))),
        Err(e) if is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(json!({
            "success": false,
            "message": "Username or email already taken"
        }))),
        Err(e) => {
            tracing::error!("Failed to update profile for {}: {}", user_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to update profile"
            })))
        }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(e) if e.code().as_deref() == Some("23505")
    )
}
