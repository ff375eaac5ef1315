use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::competition::competition::CompetitionService;
use crate::handlers::competition::error_response;
use crate::middleware::auth::Claims;

/// List every active competition. Public, no membership required.
pub async fn get_available_competitions(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = CompetitionService::new(pool.get_ref().clone());

    match service.available_competitions().await {
        Ok(competitions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": competitions
        }))),
        Err(e) => Ok(error_response(e, "Failed to list available competitions")),
    }
}

/// List the competitions the user belongs to, with dashboard snapshots.
#[tracing::instrument(
    name = "Get user competitions",
    skip(pool, claims),
    fields(
        username = %claims.username
    )
)]
pub async fn get_user_competitions(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        tracing::error!("Invalid user ID in claims");
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let service = CompetitionService::new(pool.get_ref().clone());
    match service.user_competitions(user_id).await {
        Ok(competitions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": competitions
        }))),
        Err(e) => Ok(error_response(e, "Failed to list user competitions")),
    }
}

/// Competition detail for an active member.
pub async fn get_competition(
    competition_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let service = CompetitionService::new(pool.get_ref().clone());
    match service.competition_for_member(competition_id, user_id).await {
        Ok(competition) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": competition
        }))),
        Err(e) => Ok(error_response(e, "Failed to get competition")),
    }
}

#[tracing::instrument(
    name = "Join competition",
    skip(pool, claims),
    fields(
        username = %claims.username,
        competition_id = %competition_id
    )
)]
pub async fn join_competition(
    competition_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let service = CompetitionService::new(pool.get_ref().clone());
    match service.join_competition(user_id, competition_id).await {
        Ok(member) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Joined competition",
            "data": member
        }))),
        Err(e) => Ok(error_response(e, "Failed to join competition")),
    }
}

#[tracing::instrument(
    name = "Leave competition",
    skip(pool, claims),
    fields(
        username = %claims.username,
        competition_id = %competition_id
    )
)]
pub async fn leave_competition(
    competition_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let service = CompetitionService::new(pool.get_ref().clone());
    match service.leave_competition(user_id, competition_id).await {
        Ok(member) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Left competition",
            "data": member
        }))),
        Err(e) => Ok(error_response(e, "Failed to leave competition")),
    }
}
