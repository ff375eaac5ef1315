use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::competition::competition::CompetitionService;
use crate::competition::matches::DEFAULT_PAGE_SIZE;
use crate::handlers::competition::error_response;
use crate::middleware::auth::Claims;
use crate::models::competition::MatchPageQuery;
use crate::utils::cursor::parse_cursor;

/// Upcoming fixtures of the competition's season, grouped by matchday,
/// with the requesting user's own bets attached.
#[tracing::instrument(
    name = "Get competition fixtures",
    skip(pool, claims, query),
    fields(
        username = %claims.username,
        competition_id = %competition_id
    )
)]
pub async fn get_future_matches(
    competition_id: Uuid,
    query: web::Query<MatchPageQuery>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let cursor = parse_cursor(query.cursor.as_deref());
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let service = CompetitionService::new(pool.get_ref().clone());
    match service
        .future_matches(competition_id, user_id, cursor, limit)
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(error_response(e, "Failed to get fixtures")),
    }
}

/// Played matches of the competition's season, grouped by matchday, with
/// every member's bets attached.
#[tracing::instrument(
    name = "Get competition results",
    skip(pool, claims, query),
    fields(
        username = %claims.username,
        competition_id = %competition_id
    )
)]
pub async fn get_past_matches(
    competition_id: Uuid,
    query: web::Query<MatchPageQuery>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid user ID"
        })));
    };

    let cursor = parse_cursor(query.cursor.as_deref());
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let service = CompetitionService::new(pool.get_ref().clone());
    match service
        .past_matches(competition_id, user_id, cursor, limit)
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(error_response(e, "Failed to get results")),
    }
}
