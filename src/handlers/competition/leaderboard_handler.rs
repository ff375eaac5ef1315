use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::competition::competition::CompetitionService;
use crate::handlers::competition::error_response;
use crate::middleware::auth::Claims;

/// Ranked leaderboard of the competition, recomputed on every read from
/// the full set of decided matches.
#[tracing::instrument(
    name = "Get competition leaderboard",
    skip(pool, claims),
    fields(
        username = %claims.username,
        competition_id = %competition_id
    )
)]
pub async fn get_leaderboard(
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
    match service.leaderboard(competition_id, user_id).await {
        Ok(leaderboard) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": leaderboard
        }))),
        Err(e) => Ok(error_response(e, "Failed to compute leaderboard")),
    }
}
