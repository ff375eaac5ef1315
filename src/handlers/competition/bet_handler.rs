use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::competition::competition::CompetitionService;
use crate::handlers::competition::error_response;
use crate::middleware::auth::Claims;
use crate::models::bet::PlaceBetRequest;

/// Place or overwrite a bet on a match of the competition's season.
#[tracing::instrument(
    name = "Place bet",
    skip(pool, claims, request),
    fields(
        username = %claims.username,
        competition_id = %competition_id,
        match_id = %request.match_id
    )
)]
pub async fn place_bet(
    competition_id: Uuid,
    request: web::Json<PlaceBetRequest>,
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
    match service.place_bet(competition_id, user_id, &request).await {
        Ok(bet) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Bet placed",
            "data": bet
        }))),
        Err(e) => Ok(error_response(e, "Failed to place bet")),
    }
}
