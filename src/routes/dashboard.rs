use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::dashboard_handler;
use crate::middleware::auth::Claims;

/// Matches to bet on soon across the user's competitions
#[get("/upcoming")]
pub async fn get_upcoming_matches(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    dashboard_handler::get_upcoming_matches(pool, claims).await
}

/// The user's overall prediction stats
#[get("/stats")]
pub async fn get_user_stats(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    dashboard_handler::get_user_stats(pool, claims).await
}

/// The user's most recent settled bets
#[get("/activity")]
pub async fn get_recent_activity(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    dashboard_handler::get_recent_activity(pool, claims).await
}
