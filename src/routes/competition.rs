use actix_web::{get, post, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::competition::{
    bet_handler, competition_handler, leaderboard_handler, match_handler,
};
use crate::middleware::auth::Claims;
use crate::models::bet::PlaceBetRequest;
use crate::models::competition::MatchPageQuery;

/// List all active competitions (public)
#[get("/competitions/available")]
pub async fn get_available_competitions(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    competition_handler::get_available_competitions(pool).await
}

/// List the competitions the authenticated user belongs to
#[get("")]
pub async fn get_user_competitions(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    competition_handler::get_user_competitions(pool, claims).await
}

/// Get a competition the user is a member of
#[get("/{competition_id}")]
pub async fn get_competition(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let competition_id = path.into_inner();
    competition_handler::get_competition(competition_id, pool, claims).await
}

/// Join (or re-join) a competition
#[post("/{competition_id}/join")]
pub async fn join_competition(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let competition_id = path.into_inner();
    competition_handler::join_competition(competition_id, pool, claims).await
}

/// Leave a competition
#[post("/{competition_id}/leave")]
pub async fn leave_competition(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let competition_id = path.into_inner();
    competition_handler::leave_competition(competition_id, pool, claims).await
}

/// Get upcoming fixtures with the user's own bets
#[get("/{competition_id}/matches/upcoming")]
pub async fn get_future_matches(
    path: web::Path<Uuid>,
    query: web::Query<MatchPageQuery>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let competition_id = path.into_inner();
    match_handler::get_future_matches(competition_id, query, pool, claims).await
}

/// Get played matches with everyone's bets
#[get("/{competition_id}/matches/results")]
pub async fn get_past_matches(
    path: web::Path<Uuid>,
    query: web::Query<MatchPageQuery>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let competition_id = path.into_inner();
    match_handler::get_past_matches(competition_id, query, pool, claims).await
}

/// Place or overwrite a bet
#[post("/{competition_id}/bets")]
pub async fn place_bet(
    path: web::Path<Uuid>,
    request: web::Json<PlaceBetRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let competition_id = path.into_inner();
    bet_handler::place_bet(competition_id, request, pool, claims).await
}

/// Get the competition leaderboard
#[get("/{competition_id}/leaderboard")]
pub async fn get_leaderboard(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let competition_id = path.into_inner();
    leaderboard_handler::get_leaderboard(competition_id, pool, claims).await
}
