use actix_web::{get, put, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::user_handler;
use crate::middleware::auth::Claims;
use crate::models::user::UpdateUserRequest;

/// List all users (public)
#[get("/users")]
pub async fn get_all_users(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    user_handler::get_all_users(pool).await
}

/// Update the authenticated user's profile
#[put("/me")]
pub async fn update_profile(
    request: web::Json<UpdateUserRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    user_handler::update_profile(request, pool, claims).await
}

/// Get a user's profile
#[get("/{user_id}")]
pub async fn get_user(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    user_handler::get_user(user_id, pool).await
}
