use actix_web::web;

pub mod auth;
pub mod backend_health;
pub mod competition;
pub mod dashboard;
pub mod registration;
pub mod user;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login)
        // Public listings; must be registered before the scopes below so
        // the exact paths win over the parameterized routes
        .service(competition::get_available_competitions)
        .service(user::get_all_users);

    // Competition routes (require authentication)
    cfg.service(
        web::scope("/competitions")
            .wrap(AuthMiddleware)
            .service(competition::get_user_competitions)
            .service(competition::get_competition)
            .service(competition::join_competition)
            .service(competition::leave_competition)
            .service(competition::get_future_matches)
            .service(competition::get_past_matches)
            .service(competition::place_bet)
            .service(competition::get_leaderboard),
    );
    // Dashboard routes (require authentication)
    cfg.service(
        web::scope("/dashboard")
            .wrap(AuthMiddleware)
            .service(dashboard::get_upcoming_matches)
            .service(dashboard::get_user_stats)
            .service(dashboard::get_recent_activity),
    );
    // User routes (require authentication)
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware)
            .service(user::update_profile)
            .service(user::get_user),
    );
}
