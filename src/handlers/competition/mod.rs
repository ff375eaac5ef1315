use actix_web::HttpResponse;
use serde_json::json;

use crate::competition::error::CompetitionError;

pub mod bet_handler;
pub mod competition_handler;
pub mod leaderboard_handler;
pub mod match_handler;

/// Map a service error onto the JSON error envelope.
pub(crate) fn error_response(error: CompetitionError, context: &str) -> HttpResponse {
    match error {
        CompetitionError::CompetitionNotFound
        | CompetitionError::MatchNotFound
        | CompetitionError::MembershipNotFound => HttpResponse::NotFound().json(json!({
            "success": false,
            "message": error.to_string()
        })),
        CompetitionError::AccessDenied => HttpResponse::Forbidden().json(json!({
            "success": false,
            "message": error.to_string()
        })),
        CompetitionError::MatchAlreadyDecided => HttpResponse::Conflict().json(json!({
            "success": false,
            "message": error.to_string()
        })),
        CompetitionError::Database(e) => {
            tracing::error!("{}: {}", context, e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Internal server error"
            }))
        }
    }
}
