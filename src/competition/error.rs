use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompetitionError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("competition not found")]
    CompetitionNotFound,

    #[error("match not found")]
    MatchNotFound,

    #[error("user is not an active member of this competition")]
    AccessDenied,

    #[error("membership not found")]
    MembershipNotFound,

    #[error("match has already been played")]
    MatchAlreadyDecided,
}

pub type Result<T> = std::result::Result<T, CompetitionError>;
