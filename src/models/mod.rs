pub mod auth;
pub mod bet;
pub mod competition;
pub mod football;
pub mod leaderboard;
pub mod user;
