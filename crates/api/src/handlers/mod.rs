//! Request handlers.
//!
//! Each submodule handles one area of the API. Handlers delegate to the
//! repositories in `wishdrop_db` and the rules in `wishdrop_core`, and map
//! errors via [`AppError`](crate::error::AppError).

pub mod badges;
pub mod donations;
pub mod leaderboard;
pub mod notifications;
pub mod profiles;
pub mod reports;
pub mod wishes;
