//! WishDrop domain logic.
//!
//! Everything in this crate is pure: no I/O, no async, no framework
//! types. The database and API crates fetch rows, convert them into the
//! plain inputs defined here, and hand the derived values to clients.

pub mod badges;
pub mod donation;
pub mod error;
pub mod funding;
pub mod karma;
pub mod leaderboard;
pub mod roles;
pub mod types;
pub mod wish;
