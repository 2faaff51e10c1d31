//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any Postgres executor, for calls that run
//! inside a transaction) as the first argument.

pub mod badge_repo;
pub mod donation_repo;
pub mod profile_repo;
pub mod report_repo;
pub mod thank_you_repo;
pub mod wish_repo;

pub use badge_repo::BadgeRepo;
pub use donation_repo::DonationRepo;
pub use profile_repo::ProfileRepo;
pub use report_repo::ReportRepo;
pub use thank_you_repo::ThankYouRepo;
pub use wish_repo::WishRepo;

/// Default page size for list queries.
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 200;

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `%term%` pattern for a substring `ILIKE` match.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}
