/// All primary keys are UUIDs, matching the identity provider's user ids.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts in minor currency units (cents).
pub type Cents = i64;
