/// All database primary keys are PostgreSQL BIGSERIAL.
///
/// Rows created in the local mirror while the database is unreachable get
/// negative ids so they can never collide with a database id.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (release dates, due dates) carry no time zone.
pub type Date = chrono::NaiveDate;

/// Monetary amounts are integer cents.
pub type Cents = i64;
