use time::OffsetDateTime;

/// Current unix timestamp in seconds, the unit every table stores.
pub fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
