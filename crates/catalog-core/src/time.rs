use time::OffsetDateTime;

/// Current UTC time, truncated to whole seconds.
///
/// Records round-trip through JSON (cache entries, API responses) as
/// RFC 3339; truncation keeps a cached copy equal to the stored one.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}
