use chrono::{DateTime, TimeDelta, Utc};
use twilight_model::id::Id;

/// Milliseconds from the Unix epoch to the Discord epoch (2015-01-01T00:00:00Z).
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

const TIMESTAMP_SHIFT: u32 = 22;

/// Creation time encoded in a snowflake.
pub fn snowflake_to_timestamp(snowflake: u64) -> DateTime<Utc> {
    let since_discord_epoch = (snowflake >> TIMESTAMP_SHIFT) as i64;
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(DISCORD_EPOCH_MS + since_discord_epoch)
}

/// Creation time of any typed Discord ID.
pub fn id_timestamp<T>(id: Id<T>) -> DateTime<Utc> {
    snowflake_to_timestamp(id.get())
}

/// Largest millisecond offset a snowflake's timestamp bits can hold.
const MAX_TIMESTAMP_MS: u64 = u64::MAX >> TIMESTAMP_SHIFT;

/// The smallest snowflake created at `time`, for use as a `before`/`after` bound.
///
/// Times before the Discord epoch clamp to zero; times past the last
/// representable millisecond clamp to it.
pub fn timestamp_to_snowflake(time: DateTime<Utc>) -> u64 {
    let since_discord_epoch = time.timestamp_millis().saturating_sub(DISCORD_EPOCH_MS);
    u64::try_from(since_discord_epoch)
        .map_or(0, |millis| millis.min(MAX_TIMESTAMP_MS) << TIMESTAMP_SHIFT)
}
