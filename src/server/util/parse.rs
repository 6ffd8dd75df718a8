use crate::server::error::{internal::InternalError, AppError};

/// Parses a Discord snowflake ID from its string form.
///
/// Discord serializes IDs as JSON strings; the service works with them as `u64`
/// and stores them as strings.
///
/// # Arguments
/// - `value` - The ID as returned by Discord or read from the database
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed ID
/// - `Err(AppError::InternalErr(ParseStringId))` - The value is not a valid `u64`
pub fn parse_discord_id(value: &str) -> Result<u64, AppError> {
    let id = value
        .parse::<u64>()
        .map_err(|source| InternalError::ParseStringId {
            value: value.to_string(),
            source,
        })?;

    Ok(id)
}
