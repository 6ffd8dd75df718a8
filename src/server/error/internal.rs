use std::num::ParseIntError;
use thiserror::Error;

/// Data that should never be malformed but was, from Discord or the token store.
#[derive(Error, Debug)]
pub enum InternalError {
    /// A Discord ID was not a valid snowflake.
    ///
    /// Discord sends IDs as strings and the token store keeps them that way, so this
    /// surfaces when either holds something other than a `u64`. Reported to the client
    /// as a generic 500.
    #[error("Invalid Discord ID '{value}': {source}")]
    ParseStringId {
        value: String,
        #[source]
        source: ParseIntError,
    },
}
