use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// A configured endpoint or redirect URI is not a valid absolute URL.
    #[error("Invalid URL for {name}: {source}")]
    InvalidUrl {
        /// Which setting held the bad value
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}
