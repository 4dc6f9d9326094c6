use thiserror::Error;

/// Failure to retrieve the feed. Terminal for the session: no partial data is shown.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed url '{url}' is invalid: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to fetch {url}: request timed out")]
    Timeout { url: String },
    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetch of {url} was cancelled")]
    Cancelled { url: String },
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failure to load or interpret the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
