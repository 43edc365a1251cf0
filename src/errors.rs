use thiserror::Error;

/// Failure to obtain a decodable answer from an endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} answered with HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("{path} returned an unreadable body: {message}")]
    Decode { path: String, message: String },
}

#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("no {kind} control matches {key:?}")]
    ControlNotFound { kind: &'static str, key: String },
    #[error("element is not a bound toggle control")]
    Unbound,
    #[error("control is missing data-{0}")]
    MissingAttribute(&'static str),
    #[error("control has invalid data-{attribute}: {value:?}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },
    #[error("page snapshot: {0}")]
    Storage(#[from] std::io::Error),
    #[error("page snapshot is not valid JSON: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
