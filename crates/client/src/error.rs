use thiserror::Error;

/// Failures raised when talking to the remote reservation service.
///
/// Every variant carries the remote message where one exists; callers report
/// it once and never retry.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reservation service rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("decoding response for {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
