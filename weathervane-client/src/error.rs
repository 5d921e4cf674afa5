use thiserror::Error;

/// All errors a poll or control call can produce.
///
/// Every variant is absorbed at the poll boundary: log, skip the cycle,
/// keep the previously rendered state. Nothing here may cross into the
/// render loop as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("status endpoint returned HTTP {0}")]
    NonSuccess(u16),

    #[error("malformed status body: {0}")]
    Malformed(String),

    #[error("invalid base url: {0}")]
    BaseUrl(String),
}
