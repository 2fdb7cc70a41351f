/// Failures a dashboard operation can produce.
///
/// `InvalidArgument` and `Disconnected` are returned synchronously to the
/// caller. The remaining variants only arise when a dispatch is applied on
/// the rendering thread.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("plot '{0}' does not exist")]
    NotFound(String),
    #[error("plot '{0}' already exists")]
    DuplicateKey(String),
    #[error("invalid subplot index {index} for plot '{id}' ({count} subplot(s))")]
    IndexOutOfRange {
        id: String,
        index: usize,
        count: usize,
    },
    #[error("plot '{0}' already holds data; subplots can only be set before plotting")]
    SubplotsLocked(String),
    #[error("dashboard is no longer accepting updates")]
    Disconnected,
}

impl DashboardError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        DashboardError::InvalidArgument(message.into())
    }
}
