/// Errors that can occur constructing a poller.
///
/// Construction is the only operation that surfaces a hard failure:
/// runtime I/O trouble and protocol anomalies are logged and handled
/// locally so the event loop never terminates except by cancellation.
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    /// The channel or wake signal could not be created.
    #[error(transparent)]
    Channel(#[from] jrklink_channel::ChannelError),
}

pub type Result<T> = std::result::Result<T, PollerError>;
