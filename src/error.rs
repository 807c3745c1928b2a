//! Unified error type.

use crate::store::StoreError;

/// The error type returned by [`app::run`](crate::app::run).
///
/// Request-level failures (bad JSON, unknown ids, unknown routes) are HTTP
/// [`Response`](crate::Response) values, not `Error`s. This type surfaces
/// what stops the process once it is configured: an unreachable database or
/// a port that cannot be bound. Bad configuration is a
/// [`ConfigError`](crate::config::ConfigError), raised before any of this.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("store: {0}")]
    Store(#[from] StoreError),
}
