use std::time::Duration;

use reqwest::Client;
use tracing::error;

use crate::error::HttpError;

/// Connection-level settings shared by every fetch of a run.
#[derive(Debug, Clone, Copy)]
pub struct ClientSettings {
    pub request_timeout: Duration,
    pub max_connections: usize,
}

/// Builds the HTTP client shared by all workers.
///
/// Cookies are not stored by the client; each worker carries its own cookie
/// string on its requests.
///
/// # Errors
///
/// Returns an error when the underlying client cannot be constructed.
pub fn build_client(settings: ClientSettings) -> Result<Client, HttpError> {
    Client::builder()
        .timeout(settings.request_timeout)
        .pool_max_idle_per_host(settings.max_connections)
        .build()
        .map_err(|err| {
            error!("Failed to build HTTP client: {}", err);
            HttpError::BuildClientFailed { source: err }
        })
}
