//! HTTP client used for remote result submission.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{LauncherError, Result};

/// User agent string identifying this launcher.
const USER_AGENT: &str = concat!("bdd-launcher/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Turn a non-success response into a `RemoteApi` error carrying the body.
pub fn check_response(service: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    Err(LauncherError::RemoteApi {
        service: service.to_string(),
        status: status.as_u16(),
        message,
    })
}

/// Append path segments to an API base URL.
///
/// Each segment is percent-encoded on its own, so a `/` inside a segment
/// never introduces a new path level.
pub fn endpoint_url(service: &str, base: &str, segments: &[&str]) -> Result<Url> {
    let invalid = |message: String| LauncherError::InvalidEndpoint {
        service: service.to_string(),
        url: base.to_string(),
        message,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
