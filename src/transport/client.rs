//! Production transport backed by `reqwest`.

use super::{HttpRequest, HttpResponse, Transport};
use crate::{CheckOptions, TransportError, TransportErrorKind};
use reqwest::redirect::Policy;
use tracing::debug;

/// [`Transport`] implementation using a shared `reqwest::Client`.
///
/// The client applies the connect and total timeouts from
/// [`CheckOptions`] and never follows redirects on its own.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from check options.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportErrorKind::Build`] error if the TLS backend or
    /// the client configuration cannot be initialized.
    pub fn new(options: &CheckOptions) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout)
            .redirect(Policy::none())
            .user_agent(options.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Build, e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .send()
            .await?;

        let url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            url,
            status,
            headers,
            body,
        })
    }
}
