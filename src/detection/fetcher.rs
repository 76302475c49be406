//! Primary page fetch.

use super::tracer::RedirectTracer;
use crate::transport::{HttpResponse, Transport};
use crate::{CheckError, CheckOptions};
use reqwest::{Method, Url};

/// Parse and validate a target URL.
///
/// Targets must be absolute `http` or `https` URLs with a host.
pub(crate) fn parse_target(target: &str) -> Result<Url, CheckError> {
    let url = Url::parse(target.trim())
        .map_err(|e| CheckError::request(target, format!("invalid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CheckError::request(
            target,
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(CheckError::request(target, "URL has no host"));
    }

    Ok(url)
}

/// Fetches the page under test exactly once.
///
/// Redirects are followed without `Referer`, and any status of 400 or
/// above counts as a failed fetch. There are no retries.
pub struct PageFetcher<'a, T> {
    tracer: RedirectTracer<'a, T>,
}

impl<'a, T: Transport> PageFetcher<'a, T> {
    /// Create a fetcher using `options.max_redirects`.
    pub fn new(transport: &'a T, options: &CheckOptions) -> Self {
        Self {
            tracer: RedirectTracer::new(transport, options.max_redirects).without_referer(),
        }
    }

    /// GET `target`, returning the final response or the error that ended
    /// the request.
    pub async fn fetch(&self, target: &Url) -> Result<HttpResponse, CheckError> {
        self.tracer
            .follow(Method::GET, target.clone())
            .await
            .into_result()
    }
}
