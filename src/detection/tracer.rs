//! Redirect-following requests with full hop history.

use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::CheckError;
use reqwest::header::{HeaderValue, REFERER};
use reqwest::{Method, StatusCode, Url};
use tracing::debug;

/// One response received while following a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// URL that was requested.
    pub url: Url,
    /// Status code it answered with.
    pub status: StatusCode,
}

/// Why a trace ended in error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFailure {
    /// The server answered, but with an unacceptable terminal status.
    BadResponse,
    /// No usable response: connection failure, bad location, redirect loop.
    RequestFailure,
}

/// Outcome of one traced request.
///
/// `hops` holds one entry per response received, so the last hop always
/// describes `response` when one exists.
#[derive(Debug, Clone)]
pub struct TraceResult {
    /// The URL the trace started from.
    pub location: Url,
    /// Every (URL, status) pair in the order received.
    pub hops: Vec<Hop>,
    /// The final response, if any was received.
    pub response: Option<HttpResponse>,
    /// Set when the trace did not end in an acceptable response.
    pub error: Option<CheckError>,
}

impl TraceResult {
    /// URL of the last response received, or the starting location.
    pub fn effective_url(&self) -> &Url {
        self.hops.last().map_or(&self.location, |hop| &hop.url)
    }

    /// Status of the last response received.
    pub fn last_status(&self) -> Option<StatusCode> {
        self.hops.last().map(|hop| hop.status)
    }

    /// Whether the trace ended in error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Failure category, if the trace ended in error.
    pub fn reason(&self) -> Option<TraceFailure> {
        self.error.as_ref().map(|err| match err {
            CheckError::BadResponse { .. } => TraceFailure::BadResponse,
            _ => TraceFailure::RequestFailure,
        })
    }

    /// Raw status code of the final response, or `0` without one.
    pub fn code(&self) -> u16 {
        self.response.as_ref().map_or(0, |r| r.status.as_u16())
    }

    /// Convert into the final response, or the error that ended the trace.
    pub fn into_result(self) -> Result<HttpResponse, CheckError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let location = self.location;
        self.response
            .ok_or_else(|| CheckError::request(location.as_str(), "no response received"))
    }
}

/// Issues requests through a [`Transport`] and follows redirects by hand.
///
/// Redirect rules:
///
/// - a 3xx response with a `Location` header is followed, relative
///   locations resolved against the current URL
/// - the redirect limit is enforced before the target scheme is checked
/// - the request method is kept on every hop
/// - only `http` and `https` targets are followed
/// - with referer propagation on, each hop carries the previous URL as
///   `Referer` unless the scheme changes
/// - statuses of 400 and above end the trace as a bad response
pub struct RedirectTracer<'a, T> {
    transport: &'a T,
    max_redirects: usize,
    referer: bool,
}

impl<'a, T: Transport> RedirectTracer<'a, T> {
    /// Create a tracer that follows at most `max_redirects` redirects and
    /// propagates `Referer`.
    pub fn new(transport: &'a T, max_redirects: usize) -> Self {
        Self {
            transport,
            max_redirects,
            referer: true,
        }
    }

    /// Disable `Referer` propagation.
    pub fn without_referer(mut self) -> Self {
        self.referer = false;
        self
    }

    /// Replace the path of `base` with `path` and follow the resulting URL.
    pub async fn trace(&self, base: &Url, path: &str, method: Method) -> TraceResult {
        let mut location = base.clone();
        location.set_path(path);
        self.follow(method, location).await
    }

    /// Request `location` and follow redirects from it.
    pub async fn follow(&self, method: Method, location: Url) -> TraceResult {
        let mut trace = TraceResult {
            location: location.clone(),
            hops: Vec::new(),
            response: None,
            error: None,
        };
        let mut current = location;
        let mut referer: Option<HeaderValue> = None;

        loop {
            let mut request = HttpRequest::new(method.clone(), current.clone());
            if let Some(value) = referer.take() {
                request.headers.insert(REFERER, value);
            }

            let response = match self.transport.send(request).await {
                Ok(response) => response,
                Err(err) => {
                    debug!(url = %current, error = %err, "request failed");
                    trace.error = Some(CheckError::transport(current.as_str(), err));
                    return trace;
                }
            };

            debug!(url = %current, status = response.status.as_u16(), "received response");
            trace.hops.push(Hop {
                url: current.clone(),
                status: response.status,
            });

            let Some(next) = response.redirect_location().map(|loc| current.join(&loc)) else {
                if response.status.is_client_error() || response.status.is_server_error() {
                    trace.error = Some(CheckError::BadResponse {
                        url: current.to_string(),
                        status: response.status.as_u16(),
                    });
                }
                trace.response = Some(response);
                return trace;
            };

            let status = response.status.as_u16();
            trace.response = Some(response);

            let next = match next {
                Ok(next) => next,
                Err(err) => {
                    trace.error = Some(CheckError::request(
                        current.as_str(),
                        format!("invalid redirect location: {err}"),
                    ));
                    return trace;
                }
            };

            if trace.hops.len() > self.max_redirects {
                trace.error = Some(CheckError::request(
                    current.as_str(),
                    format!("will not follow more than {} redirects", self.max_redirects),
                ));
                return trace;
            }

            if !matches!(next.scheme(), "http" | "https") {
                debug!(from = %current, to = %next, "refusing redirect to unsupported scheme");
                trace.error = Some(CheckError::BadResponse {
                    url: current.to_string(),
                    status,
                });
                return trace;
            }

            referer = if self.referer && next.scheme() == current.scheme() {
                referer_value(&current)
            } else {
                None
            };
            current = next;
        }
    }
}

/// `Referer` value for `url`, without credentials or fragment.
fn referer_value(url: &Url) -> Option<HeaderValue> {
    let mut url = url.clone();
    // Both setters only fail for URLs that cannot carry credentials.
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.set_fragment(None);
    HeaderValue::from_str(url.as_str()).ok()
}
