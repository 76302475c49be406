//! Canned transport for unit tests.

use super::{HttpRequest, HttpResponse, Transport};
use crate::{TransportError, TransportErrorKind};
use reqwest::{Method, StatusCode, Url};
use std::collections::HashMap;
use std::sync::Mutex;

type Route = Result<HttpResponse, TransportError>;

/// Serves fixed responses keyed by method and URL, recording every request.
#[derive(Default)]
pub(crate) struct StubTransport {
    routes: HashMap<(Method, String), Route>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for `method` at the response's own URL.
    pub(crate) fn route(mut self, method: Method, response: HttpResponse) -> Self {
        self.routes
            .insert((method, response.url.to_string()), Ok(response));
        self
    }

    /// Fail `method` requests to `url` with a transport error.
    pub(crate) fn fail(mut self, method: Method, url: &str, kind: TransportErrorKind) -> Self {
        self.routes.insert(
            (method, Url::parse(url).unwrap().to_string()),
            Err(TransportError::new(kind, "stubbed failure")),
        );
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method.clone(), request.url.to_string());
        self.requests.lock().unwrap().push(request);
        self.routes.get(&key).cloned().unwrap_or_else(|| {
            Err(TransportError::new(
                TransportErrorKind::Connect,
                format!("no stub for {} {}", key.0, key.1),
            ))
        })
    }
}

/// Empty response at `url` with `status`.
pub(crate) fn response(url: &str, status: u16) -> HttpResponse {
    HttpResponse::new(
        Url::parse(url).unwrap(),
        StatusCode::from_u16(status).unwrap(),
    )
}

/// Redirect response at `url` pointing to `location`.
pub(crate) fn redirect(url: &str, status: u16, location: &str) -> HttpResponse {
    response(url, status).with_header("Location", location)
}
