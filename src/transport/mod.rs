//! HTTP capability consumed by the detector.
//!
//! A [`Transport`] sends exactly one request and hands back whatever the
//! server answered. Redirects are never followed here; hop handling lives in
//! the redirect tracer so every hop can be recorded.

mod client;
#[cfg(test)]
pub(crate) mod stub;

pub use client::ReqwestTransport;

use crate::TransportError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION, REFERER};
use reqwest::{Method, StatusCode, Url};
use std::borrow::Cow;
use std::future::Future;

/// A single outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method, `GET` or `HEAD` in practice.
    pub method: Method,
    /// Absolute URL to request.
    pub url: Url,
    /// Extra request headers.
    pub headers: HeaderMap,
}

impl HttpRequest {
    /// Create a request without extra headers.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
        }
    }

    /// The `Referer` header carried by this request, if any.
    pub fn referer(&self) -> Option<&str> {
        self.headers.get(REFERER).and_then(|v| v.to_str().ok())
    }
}

/// A response received from a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// URL this response was served from.
    pub url: Url,
    /// Response status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body bytes. Empty for `HEAD` requests.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create an empty response with the given status.
    pub fn new(url: Url, status: StatusCode) -> Self {
        Self {
            url,
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Append a header value.
    ///
    /// Names or values that are not valid HTTP tokens are skipped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Every value of a header, decoded lossily.
    pub fn header_values<'a>(&'a self, name: &str) -> impl Iterator<Item = Cow<'a, str>> + 'a {
        self.headers
            .get_all(name)
            .into_iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }

    /// All values of a header joined with `", "`; empty when absent.
    pub fn header_line(&self, name: &str) -> String {
        self.header_values(name).collect::<Vec<_>>().join(", ")
    }

    /// The body decoded lossily as UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// The `Location` target when this response is a redirect.
    ///
    /// Non-ASCII bytes are decoded lossily so the location still resolves;
    /// `Url::join` percent-encodes them.
    pub(crate) fn redirect_location(&self) -> Option<Cow<'_, str>> {
        if !self.status.is_redirection() {
            return None;
        }
        self.headers
            .get(LOCATION)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }
}

/// Injectable HTTP capability.
///
/// Implementations send one request, do not follow redirects, and map
/// every failure that leaves no response behind into a [`TransportError`].
/// Non-2xx statuses are ordinary responses at this layer.
pub trait Transport: Send + Sync {
    /// Send a single request.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_header_line_joins_values() {
        let response = HttpResponse::new(url("https://example.com/"), StatusCode::OK)
            .with_header("Cache-Control", "no-cache")
            .with_header("cache-control", "must-revalidate");
        assert_eq!(
            response.header_line("cache-control"),
            "no-cache, must-revalidate"
        );
    }

    #[test]
    fn test_header_line_missing_is_empty() {
        let response = HttpResponse::new(url("https://example.com/"), StatusCode::OK);
        assert_eq!(response.header_line("Expires"), "");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(url("https://example.com/"), StatusCode::OK)
            .with_header("X-Generator", "Drupal 10");
        assert_eq!(response.header_line("x-generator"), "Drupal 10");
        assert_eq!(response.header_line("X-GENERATOR"), "Drupal 10");
    }

    #[test]
    fn test_invalid_header_is_skipped() {
        let response = HttpResponse::new(url("https://example.com/"), StatusCode::OK)
            .with_header("bad header", "value");
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_text_is_lossy() {
        let response = HttpResponse::new(url("https://example.com/"), StatusCode::OK)
            .with_body(vec![b'o', b'k', 0xff]);
        assert_eq!(response.text(), "ok\u{fffd}");
    }

    #[test]
    fn test_redirect_location_requires_3xx() {
        let redirect = HttpResponse::new(url("https://example.com/"), StatusCode::FOUND)
            .with_header("Location", "/next");
        assert_eq!(redirect.redirect_location().as_deref(), Some("/next"));

        let ok = HttpResponse::new(url("https://example.com/"), StatusCode::OK)
            .with_header("Location", "/next");
        assert_eq!(ok.redirect_location(), None);

        let bare = HttpResponse::new(url("https://example.com/"), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(bare.redirect_location(), None);
    }

    #[test]
    fn test_redirect_location_with_raw_utf8() {
        let mut redirect = HttpResponse::new(url("https://example.com/"), StatusCode::MOVED_PERMANENTLY);
        redirect
            .headers
            .insert(LOCATION, HeaderValue::from_bytes(b"/caf\xc3\xa9").unwrap());
        assert_eq!(redirect.redirect_location().as_deref(), Some("/caf\u{e9}"));
    }

    #[test]
    fn test_request_referer() {
        let mut request = HttpRequest::new(Method::HEAD, url("https://example.com/a"));
        assert_eq!(request.referer(), None);
        request
            .headers
            .insert(REFERER, HeaderValue::from_static("https://example.com/"));
        assert_eq!(request.referer(), Some("https://example.com/"));
    }
}
