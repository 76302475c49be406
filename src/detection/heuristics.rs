//! Evaluation of the six heuristics against a fetched page.

use super::tracer::{RedirectTracer, TraceResult};
use super::version::{first_digit, meta_generator};
use crate::transport::{HttpResponse, Transport};
use crate::{Finding, Heuristic};
use reqwest::{Method, StatusCode, Url};
use tracing::debug;

/// `Expires` value Drupal's page cache sends: Dries Buytaert's birthday.
const EXPIRES_SIGNATURE: &str = "Sun, 19 Nov 1978 05:00:00 GMT";

/// Inline settings marker, lowercased for ASCII case-insensitive search.
const SETTINGS_MARKER: &str = "jquery.extend(drupal.settings";

/// Core script shipped with every Drupal 7 and earlier install.
const PROBE_PATH: &str = "/misc/drupal.js";

/// Read-only inputs shared by every heuristic in one run.
pub(crate) struct Evidence<'a, T> {
    pub target: &'a Url,
    pub response: &'a HttpResponse,
    pub tracer: &'a RedirectTracer<'a, T>,
}

impl Heuristic {
    /// Run this heuristic.
    pub(crate) async fn evaluate<T: Transport>(self, evidence: &Evidence<'_, T>) -> Finding {
        let response = evidence.response;
        match self {
            Self::ExpiresHeader => expires_header(response),
            Self::DrupalSettings => drupal_settings(response),
            Self::MiscDrupalJs => misc_drupal_js(evidence.target, evidence.tracer).await,
            Self::XGeneratorHeader => x_generator_header(response),
            Self::XDrupalCacheHeader => x_drupal_cache_header(response),
            Self::BodyMetaGenerator => body_meta_generator(response),
        }
    }
}

fn expires_header(response: &HttpResponse) -> Finding {
    Finding::from(response.header_line("Expires") == EXPIRES_SIGNATURE)
}

fn drupal_settings(response: &HttpResponse) -> Finding {
    Finding::from(
        response
            .text()
            .to_ascii_lowercase()
            .contains(SETTINGS_MARKER),
    )
}

async fn misc_drupal_js<T: Transport>(target: &Url, tracer: &RedirectTracer<'_, T>) -> Finding {
    let trace = tracer.trace(&site_root(target), PROBE_PATH, Method::HEAD).await;
    Finding::from(probe_confirms(&trace))
}

/// The probe counts only if it ended without error, on the probed path,
/// with a 200, and not on an ASP.NET server.
///
/// Only the final response's `X-Powered-By` values are inspected. A value
/// counts when it contains `ASP.NET` anywhere, so `ASP.NET, PHP/8.1` is
/// excluded too, where an exact whole-value comparison would let it pass.
fn probe_confirms(trace: &TraceResult) -> bool {
    if let Some(err) = &trace.error {
        // A failed probe only fails this heuristic.
        debug!(url = %trace.location, error = %err, "asset probe failed");
        return false;
    }
    let Some(response) = &trace.response else {
        return false;
    };

    let asp_net = response
        .header_values("X-Powered-By")
        .any(|value| value.contains("ASP.NET"));

    trace.effective_url().path() == PROBE_PATH
        && trace.last_status() == Some(StatusCode::OK)
        && !asp_net
}

/// Scheme, host and port of `target` with an empty path.
fn site_root(target: &Url) -> Url {
    let mut root = target.clone();
    root.set_path("");
    root.set_query(None);
    root.set_fragment(None);
    root
}

fn x_generator_header(response: &HttpResponse) -> Finding {
    let generator = response.header_line("X-Generator");
    if generator.contains("Drupal") {
        Finding::passed(first_digit(&generator))
    } else {
        Finding::failed()
    }
}

fn x_drupal_cache_header(response: &HttpResponse) -> Finding {
    Finding::from(!response.header_line("X-Drupal-Cache").is_empty())
}

fn body_meta_generator(response: &HttpResponse) -> Finding {
    let body = response.text();
    match meta_generator(&body) {
        Some(tag) => Finding::passed(first_digit(tag)),
        None => Finding::failed(),
    }
}
