//! Check options configuration.
//!
//! This module provides the [`CheckOptions`] struct for configuring
//! how targets are fetched and probed.

use std::time::Duration;

/// Configuration options for a Drupal check.
///
/// The same options apply to the primary page fetch and to the
/// `/misc/drupal.js` probe.
///
/// # Default Behavior
///
/// Both the connect timeout and the total request timeout default to
/// 5 seconds, and at most 5 redirects are followed per request. Slow
/// targets behind several proxies may need longer timeouts.
///
/// # Example
///
/// ```rust
/// use drupal_probe::CheckOptions;
/// use std::time::Duration;
///
/// // Use default options (5 second timeouts, 5 redirects)
/// let opts = CheckOptions::default();
///
/// // Use a longer total timeout
/// let opts = CheckOptions {
///     timeout: Duration::from_secs(15),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Maximum time allowed to establish a connection.
    ///
    /// Default: 5 seconds
    pub connect_timeout: Duration,

    /// Maximum time allowed for a whole request, body included.
    ///
    /// Each hop of a redirect chain is a separate request with its
    /// own timeout.
    ///
    /// Default: 5 seconds
    pub timeout: Duration,

    /// Maximum number of redirects followed per request.
    ///
    /// Default: 5
    pub max_redirects: usize,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
            max_redirects: 5,
            user_agent: concat!("drupal-probe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
