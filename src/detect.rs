//! Drupal check orchestration.

use crate::detection::{parse_target, Evidence, PageFetcher, RedirectTracer};
use crate::transport::{ReqwestTransport, Transport};
use crate::{CheckError, CheckOptions, Finding, Heuristic, Phase, Report, ResultMap, TransportError};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// State of one check while it runs.
///
/// Heuristics never touch this directly: each returns a [`Finding`] and
/// the runner merges it here.
struct RunContext {
    target: String,
    phase: Phase,
    results: ResultMap,
    is_drupal: bool,
    version: Option<u8>,
    errors: Vec<CheckError>,
}

impl RunContext {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            phase: Phase::Unstarted,
            results: ResultMap::default(),
            is_drupal: false,
            version: None,
            errors: Vec::new(),
        }
    }

    fn advance(&mut self, phase: Phase) {
        debug!(url = %self.target, from = ?self.phase, to = ?phase, "check phase");
        self.phase = phase;
    }

    fn fail(&mut self, error: CheckError) {
        warn!(url = %self.target, error = %error, "could not fetch target");
        self.errors.push(error);
        self.advance(Phase::FetchFailed);
    }

    fn record(&mut self, heuristic: Heuristic, finding: Finding) {
        debug!(
            url = %self.target,
            heuristic = heuristic.name(),
            outcome = finding.outcome.as_str(),
            version = ?finding.version,
            "heuristic finished"
        );
        self.results.insert(heuristic, finding.outcome);
        if finding.outcome.is_passed() {
            self.is_drupal = true;
            // The first extracted digit wins.
            if heuristic.extracts_version() && self.version.is_none() {
                self.version = finding.version;
            }
        }
    }

    fn finish(self) -> Report {
        debug_assert!(self.phase.is_terminal(), "report built in phase {:?}", self.phase);
        if self.phase == Phase::Completed {
            info!(
                url = %self.target,
                is_drupal = self.is_drupal,
                version = ?self.version,
                "check completed"
            );
        }
        Report::new(
            self.target,
            self.phase,
            self.results,
            self.version,
            self.errors,
        )
    }
}

/// Runs Drupal checks through a [`Transport`].
///
/// A detector holds no per-check state, so one instance can drive any
/// number of checks, concurrently or not.
///
/// # Example
///
/// ```rust,no_run
/// use drupal_probe::{CheckOptions, Detector};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let detector = Detector::new(CheckOptions::default()).expect("client");
///     let report = detector.check("https://example.com").await;
///     println!("drupal: {}", report.is_drupal());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Detector<T = ReqwestTransport> {
    transport: T,
    options: CheckOptions,
}

impl Detector<ReqwestTransport> {
    /// Create a detector backed by [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn new(options: CheckOptions) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&options)?;
        Ok(Self::with_transport(transport, options))
    }
}

impl<T: Transport> Detector<T> {
    /// Create a detector using a custom transport.
    pub fn with_transport(transport: T, options: CheckOptions) -> Self {
        Self { transport, options }
    }

    /// Options this detector was created with.
    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Check a single target.
    ///
    /// # Check Process
    ///
    /// 1. Parse the target and GET it once, following redirects
    /// 2. On failure, record the error and stop with no results
    /// 3. Otherwise run all six heuristics in order against the page,
    ///    issuing the `HEAD /misc/drupal.js` probe along the way
    ///
    /// This never fails: every error ends up in [`Report::errors`] or as a
    /// failed heuristic.
    pub async fn check(&self, target: &str) -> Report {
        let mut ctx = RunContext::new(target);
        ctx.advance(Phase::Fetching);

        let url = match parse_target(target) {
            Ok(url) => url,
            Err(err) => {
                ctx.fail(err);
                return ctx.finish();
            }
        };

        let fetcher = PageFetcher::new(&self.transport, &self.options);
        let response = match fetcher.fetch(&url).await {
            Ok(response) => response,
            Err(err) => {
                ctx.fail(err);
                return ctx.finish();
            }
        };

        ctx.advance(Phase::Evaluating);
        let tracer = RedirectTracer::new(&self.transport, self.options.max_redirects);
        let evidence = Evidence {
            target: &url,
            response: &response,
            tracer: &tracer,
        };
        for heuristic in Heuristic::all() {
            if heuristic.probes_network() {
                debug!(url = %url, heuristic = heuristic.name(), "probing site root");
            }
            let finding = heuristic.evaluate(&evidence).await;
            ctx.record(heuristic, finding);
        }

        ctx.advance(Phase::Completed);
        ctx.finish()
    }

    /// Check several targets concurrently, returning reports in input order.
    pub async fn check_all<I, S>(&self, targets: I) -> Vec<Report>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets: Vec<S> = targets.into_iter().collect();
        join_all(targets.iter().map(|t| self.check(t.as_ref()))).await
    }
}

/// Report for a target that could not be checked because no client exists.
fn unavailable(target: &str, err: TransportError) -> Report {
    let mut ctx = RunContext::new(target);
    ctx.advance(Phase::Fetching);
    ctx.fail(CheckError::transport(target, err));
    ctx.finish()
}

/// Check a target with default options.
///
/// # Example
///
/// ```rust,no_run
/// use drupal_probe::check;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let report = check("https://www.drupal.org").await;
///     println!("{}: {}", report.target(), report.is_drupal());
/// }
/// ```
pub async fn check(target: &str) -> Report {
    check_with_options(target, CheckOptions::default()).await
}

/// Check a target with custom options.
pub async fn check_with_options(target: &str, options: CheckOptions) -> Report {
    match Detector::new(options) {
        Ok(detector) => detector.check(target).await,
        Err(err) => unavailable(target, err),
    }
}

/// Check several targets concurrently with default options.
///
/// Checks share one HTTP client but no other state. The total time is
/// roughly that of the slowest target.
///
/// # Example
///
/// ```rust,no_run
/// use drupal_probe::check_all;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let reports = check_all(["https://www.drupal.org", "https://example.com"]).await;
///     for report in &reports {
///         println!("{}: {}", report.target(), report.is_drupal());
///     }
/// }
/// ```
pub async fn check_all<I, S>(targets: I) -> Vec<Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    check_all_with_options(targets, CheckOptions::default()).await
}

/// Check several targets concurrently with custom options.
pub async fn check_all_with_options<I, S>(targets: I, options: CheckOptions) -> Vec<Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match Detector::new(options) {
        Ok(detector) => detector.check_all(targets).await,
        Err(err) => targets
            .into_iter()
            .map(|t| unavailable(t.as_ref(), err.clone()))
            .collect(),
    }
}
