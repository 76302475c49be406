//! # drupal-probe
//!
//! Non-intrusive detection of Drupal sites and their major version.
//!
//! A check fetches the target page once and runs six independent
//! heuristics against it, in a fixed order:
//!
//! 1. `Expires: Sun, 19 Nov 1978 05:00:00 GMT`
//! 2. inline `jQuery.extend(Drupal.settings` in the body
//! 3. `HEAD /misc/drupal.js` answering 200 at that exact path
//! 4. `X-Generator` header mentioning Drupal
//! 5. `X-Drupal-Cache` header present
//! 6. `<meta name="generator" content="Drupal ...">` in the body
//!
//! The target is reported as Drupal if any heuristic passes. Headers 4 and 6
//! may also reveal a single major version digit.
//!
//! ## Features
//!
//! - `check()` async function for checking a single target
//! - `check_all()` async function for checking several targets concurrently
//! - `Detector` for reusing one HTTP client or injecting a custom `Transport`
//! - `Report` with the verdict, per-heuristic results, version and errors
//!
//! ## Example
//!
//! ```rust,no_run
//! use drupal_probe::check;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let report = check("https://www.drupal.org").await;
//!     if report.is_drupal() {
//!         println!("Drupal detected, version {:?}", report.version());
//!     }
//!     for (heuristic, outcome) in report.results().iter() {
//!         println!("{heuristic}: {outcome}");
//!     }
//!     for error in report.errors() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```

mod detect;
pub mod detection;
mod error;
mod heuristic;
mod options;
mod report;
pub mod transport;

pub use detect::{check, check_all, check_all_with_options, check_with_options, Detector};
pub use error::{CheckError, TransportError, TransportErrorKind};
pub use heuristic::{Finding, Heuristic, Outcome};
pub use options::CheckOptions;
pub use report::{Phase, Report, ResultMap};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
