//! Detection implementation submodule.
//!
//! This module contains the network and matching logic behind a check:
//!
//! - `fetcher`: the single primary GET against the target
//! - `tracer`: redirect following with per-hop history, used by the
//!   fetcher and by the `/misc/drupal.js` probe
//! - `heuristics`: the six detection tests
//! - `version`: single-digit version extraction

mod fetcher;
mod heuristics;
mod tracer;
mod version;

pub(crate) use fetcher::parse_target;
pub(crate) use heuristics::Evidence;

pub use fetcher::PageFetcher;
pub use tracer::{Hop, RedirectTracer, TraceFailure, TraceResult};
