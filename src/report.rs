//! Check results: per-heuristic outcomes, verdict and version.

use crate::{CheckError, Heuristic, Outcome};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Lifecycle of one check.
///
/// ```text
/// Unstarted -> Fetching -> FetchFailed
///                       -> Evaluating -> Completed
/// ```
///
/// A [`Report`] is always in one of the two terminal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing has happened yet.
    Unstarted,
    /// The primary page is being fetched.
    Fetching,
    /// The primary fetch failed; no heuristic ran.
    FetchFailed,
    /// Heuristics are running against the fetched page.
    Evaluating,
    /// Every heuristic ran.
    Completed,
}

impl Phase {
    /// Whether this phase ends a check.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::Completed)
    }
}

/// Heuristic outcomes in execution order.
///
/// Serializes as a JSON object keyed by [`Heuristic::name`], preserving
/// execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultMap {
    entries: Vec<(Heuristic, Outcome)>,
}

impl ResultMap {
    /// Record an outcome. A heuristic recorded twice keeps its first slot.
    pub(crate) fn insert(&mut self, heuristic: Heuristic, outcome: Outcome) {
        match self.entries.iter_mut().find(|(h, _)| *h == heuristic) {
            Some(entry) => entry.1 = outcome,
            None => self.entries.push((heuristic, outcome)),
        }
    }

    /// Outcome of a heuristic, if it ran.
    pub fn outcome(&self, heuristic: Heuristic) -> Option<Outcome> {
        self.entries
            .iter()
            .find(|(h, _)| *h == heuristic)
            .map(|(_, o)| *o)
    }

    /// Outcome by result key, e.g. `"misc/drupal.js"`.
    pub fn get(&self, name: &str) -> Option<Outcome> {
        Heuristic::from_name(name).and_then(|h| self.outcome(h))
    }

    /// `(heuristic, outcome)` pairs in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (Heuristic, Outcome)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of heuristics recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no heuristic ran.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any heuristic passed.
    pub fn any_passed(&self) -> bool {
        self.entries.iter().any(|(_, o)| o.is_passed())
    }
}

impl Serialize for ResultMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (heuristic, outcome) in &self.entries {
            map.serialize_entry(heuristic.name(), outcome)?;
        }
        map.end()
    }
}

/// Result of checking one target.
///
/// # Example
///
/// ```rust,no_run
/// use drupal_probe::check;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let report = check("https://www.drupal.org").await;
///     if report.is_drupal() {
///         println!("Drupal {:?}", report.version());
///     }
///     for (heuristic, outcome) in report.results().iter() {
///         println!("{heuristic}: {outcome}");
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    target: String,
    phase: Phase,
    results: ResultMap,
    version: Option<u8>,
    errors: Vec<CheckError>,
}

impl Report {
    pub(crate) fn new(
        target: String,
        phase: Phase,
        results: ResultMap,
        version: Option<u8>,
        errors: Vec<CheckError>,
    ) -> Self {
        Self {
            target,
            phase,
            results,
            version,
            errors,
        }
    }

    /// The target as given by the caller.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Terminal phase: [`Phase::Completed`] or [`Phase::FetchFailed`].
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The verdict: `true` iff at least one heuristic passed.
    pub fn is_drupal(&self) -> bool {
        self.results.any_passed()
    }

    /// Major version digit, only when the target was detected as Drupal
    /// and a version-extracting heuristic passed.
    pub fn version(&self) -> Option<u8> {
        if self.is_drupal() {
            self.version
        } else {
            None
        }
    }

    /// Per-heuristic outcomes. Empty when the primary fetch failed.
    pub fn results(&self) -> &ResultMap {
        &self.results
    }

    /// Errors recorded during the check.
    pub fn errors(&self) -> &[CheckError] {
        &self.errors
    }

    /// Whether every heuristic ran.
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Report", 6)?;
        state.serialize_field("target", &self.target)?;
        state.serialize_field("phase", &self.phase)?;
        state.serialize_field("is_drupal", &self.is_drupal())?;
        state.serialize_field("version", &self.version())?;
        state.serialize_field("results", &self.results)?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}
