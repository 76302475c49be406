//! Heuristic enum identifying the Drupal detection tests.

use serde::{Serialize, Serializer};
use std::fmt;
use strum::IntoEnumIterator;

/// One independent Drupal detection test.
///
/// Variants are declared in execution order, and [`Heuristic::all`] yields
/// them in that order. Every check runs all six, even after one passes.
///
/// # Example
///
/// ```rust
/// use drupal_probe::Heuristic;
///
/// let names: Vec<_> = Heuristic::all().map(|h| h.name()).collect();
/// assert_eq!(names[0], "expires header");
/// assert_eq!(names.len(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Heuristic {
    /// `Expires` header set to Dries Buytaert's birthday.
    ExpiresHeader,
    /// Inline `jQuery.extend(Drupal.settings` in the page body.
    DrupalSettings,
    /// `HEAD /misc/drupal.js` answers 200 at that exact path.
    MiscDrupalJs,
    /// `X-Generator` header mentions Drupal.
    XGeneratorHeader,
    /// `X-Drupal-Cache` header is present.
    XDrupalCacheHeader,
    /// `<meta name="generator" content="Drupal ...">` in the page body.
    BodyMetaGenerator,
}

impl Heuristic {
    /// Key used for this heuristic in a [`ResultMap`](crate::ResultMap).
    ///
    /// # Example
    ///
    /// ```rust
    /// use drupal_probe::Heuristic;
    ///
    /// assert_eq!(Heuristic::MiscDrupalJs.name(), "misc/drupal.js");
    /// assert_eq!(Heuristic::BodyMetaGenerator.name(), "body-meta-generator");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExpiresHeader => "expires header",
            Self::DrupalSettings => "drupal.settings",
            Self::MiscDrupalJs => "misc/drupal.js",
            Self::XGeneratorHeader => "x-generator header",
            Self::XDrupalCacheHeader => "x-drupal-cache header",
            Self::BodyMetaGenerator => "body-meta-generator",
        }
    }

    /// Whether a pass of this heuristic can also yield a version digit.
    pub fn extracts_version(&self) -> bool {
        matches!(self, Self::XGeneratorHeader | Self::BodyMetaGenerator)
    }

    /// Whether this heuristic issues its own network request.
    pub fn probes_network(&self) -> bool {
        matches!(self, Self::MiscDrupalJs)
    }

    /// Iterator over all heuristics in execution order.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }

    /// Look up a heuristic by its result key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|h| h.name() == name)
    }
}

impl Serialize for Heuristic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The heuristic found Drupal evidence.
    Passed,
    /// The heuristic found nothing, or could not run its probe.
    Failed,
}

impl Outcome {
    /// `"passed"` or `"failed"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    /// Whether this is [`Outcome::Passed`].
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single heuristic reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    /// Pass or fail.
    pub outcome: Outcome,
    /// Major version digit, only ever set on a pass.
    pub version: Option<u8>,
}

impl Finding {
    /// A pass, optionally carrying a version digit.
    pub fn passed(version: Option<u8>) -> Self {
        Self {
            outcome: Outcome::Passed,
            version,
        }
    }

    /// A failure.
    pub fn failed() -> Self {
        Self {
            outcome: Outcome::Failed,
            version: None,
        }
    }
}

impl From<bool> for Finding {
    fn from(passed: bool) -> Self {
        if passed {
            Self::passed(None)
        } else {
            Self::failed()
        }
    }
}
