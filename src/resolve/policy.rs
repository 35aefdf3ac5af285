//! Resolution policy configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether unresolved or ambiguous names abort the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyMode {
    /// Any unknown or ambiguous token aborts the whole resolution with one
    /// aggregated error; no partial edge set is returned
    Strict,
    /// Unknown tokens drop their edge (counted); ambiguous tokens are
    /// tie-broken deterministically (reported)
    #[default]
    Lenient,
}

/// Policy driving name resolution and ambiguity tie-breaking.
///
/// The tie-break comparator chain is fixed: revision recency (when
/// `prefer_revision_recency`), then `preferred_view` match, then
/// `preferred_container` match, then the lexicographically smallest
/// identifier as the final deterministic fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolutionPolicy {
    /// Strict (fail fast) or lenient (best effort)
    pub mode: PolicyMode,
    /// Prefer candidates whose view matches this value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_view: Option<String>,
    /// Prefer candidates whose container matches this value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_container: Option<String>,
    /// Prefer the candidate with the most recent revision marker
    pub prefer_revision_recency: bool,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            mode: PolicyMode::Lenient,
            preferred_view: None,
            preferred_container: None,
            prefer_revision_recency: true,
        }
    }
}

impl ResolutionPolicy {
    /// Lenient policy with default tie-breaking (the default).
    #[must_use]
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Strict policy: unresolved or ambiguous tokens are fatal.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            mode: PolicyMode::Strict,
            ..Self::default()
        }
    }

    /// Set the preferred view.
    #[must_use]
    pub fn with_preferred_view(mut self, view: impl Into<String>) -> Self {
        self.preferred_view = Some(view.into());
        self
    }

    /// Set the preferred container.
    #[must_use]
    pub fn with_preferred_container(mut self, container: impl Into<String>) -> Self {
        self.preferred_container = Some(container.into());
        self
    }

    /// Enable or disable revision-recency preference.
    #[must_use]
    pub const fn with_revision_recency(mut self, prefer: bool) -> Self {
        self.prefer_revision_recency = prefer;
        self
    }

    /// True under strict mode.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        matches!(self.mode, PolicyMode::Strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient_with_recency() {
        let policy = ResolutionPolicy::default();
        assert_eq!(policy.mode, PolicyMode::Lenient);
        assert!(policy.prefer_revision_recency);
        assert!(policy.preferred_view.is_none());
    }

    #[test]
    fn test_strict_preset() {
        assert!(ResolutionPolicy::strict().is_strict());
        assert!(!ResolutionPolicy::lenient().is_strict());
    }

    #[test]
    fn test_builder_chain() {
        let policy = ResolutionPolicy::lenient()
            .with_preferred_view("Design")
            .with_preferred_container("Main")
            .with_revision_recency(false);
        assert_eq!(policy.preferred_view.as_deref(), Some("Design"));
        assert_eq!(policy.preferred_container.as_deref(), Some("Main"));
        assert!(!policy.prefer_revision_recency);
    }

    #[test]
    fn test_serde_kebab_case() {
        let yaml = "mode: strict\nprefer-revision-recency: false\n";
        let policy: ResolutionPolicy = serde_yaml::from_str(yaml).expect("parse");
        assert!(policy.is_strict());
        assert!(!policy.prefer_revision_recency);
    }
}
