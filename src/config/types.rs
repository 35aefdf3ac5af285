//! Configuration types for bom-graph-tools runs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::resolve::ResolutionPolicy;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified run configuration.
///
/// Aggregates the resolution policy with pipeline and diagnostics options.
/// Can be constructed programmatically, via the builder, or loaded from a
/// YAML file (embedding applications typically overlay their own CLI or
/// service settings on top).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    /// Name resolution policy
    pub resolution: ResolutionPolicy,
    /// Pipeline execution options
    pub pipeline: PipelineConfig,
    /// Diagnostics verbosity options
    pub diagnostics: DiagnosticsConfig,
}

impl AppConfig {
    /// Create a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// Pipeline execution options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Resolve edges in parallel when a run has at least
    /// `parallel-threshold` edges
    pub parallel: bool,
    /// Minimum edge count before parallel resolution kicks in
    pub parallel_threshold: usize,
    /// Compute the transitive closure (disable for direct-edges-only loads)
    pub compute_closure: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 2048,
            compute_closure: true,
        }
    }
}

/// Diagnostics verbosity options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiagnosticsConfig {
    /// Record a per-edge resolution trace in the run report
    pub record_trace: bool,
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with a fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the resolution policy wholesale.
    pub fn resolution(mut self, policy: ResolutionPolicy) -> Self {
        self.config.resolution = policy;
        self
    }

    /// Switch to strict resolution.
    pub fn strict(mut self) -> Self {
        self.config.resolution.mode = crate::resolve::PolicyMode::Strict;
        self
    }

    /// Set the preferred view for tie-breaking.
    pub fn preferred_view(mut self, view: impl Into<String>) -> Self {
        self.config.resolution.preferred_view = Some(view.into());
        self
    }

    /// Set the preferred container for tie-breaking.
    pub fn preferred_container(mut self, container: impl Into<String>) -> Self {
        self.config.resolution.preferred_container = Some(container.into());
        self
    }

    /// Enable or disable parallel resolution.
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.pipeline.parallel = parallel;
        self
    }

    /// Enable or disable closure computation.
    pub const fn compute_closure(mut self, compute: bool) -> Self {
        self.config.pipeline.compute_closure = compute;
        self
    }

    /// Record a per-edge resolution trace.
    pub const fn record_trace(mut self, record: bool) -> Self {
        self.config.diagnostics.record_trace = record;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> AppConfig {
        self.config
    }
}
