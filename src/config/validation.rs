//! Configuration validation.

use crate::error::{BomGraphError, Result};
use crate::resolve::ResolutionPolicy;

use super::types::{AppConfig, PipelineConfig};

/// Types that can check their own invariants after deserialization.
pub trait Validatable {
    /// Validate, returning the first violated invariant.
    fn validate(&self) -> Result<()>;
}

impl Validatable for ResolutionPolicy {
    fn validate(&self) -> Result<()> {
        if let Some(view) = &self.preferred_view {
            if view.trim().is_empty() {
                return Err(BomGraphError::config(
                    "preferred-view must not be blank when set",
                ));
            }
        }
        if let Some(container) = &self.preferred_container {
            if container.trim().is_empty() {
                return Err(BomGraphError::config(
                    "preferred-container must not be blank when set",
                ));
            }
        }
        Ok(())
    }
}

impl Validatable for PipelineConfig {
    fn validate(&self) -> Result<()> {
        if self.parallel && self.parallel_threshold == 0 {
            return Err(BomGraphError::config(
                "parallel-threshold must be at least 1 when parallel is enabled",
            ));
        }
        Ok(())
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Result<()> {
        self.resolution.validate()?;
        self.pipeline.validate()
    }
}
