//! Unified error types for bom-graph-tools.
//!
//! Recoverable data-quality conditions never surface here; they accumulate in
//! the run report. This module covers the fatal cases only: strict-policy
//! resolution failures (aggregated, itemized), structural cycles, and the
//! configuration/IO plumbing around them.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bom-graph-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BomGraphError {
    /// Errors during edge resolution
    #[error("Resolution failed: {context}")]
    Resolution {
        context: String,
        #[source]
        source: ResolveErrorKind,
    },

    /// Errors during graph construction or closure computation
    #[error("Graph computation failed: {context}")]
    Graph {
        context: String,
        #[source]
        source: GraphErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific resolution error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolveErrorKind {
    /// Strict policy aborted the run; every offending token is listed
    #[error("{0}")]
    StrictPolicy(StrictResolutionFailure),
}

/// Specific graph error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GraphErrorKind {
    /// The assembly hierarchy contains a cycle
    #[error("cycle detected: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },
}

/// Why a token failed to resolve under strict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFailureReason {
    /// No candidate identifier at any stage
    Unknown,
    /// More than one candidate identifier; strict policy forbids tie-breaks
    Ambiguous,
}

/// One token that violated strict policy, with its full candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFailure {
    /// The offending token as it appeared in the input
    pub token: String,
    /// Unknown or ambiguous
    pub reason: TokenFailureReason,
    /// Candidate identifiers (empty for unknown tokens)
    pub candidates: Vec<String>,
}

impl fmt::Display for TokenFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            TokenFailureReason::Unknown => write!(f, "'{}': no candidate identifier", self.token),
            TokenFailureReason::Ambiguous => write!(
                f,
                "'{}': ambiguous among [{}]",
                self.token,
                self.candidates.join(", ")
            ),
        }
    }
}

/// Aggregated strict-mode failure: every offending token in one error.
///
/// A strict run either succeeds with zero resolution issues or fails with the
/// complete list; it never stops at the first problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictResolutionFailure {
    /// Every token that was unknown or ambiguous, deduplicated
    pub failures: Vec<TokenFailure>,
}

impl fmt::Display for StrictResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "strict policy violated by {} token(s): ",
            self.failures.len()
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for bom-graph-tools operations
pub type Result<T> = std::result::Result<T, BomGraphError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl BomGraphError {
    /// Create a resolution error with context
    pub fn resolution(context: impl Into<String>, source: ResolveErrorKind) -> Self {
        Self::Resolution {
            context: context.into(),
            source,
        }
    }

    /// Create a strict-policy resolution error from token failures
    pub fn strict_policy(failures: Vec<TokenFailure>) -> Self {
        Self::resolution(
            "strict policy",
            ResolveErrorKind::StrictPolicy(StrictResolutionFailure { failures }),
        )
    }

    /// Create a graph error with context
    pub fn graph(context: impl Into<String>, source: GraphErrorKind) -> Self {
        Self::Graph {
            context: context.into(),
            source,
        }
    }

    /// Create a cycle error naming the full cycle
    pub fn cycle(cycle: Vec<String>) -> Self {
        Self::graph(
            "transitive closure",
            GraphErrorKind::CycleDetected { cycle },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<std::io::Error> for BomGraphError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain front-to-back so the rendered message shows the path
/// through the code: "outer: inner: cause".
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (only evaluated on the error path).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<BomGraphError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: BomGraphError, new_ctx: &str) -> BomGraphError {
    match err {
        BomGraphError::Resolution {
            context: existing,
            source,
        } => BomGraphError::Resolution {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BomGraphError::Graph {
            context: existing,
            source,
        } => BomGraphError::Graph {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BomGraphError::Io {
            path,
            message,
            source,
        } => BomGraphError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        BomGraphError::Config(msg) => BomGraphError::Config(chain_context(new_ctx, &msg)),
        BomGraphError::Validation(msg) => BomGraphError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
