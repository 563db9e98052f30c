//! Error types for health probes.

use crate::advisory::AdvisoryError;
use crate::pricing::PricingError;
use crate::registry::DirectoryError;
use thiserror::Error;

/// Why a probe did not come back clean.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe timed out after {0}ms")]
    Timeout(u64),

    #[error("pricing probe failed: {0}")]
    Pricing(#[from] PricingError),

    #[error("directory probe failed: {0}")]
    Directory(#[from] DirectoryError),

    #[error("advisory probe failed: {0}")]
    Advisory(#[from] AdvisoryError),

    /// The matcher returned no driver for a pool that had candidates
    #[error("matcher returned no decision")]
    NoDecision,

    #[error("probe task panicked: {0}")]
    Panicked(String),
}
