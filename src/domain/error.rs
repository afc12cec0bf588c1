//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid values at the model boundary.
///
/// Tree edits never fail: an unknown node id is a no-op, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown cost category: {0} (expected one of: general, prevention, appraisal, internal-failure, external-failure)")]
    UnknownCategory(String),

    #[error("unknown id style: {0} (expected sequential or random)")]
    UnknownIdStyle(String),
}
