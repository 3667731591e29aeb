use core::fmt::Debug;

use thiserror::Error;

/// Programmer errors surfaced synchronously at the call site.
///
/// Everything here signals a state-model bug in the caller; soft
/// inconsistencies (missing host anchors, deleting an absent id) are logged
/// and degraded instead, never returned as errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScopeError<K: Debug> {
    #[error("item {0:?} already exists in scope")]
    DuplicateId(K),
    #[error("unknown item {0:?}")]
    UnknownId(K),
    #[error("unknown move target {0:?}")]
    UnknownTarget(K),
    #[error("item {0:?} appears more than once in one move batch")]
    DuplicateMoveId(K),
    #[error("scope has been destroyed")]
    Destroyed,
}
