//! Intent misuse errors.
//!
//! Network failures never appear here; the controller folds them into
//! [`crate::LoadState`] or its last mutation error.

use thiserror::Error;

use crate::state::MutationKind;

/// An intent the controller cannot accept in its current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Mutations are only accepted once a load has settled.
    #[error("the list has not finished loading")]
    NotReady,
    /// Another mutation is awaiting confirmation or in flight.
    #[error("another change is still pending")]
    MutationInFlight,
    /// `confirm`/`cancel` without an awaiting mutation.
    #[error("nothing is awaiting confirmation")]
    NoPendingConfirmation,
    /// Update, delete, and toggle need a record id.
    #[error("{kind} requires a target record")]
    MissingTarget {
        /// Offending mutation kind.
        kind: MutationKind,
    },
    /// The id is not in the loaded collection.
    #[error("no {label} with id '{id}'")]
    UnknownTarget {
        /// Resource label.
        label: &'static str,
        /// Requested id.
        id: String,
    },
    /// Nothing is cleared to commit, or the payload is empty.
    #[error("there is nothing to save")]
    NothingToCommit,
    /// The form draft failed validation.
    #[error("{0}")]
    Draft(String),
}
