//! Load and mutation state machines.

use std::fmt;

use storedesk_client::ApiError;
use storedesk_models::FieldPatch;

/// Where the collection fetch stands. Exactly one is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The collection reflects the latest fetch.
    Loaded,
    /// The latest fetch failed; the collection is empty.
    Failed(ApiError),
}

impl LoadState {
    /// Whether mutations may be requested from this state.
    #[must_use]
    pub const fn accepts_mutations(&self) -> bool {
        matches!(self, Self::Loaded | Self::Failed(_))
    }

    /// Failure reason, when failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Kind of change a mutation applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// New record from a form.
    Create,
    /// Changed fields from a form.
    Update,
    /// Removal; confirmation required.
    Delete,
    /// Status flip; confirmation required.
    ToggleStatus,
}

impl MutationKind {
    /// Whether the user must confirm before the request is sent.
    #[must_use]
    pub const fn needs_confirmation(self) -> bool {
        matches!(self, Self::Delete | Self::ToggleStatus)
    }

    /// Whether the mutation addresses an existing record.
    #[must_use]
    pub const fn needs_target(self) -> bool {
        !matches!(self, Self::Create)
    }

    /// Lower-case verb for logs and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ToggleStatus => "toggle",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// An action between the user's click and its resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingMutation {
    /// What the action does.
    pub kind: MutationKind,
    /// Affected record; `None` only for creation.
    pub target_id: Option<String>,
    /// Request body; `None` for deletes.
    pub payload: Option<FieldPatch>,
}

/// Mutation state machine.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MutationPhase {
    /// No mutation pending.
    #[default]
    None,
    /// Waiting on the user to confirm or cancel.
    AwaitingConfirmation(PendingMutation),
    /// Cleared to send.
    Committing(PendingMutation),
}

impl MutationPhase {
    /// Pending mutation in either active phase.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingMutation> {
        match self {
            Self::None => None,
            Self::AwaitingConfirmation(pending) | Self::Committing(pending) => Some(pending),
        }
    }

    /// Whether nothing is pending.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
