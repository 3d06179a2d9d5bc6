//! Confirmation gate contract.
//!
//! The gate answers with a single [`Decision`], so "exactly one of confirm or
//! cancel" holds by construction. Dismissing the dialog is a cancel.

use async_trait::async_trait;

use crate::state::MutationKind;

/// What the user is asked to approve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmPrompt {
    /// Action awaiting approval.
    pub kind: MutationKind,
    /// Record the action targets.
    pub target_id: String,
    /// Dialog heading.
    pub title: String,
    /// Dialog body.
    pub message: String,
}

/// The user's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Proceed.
    Confirmed,
    /// Abort, including dismissal.
    Cancelled,
}

/// Yes/no dialog owned by the presentation layer.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Ask the user; must resolve once.
    async fn ask(&self, prompt: &ConfirmPrompt) -> Decision;
}

/// Gate that approves everything (`--yes`).
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmationGate for AlwaysConfirm {
    async fn ask(&self, _prompt: &ConfirmPrompt) -> Decision {
        Decision::Confirmed
    }
}

/// Gate that declines everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysCancel;

#[async_trait]
impl ConfirmationGate for AlwaysCancel {
    async fn ask(&self, _prompt: &ConfirmPrompt) -> Decision {
        Decision::Cancelled
    }
}
