#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]
//! List-resource controller shared by every Storedesk admin screen.
//!
//! A [`ListController`] owns one resource collection together with its query,
//! load, and mutation state. Presentation layers read derived views from it and
//! dispatch intents; network access goes through a
//! [`storedesk_client::Transport`].

pub mod confirm;
pub mod controller;
pub mod error;
pub mod query;
pub mod resource;
pub mod state;

mod bindings;

pub use confirm::{AlwaysCancel, AlwaysConfirm, ConfirmPrompt, ConfirmationGate, Decision};
pub use controller::{
    CommitOutcome, FormDraft, ListController, LoadApplied, LoadRequest, LoadResponse, Requested,
    Resolution, SubmitOutcome,
};
pub use error::ControllerError;
pub use query::{DEFAULT_PAGE_SIZE, DerivedView, QueryPatch, QueryState, apply_query_patch, derived_view};
pub use resource::{ReconcilePolicy, Resource, extract_collection};
pub use state::{LoadState, MutationKind, MutationPhase, PendingMutation};
