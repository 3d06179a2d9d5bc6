//! The list-resource controller.
//!
//! # Design
//! - One controller owns one collection, its query, load state, and at most
//!   one pending mutation. Nothing else mutates them.
//! - Loads are split into `begin_load` / `send` / `apply_load` so a request can
//!   run without borrowing the controller. Each request carries a sequence
//!   number and only the most recently issued one may change state.
//! - Network failures are folded into state and returned as values; the
//!   `Err` side of every intent is reserved for [`ControllerError`] misuse.
//! - A failed mutation never touches the collection.

use std::marker::PhantomData;
use std::mem;
use std::sync::Arc;

use serde_json::Value;
use storedesk_client::{ApiError, Method, Transport};
use storedesk_models::{Draft, FieldPatch};
use tracing::{debug, warn};

use crate::confirm::{ConfirmPrompt, ConfirmationGate, Decision};
use crate::error::ControllerError;
use crate::query::{DerivedView, QueryPatch, QueryState, apply_query_patch, derived_view};
use crate::resource::{ReconcilePolicy, Resource, extract_collection, extract_record};
use crate::state::{LoadState, MutationKind, MutationPhase, PendingMutation};

/// A collection fetch detached from the controller that issued it.
pub struct LoadRequest<R> {
    sequence: u64,
    transport: Arc<dyn Transport>,
    record: PhantomData<fn() -> R>,
}

impl<R: Resource> LoadRequest<R> {
    /// Sequence number assigned by [`ListController::begin_load`].
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Perform the fetch and normalize the result.
    pub async fn send(self) -> LoadResponse<R> {
        debug!(resource = R::LABEL, sequence = self.sequence(), "fetching collection");
        let result = match self
            .transport
            .request(Method::Get, R::COLLECTION_PATH, None)
            .await
        {
            Ok(envelope) => envelope
                .into_result()
                .map_err(ApiError::rejected)
                .and_then(extract_collection::<R>),
            Err(err) => Err(err),
        };
        LoadResponse {
            sequence: self.sequence,
            result,
        }
    }
}

/// Settled fetch awaiting [`ListController::apply_load`].
#[derive(Debug)]
pub struct LoadResponse<R> {
    sequence: u64,
    result: Result<Vec<R>, ApiError>,
}

impl<R> LoadResponse<R> {
    /// Sequence number of the request this answers.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Whether a load response changed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadApplied {
    /// The response was the latest issued and is now reflected.
    Applied,
    /// A newer load was issued; the response was dropped.
    Discarded,
}

/// Result of [`ListController::request_mutation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Requested {
    /// The user must confirm; show this prompt.
    AwaitingConfirmation(ConfirmPrompt),
    /// Cleared to [`ListController::commit`].
    ReadyToCommit,
}

/// How a committed mutation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The collection was patched locally.
    Applied,
    /// The collection was refetched.
    Reloaded,
    /// The request failed; the collection is unchanged.
    Failed(ApiError),
}

/// Result of [`ListController::resolve_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The user declined; nothing was sent.
    Cancelled,
    /// The user confirmed and the mutation was committed.
    Committed(CommitOutcome),
}

/// A form's draft plus the error shown inline under it.
#[derive(Clone, Debug, Default)]
pub struct FormDraft<D> {
    /// User input.
    pub draft: D,
    /// Message from the last failed submit.
    pub error: Option<String>,
}

impl<D: Draft> FormDraft<D> {
    /// Fresh form around `draft`.
    #[must_use]
    pub const fn new(draft: D) -> Self {
        Self { draft, error: None }
    }

    /// Edit form prefilled from `record`.
    #[must_use]
    pub fn edit(record: &D::Record) -> Self {
        Self::new(D::from_record(record))
    }

    fn rejected(draft: D, message: impl Into<String>) -> Self {
        Self {
            draft,
            error: Some(message.into()),
        }
    }
}

/// Result of [`ListController::submit`].
#[derive(Clone, Debug)]
pub enum SubmitOutcome<D> {
    /// Saved; the form can close.
    Saved(CommitOutcome),
    /// The edit changed nothing; no request was sent.
    Unchanged,
    /// Not saved; the draft comes back with its error so input is kept.
    Rejected(FormDraft<D>),
}

/// Authoritative in-memory view of one resource collection.
pub struct ListController<R: Resource> {
    transport: Arc<dyn Transport>,
    collection: Vec<R>,
    query: QueryState,
    load_state: LoadState,
    phase: MutationPhase,
    prompt: Option<ConfirmPrompt>,
    last_error: Option<ApiError>,
    issued: u64,
}

impl<R: Resource> ListController<R> {
    /// Empty, idle controller.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            collection: Vec::new(),
            query: QueryState::default(),
            load_state: LoadState::Idle,
            phase: MutationPhase::None,
            prompt: None,
            last_error: None,
            issued: 0,
        }
    }

    /// Loaded records in server order.
    #[must_use]
    pub fn collection(&self) -> &[R] {
        &self.collection
    }

    /// Record by id.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<&R> {
        self.collection.iter().find(|record| record.id() == id)
    }

    /// Current query.
    #[must_use]
    pub const fn query(&self) -> &QueryState {
        &self.query
    }

    /// Current load state.
    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Current mutation phase.
    #[must_use]
    pub const fn phase(&self) -> &MutationPhase {
        &self.phase
    }

    /// Prompt for the mutation awaiting confirmation.
    #[must_use]
    pub const fn pending_prompt(&self) -> Option<&ConfirmPrompt> {
        self.prompt.as_ref()
    }

    /// Most recent mutation failure, cleared by the next success.
    #[must_use]
    pub const fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// Filtered, sorted page for the current query.
    #[must_use]
    pub fn view(&self) -> DerivedView<R> {
        derived_view(&self.collection, &self.query)
    }

    /// Update the query. Never touches the network.
    pub fn set_query(&mut self, patch: QueryPatch) -> &QueryState {
        self.query = apply_query_patch(&self.query, patch);
        &self.query
    }

    /// Issue a new load, superseding any in flight.
    pub fn begin_load(&mut self) -> LoadRequest<R> {
        self.issued += 1;
        self.load_state = LoadState::Loading;
        debug!(resource = R::LABEL, sequence = self.issued, "load started");
        LoadRequest {
            sequence: self.issued,
            transport: Arc::clone(&self.transport),
            record: PhantomData,
        }
    }

    /// Reflect `response` unless a newer load has been issued since.
    pub fn apply_load(&mut self, response: LoadResponse<R>) -> LoadApplied {
        if response.sequence() != self.issued {
            debug!(
                resource = R::LABEL,
                sequence = response.sequence(),
                latest = self.issued,
                "discarding stale load response"
            );
            return LoadApplied::Discarded;
        }

        match response.result {
            Ok(records) => {
                debug!(resource = R::LABEL, count = records.len(), "load applied");
                self.collection = records;
                self.load_state = LoadState::Loaded;
                self.last_error = None;
            }
            Err(err) => {
                warn!(resource = R::LABEL, error = %err, "load failed");
                self.collection.clear();
                self.load_state = LoadState::Failed(err);
            }
        }
        LoadApplied::Applied
    }

    /// Fetch the collection and apply the result.
    pub async fn load(&mut self) -> &LoadState {
        let request = self.begin_load();
        let response = request.send().await;
        self.apply_load(response);
        &self.load_state
    }

    /// Record a mutation intent.
    ///
    /// Delete and toggle wait for confirmation; create and update are cleared
    /// to commit immediately. A toggle without a payload uses the record's own
    /// status flip.
    ///
    /// # Errors
    /// Returns [`ControllerError`] when no load has settled, another mutation
    /// is pending, the target is missing or unknown, or a create/update has no
    /// payload.
    pub fn request_mutation(
        &mut self,
        kind: MutationKind,
        target_id: Option<&str>,
        payload: Option<FieldPatch>,
    ) -> Result<Requested, ControllerError> {
        if !self.load_state.accepts_mutations() {
            return Err(ControllerError::NotReady);
        }
        if !self.phase.is_none() {
            return Err(ControllerError::MutationInFlight);
        }

        let mut prompt = None;
        let mut toggle = None;
        let target = if kind.needs_target() {
            let id = target_id.ok_or(ControllerError::MissingTarget { kind })?;
            let record = self
                .record(id)
                .ok_or_else(|| ControllerError::UnknownTarget {
                    label: R::LABEL,
                    id: id.to_string(),
                })?;
            if kind.needs_confirmation() {
                prompt = Some(record.confirm_prompt(kind));
            }
            if kind == MutationKind::ToggleStatus {
                toggle = Some(record.toggle_patch());
            }
            Some(id.to_string())
        } else {
            None
        };

        let payload = payload.filter(|patch| !patch.is_empty());
        let payload = match kind {
            MutationKind::Delete => None,
            MutationKind::ToggleStatus => payload.or(toggle),
            MutationKind::Create | MutationKind::Update => {
                Some(payload.ok_or(ControllerError::NothingToCommit)?)
            }
        };

        let pending = PendingMutation {
            kind,
            target_id: target,
            payload,
        };
        debug!(
            resource = R::LABEL,
            kind = %kind,
            target = pending.target_id.as_deref(),
            "mutation requested"
        );

        if let Some(prompt) = prompt {
            self.phase = MutationPhase::AwaitingConfirmation(pending);
            self.prompt = Some(prompt.clone());
            Ok(Requested::AwaitingConfirmation(prompt))
        } else {
            self.phase = MutationPhase::Committing(pending);
            Ok(Requested::ReadyToCommit)
        }
    }

    /// Drop the mutation awaiting confirmation. No request is sent.
    ///
    /// # Errors
    /// Returns [`ControllerError::NoPendingConfirmation`] when nothing awaits.
    pub fn cancel(&mut self) -> Result<PendingMutation, ControllerError> {
        match mem::take(&mut self.phase) {
            MutationPhase::AwaitingConfirmation(pending) => {
                self.prompt = None;
                debug!(resource = R::LABEL, kind = %pending.kind, "mutation cancelled");
                Ok(pending)
            }
            other => {
                self.phase = other;
                Err(ControllerError::NoPendingConfirmation)
            }
        }
    }

    /// Approve the mutation awaiting confirmation and commit it.
    ///
    /// # Errors
    /// Returns [`ControllerError::NoPendingConfirmation`] when nothing awaits.
    pub async fn confirm(&mut self) -> Result<CommitOutcome, ControllerError> {
        match mem::take(&mut self.phase) {
            MutationPhase::AwaitingConfirmation(pending) => {
                self.prompt = None;
                self.phase = MutationPhase::Committing(pending);
                self.commit().await
            }
            other => {
                self.phase = other;
                Err(ControllerError::NoPendingConfirmation)
            }
        }
    }

    /// Ask `gate` about the pending mutation and route to exactly one of
    /// [`Self::confirm`] or [`Self::cancel`].
    ///
    /// # Errors
    /// Returns [`ControllerError::NoPendingConfirmation`] when nothing awaits.
    pub async fn resolve_with(
        &mut self,
        gate: &dyn ConfirmationGate,
    ) -> Result<Resolution, ControllerError> {
        let prompt = self
            .prompt
            .clone()
            .ok_or(ControllerError::NoPendingConfirmation)?;
        match gate.ask(&prompt).await {
            Decision::Confirmed => Ok(Resolution::Committed(self.confirm().await?)),
            Decision::Cancelled => {
                self.cancel()?;
                Ok(Resolution::Cancelled)
            }
        }
    }

    /// Send the cleared mutation and reconcile the collection.
    ///
    /// # Errors
    /// Returns [`ControllerError::NothingToCommit`] unless a mutation is in the
    /// committing phase.
    pub async fn commit(&mut self) -> Result<CommitOutcome, ControllerError> {
        let MutationPhase::Committing(pending) = &self.phase else {
            return Err(ControllerError::NothingToCommit);
        };
        let pending = pending.clone();

        let path = pending.target_id.as_ref().map_or_else(
            || R::COLLECTION_PATH.to_string(),
            |id| format!("{}/{id}", R::COLLECTION_PATH),
        );
        let method = match pending.kind {
            MutationKind::Create => Method::Post,
            MutationKind::Update | MutationKind::ToggleStatus => Method::Put,
            MutationKind::Delete => Method::Delete,
        };
        let body = pending.payload.clone().map(FieldPatch::into_value);

        let result = self
            .transport
            .request(method, &path, body.as_ref())
            .await
            .and_then(|envelope| envelope.into_result().map_err(ApiError::rejected));
        self.phase = MutationPhase::None;

        match result {
            Ok(data) => {
                self.last_error = None;
                let outcome = self.reconcile(&pending, data).await;
                debug!(resource = R::LABEL, kind = %pending.kind, ?outcome, "mutation committed");
                Ok(outcome)
            }
            Err(err) => {
                warn!(resource = R::LABEL, kind = %pending.kind, error = %err, "mutation failed");
                self.last_error = Some(err.clone());
                Ok(CommitOutcome::Failed(err))
            }
        }
    }

    async fn reconcile(&mut self, pending: &PendingMutation, data: Option<Value>) -> CommitOutcome {
        if R::RECONCILE == ReconcilePolicy::Reload {
            self.load().await;
            return CommitOutcome::Reloaded;
        }

        let target = pending.target_id.as_deref().unwrap_or_default();
        let applied = match pending.kind {
            MutationKind::Create => extract_record::<R>(data)
                .map(|record| self.upsert(record))
                .is_some(),
            MutationKind::Update | MutationKind::ToggleStatus => {
                let merged = self.merged(target, pending.payload.as_ref());
                let echo = extract_record::<R>(data).filter(|record| {
                    record.id() == target
                        && (pending.kind != MutationKind::ToggleStatus
                            || merged.as_ref().is_none_or(|expected| {
                                expected.status_key() == record.status_key()
                            }))
                });
                if echo.is_none() {
                    debug!(resource = R::LABEL, id = target, "echo unusable; merging patch");
                }
                echo.or(merged)
                    .is_some_and(|record| self.replace(target, record))
            }
            MutationKind::Delete => {
                self.collection.retain(|record| record.id() != target);
                true
            }
        };

        if applied {
            CommitOutcome::Applied
        } else {
            debug!(resource = R::LABEL, "no usable echo; reloading");
            self.load().await;
            CommitOutcome::Reloaded
        }
    }

    /// Existing record with `patch` laid over it, re-normalized.
    fn merged(&self, id: &str, patch: Option<&FieldPatch>) -> Option<R> {
        let base = serde_json::to_value(self.record(id)?).ok()?;
        let value = patch.map_or(base.clone(), |patch| patch.merge_into(base));
        R::normalize(value).ok()
    }

    /// Replace the record sharing the new one's id, or append it.
    fn upsert(&mut self, record: R) {
        match self
            .collection
            .iter()
            .position(|existing| existing.id() == record.id())
        {
            Some(index) => self.collection[index] = record,
            None => self.collection.push(record),
        }
    }

    fn replace(&mut self, id: &str, record: R) -> bool {
        self.collection
            .iter()
            .position(|existing| existing.id() == id)
            .map(|index| self.collection[index] = record)
            .is_some()
    }

    /// Form submission: validate, request create or update, commit.
    ///
    /// Anything short of a saved record hands the draft back with the reason,
    /// and validation failures never reach the network.
    pub async fn submit(&mut self, form: FormDraft<R::Draft>) -> SubmitOutcome<R::Draft> {
        self.last_error = None;
        let draft = form.draft;
        let target = draft.target_id().map(str::to_string);

        let patch = {
            let original = match target.as_deref() {
                Some(id) => match self.record(id) {
                    Some(record) => Some(record),
                    None => {
                        let err = ControllerError::UnknownTarget {
                            label: R::LABEL,
                            id: id.to_string(),
                        };
                        return SubmitOutcome::Rejected(FormDraft::rejected(draft, err.to_string()));
                    }
                },
                None => None,
            };
            match draft
                .validate(original)
                .and_then(|()| draft.to_patch(original))
            {
                Ok(patch) => patch,
                Err(message) => {
                    let err = ControllerError::Draft(message);
                    debug!(resource = R::LABEL, error = %err, "draft rejected");
                    return SubmitOutcome::Rejected(FormDraft::rejected(draft, err.to_string()));
                }
            }
        };

        let kind = if target.is_some() {
            MutationKind::Update
        } else {
            MutationKind::Create
        };
        if kind == MutationKind::Update && patch.is_empty() {
            return SubmitOutcome::Unchanged;
        }

        if let Err(err) = self.request_mutation(kind, target.as_deref(), Some(patch)) {
            return SubmitOutcome::Rejected(FormDraft::rejected(draft, err.to_string()));
        }
        match self.commit().await {
            Ok(CommitOutcome::Failed(err)) => {
                SubmitOutcome::Rejected(FormDraft::rejected(draft, err.user_message()))
            }
            Ok(outcome) => SubmitOutcome::Saved(outcome),
            Err(err) => SubmitOutcome::Rejected(FormDraft::rejected(draft, err.to_string())),
        }
    }
}
