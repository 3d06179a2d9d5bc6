//! Generic list and mutation handlers shared by every resource subcommand.
//!
//! Each invocation builds a fresh controller and loads the collection first,
//! so update, delete, and toggle always target the server's current records.

use storedesk_core::{
    AlwaysConfirm, CommitOutcome, ConfirmationGate, FormDraft, ListController, LoadState,
    MutationKind, QueryPatch, Resolution, Resource, SubmitOutcome,
};
use storedesk_models::Draft;
use storedesk_telemetry::command_span;
use tracing::Instrument;

use crate::cli::{ListArgs, ResourceCommand, TargetArgs, UpdateArgs, WriteArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{Tabular, render_record, render_view};

pub(crate) async fn run_resource<R: Tabular>(
    ctx: &AppContext,
    command: ResourceCommand,
) -> CliResult<()> {
    let action = match &command {
        ResourceCommand::Ls(_) => "ls",
        ResourceCommand::Create(_) => "create",
        ResourceCommand::Update(_) => "update",
        ResourceCommand::Delete(_) => "delete",
        ResourceCommand::Toggle(_) => "toggle",
    };
    let span = command_span(R::LABEL, action);

    async move {
        let mut controller = ListController::<R>::new(ctx.transport.clone());
        load(&mut controller).await?;
        match command {
            ResourceCommand::Ls(args) => handle_list(ctx, &mut controller, args),
            ResourceCommand::Create(args) => handle_create(ctx, &mut controller, args).await,
            ResourceCommand::Update(args) => handle_update(ctx, &mut controller, args).await,
            ResourceCommand::Delete(args) => {
                handle_confirmed(ctx, &mut controller, MutationKind::Delete, args).await
            }
            ResourceCommand::Toggle(args) => {
                handle_confirmed(ctx, &mut controller, MutationKind::ToggleStatus, args).await
            }
        }
    }
    .instrument(span)
    .await
}

async fn load<R: Resource>(controller: &mut ListController<R>) -> CliResult<()> {
    match controller.load().await {
        LoadState::Failed(err) => Err(err.clone().into()),
        _ => Ok(()),
    }
}

fn handle_list<R: Tabular>(
    ctx: &AppContext,
    controller: &mut ListController<R>,
    args: ListArgs,
) -> CliResult<()> {
    controller.set_query(QueryPatch {
        search: args.search,
        status: args.status,
        sort: args.sort,
        page: None,
        page_size: Some(args.page_size),
    });
    // Page goes last: changing the other fields resets it to 1.
    controller.set_query(QueryPatch::page(args.page));
    render_view(&controller.view(), ctx.output)
}

async fn handle_create<R: Tabular>(
    ctx: &AppContext,
    controller: &mut ListController<R>,
    args: WriteArgs,
) -> CliResult<()> {
    let mut draft = R::Draft::default();
    fill_draft(&mut draft, args)?;
    let before = controller.collection().len();
    let outcome = controller.submit(FormDraft::new(draft)).await;
    finish_submit(ctx, controller, outcome, None, before)
}

async fn handle_update<R: Tabular>(
    ctx: &AppContext,
    controller: &mut ListController<R>,
    args: UpdateArgs,
) -> CliResult<()> {
    let record = controller
        .record(&args.id)
        .ok_or_else(|| CliError::validation(format!("no {} with id '{}'", R::LABEL, args.id)))?;
    let mut form = FormDraft::<R::Draft>::edit(record);
    fill_draft(&mut form.draft, args.write)?;
    let before = controller.collection().len();
    let outcome = controller.submit(form).await;
    finish_submit(ctx, controller, outcome, Some(&args.id), before)
}

fn fill_draft<D: Draft>(draft: &mut D, args: WriteArgs) -> CliResult<()> {
    for (key, value) in args.fields {
        draft.set_field(&key, value).map_err(CliError::validation)?;
    }
    let password = if args.ask_password {
        Some(
            rpassword::prompt_password("Password: ")
                .map_err(|err| CliError::failure(anyhow::anyhow!("failed to read password: {err}")))?,
        )
    } else {
        args.password
    };
    if let Some(password) = password {
        draft
            .set_field("password", password)
            .map_err(CliError::validation)?;
    }
    Ok(())
}

fn finish_submit<R: Tabular>(
    ctx: &AppContext,
    controller: &ListController<R>,
    outcome: SubmitOutcome<R::Draft>,
    target: Option<&str>,
    before: usize,
) -> CliResult<()> {
    match outcome {
        SubmitOutcome::Unchanged => {
            eprintln!("{} '{}' unchanged", R::LABEL, target.unwrap_or_default());
            Ok(())
        }
        SubmitOutcome::Rejected(form) => {
            let message = form
                .error
                .unwrap_or_else(|| format!("{} was not saved", R::LABEL));
            // A network or server failure is recorded; validation failures are not.
            match controller.last_error() {
                Some(err) => Err(err.clone().into()),
                None => Err(CliError::validation(message)),
            }
        }
        SubmitOutcome::Saved(CommitOutcome::Failed(err)) => Err(err.into()),
        SubmitOutcome::Saved(outcome) => {
            tracing::info!(resource = R::LABEL, ?outcome, "record saved");
            let saved = match target {
                Some(id) => controller.record(id),
                None if outcome == CommitOutcome::Applied
                    && controller.collection().len() > before =>
                {
                    controller.collection().last()
                }
                None => None,
            };
            match saved {
                Some(record) => render_record(record, ctx.output),
                None => {
                    eprintln!("{} saved", R::LABEL);
                    Ok(())
                }
            }
        }
    }
}

async fn handle_confirmed<R: Tabular>(
    ctx: &AppContext,
    controller: &mut ListController<R>,
    kind: MutationKind,
    args: TargetArgs,
) -> CliResult<()> {
    controller.request_mutation(kind, Some(&args.id), None)?;
    let gate: &dyn ConfirmationGate = if args.yes {
        &AlwaysConfirm
    } else {
        ctx.gate.as_ref()
    };

    match controller.resolve_with(gate).await? {
        Resolution::Cancelled => Err(CliError::cancelled(format!(
            "{kind} of {} '{}' cancelled",
            R::LABEL,
            args.id
        ))),
        Resolution::Committed(CommitOutcome::Failed(err)) => Err(err.into()),
        Resolution::Committed(_) => {
            match (kind, controller.record(&args.id)) {
                (MutationKind::ToggleStatus, Some(record)) => render_record(record, ctx.output)?,
                _ => eprintln!("{} '{}' {}", R::LABEL, args.id, past_tense(kind)),
            }
            Ok(())
        }
    }
}

const fn past_tense(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Create => "created",
        MutationKind::Update => "updated",
        MutationKind::Delete => "deleted",
        MutationKind::ToggleStatus => "toggled",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use storedesk_client::{ApiError, Method};
    use storedesk_core::AlwaysCancel;
    use storedesk_models::{Admin, Ticket, Vendor};
    use storedesk_test_support::ScriptedTransport;
    use storedesk_test_support::fixtures::{admin, five_admins, ticket, vendor, wrapped};

    use super::*;
    use crate::cli::OutputFormat;

    fn context(transport: &Arc<ScriptedTransport>, gate: Arc<dyn ConfirmationGate>) -> AppContext {
        AppContext {
            transport: transport.clone(),
            gate,
            output: OutputFormat::Json,
        }
    }

    fn set(pairs: &[(&str, &str)]) -> WriteArgs {
        WriteArgs {
            fields: pairs
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
            ..WriteArgs::default()
        }
    }

    #[tokio::test]
    async fn list_surfaces_load_failure_as_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_error(ApiError::Network("connection refused".into()));
        let ctx = context(&transport, Arc::new(AlwaysCancel));

        let err = run_resource::<Admin>(&ctx, ResourceCommand::Ls(ListArgs::default()))
            .await
            .expect_err("load fails");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("connection refused"));
    }

    #[tokio::test]
    async fn list_sends_a_single_get() -> anyhow::Result<()> {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("admins", five_admins()));
        let ctx = context(&transport, Arc::new(AlwaysCancel));

        let args = ListArgs {
            status: Some("disabled".into()),
            page: 1,
            page_size: 10,
            ..ListArgs::default()
        };
        run_resource::<Admin>(&ctx, ResourceCommand::Ls(args))
            .await
            .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::Get);
        assert_eq!(calls[0].path, "/admins");
        Ok(())
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("admins", five_admins()));
        let ctx = context(&transport, Arc::new(AlwaysCancel));

        let err = run_resource::<Admin>(
            &ctx,
            ResourceCommand::Delete(TargetArgs {
                id: "3".into(),
                yes: false,
            }),
        )
        .await
        .expect_err("cancelled");
        assert_eq!(err.exit_code(), 4);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn yes_flag_skips_the_gate() -> anyhow::Result<()> {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("admins", five_admins()));
        transport.reply_empty();
        let ctx = context(&transport, Arc::new(AlwaysCancel));

        run_resource::<Admin>(
            &ctx,
            ResourceCommand::Delete(TargetArgs {
                id: "3".into(),
                yes: true,
            }),
        )
        .await
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].method, Method::Delete);
        assert_eq!(calls[1].path, "/admins/3");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_target_is_a_validation_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("vendors", json!([vendor(1, "Acme", false)])));
        let ctx = context(&transport, Arc::new(AlwaysConfirm));

        let err = run_resource::<Vendor>(
            &ctx,
            ResourceCommand::Toggle(TargetArgs {
                id: "99".into(),
                yes: true,
            }),
        )
        .await
        .expect_err("unknown id");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "no vendor with id '99'");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn vendor_toggle_sends_blocked_flag() -> anyhow::Result<()> {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("vendors", json!([vendor(1, "Acme", false)])));
        transport.reply_ok(json!({ "vendor": vendor(1, "Acme", true) }));
        let ctx = context(&transport, Arc::new(AlwaysConfirm));

        run_resource::<Vendor>(
            &ctx,
            ResourceCommand::Toggle(TargetArgs {
                id: "1".into(),
                yes: false,
            }),
        )
        .await
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        let calls = transport.calls();
        assert_eq!(calls[1].method, Method::Put);
        assert_eq!(calls[1].body, Some(json!({ "is_blocked": true })));
        Ok(())
    }

    #[tokio::test]
    async fn create_validation_never_reaches_network() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("admins", five_admins()));
        let ctx = context(&transport, Arc::new(AlwaysCancel));

        let err = run_resource::<Admin>(
            &ctx,
            ResourceCommand::Create(set(&[("name", "Ada"), ("email", "not-an-email")])),
        )
        .await
        .expect_err("invalid email");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("not a valid email"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_field_is_rejected_before_submit() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("admins", five_admins()));
        let ctx = context(&transport, Arc::new(AlwaysCancel));

        let err = run_resource::<Admin>(
            &ctx,
            ResourceCommand::Update(UpdateArgs {
                id: "1".into(),
                write: set(&[("colour", "blue")]),
            }),
        )
        .await
        .expect_err("unknown field");
        assert_eq!(err.display_message(), "unknown field 'colour'");
    }

    #[tokio::test]
    async fn update_sends_changed_fields_only() -> anyhow::Result<()> {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("admins", five_admins()));
        transport.reply_ok(json!({ "admin": admin("1", "Ada Lovelace", "active") }));
        let ctx = context(&transport, Arc::new(AlwaysCancel));

        run_resource::<Admin>(
            &ctx,
            ResourceCommand::Update(UpdateArgs {
                id: "1".into(),
                write: set(&[("name", "Ada Lovelace")]),
            }),
        )
        .await
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        let calls = transport.calls();
        assert_eq!(calls[1].method, Method::Put);
        assert_eq!(calls[1].path, "/admins/1");
        assert_eq!(calls[1].body, Some(json!({ "name": "Ada Lovelace" })));
        Ok(())
    }

    #[tokio::test]
    async fn server_rejection_on_save_is_a_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("admins", five_admins()));
        transport.reply_rejected("email already taken");
        let ctx = context(&transport, Arc::new(AlwaysCancel));

        let err = run_resource::<Admin>(
            &ctx,
            ResourceCommand::Update(UpdateArgs {
                id: "1".into(),
                write: set(&[("email", "grace@storedesk.test")]),
            }),
        )
        .await
        .expect_err("rejected");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.display_message(), "email already taken");
    }

    #[tokio::test]
    async fn ticket_mutations_reload_the_collection() -> anyhow::Result<()> {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply_ok(wrapped("tickets", json!([ticket("1", "Late order", "open")])));
        transport.reply_empty();
        transport.reply_ok(wrapped("tickets", json!([ticket("1", "Late order", "closed")])));
        let ctx = context(&transport, Arc::new(AlwaysConfirm));

        run_resource::<Ticket>(
            &ctx,
            ResourceCommand::Toggle(TargetArgs {
                id: "1".into(),
                yes: false,
            }),
        )
        .await
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        let methods: Vec<Method> = transport.calls().iter().map(|call| call.method).collect();
        assert_eq!(methods, vec![Method::Get, Method::Put, Method::Get]);
        Ok(())
    }
}
