//! Argument parsing and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use storedesk_client::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use storedesk_models::{Admin, Banner, Category, Coupon, Faq, Product, Rider, Ticket, Vendor};
use storedesk_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};

use crate::client::{AppContext, CliResult};
use crate::commands::run_resource;

/// Parses CLI arguments, installs logging, and executes the requested
/// command. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.into(),
        build_sha: option_env!("STOREDESK_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let ctx = match AppContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    match dispatch(cli.command, &ctx).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

pub(crate) async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::Admins(cmd) => run_resource::<Admin>(ctx, cmd).await,
        Command::Vendors(cmd) => run_resource::<Vendor>(ctx, cmd).await,
        Command::Riders(cmd) => run_resource::<Rider>(ctx, cmd).await,
        Command::Categories(cmd) => run_resource::<Category>(ctx, cmd).await,
        Command::Products(cmd) => run_resource::<Product>(ctx, cmd).await,
        Command::Coupons(cmd) => run_resource::<Coupon>(ctx, cmd).await,
        Command::Banners(cmd) => run_resource::<Banner>(ctx, cmd).await,
        Command::Faqs(cmd) => run_resource::<Faq>(ctx, cmd).await,
        Command::Tickets(cmd) => run_resource::<Ticket>(ctx, cmd).await,
    }
}

#[derive(Parser)]
#[command(
    name = "storedesk",
    about = "Back-office CLI for the Storedesk marketplace admin API"
)]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "STOREDESK_API_URL", default_value = DEFAULT_API_URL)]
    pub(crate) api_url: String,
    #[arg(long, global = true, env = "STOREDESK_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "STOREDESK_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, env = "STOREDESK_LOG", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub(crate) log_format: LogFormatArg,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Back-office administrator accounts.
    #[command(subcommand)]
    Admins(ResourceCommand),
    /// Marketplace sellers.
    #[command(subcommand)]
    Vendors(ResourceCommand),
    /// Delivery riders.
    #[command(subcommand)]
    Riders(ResourceCommand),
    /// Product categories.
    #[command(subcommand)]
    Categories(ResourceCommand),
    /// Catalog products.
    #[command(subcommand)]
    Products(ResourceCommand),
    /// Discount coupons.
    #[command(subcommand)]
    Coupons(ResourceCommand),
    /// Storefront banners.
    #[command(subcommand)]
    Banners(ResourceCommand),
    /// Help-center entries.
    #[command(subcommand)]
    Faqs(ResourceCommand),
    /// Customer-service tickets.
    #[command(subcommand)]
    Tickets(ResourceCommand),
}

#[derive(Subcommand)]
pub(crate) enum ResourceCommand {
    /// List records with client-side search, filter, sort, and paging.
    Ls(ListArgs),
    /// Create a record from `--set key=value` fields.
    Create(WriteArgs),
    /// Change fields on an existing record.
    Update(UpdateArgs),
    /// Delete a record after confirmation.
    Delete(TargetArgs),
    /// Flip a record's status after confirmation.
    Toggle(TargetArgs),
}

#[derive(Args, Default)]
pub(crate) struct ListArgs {
    #[arg(long, help = "Case-insensitive substring match")]
    pub(crate) search: Option<String>,
    #[arg(long, help = "Status value, or `all`")]
    pub(crate) status: Option<String>,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Sort key; prefix with '-' for descending"
    )]
    pub(crate) sort: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
    #[arg(long, default_value_t = storedesk_core::DEFAULT_PAGE_SIZE)]
    pub(crate) page_size: usize,
}

#[derive(Args, Default)]
pub(crate) struct WriteArgs {
    #[arg(long = "set", value_parser = parse_assignment, help = "Field assignment key=value")]
    pub(crate) fields: Vec<(String, String)>,
    #[arg(long, help = "Initial or replacement password (admins, riders)")]
    pub(crate) password: Option<String>,
    #[arg(long, conflicts_with = "password", help = "Prompt for the password")]
    pub(crate) ask_password: bool,
}

#[derive(Args, Default)]
pub(crate) struct UpdateArgs {
    #[arg(help = "Record identifier")]
    pub(crate) id: String,
    #[command(flatten)]
    pub(crate) write: WriteArgs,
}

#[derive(Args, Default)]
pub(crate) struct TargetArgs {
    #[arg(help = "Record identifier")]
    pub(crate) id: String,
    #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
    pub(crate) yes: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

pub(crate) fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assignment_keeps_value_verbatim() {
        assert_eq!(
            parse_assignment("name= Acme = Co"),
            Ok(("name".to_string(), " Acme = Co".to_string()))
        );
        assert_eq!(
            parse_assignment("phone="),
            Ok(("phone".to_string(), String::new()))
        );
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn parses_list_flags_for_a_resource() {
        let cli = Cli::try_parse_from([
            "storedesk",
            "--output",
            "json",
            "vendors",
            "ls",
            "--status",
            "blocked",
            "--sort",
            "-created_at",
            "--page-size",
            "5",
        ])
        .expect("valid args");

        assert_eq!(cli.output, OutputFormat::Json);
        let Command::Vendors(ResourceCommand::Ls(args)) = cli.command else {
            panic!("expected vendors ls");
        };
        assert_eq!(args.status.as_deref(), Some("blocked"));
        assert_eq!(args.sort.as_deref(), Some("-created_at"));
        assert_eq!(args.page, 1);
        assert_eq!(args.page_size, 5);
    }

    #[test]
    fn parses_repeated_set_flags() {
        let cli = Cli::try_parse_from([
            "storedesk",
            "admins",
            "update",
            "42",
            "--set",
            "name=Ada",
            "--set",
            "phone=",
        ])
        .expect("valid args");
        let Command::Admins(ResourceCommand::Update(args)) = cli.command else {
            panic!("expected admins update");
        };
        assert_eq!(args.id, "42");
        assert_eq!(
            args.write.fields,
            vec![
                ("name".to_string(), "Ada".to_string()),
                ("phone".to_string(), String::new())
            ]
        );
    }

    #[test]
    fn password_flags_conflict() {
        assert!(
            Cli::try_parse_from([
                "storedesk",
                "riders",
                "create",
                "--password",
                "x",
                "--ask-password"
            ])
            .is_err()
        );
    }

    #[test]
    fn delete_accepts_short_yes() {
        let cli = Cli::try_parse_from(["storedesk", "coupons", "delete", "7", "-y"])
            .expect("valid args");
        let Command::Coupons(ResourceCommand::Delete(args)) = cli.command else {
            panic!("expected coupons delete");
        };
        assert!(args.yes);
    }

    #[tokio::test]
    async fn dispatch_talks_to_the_configured_server() -> anyhow::Result<()> {
        use httpmock::{Method as MockMethod, MockServer};
        use serde_json::json;
        use storedesk_test_support::fixtures::{five_admins, wrapped};

        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(MockMethod::GET)
                .path("/api/admin/admins")
                .header("authorization", "Bearer secret");
            then.status(200)
                .json_body(json!({"success": true, "data": wrapped("admins", five_admins())}));
        });
        let delete = server.mock(|when, then| {
            when.method(MockMethod::DELETE).path("/api/admin/admins/2");
            then.status(204);
        });

        let api_url = server.url("/api/admin");
        let cli = Cli::try_parse_from([
            "storedesk",
            "--api-url",
            api_url.as_str(),
            "--token",
            "secret",
            "admins",
            "delete",
            "2",
            "--yes",
        ])?;
        let ctx = AppContext::from_cli(&cli).map_err(|err| anyhow::anyhow!(err.display_message()))?;
        dispatch(cli.command, &ctx)
            .await
            .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        list.assert();
        delete.assert();
        Ok(())
    }

    #[tokio::test]
    async fn missing_token_is_a_validation_error() -> anyhow::Result<()> {
        use httpmock::MockServer;

        let server = MockServer::start_async().await;
        let any = server.mock(|when, then| {
            when.any_request();
            then.status(200);
        });

        let base_url = server.base_url();
        let mut cli = Cli::try_parse_from(["storedesk", "--api-url", base_url.as_str(), "faqs", "ls"])?;
        cli.token = None;
        let ctx = AppContext::from_cli(&cli).map_err(|err| anyhow::anyhow!(err.display_message()))?;
        let err = dispatch(cli.command, &ctx).await.expect_err("no token");

        assert_eq!(err.exit_code(), 2);
        any.assert_calls(0);
        Ok(())
    }

    #[test]
    fn rejects_non_http_api_url() {
        let cli = Cli::try_parse_from(["storedesk", "--api-url", "ftp://example.test", "banners", "ls"])
            .expect("valid args");
        let err = AppContext::from_cli(&cli).err().expect("bad scheme");
        assert_eq!(err.exit_code(), 2);
    }
}
