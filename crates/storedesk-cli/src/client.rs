//! Shared CLI context, error types, and the terminal confirmation gate.

use std::fmt::{self, Display, Formatter};
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use storedesk_client::{ApiError, ClientConfig, RestClient, StaticToken, Transport};
use storedesk_core::{ConfirmPrompt, ConfirmationGate, ControllerError, Decision};

use crate::cli::{Cli, OutputFormat};

/// CLI-level error type separating bad input, operational failures, and
/// user cancellation.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
    Cancelled(String),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled(message.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Cancelled(_) => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Cancelled(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ControllerError> for CliError {
    fn from(err: ControllerError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthMissing => {
                Self::validation("not signed in (pass --token or set STOREDESK_TOKEN)")
            }
            other => Self::Failure(anyhow!(other.user_message())),
        }
    }
}

/// Dependencies shared by every command handler.
pub(crate) struct AppContext {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) gate: Arc<dyn ConfirmationGate>,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Build the REST transport and terminal gate from parsed flags.
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let config = ClientConfig::new(&cli.api_url, cli.timeout)
            .map_err(|err| CliError::validation(err.to_string()))?;
        let tokens = Arc::new(StaticToken::from_option(cli.token.clone()));
        let client = RestClient::new(config, tokens)
            .map_err(|err| CliError::failure(anyhow!(err)))?;
        Ok(Self {
            transport: Arc::new(client),
            gate: Arc::new(TerminalGate),
            output: cli.output,
        })
    }
}

/// Asks `[y/N]` on the controlling terminal. Without a terminal every prompt
/// is declined, so scripts must pass `--yes`.
pub(crate) struct TerminalGate;

#[async_trait]
impl ConfirmationGate for TerminalGate {
    async fn ask(&self, prompt: &ConfirmPrompt) -> Decision {
        if !io::stdin().is_terminal() {
            tracing::info!(target_id = %prompt.target_id, "no terminal; treating prompt as cancelled");
            return Decision::Cancelled;
        }
        let question = format!("{}: {} [y/N] ", prompt.title, prompt.message);
        let answer = tokio::task::spawn_blocking(move || {
            let mut stderr = io::stderr();
            let _ = write!(stderr, "{question}");
            let _ = stderr.flush();
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;
        match answer {
            Ok(Ok(line)) => decide(&line),
            _ => Decision::Cancelled,
        }
    }
}

/// Only an explicit yes confirms; anything else, including empty input, cancels.
pub(crate) fn decide(answer: &str) -> Decision {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Decision::Confirmed,
        _ => Decision::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("down")).exit_code(), 3);
        assert_eq!(CliError::cancelled("no").exit_code(), 4);
    }

    #[test]
    fn api_errors_map_to_cli_classes() {
        let missing = CliError::from(ApiError::AuthMissing);
        assert_eq!(missing.exit_code(), 2);
        assert!(missing.display_message().contains("STOREDESK_TOKEN"));

        let rejected = CliError::from(ApiError::rejected("not found"));
        assert_eq!(rejected.exit_code(), 3);
        assert_eq!(rejected.display_message(), "not found");
    }

    #[test]
    fn controller_misuse_is_validation() {
        let err = CliError::from(ControllerError::UnknownTarget {
            label: "vendor",
            id: "9".into(),
        });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "no vendor with id '9'");
    }

    #[test]
    fn only_explicit_yes_confirms() {
        assert_eq!(decide("y\n"), Decision::Confirmed);
        assert_eq!(decide(" YES "), Decision::Confirmed);
        assert_eq!(decide(""), Decision::Cancelled);
        assert_eq!(decide("nope"), Decision::Cancelled);
    }
}
