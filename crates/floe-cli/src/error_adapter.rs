//! Adapts CLI errors into miette diagnostics for rich terminal reports.

use miette::{MietteDiagnostic, Severity};
use thiserror::Error;

use floe::FloeError;

/// Errors surfaced by the CLI layer.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Floe(#[from] FloeError),

    #[error("{0}")]
    Usage(String),
}

/// Convert an error into a renderable miette diagnostic, attaching help
/// text where the failure has an obvious fix.
pub fn to_reportable(err: &CliError) -> MietteDiagnostic {
    let diagnostic = MietteDiagnostic::new(err.to_string()).with_severity(Severity::Error);

    match err {
        CliError::Usage(_) => {
            diagnostic.with_help("run with --help to see required arguments and env vars")
        }
        CliError::Floe(FloeError::MalformedPlan(_)) => {
            diagnostic.with_help("fix the plan file; nothing was created remotely")
        }
        CliError::Floe(FloeError::Api { .. }) => diagnostic
            .with_help("the remote service rejected the request; see the response body above"),
        CliError::Floe(_) => diagnostic,
    }
}
