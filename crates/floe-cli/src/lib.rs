//! CLI logic for the Floe push tool.
//!
//! Reads a plan JSON file, then either prints a dry-run preview or pushes
//! the plan to the remote modeling service and prints the run summary.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{env, fs};

use log::info;

use floe::store::{HttpStore, ModelStore};
use floe::{FloeError, Pusher, preview};
use floe_core::plan::Plan;

use error_adapter::CliError;

/// Environment override for the API base URL.
const BASE_URL_ENV: &str = "FLOE_API_BASE_URL";

/// Run the Floe CLI application.
///
/// Returns the process exit code on orderly completion (the
/// landscape-listing path completes orderly but exits non-zero, since no
/// push happened).
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O or plan parsing errors
/// - Configuration loading errors
/// - Missing credentials
/// - Fatal remote failures (object/connection/diagram creation)
pub fn run(args: &Args) -> Result<i32, CliError> {
    info!(plan_path = args.plan; "Loading plan");

    let app_config = config::load_config(args.config.as_ref()).map_err(CliError::Floe)?;

    let source = fs::read_to_string(&args.plan).map_err(FloeError::from)?;
    let plan: Plan = serde_json::from_str(&source).map_err(FloeError::from)?;

    // Dry-run never needs credentials and never talks to the network.
    if args.dry_run {
        let landscape = args.landscape_id.as_deref().unwrap_or("(not selected)");
        let report = preview::render_plan(&plan, landscape).map_err(FloeError::from)?;
        print!("{report}");
        return Ok(0);
    }

    let api_key = args
        .api_key
        .as_deref()
        .ok_or_else(|| CliError::Usage("--api-key or FLOE_API_KEY is required".to_string()))?;

    let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| app_config.api.base_url.clone());
    let store =
        HttpStore::new(&base_url, api_key, app_config.api.timeout()).map_err(CliError::Floe)?;

    // Without a landscape there is nothing to push into; list what is
    // available so the user can pick one.
    let Some(landscape) = args.landscape_id.as_deref() else {
        let org = args.org_id.as_deref().ok_or_else(|| {
            CliError::Usage(
                "--landscape-id, or --org-id to list available landscapes, is required"
                    .to_string(),
            )
        })?;

        let landscapes = store.list_landscapes(org).map_err(CliError::Floe)?;
        println!("Available landscapes:");
        for landscape in &landscapes {
            println!("  - {} (id: {})", landscape.name, landscape.id);
        }
        println!("\nRe-run with --landscape-id <id>");
        return Ok(1);
    };

    let summary = Pusher::new(&store, landscape)
        .push(&plan)
        .map_err(CliError::Floe)?;

    info!(
        objects = summary.objects_created.len(),
        connections = summary.connections_created.len(),
        flows = summary.flows_created.len();
        "Push complete"
    );

    println!("\n=== Summary ===");
    println!("{}", summary.to_json().map_err(FloeError::from)?);

    Ok(0)
}
