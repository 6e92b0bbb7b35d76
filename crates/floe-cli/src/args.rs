//! Command-line argument definitions for the Floe CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Credentials fall back to environment variables so the
//! tool can run unattended.

use clap::Parser;

/// Command-line arguments for the Floe push tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the plan JSON file
    #[arg(help = "Path to the plan JSON file")]
    pub plan: String,

    /// API key for the remote modeling service
    #[arg(long, env = "FLOE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Organization id, used to list landscapes when none is selected
    #[arg(long, env = "FLOE_ORGANIZATION_ID")]
    pub org_id: Option<String>,

    /// Target landscape id
    #[arg(long, env = "FLOE_LANDSCAPE_ID")]
    pub landscape_id: Option<String>,

    /// Print the intended creation plan without issuing any remote call
    #[arg(long)]
    pub dry_run: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
