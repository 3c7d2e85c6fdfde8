use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "skinsense")]
#[command(about = "Command-line client for the SkinSense skincare advisor")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Backend URL (overrides SKINSENSE_API_URL and the config file)
    #[arg(long, global = true)]
    pub(crate) api_url: Option<String>,
}
