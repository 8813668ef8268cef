pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "sharegate")]
#[command(about = "Share-link authentication service")]
pub struct Args {
    /// API server to talk to (defaults to localhost on the configured api_port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the sharegate config directory (defaults to ~/.sharegate)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Admin token for share management (defaults to the one in config.toml)
    #[arg(long, global = true)]
    pub admin_token: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
