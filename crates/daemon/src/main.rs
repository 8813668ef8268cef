mod cli;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Daemon, Health, Init, Share, Version};

command_enum! {
    (Daemon, Daemon),
    (Health, Health),
    (Init, Init),
    (Share, Share),
    (Version, Version),
}

async fn run(args: Args) -> Result<OpOutput, Box<dyn std::error::Error>> {
    let remote = cli::op::resolve_remote(args.remote, args.config_path.clone())?;
    let admin_token = cli::op::resolve_admin_token(args.admin_token, args.config_path.clone());
    let ctx = cli::op::OpContext::new(remote, admin_token, args.config_path)?;

    Ok(args.command.execute(&ctx).await?)
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
