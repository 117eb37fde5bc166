use anyhow::Result;

use super::chat::cmd_chat;
use super::perceive::cmd_perceive;
use super::serve::cmd_serve;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use crate::cli::env::CliArgs;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Perceive(args) => cmd_perceive(args, ctx).await,
        Commands::Chat(args) => cmd_chat(args, ctx).await,
        Commands::Serve(args) => cmd_serve(args, ctx).await,
    }
}
