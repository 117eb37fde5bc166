use std::io::Write;
use std::path::PathBuf;

use agent_core::AgentSession;
use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::agent::{LogEntry, TurnOutcome, TurnRunner};
use crate::cli::context::CliContext;
use crate::cli::runtime::{build_transport, load_page};

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Page fixture (YAML or JSON) the agent acts on
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Run a single turn with this message instead of reading stdin
    #[arg(short, long)]
    pub message: Option<String>,

    /// Replay model replies from a YAML script instead of calling the API
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Print log entries as JSON lines
    #[arg(long)]
    pub json: bool,
}

pub async fn cmd_chat(args: ChatArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let document = load_page(&args.page)?;
    let transport = build_transport(config, args.script.as_deref())?;
    let runner = TurnRunner::new(document, AgentSession::new(transport))
        .with_serializer(config.serializer.clone())
        .with_timings(config.effects);

    match &args.message {
        Some(message) => {
            run_and_print(&runner, message, args.json).await?;
        }
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                if !args.json {
                    print!("> ");
                    std::io::stdout().flush().context("Failed to flush stdout")?;
                }
                let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
                    break;
                };
                let line = line.trim();
                if matches!(line, "exit" | "quit") {
                    break;
                }
                run_and_print(&runner, line, args.json).await?;
            }
        }
    }

    let pending = runner.primitives().reversals().pending();
    if pending > 0 {
        info!(pending, "Waiting for visual effects to revert");
    }
    runner.primitives().reversals().settle().await;
    Ok(())
}

async fn run_and_print<D, T>(runner: &TurnRunner<D, T>, message: &str, json: bool) -> Result<()>
where
    D: dom_adapter::Document + 'static,
    T: agent_core::SessionTransport,
{
    let offset = runner.log().len();
    let outcome = runner.run_turn(message).await;
    for entry in runner.log().since(offset) {
        print_entry(&entry, json)?;
    }
    if let TurnOutcome::Completed { actions, failures } = outcome {
        info!(actions, failures, "Turn finished");
    }
    Ok(())
}

fn print_entry(entry: &LogEntry, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string(entry).context("Failed to encode log entry")?
        );
    } else {
        println!("[{}] {}", entry.source, entry.content);
    }
    Ok(())
}
