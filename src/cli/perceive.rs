use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use perceiver_structural::DocumentSerializer;
use serde_json::json;

use crate::cli::context::CliContext;
use crate::cli::runtime::load_page;

#[derive(Args, Clone, Debug)]
pub struct PerceiveArgs {
    /// Page fixture (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Override the output cap in characters
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,

    /// Emit a JSON object instead of the raw context
    #[arg(long)]
    pub json: bool,
}

pub async fn cmd_perceive(args: PerceiveArgs, ctx: &CliContext) -> Result<()> {
    let document = load_page(&args.page)?;
    let mut config = ctx.config().serializer.clone();
    if let Some(max_chars) = args.max_chars {
        config.max_output_chars = max_chars;
    }

    let context = DocumentSerializer::new(config).serialize(document.as_ref());
    if args.json {
        let payload = json!({
            "page": args.page.display().to_string(),
            "chars": context.len_chars(),
            "truncated": context.is_truncated(),
            "context": context.as_str(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("Failed to encode context")?
        );
    } else {
        print!("{context}");
    }
    Ok(())
}
