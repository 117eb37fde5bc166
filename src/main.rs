#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sitepilot_cli::cli::run().await
}
