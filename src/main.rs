use anyhow::Result;
use buttondown::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
