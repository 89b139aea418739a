// Postbuild - static site output optimizer
// Entry point with clean separation of concerns

use anyhow::Context;
use postbuild::cli::CliHandler;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let handler = CliHandler::new();
    handler.run().await.context("post-build pipeline failed")
}
