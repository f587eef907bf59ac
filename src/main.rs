use std::process::ExitCode;
use std::sync::Arc;

use github_playground::{logging, PluginRegistry, Runner, TracingSink};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    if let Err(e) = logging::init_tracing() {
        eprintln!("{:#}", e);
    }

    // Load .env for local dev (if present)
    if dotenvy::dotenv().is_ok() {
        tracing::info!("Loaded .env");
    }

    tracing::info!("Running main thread...");

    let runner = Runner::new(PluginRegistry::with_builtin(), Arc::new(TracingSink));
    let code = runner.run().await;

    tracing::info!(code, "Finished");
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
