use anyhow::Context;
use store_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. dotenv, configuration, logging
    let config = setup_environment();

    print_banner();
    tracing::info!(
        port = config.http_port,
        database = %config.database_path,
        environment = %config.environment,
        "Snack store server starting..."
    );

    // 2. Database, image host, password policy
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 3. Serve until Ctrl-C
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
