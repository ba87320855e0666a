use anyhow::Context;
use chatgate::logging::init_tracing;
use chatgate::router::init_router;
use chatgate::state::init_app_state;
use chatgate_config::ServerConfig;
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env().context("invalid server configuration")?;
    let state = init_app_state().context("invalid JWT configuration")?;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", server_config.port))
        .await
        .with_context(|| format!("failed to bind port {}", server_config.port))?;

    tracing::info!(
        port = server_config.port,
        env = ?server_config.app_env,
        "Server running on http://localhost:{}",
        server_config.port
    );

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
