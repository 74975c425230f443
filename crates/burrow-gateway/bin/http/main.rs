use burrow_gateway::bootstrap::build_state;
use burrow_gateway::{App, Cli};
use burrow_telemetry::TelemetryConfig;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _telemetry = burrow_telemetry::init(
        TelemetryConfig::builder()
            .service_name("burrow-gateway")
            .log_format(cli.log_format.into())
            .otlp_endpoint(cli.otlp_endpoint.clone())
            .build(),
    )?;

    let state = build_state(&cli).await?;
    let router = App::router_with_api_path(state, &cli.api_path);

    let listener = tokio::net::TcpListener::bind(cli.listen_addr).await?;
    info!(
        listen_addr = %listener.local_addr()?,
        public_base_url = %cli.public_base_url,
        api_path = %cli.api_path,
        "starting gateway server"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
