use clap::Parser;
use recipe_organizer::config::{Cli, Commands};
use recipe_organizer::{shell, App, RecipeMcpServer, Route};
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the shell's pages own stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = cli.client()?;

    match cli.command() {
        Commands::Shell { start } => {
            let route: Route = start.parse()?;
            tracing::debug!("Starting shell at {} against {}", route, client.base_url());

            let mut app = App::new(client);
            app.navigate(route);

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            shell::run(&mut app, stdin, &mut stdout).await?;
        }
        Commands::Serve { bind } => {
            tracing::info!("Checking recipe API at {}...", client.base_url());
            let probe = RecipeMcpServer::new(client.clone());
            if let Err(e) = probe.check_backend().await {
                tracing::warn!("Recipe API check failed: {}", e);
                tracing::warn!("The server will continue, but tools will fail until the API is reachable.");
            }

            let config = SseServerConfig {
                bind: bind.parse()?,
                sse_path: "/sse".to_string(),
                post_path: "/message".to_string(),
                ct: tokio_util::sync::CancellationToken::new(),
                sse_keep_alive: None,
            };

            tracing::info!("Recipe MCP Server listening on {}", config.bind);

            let sse_server = SseServer::serve_with_config(config).await?;
            let ct = sse_server.with_service(move || RecipeMcpServer::new(client.clone()));

            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down...");
            ct.cancel();
        }
    }

    Ok(())
}
