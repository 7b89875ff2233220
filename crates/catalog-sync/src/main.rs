//! CLI entry point for the catalog graph loader.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use catalog_core::ReloadMode;
use catalog_graph::{GraphClient, InMemoryGraph};
use catalog_portal::PortalClient;

use catalog_sync::config::SyncConfig;
use catalog_sync::{EntityLoader, RunReport};

#[derive(Parser)]
#[command(name = "catalog-sync")]
#[command(about = "Load portal metadata records into the catalog graph")]
struct Cli {
    /// Reload mode: full (clear everything) or quick (keep stable-label vertices).
    mode: String,

    /// Config file prefix (default: catalog).
    #[arg(short, long, default_value = "catalog")]
    config: String,

    /// Load into an in-memory graph instead of Neo4j.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let mode: ReloadMode = cli.mode.parse().map_err(anyhow::Error::msg)?;
    let config = SyncConfig::load(&cli.config)?;

    let portal = PortalClient::new(config.portal_config())?;
    tracing::info!(base_url = %portal.config().base_url, "Portal client ready");

    let (report, outcome) = if cli.dry_run {
        let graph = InMemoryGraph::new();
        let (report, outcome) = EntityLoader::new(&graph, &portal, &portal)
            .with_config(config.loader.clone())
            .run_with_report(mode)
            .await;
        tracing::info!(
            vertices = graph.vertex_count().await,
            edges = graph.edge_count().await,
            "Dry run complete"
        );
        (report, outcome)
    } else {
        let graph = GraphClient::connect(&config.graph_config()).await?;
        let (report, outcome) = EntityLoader::new(&graph, &portal, &portal)
            .with_config(config.loader.clone())
            .run_with_report(mode)
            .await;
        if outcome.is_ok() {
            let vertices = graph.count_vertices(None).await?;
            let edges = graph.count_edges(None).await?;
            tracing::info!(vertices, edges, "Graph totals after load");
        }
        (report, outcome)
    };

    // Printed whatever the outcome.
    print_report(&report)?;
    outcome?;
    Ok(())
}

fn print_report(report: &RunReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
