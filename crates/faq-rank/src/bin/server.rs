//! FAQ ranking server binary
//!
//! Run with: cargo run -p faq-rank --bin faq-rank-server

use faq_rank::{config::RankerConfig, server::RankServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faq_rank=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RankerConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - FAQ source: {}", config.source.url);
    tracing::info!("  - QA model: {}", config.scorer.model);
    tracing::info!("  - Feedback file: {}", config.feedback.path.display());
    tracing::info!("  - Live corpus enrichment: {}", config.ranking.enrich_live_corpus);

    // Scrape + model load; the process exits if either fails
    let server = RankServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /ask       - Rank answers for a question");
    println!("  POST /ask/next  - Next page of answers");
    println!("  POST /feedback  - Save the best answer");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
