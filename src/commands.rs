use anyhow::{Context, Result};
use console::style;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::generator::SyntheticGenerator;
use crate::ollama::OllamaClient;
use crate::seeder::Seeder;
use crate::server::agent::RetrievalAgent;
use crate::store::CatalogStore;

/// Run the one-shot seeding pipeline
#[inline]
pub async fn run_seed(config: &Config, count: usize) -> Result<()> {
    info!("Seeding {} items into '{}'", count, config.database.collection);

    let client = OllamaClient::new(config).context("Failed to initialize Ollama client")?;

    // Fail fast on a misconfigured environment before touching the database
    client
        .health_check()
        .context("Ollama health check failed")?;

    let store = CatalogStore::connect(config)
        .await
        .context("Failed to connect to vector database")?;

    let seeder = Seeder::new(store, SyntheticGenerator::new(client.clone()), client);

    // Top-level failure containment: log, surface a non-zero exit, and let
    // the connection be released when the seeder drops. Already-persisted
    // items are not rolled back.
    match seeder.run(count).await {
        Ok(stats) => {
            println!(
                "{} Seeded {} of {} requested items into '{}'",
                style("✓").green(),
                stats.items_persisted,
                stats.items_requested,
                config.database.collection
            );
            Ok(())
        }
        Err(e) => {
            error!("Seeding run failed: {}", e);
            println!("{} Seeding failed: {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}

/// Start the chat server backed by the seeded collection
#[inline]
pub async fn run_serve(config: &Config) -> Result<()> {
    let client = OllamaClient::new(config).context("Failed to initialize Ollama client")?;
    client
        .health_check()
        .context("Ollama health check failed")?;

    let store = Arc::new(
        CatalogStore::connect(config)
            .await
            .context("Failed to connect to vector database")?,
    );

    let agent = RetrievalAgent::new(store, client);
    crate::server::serve(config, Arc::new(agent))
        .await
        .context("Chat server terminated abnormally")?;

    Ok(())
}

/// Show seeded collection status and capability health
#[inline]
pub async fn show_status(config: &Config) -> Result<()> {
    let store = CatalogStore::connect(config)
        .await
        .context("Failed to connect to vector database")?;
    store.ping().await?;
    println!("{} Database reachable", style("✓").green());

    match store.count().await {
        Ok(count) => println!(
            "  Collection '{}': {} documents",
            config.database.collection, count
        ),
        Err(_) => println!(
            "  Collection '{}' has not been seeded yet",
            config.database.collection
        ),
    }

    let client = OllamaClient::new(config)?;
    match client.health_check() {
        Ok(()) => println!(
            "{} Ollama reachable with models {} / {}",
            style("✓").green(),
            config.ollama.generation_model,
            config.ollama.embedding_model
        ),
        Err(e) => println!("{} Ollama unavailable: {}", style("✗").red(), e),
    }

    Ok(())
}

/// Print the active configuration as TOML
#[inline]
pub fn show_config(config: &Config) -> Result<()> {
    println!("Base directory: {}", config.base_dir.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Write the active configuration to disk so it can be edited
#[inline]
pub fn init_config(config: &Config) -> Result<()> {
    config.save()?;
    println!(
        "{} Wrote configuration to {}",
        style("✓").green(),
        config.config_file_path().display()
    );
    Ok(())
}
