//! Cerberus CLI - CDF access-group permission checker
//!
//! One-shot diagnostic for a human operator: authenticates with client
//! credentials, locates the extractor service account's permission group,
//! prints every capability it grants, and flags whether the group can
//! write data-model instances and own datasets.

use cerberus_core::{capability_lines, find_group, CdfClient, Config, ExtractorChecks};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Group provisioned for the extraction pipeline's service account
const TARGET_GROUP: &str = "icapi_extractors";

#[derive(Parser)]
#[command(name = "cerberus")]
#[command(version)]
#[command(about = "Check the capabilities of the icapi_extractors group in CDF", long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let _cli = Cli::parse();

    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(missing) => {
            println!("ERROR: Missing required environment variables!");
            for (name, present) in missing.checklist() {
                println!("{}: {}", name, if present { "✓" } else { "✗" });
            }
            std::process::exit(1);
        }
    };

    println!("Connecting to CDF project: {}", config.project);
    println!("Using cluster: {}", config.cluster);
    println!("{}", "-".repeat(80));

    let http = reqwest::Client::new();

    let client = match CdfClient::authenticate(http, &config).await {
        Ok(client) => {
            println!("✓ Successfully authenticated\n");
            client
        }
        Err(e) => {
            println!("✗ Authentication failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("Fetching groups...");
    let groups = client.list_groups().await?;

    let Some(group) = find_group(&groups, TARGET_GROUP) else {
        println!("✗ Group '{}' not found!", TARGET_GROUP);
        println!("\nAvailable groups:");
        for group in &groups {
            println!("  - {}", group.name);
        }
        std::process::exit(1);
    };

    println!("✓ Found group: {}", group.name);
    println!("  Source ID: {}", group.source_id.as_deref().unwrap_or("None"));
    println!("\n{}", "=".repeat(80));
    println!("CAPABILITIES:");
    println!("{}", "=".repeat(80));

    for line in capability_lines(&group.capabilities) {
        println!("{}", line);
    }

    println!("\n{}", "=".repeat(80));
    println!("\nKEY CHECKS FOR EXTRACTOR:");
    println!("{}", "=".repeat(80));

    let checks = ExtractorChecks::evaluate(&group.capabilities);
    for line in checks.lines() {
        println!("{}", line);
    }

    // The verdict is informational; a completed report always exits 0
    Ok(())
}
