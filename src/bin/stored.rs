use std::sync::Arc;

use clap::Parser;
use string_analyzer::config::{Overrides, ServerConfig};
use string_analyzer::engine::{MemStore, StringRegistry};
use string_analyzer::server::Server;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind (env: STRING_ANALYZER_BIND)
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on (env: STRING_ANALYZER_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Longest accepted value, in characters (env: STRING_ANALYZER_MAX_LENGTH)
    #[arg(long)]
    max_length: Option<usize>,

    /// Insert sample strings at startup (env: STRING_ANALYZER_SEED)
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ServerConfig::resolve(Overrides {
        bind: args.bind,
        port: args.port,
        max_value_length: args.max_length,
        seed_samples: args.seed,
    })?;

    let store = Arc::new(MemStore::new());
    let registry = Arc::new(StringRegistry::new(store.clone(), config.max_value_length));

    if config.seed_samples {
        let added = registry.seed_samples().await?;
        log::info!("Seeded {} sample strings.", added);
    }

    println!("Starting String Analyzer...");
    println!("Accepting values up to {} characters.", registry.max_value_length());
    println!("String Analyzer listening on http://{}", config.addr());

    let server = Server::new(registry);
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\nShutdown signal received. Exiting.");
    };

    if let Err(e) = server.listen_with_shutdown(&config.addr(), shutdown).await {
        eprintln!("HTTP server failed: {}", e);
        return Err(e.into());
    }
    match store.len() {
        Ok(n) => log::info!("Stopped with {} strings in memory.", n),
        Err(e) => log::warn!("Stopped, record count unavailable: {}", e),
    }

    Ok(())
}
