use clap::{Parser, Subcommand};
use string_analyzer::engine::analyze;
use string_analyzer::query::translator;

/// Run the string analysis and query translation locally, without a server.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Print the properties of a string
    Analyze { value: String },
    /// Show how a natural-language query translates into filters
    Parse { query: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { value } => {
            let properties = analyze(&value);
            println!("{}", serde_json::to_string_pretty(&properties)?);
        }
        Commands::Parse { query } => {
            let interpretation = translator::translate(&query)?;
            println!("{}", serde_json::to_string_pretty(&interpretation)?);
        }
    }

    Ok(())
}
