use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stakeholder_store::{mcp, tree_render, StakeholderRegistry, StoreConfig};

#[derive(Parser)]
#[command(name = "stkh")]
#[command(about = "Stakeholder records kept as a markdown file per project")]
struct Cli {
    /// Project identifier
    #[arg(short, long, env = "STAKEHOLDERS_PROJECT", default_value = "default")]
    project: String,

    /// Override the data directory
    #[arg(long, env = "STAKEHOLDERS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List stakeholders (default)
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one stakeholder, resolving the name fuzzily
    Show {
        name: String,

        #[arg(long)]
        json: bool,
    },
    /// List every stakeholder matching a partial name, best match first
    Find { query: String },
    /// Print the canonical markdown for the project
    Render,
    /// Start MCP server via stdio
    Mcp,
}

/// Initialize tracing with output to stderr (for MCP mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "stakeholder_store=info".into()),
    );

    if use_stderr {
        // MCP mode: log to stderr so stdout is clean for protocol
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // MCP mode needs stderr for logging since stdout is the protocol channel
    let use_stderr = matches!(cli.command, Some(Commands::Mcp));
    init_tracing(use_stderr);

    let config = match cli.data_dir {
        Some(dir) => StoreConfig::new(dir),
        None => StoreConfig::from_env()?,
    };
    tracing::debug!("Using data directory {}", config.data_dir().display());
    let registry = StakeholderRegistry::new(config);

    match cli.command.unwrap_or(Commands::List { json: false }) {
        Commands::List { json } => {
            let store = registry.store(&cli.project).await?;
            let summaries = store.list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if summaries.is_empty() {
                println!("No stakeholders in project '{}'", cli.project);
            } else {
                for s in summaries {
                    println!(
                        "{:<24} {:<24} goals: {:<3} pain points: {:<3} linked issues: {}",
                        s.name, s.role, s.goal_count, s.pain_point_count, s.linked_issue_count
                    );
                }
            }
        }
        Commands::Show { name, json } => {
            let store = registry.store(&cli.project).await?;
            let Some(stakeholder) = store.find(&name).await? else {
                anyhow::bail!("No stakeholder matches '{}'", name);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&stakeholder)?);
            } else {
                print!("{}", tree_render::render_stakeholder(&stakeholder));
                if !stakeholder.description.is_empty() {
                    println!("\n{}", stakeholder.description);
                }
            }
        }
        Commands::Find { query } => {
            let store = registry.store(&cli.project).await?;
            for m in store.find_all(&query).await? {
                println!("{:<10} {}", m.tier.as_str(), m.stakeholder.name);
            }
        }
        Commands::Render => {
            let store = registry.store(&cli.project).await?;
            print!("{}", store.render().await?);
        }
        Commands::Mcp => {
            mcp::run_stdio_server(registry).await?;
        }
    }

    Ok(())
}
