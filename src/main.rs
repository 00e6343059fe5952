//! CLI entry point for liminal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liminal::content::{CollectionKind, ItemFilter};
use liminal::Portfolio;

#[derive(Parser)]
#[command(name = "liminal")]
#[command(version)]
#[command(about = "A portfolio and blog generator", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or project
    New {
        /// Kind of item (post, project)
        kind: CollectionKind,

        /// Title of the new item
        title: String,

        /// File name to use instead of the slugified title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List posts, projects or their terms
    List {
        /// What to list (posts, projects, tags, categories, tech)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Only items carrying this tag (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Only posts in this category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Only items whose title or summary contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one item with its outline and related items
    Show {
        /// Kind of item (post, project)
        kind: CollectionKind,

        /// Slug (file name without extension)
        slug: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "liminal=debug,info"
    } else {
        "liminal=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            liminal::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { kind, title, slug } => {
            let portfolio = Portfolio::new(&base_dir)?;
            let path =
                liminal::commands::new::create_item(&portfolio, kind, &title, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Generate { watch } => {
            let portfolio = Portfolio::new(&base_dir)?;
            tracing::info!("Generating static files...");

            portfolio.generate()?;
            println!("Generated successfully!");

            if watch {
                liminal::commands::generate::watch(&portfolio).await?;
            }
        }

        Commands::Server { port, ip, r#static } => {
            let portfolio = Portfolio::new(&base_dir)?;

            tracing::info!("Generating static files...");
            portfolio.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            liminal::server::start(&portfolio, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            let portfolio = Portfolio::new(&base_dir)?;
            portfolio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List {
            r#type,
            tag,
            category,
            search,
        } => {
            let portfolio = Portfolio::new(&base_dir)?;
            let filter = ItemFilter {
                search,
                tags: tag,
                category,
            };
            liminal::commands::list::run(&portfolio, &r#type, &filter)?;
        }

        Commands::Show { kind, slug } => {
            let portfolio = Portfolio::new(&base_dir)?;
            liminal::commands::show::run(&portfolio, kind, &slug)?;
        }

        Commands::Version => {
            println!("liminal version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
