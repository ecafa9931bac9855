//! quizforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;
mod ticker;

use render::OutputFormat;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "Take quizzes in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List quizzes in a catalog
    List {
        /// Catalog directory or http(s) base URL
        #[arg(long)]
        catalog: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Take a quiz interactively
    Take {
        /// Quiz id from the catalog index
        #[arg(long)]
        quiz: String,

        /// Catalog directory or http(s) base URL
        #[arg(long)]
        catalog: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Results format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Skip finish and exit confirmations
        #[arg(long)]
        yes: bool,
    },

    /// Validate a quiz JSON file
    Validate {
        /// Path to the quiz file
        #[arg(long)]
        quiz_file: PathBuf,
    },

    /// Create a starter config and sample catalog
    Init {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizforge=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List { catalog, config } => commands::list::execute(catalog, config).await,
        Commands::Take {
            quiz,
            catalog,
            config,
            format,
            yes,
        } => {
            commands::take::execute(commands::take::TakeArgs {
                quiz,
                catalog,
                config,
                format,
                yes,
            })
            .await
        }
        Commands::Validate { quiz_file } => commands::validate::execute(quiz_file),
        Commands::Init { dir } => commands::init::execute(dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
