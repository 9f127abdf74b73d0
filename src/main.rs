use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use neuroscan::config::Config;
use neuroscan::history::HistoryStore;
use neuroscan::pipeline::{AnalyzeError, Engine};

/// NeuroScan: flags whether a text is novel relative to a reference corpus.
///
/// Embeds the text with a local sentence model and compares it against a
/// sample of precomputed reference embeddings by cosine similarity.
#[derive(Parser)]
#[command(name = "neuroscan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and landing page
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Analyze a single text from the command line
    Analyze {
        /// The text to analyze
        text: String,

        /// Also add the result to the analysis history
        #[arg(long)]
        record: bool,
    },

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,

    /// Show model, reference and history status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("neuroscan=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            config.validate()?;

            let engine = Engine::initialize(&config);
            let history = HistoryStore::open(&config.history_path);
            info!(
                path = %config.history_path.display(),
                entries = history.len().await,
                "History loaded"
            );

            let state = neuroscan::web::AppState::new(engine, history);
            neuroscan::web::run_server(state, port, &bind).await?;
        }

        Commands::Analyze { text, record } => {
            let config = Config::load()?;
            config.validate()?;

            let engine = Engine::initialize(&config);
            let Some(analyzer) = engine.analyzer() else {
                anyhow::bail!(
                    "{}\nRun `neuroscan status` to see what is missing.",
                    AnalyzeError::NotInitialized
                );
            };

            match analyzer.analyze(&text).await {
                Ok(analysis) => {
                    neuroscan::output::terminal::display_analysis(&analysis);
                    if record {
                        let history = HistoryStore::open(&config.history_path);
                        history.insert_at_front(analysis.record.clone()).await;
                        println!(
                            "\n  {}",
                            format!("Recorded in {}", config.history_path.display()).dimmed()
                        );
                    }
                }
                Err(e) if e.is_client_error() => {
                    println!("{} {}", "Rejected:".yellow().bold(), e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX embedding model...");
            println!("  Destination: {}", model_dir.display());

            neuroscan::embedding::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `neuroscan serve` or `neuroscan analyze \"<text>\"`.");
        }

        Commands::Status => {
            let config = Config::load()?;
            neuroscan::status::show(&config)?;
        }
    }

    Ok(())
}
