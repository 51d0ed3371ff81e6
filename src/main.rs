//! Cursus command line entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cursus::cluster::ClusteringResult;
use cursus::embedding::ApiEmbeddingProvider;
use cursus::error::Result;
use cursus::sources::DocumentSource;
use cursus::text::{categorize, DocumentKind};
use cursus::{ClusterEngine, Config, LocalFolderSource};

/// Cursus: topic clustering for course documents
#[derive(Parser, Debug)]
#[command(name = "cursus")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster the documents in a folder
    Cluster {
        /// Folder to read documents from
        folder: String,
        /// Cluster by filename instead of embedded text
        #[arg(long)]
        lexical: bool,
        /// Bucket filenames by their partition marker first (implies --lexical)
        #[arg(long)]
        partitioned: bool,
        /// Only include documents whose name contains this string
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Find documents by subject
    Search {
        /// Folder to read documents from
        folder: String,
        /// Subject to look for
        query: String,
    },
}

/// Semantic output, course material and exercise sheets clustered apart.
#[derive(Serialize)]
struct SemanticReport {
    courses: ClusteringResult,
    exercises: ClusteringResult,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    match args.command {
        Command::Cluster {
            folder,
            lexical,
            partitioned,
            filter,
        } => {
            let source = LocalFolderSource::new(folder, &config.source)?;
            let documents = source.list(filter.as_deref()).await?;

            if lexical || partitioned {
                let engine = ClusterEngine::new(config)?;
                let result = engine.cluster_lexical(&documents, partitioned)?;
                print_json(&result)?;
            } else {
                let embedder = Arc::new(ApiEmbeddingProvider::from_config(&config.embedding)?);
                let engine = ClusterEngine::with_embedder(config, embedder)?;

                let (courses, exercises): (Vec<_>, Vec<_>) = documents
                    .into_iter()
                    .partition(|d| categorize(&d.name) == DocumentKind::Course);

                let report = SemanticReport {
                    courses: engine.cluster_semantic(&courses).await?,
                    exercises: engine.cluster_semantic(&exercises).await?,
                };
                print_json(&report)?;
            }
        }
        Command::Search { folder, query } => {
            let source = LocalFolderSource::new(folder, &config.source)?;
            let documents = source.list(None).await?;
            let engine = ClusterEngine::new(config)?;
            print_json(&engine.search(&documents, &query))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
