use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use local_weave_core::{
    format_results, ingest_folder, IngestionOptions, LopdfExtractor, VectorIndex, WeaviateConfig,
    WeaviateStore,
};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "local-weave", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Weaviate URL scheme
    #[arg(long, env = "WEAVIATE_SCHEME", default_value = "http")]
    weaviate_scheme: String,

    /// Weaviate host
    #[arg(long, env = "WEAVIATE_HOST", default_value = "localhost")]
    weaviate_host: String,

    /// Weaviate port
    #[arg(long, env = "WEAVIATE_PORT", default_value = "8080")]
    weaviate_port: u16,

    /// Weaviate Cloud URL; overrides scheme/host/port when set
    #[arg(long, env = "WEAVIATE_CLOUD_URL")]
    weaviate_cloud_url: Option<String>,

    /// API key forwarded to the text2vec-openai vectorizer
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Collection that stores the documents
    #[arg(long, default_value = "PDFDocuments")]
    collection: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract text from every PDF under a folder and store it in Weaviate.
    Ingest {
        /// Folder that contains PDFs recursively.
        folder: String,
    },
    /// Search stored documents with a natural language query.
    Search {
        /// Search query; all remaining arguments are joined.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Number of documents to return.
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    // Missing or invalid arguments exit with code 1, the same as any
    // other fatal error; help and version output stay on code 0.
    let cli = Cli::try_parse().unwrap_or_else(|error| {
        let code = usage_exit_code(&error);
        let _ = error.print();
        std::process::exit(code);
    });

    let config = WeaviateConfig {
        scheme: cli.weaviate_scheme,
        host: cli.weaviate_host,
        port: cli.weaviate_port,
        api_key: cli.openai_api_key,
        cloud_url: cli.weaviate_cloud_url,
        class_name: cli.collection,
    };

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        endpoint = %config.endpoint(),
        "local-weave boot"
    );

    match cli.command {
        Command::Ingest { folder } => {
            let store = WeaviateStore::connect(&config)
                .await
                .context("failed to connect to Weaviate")?;
            store.ensure_collection().await?;
            info!(class = %config.class_name, "collection ready");

            let extractor = LopdfExtractor;
            let report = ingest_folder(
                &store,
                &extractor,
                Path::new(&folder),
                &IngestionOptions::default(),
            )
            .await?;

            for failed in &report.failed_extractions {
                warn!(
                    path = %failed.path.display(),
                    reason = %failed.reason,
                    "stored sentinel for unreadable pdf"
                );
            }

            println!("\n==== Results ====");
            println!(
                "Processed {} PDF files in {} batches.",
                report.documents.len(),
                report.batches_submitted
            );

            for (index, document) in report.documents.iter().enumerate() {
                println!("\n[{}] {}", index + 1, document.filename);
                println!("Path: {}", document.path);
                println!(
                    "Content length: {} characters",
                    document.content.chars().count()
                );
                println!("Preview: {}...", preview(&document.content, 150));
            }

            println!("\nDone! All PDFs have been processed and stored in Weaviate.");
        }
        Command::Search { query, limit } => {
            let query = query.join(" ").trim().to_string();
            if query.is_empty() {
                bail!("please provide a search query");
            }

            let store = WeaviateStore::connect(&config)
                .await
                .context("failed to connect to Weaviate")?;

            info!(query = %query, limit, "searching documents");
            let hits = store.near_text(&query, limit).await?;

            print!("{}", format_results(&hits, &query));
        }
    }

    Ok(())
}

fn preview(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect()
}

fn usage_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{usage_exit_code, Cli};
    use clap::Parser;

    #[test]
    fn missing_ingest_folder_maps_to_exit_code_one() {
        let error = Cli::try_parse_from(["local-weave", "ingest"]).expect_err("folder is required");
        assert_eq!(usage_exit_code(&error), 1);
    }

    #[test]
    fn missing_search_query_maps_to_exit_code_one() {
        let error = Cli::try_parse_from(["local-weave", "search"]).expect_err("query is required");
        assert_eq!(usage_exit_code(&error), 1);
    }

    #[test]
    fn help_stays_on_exit_code_zero() {
        let error = Cli::try_parse_from(["local-weave", "--help"]).expect_err("help short-circuits");
        assert_eq!(usage_exit_code(&error), 0);
    }
}
