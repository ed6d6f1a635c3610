//! comment-guard: command-line front end
//!
//! # Usage
//!
//! ```bash
//! # Classify one comment
//! comment-guard check "สมัครสล็อต ฝาก 100 บาท @vip99" --explain
//!
//! # Classify a JSON array of comment records, one verdict per line
//! comment-guard batch comments.json --concurrency 8
//!
//! # Maintain the pattern store
//! comment-guard patterns list
//! comment-guard patterns add "ufa\d+" --category site
//! comment-guard patterns remove "ufa\d+"
//!
//! # Without a classifier
//! comment-guard --patterns-only check "..."
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comment_guard::classifier::{Classifier, HttpClassifier, OfflineClassifier};
use comment_guard::config::{Config, LogFormat, LoggingConfig};
use comment_guard::detector::SpamDetector;
use comment_guard::patterns::{PatternCategory, PatternStore};
use comment_guard::{classify_batch, CommentRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_FILE: &str = "comment-guard.toml";

#[derive(Parser)]
#[command(name = "comment-guard", version)]
#[command(about = "Detect gambling spam in user comments", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./comment-guard.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Decide on pattern score only, never call the classifier
    #[arg(long, global = true)]
    patterns_only: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single text
    Check {
        /// Comment text
        text: String,
        /// Print the score breakdown and classifier verdict
        #[arg(long)]
        explain: bool,
    },
    /// Classify a JSON array of comment records
    Batch {
        /// JSON file with records ({"id", "text", "author", "published_at"})
        file: PathBuf,
        /// Classifications in flight at once
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
    /// Manage stored spam patterns
    Patterns {
        #[command(subcommand)]
        command: PatternCommands,
    },
}

#[derive(Subcommand)]
enum PatternCommands {
    /// List stored patterns
    List,
    /// Add a pattern
    Add {
        /// Regular expression
        pattern: String,
        /// site, keywords or generic
        #[arg(long, default_value = "generic")]
        category: PatternCategory,
    },
    /// Remove a pattern by exact string
    Remove {
        /// Pattern as stored
        pattern: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging);

    let store = Arc::new(PatternStore::load(config.store.path.clone()).await);

    match cli.command {
        Commands::Check { text, explain } => {
            let detector = build_detector(&config, store, cli.patterns_only);
            let evaluation = detector.evaluate(&text).await;

            println!("{}", if evaluation.is_spam { "spam" } else { "not spam" });

            if explain {
                let score = &evaluation.score;
                println!("  score:      {}", score.total_score);
                if !score.matched_pattern_ids.is_empty() {
                    println!("  patterns:   {}", score.matched_pattern_ids.join(", "));
                }
                if !score.matched_builtins.is_empty() {
                    println!("  heuristics: {}", score.matched_builtins.join(", "));
                }
                println!("  stage:      {:?}", evaluation.stage);
                match evaluation.verdict {
                    Some(ref verdict) => {
                        println!("  classifier: {} ({:?})", verdict.confidence, verdict.label);
                        if let Some(ref rationale) = verdict.rationale {
                            println!("  reason:     {}", rationale);
                        }
                    }
                    None => println!("  classifier: not consulted or unavailable"),
                }
                if evaluation.learned {
                    println!("✓ Learned as a new pattern");
                }
            }
        }
        Commands::Batch { file, concurrency } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let records: Vec<CommentRecord> = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a JSON array of comment records", file.display()))?;

            let detector = build_detector(&config, store, cli.patterns_only);
            for verdict in classify_batch(&detector, &records, concurrency).await {
                println!("{}", serde_json::to_string(&verdict)?);
            }
        }
        Commands::Patterns { command } => match command {
            PatternCommands::List => {
                let patterns = store.list().await;
                if patterns.is_empty() {
                    println!("No patterns stored");
                } else {
                    println!("Stored patterns ({}):", patterns.len());
                    for pattern in patterns {
                        println!(
                            "  [{}] {} ({})",
                            pattern.category,
                            pattern.pattern,
                            pattern.added_at.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                }
            }
            PatternCommands::Add { pattern, category } => {
                regex::Regex::new(&pattern)
                    .with_context(|| format!("Invalid pattern: {}", pattern))?;

                if store.append(&pattern, category).await {
                    store.persist().await?;
                    println!("✓ Pattern added: {}", pattern);
                } else {
                    eprintln!("Error: pattern {} already exists", pattern);
                    std::process::exit(1);
                }
            }
            PatternCommands::Remove { pattern } => {
                if store.remove(&pattern).await? {
                    println!("✓ Pattern removed: {}", pattern);
                } else {
                    eprintln!("Error: pattern {} not found", pattern);
                    std::process::exit(1);
                }
            }
        },
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Config::from_file(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_FILE)),
        None => Ok(Config::default()),
    }
}

/// Logs go to stderr so `batch` output stays machine-readable.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("comment_guard={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn build_detector(config: &Config, store: Arc<PatternStore>, patterns_only: bool) -> SpamDetector {
    let endpoint = config.endpoint();

    let classifier: Arc<dyn Classifier> = if patterns_only {
        info!("Pattern-only mode, classifier disabled");
        Arc::new(OfflineClassifier)
    } else {
        info!(
            "Using {} classifier at {}",
            endpoint.provider_name, endpoint.base_url
        );
        Arc::new(
            HttpClassifier::new(config.classifier.timeout())
                .with_retry(config.classifier.retry_policy()),
        )
    };

    SpamDetector::new(store, classifier, endpoint)
        .with_weights(config.weights)
        .with_thresholds(config.thresholds)
}
