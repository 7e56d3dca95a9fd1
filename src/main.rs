// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Thumbscore: thumbnail quality scoring from the command line
//!
//! Selects each image, submits it to the scoring service and renders the
//! overall score, the per-metric breakdown and the suggestions.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use thumbscore::classify::{classify, ScoreBand};
use thumbscore::config::AppConfig;
use thumbscore::intake::Candidate;
use thumbscore::model::{AnalysisResult, Metric};
use thumbscore::orchestrator::{Orchestrator, OrchestratorState};
use thumbscore::preview::InMemoryPreviewStore;
use thumbscore::scoring::ScoringClient;
use thumbscore::{Result, ThumbscoreError};

/// Thumbscore CLI - thumbnail quality scoring
#[derive(Parser, Debug)]
#[command(name = "thumbscore")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Score thumbnails with a remote scoring service", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "thumbscore.json", global = true)]
    config: PathBuf,

    /// Scoring service base URL (overrides config)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one or more images
    Analyze {
        /// Image files to analyze; non-images are skipped
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show scoring service status
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "thumbscore.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(url) = cli.url {
        config.scoring.url = url;
    }

    match cli.command {
        Commands::Analyze { paths } => {
            config.validate()?;
            run_analyze(config, &paths, &cli.format, cli.quiet).await
        }
        Commands::Status => {
            config.validate()?;
            run_status(config).await
        }
        Commands::Config { action } => run_config_command(config, action, &cli.config),
    }
}

/// One rendered analysis
#[derive(Debug, Serialize)]
struct Report {
    path: String,
    digest: String,
    dimensions: Option<(u32, u32)>,
    score: f64,
    band: ScoreBand,
    breakdown: Vec<MetricReport>,
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MetricReport {
    metric: Metric,
    value: f64,
    band: ScoreBand,
}

impl Report {
    fn new(
        path: &Path,
        digest: String,
        dimensions: Option<(u32, u32)>,
        result: AnalysisResult,
    ) -> Self {
        Self {
            path: path.to_string_lossy().into_owned(),
            digest,
            dimensions,
            score: result.score,
            band: classify(result.score),
            breakdown: result
                .breakdown
                .iter()
                .map(|(metric, value)| MetricReport {
                    metric,
                    value,
                    band: classify(value),
                })
                .collect(),
            suggestions: result.suggestions,
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        match self.dimensions {
            Some((w, h)) => out.push_str(&format!("{} ({}x{})\n", self.path, w, h)),
            None => out.push_str(&format!("{}\n", self.path)),
        }
        out.push_str(&format!("  Score: {:.1} / 100  [{}]\n", self.score, self.band));
        for m in &self.breakdown {
            out.push_str(&format!("  {:<18} {:>5.1}  {}\n", m.metric.label(), m.value, m.band));
        }
        if !self.suggestions.is_empty() {
            out.push_str("  Suggestions:\n");
            for s in &self.suggestions {
                out.push_str(&format!("    - {}\n", s));
            }
        }
        out
    }
}

/// Select, analyze and render each path in turn
async fn run_analyze(
    config: AppConfig,
    paths: &[PathBuf],
    format: &str,
    quiet: bool,
) -> Result<()> {
    let previews = Arc::new(InMemoryPreviewStore::new());
    let orchestrator = Orchestrator::from_config(&config, previews.clone())?;
    info!("Scoring service: {}", config.scoring.url);

    let mut reports = Vec::new();
    for path in paths {
        let candidate = match Candidate::from_path(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Cannot read {:?}: {}", path, e);
                continue;
            }
        };

        let preview = match orchestrator.select(candidate) {
            Ok(id) => id,
            Err(rejection) => {
                if !quiet {
                    eprintln!("Skipping {}: {}", path.display(), rejection);
                }
                continue;
            }
        };

        let dimensions = match previews.dimensions(preview) {
            Some(Ok(dims)) => Some(dims),
            Some(Err(e)) => {
                debug!("Could not read dimensions of {:?}: {}", path, e);
                None
            }
            None => None,
        };
        let digest = orchestrator
            .selection()
            .map(|s| s.digest)
            .unwrap_or_default();

        orchestrator.analyze();
        match orchestrator.resolved().await {
            OrchestratorState::Resolved(result) => {
                let report = Report::new(path, digest, dimensions, result);
                if format == "text" {
                    print!("{}", report.render_text());
                    println!();
                }
                reports.push(report);
            }
            other => warn!("Analysis of {:?} ended in unexpected state {:?}", path, other),
        }
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&reports)?),
        "jsonl" => {
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
        }
        _ => {}
    }

    let stats = orchestrator.stats();
    debug!(degraded = stats.degraded_analyses, "session finished");
    if format == "text" && stats.total_analyses > 0 {
        println!(
            "Analyzed {} image(s), average score {:.1}",
            stats.total_analyses, stats.average_score
        );
    }

    Ok(())
}

/// Run status check
async fn run_status(config: AppConfig) -> Result<()> {
    let client = ScoringClient::new(&config.scoring)?;

    println!("Thumbscore v{} Status", env!("CARGO_PKG_VERSION"));
    println!("======================");
    println!("Scoring service: {}", client.base_url());

    match client.health_check().await {
        Ok(health) => println!(
            "Health: {} ({})",
            health.status,
            health.service.as_deref().unwrap_or("unnamed service")
        ),
        Err(e) => println!("Health: Error - {}", e),
    }

    match client.service_metrics().await {
        Ok(metrics) => {
            println!("\nService metrics:");
            println!("  Total analyses: {}", metrics.total_analyses);
            println!("  Average score: {:.1}", metrics.average_score);
            if let Some(version) = metrics.api_version {
                println!("  API version: {}", version);
            }
        }
        Err(e) => println!("\nService metrics: Error - {}", e),
    }

    println!("\nConfiguration:");
    println!("  Timeout: {}s", config.scoring.timeout_secs);
    match config.intake.max_bytes {
        Some(limit) => println!("  Max image size: {} bytes", limit),
        None => println!("  Max image size: unlimited"),
    }

    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output, force } => {
            if output.exists() && !force {
                return Err(ThumbscoreError::Config(format!(
                    "{:?} already exists. Use --force to overwrite",
                    output
                )));
            }
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Scoring url: {}", config.scoring.url);
            println!("  Timeout: {}s", config.scoring.timeout_secs);
        }
    }

    Ok(())
}
