//! docmap - cluster and project a set of short documents from the command line
//!
//! Reads one document per non-empty line, prints the cluster id and projected
//! coordinates of each, and optionally names every cluster with a zero-shot
//! classifier.

use anyhow::Context;
use clap::Parser;
use docmap::{
    classify::create_classifier,
    config::{AppConfig, ClassifierProvider},
    logging,
    pipeline::{label_clusters, Pipeline, PipelineOutput},
};
use std::io::Read;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Cluster documents and project them to a plane
    Cluster {
        /// File with one document per line (stdin when omitted)
        input: Option<PathBuf>,
        /// Number of clusters
        #[arg(short, long)]
        k: Option<usize>,
        /// Projection dimensionality
        #[arg(long)]
        components: Option<usize>,
        /// Seed of the k-means initialization
        #[arg(long)]
        seed: Option<u64>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Comma-separated candidate labels used to name the clusters
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
        /// Classifier backend (lexical or ollama)
        #[arg(long)]
        classifier: Option<ClassifierProvider>,
    },
    /// Rank candidate labels for one text
    Classify {
        /// Text to classify
        text: String,
        /// Comma-separated candidate labels
        #[arg(long, value_delimiter = ',', required = true)]
        labels: Vec<String>,
        /// Classifier backend (lexical or ollama)
        #[arg(long)]
        classifier: Option<ClassifierProvider>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "docmap")]
#[command(version)]
#[command(about = "Cluster and project short text documents", long_about = None)]
struct Args {
    /// Configuration file path (overrides defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to the session log file instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app_config = AppConfig::load(args.config.as_deref())?;
    logging::init_logging(args.verbose, app_config.debug, args.log_file)?;

    match args.command {
        Command::Cluster {
            input,
            k,
            components,
            seed,
            format,
            labels,
            classifier,
        } => {
            // CLI overrides
            if let Some(k) = k {
                app_config.clustering.clusters = k;
            }
            if let Some(components) = components {
                app_config.projection.components = components;
            }
            if let Some(seed) = seed {
                app_config.clustering.seed = seed;
            }
            if let Some(provider) = classifier {
                app_config.classifier.provider = provider;
            }
            app_config.validate()?;

            let documents = read_documents(input.as_deref())?;
            tracing::info!("Loaded {} documents", documents.len());

            let output = Pipeline::new(app_config.pipeline_config()).run(&documents)?;

            let names = if labels.is_empty() {
                Vec::new()
            } else {
                let classifier = create_classifier(&app_config.classifier);
                label_clusters(classifier.as_ref(), &documents, &output, &labels).await?
            };

            match format {
                OutputFormat::Json => {
                    let report = output.report(names);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Table => print_table(&documents, &output, &names),
            }
        }
        Command::Classify {
            text,
            labels,
            classifier,
        } => {
            if let Some(provider) = classifier {
                app_config.classifier.provider = provider;
            }
            app_config.classifier.validate()?;

            let classifier = create_classifier(&app_config.classifier);
            let result = classifier.classify(&text, &labels).await?;

            for entry in result.ranked() {
                println!("{:>8.4}  {}", entry.score, entry.label);
            }
        }
    }

    Ok(())
}

/// One document per non-empty, trimmed line
fn read_documents(input: Option<&std::path::Path>) -> anyhow::Result<Vec<String>> {
    let content = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn print_table(
    documents: &[String],
    output: &PipelineOutput,
    names: &[docmap::pipeline::ClusterLabel],
) {
    println!("{:>5}  {:>7}  {:>10}  {:>10}  document", "#", "cluster", "x", "y");
    for row in output.rows() {
        let point = &output.points[row.document];
        let text: String = documents[row.document].chars().take(60).collect();
        println!(
            "{:>5}  {:>7}  {:>10.4}  {:>10.4}  {}",
            row.document,
            row.cluster,
            point.x(),
            point.y(),
            text
        );
    }

    let model = &output.model;
    println!();
    println!(
        "iterations: {}{}  inertia: {:.4}  sizes: {:?}",
        model.iterations,
        if model.converged { "" } else { " (cap reached)" },
        model.inertia,
        model.cluster_sizes()
    );

    for name in names {
        println!(
            "cluster {}: {} ({:.4}, from document {})",
            name.cluster, name.label, name.score, name.representative
        );
    }
}
