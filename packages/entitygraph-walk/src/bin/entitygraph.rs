//! Entitygraph CLI
//!
//! # Usage
//!
//! ```bash
//! # Create a paragraph index from JSON Lines ({"paragraph_id", "text", "entities"})
//! entitygraph index --input paragraphs.jsonl --index data/index
//!
//! # Build the adjacency graph
//! entitygraph build --index data/index --db data/graph_database.db
//!
//! # Entity distribution of one paragraph (or entity), optionally persisted
//! entitygraph walk --index data/index --db data/graph_database.db --paragraph p42 --persist
//!
//! # BM25 candidates with mixtures and mixture scores
//! entitygraph rank --index data/index --db data/graph_database.db "borrow checker"
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use entitygraph_storage::DistributionCache;
use entitygraph_walk::config::{MixtureConfig, Preset};
use entitygraph_walk::usecases::{import_paragraphs, MixturePipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "entitygraph")]
#[command(about = "Entity-graph paragraph mixtures", long_about = None)]
struct Cli {
    /// YAML configuration file (version 1)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preset used when no configuration file is given
    #[arg(long, global = true, default_value = "balanced")]
    preset: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Paths {
    /// Paragraph index directory
    #[arg(short, long)]
    index: PathBuf,

    /// Adjacency database file
    #[arg(short, long, default_value = "graph_database.db")]
    db: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a paragraph index from a JSON Lines file
    Index {
        /// Input file, one paragraph record per line
        #[arg(long)]
        input: PathBuf,

        /// Index directory to create
        #[arg(short, long)]
        index: PathBuf,
    },

    /// Build the paragraph ↔ entity graph
    Build {
        #[command(flatten)]
        paths: Paths,

        /// Stop at the first failed unit
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print the entity distribution of one origin
    Walk {
        #[command(flatten)]
        paths: Paths,

        /// Paragraph origin
        #[arg(long, conflicts_with = "entity", required_unless_present = "entity")]
        paragraph: Option<String>,

        /// Entity origin
        #[arg(long)]
        entity: Option<String>,

        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Save the distribution into the reserved distribution collection
        #[arg(long)]
        persist: bool,
    },

    /// Search, compute mixtures and rescore
    Rank {
        #[command(flatten)]
        paths: Paths,

        /// Query text
        query: String,

        /// Number of candidates
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Index { input, index } => {
            let reader = BufReader::new(File::open(&input)?);
            let count = import_paragraphs(&index, reader)?;
            println!("Indexed {} paragraphs into {}", count, index.display());
        }
        Commands::Build { paths, fail_fast } => {
            let config = if fail_fast {
                config.build(|b| b.fail_fast(true))
            } else {
                config
            };
            let pipeline = MixturePipeline::open(&paths.index, &paths.db, config)?;
            let report = pipeline.build_graph()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            pipeline.close()?;
        }
        Commands::Walk {
            paths,
            paragraph,
            entity,
            seed,
            persist,
        } => {
            let config = match seed {
                Some(seed) => config.walk(|w| w.seed(seed)),
                None => config,
            };
            let pipeline = MixturePipeline::open(&paths.index, &paths.db, config)?;

            let (origin, distribution, collection) = match (paragraph, entity) {
                (Some(p), _) => {
                    let d = pipeline.walk_paragraph(&p)?;
                    (p, d, DistributionCache::ParagraphToEntity)
                }
                (None, Some(e)) => {
                    let d = pipeline.walk_entity(&e)?;
                    (e, d, DistributionCache::EntityToEntity)
                }
                (None, None) => return Err("either --paragraph or --entity is required".into()),
            };

            println!("{}", origin);
            for (entity, p) in distribution.iter() {
                println!("  {:<40} {:.6}", entity, p);
            }
            if persist {
                pipeline.persist_distribution(collection, &origin, &distribution)?;
                println!("Saved to {}", collection.collection());
            }
            pipeline.close()?;
        }
        Commands::Rank {
            paths,
            query,
            limit,
        } => {
            let pipeline = MixturePipeline::open(&paths.index, &paths.db, config)?;
            let ranked = pipeline.rank(&query, limit)?;
            println!("{}", serde_json::to_string_pretty(&ranked)?);
            pipeline.close()?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<MixtureConfig, Box<dyn std::error::Error>> {
    match &cli.config {
        Some(path) => Ok(MixtureConfig::from_yaml(path)?),
        None => Ok(MixtureConfig::preset(Preset::from_str(&cli.preset)?)),
    }
}
