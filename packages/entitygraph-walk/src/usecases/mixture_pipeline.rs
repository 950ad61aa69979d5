//! Mixture Pipeline - Usecase Layer wiring index, store, cache and walks
//!
//! # Architecture
//!
//! ```text
//!            MixturePipeline::open(index_dir, db_path, config)
//!                              │
//!      ┌───────────────┬───────┴────────┬──────────────────┐
//!      ▼               ▼                ▼                  ▼
//!  GraphBuilder    WalkEngine ◄── AdjacencyCache     MixtureService
//!      │               │                                   │
//!      ▼               ▼                                   ▼
//!  SqliteAdjacencyStore (par_map / entity_map)   TantivyParagraphIndex
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use entitygraph_walk::config::MixtureConfig;
//! use entitygraph_walk::usecases::MixturePipeline;
//!
//! let pipeline = MixturePipeline::open("index/", "graph_database.db", MixtureConfig::default())?;
//! let report = pipeline.build_graph()?;
//! let ranked = pipeline.rank("borrow checker", 50)?;
//! pipeline.close()?;
//! ```

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use entitygraph_storage::{AdjacencyStore, DistributionCache, SqliteAdjacencyStore};
use prometheus::Registry;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{MixtureConfig, Validatable};
use crate::errors::{MixtureError, Result};
use crate::features::cache::build_cache;
use crate::features::graph_builder::{BuildReport, GraphBuilder};
use crate::features::lexical::{ParagraphIndex, TantivyParagraphIndex};
use crate::features::rescoring::MixtureRescorer;
use crate::features::walk::{MixtureService, WalkEngine};
use crate::shared::models::{EntityDistribution, ParagraphMixture};
use crate::shared::parallel::{CancelToken, WorkerPool};

/// One line of a paragraph import file (JSON Lines)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    pub paragraph_id: String,
    pub text: String,
    #[serde(default)]
    pub entities: Vec<String>,
}

/// A mixture with its rescored value
#[derive(Debug, Clone, Serialize)]
pub struct RankedMixture {
    pub mixture: ParagraphMixture,
    pub mixture_score: f64,
}

/// Create a paragraph index in `index_dir` from JSON Lines records
pub fn import_paragraphs(index_dir: impl AsRef<Path>, input: impl BufRead) -> Result<usize> {
    let dir = index_dir.as_ref().display().to_string();
    let index = TantivyParagraphIndex::create_in_dir(index_dir)
        .map_err(|e| MixtureError::index(dir.as_str(), e))?;

    let mut imported = 0;
    for (n, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ParagraphRecord = serde_json::from_str(&line)
            .map_err(|source| MixtureError::Record { line: n + 1, source })?;
        index
            .add_paragraph(&record.paragraph_id, &record.text, &record.entities)
            .map_err(|e| MixtureError::index(record.paragraph_id.as_str(), e))?;
        imported += 1;
    }

    index
        .commit()
        .map_err(|e| MixtureError::index(dir.as_str(), e))?;
    info!(paragraphs = imported, "paragraph index created");
    Ok(imported)
}

pub struct MixturePipeline {
    config: MixtureConfig,
    store: Arc<SqliteAdjacencyStore>,
    index: Arc<dyn ParagraphIndex>,
    pool: Arc<WorkerPool>,
    registry: Registry,
    service: MixtureService,
    cancel: CancelToken,
}

impl MixturePipeline {
    /// Open an existing paragraph index and the adjacency store at `db_path`
    pub fn open(
        index_dir: impl AsRef<Path>,
        db_path: impl AsRef<Path>,
        config: MixtureConfig,
    ) -> Result<Self> {
        let index = TantivyParagraphIndex::open(index_dir.as_ref())
            .map_err(|e| MixtureError::index(index_dir.as_ref().display().to_string(), e))?;
        let store = SqliteAdjacencyStore::open(db_path)?;
        Self::from_parts(Arc::new(index), Arc::new(store), config)
    }

    pub fn from_parts(
        index: Arc<dyn ParagraphIndex>,
        store: Arc<SqliteAdjacencyStore>,
        config: MixtureConfig,
    ) -> Result<Self> {
        config.validate()?;

        let pool = Arc::new(WorkerPool::new(&config.parallel)?);
        let registry = Registry::new();
        let cache = build_cache(&config.cache, &registry)?;

        let dyn_store: Arc<dyn AdjacencyStore> = store.clone();
        let engine = Arc::new(WalkEngine::new(dyn_store, cache, config.walk.clone()));
        let service = MixtureService::new(engine, Arc::clone(&index), Arc::clone(&pool));

        info!(
            preset = %config.preset,
            workers = pool.workers(),
            cache = ?config.cache.policy,
            "mixture pipeline ready"
        );
        Ok(Self {
            config,
            store,
            index,
            pool,
            registry,
            service,
            cancel: CancelToken::new(),
        })
    }

    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }

    /// Metrics registered by this pipeline (cache counters)
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn service(&self) -> &MixtureService {
        &self.service
    }

    /// Populate the store from the index (both passes)
    pub fn build_graph(&self) -> Result<BuildReport> {
        let store: Arc<dyn AdjacencyStore> = self.store.clone();
        GraphBuilder::new(
            Arc::clone(&self.index),
            store,
            Arc::clone(&self.pool),
            self.config.build.clone(),
        )
        .with_cancel_token(self.cancel.clone())
        .run()
    }

    pub fn walk_paragraph(&self, paragraph_id: &str) -> Result<EntityDistribution> {
        self.service.engine().walk_paragraph(paragraph_id)
    }

    pub fn walk_entity(&self, entity_id: &str) -> Result<EntityDistribution> {
        self.service.engine().walk_entity(entity_id)
    }

    /// Store a computed distribution in a reserved collection
    pub fn persist_distribution(
        &self,
        cache: DistributionCache,
        key: &str,
        distribution: &EntityDistribution,
    ) -> Result<()> {
        self.store
            .put_distribution(cache, key, distribution.entries())?;
        Ok(())
    }

    pub fn stored_distribution(
        &self,
        cache: DistributionCache,
        key: &str,
    ) -> Result<Option<EntityDistribution>> {
        Ok(self
            .store
            .get_distribution(cache, key)?
            .map(EntityDistribution::from_entries))
    }

    /// BM25 candidates → mixtures → mixture rescoring, in retrieval order
    pub fn rank(&self, query: &str, limit: usize) -> Result<Vec<RankedMixture>> {
        let mixtures = self.service.search_mixtures(query, limit)?;
        let scores = MixtureRescorer::new().score(&mixtures);
        Ok(mixtures
            .into_iter()
            .zip(scores)
            .map(|(mixture, mixture_score)| RankedMixture {
                mixture,
                mixture_score,
            })
            .collect())
    }

    /// Release the walk components, then close the store with a final checkpoint
    pub fn close(self) -> Result<()> {
        let Self { store, service, .. } = self;
        drop(service);
        match Arc::try_unwrap(store) {
            Ok(store) => store.close()?,
            Err(shared) => shared.checkpoint()?,
        }
        Ok(())
    }
}
