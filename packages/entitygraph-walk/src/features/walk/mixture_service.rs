//! Query-time mixtures for ranked candidates

use std::sync::Arc;

use tracing::{debug, info};

use super::engine::WalkEngine;
use crate::config::FailurePolicy;
use crate::errors::{MixtureError, Result};
use crate::features::lexical::ParagraphIndex;
use crate::shared::models::{DocOrdinal, EntityDistribution, ParagraphMixture};
use crate::shared::parallel::WorkerPool;

pub struct MixtureService {
    engine: Arc<WalkEngine>,
    index: Arc<dyn ParagraphIndex>,
    pool: Arc<WorkerPool>,
    policy: FailurePolicy,
}

impl MixtureService {
    pub fn new(
        engine: Arc<WalkEngine>,
        index: Arc<dyn ParagraphIndex>,
        pool: Arc<WorkerPool>,
    ) -> Self {
        let policy = engine.settings().failure_policy;
        Self {
            engine,
            index,
            pool,
            policy,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn engine(&self) -> &WalkEngine {
        &self.engine
    }

    /// Resolve `doc_id` to its paragraph and walk from it
    pub fn paragraph_mixture(&self, doc_id: DocOrdinal, score: f64) -> Result<ParagraphMixture> {
        let paragraph_id = self.resolve(doc_id)?;
        let distribution = self.engine.walk_paragraph(&paragraph_id)?;
        Ok(ParagraphMixture::new(doc_id, paragraph_id, score, distribution))
    }

    /// Mixtures for ranked `(doc_id, score)` candidates, in input order.
    ///
    /// Candidates without a usable neighborhood are handled by the failure
    /// policy; index and store errors always fail the call.
    pub fn mixtures(&self, ranked: &[(DocOrdinal, f64)]) -> Result<Vec<ParagraphMixture>> {
        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .pool
            .map(ranked, |&(doc_id, score)| self.candidate(doc_id, score));

        let mut mixtures = Vec::with_capacity(ranked.len());
        for result in results {
            if let Some(mixture) = result? {
                mixtures.push(mixture);
            }
        }

        debug!(
            candidates = ranked.len(),
            produced = mixtures.len(),
            policy = ?self.policy,
            "mixtures computed"
        );
        Ok(mixtures)
    }

    /// BM25 search, then mixtures for the hits
    pub fn search_mixtures(&self, query: &str, limit: usize) -> Result<Vec<ParagraphMixture>> {
        let hits = self
            .index
            .search(query, limit)
            .map_err(|e| MixtureError::index(query, e))?;
        info!(query, hits = hits.len(), "search candidates");
        self.mixtures(&hits)
    }

    fn candidate(&self, doc_id: DocOrdinal, score: f64) -> Result<Option<ParagraphMixture>> {
        let paragraph_id = self.resolve(doc_id)?;

        match self.engine.walk_paragraph(&paragraph_id) {
            Ok(distribution) if distribution.is_empty() && self.policy == FailurePolicy::Strict => {
                Err(MixtureError::EmptyDistribution {
                    origin: paragraph_id,
                })
            }
            Ok(distribution) => Ok(Some(ParagraphMixture::new(
                doc_id,
                paragraph_id,
                score,
                distribution,
            ))),
            Err(e) if e.is_per_origin() => match self.policy {
                FailurePolicy::Omit => {
                    debug!(paragraph = %paragraph_id, error = %e, "candidate omitted");
                    Ok(None)
                }
                FailurePolicy::EmptyDistribution => Ok(Some(ParagraphMixture::new(
                    doc_id,
                    paragraph_id,
                    score,
                    EntityDistribution::empty(),
                ))),
                FailurePolicy::Strict => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    fn resolve(&self, doc_id: DocOrdinal) -> Result<String> {
        self.index
            .paragraph_id(doc_id)
            .map_err(|e| MixtureError::index(doc_id.to_string(), e))
    }
}
