//! Two-pass graph construction from the paragraph index
//!
//! 1. Paragraph pass: ordinal → stored `(paragraphid, spotlight*)` → `par_map`
//! 2. Entity pass: entity term → capped term query → `entity_map`
//!
//! Units within a batch run on the worker pool; each batch is written with one
//! `put_batch`, which is the checkpoint. Store failures end the build, unit
//! failures are counted (or end it when `fail_fast` is set).

use std::sync::Arc;
use std::time::Instant;

use entitygraph_storage::domain::validate_ids;
use entitygraph_storage::{AdjacencyStore, Relation};
use tracing::{info, warn};

use crate::config::BuildSettings;
use crate::errors::{MixtureError, Result};
use crate::features::graph_builder::domain::{BuildReport, PassReport};
use crate::features::lexical::{IndexError, ParagraphIndex, FIELD_ENTITIES};
use crate::shared::models::DocOrdinal;
use crate::shared::parallel::{CancelToken, WorkerPool};
use crate::shared::progress::ProgressTracker;

type UnitResult = std::result::Result<Option<(String, Vec<String>)>, (String, MixtureError)>;

pub struct GraphBuilder {
    index: Arc<dyn ParagraphIndex>,
    store: Arc<dyn AdjacencyStore>,
    pool: Arc<WorkerPool>,
    settings: BuildSettings,
    cancel: CancelToken,
}

impl GraphBuilder {
    pub fn new(
        index: Arc<dyn ParagraphIndex>,
        store: Arc<dyn AdjacencyStore>,
        pool: Arc<WorkerPool>,
        settings: BuildSettings,
    ) -> Self {
        Self {
            index,
            store,
            pool,
            settings,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Paragraph pass, then entity pass, then a final checkpoint
    pub fn run(&self) -> Result<BuildReport> {
        let started_at = chrono::Utc::now();
        let start = Instant::now();
        info!(workers = self.pool.workers(), "graph build started");

        let paragraphs = self.build_paragraph_graph()?;
        let entities = if paragraphs.cancelled {
            PassReport {
                cancelled: true,
                ..PassReport::default()
            }
        } else {
            self.build_entity_graph()?
        };
        self.store.checkpoint()?;

        let report = BuildReport {
            started_at,
            cancelled: paragraphs.cancelled || entities.cancelled,
            paragraphs,
            entities,
            elapsed_seconds: start.elapsed().as_secs_f64(),
        };
        info!(
            paragraphs = report.paragraphs.succeeded,
            entities = report.entities.succeeded,
            failed = report.failed_units(),
            cancelled = report.cancelled,
            duration_secs = report.elapsed_seconds,
            "graph build finished"
        );
        Ok(report)
    }

    /// Write `paragraph → entities` for every live document
    pub fn build_paragraph_graph(&self) -> Result<PassReport> {
        let total = self.index.max_ordinal();
        let ordinals: Vec<DocOrdinal> = (0..total).collect();
        info!(documents = total, "paragraph pass started");

        let tracker = ProgressTracker::new(
            "paragraphs",
            ordinals.len(),
            self.settings.progress_log_every,
        );
        let index = &self.index;
        self.run_pass(
            Relation::ParagraphEntities,
            &ordinals,
            self.settings.checkpoint_every,
            &tracker,
            |&ordinal| {
                let unit = ordinal.to_string();
                let paragraph = index
                    .stored_paragraph(ordinal)
                    .map_err(|e| (unit.clone(), MixtureError::index(unit.as_str(), e)))?;
                let Some(paragraph) = paragraph else {
                    return Ok(None);
                };
                validate_ids(&paragraph.paragraph_id, &paragraph.entities)
                    .map_err(|e| (paragraph.paragraph_id.clone(), MixtureError::from(e)))?;
                Ok(Some((paragraph.paragraph_id, paragraph.entities)))
            },
        )
    }

    /// Write `entity → paragraphs` for every distinct entity term
    pub fn build_entity_graph(&self) -> Result<PassReport> {
        let terms = self
            .index
            .entity_terms()
            .map_err(|e| MixtureError::index(FIELD_ENTITIES, e))?;
        info!(entities = terms.len(), "entity pass started");

        let tracker =
            ProgressTracker::new("entities", terms.len(), self.settings.progress_log_every);
        let index = &self.index;
        let cap = self.settings.entity_result_cap;
        self.run_pass(
            Relation::EntityParagraphs,
            &terms,
            self.settings.entity_batch_size,
            &tracker,
            |entity| {
                let fail = |e: IndexError| (entity.clone(), MixtureError::index(entity.as_str(), e));
                let ordinals = index.term_query(entity, cap).map_err(fail)?;

                let mut paragraphs = Vec::with_capacity(ordinals.len());
                for ordinal in ordinals {
                    if let Some(paragraph) = index.stored_paragraph(ordinal).map_err(fail)? {
                        paragraphs.push(paragraph.paragraph_id);
                    }
                }
                validate_ids(entity, &paragraphs)
                    .map_err(|e| (entity.clone(), MixtureError::from(e)))?;
                Ok(Some((entity.clone(), paragraphs)))
            },
        )
    }

    fn run_pass<T, F>(
        &self,
        relation: Relation,
        units: &[T],
        batch_size: usize,
        tracker: &ProgressTracker,
        process: F,
    ) -> Result<PassReport>
    where
        T: Sync,
        F: Fn(&T) -> UnitResult + Sync + Send,
    {
        let mut report = PassReport::new(units.len());

        for batch in units.chunks(batch_size.max(1)) {
            if self.cancel.is_cancelled() {
                warn!(pass = %relation, done = report.succeeded, "build cancelled");
                report.cancelled = true;
                break;
            }

            let results = self.pool.map(batch, |unit| {
                let result = process(unit);
                tracker.record(1, usize::from(result.is_err()));
                result
            });

            let mut entries = Vec::with_capacity(batch.len());
            for result in results {
                match result {
                    Ok(Some(entry)) => entries.push(entry),
                    Ok(None) => report.skipped += 1,
                    Err((unit, error)) => {
                        warn!(pass = %relation, unit = %unit, error = %error, "unit failed");
                        if self.settings.fail_fast {
                            return Err(error);
                        }
                        report.record_failure(unit, error.to_string());
                    }
                }
            }

            self.store.put_batch(relation, &entries)?;
            report.succeeded += entries.len();
            report.checkpoints += 1;
            info!(
                pass = %relation,
                written = report.succeeded,
                total = report.total_units,
                "checkpoint"
            );
        }

        Ok(report)
    }
}
