//! Processing enhancement batches end to end.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

use taxon_tree::{build, BuildInputs, BuildReport, EnhancementBatch};

use crate::apply::FragmentSet;
use crate::error::EnhanceResult;
use crate::generator::TextGenerator;
use crate::prompt::{generation_request, PromptSettings};
use crate::reply::parse_reply;

/// Everything the pipeline needs besides the generator.
#[derive(Debug, Clone)]
pub struct EnhancerSettings {
    pub prompt: PromptSettings,
    /// Name of the tree root, stripped from paths before matching.
    pub root_name: String,
    /// Fragment directory and consolidated output for the rebuild.
    pub build: BuildInputs,
}

/// Result of the rebuild that follows a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildStatus {
    /// Nothing changed, so nothing was rebuilt.
    Skipped,
    Rebuilt(BuildReport),
    /// Fragment writes stand; only the consolidated file is stale.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub batch_id: String,
    pub requested: usize,
    pub enhanced: usize,
    /// Names from the reply that did not lead to an update.
    pub unmatched: Vec<String>,
    pub files_written: Vec<PathBuf>,
    pub rebuild: RebuildStatus,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub nodes_enhanced: usize,
    /// Batches left unprocessed because of the batch limit.
    pub remaining: usize,
    pub outcomes: Vec<BatchOutcome>,
    /// `(batch id, error message)` for every failed batch.
    pub failures: Vec<(String, String)>,
}

/// Drives batches through a [`TextGenerator`] and into the fragment files.
pub struct Enhancer<G> {
    generator: G,
    settings: EnhancerSettings,
}

impl<G: TextGenerator> Enhancer<G> {
    pub fn new(generator: G, settings: EnhancerSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Enhance one batch.
    ///
    /// A service failure or an unusable reply fails the batch before any file
    /// is touched. A failed rebuild is reported in the outcome instead.
    pub async fn process_batch(&self, batch: &EnhancementBatch) -> EnhanceResult<BatchOutcome> {
        info!(
            batch = %batch.batch_id,
            category = %batch.category,
            nodes = batch.nodes_to_enhance.len(),
            generator = self.generator.name(),
            "Requesting enhancements"
        );

        let request = generation_request(batch, &self.settings.prompt);
        let text = self.generator.generate(&request).await?;
        let reply = parse_reply(&text)?;

        let mut fragments = FragmentSet::load(&self.settings.build.data_dir, &self.settings.root_name)?;
        let mut enhanced = 0;
        let mut unmatched = Vec::new();

        for enhancement in &reply.enhancements {
            let target = batch
                .nodes_to_enhance
                .iter()
                .find(|node| node.name == enhancement.name);

            let updated = match target {
                Some(node) => fragments.apply(&node.path, enhancement),
                None => None,
            };
            match updated {
                Some(file) => {
                    info!(node = %enhancement.name, file = %file.display(), "Enhanced node");
                    enhanced += 1;
                }
                None => {
                    warn!(node = %enhancement.name, "No matching weak node for enhancement");
                    unmatched.push(enhancement.name.clone());
                }
            }
        }

        let files_written = fragments.save()?;
        let rebuild = if files_written.is_empty() {
            RebuildStatus::Skipped
        } else {
            match build(&self.settings.build) {
                Ok(report) => RebuildStatus::Rebuilt(report),
                Err(e) => {
                    error!(error = %e, "Rebuild after enhancement failed");
                    RebuildStatus::Failed(e.to_string())
                }
            }
        };

        Ok(BatchOutcome {
            batch_id: batch.batch_id.clone(),
            requested: batch.nodes_to_enhance.len(),
            enhanced,
            unmatched,
            files_written,
            rebuild,
        })
    }

    /// Process up to `max_batches` batches in order, pausing `delay` between
    /// service calls. A failed batch is recorded and the run continues.
    pub async fn run_batches(
        &self,
        batches: &[EnhancementBatch],
        max_batches: usize,
        delay: Duration,
    ) -> RunSummary {
        let selected = &batches[..batches.len().min(max_batches)];
        let mut summary = RunSummary {
            remaining: batches.len() - selected.len(),
            ..RunSummary::default()
        };

        for (i, batch) in selected.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            summary.processed += 1;
            match self.process_batch(batch).await {
                Ok(outcome) => {
                    summary.succeeded += 1;
                    summary.nodes_enhanced += outcome.enhanced;
                    summary.outcomes.push(outcome);
                }
                Err(e) => {
                    error!(batch = %batch.batch_id, error = %e, "Batch failed");
                    summary.failed += 1;
                    summary.failures.push((batch.batch_id.clone(), e.to_string()));
                }
            }
        }

        info!(
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            enhanced = summary.nodes_enhanced,
            remaining = summary.remaining,
            "Batch run finished"
        );
        summary
    }
}
