//! Output formatting utilities for CLI commands.
//!
//! Command results go to stdout as plain text; logs go to stderr.

use std::fmt::Write as _;
use std::io::Write;

use taxon_tree::{
    BuildReport, ConsolidationOutcome, ConsolidationPlan, ConsolidationReport, CopyAction,
    ProcessingPlan, QualityReport, QualityTier,
};
use taxon_enhance::{BatchOutcome, RebuildStatus, RunSummary};

use crate::error::CliError;

/// Batches listed by `plan`.
pub const PLAN_PREVIEW_LEN: usize = 10;
/// Lowest-scoring nodes listed by `analyze`.
pub const ANALYZE_PREVIEW_LEN: usize = 10;

/// Trait for types that can be formatted for output
pub trait FormattedOutput {
    fn format_text(&self) -> String;
}

/// Print formatted output to stdout
pub fn print_output<T: FormattedOutput>(value: &T) -> Result<(), CliError> {
    write_output(value, std::io::stdout().lock())
}

/// Print formatted output to a writer
pub fn write_output<T, W>(value: &T, mut writer: W) -> Result<(), CliError>
where
    T: FormattedOutput,
    W: Write,
{
    writeln!(writer, "{}", value.format_text())?;
    Ok(())
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Helper for simple string outputs
#[derive(Debug)]
pub struct SimpleOutput {
    pub message: String,
}

impl SimpleOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl FormattedOutput for SimpleOutput {
    fn format_text(&self) -> String {
        self.message.clone()
    }
}

impl FormattedOutput for BuildReport {
    fn format_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Loaded {} categories:", self.loaded.len());
        for name in &self.loaded {
            let _ = writeln!(out, "  + {name}");
        }
        for path in &self.missing {
            let _ = writeln!(out, "  ! missing fragment {}", path.display());
        }
        let _ = write!(out, "Wrote {} ({} bytes)", self.output.display(), self.bytes);
        out
    }
}

impl FormattedOutput for QualityReport {
    fn format_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Analyzed {} nodes", self.total());
        let _ = writeln!(out, "  low (<30):      {}", self.low);
        let _ = writeln!(out, "  medium (30-59): {}", self.medium);
        let _ = writeln!(out, "  high (60+):     {}", self.high);
        let _ = writeln!(out, "  average score:  {:.1}", self.average_score());

        let lowest: Vec<_> = self.in_tier(QualityTier::Low).take(ANALYZE_PREVIEW_LEN).collect();
        if !lowest.is_empty() {
            let _ = writeln!(out, "Lowest scoring nodes:");
            for m in lowest {
                let _ = writeln!(out, "  {:>3}  {}", m.score, truncate(&m.path, 70));
            }
        }
        out.trim_end().to_string()
    }
}

impl FormattedOutput for ProcessingPlan {
    fn format_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Nodes needing enhancement: {}", self.total_nodes_needing_enhancement);
        let _ = writeln!(out, "Estimated API calls:       {}", self.estimated_api_calls);
        let _ = writeln!(out, "Nodes per call:            {:.1}", self.efficiency);

        if !self.batches.is_empty() {
            let _ = writeln!(out, "Batches:");
        }
        for planned in self.batches.iter().take(PLAN_PREVIEW_LEN) {
            let _ = writeln!(
                out,
                "  [{:<6}] {} ({} nodes)",
                planned.priority,
                planned.batch.batch_id,
                planned.batch.nodes_to_enhance.len()
            );
        }
        if self.batches.len() > PLAN_PREVIEW_LEN {
            let _ = writeln!(out, "  ... and {} more", self.batches.len() - PLAN_PREVIEW_LEN);
        }
        out.trim_end().to_string()
    }
}

fn rebuild_line(status: &RebuildStatus) -> String {
    match status {
        RebuildStatus::Skipped => "no changes, rebuild skipped".to_string(),
        RebuildStatus::Rebuilt(report) => format!("rebuilt {}", report.output.display()),
        RebuildStatus::Failed(message) => format!("rebuild failed: {message}"),
    }
}

impl FormattedOutput for BatchOutcome {
    fn format_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: enhanced {}/{} nodes",
            self.batch_id, self.enhanced, self.requested
        );
        for name in &self.unmatched {
            let _ = writeln!(out, "  - not applied: {name}");
        }
        for file in &self.files_written {
            let _ = writeln!(out, "  * updated {}", file.display());
        }
        let _ = write!(out, "  {}", rebuild_line(&self.rebuild));
        out
    }
}

impl FormattedOutput for RunSummary {
    fn format_text(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let _ = writeln!(out, "{}", outcome.format_text());
        }
        for (batch_id, message) in &self.failures {
            let _ = writeln!(out, "{batch_id}: FAILED ({message})");
        }
        let _ = writeln!(
            out,
            "Processed {} batches: {} succeeded, {} failed, {} nodes enhanced",
            self.processed, self.succeeded, self.failed, self.nodes_enhanced
        );
        if self.remaining > 0 {
            let _ = write!(out, "{} batches remain for a later run", self.remaining);
        }
        out.trim_end().to_string()
    }
}

impl FormattedOutput for ConsolidationPlan {
    fn format_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Cleanup plan:");
        for category in &self.categories {
            let _ = writeln!(out, "  {}:", category.canonical);
            if category.is_missing() {
                let _ = writeln!(out, "    no copies found");
            }
            for copy in &category.copies {
                let target = match copy.action {
                    CopyAction::Promote => format!(" -> {}", category.canonical),
                    _ => String::new(),
                };
                let _ = writeln!(
                    out,
                    "    {:<6} {}{target} ({}, {} bytes)",
                    copy.action.to_string(),
                    copy.file_name(),
                    copy.modified_display(),
                    copy.stamp.len
                );
            }
        }
        let _ = write!(
            out,
            "Files to keep/rename: {}, files to remove: {}",
            self.count(CopyAction::Keep) + self.count(CopyAction::Promote),
            self.count(CopyAction::Remove)
        );
        out
    }
}

impl FormattedOutput for ConsolidationReport {
    fn format_text(&self) -> String {
        let mut out = String::new();
        for (name, outcome) in &self.outcomes {
            let line = match outcome {
                ConsolidationOutcome::Missing => "missing, skipped".to_string(),
                ConsolidationOutcome::AlreadyCanonical { removed } => {
                    format!("kept, removed {} copies", removed.len())
                }
                ConsolidationOutcome::Replaced { source, removed } => {
                    let source = source.file_name().unwrap_or_default().to_string_lossy();
                    format!("replaced from {source}, removed {} copies", removed.len())
                }
            };
            let _ = writeln!(out, "  {name}: {line}");
        }
        let _ = write!(
            out,
            "Consolidated {} categories: {} replaced, {} files removed",
            self.outcomes.len(),
            self.replaced_count(),
            self.removed_count()
        );
        out
    }
}
