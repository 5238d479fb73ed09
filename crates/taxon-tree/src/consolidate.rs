//! Collapsing saved copies of a category file back onto its canonical name.
//!
//! Enhancement runs leave `{stem}_backup.json` files behind, and manual edits
//! leave things like `{stem}.json.bak`. For each expected category file the
//! newest copy (larger size wins a tie) becomes the canonical file and every
//! other copy is deleted.
//!
//! [`plan_consolidation`] only reads the directory; [`execute_plan`] carries
//! a plan out. [`consolidate`] does both.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use taxon_common_fs::{file_stamp, FileStamp};

use crate::build::load_index;
use crate::error::TaxonomyResult;

/// What happened to one category file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsolidationOutcome {
    /// No copy exists; nothing was created.
    Missing,
    /// The canonical file was already the newest copy.
    AlreadyCanonical { removed: Vec<PathBuf> },
    /// A newer copy replaced the canonical file.
    Replaced { source: PathBuf, removed: Vec<PathBuf> },
}

impl ConsolidationOutcome {
    pub fn removed(&self) -> &[PathBuf] {
        match self {
            ConsolidationOutcome::Missing => &[],
            ConsolidationOutcome::AlreadyCanonical { removed }
            | ConsolidationOutcome::Replaced { removed, .. } => removed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsolidationReport {
    /// `(canonical file name, outcome)` in processing order.
    pub outcomes: Vec<(String, ConsolidationOutcome)>,
}

impl ConsolidationReport {
    pub fn removed_count(&self) -> usize {
        self.outcomes.iter().map(|(_, o)| o.removed().len()).sum()
    }

    pub fn replaced_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ConsolidationOutcome::Replaced { .. }))
            .count()
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == ConsolidationOutcome::Missing)
            .map(|(name, _)| name.as_str())
    }
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

fn stem_of(canonical: &str) -> &str {
    canonical.strip_suffix(".json").unwrap_or(canonical)
}

/// Whether `name` is a saved copy of `canonical` (or the file itself).
pub fn is_candidate(name: &str, canonical: &str) -> bool {
    if name.starts_with('_') {
        return false;
    }
    let stem = stem_of(canonical);
    name == canonical
        || name.starts_with(&format!("{stem}_backup"))
        || name.starts_with(canonical)
}

/// Category file names listed in the index.
pub fn expected_from_index(index_path: &Path) -> TaxonomyResult<Vec<String>> {
    Ok(load_index(index_path)?
        .into_iter()
        .map(|entry| entry.filename)
        .collect())
}

/// Category file names inferred from the directory: every file name is cut
/// at `_backup` (or `.json`) and the remaining stem gets `.json` appended.
pub fn discover_categories(dir: &Path) -> TaxonomyResult<Vec<String>> {
    let mut stems = BTreeSet::new();
    for path in taxon_common_fs::list_files(dir)? {
        let name = file_name(&path);
        if name.starts_with('_') {
            continue;
        }
        let stem = match name.find("_backup") {
            Some(pos) => &name[..pos],
            None => match name.find(".json") {
                Some(pos) => &name[..pos],
                None => continue,
            },
        };
        if !stem.is_empty() {
            stems.insert(format!("{stem}.json"));
        }
    }
    Ok(stems.into_iter().collect())
}

/// What a plan does with one copy of a category file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAction {
    /// The canonical file is already the newest copy.
    Keep,
    /// This copy becomes the canonical file.
    Promote,
    /// This copy is deleted.
    Remove,
}

impl fmt::Display for CopyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CopyAction::Keep => "KEEP",
            CopyAction::Promote => "RENAME",
            CopyAction::Remove => "REMOVE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub path: PathBuf,
    pub stamp: FileStamp,
    pub action: CopyAction,
}

impl PlannedCopy {
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    /// Modification time as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub fn modified_display(&self) -> String {
        format_time(self.stamp.modified)
    }
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Copies of one category file, newest first. Empty when none exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPlan {
    pub canonical: String,
    pub copies: Vec<PlannedCopy>,
}

impl CategoryPlan {
    pub fn is_missing(&self) -> bool {
        self.copies.is_empty()
    }

    fn with_action(&self, action: CopyAction) -> impl Iterator<Item = &PlannedCopy> {
        self.copies.iter().filter(move |c| c.action == action)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidationPlan {
    pub categories: Vec<CategoryPlan>,
}

impl ConsolidationPlan {
    pub fn count(&self, action: CopyAction) -> usize {
        self.categories
            .iter()
            .map(|c| c.with_action(action).count())
            .sum()
    }
}

fn plan_one(canonical: &str, files: &[PathBuf]) -> TaxonomyResult<CategoryPlan> {
    let mut candidates: Vec<(FileStamp, PathBuf)> = Vec::new();
    for path in files.iter().filter(|p| is_candidate(file_name(p), canonical)) {
        candidates.push((file_stamp(path)?, path.clone()));
    }

    // newest first; larger size breaks a tie
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    let copies = candidates
        .into_iter()
        .enumerate()
        .map(|(rank, (stamp, path))| {
            let action = match rank {
                0 if file_name(&path) == canonical => CopyAction::Keep,
                0 => CopyAction::Promote,
                _ => CopyAction::Remove,
            };
            PlannedCopy {
                path,
                stamp,
                action,
            }
        })
        .collect();

    Ok(CategoryPlan {
        canonical: canonical.to_string(),
        copies,
    })
}

/// Decide, without changing anything on disk, what consolidating each
/// expected category file in `dir` would do.
pub fn plan_consolidation(dir: &Path, expected: &[String]) -> TaxonomyResult<ConsolidationPlan> {
    let files = taxon_common_fs::list_files(dir)?;
    let categories = expected
        .iter()
        .map(|canonical| plan_one(canonical, &files))
        .collect::<TaxonomyResult<Vec<_>>>()?;
    Ok(ConsolidationPlan { categories })
}

fn execute_one(dir: &Path, plan: &CategoryPlan) -> TaxonomyResult<ConsolidationOutcome> {
    if plan.is_missing() {
        return Ok(ConsolidationOutcome::Missing);
    }

    let target = dir.join(&plan.canonical);
    let promoted = plan.with_action(CopyAction::Promote).next();
    if let Some(copy) = promoted {
        taxon_common_fs::copy_file(&copy.path, &target, true)?;
        info!(source = %copy.file_name(), target = %plan.canonical, "Promoted newest copy");
    }

    let mut removed = Vec::new();
    for copy in plan.with_action(CopyAction::Remove) {
        if copy.path == target {
            continue;
        }
        if taxon_common_fs::remove_file_if_exists(&copy.path)? {
            debug!(file = %copy.file_name(), "Removed stale copy");
            removed.push(copy.path.clone());
        }
    }

    Ok(match promoted {
        Some(copy) => {
            // the promoted copy was only copied; drop the original
            if taxon_common_fs::remove_file_if_exists(&copy.path)? {
                removed.push(copy.path.clone());
            }
            ConsolidationOutcome::Replaced {
                source: copy.path.clone(),
                removed,
            }
        }
        None => ConsolidationOutcome::AlreadyCanonical { removed },
    })
}

/// Carry out a plan made by [`plan_consolidation`].
pub fn execute_plan(dir: &Path, plan: &ConsolidationPlan) -> TaxonomyResult<ConsolidationReport> {
    let mut report = ConsolidationReport::default();
    for category in &plan.categories {
        let outcome = execute_one(dir, category)?;
        report.outcomes.push((category.canonical.clone(), outcome));
    }

    info!(
        categories = plan.categories.len(),
        replaced = report.replaced_count(),
        removed = report.removed_count(),
        "Consolidation finished"
    );
    Ok(report)
}

/// Consolidate every expected category file in `dir`.
pub fn consolidate(dir: &Path, expected: &[String]) -> TaxonomyResult<ConsolidationReport> {
    let plan = plan_consolidation(dir, expected)?;
    execute_plan(dir, &plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_names() {
        assert!(is_candidate("audio.json", "audio.json"));
        assert!(is_candidate("audio_backup.json", "audio.json"));
        assert!(is_candidate("audio_backup_2.json", "audio.json"));
        assert!(is_candidate("audio.json.bak", "audio.json"));
        assert!(!is_candidate("audio_tools.json", "audio.json"));
        assert!(!is_candidate("_audio.json", "audio.json"));
        assert!(!is_candidate("video.json", "audio.json"));
    }

    #[test]
    fn test_discover_groups_copies() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "audio.json",
            "audio_backup.json",
            "video_backup.json",
            "_index.json",
            "notes.txt",
        ] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        assert_eq!(
            discover_categories(dir.path()).unwrap(),
            vec!["audio.json", "video.json"]
        );
    }

    #[test]
    fn test_missing_category_is_not_fabricated() {
        let dir = tempfile::tempdir().unwrap();
        let report = consolidate(dir.path(), &["ghost.json".to_string()]).unwrap();
        assert_eq!(report.outcomes[0].1, ConsolidationOutcome::Missing);
        assert!(!dir.path().join("ghost.json").exists());
        assert_eq!(report.missing().collect::<Vec<_>>(), vec!["ghost.json"]);
    }

    #[test]
    fn test_plan_labels_and_time_format() {
        assert_eq!(CopyAction::Promote.to_string(), "RENAME");
        assert_eq!(format_time(SystemTime::UNIX_EPOCH), "1970-01-01 00:00:00");

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("audio.json"), "{}").unwrap();
        let plan = plan_consolidation(dir.path(), &["audio.json".to_string()]).unwrap();
        assert_eq!(plan.categories[0].copies[0].action, CopyAction::Keep);
        assert_eq!(plan.count(CopyAction::Remove), 0);
    }
}
