//! Taxonomy tree model and the offline half of the enhancement pipeline.
//!
//! A taxonomy lives on disk as one JSON fragment per top-level category plus
//! a metadata shell and an ordering index. This crate merges those fragments
//! into the consolidated document, scores every node, groups weak nodes into
//! enhancement batches and keeps the fragment directory tidy.

pub mod build;
pub mod consolidate;
pub mod error;
pub mod io;
pub mod node;
pub mod normalize;
pub mod plan;
pub mod quality;
pub mod walk;

pub use build::{build, load_index, BuildInputs, BuildReport, CategoryIndexEntry};
pub use consolidate::{
    consolidate, discover_categories, execute_plan, expected_from_index, plan_consolidation,
    CategoryPlan, ConsolidationOutcome, ConsolidationPlan, ConsolidationReport, CopyAction,
    PlannedCopy,
};
pub use error::{TaxonomyError, TaxonomyResult};
pub use taxon_common_fs::FileStamp;
pub use node::{LocalizedName, TaxonomyNode, UNKNOWN_NAME};
pub use normalize::normalize;
pub use plan::{
    plan_batches, BatchNode, EnhancementBatch, PlanOptions, PlannedBatch, Priority,
    ProcessingPlan,
};
pub use quality::{
    analyze_tree, needs_enhancement, score, LowQualityExport, QualityMetrics, QualityReport,
    QualityTier,
};
pub use walk::{join_path, Walk, WalkEntry};
