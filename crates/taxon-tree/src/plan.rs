//! Grouping weak nodes into enhancement batches.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::node::TaxonomyNode;
use crate::quality::needs_enhancement;

/// Category assigned to the tree root itself.
pub const ROOT_CATEGORY: &str = "root";

pub const DEFAULT_BATCH_SIZE: usize = 10;

pub const DEFAULT_PRIORITY_CATEGORIES: [&str; 5] = [
    "Creative Code Frameworks",
    "Game Engines",
    "AI/Machine Learning",
    "Physical Computing",
    "Web Technologies",
];

/// A node selected for enhancement, as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchNode {
    pub name: String,
    #[serde(default)]
    pub current_description: String,
    #[serde(default)]
    pub current_links: IndexMap<String, Option<String>>,
    pub path: String,
}

impl BatchNode {
    fn from_node(node: &TaxonomyNode, path: String) -> Self {
        Self {
            name: node.display_name().to_string(),
            current_description: node.description.clone(),
            current_links: node.links.clone(),
            path,
        }
    }
}

/// One unit of work for the service. Also the batch work file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementBatch {
    pub batch_id: String,
    pub category: String,
    pub nodes_to_enhance: Vec<BatchNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::High => "high",
            Priority::Medium => "medium",
        })
    }
}

/// A batch with the priority the planner gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedBatch {
    pub priority: Priority,
    #[serde(flatten)]
    pub batch: EnhancementBatch,
}

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub batch_size: usize,
    pub priority_categories: Vec<String>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            priority_categories: DEFAULT_PRIORITY_CATEGORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Weak nodes grouped by top-level category, first-seen order throughout.
fn group_weak_nodes(root: &TaxonomyNode) -> IndexMap<String, Vec<BatchNode>> {
    let mut groups: IndexMap<String, Vec<BatchNode>> = IndexMap::new();
    let mut current_top = String::new();

    for entry in root.walk() {
        let category = match entry.depth {
            0 => ROOT_CATEGORY.to_string(),
            1 => {
                current_top = entry.node.display_name().to_string();
                current_top.clone()
            }
            _ => current_top.clone(),
        };

        if needs_enhancement(entry.node) {
            groups
                .entry(category)
                .or_default()
                .push(BatchNode::from_node(entry.node, entry.path));
        }
    }

    groups
}

/// Split weak nodes into batches of at most `batch_size` per category.
pub fn collect_batches(
    root: &TaxonomyNode,
    batch_size: usize,
) -> TaxonomyResult<Vec<EnhancementBatch>> {
    if batch_size == 0 {
        return Err(TaxonomyError::InvalidBatchSize);
    }

    let mut batches = Vec::new();
    for (category, nodes) in group_weak_nodes(root) {
        for (i, window) in nodes.chunks(batch_size).enumerate() {
            batches.push(EnhancementBatch {
                batch_id: format!("{category}_{}", i + 1),
                category: category.clone(),
                nodes_to_enhance: window.to_vec(),
            });
        }
    }
    Ok(batches)
}

/// Order batches so that priority categories come first, term by term.
pub fn prioritize(batches: Vec<EnhancementBatch>, terms: &[String]) -> Vec<PlannedBatch> {
    let mut remaining: Vec<Option<EnhancementBatch>> = batches.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for term in terms {
        let term = term.to_lowercase();
        for slot in remaining.iter_mut() {
            let matches = slot
                .as_ref()
                .is_some_and(|b| b.category.to_lowercase().contains(&term));
            if matches {
                if let Some(batch) = slot.take() {
                    ordered.push(PlannedBatch {
                        priority: Priority::High,
                        batch,
                    });
                }
            }
        }
    }

    ordered.extend(remaining.into_iter().flatten().map(|batch| PlannedBatch {
        priority: Priority::Medium,
        batch,
    }));
    ordered
}

/// Plan the enhancement run for a consolidated tree.
pub fn plan_batches(root: &TaxonomyNode, options: &PlanOptions) -> TaxonomyResult<Vec<PlannedBatch>> {
    let batches = collect_batches(root, options.batch_size)?;
    Ok(prioritize(batches, &options.priority_categories))
}

/// Summary of a planned run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingPlan {
    pub total_nodes_needing_enhancement: usize,
    pub estimated_api_calls: usize,
    /// Nodes handled per service call, rounded to one decimal.
    pub efficiency: f64,
    pub total_batches: usize,
    pub batches: Vec<PlannedBatch>,
}

impl ProcessingPlan {
    pub fn new(batches: Vec<PlannedBatch>) -> Self {
        let total_nodes: usize = batches.iter().map(|b| b.batch.nodes_to_enhance.len()).sum();
        let calls = batches.len();
        let efficiency = if calls == 0 {
            0.0
        } else {
            (total_nodes as f64 / calls as f64 * 10.0).round() / 10.0
        };

        Self {
            total_nodes_needing_enhancement: total_nodes,
            estimated_api_calls: calls,
            efficiency,
            total_batches: calls,
            batches,
        }
    }

    pub fn find_batch(&self, batch_id: &str) -> TaxonomyResult<&PlannedBatch> {
        self.batches
            .iter()
            .find(|b| b.batch.batch_id == batch_id)
            .ok_or_else(|| TaxonomyError::BatchNotFound(batch_id.to_string()))
    }

    pub fn first(&self) -> Option<&PlannedBatch> {
        self.batches.first()
    }
}
