//! Content quality scoring for taxonomy nodes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::node::TaxonomyNode;

/// Descriptions longer than this count as meaningful.
pub const MEANINGFUL_DESCRIPTION_LEN: usize = 50;

/// Descriptions shorter than this select a node for enhancement.
pub const WEAK_DESCRIPTION_LEN: usize = 50;

/// Default export threshold: every node scoring below it is low quality.
pub const DEFAULT_LOW_QUALITY_THRESHOLD: u32 = 30;

/// Points for a trimmed description of `len` characters.
pub fn description_points(len: usize) -> u32 {
    match len {
        0 => 0,
        1..=19 => 10,
        20..=49 => 25,
        50..=99 => 40,
        _ => 60,
    }
}

/// Score in `0..=100` computed from the node's own fields only.
pub fn score(node: &TaxonomyNode) -> u32 {
    let children = node.children().len();
    let mut score = description_points(node.description_len());
    if node.has_links() {
        score += 20;
    }
    if children > 0 {
        score += 10;
    }
    if children > 3 {
        score += 10;
    }
    score
}

/// Whether a node should be sent for enhancement: a short description or no
/// usable link. Independent of the score tiers.
pub fn needs_enhancement(node: &TaxonomyNode) -> bool {
    node.description_len() < WEAK_DESCRIPTION_LEN || !node.has_links()
}

/// Score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=29 => QualityTier::Low,
            30..=59 => QualityTier::Medium,
            _ => QualityTier::High,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        })
    }
}

/// Derived quality facts about one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub path: String,
    pub name: String,
    pub description_length: usize,
    pub has_meaningful_description: bool,
    pub has_links: bool,
    pub children_count: usize,
    pub score: u32,
}

impl QualityMetrics {
    pub fn from_node(node: &TaxonomyNode, path: impl Into<String>) -> Self {
        let description_length = node.description_len();
        Self {
            path: path.into(),
            name: node.display_name().to_string(),
            description_length,
            has_meaningful_description: description_length > MEANINGFUL_DESCRIPTION_LEN,
            has_links: node.has_links(),
            children_count: node.children().len(),
            score: score(node),
        }
    }

    pub fn tier(&self) -> QualityTier {
        QualityTier::from_score(self.score)
    }
}

/// Metrics for every node of the tree, in pre-order.
pub fn analyze_tree(root: &TaxonomyNode) -> Vec<QualityMetrics> {
    root.walk()
        .map(|entry| QualityMetrics::from_node(entry.node, entry.path))
        .collect()
}

/// Metrics sorted weakest first, with tier counts.
#[derive(Debug, Clone)]
pub struct QualityReport {
    pub metrics: Vec<QualityMetrics>,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl QualityReport {
    pub fn new(mut metrics: Vec<QualityMetrics>) -> Self {
        // stable: equal scores keep tree order
        metrics.sort_by_key(|m| m.score);

        let count = |tier: QualityTier| metrics.iter().filter(|m| m.tier() == tier).count();
        let (low, medium, high) = (
            count(QualityTier::Low),
            count(QualityTier::Medium),
            count(QualityTier::High),
        );

        Self {
            metrics,
            low,
            medium,
            high,
        }
    }

    pub fn total(&self) -> usize {
        self.metrics.len()
    }

    /// Nodes in one tier, weakest first.
    pub fn in_tier(&self, tier: QualityTier) -> impl Iterator<Item = &QualityMetrics> {
        self.metrics.iter().filter(move |m| m.tier() == tier)
    }

    pub fn average_score(&self) -> f64 {
        if self.metrics.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.metrics.iter().map(|m| u64::from(m.score)).sum();
        sum as f64 / self.metrics.len() as f64
    }
}

/// Low-quality node export written by `analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowQualityExport {
    pub analysis_date: String,
    pub threshold: u32,
    pub total_low_quality: usize,
    pub nodes: Vec<QualityMetrics>,
}

impl LowQualityExport {
    /// Select every node scoring below `threshold`, stamped with the current time.
    pub fn from_metrics(metrics: &[QualityMetrics], threshold: u32) -> Self {
        Self::from_metrics_at(metrics, threshold, Utc::now())
    }

    pub fn from_metrics_at(
        metrics: &[QualityMetrics],
        threshold: u32,
        analysed_at: DateTime<Utc>,
    ) -> Self {
        let nodes: Vec<QualityMetrics> = metrics
            .iter()
            .filter(|m| m.score < threshold)
            .cloned()
            .collect();

        Self {
            analysis_date: analysed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            threshold,
            total_low_quality: nodes.len(),
            nodes,
        }
    }
}
