//! Applying enhancements to category fragment files.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use taxon_tree::io::{read_json, write_json};
use taxon_tree::quality::WEAK_DESCRIPTION_LEN;
use taxon_tree::TaxonomyNode;

use crate::error::EnhanceResult;
use crate::reply::Enhancement;

const BACKUP_SUFFIX: &str = "_backup.json";

/// Whether a file in the data directory holds a category fragment.
/// Index, metadata and backup files do not.
pub fn is_fragment_file(name: &str) -> bool {
    name.ends_with(".json") && !name.starts_with('_') && !name.ends_with(BACKUP_SUFFIX)
}

/// Single-slot backup location next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    path.with_file_name(format!("{stem}{BACKUP_SUFFIX}"))
}

fn strip_root<'a>(path: &'a str, root_name: &str) -> &'a str {
    path.strip_prefix(root_name)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

fn is_segment_suffix(long: &str, short: &str) -> bool {
    long.len() > short.len()
        && long.ends_with(short)
        && long.as_bytes()[long.len() - short.len() - 1] == b'/'
}

/// Whether a fragment node at `candidate` is the node planned at `target`.
///
/// An optional `"{root_name}/"` prefix is ignored on both sides; then the
/// paths must be equal or `target` must end with the whole segments of
/// `candidate`. A longer candidate never matches a shorter target.
pub fn path_matches(candidate: &str, target: &str, root_name: &str) -> bool {
    let candidate = strip_root(candidate, root_name);
    let target = strip_root(target, root_name);
    candidate == target || is_segment_suffix(target, candidate)
}

/// What an enhancement changed on one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub description: bool,
    pub links: bool,
}

impl Applied {
    pub fn any(&self) -> bool {
        self.description || self.links
    }
}

/// Fill in a weak description and/or missing links. Strong content is kept.
pub fn apply_to_node(node: &mut TaxonomyNode, enhancement: &Enhancement) -> Applied {
    let mut applied = Applied::default();

    if let Some(description) = enhancement.description() {
        if node.description_len() < WEAK_DESCRIPTION_LEN {
            node.description = description.to_string();
            applied.description = true;
        }
    }

    if !enhancement.links.is_empty() && !node.has_links() {
        node.set_links(enhancement.links.clone());
        applied.links = true;
    }

    applied
}

#[derive(Debug)]
struct Fragment {
    path: PathBuf,
    tree: TaxonomyNode,
    modified: bool,
}

/// Every category fragment of a data directory, loaded for editing.
#[derive(Debug)]
pub struct FragmentSet {
    fragments: Vec<Fragment>,
    root_name: String,
}

impl FragmentSet {
    /// Load fragments in file-name order. Any unreadable fragment fails the load.
    pub fn load(dir: &Path, root_name: impl Into<String>) -> EnhanceResult<Self> {
        let mut fragments = Vec::new();
        for path in taxon_common_fs::list_files_with_extension(dir, "json")? {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if !is_fragment_file(name) {
                continue;
            }
            let tree: TaxonomyNode = read_json(&path, "category fragment")?;
            fragments.push(Fragment {
                path,
                tree,
                modified: false,
            });
        }
        debug!(count = fragments.len(), dir = %dir.display(), "Loaded fragments");

        Ok(Self {
            fragments,
            root_name: root_name.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Apply `enhancement` to the first node (across fragments, in pre-order)
    /// that matches `target_path` and accepts an update.
    ///
    /// Returns the fragment that changed.
    pub fn apply(&mut self, target_path: &str, enhancement: &Enhancement) -> Option<&Path> {
        let root_name = self.root_name.as_str();
        for fragment in self.fragments.iter_mut() {
            let changed = fragment.tree.update_first(
                "",
                |path| path_matches(path, target_path, root_name),
                |node| apply_to_node(node, enhancement).any(),
            );
            if changed {
                fragment.modified = true;
                return Some(&fragment.path);
            }
        }
        None
    }

    /// Back up and rewrite every modified fragment. Returns the files written.
    pub fn save(&mut self) -> EnhanceResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for fragment in self.fragments.iter_mut().filter(|f| f.modified) {
            let backup = backup_path(&fragment.path);
            taxon_common_fs::copy_file(&fragment.path, &backup, true)?;
            write_json(&fragment.path, &fragment.tree)?;
            fragment.modified = false;

            info!(file = %fragment.path.display(), backup = %backup.display(), "Updated fragment");
            written.push(fragment.path.clone());
        }
        Ok(written)
    }
}
