use fedigraph_scanner::{BlockSeverity, FetchOutcome, Instance};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// One instance in the exported graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub users: u64,
    /// True iff this node's own fetch was a non-empty success.
    #[serde(rename = "publiclyModerated")]
    pub publicly_moderated: bool,
}

/// One moderation edge: `source` blocks `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub severity: BlockSeverity,
    pub comment: String,
}

/// The exported artifact. Nodes are sorted by id; link order follows
/// outcome-processing order and carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Fold a completed outcome set into the node/link graph.
///
/// Only names referenced as the source or target of some link become nodes,
/// so instances that failed, hid their list, or reported nothing simply do
/// not appear unless somebody else blocks them. Blocked domains outside the
/// input list get a node with a zero user count. Infallible: malformed
/// responses were already classified as failures upstream.
pub fn build_graph(instances: &[Instance], outcomes: &[FetchOutcome]) -> GraphData {
    let mut users_by_name: HashMap<&str, u64> = HashMap::with_capacity(instances.len());
    for instance in instances {
        match users_by_name.entry(instance.name.as_str()) {
            Entry::Occupied(_) => warn!(
                "Duplicate instance {} in input list; keeping the first users count",
                instance.name
            ),
            Entry::Vacant(slot) => {
                slot.insert(instance.users);
            }
        }
    }

    let mut referenced: HashSet<&str> = HashSet::new();
    let mut has_public_blocks: HashSet<&str> = HashSet::new();
    let mut links = Vec::new();

    for outcome in outcomes {
        let FetchOutcome::Success { instance, blocks } = outcome else {
            continue;
        };
        if blocks.is_empty() {
            continue;
        }

        has_public_blocks.insert(instance.as_str());
        referenced.insert(instance.as_str());

        for block in blocks {
            referenced.insert(block.domain.as_str());
            links.push(GraphLink {
                source: instance.clone(),
                target: block.domain.clone(),
                severity: block.severity,
                comment: block.comment.clone().unwrap_or_default(),
            });
        }
    }

    let mut nodes: Vec<GraphNode> = referenced
        .iter()
        .map(|name| GraphNode {
            id: name.to_string(),
            users: users_by_name.get(name).copied().unwrap_or(0),
            publicly_moderated: has_public_blocks.contains(name),
        })
        .collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    GraphData {
        generated_at: chrono::Utc::now().to_rfc3339(),
        nodes,
        links,
    }
}
