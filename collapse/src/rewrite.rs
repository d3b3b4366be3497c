use crate::grouping::{group_edges, EdgeGroup};
use crate::merge::merge_attributes;
use ndexcollapse_core::error::{CollapseToolError, ErrorCode};
use ndexcollapse_core::model::{Attribute, EdgeId, Network};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, trace};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollapseError {
    #[error("edge {0} has no edge attribute entry")]
    MissingEdgeAttributes(EdgeId),
}

impl CollapseToolError for CollapseError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::MalformedGraph
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseSummary {
    pub edges_before: usize,
    pub edges_after: usize,
    pub absorbed: usize,
}

/// Collapse undirected duplicate edges of `network` into one edge per bucket.
///
/// The new edge and edge attribute collections are built completely before they
/// replace the old ones, so on error the network is left as it was.
pub fn collapse_network(network: &mut Network) -> Result<CollapseSummary, CollapseError> {
    let edges_before = network.edge_count();
    let grouping = group_edges(network.edges());
    let mut groups: HashMap<EdgeId, &EdgeGroup> = grouping
        .groups()
        .iter()
        .map(|group| (group.survivor, group))
        .collect();

    let mut edges = Vec::with_capacity(grouping.bucket_count());
    let mut edge_attributes: HashMap<EdgeId, Vec<Attribute>> =
        HashMap::with_capacity(grouping.bucket_count());

    // Survivors come first in their bucket, so edge order already matches bucket order.
    for survivor in network.edges() {
        let Some(group) = groups.remove(&survivor.id) else {
            continue;
        };
        let mut merged = network
            .edge_attributes(group.survivor)
            .ok_or(CollapseError::MissingEdgeAttributes(group.survivor))?
            .to_vec();

        for &absorbed_id in &group.absorbed {
            let absorbed = network
                .edge_attributes(absorbed_id)
                .ok_or(CollapseError::MissingEdgeAttributes(absorbed_id))?;
            trace!(survivor = group.survivor, absorbed = absorbed_id, "merging edge attributes");
            merge_attributes(&mut merged, absorbed);
        }

        edges.push(survivor.clone());
        edge_attributes.insert(group.survivor, merged);
    }

    let summary = CollapseSummary {
        edges_before,
        edges_after: edges.len(),
        absorbed: grouping.absorbed_count(),
    };
    network.replace_edges(edges, edge_attributes);

    info!(
        edges_before = summary.edges_before,
        edges_after = summary.edges_after,
        absorbed = summary.absorbed,
        "collapsed duplicate edges"
    );
    Ok(summary)
}
