use crate::key::EdgeKey;
use ndexcollapse_core::model::{Edge, EdgeId};
use std::collections::HashMap;

/// One bucket of undirected-duplicate edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeGroup {
    /// First edge of the bucket in arrival order.
    pub survivor: EdgeId,
    /// Remaining members in arrival order; empty when the edge had no duplicate.
    pub absorbed: Vec<EdgeId>,
}

impl EdgeGroup {
    pub fn len(&self) -> usize {
        1 + self.absorbed.len()
    }

    pub fn members(&self) -> impl Iterator<Item = EdgeId> + '_ {
        std::iter::once(self.survivor).chain(self.absorbed.iter().copied())
    }
}

/// Buckets in the order their first member arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    groups: Vec<EdgeGroup>,
}

impl Grouping {
    pub fn groups(&self) -> &[EdgeGroup] {
        &self.groups
    }

    pub fn bucket_count(&self) -> usize {
        self.groups.len()
    }

    pub fn absorbed_count(&self) -> usize {
        self.groups.iter().map(|g| g.absorbed.len()).sum()
    }

    pub fn member_count(&self) -> usize {
        self.groups.iter().map(EdgeGroup::len).sum()
    }
}

/// Bucket edges by undirected `(source, interaction, target)` identity.
///
/// The orientation recorded for a bucket is the one of its first edge; a later
/// edge joins when either its key or its reversed key is already recorded.
/// Seeing the same edge id twice does not add it twice.
pub fn group_edges<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Grouping {
    let mut bucket_of: HashMap<EdgeKey<'a>, usize> = HashMap::new();
    let mut buckets: Vec<Vec<EdgeId>> = Vec::new();

    for edge in edges {
        let key = EdgeKey::of(edge);
        let slot = bucket_of
            .get(&key)
            .or_else(|| bucket_of.get(&key.reversed()))
            .copied();

        match slot {
            Some(idx) => {
                let bucket = &mut buckets[idx];
                if !bucket.contains(&edge.id) {
                    bucket.push(edge.id);
                }
            }
            None => {
                bucket_of.insert(key, buckets.len());
                buckets.push(vec![edge.id]);
            }
        }
    }

    let groups = buckets
        .into_iter()
        .map(|mut bucket| {
            let survivor = bucket.remove(0);
            EdgeGroup {
                survivor,
                absorbed: bucket,
            }
        })
        .collect();

    Grouping { groups }
}
