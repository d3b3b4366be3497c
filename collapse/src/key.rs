use ndexcollapse_core::model::{Edge, NodeId};

/// `(source, interaction, target)` identity of an edge as stored.
///
/// Two edges are duplicates when their keys are equal or one is the
/// [`reversed`](EdgeKey::reversed) form of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey<'a> {
    pub source: NodeId,
    pub interaction: &'a str,
    pub target: NodeId,
}

impl<'a> EdgeKey<'a> {
    pub fn of(edge: &'a Edge) -> Self {
        Self {
            source: edge.source,
            interaction: &edge.interaction,
            target: edge.target,
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            source: self.target,
            interaction: self.interaction,
            target: self.source,
        }
    }
}
