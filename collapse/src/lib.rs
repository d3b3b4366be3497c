pub mod grouping;
pub mod key;
pub mod merge;
pub mod rewrite;

pub use grouping::{group_edges, EdgeGroup, Grouping};
pub use key::EdgeKey;
pub use merge::{merge_attributes, promote};
pub use rewrite::{collapse_network, CollapseError, CollapseSummary};
