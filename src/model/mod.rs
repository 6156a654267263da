pub mod chain;
pub mod gene;
pub mod segment_graph;
pub mod types;

pub use chain::ExonChain;
pub use gene::Gene;
pub use segment_graph::{Edge, Segment, SegmentGraph};
pub use types::{MergeOptions, Overlap, OverlapClass};
