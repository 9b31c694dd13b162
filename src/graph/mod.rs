mod aggregator;
mod errors;
mod flow_graph;
mod neighborhood;

pub use aggregator::{aggregate_window, window_start};
pub use errors::GraphError;
pub use flow_graph::FlowGraph;
pub use neighborhood::{extract_ego, hop_distances, DistanceMap, EgoSubgraph, Reachability};
