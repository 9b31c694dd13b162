use chrono::NaiveDate;
use tracing::warn;

use crate::graph::{DistanceMap, EgoSubgraph, FlowGraph};
use crate::models::{FeatureRow, NeighborFeatures, SourceFeatures};

/// Features of the alerted account over the full window graph.
pub fn compose_source_features(graph: &FlowGraph, source: &str, alert_date: NaiveDate) -> SourceFeatures {
    SourceFeatures {
        account_id: source.to_string(),
        alert_date,
        out_degree: graph.out_degree(source),
        inbound: graph.inbound_total(source),
        outbound: graph.outbound_total(source)
    }
}

/// Features of `neighbor` relative to `source`.
///
/// Totals and degrees come from the full `graph`; the direct flow comes from the
/// `source -> neighbor` edge of the subgraph and is zero when that edge is absent.
pub fn compose_neighbor_features(graph: &FlowGraph, subgraph: &FlowGraph, distances: &DistanceMap, source: &str, neighbor: &str) -> NeighborFeatures {
    let total_inbound = graph.inbound_total(neighbor);
    let direct_inbound = subgraph.edge(source, neighbor).unwrap_or_default();

    NeighborFeatures {
        account_id: neighbor.to_string(),
        hop_distance: distances.get(neighbor).copied().unwrap_or(0),
        total_inbound,
        direct_inbound,
        indirect_inbound: total_inbound - direct_inbound,
        outbound: graph.outbound_total(neighbor),
        degree: graph.degree(neighbor),
        in_degree: graph.in_degree(neighbor),
        out_degree: graph.out_degree(neighbor)
    }
}

/// One row per neighbor in `distances`, ordered by hop distance then account.
///
/// A negative indirect flow is reported as a data-quality warning and kept as is.
pub fn compose_rows(graph: &FlowGraph, ego: &EgoSubgraph, distances: &DistanceMap, alert_date: NaiveDate) -> Vec<FeatureRow> {
    let source = compose_source_features(graph, &ego.source, alert_date);

    let mut neighbors: Vec<(&String, &u32)> = distances.iter().collect();
    neighbors.sort_by(|left, right| left.1.cmp(right.1).then_with(|| left.0.cmp(right.0)));

    neighbors.into_iter()
        .map(|(neighbor, _)| {
            let features = compose_neighbor_features(graph, &ego.graph, distances, &ego.source, neighbor);

            if features.has_negative_indirect() {
                warn!(
                    "Negative indirect inflow [{}] for neighbor [{}] of alert account [{}] on [{}]",
                    features.indirect_inbound, features.account_id, ego.source, alert_date
                );
            }

            FeatureRow::combine(features, &source)
        })
        .collect()
}
