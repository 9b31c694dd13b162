use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Deserialize;

use crate::graph::errors::GraphError;
use crate::graph::flow_graph::FlowGraph;
use crate::types::AccountId;

/// Hop count from the source account to each other reachable account.
pub type DistanceMap = BTreeMap<AccountId, u32>;

/// Which edges a breadth-first search may walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    /// Follow edges from sender to receiver only, the way money moves.
    #[default]
    Directed,
    /// Follow edges either way. Attributes keep their original direction.
    Undirected
}

/// Accounts within `radius` hops of an alerted account, with every edge between them.
#[derive(Debug, Clone)]
pub struct EgoSubgraph {
    pub source: AccountId,
    pub graph: FlowGraph
}

/// Extracts the ego-subgraph of `source`.
///
/// # Errors
/// Returns `GraphError::NodeNotFound` when `source` is not in `graph`.
pub fn extract_ego(graph: &FlowGraph, source: &str, radius: u32, reachability: Reachability) -> Result<EgoSubgraph, GraphError> {
    let reached = bounded_bfs(graph, source, Some(radius), reachability)?;
    let nodes: BTreeSet<AccountId> = reached.into_keys().collect();

    Ok(EgoSubgraph {
        source: source.to_string(),
        graph: graph.induced(&nodes)
    })
}

/// Unweighted shortest-path lengths from `source` inside `subgraph`, source excluded.
///
/// # Errors
/// Returns `GraphError::NodeNotFound` when `source` is not in `subgraph`.
pub fn hop_distances(subgraph: &FlowGraph, source: &str, reachability: Reachability) -> Result<DistanceMap, GraphError> {
    let mut distances = bounded_bfs(subgraph, source, None, reachability)?;
    distances.remove(source);

    Ok(distances)
}

fn bounded_bfs(graph: &FlowGraph, source: &str, limit: Option<u32>, reachability: Reachability) -> Result<DistanceMap, GraphError> {
    if !graph.contains(source) {
        return Err(GraphError::node_not_found(source));
    }

    let mut distances = DistanceMap::new();
    let mut queue = VecDeque::new();

    distances.insert(source.to_string(), 0);
    queue.push_back((source.to_string(), 0u32));

    while let Some((node, distance)) = queue.pop_front() {
        if limit.is_some_and(|limit| distance >= limit) {
            continue;
        }

        for next in adjacent(graph, &node, reachability) {
            if !distances.contains_key(next) {
                distances.insert(next.clone(), distance + 1);
                queue.push_back((next.clone(), distance + 1));
            }
        }
    }

    Ok(distances)
}

fn adjacent<'a>(graph: &'a FlowGraph, node: &str, reachability: Reachability) -> Vec<&'a AccountId> {
    let mut next: Vec<&AccountId> = graph.successors(node).map(|(account_id, _)| account_id).collect();

    if reachability == Reachability::Undirected {
        next.extend(graph.predecessors(node).map(|(account_id, _)| account_id));
    }

    next
}
