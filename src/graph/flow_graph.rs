use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::graph::aggregator::AggregatedEdge;
use crate::types::{AccountId, Flow};

type Adjacency = BTreeMap<AccountId, Flow>;

/// Directed graph of aggregated money flow between accounts.
///
/// Both directions are indexed so inbound and outbound sums are equally cheap.
/// Every node has an entry in both maps, possibly empty.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    successors: HashMap<AccountId, Adjacency>,
    predecessors: HashMap<AccountId, Adjacency>
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// One node per account seen on either end of an edge, one edge per aggregated pair.
    /// Self-loops are kept as ordinary edges.
    pub fn build(edges: &[AggregatedEdge]) -> Self {
        let mut graph = Self::new();

        for edge in edges {
            graph.insert_edge(&edge.sender, &edge.receiver, edge.flow);
        }

        graph
    }

    pub fn add_node(&mut self, account_id: &str) {
        if !self.successors.contains_key(account_id) {
            self.successors.insert(account_id.to_string(), Adjacency::new());
            self.predecessors.insert(account_id.to_string(), Adjacency::new());
        }
    }

    /// Inserts or replaces the edge `sender -> receiver`.
    pub fn insert_edge(&mut self, sender: &str, receiver: &str, flow: Flow) {
        self.add_node(sender);
        self.add_node(receiver);

        if let Some(out_edges) = self.successors.get_mut(sender) {
            out_edges.insert(receiver.to_string(), flow);
        }

        if let Some(in_edges) = self.predecessors.get_mut(receiver) {
            in_edges.insert(sender.to_string(), flow);
        }
    }

    pub fn contains(&self, account_id: &str) -> bool {
        self.successors.contains_key(account_id)
    }

    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.values().map(BTreeMap::len).sum()
    }

    #[cfg(test)]
    pub fn nodes(&self) -> impl Iterator<Item = &AccountId> {
        self.successors.keys()
    }

    /// Flow on the edge `sender -> receiver`, if present.
    pub fn edge(&self, sender: &str, receiver: &str) -> Option<Flow> {
        self.successors.get(sender)?.get(receiver).copied()
    }

    pub fn successors(&self, account_id: &str) -> impl Iterator<Item = (&AccountId, &Flow)> {
        self.successors.get(account_id).into_iter().flatten()
    }

    pub fn predecessors(&self, account_id: &str) -> impl Iterator<Item = (&AccountId, &Flow)> {
        self.predecessors.get(account_id).into_iter().flatten()
    }

    pub fn out_degree(&self, account_id: &str) -> usize {
        self.successors.get(account_id).map_or(0, BTreeMap::len)
    }

    pub fn in_degree(&self, account_id: &str) -> usize {
        self.predecessors.get(account_id).map_or(0, BTreeMap::len)
    }

    /// In-degree plus out-degree; a self-loop counts twice.
    pub fn degree(&self, account_id: &str) -> usize {
        self.in_degree(account_id) + self.out_degree(account_id)
    }

    /// Sum over every edge into the account. Unknown accounts sum to zero.
    pub fn inbound_total(&self, account_id: &str) -> Flow {
        sum_flows(self.predecessors(account_id))
    }

    /// Sum over every edge out of the account. Unknown accounts sum to zero.
    pub fn outbound_total(&self, account_id: &str) -> Flow {
        sum_flows(self.successors(account_id))
    }

    /// Node- and edge-induced subgraph: the given nodes that exist here, plus every
    /// edge whose endpoints are both among them, direction and flow preserved.
    pub fn induced(&self, nodes: &BTreeSet<AccountId>) -> FlowGraph {
        let mut subgraph = FlowGraph::new();

        for node in nodes.iter().filter(|node| self.contains(node)) {
            subgraph.add_node(node);

            for (receiver, flow) in self.successors(node) {
                if nodes.contains(receiver) {
                    subgraph.insert_edge(node, receiver, *flow);
                }
            }
        }

        subgraph
    }
}

fn sum_flows<'a>(edges: impl Iterator<Item = (&'a AccountId, &'a Flow)>) -> Flow {
    edges.fold(Flow::zero(), |mut total, (_, flow)| {
        total += *flow;
        total
    })
}
