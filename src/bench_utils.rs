//! Seeded synthetic graphs for benchmarks and load tests.

use ahash::AHashSet;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::json;

use crate::{Attributes, GraphError, GraphStore, NodeKey};

#[derive(Clone, Debug)]
pub enum GraphShape {
    Line,
    Star,
    /// `edges` distinct directed pairs drawn uniformly, no self loops.
    Random { edges: usize },
    /// Preferential attachment: each new node links to `m` existing ones.
    ScaleFree { m: usize },
}

#[derive(Clone, Debug)]
pub struct GraphDataset {
    pub node_count: usize,
    pub edges: Vec<(NodeKey, NodeKey)>,
}

impl GraphDataset {
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        (0..self.node_count).map(|idx| NodeKey::Integer(idx as i64))
    }

    /// Node with the highest out-degree.
    pub fn hub(&self) -> NodeKey {
        let mut counts = vec![0usize; self.node_count];
        for (source, _) in &self.edges {
            if let NodeKey::Integer(idx) = source {
                counts[*idx as usize] += 1;
            }
        }
        let best = counts
            .iter()
            .enumerate()
            .max_by_key(|(idx, deg)| (**deg, std::cmp::Reverse(*idx)))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        NodeKey::Integer(best as i64)
    }

    /// Inserts every node with a small attribute payload, then all edges in one batch.
    pub fn load_into(&self, graph: &GraphStore) -> Result<(), GraphError> {
        for key in self.keys() {
            let attributes = node_attributes(&key);
            graph.add_node(key, attributes)?;
        }
        graph.add_edges_from(self.edges.iter().cloned())
    }
}

pub fn node_attributes(key: &NodeKey) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("name".to_string(), json!(format!("node-{key}")));
    attributes.insert("tags".to_string(), json!(["bench", key.to_string()]));
    attributes
}

pub fn generate_graph(shape: GraphShape, node_count: usize, seed: u64) -> GraphDataset {
    assert!(node_count > 1, "node_count must exceed 1");
    let pairs = match shape {
        GraphShape::Line => (0..node_count - 1).map(|idx| (idx, idx + 1)).collect(),
        GraphShape::Star => (1..node_count).map(|leaf| (0, leaf)).collect(),
        GraphShape::Random { edges } => random_pairs(node_count, edges, seed),
        GraphShape::ScaleFree { m } => scale_free_pairs(node_count, m, seed),
    };
    GraphDataset {
        node_count,
        edges: pairs
            .into_iter()
            .map(|(u, v)| (NodeKey::Integer(u as i64), NodeKey::Integer(v as i64)))
            .collect(),
    }
}

fn random_pairs(node_count: usize, edge_count: usize, seed: u64) -> Vec<(usize, usize)> {
    let possible = node_count as u128 * (node_count as u128 - 1);
    assert!(
        edge_count as u128 <= possible,
        "edge_count exceeds possible pairs"
    );
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = AHashSet::with_capacity(edge_count);
    let mut pairs = Vec::with_capacity(edge_count);
    while pairs.len() < edge_count {
        let u = rng.gen_range(0..node_count);
        let v = rng.gen_range(0..node_count);
        if u != v && seen.insert((u, v)) {
            pairs.push((u, v));
        }
    }
    pairs
}

fn scale_free_pairs(node_count: usize, m: usize, seed: u64) -> Vec<(usize, usize)> {
    assert!(m > 0, "m must be positive");
    assert!(node_count > m + 1, "node_count must exceed m + 1");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pairs = Vec::new();
    // Every endpoint appears once per incident edge, so uniform picks are degree-weighted.
    let mut endpoints = Vec::new();
    for u in 0..=m {
        for v in (u + 1)..=m {
            pairs.push((u, v));
            endpoints.extend([u, v]);
        }
    }
    for new_node in (m + 1)..node_count {
        let mut targets = AHashSet::with_capacity(m);
        while targets.len() < m {
            targets.insert(endpoints[rng.gen_range(0..endpoints.len())]);
        }
        let mut targets: Vec<usize> = targets.into_iter().collect();
        targets.sort_unstable();
        for target in targets {
            pairs.push((new_node, target));
            endpoints.extend([new_node, target]);
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_shape_is_deterministic_per_seed() {
        let a = generate_graph(GraphShape::Random { edges: 40 }, 20, 7);
        let b = generate_graph(GraphShape::Random { edges: 40 }, 20, 7);
        assert_eq!(a.edges, b.edges);
        assert_eq!(a.edges.len(), 40);
        assert!(a.edges.iter().all(|(u, v)| u != v));
    }

    #[test]
    fn test_star_hub_is_center() {
        let star = generate_graph(GraphShape::Star, 10, 0);
        assert_eq!(star.edges.len(), 9);
        assert_eq!(star.hub(), NodeKey::Integer(0));
    }

    #[test]
    fn test_scale_free_edge_count() {
        let sf = generate_graph(GraphShape::ScaleFree { m: 2 }, 12, 3);
        // 3 seed edges among nodes 0..=2, then 2 per remaining node.
        assert_eq!(sf.edges.len(), 3 + 2 * 9);
    }
}
