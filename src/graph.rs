use std::sync::Arc;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::component::Component;
use crate::config::{MAX_RANDOM_WEIGHT, MIN_RANDOM_WEIGHT};
use crate::types::{CompId, Edge};

/// One undirected input edge between two original graph nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub u: CompId,
    pub v: CompId,
    pub weight: f64,
}

/// A validated undirected weighted graph, given as node ids `0..node_count`
/// plus an edge list. Duplicate edges between the same pair are permitted;
/// self-loops, out-of-range endpoints, and negative or non-finite weights
/// are rejected on insertion.
#[derive(Debug, Clone)]
pub struct InputGraph {
    node_count: u32,
    edges: Vec<WeightedEdge>,
}

impl InputGraph {
    pub fn create(node_count: u32) -> Result<Self> {
        if node_count == 0 {
            bail!("input graph must contain at least one node");
        }
        Ok(InputGraph {
            node_count,
            edges: Vec::new(),
        })
    }

    pub fn add_edge(&mut self, u: CompId, v: CompId, weight: f64) -> Result<()> {
        if u >= self.node_count || v >= self.node_count {
            bail!(
                "edge ({}, {}) out of range for {} nodes",
                u,
                v,
                self.node_count
            );
        }
        if u == v {
            bail!("self-loop on node {} is not allowed", u);
        }
        if !weight.is_finite() || weight < 0.0 {
            bail!("edge ({}, {}) has invalid weight {}", u, v, weight);
        }
        self.edges.push(WeightedEdge { u, v, weight });
        Ok(())
    }

    pub fn from_edge_list(node_count: u32, edges: &[(CompId, CompId, f64)]) -> Result<Self> {
        let mut graph = Self::create(node_count)?;
        for &(u, v, weight) in edges {
            graph.add_edge(u, v, weight)?;
        }
        Ok(graph)
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    /// Generate a seeded random connected graph: a random spanning tree over
    /// all nodes plus `extra_edges` additional random non-self-loop edges.
    /// Weights are integer-valued (see `config`), so MST totals computed in
    /// any order compare exactly.
    ///
    /// # Panics
    /// Panics if `node_count` is zero.
    pub fn random_connected(node_count: u32, extra_edges: u32, seed: u64) -> Self {
        assert!(node_count >= 1, "random graph needs at least one node");
        let mut rng = StdRng::seed_from_u64(seed);
        let mut edges = Vec::with_capacity((node_count - 1 + extra_edges) as usize);

        // Step 1. Spanning tree: each node links to a random earlier one.
        for v in 1..node_count {
            edges.push(WeightedEdge {
                u: rng.gen_range(0..v),
                v,
                weight: rng.gen_range(MIN_RANDOM_WEIGHT..=MAX_RANDOM_WEIGHT) as f64,
            });
        }

        // Step 2. Extra edges on top, duplicates allowed, self-loops not.
        if node_count >= 2 {
            for _ in 0..extra_edges {
                let u = rng.gen_range(0..node_count);
                let mut v = rng.gen_range(0..node_count);
                while v == u {
                    v = rng.gen_range(0..node_count);
                }
                edges.push(WeightedEdge {
                    u,
                    v,
                    weight: rng.gen_range(MIN_RANDOM_WEIGHT..=MAX_RANDOM_WEIGHT) as f64,
                });
            }
        }

        InputGraph { node_count, edges }
    }
}

/// The mutable shared graph the workers contract: an arena of components
/// indexed by their stable id. Components are never removed, only
/// tombstoned, so an id stays a valid index for the whole run.
pub(crate) struct ContractionGraph {
    components: Vec<Component>,
}

impl ContractionGraph {
    /// Build singleton components for every input node and register each
    /// edge with both of its endpoints' sorted lists.
    pub(crate) fn build(input: &InputGraph) -> Self {
        let components: Vec<Component> =
            (0..input.node_count()).map(Component::create).collect();
        for we in input.edges() {
            let edge = Arc::new(Edge::create(we.u, we.v, we.weight));
            components[we.u as usize].lock().add_edge(edge.clone());
            components[we.v as usize].lock().add_edge(edge);
        }
        log::debug!(
            "built contraction graph: {} components, {} edges",
            components.len(),
            input.edge_count()
        );
        ContractionGraph { components }
    }

    pub(crate) fn component(&self, id: CompId) -> &Component {
        &self.components[id as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.components.len()
    }
}
