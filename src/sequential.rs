use std::cmp::Ordering;

use itertools::Itertools;

use crate::graph::InputGraph;
use crate::solver::MstSolution;
use crate::types::CompId;

/// Union-find over node ids, with path halving and union by rank. Used only
/// by the sequential reference solver.
struct UnionFind {
    parent: Vec<CompId>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn create(n: u32) -> Self {
        UnionFind {
            parent: (0..n).collect(),
            rank: vec![0u8; n as usize],
        }
    }

    fn find(&mut self, mut x: CompId) -> CompId {
        while self.parent[x as usize] != x {
            // Point each visited node at its grandparent.
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Merge the sets containing `a` and `b`; false if already joined.
    fn union(&mut self, a: CompId, b: CompId) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        match self.rank[root_a as usize].cmp(&self.rank[root_b as usize]) {
            Ordering::Greater => self.parent[root_b as usize] = root_a,
            Ordering::Less => self.parent[root_a as usize] = root_b,
            Ordering::Equal => {
                self.parent[root_b as usize] = root_a;
                self.rank[root_a as usize] += 1;
            }
        }
        true
    }
}

/// Trusted sequential MST reference: Kruskal's algorithm.
///
/// Scans the edges in ascending weight order and keeps every edge that joins
/// two distinct sets. The parallel engine is validated against this in tests
/// and benches. For a disconnected input the result covers node 0's
/// component and `total_edges` falls short of `node_count - 1`.
pub fn kruskal_mst(input: &InputGraph) -> MstSolution {
    let mut uf = UnionFind::create(input.node_count());
    let mut total_weight = 0.0;
    let mut total_edges = 0u64;

    let ordered = input
        .edges()
        .iter()
        .sorted_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal));
    for edge in ordered {
        if uf.union(edge.u, edge.v) {
            total_weight += edge.weight;
            total_edges += 1;
        }
        if total_edges == (input.node_count() - 1) as u64 {
            break;
        }
    }

    MstSolution {
        root_id: uf.find(0),
        total_weight,
        total_edges,
    }
}
