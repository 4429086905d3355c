use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::types::{CompId, Edge};

/// A super-node of the contraction graph: a contracted set of original graph
/// nodes, identified by the id of the node that seeded it.
///
/// Everything mutable lives behind a per-component mutex, taken only through
/// [`Component::try_lock`] by the workers. A component absorbed by another is
/// tombstoned via [`ComponentState::alive`] and never processed again; all
/// later traffic goes through the surviving partner.
pub struct Component {
    id: CompId, // Immutable identity, equality and hashing use only this.
    state: Mutex<ComponentState>,
}

/// The lock-protected part of a component.
pub struct ComponentState {
    /// Incident edges, non-decreasing by weight, never containing an edge
    /// with both endpoints equal to this component.
    pub edges: Vec<Arc<Edge>>,
    /// Summed weight of all edges contracted into this component.
    pub total_weight: f64,
    /// Count of edges contracted into this component.
    pub total_edges: u64,
    /// Tombstone flag: flips true -> false exactly once, never reverts.
    pub alive: bool,
}

impl ComponentState {
    /// Insert an edge keeping the list sorted by ascending weight. Equal
    /// weights keep their insertion order.
    pub fn add_edge(&mut self, edge: Arc<Edge>) {
        let pos = self.edges.partition_point(|e| e.weight() <= edge.weight());
        self.edges.insert(pos, edge);
    }

    /// The cheapest incident edge, or `None` once the list is empty. O(1).
    pub fn min_edge(&self) -> Option<Arc<Edge>> {
        self.edges.first().cloned()
    }
}

impl Component {
    pub fn create(id: CompId) -> Self {
        Component {
            id,
            state: Mutex::new(ComponentState {
                edges: Vec::new(),
                total_weight: 0.0,
                total_edges: 0,
                alive: true,
            }),
        }
    }

    pub fn id(&self) -> CompId {
        self.id
    }

    /// Non-blocking lock acquisition, the only path the workers use.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, ComponentState>> {
        self.state.try_lock()
    }

    /// Blocking acquisition, for single-threaded graph building and tests.
    pub fn lock(&self) -> MutexGuard<'_, ComponentState> {
        self.state.lock()
    }

    /// Fold `other` into this component across an edge of weight
    /// `bridge_weight`. The caller must hold both guards and is responsible
    /// for tombstoning `other` while still holding them.
    ///
    /// The new edge list is built by a linear two-pointer scan of the two
    /// pre-sorted lists. Edges with both endpoints inside `{self, other}`
    /// are now internal and get dropped; every surviving edge that touched
    /// `other` is redirected to this component, which also updates the copy
    /// held by the far endpoint since the `Arc` is shared.
    pub fn absorb(
        &self,
        state: &mut ComponentState,
        other: &Component,
        other_state: &mut ComponentState,
        bridge_weight: f64,
    ) {
        let (node_id, other_id) = (self.id, other.id);

        state.total_weight += other_state.total_weight + bridge_weight;
        state.total_edges += other_state.total_edges + 1;

        let mut merged = Vec::with_capacity(state.edges.len() + other_state.edges.len());
        let mut i = 0;
        let mut j = 0;
        loop {
            // Skip runs of now-internal edges on both sides.
            while i < state.edges.len() && state.edges[i].touches_only(node_id, other_id) {
                i += 1;
            }
            while j < other_state.edges.len()
                && other_state.edges[j].touches_only(node_id, other_id)
            {
                j += 1;
            }

            // Take the cheaper head; own edges win ties.
            let take_own = match (state.edges.get(i), other_state.edges.get(j)) {
                (None, None) => break,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (Some(own), Some(theirs)) => own.weight() <= theirs.weight(),
            };
            let edge = if take_own {
                i += 1;
                state.edges[i - 1].clone()
            } else {
                j += 1;
                other_state.edges[j - 1].clone()
            };
            edge.redirect(other_id, node_id);
            merged.push(edge);
        }

        other_state.edges.clear();
        state.edges = merged;
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Component {}

impl Hash for Component {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod test_component {
    use std::sync::Arc;

    use crate::component::Component;
    use crate::types::Edge;

    /// Build an edge and register it with both endpoint components, the way
    /// the contraction graph does during loading.
    fn link(u: &Component, v: &Component, weight: f64) -> Arc<Edge> {
        let edge = Arc::new(Edge::create(u.id(), v.id(), weight));
        u.lock().add_edge(edge.clone());
        v.lock().add_edge(edge.clone());
        edge
    }

    fn assert_sorted(component: &Component) {
        let state = component.lock();
        for pair in state.edges.windows(2) {
            assert!(pair[0].weight() <= pair[1].weight());
        }
    }

    #[test]
    fn test_add_edge_keeps_sorted_order() {
        let c0 = Component::create(0);
        let c1 = Component::create(1);
        link(&c0, &c1, 3.0);
        link(&c0, &c1, 1.0);
        link(&c0, &c1, 2.0);

        let weights: Vec<f64> = c0.lock().edges.iter().map(|e| e.weight()).collect();
        assert_eq!(weights, vec![1.0, 2.0, 3.0]);
        assert_sorted(&c0);
        assert_sorted(&c1);
    }

    #[test]
    fn test_add_edge_tie_keeps_insertion_order() {
        let c0 = Component::create(0);
        let c1 = Component::create(1);
        let c2 = Component::create(2);
        let first = link(&c0, &c1, 1.0);
        let second = link(&c0, &c2, 1.0);

        let state = c0.lock();
        assert!(Arc::ptr_eq(&state.edges[0], &first));
        assert!(Arc::ptr_eq(&state.edges[1], &second));
    }

    #[test]
    fn test_min_edge() {
        let c0 = Component::create(0);
        let c1 = Component::create(1);
        assert!(c0.lock().min_edge().is_none());

        link(&c0, &c1, 5.0);
        let cheapest = link(&c0, &c1, 2.0);
        let found = c0.lock().min_edge().unwrap();
        assert!(Arc::ptr_eq(&found, &cheapest));
    }

    #[test]
    fn test_absorb_filters_internal_and_redirects() {
        // Triangle 0-1-2 plus a direct 0-2 edge.
        let c0 = Component::create(0);
        let c1 = Component::create(1);
        let c2 = Component::create(2);
        let bridge = link(&c0, &c1, 1.0);
        link(&c1, &c2, 2.0);
        link(&c0, &c2, 4.0);

        {
            let mut s0 = c0.lock();
            let mut s1 = c1.lock();
            s1.alive = false;
            c0.absorb(&mut s0, &c1, &mut s1, bridge.weight());
        }

        let s0 = c0.lock();
        assert_eq!(s0.total_weight, 1.0);
        assert_eq!(s0.total_edges, 1);
        // The 0-1 bridge is internal and gone; the 1-2 edge now reads 0-2.
        assert_eq!(s0.edges.len(), 2);
        assert!(s0.edges.iter().all(|e| !e.touches_only(0, 0)));
        let weights: Vec<f64> = s0.edges.iter().map(|e| e.weight()).collect();
        assert_eq!(weights, vec![2.0, 4.0]);
        for edge in &s0.edges {
            assert_eq!(edge.other(0), 2);
        }
        // The absorbed side is emptied.
        assert!(c1.lock().edges.is_empty());
        // The far endpoint observes the redirect through the shared edge.
        let s2 = c2.lock();
        assert!(s2.edges.iter().all(|e| e.other(2) == 0));
    }

    #[test]
    fn test_absorb_drops_parallel_internal_edges() {
        let c0 = Component::create(0);
        let c1 = Component::create(1);
        link(&c0, &c1, 1.0);
        link(&c0, &c1, 3.0); // Duplicate edge between the same pair.

        {
            let mut s0 = c0.lock();
            let mut s1 = c1.lock();
            s1.alive = false;
            c0.absorb(&mut s0, &c1, &mut s1, 1.0);
        }

        let s0 = c0.lock();
        assert!(s0.edges.is_empty());
        assert_eq!(s0.total_weight, 1.0);
        assert_eq!(s0.total_edges, 1);
    }

    #[test]
    fn test_absorb_accumulates_statistics() {
        let c0 = Component::create(0);
        let c1 = Component::create(1);
        {
            let mut s1 = c1.lock();
            s1.total_weight = 7.0;
            s1.total_edges = 3;
        }
        {
            let mut s0 = c0.lock();
            let mut s1 = c1.lock();
            s1.alive = false;
            c0.absorb(&mut s0, &c1, &mut s1, 2.0);
        }
        let s0 = c0.lock();
        assert_eq!(s0.total_weight, 9.0);
        assert_eq!(s0.total_edges, 4);
    }

    #[test]
    fn test_absorb_keeps_sorted_order() {
        let c0 = Component::create(0);
        let c1 = Component::create(1);
        let c2 = Component::create(2);
        let c3 = Component::create(3);
        let bridge = link(&c0, &c1, 1.0);
        link(&c0, &c2, 5.0);
        link(&c0, &c3, 2.0);
        link(&c1, &c2, 3.0);
        link(&c1, &c3, 4.0);

        {
            let mut s0 = c0.lock();
            let mut s1 = c1.lock();
            s1.alive = false;
            c0.absorb(&mut s0, &c1, &mut s1, bridge.weight());
        }

        assert_sorted(&c0);
        let weights: Vec<f64> = c0.lock().edges.iter().map(|e| e.weight()).collect();
        assert_eq!(weights, vec![2.0, 3.0, 4.0, 5.0]);
    }
}
