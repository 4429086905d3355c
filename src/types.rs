use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

/// Give the component identity another name. A component keeps the id of the
/// original graph node that seeded it, so ids stay stable while components
/// shrink in number.
pub type CompId = u32;

/// An edge of the contraction graph, shared by both endpoint components.
///
/// Endpoints are component ids rather than references, so retargeting an
/// edge during contraction is an index rewrite. Both endpoint components
/// hold the same `Arc<Edge>` in their lists; a rewrite performed while the
/// merging thread holds both endpoint locks must be visible to a thread that
/// later reads the edge from the far endpoint, hence the atomic endpoints.
#[derive(Debug)]
pub struct Edge {
    from: AtomicU32, // One endpoint component id, rewritten during contraction.
    to: AtomicU32,   // The other endpoint component id.
    weight: f64,     // Edge weight, immutable.
}

impl Edge {
    pub fn create(from: CompId, to: CompId, weight: f64) -> Self {
        Edge {
            from: AtomicU32::new(from),
            to: AtomicU32::new(to),
            weight,
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Snapshot of both endpoint ids.
    pub fn endpoints(&self) -> (CompId, CompId) {
        (
            self.from.load(AtomicOrdering::SeqCst),
            self.to.load(AtomicOrdering::SeqCst),
        )
    }

    /// Given one known endpoint, return the opposite one.
    ///
    /// # Panics
    /// Panics if `from` matches neither endpoint. That means an edge was left
    /// pointing nowhere by a broken redirect, a defect to surface loudly
    /// rather than a condition to recover from.
    pub fn other(&self, from: CompId) -> CompId {
        let (f, t) = self.endpoints();
        if f == from {
            return t;
        }
        if t == from {
            return f;
        }
        panic!("component {} is not an endpoint of edge ({}, {})", from, f, t);
    }

    /// Rewrite whichever endpoint currently equals `from` to `to`.
    /// A no-op when `from` is not an endpoint.
    pub fn redirect(&self, from: CompId, to: CompId) {
        if self.from.load(AtomicOrdering::SeqCst) == from {
            self.from.store(to, AtomicOrdering::SeqCst);
        }
        if self.to.load(AtomicOrdering::SeqCst) == from {
            self.to.store(to, AtomicOrdering::SeqCst);
        }
    }

    /// Whether both endpoints fall inside the pair `{a, b}`. Such an edge is
    /// internal to a merge of `a` and `b` and gets filtered out.
    pub fn touches_only(&self, a: CompId, b: CompId) -> bool {
        let (f, t) = self.endpoints();
        (f == a || f == b) && (t == a || t == b)
    }
}

// Edges order by weight only; ties carry no meaning beyond list position.
impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.weight.partial_cmp(&other.weight)
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (from, to) = self.endpoints();
        write!(f, "({} -[{}]- {})", from, self.weight, to)
    }
}

#[cfg(test)]
mod test_edge {
    use crate::types::Edge;

    #[test]
    fn test_other_endpoint() {
        let edge = Edge::create(3, 7, 1.5);
        assert_eq!(edge.other(3), 7);
        assert_eq!(edge.other(7), 3);
    }

    #[test]
    #[should_panic(expected = "not an endpoint")]
    fn test_other_unknown_endpoint_panics() {
        let edge = Edge::create(3, 7, 1.5);
        edge.other(42);
    }

    #[test]
    fn test_redirect() {
        let edge = Edge::create(3, 7, 1.5);
        edge.redirect(7, 9);
        assert_eq!(edge.endpoints(), (3, 9));
        assert_eq!(edge.other(3), 9);
    }

    #[test]
    fn test_redirect_non_endpoint_is_noop() {
        let edge = Edge::create(3, 7, 1.5);
        edge.redirect(42, 9);
        assert_eq!(edge.endpoints(), (3, 7));
    }

    #[test]
    fn test_ordering_by_weight_only() {
        let cheap = Edge::create(0, 1, 1.0);
        let costly = Edge::create(5, 6, 2.0);
        let cheap_elsewhere = Edge::create(8, 9, 1.0);
        assert!(cheap < costly);
        assert!(cheap == cheap_elsewhere);
    }

    #[test]
    fn test_touches_only() {
        let internal = Edge::create(1, 2, 1.0);
        let outgoing = Edge::create(2, 5, 1.0);
        assert!(internal.touches_only(1, 2));
        assert!(internal.touches_only(2, 1));
        assert!(!outgoing.touches_only(1, 2));
    }
}
