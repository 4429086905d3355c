//! A concurrent implementation of Borůvka's algorithm for computing the
//! Minimum Spanning Tree of an undirected weighted graph.
//!
//! A fixed pool of worker threads shares one contraction graph of shrinking
//! super-nodes. Each worker repeatedly pops a component off a shared work
//! queue and tries to fold it into its cheapest neighbor. All locking is
//! non-blocking: lock contention is handled by re-enqueueing and retrying,
//! never by waiting, so no lock-ordering scheme is needed. The run ends when
//! one thread observes a component with no remaining outgoing edges and wins
//! the race to publish it as the solution.

mod config;
mod util;

pub mod component;
pub mod graph;
pub mod logger;
pub mod queue;
pub mod sequential;
pub mod solver;
pub mod types;

pub use graph::{InputGraph, WeightedEdge};
pub use sequential::kruskal_mst;
pub use solver::{MstSolution, ParBoruvka, SolutionSink};
pub use types::{CompId, Edge};
