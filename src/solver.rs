use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{bail, Context, Result};
use parking_lot::Mutex;

use crate::graph::{ContractionGraph, InputGraph};
use crate::queue::WorkQueue;
use crate::types::CompId;
use crate::util::get_current_timestamp;

/// The statistics of the single component left after full contraction.
#[derive(Debug, Clone, PartialEq)]
pub struct MstSolution {
    /// Id of the component that ended up spanning the whole graph.
    pub root_id: CompId,
    /// Total MST weight. Equals the Kruskal weight on the same graph.
    pub total_weight: f64,
    /// Number of tree edges, `node_count - 1` for a connected input.
    pub total_edges: u64,
}

/// Single-winner publication slot shared by all workers.
///
/// The completion flag transitions false -> true exactly once per run via
/// compare-and-swap; only the thread that wins the swap writes the winner
/// slot. Every worker polls the flag to know when to stop.
pub struct SolutionSink {
    complete: AtomicBool,
    winner: Mutex<Option<MstSolution>>,
}

impl SolutionSink {
    pub fn create() -> Self {
        SolutionSink {
            complete: AtomicBool::new(false),
            winner: Mutex::new(None),
        }
    }

    /// Clear the flag and the winner slot so the engine can run again.
    pub fn reset(&self) {
        *self.winner.lock() = None;
        self.complete.store(false, Ordering::SeqCst);
    }

    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::SeqCst)
    }

    /// Claim the completion flag; the winning thread stores `solution` and
    /// gets `true`, every later caller gets `false` and publishes nothing.
    pub fn try_publish(&self, solution: MstSolution) -> bool {
        if self
            .complete
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            *self.winner.lock() = Some(solution);
            true
        } else {
            false
        }
    }

    pub fn take_winner(&self) -> Option<MstSolution> {
        self.winner.lock().take()
    }
}

/// The parallel Borůvka engine: a worker count plus the shared sink.
///
/// An engine instance is reusable; each `compute` call is self-contained and
/// resets the sink first. Concurrent `compute` calls on one instance are not
/// supported.
pub struct ParBoruvka {
    workers: usize,
    sink: Arc<SolutionSink>,
}

impl ParBoruvka {
    pub fn create(workers: usize) -> Self {
        ParBoruvka {
            workers: workers.max(1),
            sink: Arc::new(SolutionSink::create()),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Compute the MST of `input` with the configured worker pool.
    ///
    /// The input graph must be connected; disconnection is a caller
    /// precondition the engine does not detect, and the workers would poll
    /// forever on such input.
    pub fn compute(&self, input: &InputGraph) -> Result<MstSolution> {
        let start = get_current_timestamp();
        self.sink.reset();

        // Step 1. Build singleton components and preload the queue.
        let graph = Arc::new(ContractionGraph::build(input));
        let queue = Arc::new(WorkQueue::create());
        for id in 0..input.node_count() {
            queue.push(id);
        }

        // Step 2. Run the contraction driver on every worker.
        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let graph = Arc::clone(&graph);
            let queue = Arc::clone(&queue);
            let sink = Arc::clone(&self.sink);
            let handle = thread::Builder::new()
                .name(format!("boruvka-worker-{}", worker_id))
                .spawn(move || contraction_loop(&graph, &queue, &sink))
                .context("failed to spawn boruvka worker")?;
            handles.push(handle);
        }
        for handle in handles {
            if handle.join().is_err() {
                bail!("a boruvka worker panicked");
            }
        }

        // Step 3. Collect the published solution.
        let solution = self
            .sink
            .take_winner()
            .context("workers exited without publishing a solution")?;
        log::info!(
            "boruvka done: {} nodes, {} edges, {} workers, mst weight {}, {} us",
            input.node_count(),
            input.edge_count(),
            self.workers,
            solution.total_weight,
            get_current_timestamp() - start
        );
        Ok(solution)
    }
}

impl Default for ParBoruvka {
    fn default() -> Self {
        Self::create(num_cpus::get())
    }
}

/// The per-thread contraction driver.
///
/// Pops a component, tries to fold it into its cheapest neighbor, and
/// re-enqueues the survivor. All lock acquisition is non-blocking: on
/// contention the component is re-enqueued (or simply dropped when another
/// thread is about to absorb it) and retried later, so no thread ever waits
/// on another's lock. Termination comes from convergence, not queue
/// emptiness — a component with no edges left spans the whole graph.
fn contraction_loop(graph: &ContractionGraph, queue: &WorkQueue, sink: &SolutionSink) {
    while !sink.is_complete() {
        let node_id = match queue.pop() {
            Some(id) => id,
            None => {
                // Other workers may still re-enqueue survivors, keep polling.
                thread::yield_now();
                continue;
            }
        };

        let node = graph.component(node_id);
        let mut node_state = match node.try_lock() {
            Some(guard) => guard,
            None => {
                // Another thread holds this component as its merge partner;
                // it will either absorb it or find it already dead. Either
                // way the id needs no requeue from here.
                continue;
            }
        };

        if !node_state.alive {
            // Tombstone popped off the queue, retire it for good.
            continue;
        }

        let edge = match node_state.min_edge() {
            Some(edge) => edge,
            None => {
                // No outgoing edges left: the graph has contracted down to
                // this single component. First thread here wins; everyone
                // stops once the flag is up.
                let won = sink.try_publish(MstSolution {
                    root_id: node_id,
                    total_weight: node_state.total_weight,
                    total_edges: node_state.total_edges,
                });
                if won {
                    log::debug!(
                        "component {} published the spanning solution ({} of {} ids still queued)",
                        node_id,
                        queue.len(),
                        graph.len()
                    );
                }
                break;
            }
        };

        let other_id = edge.other(node_id);
        let other = graph.component(other_id);
        let mut other_state = match other.try_lock() {
            Some(guard) => guard,
            None => {
                // Contended partner: back off entirely and retry later.
                drop(node_state);
                queue.push(node_id);
                continue;
            }
        };

        if !other_state.alive {
            // The min edge pointed at a tombstone; the shared edge has been
            // redirected, so the next pass finds the surviving partner.
            drop(other_state);
            drop(node_state);
            queue.push(node_id);
            continue;
        }

        // Both locks held and the partner is live: tombstone it, then fold
        // it in. The locks stay held across the whole merge.
        other_state.alive = false;
        node.absorb(&mut node_state, other, &mut other_state, edge.weight());
        drop(node_state);
        drop(other_state);

        queue.push(node_id);
    }
}
