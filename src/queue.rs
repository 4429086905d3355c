use crossbeam::queue::SegQueue;

use crate::types::CompId;

/// The shared work queue: component ids waiting for a contraction attempt.
///
/// FIFO order matters only for fairness, not correctness — the same id may
/// cycle through many times when lock contention forces retries. Backed by a
/// lock-free segmented queue so pushes and pops never block a worker.
pub struct WorkQueue {
    inner: SegQueue<CompId>,
}

impl WorkQueue {
    pub fn create() -> Self {
        WorkQueue {
            inner: SegQueue::new(),
        }
    }

    pub fn push(&self, id: CompId) {
        self.inner.push(id);
    }

    pub fn pop(&self) -> Option<CompId> {
        self.inner.pop()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod test_queue {
    use std::sync::Arc;
    use std::thread;

    use crate::queue::WorkQueue;

    #[test]
    fn test_fifo_order_single_thread() {
        let queue = WorkQueue::create();
        for id in 0..5 {
            queue.push(id);
        }
        assert_eq!(queue.len(), 5);
        for id in 0..5 {
            assert_eq!(queue.pop(), Some(id));
        }
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let queue = Arc::new(WorkQueue::create());
        let mut handles = Vec::new();
        for worker in 0..4u32 {
            let queue = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                for i in 0..250u32 {
                    queue.push(worker * 250 + i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let mut seen = vec![false; 1000];
        while let Some(id) = queue.pop() {
            assert!(!seen[id as usize]);
            seen[id as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
