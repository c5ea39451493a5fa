use std::collections::VecDeque;
use std::sync::Mutex;

use sidetree_types::Operation;

use crate::error::CoreResult;

/// FIFO of operations waiting to be cut into a batch.
///
/// The batch writer peeks, writes and anchors, and only then removes, so an
/// anchoring failure leaves the operations queued for the next attempt.
pub trait OperationQueue: Send + Sync {
    /// Append an operation. Returns the queue length afterwards.
    fn enqueue(&self, operation: Operation) -> CoreResult<usize>;

    /// Up to `max` operations from the front, without removing them.
    fn peek(&self, max: usize) -> CoreResult<Vec<Operation>>;

    /// Drop up to `n` operations from the front. Returns how many were removed.
    fn remove(&self, n: usize) -> CoreResult<usize>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take up to `max` operations from the front.
    fn cut(&self, max: usize) -> CoreResult<Vec<Operation>> {
        let ops = self.peek(max)?;
        self.remove(ops.len())?;
        Ok(ops)
    }
}

#[derive(Default)]
pub struct MemQueue {
    operations: Mutex<VecDeque<Operation>>,
}

impl MemQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OperationQueue for MemQueue {
    fn enqueue(&self, operation: Operation) -> CoreResult<usize> {
        let mut queue = self.operations.lock().expect("queue lock poisoned");
        queue.push_back(operation);
        Ok(queue.len())
    }

    fn peek(&self, max: usize) -> CoreResult<Vec<Operation>> {
        let queue = self.operations.lock().expect("queue lock poisoned");
        Ok(queue.iter().take(max).cloned().collect())
    }

    fn remove(&self, n: usize) -> CoreResult<usize> {
        let mut queue = self.operations.lock().expect("queue lock poisoned");
        let n = n.min(queue.len());
        queue.drain(..n);
        Ok(n)
    }

    fn len(&self) -> usize {
        self.operations.lock().expect("queue lock poisoned").len()
    }

    fn cut(&self, max: usize) -> CoreResult<Vec<Operation>> {
        let mut queue = self.operations.lock().expect("queue lock poisoned");
        let n = max.min(queue.len());
        Ok(queue.drain(..n).collect())
    }
}

impl std::fmt::Debug for MemQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemQueue").field("len", &self.len()).finish()
    }
}
