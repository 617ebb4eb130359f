use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::device::SurfaceSize;

/// Bounded queue carrying size changes from the event handler to the next
/// render tick.
///
/// Cloning yields another handle to the same queue. When full, the oldest
/// entry is discarded: only the most recent size matters to the renderer.
#[derive(Debug, Clone)]
pub struct ResizeQueue {
    inner: Arc<Mutex<VecDeque<SurfaceSize>>>,
    capacity: usize,
}

impl ResizeQueue {
    pub const DEFAULT_CAPACITY: usize = 8;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Records a size change. Never blocks on the renderer and never touches
    /// the GPU.
    pub fn push(&self, size: SurfaceSize) {
        let mut queue = self.inner.lock();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(size);
    }

    /// Empties the queue, returning the most recent size if any was queued.
    pub fn drain_latest(&self) -> Option<SurfaceSize> {
        self.inner.lock().drain(..).last()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ResizeQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_latest_and_empties() {
        let q = ResizeQueue::new();
        q.push(SurfaceSize::new(800, 600));
        q.push(SurfaceSize::new(400, 300));
        assert_eq!(q.drain_latest(), Some(SurfaceSize::new(400, 300)));
        assert!(q.is_empty());
        assert_eq!(q.drain_latest(), None);
    }

    #[test]
    fn overflow_drops_oldest() {
        let q = ResizeQueue::with_capacity(2);
        q.push(SurfaceSize::new(1, 1));
        q.push(SurfaceSize::new(2, 2));
        q.push(SurfaceSize::new(3, 3));
        assert_eq!(q.len(), 2);
        assert_eq!(q.drain_latest(), Some(SurfaceSize::new(3, 3)));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        assert_eq!(ResizeQueue::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn handles_share_one_queue_across_threads() {
        let q = ResizeQueue::new();
        let writer = q.clone();
        std::thread::spawn(move || writer.push(SurfaceSize::new(640, 480)))
            .join()
            .unwrap();
        assert_eq!(q.drain_latest(), Some(SurfaceSize::new(640, 480)));
    }
}
