// src/acquisition/sample_queue.rs
//! Bounded sample queue between an acquisition producer and the pipeline.
//!
//! The producer (a device reader, file replayer, network receiver) must
//! never block on pipeline speed, so the queue is bounded with an explicit
//! overflow policy and a dropped-sample counter; loss is always observable,
//! never silent. Samples are consumed strictly in arrival order.

use crate::error::PipelineError;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// What to do when a push finds the queue full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Discard the incoming sample, keep the backlog.
    DropNewest,
    /// Discard the oldest queued sample to make room for the incoming one.
    DropOldest,
}

/// Bounded, ordered queue of amplitude samples.
pub struct SampleQueue {
    inner: ArrayQueue<f64>,
    policy: OverflowPolicy,
    pushed: AtomicU64,
    dropped: AtomicU64,
}

impl SampleQueue {
    /// Create a queue holding at most `capacity` samples.
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            inner: ArrayQueue::new(capacity),
            policy,
            pushed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Offer a sample from the acquisition side. Never blocks.
    ///
    /// Non-finite values are rejected with [`PipelineError::MalformedSample`]
    /// at the boundary so they can never corrupt downstream envelope or
    /// threshold state. Overflow follows the configured policy and bumps
    /// the dropped-sample counter.
    pub fn push(&self, sample: f64) -> Result<(), PipelineError> {
        let index = self.pushed.fetch_add(1, Ordering::Relaxed) as usize;
        if !sample.is_finite() {
            return Err(PipelineError::MalformedSample {
                index,
                value: sample,
            });
        }

        match self.policy {
            OverflowPolicy::DropNewest => {
                if self.inner.push(sample).is_err() {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(index, "sample queue full, dropping newest sample");
                }
            }
            OverflowPolicy::DropOldest => {
                if self.inner.force_push(sample).is_some() {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(index, "sample queue full, dropped oldest sample");
                }
            }
        }

        Ok(())
    }

    /// Take the oldest queued sample, if any.
    pub fn pop(&self) -> Option<f64> {
        self.inner.pop()
    }

    /// Drain everything currently queued into `buffer`, in arrival order.
    /// Returns how many samples were moved.
    pub fn drain_into(&self, buffer: &mut Vec<f64>) -> usize {
        let mut moved = 0;
        while let Some(sample) = self.inner.pop() {
            buffer.push(sample);
            moved += 1;
        }
        moved
    }

    /// Samples currently queued.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Maximum number of queued samples.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Samples lost to overflow so far.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = SampleQueue::new(8, OverflowPolicy::DropNewest);
        for i in 0..5 {
            queue.push(i as f64).unwrap();
        }

        let mut out = Vec::new();
        queue.drain_into(&mut out);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drop_newest_keeps_backlog() {
        let queue = SampleQueue::new(2, OverflowPolicy::DropNewest);
        queue.push(1.0).unwrap();
        queue.push(2.0).unwrap();
        queue.push(3.0).unwrap();

        assert_eq!(queue.dropped_samples(), 1);
        assert_eq!(queue.pop(), Some(1.0));
        assert_eq!(queue.pop(), Some(2.0));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_drop_oldest_keeps_freshest() {
        let queue = SampleQueue::new(2, OverflowPolicy::DropOldest);
        queue.push(1.0).unwrap();
        queue.push(2.0).unwrap();
        queue.push(3.0).unwrap();

        assert_eq!(queue.dropped_samples(), 1);
        assert_eq!(queue.pop(), Some(2.0));
        assert_eq!(queue.pop(), Some(3.0));
    }

    #[test]
    fn test_rejects_non_finite_samples() {
        let queue = SampleQueue::new(4, OverflowPolicy::DropNewest);
        queue.push(0.5).unwrap();
        assert!(matches!(
            queue.push(f64::NAN),
            Err(PipelineError::MalformedSample { index: 1, .. })
        ));
        // The malformed sample never entered the queue
        assert_eq!(queue.len(), 1);
    }
}
