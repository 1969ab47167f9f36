//! # Frame Channel
//!
//! Bounded hand-off between the agent loop (producer) and the render loop
//! (consumer).
//!
//! ```text
//! ┌─────────────────┐  submit   ┌─────────────────┐  try_take  ┌─────────────────┐
//! │   Agent loop    │──────────▶│  Frame Channel  │───────────▶│   Render loop   │
//! │   (producer)    │           │  (≤ K pending)  │            │   (consumer)    │
//! └─────────────────┘           └─────────────────┘            └─────────────────┘
//! ```
//!
//! The producer is never blocked: when K frames are already pending, the
//! oldest one is evicted and the new one appended, so the channel always
//! holds the K most recent submissions. The consumer takes at most one frame
//! per tick, so the displayed frame may lag under load but the backlog never
//! grows past K.
//!
//! The size check, eviction, append and pop all happen under one mutex. A
//! closed channel (visualizer stopped) drops every submission and holds no
//! frames.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::frame::Frame;

/// Result of a [`FrameChannel::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Appended without evicting anything
    Queued,
    /// Appended after evicting the oldest pending frame
    Evicted,
    /// Channel closed, frame dropped
    Closed,
}

/// Counters since the channel was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub submitted: u64,
    pub evicted: u64,
    pub dropped: u64,
    pub taken: u64,
}

#[derive(Debug)]
struct ChannelState {
    queue: VecDeque<Frame>,
    open: bool,
}

/// Bounded, evict-oldest frame buffer shared by producer and render loop.
#[derive(Debug)]
pub struct FrameChannel {
    state: Mutex<ChannelState>,
    capacity: usize,
    submitted: AtomicU64,
    evicted: AtomicU64,
    dropped: AtomicU64,
    taken: AtomicU64,
}

impl FrameChannel {
    /// Open channel holding at most `capacity` frames (at least one).
    pub fn new(capacity: usize) -> Self {
        Self::with_state(capacity, true)
    }

    /// Channel that drops submissions until [`open`](Self::open) is called.
    pub fn closed(capacity: usize) -> Self {
        Self::with_state(capacity, false)
    }

    fn with_state(capacity: usize, open: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(ChannelState {
                queue: VecDeque::with_capacity(capacity),
                open,
            }),
            capacity,
            submitted: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            taken: AtomicU64::new(0),
        }
    }

    // A panic while holding the lock cannot leave the queue half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Non-blocking submit with evict-oldest overflow.
    pub fn submit(&self, frame: Frame) -> SubmitOutcome {
        let mut state = self.lock();
        if !state.open {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return SubmitOutcome::Closed;
        }

        let outcome = if state.queue.len() >= self.capacity {
            state.queue.pop_front();
            self.evicted.fetch_add(1, Ordering::Relaxed);
            SubmitOutcome::Evicted
        } else {
            SubmitOutcome::Queued
        };
        state.queue.push_back(frame);
        self.submitted.fetch_add(1, Ordering::Relaxed);
        outcome
    }

    /// Oldest pending frame, or `None` when empty. Never blocks.
    pub fn try_take(&self) -> Option<Frame> {
        let frame = self.lock().queue.pop_front();
        if frame.is_some() {
            self.taken.fetch_add(1, Ordering::Relaxed);
        }
        frame
    }

    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn open(&self) {
        self.lock().open = true;
    }

    /// Close the channel and release every pending frame.
    pub fn close(&self) {
        let mut state = self.lock();
        state.open = false;
        state.queue.clear();
    }

    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            taken: self.taken.load(Ordering::Relaxed),
        }
    }
}
