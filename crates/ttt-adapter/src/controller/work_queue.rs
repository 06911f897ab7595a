//! Work queue of game ids
//!
//! - An id waiting in the queue is held once; enqueueing it again is a no-op.
//! - An id being reconciled is never handed to a second worker. Enqueueing
//!   it marks it dirty and it goes back to the queue when the pass completes.
//! - Idle means nothing waiting and nothing in flight.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;

use ttt_domain::GameId;

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<GameId>,
    queued: HashSet<GameId>,
    in_flight: HashSet<GameId>,
    dirty: HashSet<GameId>,
    closed: bool,
}

impl QueueState {
    fn push(&mut self, id: GameId) -> bool {
        if self.queued.insert(id.clone()) {
            self.pending.push_back(id);
            true
        } else {
            false
        }
    }

    fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct WorkQueue {
    state: Mutex<QueueState>,
    available: Notify,
    idle: Notify,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // The state is only touched under this lock and never left half-updated
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns false once the queue is closed
    pub fn enqueue(&self, id: GameId) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        if state.in_flight.contains(&id) {
            state.dirty.insert(id);
        } else if state.push(id) {
            self.available.notify_one();
        }
        true
    }

    /// Next id to reconcile; `None` after `close`
    pub async fn next(&self) -> Option<GameId> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }
                if let Some(id) = state.pending.pop_front() {
                    state.queued.remove(&id);
                    state.in_flight.insert(id.clone());
                    if !state.pending.is_empty() {
                        self.available.notify_one();
                    }
                    return Some(id);
                }
            }

            notified.await;
        }
    }

    /// Mark the pass for `id` finished
    pub fn complete(&self, id: &GameId) {
        let mut state = self.lock();
        state.in_flight.remove(id);
        if state.dirty.remove(id) && !state.closed && state.push(id.clone()) {
            self.available.notify_one();
        }
        if state.is_idle() {
            self.idle.notify_waiters();
        }
    }

    /// Stop handing out work; waiting workers return `None`
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.pending.clear();
        state.queued.clear();
        state.dirty.clear();
        if state.is_idle() {
            self.idle.notify_waiters();
        }
        drop(state);
        self.available.notify_waiters();
    }

    pub fn is_idle(&self) -> bool {
        self.lock().is_idle()
    }

    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }
}
