//! Closable, coalescing FIFO for pending device commands.
//!
//! A single mutex guards the backing storage and the closed flag; a condvar
//! wakes consumers. `dequeue` blocks and returns `None` only after `close`,
//! never spuriously.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::command::{Command, QueueEntry};

#[derive(Default)]
struct Inner {
    entries: VecDeque<QueueEntry>,
    closed: bool,
}

#[derive(Default)]
pub struct CommandQueue {
    inner: Mutex<Inner>,
    available: Condvar,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned queue only means a producer panicked mid-push; the
        // storage itself is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `cmd`. Dropped silently when the queue is closed.
    pub fn enqueue(&self, cmd: Command) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.entries.push_back(QueueEntry::new(cmd));
        drop(inner);
        self.available.notify_one();
    }

    /// Remove the first pending entry similar to `cmd`, then append `cmd`.
    ///
    /// The scan stops at the first match; entries after it keep their
    /// relative order. This bounds queue growth when producers emit motion
    /// faster than the device can execute it: superseded intents are
    /// dropped, never re-ordered.
    pub fn enqueue_replacing<F>(&self, cmd: Command, is_similar: F)
    where
        F: Fn(&Command, &Command) -> bool,
    {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        if let Some(idx) = inner
            .entries
            .iter()
            .position(|e| is_similar(&e.command, &cmd))
        {
            inner.entries.remove(idx);
        }
        inner.entries.push_back(QueueEntry::new(cmd));
        drop(inner);
        self.available.notify_one();
    }

    /// Block until an entry is available or the queue is closed.
    ///
    /// Returns `None` only on close.
    pub fn dequeue(&self) -> Option<QueueEntry> {
        let mut inner = self.lock();
        loop {
            if inner.closed {
                return None;
            }
            if let Some(entry) = inner.entries.pop_front() {
                return Some(entry);
            }
            inner = self
                .available
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mark closed and wake every blocked consumer. Idempotent and safe to
    /// call concurrently with any other operation.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        drop(inner);
        self.available.notify_all();
    }

    /// Discard all pending entries without closing.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Snapshot of the pending commands, oldest first. Test/diagnostic aid.
    pub fn pending(&self) -> Vec<Command> {
        self.lock().entries.iter().map(|e| e.command).collect()
    }
}
