//! # Delayed Tasks
//!
//! The modal auto-dismiss is a scheduled, cancellable task rather than a
//! fire-and-forget timer. [`Scheduler`] is the seam: the browser build backs
//! it with `gloo-timers`, tests use [`ManualScheduler`] and move logical time
//! forward with [`ManualScheduler::advance`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Runs a task once after a delay.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ScheduledTask;
}

/// Handle to a scheduled task. Dropping it cancels the task if it has not run.
#[must_use = "dropping a ScheduledTask cancels it"]
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    /// `cancel` is invoked at most once, when the handle is cancelled or dropped.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Logical-time scheduler. Nothing runs until [`advance`](Self::advance) is called.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_seq: u64,
    entries: Vec<ManualEntry>,
}

struct ManualEntry {
    due: Duration,
    seq: u64,
    task: Box<dyn FnOnce()>,
    cancelled: Rc<Cell<bool>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Tasks scheduled and not yet run or cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .entries
            .iter()
            .filter(|entry| !entry.cancelled.get())
            .count()
    }

    /// Move time forward by `by`, running every task that falls due in
    /// deadline order (ties in scheduling order). Returns how many ran.
    ///
    /// Tasks may schedule further tasks; those run too if they fall due
    /// before the new time.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                queue.entries.retain(|entry| !entry.cancelled.get());
                let due = queue
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.due <= target)
                    .min_by_key(|(_, entry)| (entry.due, entry.seq))
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let entry = queue.entries.remove(index);
                        queue.now = entry.due;
                        Some(entry)
                    }
                    None => {
                        queue.now = target;
                        None
                    }
                }
            };

            // Run outside the borrow so the task can reschedule.
            match next {
                Some(entry) => {
                    (entry.task)();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ScheduledTask {
        let cancelled = Rc::new(Cell::new(false));
        {
            let mut queue = self.queue.borrow_mut();
            let seq = queue.next_seq;
            queue.next_seq += 1;
            let due = queue.now + delay;
            queue.entries.push(ManualEntry {
                due,
                seq,
                task,
                cancelled: Rc::clone(&cancelled),
            });
        }
        ScheduledTask::new(move || cancelled.set(true))
    }
}
