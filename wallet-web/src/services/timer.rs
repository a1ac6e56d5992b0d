//! Browser [`Scheduler`] on top of `gloo-timers`.

use std::time::Duration;

use gloo_timers::callback::Timeout;
use lib_session::{ScheduledTask, Scheduler};

#[derive(Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ScheduledTask {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, task);
        // Dropping a gloo `Timeout` clears it.
        ScheduledTask::new(move || drop(timeout))
    }
}
