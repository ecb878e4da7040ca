//! Cooperative periodic tasks
//!
//! The host advances the scheduler with frame time and gets back the ids of the
//! tasks that are due. Nothing is called back: the owner of a task checks the
//! returned ids and runs its own work, so no task ever holds a reference into
//! the camera.
//!
//! Registering a task returns a [`TaskGuard`]. Dropping the guard cancels the
//! task.

use crate::error::{CameraError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Identifier of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Raw id value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Registration of a periodic task. Cancels the task when dropped.
#[derive(Debug)]
pub struct TaskGuard {
    id: TaskId,
    cancelled: Arc<AtomicBool>,
}

impl TaskGuard {
    /// Task id
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Cancel the task now
    pub fn cancel(self) {
        // Drop does the work
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            log::trace!("Cancelled task {:?}", self.id);
        }
    }
}

#[derive(Debug)]
struct Task {
    id: TaskId,
    interval: f32,
    elapsed: f32,
    started: bool,
    cancelled: Arc<AtomicBool>,
}

/// Periodic task scheduler driven by simulation time
#[derive(Debug)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule a task every `interval` seconds until its guard is dropped.
    ///
    /// The first tick is due on the next [`advance`](Self::advance).
    pub fn every(&mut self, interval: f32) -> Result<TaskGuard> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(CameraError::InvalidConfig(format!(
                "task interval must be a positive number of seconds, got {}",
                interval
            )));
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let cancelled = Arc::new(AtomicBool::new(false));
        self.tasks.push(Task {
            id,
            interval,
            elapsed: 0.0,
            started: false,
            cancelled: Arc::clone(&cancelled),
        });

        log::trace!("Scheduled task {:?} every {}s", id, interval);
        Ok(TaskGuard { id, cancelled })
    }

    /// Advance time and return the tasks due this step.
    ///
    /// Several intervals elapsing in one step yield a single tick.
    pub fn advance(&mut self, delta_time: f32) -> Vec<TaskId> {
        let delta_time = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };
        self.tasks.retain(|task| !task.cancelled.load(Ordering::Acquire));

        let mut fired = Vec::new();
        for task in &mut self.tasks {
            if !task.started {
                task.started = true;
                fired.push(task.id);
                continue;
            }

            task.elapsed += delta_time;
            if task.elapsed >= task.interval {
                task.elapsed %= task.interval;
                fired.push(task.id);
            }
        }
        fired
    }

    /// Whether a task is registered and not cancelled
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks
            .iter()
            .any(|task| task.id == id && !task.cancelled.load(Ordering::Acquire))
    }

    /// Number of live tasks
    pub fn task_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| !task.cancelled.load(Ordering::Acquire))
            .count()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_first_advance_then_per_interval() {
        let mut scheduler = Scheduler::new();
        let guard = scheduler.every(0.1).unwrap();

        assert_eq!(scheduler.advance(0.016), vec![guard.id()]);

        let mut ticks = 0;
        for _ in 0..8 {
            ticks += scheduler.advance(0.03).len();
        }
        // 0.24s after the first tick
        assert_eq!(ticks, 2);
    }

    #[test]
    fn test_coalesces_long_frame() {
        let mut scheduler = Scheduler::new();
        let guard = scheduler.every(0.1).unwrap();
        scheduler.advance(0.0);

        assert_eq!(scheduler.advance(0.55), vec![guard.id()]);
        assert!(scheduler.advance(0.01).is_empty());
    }

    #[test]
    fn test_drop_cancels() {
        let mut scheduler = Scheduler::new();
        let guard = scheduler.every(0.1).unwrap();
        let id = guard.id();
        assert!(scheduler.is_scheduled(id));

        drop(guard);
        assert!(!scheduler.is_scheduled(id));
        assert_eq!(scheduler.task_count(), 0);
        assert!(scheduler.advance(1.0).is_empty());
    }

    #[test]
    fn test_explicit_cancel() {
        let mut scheduler = Scheduler::new();
        let keep = scheduler.every(0.1).unwrap();
        let stop = scheduler.every(0.1).unwrap();
        stop.cancel();

        assert_eq!(scheduler.advance(0.0), vec![keep.id()]);
        assert_eq!(scheduler.task_count(), 1);
    }

    #[test]
    fn test_rejects_bad_interval() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.every(0.0).is_err());
        assert!(scheduler.every(f32::NAN).is_err());
    }
}
