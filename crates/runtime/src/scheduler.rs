use foundation::time::Time;
use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Scheduled<T> {
    id: TaskId,
    due: Time,
    task: T,
}

/// One-shot deferred tasks, fired by [`Scheduler::take_due`].
///
/// Ordering contract: due tasks are returned by `(due, insertion order)`.
#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    pub fn schedule_at(&mut self, due: Time, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        trace!(task = id.0, due_s = due.0, "task scheduled");
        self.tasks.push(Scheduled { id, due, task });
        id
    }

    pub fn schedule_after(&mut self, now: Time, delay_s: f64, task: T) -> TaskId {
        self.schedule_at(now.after(delay_s.max(0.0)), task)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Removes and returns every task due at or before `now`.
    pub fn take_due(&mut self, now: Time) -> Vec<(TaskId, T)> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.tasks).into_iter().partition(|t| t.due <= now);
        self.tasks = rest;
        due.sort_by(|a, b| a.due.0.total_cmp(&b.due.0).then_with(|| a.id.cmp(&b.id)));
        due.into_iter().map(|t| (t.id, t.task)).collect()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
