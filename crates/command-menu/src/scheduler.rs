//! Micro-batching of re-filter / re-sort work

use std::fmt;

/// Priority key of a scheduled task.
///
/// Scheduling a second task under the same key replaces the first one. Keys run
/// in the order they were first scheduled within a tick, not by their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Highlight the first visible item after the search changed
    SelectFirst = 1,
    /// Re-sort after an item's value changed
    Sort = 2,
    /// Re-filter and re-sort after items were mounted
    ItemMounted = 3,
    /// Re-filter after items were removed
    ItemRemoved = 4,
}

type Task<C> = Box<dyn FnOnce(&mut C)>;

/// Coalesces work scheduled during one tick into a single batch
pub struct Scheduler<C> {
    queue: Vec<(Priority, Task<C>)>,
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn schedule(&mut self, priority: Priority, task: impl FnOnce(&mut C) + 'static) {
        if let Some(slot) = self.queue.iter_mut().find(|(key, _)| *key == priority) {
            log::trace!("superseding scheduled {:?} task", priority);
            slot.1 = Box::new(task);
        } else {
            log::trace!("scheduling {:?} task", priority);
            self.queue.push((priority, Box::new(task)));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn pending(&self) -> Vec<Priority> {
        self.queue.iter().map(|(key, _)| *key).collect()
    }

    /// Take everything scheduled so far.
    ///
    /// Anything scheduled while the returned batch runs lands in the next batch.
    pub fn drain(&mut self) -> Batch<C> {
        Batch {
            tasks: std::mem::take(&mut self.queue),
        }
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Tasks drained from a [`Scheduler`], in run order
pub struct Batch<C> {
    tasks: Vec<(Priority, Task<C>)>,
}

impl<C> Batch<C> {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Run every task against `ctx`, returning how many ran
    pub fn run(self, ctx: &mut C) -> usize {
        let count = self.tasks.len();
        for (_, task) in self.tasks {
            task(ctx);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        scheduler: Scheduler<Log>,
        ran: Vec<&'static str>,
    }

    impl Log {
        fn flush(&mut self) -> usize {
            self.scheduler.drain().run(self)
        }
    }

    #[test]
    fn test_last_task_per_priority_wins() {
        let mut log = Log::default();
        log.scheduler.schedule(Priority::ItemMounted, |l| l.ran.push("first"));
        log.scheduler.schedule(Priority::ItemMounted, |l| l.ran.push("second"));

        assert_eq!(log.scheduler.len(), 1);
        assert_eq!(log.flush(), 1);
        assert_eq!(log.ran, vec!["second"]);
    }

    #[test]
    fn test_priorities_run_in_insertion_order() {
        let mut log = Log::default();
        log.scheduler.schedule(Priority::ItemRemoved, |l| l.ran.push("removed"));
        log.scheduler.schedule(Priority::SelectFirst, |l| l.ran.push("select"));
        log.scheduler.schedule(Priority::Sort, |l| l.ran.push("sort"));
        // Superseding keeps the key's first slot
        log.scheduler.schedule(Priority::ItemRemoved, |l| l.ran.push("removed again"));

        assert_eq!(log.flush(), 3);
        assert_eq!(log.ran, vec!["removed again", "select", "sort"]);
    }

    #[test]
    fn test_tasks_scheduled_during_flush_run_next_flush() {
        let mut log = Log::default();
        log.scheduler.schedule(Priority::Sort, |l| {
            l.ran.push("outer");
            l.scheduler.schedule(Priority::Sort, |l| l.ran.push("inner"));
        });

        assert_eq!(log.flush(), 1);
        assert_eq!(log.ran, vec!["outer"]);
        assert!(!log.scheduler.is_empty());

        assert_eq!(log.flush(), 1);
        assert_eq!(log.ran, vec!["outer", "inner"]);
        assert!(log.scheduler.is_empty());
    }

    #[test]
    fn test_empty_flush() {
        let mut log = Log::default();
        assert_eq!(log.flush(), 0);
        assert!(log.ran.is_empty());
    }
}
