//! Temporal task buckets.
//!
//! # Invariants
//! - `Completed` wins over every date-based bucket.
//! - `Overdue` means due strictly before start of `today`.
//! - Each bucket is sorted ascending by due date; ties keep input order.

use crate::model::task::{Task, TaskRecord};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskBucket {
    Overdue,
    DueToday,
    Upcoming,
    Completed,
}

impl TaskBucket {
    /// Display order for grouped task lists.
    pub const ALL: [TaskBucket; 4] = [
        TaskBucket::Overdue,
        TaskBucket::DueToday,
        TaskBucket::Upcoming,
        TaskBucket::Completed,
    ];
}

/// Bucket for one task relative to `today`.
pub fn bucket_for(today: NaiveDate, task: &Task) -> TaskBucket {
    if task.is_completed() {
        return TaskBucket::Completed;
    }
    let due_day = task.due_date.date();
    if due_day < today {
        TaskBucket::Overdue
    } else if due_day == today {
        TaskBucket::DueToday
    } else {
        TaskBucket::Upcoming
    }
}

/// Tasks grouped by bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriagedTasks {
    pub overdue: Vec<TaskRecord>,
    pub due_today: Vec<TaskRecord>,
    pub upcoming: Vec<TaskRecord>,
    pub completed: Vec<TaskRecord>,
}

impl TriagedTasks {
    pub fn bucket(&self, bucket: TaskBucket) -> &[TaskRecord] {
        match bucket {
            TaskBucket::Overdue => &self.overdue,
            TaskBucket::DueToday => &self.due_today,
            TaskBucket::Upcoming => &self.upcoming,
            TaskBucket::Completed => &self.completed,
        }
    }

    pub fn len(&self) -> usize {
        self.overdue.len() + self.due_today.len() + self.upcoming.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_mut(&mut self, bucket: TaskBucket) -> &mut Vec<TaskRecord> {
        match bucket {
            TaskBucket::Overdue => &mut self.overdue,
            TaskBucket::DueToday => &mut self.due_today,
            TaskBucket::Upcoming => &mut self.upcoming,
            TaskBucket::Completed => &mut self.completed,
        }
    }
}

/// Classifies `tasks` into buckets relative to `today`.
pub fn classify(today: NaiveDate, tasks: &[TaskRecord]) -> TriagedTasks {
    let mut triaged = TriagedTasks::default();
    for task in tasks {
        triaged
            .bucket_mut(bucket_for(today, &task.data))
            .push(task.clone());
    }
    for bucket in TaskBucket::ALL {
        // `sort_by_key` is stable, so equal due dates keep input order.
        triaged
            .bucket_mut(bucket)
            .sort_by_key(|task| task.data.due_date);
    }
    triaged
}
