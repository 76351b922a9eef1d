use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Draft,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Draft => "draft",
            TaskStatus::Completed => "completed",
        }
    }

    /// Status only moves forward: `active → draft`, `active → completed`,
    /// `draft → completed`. Nothing leaves `completed`.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Active, TaskStatus::Draft)
                | (TaskStatus::Active, TaskStatus::Completed)
                | (TaskStatus::Draft, TaskStatus::Completed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three tabs a task can surface under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum TaskView {
    Today,
    Draft,
    Completed,
}

impl TaskView {
    pub const ALL: [TaskView; 3] = [TaskView::Today, TaskView::Draft, TaskView::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskView::Today => "today",
            TaskView::Draft => "draft",
            TaskView::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskView::Today => "Today",
            TaskView::Draft => "Draft",
            TaskView::Completed => "Completed",
        }
    }

    pub fn to_status(&self) -> TaskStatus {
        match self {
            TaskView::Today => TaskStatus::Active,
            TaskView::Draft => TaskStatus::Draft,
            TaskView::Completed => TaskStatus::Completed,
        }
    }

    /// Only the Today tab is scoped to the selected date.
    pub fn matches(&self, task: &Task, selected: Option<NaiveDate>) -> bool {
        if task.status != self.to_status() {
            return false;
        }
        match self {
            TaskView::Today => selected.is_some_and(|date| task.date == date),
            TaskView::Draft | TaskView::Completed => true,
        }
    }

    /// Which swipe directions a card on this tab accepts.
    pub fn swipe_policy(&self) -> SwipePolicy {
        match self {
            TaskView::Today => SwipePolicy {
                complete: true,
                draft: true,
            },
            TaskView::Draft => SwipePolicy {
                complete: true,
                draft: false,
            },
            TaskView::Completed => SwipePolicy {
                complete: false,
                draft: false,
            },
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TaskView::Today => 0,
            TaskView::Draft => 1,
            TaskView::Completed => 2,
        }
    }
}

impl fmt::Display for TaskView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipePolicy {
    pub complete: bool,
    pub draft: bool,
}

impl SwipePolicy {
    pub fn is_swipeable(&self) -> bool {
        self.complete || self.draft
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub status: TaskStatus,
    pub assigned_date: NaiveDate,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Task {
    pub fn new(id: String, title: String, date: NaiveDate, created_at: i64) -> Self {
        Self {
            id,
            title,
            date,
            status: TaskStatus::Active,
            assigned_date: date,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AddOutcome {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusUpdate {
    pub id: String,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeleteResult {
    pub id: String,
    pub deleted: bool,
}

/// Sort newest first by creation time.
pub fn sort_recent_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn transitions_only_move_forward() {
        assert!(TaskStatus::Active.can_transition_to(TaskStatus::Draft));
        assert!(TaskStatus::Active.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::Draft.can_transition_to(TaskStatus::Completed));

        assert!(!TaskStatus::Draft.can_transition_to(TaskStatus::Active));
        assert!(!TaskStatus::Draft.can_transition_to(TaskStatus::Draft));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Active));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Draft));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let task = Task::new("1718000000000".into(), "Water plants".into(), date(2024, 6, 10), 1_718_000_000_000);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], "1718000000000");
        assert_eq!(json["date"], "2024-06-10");
        assert_eq!(json["assignedDate"], "2024-06-10");
        assert_eq!(json["status"], "active");
        assert_eq!(json["createdAt"], 1_718_000_000_000i64);
    }

    #[test]
    fn today_view_is_scoped_to_selected_date() {
        let mut task = Task::new("1".into(), "Stretch".into(), date(2024, 6, 10), 1);
        assert!(TaskView::Today.matches(&task, Some(date(2024, 6, 10))));
        assert!(!TaskView::Today.matches(&task, Some(date(2024, 6, 11))));
        assert!(!TaskView::Today.matches(&task, None));

        task.status = TaskStatus::Draft;
        assert!(TaskView::Draft.matches(&task, Some(date(2030, 1, 1))));
        assert!(!TaskView::Today.matches(&task, Some(date(2024, 6, 10))));
    }

    #[test]
    fn completed_cards_are_not_swipeable() {
        assert!(!TaskView::Completed.swipe_policy().is_swipeable());
        assert!(!TaskView::Draft.swipe_policy().draft);
        assert!(TaskView::Today.swipe_policy().draft);
    }
}
