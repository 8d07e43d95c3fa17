use crate::model::{Category, Priority, Task};

/// Predicates are ANDed across fields; within `categories` and
/// `priorities` membership is an OR. Empty predicates impose no
/// restriction, so the default filter is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub categories: Vec<Category>,
    pub priorities: Vec<Priority>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.categories.is_empty()
            && self.priorities.is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(needle) = self.search.as_deref() {
            let needle = needle.trim();
            if !needle.is_empty()
                && !task.text.to_lowercase().contains(&needle.to_lowercase())
            {
                return false;
            }
        }

        if !self.categories.is_empty() && !self.categories.contains(&task.category) {
            return false;
        }

        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }

        true
    }
}

/// Stable filter: survivors keep their order in the input collection.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}
