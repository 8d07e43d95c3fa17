pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod session;
pub mod storage;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Category, Priority, Task};
    use time::macros::date;

    #[test]
    fn task_has_required_fields() {
        let task = Task {
            id: "task-1".to_string(),
            text: "demo".to_string(),
            done: false,
            category: Category::Other,
            due_date: date!(2024 - 01 - 01),
            priority: Priority::Medium,
        };

        assert_eq!(task.id, "task-1");
        assert_eq!(task.text, "demo");
        assert!(!task.done);
        assert_eq!(task.category, Category::Other);
        assert_eq!(task.due_date, date!(2024 - 01 - 01));
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing text");
        assert_eq!(err.code(), "invalid_input");

        let err = AppError::read("bad header");
        assert_eq!(err.code(), "read_error");
    }
}
