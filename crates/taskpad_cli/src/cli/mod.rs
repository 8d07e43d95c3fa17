use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskpad_core::error::AppError;
use taskpad_core::export::ExportFormat;
use taskpad_core::filter::TaskFilter;
use taskpad_core::model::{Category, DATE_FORMAT, Priority};
use time::Date;

#[derive(Parser, Debug)]
#[command(name = "taskpad", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskpad add "Buy milk" --category Shopping --priority High
    Add {
        text: Option<String>,
        /// Category: Work, Personal, Shopping, or Other
        #[arg(long)]
        category: Option<String>,
        /// Due date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        due: Option<String>,
        /// Priority: High, Medium, or Low
        #[arg(long)]
        priority: Option<String>,
    },
    /// List tasks, optionally filtered
    ///
    /// Example: taskpad list --search milk --category Shopping
    List {
        /// Keep tasks whose text contains this, case-insensitively
        #[arg(long)]
        search: Option<String>,
        /// Keep tasks in this category (repeatable)
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,
        /// Keep tasks with this priority (repeatable)
        #[arg(long = "priority", value_name = "PRIORITY")]
        priorities: Vec<String>,
    },
    /// Toggle a task's done flag
    ///
    /// Example: taskpad done task-1
    Done { id: String },
    /// Delete a task
    ///
    /// Example: taskpad delete task-1
    Delete { id: String },
    /// Show details of a task
    ///
    /// Example: taskpad show task-1
    Show { id: String },
    /// Export the full task collection
    ///
    /// Example: taskpad export --format xlsx --output tasks.xlsx
    Export {
        /// Output format: csv or xlsx
        #[arg(long, default_value = "csv")]
        format: String,
        /// Output file (defaults to tasks-export.<format>)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub fn parse_category(raw: &str) -> Result<Category, AppError> {
    Category::parse(raw).ok_or_else(|| {
        AppError::invalid_input(format!(
            "unknown category '{}' (expected Work, Personal, Shopping, or Other)",
            raw.trim()
        ))
    })
}

pub fn parse_priority(raw: &str) -> Result<Priority, AppError> {
    Priority::parse(raw).ok_or_else(|| {
        AppError::invalid_input(format!(
            "unknown priority '{}' (expected High, Medium, or Low)",
            raw.trim()
        ))
    })
}

pub fn parse_due_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid_input(format!("invalid due date '{}', expected YYYY-MM-DD", raw.trim())))
}

pub fn parse_export_format(raw: &str) -> Result<ExportFormat, AppError> {
    ExportFormat::parse(raw).ok_or_else(|| {
        AppError::invalid_input(format!(
            "unknown export format '{}' (expected csv or xlsx)",
            raw.trim()
        ))
    })
}

/// Translate the raw `list` arguments into a filter, rejecting unknown
/// category or priority names up front.
pub fn build_filter(
    search: Option<String>,
    categories: &[String],
    priorities: &[String],
) -> Result<TaskFilter, AppError> {
    let categories = categories
        .iter()
        .map(|raw| parse_category(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let priorities = priorities
        .iter()
        .map(|raw| parse_priority(raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TaskFilter {
        search,
        categories,
        priorities,
    })
}

#[cfg(test)]
mod tests {
    use super::{build_filter, parse_category, parse_due_date, parse_export_format, parse_priority};
    use taskpad_core::export::ExportFormat;
    use taskpad_core::model::{Category, Priority};
    use time::macros::date;

    #[test]
    fn parse_category_accepts_any_case() {
        assert_eq!(parse_category("shopping").unwrap(), Category::Shopping);
        assert_eq!(parse_category("WORK").unwrap(), Category::Work);

        let err = parse_category("errands").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn parse_priority_accepts_any_case() {
        assert_eq!(parse_priority("low").unwrap(), Priority::Low);

        let err = parse_priority("urgent").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn parse_due_date_requires_iso_format() {
        assert_eq!(parse_due_date(" 2024-03-10 ").unwrap(), date!(2024 - 03 - 10));

        let err = parse_due_date("10/03/2024").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn parse_export_format_accepts_excel_alias() {
        assert_eq!(parse_export_format("csv").unwrap(), ExportFormat::Csv);
        assert_eq!(parse_export_format("Excel").unwrap(), ExportFormat::Xlsx);

        let err = parse_export_format("pdf").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn build_filter_collects_all_predicates() {
        let filter = build_filter(
            Some("milk".to_string()),
            &["Shopping".to_string(), "work".to_string()],
            &["High".to_string()],
        )
        .unwrap();

        assert_eq!(filter.search.as_deref(), Some("milk"));
        assert_eq!(filter.categories, [Category::Shopping, Category::Work]);
        assert_eq!(filter.priorities, [Priority::High]);
    }

    #[test]
    fn build_filter_rejects_unknown_names() {
        let err = build_filter(None, &["errands".to_string()], &[]).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
