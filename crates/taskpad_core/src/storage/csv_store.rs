use crate::error::AppError;
use crate::model::{Category, DATE_FORMAT, Priority, Task};
use std::path::{Path, PathBuf};
use time::Date;

/// Column order is fixed; load rejects any deviation.
pub const HEADER: [&str; 5] = ["Task", "Done", "Category", "Due Date", "Priority"];
const STORE_FILE_NAME: &str = "tasks.csv";

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("TASKPAD_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::io("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskpad").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::io("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskpad")
            .join(STORE_FILE_NAME))
    }
}

/// Missing file means an empty collection; a present but malformed file
/// is a read error the caller surfaces to the user.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    parse_document(&content)
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = to_csv_string(tasks)?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))
}

pub fn to_csv_string(tasks: &[Task]) -> Result<String, AppError> {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');

    for task in tasks {
        let due = task
            .due_date
            .format(DATE_FORMAT)
            .map_err(|err| AppError::io(err.to_string()))?;
        out.push_str(&csv_escape(&task.text));
        out.push(',');
        out.push_str(if task.done { "True" } else { "False" });
        out.push(',');
        out.push_str(task.category.as_str());
        out.push(',');
        out.push_str(&due);
        out.push(',');
        out.push_str(task.priority.as_str());
        out.push('\n');
    }

    Ok(out)
}

/// Minimal CSV escaping: quote only when the field needs it, doubling
/// any embedded quotes.
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn parse_document(content: &str) -> Result<Vec<Task>, AppError> {
    let mut records = parse_records(content)?.into_iter();

    let header = records
        .next()
        .ok_or_else(|| AppError::read("store file has no header row"))?;
    if !header.iter().map(|cell| cell.trim()).eq(HEADER) {
        return Err(AppError::read(format!(
            "unexpected header '{}', expected '{}'",
            header.join(","),
            HEADER.join(",")
        )));
    }

    let mut tasks = Vec::new();
    for (index, record) in records.enumerate() {
        let row = index + 1;
        if record.len() != HEADER.len() {
            return Err(AppError::read(format!(
                "row {} has {} fields, expected {}",
                row,
                record.len(),
                HEADER.len()
            )));
        }

        let done = parse_done(&record[1])
            .ok_or_else(|| AppError::read(format!("row {row}: invalid Done value '{}'", record[1])))?;
        let category = Category::parse(&record[2])
            .ok_or_else(|| AppError::read(format!("row {row}: unknown category '{}'", record[2])))?;
        let due_date = Date::parse(record[3].trim(), DATE_FORMAT)
            .map_err(|_| AppError::read(format!("row {row}: invalid due date '{}'", record[3])))?;
        let priority = Priority::parse(&record[4])
            .ok_or_else(|| AppError::read(format!("row {row}: unknown priority '{}'", record[4])))?;

        tasks.push(Task {
            id: format!("task-{row}"),
            text: record[0].clone(),
            done,
            category,
            due_date,
            priority,
        });
    }

    Ok(tasks)
}

fn parse_done(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Splits the file into records, honoring quoted fields (which may
/// contain commas, doubled quotes, and newlines) and CRLF line endings.
fn parse_records(content: &str) -> Result<Vec<Vec<String>>, AppError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                if record.len() > 1 || !record[0].is_empty() {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::read("unterminated quoted field"));
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
