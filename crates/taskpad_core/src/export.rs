use crate::error::AppError;
use crate::model::{DATE_FORMAT, Task};
use crate::storage::csv_store;
use rust_xlsxwriter::Workbook;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<ExportFormat> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" | "excel" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Serializes the full, unfiltered collection in the requested format.
pub fn export_tasks(tasks: &[Task], format: ExportFormat) -> Result<Vec<u8>, AppError> {
    match format {
        ExportFormat::Csv => Ok(csv_store::to_csv_string(tasks)?.into_bytes()),
        ExportFormat::Xlsx => export_xlsx(tasks),
    }
}

fn export_xlsx(tasks: &[Task]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Tasks").map_err(xlsx_error)?;

    for (col, title) in csv_store::HEADER.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *title)
            .map_err(xlsx_error)?;
    }

    for (index, task) in tasks.iter().enumerate() {
        let row = index as u32 + 1;
        let due = task
            .due_date
            .format(DATE_FORMAT)
            .map_err(|err| AppError::io(err.to_string()))?;
        let done = if task.done { "True" } else { "False" };

        worksheet
            .write_string(row, 0, task.text.as_str())
            .map_err(xlsx_error)?;
        worksheet.write_string(row, 1, done).map_err(xlsx_error)?;
        worksheet
            .write_string(row, 2, task.category.as_str())
            .map_err(xlsx_error)?;
        worksheet
            .write_string(row, 3, due.as_str())
            .map_err(xlsx_error)?;
        worksheet
            .write_string(row, 4, task.priority.as_str())
            .map_err(xlsx_error)?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn xlsx_error(err: rust_xlsxwriter::XlsxError) -> AppError {
    AppError::io(err.to_string())
}
