use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskpad_cli::cli::{self, Cli, Command};
use taskpad_core::config::{self, Config, Palette};
use taskpad_core::error::AppError;
use taskpad_core::model::{DATE_FORMAT, NewTask, Task};
use taskpad_core::session::Session;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Due Date")]
    due_date: String,
    #[tabled(rename = "Priority")]
    priority: &'static str,
}

fn format_due(task: &Task) -> Result<String, AppError> {
    task.due_date
        .format(DATE_FORMAT)
        .map_err(|err| AppError::io(err.to_string()))
}

fn task_row(task: &Task) -> Result<TaskRow, AppError> {
    Ok(TaskRow {
        id: task.id.clone(),
        text: task.text.clone(),
        done: if task.done { "[x]" } else { "[ ]" },
        category: task.category.as_str(),
        due_date: format_due(task)?,
        priority: task.priority.as_str(),
    })
}

fn print_tasks_plain(tasks: &[Task], palette: &Palette) -> Result<(), AppError> {
    if tasks.is_empty() {
        println!(
            "{}",
            palette.mutedize("No tasks found. Add one with 'add <text>'.")
        );
        return Ok(());
    }

    let rows = tasks
        .iter()
        .map(task_row)
        .collect::<Result<Vec<_>, _>>()?;
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");

    Ok(())
}

fn task_json(task: &Task) -> Result<serde_json::Value, AppError> {
    Ok(serde_json::json!({
        "id": task.id,
        "text": task.text,
        "done": task.done,
        "category": task.category.as_str(),
        "due_date": format_due(task)?,
        "priority": task.priority.as_str(),
    }))
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let mut payload = Vec::with_capacity(tasks.len());
    for task in tasks {
        payload.push(task_json(task)?);
    }
    println!("{}", serde_json::Value::Array(payload));
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    println!("{}", task_json(task)?);
    Ok(())
}

fn print_task_detail(task: &Task, palette: &Palette) -> Result<(), AppError> {
    println!("{}", palette.accentize(&task.id));
    println!("  Task:     {}", task.text);
    println!("  Done:     {}", if task.done { "yes" } else { "no" });
    println!("  Category: {}", task.category);
    println!("  Due Date: {}", format_due(task)?);
    println!("  Priority: {}", task.priority);
    Ok(())
}

fn run_command(
    cli: Cli,
    session: &mut Session,
    config: &Config,
    palette: &Palette,
) -> Result<(), AppError> {
    match cli.command {
        Command::Add {
            text,
            category,
            due,
            priority,
        } => {
            let text = match text {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("task text is required")),
            };
            let category = match category {
                Some(raw) => cli::parse_category(&raw)?,
                None => config
                    .default_category()
                    .unwrap_or(taskpad_core::model::Category::Other),
            };
            let priority = match priority {
                Some(raw) => cli::parse_priority(&raw)?,
                None => config
                    .default_priority()
                    .unwrap_or(taskpad_core::model::Priority::Medium),
            };
            let due_date = match due {
                Some(raw) => Some(cli::parse_due_date(&raw)?),
                None => None,
            };

            let task = session.add(NewTask {
                text,
                category,
                due_date,
                priority,
            })?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!(
                    "{}",
                    palette.accentize(&format!("Added task: {} ({})", task.text, task.id))
                );
            }
        }
        Command::List {
            search,
            categories,
            priorities,
        } => {
            let filter = cli::build_filter(search, &categories, &priorities)?;
            let view = session.filtered(&filter);
            if cli.json {
                print_tasks_json(&view)?;
            } else {
                print_tasks_plain(&view, palette)?;
            }
        }
        Command::Done { id } => {
            let task = session.toggle_done(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else if task.done {
                println!("Marked task done: {} ({})", task.text, task.id);
            } else {
                println!("Marked task not done: {} ({})", task.text, task.id);
            }
        }
        Command::Delete { id } => {
            let task = session.delete(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.text, task.id);
            }
        }
        Command::Show { id } => {
            let task = session.get(&id)?.clone();
            if cli.json {
                print_task_json(&task)?;
            } else {
                print_task_detail(&task, palette)?;
            }
        }
        Command::Export { format, output } => {
            let format = cli::parse_export_format(&format)?;
            let bytes = session.export(format)?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(format!("tasks-export.{}", format.extension())));
            std::fs::write(&path, bytes).map_err(|err| AppError::io(err.to_string()))?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "output": path.display().to_string(),
                        "format": format.extension(),
                        "tasks": session.tasks().len(),
                    })
                );
            } else {
                println!(
                    "Exported {} tasks to {}",
                    session.tasks().len(),
                    path.display()
                );
            }
        }
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

/// Whitespace splitting with double-quote grouping, so interactive
/// input like `add "Buy milk" --category Shopping` parses as one text
/// argument. Backslash escapes quotes and backslashes inside quotes.
fn tokenize_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

/// Interactive session: the collection is loaded once and held for the
/// whole run; every mutating command persists it before the next prompt.
fn run_interactive(config: &Config, palette: &Palette) -> Result<(), AppError> {
    let mut session = Session::open_default()?;
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match tokenize_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskpad".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, &mut session, config, palette) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let config_load = config::load_config_with_fallback();
    if let Some(err) = &config_load.error {
        eprintln!("WARNING: {err}");
    }
    let config = config_load.config;
    let palette = config::palette_for_theme(config.theme.as_deref());

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&config, &palette) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{err}");
                return;
            }
            _ => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                std::process::exit(1);
            }
        },
    };

    let mut session = match Session::open_default() {
        Ok(session) => session,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &mut session, &config, &palette) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
