//! Command dispatch for the `lazytask` binary.
//!
//! # Responsibility
//! - Open the database and run the load-time reconciliation before any
//!   database command.
//! - Map each command onto one `TaskService` use-case and render the result.
//!
//! # Invariants
//! - `today` is resolved once per invocation and reused by every step.
//! - Errors cross this boundary as plain messages.

use crate::args::{Cli, Command};
use crate::config::CliConfig;
use crate::output;
use lazytask_core::db::open_db;
use lazytask_core::{
    core_version, init_logging, ReconcileSummary, SqliteTaskRepository, Task, TaskService,
};
use log::{error, info};
use serde_json::json;
use std::io::Write;

type CliService<'conn> = TaskService<SqliteTaskRepository<'conn>>;

/// Runs the parsed command line, writing command output to `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> Result<(), String> {
    let config = CliConfig::resolve(&cli);
    let command = cli.command;

    if !command.needs_database() {
        let rendered = render_version(&config)?;
        return emit(out, &rendered);
    }

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level.as_str(), log_dir)
            .map_err(|err| format!("logging init failed: {err}"))?;
    }

    let name = command.name();
    info!("event=cli_command module=cli status=start command={name}");
    let conn = open_db(&config.db_path).map_err(|err| format!("database open failed: {err}"))?;
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let result = service
        .reconcile_on_load(config.today)
        .map_err(|err| err.to_string())
        .and_then(|summary| dispatch(&service, command, summary, &config, out));

    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok command={name}"),
        Err(err) => error!("event=cli_command module=cli status=error command={name} error={err}"),
    }
    result
}

fn dispatch(
    service: &CliService<'_>,
    command: Command,
    load_summary: ReconcileSummary,
    config: &CliConfig,
    out: &mut impl Write,
) -> Result<(), String> {
    let today = config.today;
    let rendered = match command {
        Command::List(args) => {
            let tasks = service
                .list_tasks(&args.into_query())
                .map_err(|err| err.to_string())?;
            if config.json {
                output::json(&tasks)?
            } else {
                output::task_list(&tasks)
            }
        }
        Command::Add(args) => {
            let task = service
                .create_task(args.into_request()?, today)
                .map_err(|err| err.to_string())?;
            render_task(config, "Created", &task)?
        }
        Command::Edit(args) => {
            let (id, edit) = args.into_edit()?;
            let task = service
                .edit_task(id, edit, today)
                .map_err(|err| err.to_string())?;
            render_task(config, "Updated", &task)?
        }
        Command::Toggle { id } => {
            let task = service
                .toggle_completion(id, today)
                .map_err(|err| err.to_string())?;
            render_task(config, "Toggled", &task)?
        }
        Command::Delete { id } => {
            service.delete_task(id).map_err(|err| err.to_string())?;
            if config.json {
                output::json(&json!({ "deleted": id }))?
            } else {
                format!("Deleted {id}\n")
            }
        }
        // The pass already ran on open; report what it did.
        Command::Reconcile => {
            if config.json {
                output::json(&load_summary)?
            } else {
                output::reconcile_summary(&load_summary)
            }
        }
        Command::Export { output: target } => {
            let tasks = service.export_tasks().map_err(|err| err.to_string())?;
            let encoded = output::json(&tasks)?;
            match target {
                Some(path) => {
                    std::fs::write(&path, encoded)
                        .map_err(|err| format!("export to `{}` failed: {err}", path.display()))?;
                    format!("Exported {} task(s) to {}\n", tasks.len(), path.display())
                }
                None => encoded,
            }
        }
        Command::Import { file: path } => {
            let raw = std::fs::read_to_string(&path)
                .map_err(|err| format!("import from `{}` failed: {err}", path.display()))?;
            let tasks: Vec<Task> = serde_json::from_str(&raw)
                .map_err(|err| format!("import from `{}` failed: {err}", path.display()))?;
            let summary = service
                .import_tasks(tasks, today)
                .map_err(|err| err.to_string())?;
            if config.json {
                output::json(&summary)?
            } else {
                format!(
                    "Imported {} task(s); {} recurring task(s) advanced.\n",
                    summary.total, summary.advanced
                )
            }
        }
        Command::Version => render_version(config)?,
    };
    emit(out, &rendered)
}

fn render_version(config: &CliConfig) -> Result<String, String> {
    if config.json {
        return output::json(&json!({
            "cli": env!("CARGO_PKG_VERSION"),
            "core": core_version(),
        }));
    }
    Ok(format!(
        "lazytask {} (core {})\n",
        env!("CARGO_PKG_VERSION"),
        core_version()
    ))
}

fn render_task(config: &CliConfig, verb: &str, task: &Task) -> Result<String, String> {
    if config.json {
        return output::json(task);
    }
    Ok(format!("{verb}: {}", output::task_line(task)) + "\n")
}

fn emit(out: &mut impl Write, rendered: &str) -> Result<(), String> {
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|err| format!("write failed: {err}"))
}
