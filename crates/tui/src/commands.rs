use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::calendar::{format_long, today};
use crate::cli::{AddArgs, CliCommand, IdsArgs, ListArgs};
use crate::config::AppConfig;
use crate::core::commands as core_commands;
use crate::model::{DeleteResult, StatusUpdate, Task, TaskView};
use crate::parser::parse_date_spec;

pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    match command {
        CliCommand::Add(args) => handle_add(config, &args, &mut writer),
        CliCommand::List(args) => handle_list(config, &args, &mut writer),
        CliCommand::Complete(args) => {
            handle_status(config, &args, StatusChange::Completed, &mut writer)
        }
        CliCommand::Draft(args) => handle_status(config, &args, StatusChange::Drafted, &mut writer),
        CliCommand::Delete(args) => handle_delete(config, &args, &mut writer),
        CliCommand::Tui => Err(anyhow!("launch interactive surfaces directly")),
    }
}

fn resolve_date(spec: Option<&str>) -> Result<NaiveDate> {
    let today = today();
    match spec {
        Some(spec) => {
            parse_date_spec(spec, today).with_context(|| format!("invalid --date `{}`", spec))
        }
        None => Ok(today),
    }
}

fn handle_add<W: Write>(config: &AppConfig, args: &AddArgs, mut writer: W) -> Result<()> {
    let mut input = args.to_capture();
    input.date = Some(resolve_date(args.date.as_deref())?);
    match core_commands::add_task(config, &input)? {
        Some(outcome) => writeln!(
            writer,
            "Added {} for {}: {}",
            outcome.id,
            format_long(outcome.date),
            outcome.title
        )?,
        None => writeln!(writer, "Nothing to add")?,
    }
    Ok(())
}

fn handle_list<W: Write>(config: &AppConfig, args: &ListArgs, mut writer: W) -> Result<()> {
    let date = resolve_date(args.date.as_deref())?;
    let tasks = core_commands::list_tasks(config, args.view, date)?;
    if tasks.is_empty() {
        writeln!(writer, "{}", empty_list_line(args.view, date))?;
        return Ok(());
    }
    for task in &tasks {
        writeln!(writer, "{}", list_line(args.view, task))?;
    }
    Ok(())
}

fn empty_list_line(view: TaskView, date: NaiveDate) -> String {
    match view {
        TaskView::Today => format!("No tasks for {}", format_long(date)),
        TaskView::Draft => String::from("No draft tasks"),
        TaskView::Completed => String::from("No completed tasks"),
    }
}

fn list_line(view: TaskView, task: &Task) -> String {
    match view {
        TaskView::Today => format!("{}  {}", task.id, task.title),
        TaskView::Draft | TaskView::Completed => format!(
            "{}  {}  (originally assigned on {})",
            task.id,
            task.title,
            format_long(task.assigned_date)
        ),
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusChange {
    Completed,
    Drafted,
}

impl StatusChange {
    fn verb(self) -> &'static str {
        match self {
            StatusChange::Completed => "Completed",
            StatusChange::Drafted => "Moved to drafts",
        }
    }
}

fn handle_status<W: Write>(
    config: &AppConfig,
    args: &IdsArgs,
    change: StatusChange,
    mut writer: W,
) -> Result<()> {
    let results = match change {
        StatusChange::Completed => core_commands::complete_tasks(config, &args.ids)?,
        StatusChange::Drafted => core_commands::draft_tasks(config, &args.ids)?,
    };
    let summary = StatusSummary::from_results(&results);
    writeln!(writer, "{}", SummaryLine::changed(change.verb(), summary.changed))?;
    if !summary.unchanged.is_empty() {
        writeln!(writer, "Unchanged: {}", summary.unchanged.join(", "))?;
    }
    Ok(())
}

struct StatusSummary {
    changed: usize,
    unchanged: Vec<String>,
}

impl StatusSummary {
    fn from_results(results: &[StatusUpdate]) -> Self {
        let mut changed = 0usize;
        let mut unchanged = Vec::new();
        for result in results {
            if result.changed {
                changed += 1;
            } else {
                unchanged.push(result.id.clone());
            }
        }
        Self { changed, unchanged }
    }
}

fn handle_delete<W: Write>(config: &AppConfig, args: &IdsArgs, mut writer: W) -> Result<()> {
    let results = core_commands::delete_tasks(config, &args.ids)?;
    let summary = DeleteSummary::from_results(&results);
    summary.write_to(&mut writer)?;
    Ok(())
}

struct DeleteSummary {
    deleted: usize,
    missing: Vec<String>,
}

impl DeleteSummary {
    fn from_results(results: &[DeleteResult]) -> Self {
        let mut deleted = 0usize;
        let mut missing = Vec::new();
        for result in results {
            if result.deleted {
                deleted += 1;
            } else {
                missing.push(result.id.clone());
            }
        }
        Self { deleted, missing }
    }

    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", SummaryLine::changed("Deleted", self.deleted))?;
        if !self.missing.is_empty() {
            writeln!(writer, "Not found: {}", self.missing.join(", "))?;
        }
        Ok(())
    }
}

enum SummaryLine {
    Changed(&'static str, usize),
    NoneChanged,
}

impl SummaryLine {
    fn changed(verb: &'static str, count: usize) -> Self {
        if count > 0 {
            SummaryLine::Changed(verb, count)
        } else {
            SummaryLine::NoneChanged
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Changed(verb, count) => {
                write!(
                    f,
                    "{} {} task{}",
                    verb,
                    count,
                    if *count == 1 { "" } else { "s" }
                )
            }
            SummaryLine::NoneChanged => write!(f, "No tasks changed"),
        }
    }
}
