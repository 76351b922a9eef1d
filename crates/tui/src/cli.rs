use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::capture::CaptureInput;
use crate::model::TaskView;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "clearloop",
    version,
    about = "A calm, swipe-driven list for today's tasks.",
    after_help = "Examples:\n  clearloop                 Launch the TUI (same as `clearloop tui`)\n  clearloop add Water the plants --date tomorrow\n  clearloop list --view draft\n  clearloop complete 1760880000000"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter for the log file (e.g. "info", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the interactive terminal UI (default command)
    Tui,
    /// Add a task for a date
    Add(AddArgs),
    /// List the tasks shown on a tab
    List(ListArgs),
    /// Mark one or more tasks completed
    Complete(IdsArgs),
    /// Move one or more tasks to drafts
    Draft(IdsArgs),
    /// Delete one or more tasks by id
    Delete(IdsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,

    /// Date the task belongs to (ISO e.g. 2026-10-19, today, tomorrow, fri, +3d)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Which tab to list
    #[arg(long, value_enum, default_value_t = TaskView::Today)]
    pub view: TaskView,

    /// Date scoping the today tab (same formats as `add --date`)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct IdsArgs {
    /// One or more task ids (shown by `clearloop list`)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

impl AddArgs {
    /// Capture input with the date left for the caller to resolve.
    pub fn to_capture(&self) -> CaptureInput {
        CaptureInput {
            text: self.text.clone(),
            date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["clearloop"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn add_collects_words_and_date() {
        let cli =
            Cli::try_parse_from(["clearloop", "add", "Call", "mom", "--date", "tomorrow"]).unwrap();
        let Some(CliCommand::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.text, vec!["Call", "mom"]);
        assert_eq!(args.date.as_deref(), Some("tomorrow"));
        assert_eq!(args.to_capture().title(), "Call mom");
    }

    #[test]
    fn list_defaults_to_today() {
        let cli = Cli::try_parse_from(["clearloop", "list", "--log", "debug"]).unwrap();
        assert_eq!(cli.log_filter.as_deref(), Some("debug"));
        let Some(CliCommand::List(args)) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.view, TaskView::Today);
    }

    #[test]
    fn id_commands_require_ids() {
        assert!(Cli::try_parse_from(["clearloop", "complete"]).is_err());
        let cli = Cli::try_parse_from(["clearloop", "delete", "1", "2"]).unwrap();
        let Some(CliCommand::Delete(args)) = cli.command else {
            panic!("expected delete");
        };
        assert_eq!(args.ids, vec!["1", "2"]);
    }
}
