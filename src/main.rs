use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = clearloop::cli::Cli::parse();
    let config = clearloop::config::from_cli(&cli)?;
    clearloop::logging::init_tracing(&config, cli.log_filter.as_deref())?;

    match cli.command.clone() {
        Some(clearloop::cli::CliCommand::Tui) | None => {
            clearloop::tui::run(config)?;
        }
        Some(command) => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            clearloop::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}
