use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use crate::calendar::today;
use crate::config::AppConfig;
use crate::core::commands::open_store;
use crate::core::{Board, FileStore};

mod app;
mod buffer;
mod constants;
mod helpers;

use app::App;
use constants::TICK_RATE;

type Backend = CrosstermBackend<Stdout>;

pub fn run(config: AppConfig) -> Result<()> {
    let first_run = !config.store_path().exists();
    let store_path = config.store_path().display().to_string();

    // Load before touching the terminal so storage errors print normally.
    let store = open_store(&config)?;
    let board = Board::new(store, today());
    info!(tasks = board.store().len(), "starting terminal ui");

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )
    .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
    terminal.hide_cursor().context("failed to hide cursor")?;

    let mut app = App::new(board, store_path.clone());
    if first_run {
        app.set_status_info(format!("Tasks will be saved to {}", store_path));
    }
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    result
}

fn run_app(terminal: &mut Terminal<Backend>, app: &mut App<FileStore>) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| app.draw(f, Instant::now()))?;
        if app.should_quit() {
            break;
        }

        let mut timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if let Some(wakeup) = app.next_wakeup() {
            timeout = timeout.min(wakeup.saturating_duration_since(Instant::now()));
        }

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.on_key(key, Instant::now())?
                }
                Event::Mouse(mouse) => app.on_mouse(mouse, Instant::now()),
                Event::FocusLost => app.on_focus_lost(),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        let now = Instant::now();
        let wakeup_due = app.next_wakeup().is_some_and(|wakeup| wakeup <= now);
        if wakeup_due || now.duration_since(last_tick) >= TICK_RATE {
            app.on_tick(now);
            last_tick = now;
        }
    }

    Ok(())
}
