use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

mod app;
mod cli;
mod config;
mod core;
mod error;
mod input;
mod logging;
mod models;
mod state;
mod store;
mod ui;

use app::App;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let (mut config, is_first_run) = config::check_first_run()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    let data_dir = config.resolved_data_dir()?;

    // Logging is optional; keep going without it
    let _logger = match logging::init_logging(&config.log_level, &data_dir.join("logs")) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };

    match cli::handle_cli(args.command, &config, &data_dir) {
        Ok(false) => return Ok(()),
        Ok(true) => {}
        Err(e) => {
            error!("event=cli_command status=failed error={:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }

    let mut app = App::new(config, &data_dir, is_first_run)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.save_ui_state();
    info!("event=app_exit status={}", if res.is_ok() { "ok" } else { "error" });

    if let Err(err) = res {
        error!("event=run_loop status=failed error={:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.clear_expired_notification();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Windows also reports key releases
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !app.handle_key(key) {
                    return Ok(());
                }
            }
        }
    }
}
