mod map_draw;
mod state;
mod ui;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use econ_atlas::{config::Config, logging};
use ratatui::{Terminal, backend::CrosstermBackend};
use state::AppState;
use std::io;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    logging::init(&config.log_file, &config.log_level)?;
    let mut state = AppState::new(&config)?;
    info!(
        records = state.dataset.len(),
        year = state.window.latest,
        baseline = state.window.baseline,
        "starting dashboard"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, state))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = event::read()? {
                if state.handle_input(code) {
                    info!("quit requested");
                    return Ok(());
                }
            }
        }
    }
}
