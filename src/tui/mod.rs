pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};

use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::runtime::Handle;

use crate::api::DeadlineApi;
use app::{App, InputMode};
use ui::ui;

/// How long to wait for a key before checking for finished requests.
const TICK: Duration = Duration::from_millis(100);

/// Restores the terminal on drop, even when the loop bails out early.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(TerminalSession { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Runs the interactive view. Requests go to `runtime`; this thread only
/// draws, reads keys and applies finished requests.
pub fn run_tui<A>(runtime: Handle, api: A) -> Result<(), Box<dyn Error>>
where
    A: DeadlineApi + Clone + 'static,
{
    let mut session = TerminalSession::new()?;
    let mut app = App::new(api, runtime);
    run_app(&mut session.terminal, &mut app)?;
    Ok(())
}

fn run_app<B: Backend, A>(terminal: &mut Terminal<B>, app: &mut App<A>) -> io::Result<()>
where
    A: DeadlineApi + Clone + 'static,
{
    loop {
        app.drain_completions();
        app.refresh_view(Utc::now());
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => {
                app.notification = None;
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char('a') => app.start_add(),
                    KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('r') => app.reload(),
                    _ => {}
                }
            }
            InputMode::Adding | InputMode::Editing => match key.code {
                KeyCode::Enter => app.handle_input(),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Char(c) => app.input_buffer.push(c),
                KeyCode::Backspace => {
                    app.input_buffer.pop();
                }
                _ => {}
            },
        }
    }
}
