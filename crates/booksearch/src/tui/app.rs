//! Application state and event loop

use super::input::TextInput;
use super::ui;
use anyhow::{Context, Result};
use booksearch_core::{Config, HttpSearchService, SearchController};
use crossterm::{
    cursor::SetCursorStyle,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, widgets::ListState};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct App {
    /// Search input
    pub search_input: TextInput,
    /// Owns query, results, selection and detail state
    pub controller: SearchController,
    /// Scroll state for the result list, synced from the controller's cursor
    pub list_state: ListState,
    /// Service the controller talks to, shown in the status bar
    pub api_url: String,
    /// Drives the spinner animation
    pub started_at: Instant,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: SearchController, api_url: String) -> Self {
        Self {
            search_input: TextInput::new(),
            controller,
            list_state: ListState::default(),
            api_url,
            started_at: Instant::now(),
            should_quit: false,
        }
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.should_quit = true,
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                self.controller.move_cursor_up()
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
                self.controller.move_cursor_down()
            }
            (KeyCode::Enter, _) => self.controller.select_cursor(),
            (code, modifiers) => {
                // Cursor movement is not an input change
                let before = self.search_input.text.clone();
                let consumed = self.search_input.handle_key(code, modifiers);
                if consumed && self.search_input.text != before {
                    self.controller.on_input_change(&self.search_input.text);
                }
            }
        }
    }
}

/// Run the interactive UI until the user quits
pub fn run(config: &Config) -> Result<()> {
    let service = HttpSearchService::from_config(config).context("Failed to create HTTP client")?;
    let controller = SearchController::spawn(config.search_settings(), Arc::new(service));
    let mut app = App::new(controller, config.api_url.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetCursorStyle::BlinkingBar)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        SetCursorStyle::DefaultUserShape
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Target ~60Hz so the spinner keeps moving while a request is out
    const FRAME_TIME: Duration = Duration::from_millis(16);

    loop {
        app.controller.tick();
        terminal.draw(|f| ui::render(f, app))?;

        // Wake up early if the debounce gate is about to fire
        let wait = app
            .controller
            .next_deadline(Instant::now())
            .map_or(FRAME_TIME, |d| d.min(FRAME_TIME));

        if event::poll(wait)? {
            // Drain everything queued so a burst of keys costs one frame
            loop {
                app.handle_event(event::read()?);
                if app.should_quit || !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
