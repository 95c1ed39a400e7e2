// src/ui.rs

pub mod chat;
pub mod footer;
pub mod header;

use crate::{
    api::HttpChatBackend,
    app::{lock, App, SharedApp, TerminalSurface},
    config::Config,
    constants::TICK_RATE_MS,
    controller::{ChatController, ChatSurface},
    errors::CatalogChatResult,
    key_handlers::{handle_event, KeyAction},
    models::SubmitOutcome,
};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{
    future::Future,
    io,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::mpsc;

type Controller = ChatController<HttpChatBackend, TerminalSurface>;

/// Runs the terminal chat window until the user quits.
pub async fn run_ui(config: &Config) -> CatalogChatResult<()> {
    let backend = HttpChatBackend::new(&config.endpoint, &config.chat_path)?;
    info!("Chat endpoint: {}", backend.url());

    let app: SharedApp = Arc::new(Mutex::new(App::new(
        config.example_queries.clone(),
        backend.url(),
    )));
    let mut controller = ChatController::new(backend, TerminalSurface::new(app.clone()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, &app, &mut controller).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("Terminal UI stopped: {}", err);
    }
    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &SharedApp,
    controller: &mut Controller,
) -> CatalogChatResult<()> {
    let mut events = spawn_input_reader();
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_RATE_MS));

    controller.surface_mut().focus_input();

    loop {
        terminal.draw(|f| draw(f, &mut lock(app)))?;

        let action = tokio::select! {
            event = events.recv() => match event {
                Some(event) => handle_event(event, &mut lock(app)),
                None => KeyAction::Quit,
            },
            _ = ticker.tick() => {
                lock(app).status_indicator.tick();
                KeyAction::None
            }
        };

        let quit = match action {
            KeyAction::None => false,
            KeyAction::Quit => true,
            KeyAction::Submit(query) => {
                drive_submission(terminal, app, &mut events, controller.submit(&query)).await?
            }
            KeyAction::Example(query) => {
                drive_submission(terminal, app, &mut events, controller.ask_example(&query))
                    .await?
            }
        };

        if quit {
            info!("Quitting");
            break;
        }
    }

    Ok(())
}

/// Polls a submission to completion while keeping the window live.
/// Returns `true` if the user quit before the answer arrived.
async fn drive_submission<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &SharedApp,
    events: &mut mpsc::Receiver<Event>,
    submission: impl Future<Output = SubmitOutcome>,
) -> CatalogChatResult<bool> {
    tokio::pin!(submission);
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_RATE_MS));

    loop {
        terminal.draw(|f| draw(f, &mut lock(app)))?;

        tokio::select! {
            outcome = &mut submission => {
                debug!("Submission finished: {}", outcome);
                let mut app = lock(app);
                match outcome {
                    SubmitOutcome::ServerError(_) | SubmitOutcome::ConnectionError => {
                        app.status_indicator.set_status(format!("Last request: {}", outcome));
                    }
                    SubmitOutcome::Displayed | SubmitOutcome::Skipped => {
                        app.status_indicator.clear_status();
                    }
                }
                return Ok(false);
            }
            Some(event) = events.recv() => {
                if handle_event(event, &mut lock(app)) == KeyAction::Quit {
                    return Ok(true);
                }
            }
            _ = ticker.tick() => lock(app).status_indicator.tick(),
        }
    }
}

fn spawn_input_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>(100);
    tokio::task::spawn_blocking(move || loop {
        match event::poll(Duration::from_millis(TICK_RATE_MS)) {
            Ok(true) => match event::read() {
                Ok(event) => {
                    if tx.blocking_send(event).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    error!("Failed to read terminal event: {}", e);
                    return;
                }
            },
            Ok(false) => {
                if tx.is_closed() {
                    return;
                }
            }
            Err(e) => {
                error!("Failed to poll terminal events: {}", e);
                return;
            }
        }
    });
    rx
}

/// Draws the whole window.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(2), // Header
                Constraint::Min(1),    // Messages
                Constraint::Length(1), // Loading indicator
                Constraint::Length(3), // Input
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(f.area());

    header::draw_header(f, chunks[0], app);
    chat::draw_messages(f, chunks[1], app);
    app.status_indicator.render(f, chunks[2]);
    chat::draw_input(f, chunks[3], app);
    footer::draw_footer(f, chunks[4], app);
}
