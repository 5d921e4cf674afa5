//! Weathervane terminal dashboard.
//!
//! Polls the bot's `/api/status` every 5 seconds, reconciles each snapshot
//! into the retained render state, and redraws. A 1-second tick keeps the
//! price-freshness badge live between polls. `s` starts the bot, `x` stops
//! it; both trigger an immediate out-of-band refresh.

mod app;
mod ui;

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use weathervane_client::{ClientError, StatusClient, StatusSnapshot};

use app::App;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const TICK_INTERVAL: Duration = Duration::from_secs(1);
const LOG_FILE: &str = "weathervane-tui.log";

type PollResult = (u64, Result<StatusSnapshot, ClientError>);

#[derive(Debug, Clone, Copy)]
enum ControlAction {
    Start,
    Stop,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing()?;

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client = StatusClient::from_env()?;
    info!(base = %client.base_url(), "weathervane-tui starting");

    let (poll_tx, mut poll_rx) = mpsc::unbounded_channel::<PollResult>();
    let mut app = App::new(Utc::now());

    // One immediate poll on startup, independent of the interval timer.
    dispatch_poll(&client, &poll_tx, app.issue_generation());
    let mut last_poll = Instant::now();
    let mut last_tick = Instant::now();

    loop {
        // Drain finished polls before drawing; failures and stale
        // generations are absorbed inside App.
        while let Ok((generation, result)) = poll_rx.try_recv() {
            app.on_poll(generation, result);
        }

        if last_tick.elapsed() >= TICK_INTERVAL {
            app.ui.tick_freshness(Utc::now());
            last_tick = Instant::now();
        }

        if last_poll.elapsed() >= POLL_INTERVAL {
            dispatch_poll(&client, &poll_tx, app.issue_generation());
            last_poll = Instant::now();
        }

        terminal.draw(|f| ui::render(f, &app.ui))?;

        let timeout = TICK_INTERVAL
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(50));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('s') => dispatch_control(
                        &client,
                        &poll_tx,
                        app.issue_generation(),
                        ControlAction::Start,
                    ),
                    KeyCode::Char('x') => dispatch_control(
                        &client,
                        &poll_tx,
                        app.issue_generation(),
                        ControlAction::Stop,
                    ),
                    _ => {}
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Fire one status poll; the result lands on the channel tagged with its
/// generation so the main loop can discard out-of-order responses.
fn dispatch_poll(
    client: &StatusClient,
    tx: &mpsc::UnboundedSender<PollResult>,
    generation: u64,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.fetch_status().await;
        let _ = tx.send((generation, result));
    });
}

/// Fire a start/stop command, then refresh unconditionally: the poll tells
/// us the true state rather than assuming the command worked.
fn dispatch_control(
    client: &StatusClient,
    tx: &mpsc::UnboundedSender<PollResult>,
    generation: u64,
    action: ControlAction,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = match action {
            ControlAction::Start => client.start_bot().await,
            ControlAction::Stop => client.stop_bot().await,
        };
        match outcome {
            Ok(()) => info!(?action, "control request accepted"),
            Err(error) => warn!(?action, %error, "control request failed"),
        }

        let result = client.fetch_status().await;
        let _ = tx.send((generation, result));
    });
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_tracing() -> Result<(), Box<dyn Error>> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
