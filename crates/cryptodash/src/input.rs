//! Key pump
//!
//! Reads crossterm events on a blocking thread and forwards them to the
//! engine as messages. Resizes carry no size; the engine asks the screen.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use cryptodash_core::{EngineHandle, EngineMessage, Key};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long one poll waits before rechecking the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Map a crossterm key event to a dashboard key.
///
/// Releases and keys the dashboard never binds are dropped.
pub fn translate(event: KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);

    match event.code {
        KeyCode::Char(c) if ctrl => Some(Key::Ctrl(c.to_ascii_lowercase())),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::F(n) if (1..=12).contains(&n) => Some(Key::F(n)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

fn to_message(event: Event) -> Option<EngineMessage> {
    match event {
        Event::Key(key) => translate(key).map(EngineMessage::Key),
        Event::Resize(_, _) => Some(EngineMessage::Resize),
        _ => None,
    }
}

/// Why the pump loop ended without a terminal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PumpExit {
    /// The stop flag was set.
    Stopped,
    /// The engine dropped its receiver; it is already on its way out.
    EngineGone,
}

/// Start forwarding terminal events until `stop` is set or the engine stops.
///
/// If the terminal stops delivering events the engine is told to shut down,
/// since no quit key could reach it any more.
pub fn spawn_key_pump(engine: EngineHandle, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let outcome = pump(&engine, &stop);
        finish(&engine, &stop, outcome);
    })
}

fn pump(engine: &EngineHandle, stop: &AtomicBool) -> Result<PumpExit> {
    while !stop.load(Ordering::SeqCst) {
        if !event::poll(POLL_INTERVAL).context("Failed to poll terminal events")? {
            continue;
        }
        let event = event::read().context("Failed to read terminal event")?;
        if let Some(message) = to_message(event) {
            if engine.send_blocking(message).is_err() {
                return Ok(PumpExit::EngineGone);
            }
        }
    }
    Ok(PumpExit::Stopped)
}

/// Log how the pump ended; only a terminal failure while the dashboard is
/// still running asks the engine to shut down.
fn finish(engine: &EngineHandle, stop: &AtomicBool, outcome: Result<PumpExit>) {
    match outcome {
        Ok(PumpExit::Stopped) => debug!("Key pump stopping"),
        Ok(PumpExit::EngineGone) => debug!("Engine stopped, key pump exiting"),
        Err(e) if stop.load(Ordering::SeqCst) => {
            debug!(error = %e, "Key pump ended during shutdown");
        }
        Err(e) => {
            warn!(error = %e, "Key pump failed, shutting down");
            let _ = engine.send_blocking(EngineMessage::Shutdown);
        }
    }
}
