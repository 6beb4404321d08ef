//! Dashboard engine
//!
//! The engine is the only owner of [`DashboardState`]. Refresh results,
//! resize notifications and keys all arrive as [`EngineMessage`]s on one
//! channel and are applied strictly one at a time; after each message that
//! changed something visible the engine draws exactly one frame. A render can
//! therefore never see a row set from one refresh paired with a cursor
//! computed against another, and a resize is always applied before the next
//! frame that depends on it.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    keymap::{Key, KeyMap},
    launcher::Launcher,
    market::MarketSummary,
    refresh::{RefreshScheduler, TriggerOutcome},
    row::RowSet,
    screen::Screen,
    state::{DashboardState, Effect, Mutation},
    theme::Theme,
    view::View,
    Error, Result,
};

/// Everything that can change dashboard state.
#[derive(Debug)]
pub enum EngineMessage {
    /// Outcome of one fetch.
    Refreshed(Result<RowSet>),
    /// Outcome of one market summary fetch.
    Market(Result<MarketSummary>),
    /// The terminal changed size; query it again.
    Resize,
    Key(Key),
    /// Stop without waiting for a quit key.
    Shutdown,
}

/// Why [`DashboardEngine::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user asked to quit.
    Quit,
    /// A shutdown message arrived.
    Shutdown,
}

/// Sending side of the engine channel.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineMessage>,
}

impl EngineHandle {
    /// Create a channel holding up to `capacity` pending messages.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<EngineMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] once the engine has stopped.
    pub async fn send(&self, message: EngineMessage) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// Send from a thread outside the async runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] once the engine has stopped.
    pub fn send_blocking(&self, message: EngineMessage) -> Result<()> {
        self.tx
            .blocking_send(message)
            .map_err(|_| Error::ChannelClosed)
    }
}

/// Single owner of dashboard state, renderer and launcher.
pub struct DashboardEngine<S, L> {
    state: DashboardState,
    keymap: KeyMap,
    theme: Theme,
    screen: S,
    launcher: L,
    refresher: RefreshScheduler,
}

impl<S: Screen, L: Launcher> DashboardEngine<S, L> {
    /// Build an engine sized to the screen's current dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen cannot report its size.
    pub fn new(
        mut screen: S,
        launcher: L,
        keymap: KeyMap,
        theme: Theme,
        refresher: RefreshScheduler,
    ) -> Result<Self> {
        let dims = screen.size()?;
        Ok(Self {
            state: DashboardState::new(dims),
            keymap,
            theme,
            screen,
            launcher,
            refresher,
        })
    }

    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Apply the startup load without drawing; the first frame is drawn by
    /// [`DashboardEngine::run`].
    pub fn seed(&mut self, initial: Result<RowSet>) {
        self.state.apply_refresh(initial);
    }

    /// Show the market summary from startup with its first load applied.
    pub fn seed_market(&mut self, initial: Result<MarketSummary>) {
        self.refresher.set_market(true);
        self.state.show_summary(true);
        self.state.apply_market(initial);
    }

    /// Draw the current state, then apply messages until quit.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails, or [`Error::ChannelClosed`] if every
    /// sender is dropped before a quit.
    pub async fn run(mut self, mut rx: mpsc::Receiver<EngineMessage>) -> Result<ExitReason> {
        self.render()?;
        info!("Dashboard running");

        while let Some(message) = rx.recv().await {
            if let Some(reason) = self.handle(message)? {
                info!(?reason, "Dashboard stopping");
                return Ok(reason);
            }
        }
        Err(Error::ChannelClosed)
    }

    /// Apply one message and render if it changed anything.
    ///
    /// Returns the exit reason when the message ends the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen fails to report its size or draw.
    pub fn handle(&mut self, message: EngineMessage) -> Result<Option<ExitReason>> {
        let mutation = match message {
            EngineMessage::Refreshed(result) => self.state.apply_refresh(result),
            EngineMessage::Market(result) => self.state.apply_market(result),
            EngineMessage::Resize => {
                let dims = self.screen.size()?;
                debug!(rows = dims.rows, cols = dims.cols, "Resize");
                self.state.resize(dims)
            }
            EngineMessage::Key(key) => match self.on_key(key) {
                KeyOutcome::Exit => return Ok(Some(ExitReason::Quit)),
                KeyOutcome::Applied(mutation) => mutation,
            },
            EngineMessage::Shutdown => return Ok(Some(ExitReason::Shutdown)),
        };

        if mutation.is_changed() {
            self.render()?;
        }
        Ok(None)
    }

    fn on_key(&mut self, key: Key) -> KeyOutcome {
        let Some(action) = self.keymap.resolve(key) else {
            return KeyOutcome::Applied(self.state.handle_unmapped(key));
        };
        debug!(?key, ?action, mode = ?self.state.mode(), "Key");

        let transition = self.state.dispatch(action);
        let effect_mutation = match transition.effect {
            None => Mutation::Unchanged,
            Some(Effect::Quit) => return KeyOutcome::Exit,
            Some(Effect::Refresh) => {
                if self.refresher.trigger() == TriggerOutcome::Skipped {
                    debug!("Manual refresh ignored, fetch in flight");
                }
                Mutation::Unchanged
            }
            Some(Effect::Summary(visible)) => {
                self.refresher.set_market(visible);
                if visible && self.refresher.trigger() == TriggerOutcome::Skipped {
                    debug!("Market summary waits for the fetch in flight");
                }
                Mutation::Unchanged
            }
            Some(Effect::Open(url)) => {
                let result = self.launcher.open(&url);
                if let Err(ref e) = result {
                    warn!(url = %url, error = %e, "Failed to open coin page");
                }
                self.state.note_launch(result)
            }
        };

        KeyOutcome::Applied(
            if transition.mutation.is_changed() || effect_mutation.is_changed() {
                Mutation::Changed
            } else {
                Mutation::Unchanged
            },
        )
    }

    fn render(&mut self) -> Result<()> {
        let view = View::build(&self.state, self.theme, &self.keymap);
        self.screen.draw(&view)
    }
}

enum KeyOutcome {
    Exit,
    Applied(Mutation),
}
