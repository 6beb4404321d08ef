//! Dashboard state
//!
//! [`DashboardState`] is the one mutable aggregate of the dashboard: the
//! sorted row set, the active sort, the cursor, viewport geometry, the help
//! flag, the marked rows and the optional market summary. Only the engine holds it, and every change goes
//! through a method here that reports whether anything visible changed.
//!
//! This module separates concerns into:
//! - **Data updates**: refresh results and resizes
//! - **Navigation**: cursor movement, always clamped to the row set
//! - **Input state machine**: semantic actions in `Normal` and `HelpVisible`

use std::collections::HashSet;

use crate::{
    keymap::{Action, Key},
    launcher::coin_url,
    layout::{layout, scroll_offset, Dimensions, ViewportGeometry},
    market::MarketSummary,
    row::{Row, RowSet},
    sort::{apply_sort, SortKey, SortSpec},
    Result,
};

/// Which keys are live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    HelpVisible,
}

/// Whether a state operation changed anything that must be redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Changed,
    Unchanged,
}

impl Mutation {
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }

    const fn from_changed(changed: bool) -> Self {
        if changed {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }
}

/// Work an action asks of the engine beyond the state change itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    /// Open this URL with the launcher.
    Open(String),
    /// Start a refresh now.
    Refresh,
    /// The market summary was shown (`true`) or hidden.
    Summary(bool),
}

/// Result of dispatching one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub mutation: Mutation,
    pub effect: Option<Effect>,
}

impl Transition {
    const fn unchanged() -> Self {
        Self {
            mutation: Mutation::Unchanged,
            effect: None,
        }
    }

    const fn effect(effect: Effect) -> Self {
        Self {
            mutation: Mutation::Unchanged,
            effect: Some(effect),
        }
    }
}

impl From<Mutation> for Transition {
    fn from(mutation: Mutation) -> Self {
        Self {
            mutation,
            effect: None,
        }
    }
}

/// The dashboard's single mutable aggregate.
#[derive(Debug, Clone)]
pub struct DashboardState {
    rows: RowSet,
    sort: SortSpec,
    cursor: usize,
    offset: usize,
    dims: Dimensions,
    geometry: ViewportGeometry,
    mode: InputMode,
    marked: HashSet<String>,
    error: Option<String>,
    summary_visible: bool,
    market: Option<MarketSummary>,
}

impl DashboardState {
    /// Empty state for a terminal of `dims`: no rows, sorted by rank
    /// ascending, cursor on row 0, help hidden.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            rows: RowSet::default(),
            sort: SortSpec::default(),
            cursor: 0,
            offset: 0,
            dims,
            geometry: layout(dims),
            mode: InputMode::Normal,
            marked: HashSet::new(),
            error: None,
            summary_visible: false,
            market: None,
        }
    }

    pub const fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub const fn sort(&self) -> SortSpec {
        self.sort
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Index of the first visible row.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    pub const fn mode(&self) -> InputMode {
        self.mode
    }

    /// Latest error to show on the status line.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn summary_visible(&self) -> bool {
        self.summary_visible
    }

    /// Latest market summary; kept while the panel is hidden.
    pub const fn market(&self) -> Option<&MarketSummary> {
        self.market.as_ref()
    }

    pub fn is_marked(&self, row: &Row) -> bool {
        self.marked.contains(&row.id)
    }

    /// The highlighted row, if any rows exist.
    pub fn selected(&self) -> Option<&Row> {
        self.rows.get(self.cursor)
    }

    fn selected_id(&self) -> Option<String> {
        self.selected().map(|row| row.id.clone())
    }

    fn relayout(&mut self) {
        let geometry = layout(self.dims);
        self.geometry = if self.summary_visible {
            geometry.with_summary()
        } else {
            geometry
        };
        self.offset = scroll_offset(
            self.cursor,
            self.offset,
            self.geometry.page_size,
            self.rows.len(),
        );
    }
}

// ============================================================================
// DATA UPDATES: refresh results and resizes
// ============================================================================

impl DashboardState {
    /// Apply the outcome of one fetch.
    ///
    /// A new row set replaces the old one whole, sorted by the active spec,
    /// and the cursor follows the previously selected row. A failure keeps the
    /// previous rows untouched and only updates the status line. Results older
    /// than the rows already shown are ignored.
    pub fn apply_refresh(&mut self, result: Result<RowSet>) -> Mutation {
        match result {
            Ok(fresh) => {
                if fresh.generation() < self.rows.generation() {
                    tracing::debug!(
                        stale = fresh.generation(),
                        current = self.rows.generation(),
                        "Ignoring stale refresh result"
                    );
                    return Mutation::Unchanged;
                }

                let selected = self.selected_id();
                self.rows = apply_sort(&fresh, self.sort);
                let last = self.rows.len().saturating_sub(1);
                self.cursor = selected
                    .and_then(|id| self.rows.position_of(&id))
                    .unwrap_or_else(|| self.cursor.min(last));
                self.error = None;
                self.relayout();
                Mutation::Changed
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Mutation::Changed
            }
        }
    }

    /// Adopt new terminal dimensions.
    pub fn resize(&mut self, dims: Dimensions) -> Mutation {
        if dims == self.dims {
            return Mutation::Unchanged;
        }
        self.dims = dims;
        self.relayout();
        Mutation::Changed
    }

    /// Apply the outcome of one market summary fetch.
    ///
    /// A failure keeps the previous summary and shows on the status line.
    /// Summaries older than the one shown are ignored.
    pub fn apply_market(&mut self, result: Result<MarketSummary>) -> Mutation {
        match result {
            Ok(fresh) => {
                if self
                    .market
                    .as_ref()
                    .is_some_and(|current| fresh.fetched_at < current.fetched_at)
                {
                    return Mutation::Unchanged;
                }
                self.market = Some(fresh);
                Mutation::from_changed(self.summary_visible)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Mutation::Changed
            }
        }
    }

    /// Record the outcome of a launch attempt for the status line.
    pub fn note_launch(&mut self, result: Result<()>) -> Mutation {
        match result {
            Ok(()) => Mutation::Unchanged,
            Err(e) => {
                self.error = Some(e.to_string());
                Mutation::Changed
            }
        }
    }
}

// ============================================================================
// NAVIGATION: cursor movement and sorting
// ============================================================================

impl DashboardState {
    /// Move the cursor to `target`, clamped to the row set.
    fn move_to(&mut self, target: usize) -> Mutation {
        if self.rows.is_empty() {
            return Mutation::Unchanged;
        }
        let target = target.min(self.rows.len() - 1);
        if target == self.cursor {
            return Mutation::Unchanged;
        }
        self.cursor = target;
        self.offset = scroll_offset(
            self.cursor,
            self.offset,
            self.geometry.page_size,
            self.rows.len(),
        );
        Mutation::Changed
    }

    /// Move the cursor down (positive) or up (negative), clamped.
    pub fn move_by(&mut self, delta: isize) -> Mutation {
        let target = if delta.is_negative() {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.saturating_add(delta.unsigned_abs())
        };
        self.move_to(target)
    }

    pub fn page_up(&mut self) -> Mutation {
        self.move_to(self.cursor.saturating_sub(self.geometry.page_size))
    }

    pub fn page_down(&mut self) -> Mutation {
        self.move_to(self.cursor.saturating_add(self.geometry.page_size))
    }

    pub fn first(&mut self) -> Mutation {
        self.move_to(0)
    }

    pub fn last(&mut self) -> Mutation {
        self.move_to(self.rows.len().saturating_sub(1))
    }

    /// Pick a sort key and resort, keeping the cursor on the same row.
    pub fn select_sort(&mut self, key: SortKey) -> Mutation {
        let selected = self.selected_id();
        self.sort = self.sort.select(key);
        self.rows = apply_sort(&self.rows, self.sort);
        self.cursor = selected
            .and_then(|id| self.rows.position_of(&id))
            .unwrap_or(0);
        self.relayout();
        Mutation::Changed
    }

    /// List-navigation driver for keys the keymap leaves unbound.
    pub fn drive_list(&mut self, key: Key) -> Mutation {
        match key {
            Key::Home => self.first(),
            Key::End => self.last(),
            _ => Mutation::Unchanged,
        }
    }

    /// Toggle the mark on the highlighted row.
    ///
    /// Returns the coin URL when the row became marked.
    pub fn toggle_mark(&mut self) -> Option<String> {
        let row = self.rows.get(self.cursor)?;
        if self.marked.remove(&row.id) {
            None
        } else {
            let url = coin_url(row);
            self.marked.insert(row.id.clone());
            Some(url)
        }
    }

    /// Show or hide the market summary panel, re-laying out the table.
    pub fn show_summary(&mut self, visible: bool) -> Mutation {
        if visible == self.summary_visible {
            return Mutation::Unchanged;
        }
        self.summary_visible = visible;
        self.relayout();
        Mutation::Changed
    }

    pub fn toggle_help(&mut self) -> Mutation {
        self.mode = match self.mode {
            InputMode::Normal => InputMode::HelpVisible,
            InputMode::HelpVisible => InputMode::Normal,
        };
        Mutation::Changed
    }
}

// ============================================================================
// INPUT STATE MACHINE
// ============================================================================

impl DashboardState {
    /// Apply one semantic action in the current input mode.
    pub fn dispatch(&mut self, action: Action) -> Transition {
        match self.mode {
            InputMode::Normal => self.dispatch_normal(action),
            InputMode::HelpVisible => self.dispatch_help(action),
        }
    }

    fn dispatch_normal(&mut self, action: Action) -> Transition {
        match action {
            Action::MoveUp => self.move_by(-1).into(),
            Action::MoveDown => self.move_by(1).into(),
            Action::PageUp => self.page_up().into(),
            Action::PageDown => self.page_down().into(),
            Action::First => self.first().into(),
            Action::Last => self.last().into(),
            Action::Sort(key) => self.select_sort(key).into(),
            Action::ToggleHelp => self.toggle_help().into(),
            Action::Refresh => Transition::effect(Effect::Refresh),
            Action::ToggleSummary => {
                let visible = !self.summary_visible;
                Transition {
                    mutation: self.show_summary(visible),
                    effect: Some(Effect::Summary(visible)),
                }
            }
            Action::Quit | Action::Back => Transition::effect(Effect::Quit),
            Action::Select => {
                let had_row = self.selected().is_some();
                let url = self.toggle_mark();
                Transition {
                    mutation: Mutation::from_changed(had_row),
                    effect: url.map(Effect::Open),
                }
            }
        }
    }

    fn dispatch_help(&mut self, action: Action) -> Transition {
        match action {
            Action::ToggleHelp | Action::Back => self.toggle_help().into(),
            Action::Quit => Transition::effect(Effect::Quit),
            _ => Transition::unchanged(),
        }
    }

    /// Handle a key with no binding.
    ///
    /// Forwarded to the list driver in `Normal`, ignored under the help
    /// overlay.
    pub fn handle_unmapped(&mut self, key: Key) -> Mutation {
        match self.mode {
            InputMode::Normal => self.drive_list(key),
            InputMode::HelpVisible => Mutation::Unchanged,
        }
    }
}
