//! Render snapshots
//!
//! A [`View`] is everything a [`crate::Screen`] needs to draw one frame, built
//! from the dashboard state in one pass. Cells arrive already formatted,
//! padded and truncated to the list width; a screen only places them and picks
//! colours. Help text is generated from the live [`KeyMap`], so it always
//! matches the bindings in force.

use chrono::Local;
use itertools::Itertools;

use crate::{
    format,
    keymap::{Action, KeyMap},
    layout::{Region, ViewportGeometry, MIN_COLS, MIN_ROWS},
    market::MarketSummary,
    row::Row,
    sort::{SortKey, SortSpec},
    state::{DashboardState, InputMode},
    theme::Theme,
};

/// Shown on the status line until the first fetch lands.
pub const HINT: &str = "Use <up/down> arrows to navigate. <q> to exit. <F> keys to sort. \
                        <Enter> to visit coin on CoinMarketCap.";

const GUTTER_MARKED: &str = "* ";
const GUTTER_PLAIN: &str = "  ";
const SEPARATOR: &str = " ";

const NAVIGATION_HELP: &[(Action, &str)] = &[
    (Action::MoveUp, "move up"),
    (Action::MoveDown, "move down"),
    (Action::PageUp, "page up"),
    (Action::PageDown, "page down"),
    (Action::First, "first row"),
    (Action::Last, "last row"),
    (Action::Select, "mark row and open its page"),
];

const OTHER_HELP: &[(Action, &str)] = &[
    (Action::Refresh, "refresh now"),
    (Action::ToggleSummary, "toggle market summary"),
    (Action::ToggleHelp, "toggle this help"),
    (Action::Quit, "quit"),
    (Action::Back, "close help, or quit"),
];

/// Placeholder for summary figures not loaded yet.
pub const NOT_LOADED: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// One table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: SortKey,
    pub label: &'static str,
    pub width: usize,
    pub align: Align,
}

const fn column(key: SortKey, label: &'static str, width: usize, align: Align) -> Column {
    Column {
        key,
        label,
        width,
        align,
    }
}

/// Table columns in display order.
pub const COLUMNS: [Column; 12] = [
    column(SortKey::Rank, "Rank", 6, Align::Left),
    column(SortKey::Name, "Name", 22, Align::Left),
    column(SortKey::Symbol, "Symbol", 10, Align::Left),
    column(SortKey::Price, "Price", 12, Align::Right),
    column(SortKey::MarketCap, "Market Cap", 17, Align::Right),
    column(SortKey::Volume24h, "24H Volume", 15, Align::Right),
    column(SortKey::Change1h, "1H%", 9, Align::Right),
    column(SortKey::Change24h, "24H%", 9, Align::Right),
    column(SortKey::Change7d, "7D%", 9, Align::Right),
    column(SortKey::TotalSupply, "Total Supply", 20, Align::Right),
    column(SortKey::AvailableSupply, "Available Supply", 18, Align::Right),
    column(SortKey::LastUpdated, "Last Updated", 18, Align::Right),
];

/// Colour hint for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Gain,
    Loss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

/// One visible table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLine {
    pub cells: Vec<Cell>,
    pub highlighted: bool,
    pub marked: bool,
}

impl RowLine {
    pub fn text(&self) -> String {
        self.cells.iter().map(|cell| cell.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub header: Vec<Cell>,
    pub rows: Vec<RowLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Single centered message instead of the table.
    TooSmall(String),
    Table(TableView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpOverlay {
    pub region: Region,
    pub lines: Vec<String>,
}

/// One labelled figure of the market summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub label: &'static str,
    pub value: String,
}

/// Market summary tiles, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub region: Region,
    pub tiles: Vec<Tile>,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub theme: Theme,
    pub geometry: ViewportGeometry,
    pub body: Body,
    pub status: StatusLine,
    pub summary: Option<SummaryView>,
    pub help: Option<HelpOverlay>,
}

impl View {
    /// Snapshot `state` for drawing, with help text for `keymap`.
    pub fn build(state: &DashboardState, theme: Theme, keymap: &KeyMap) -> Self {
        let geometry = *state.geometry();

        let body = match geometry.too_small() {
            Some(_) => Body::TooSmall(format!(
                "Terminal too small ({}x{}). Resize to at least {MIN_COLS}x{MIN_ROWS}.",
                geometry.dims.cols, geometry.dims.rows
            )),
            None => Body::Table(table(state, &geometry)),
        };

        let summary = (state.summary_visible() && geometry.summary.height > 0).then(|| {
            SummaryView {
                region: geometry.summary,
                tiles: summary_tiles(state.market()),
            }
        });

        let help = (state.mode() == InputMode::HelpVisible).then(|| {
            let lines = help_lines(keymap);
            HelpOverlay {
                region: geometry.help_overlay(u16::try_from(lines.len()).unwrap_or(u16::MAX)),
                lines,
            }
        });

        Self {
            theme,
            geometry,
            body,
            status: status_line(state),
            summary,
            help,
        }
    }
}

/// Help overlay text for the bindings in `keymap`.
///
/// Actions with no key bound are left out.
pub fn help_lines(keymap: &KeyMap) -> Vec<String> {
    let keys = |action: Action| {
        let keys = keymap.keys_for(action);
        (!keys.is_empty()).then(|| keys.iter().join("/"))
    };
    let described = |table: &[(Action, &str)]| -> Vec<String> {
        table
            .iter()
            .filter_map(|&(action, text)| keys(action).map(|k| format!("  {k:<16}{text}")))
            .collect()
    };

    let sort_entries: Vec<String> = COLUMNS
        .iter()
        .filter_map(|col| {
            keys(Action::Sort(col.key)).map(|k| format!("{k:<7}{:<19}", col.label))
        })
        .collect();
    let sorting = sort_entries
        .chunks(2)
        .map(|pair| format!("  {}", pair.concat().trim_end()));

    let mut lines = vec!["Navigation".to_string()];
    lines.extend(described(NAVIGATION_HELP));
    lines.push(format!("  {:<16}first/last row", "Home/End"));
    lines.push("Sorting (same key again reverses)".to_string());
    lines.extend(sorting);
    lines.push("Other".to_string());
    lines.extend(described(OTHER_HELP));
    lines
}

fn summary_tiles(market: Option<&MarketSummary>) -> Vec<Tile> {
    let value = |render: fn(&MarketSummary) -> String| {
        market.map_or_else(|| NOT_LOADED.to_string(), render)
    };
    vec![
        Tile {
            label: "Total Market Cap (USD)",
            value: value(|m| format!("${}", format::commaf(m.total_market_cap))),
        },
        Tile {
            label: "Total Volume (24H)",
            value: value(|m| format!("${}", format::commaf(m.total_volume_24h))),
        },
        Tile {
            label: "% Bitcoin Dominance",
            value: value(|m| format::percent(m.bitcoin_dominance)),
        },
        Tile {
            label: "Active Currencies",
            value: value(|m| format::commas(m.active_currencies)),
        },
        Tile {
            label: "Active Assets",
            value: value(|m| format::commas(m.active_assets)),
        },
        Tile {
            label: "Active Markets",
            value: value(|m| format::commas(m.active_markets)),
        },
    ]
}

fn table(state: &DashboardState, geometry: &ViewportGeometry) -> TableView {
    let width = usize::from(geometry.list.width);

    let header = header_cells(state.sort());
    let rows = state
        .rows()
        .iter()
        .enumerate()
        .skip(state.offset())
        .take(geometry.page_size)
        .map(|(index, row)| {
            let marked = state.is_marked(row);
            let gutter = if marked { GUTTER_MARKED } else { GUTTER_PLAIN };
            RowLine {
                cells: fit_cells(gutter, row_cells(row), width),
                highlighted: index == state.cursor(),
                marked,
            }
        })
        .collect();

    TableView {
        header: fit_cells(GUTTER_PLAIN, header, width),
        rows,
    }
}

/// Column labels; the active sort column carries a direction marker that is
/// never cut, the label gives way first.
fn header_cells(sort: SortSpec) -> Vec<Cell> {
    COLUMNS
        .iter()
        .map(|col| {
            let label = if col.key == sort.key {
                let marker = if sort.descending { '▼' } else { '▲' };
                let room = col.width.saturating_sub(2);
                format!("{} {marker}", format::fit(col.label, room))
            } else {
                col.label.to_string()
            };
            Cell {
                text: pad(&label, col),
                tone: Tone::Plain,
            }
        })
        .collect()
}

fn row_cells(row: &Row) -> Vec<Cell> {
    COLUMNS
        .iter()
        .map(|col| {
            let (text, tone) = cell_value(row, col.key);
            Cell {
                text: pad(&text, col),
                tone,
            }
        })
        .collect()
}

fn cell_value(row: &Row, key: SortKey) -> (String, Tone) {
    match key {
        SortKey::Rank => (row.rank.to_string(), Tone::Plain),
        SortKey::Name => (row.name.clone(), Tone::Plain),
        SortKey::Symbol => (row.symbol.clone(), Tone::Plain),
        SortKey::Price => (format::commaf(row.price), Tone::Plain),
        SortKey::MarketCap => (format::commaf(row.market_cap), Tone::Plain),
        SortKey::Volume24h => (format::commaf(row.volume_24h), Tone::Plain),
        SortKey::Change1h => change(row.change_1h),
        SortKey::Change24h => change(row.change_24h),
        SortKey::Change7d => change(row.change_7d),
        SortKey::TotalSupply => (format::commaf(row.total_supply), Tone::Plain),
        SortKey::AvailableSupply => (format::commaf(row.available_supply), Tone::Plain),
        SortKey::LastUpdated => (format::timestamp(row.last_updated), Tone::Plain),
    }
}

fn change(value: f64) -> (String, Tone) {
    let tone = if value < 0.0 { Tone::Loss } else { Tone::Gain };
    (format::percent(value), tone)
}

fn pad(text: &str, col: &Column) -> String {
    match col.align {
        Align::Left => format::pad_right(text, col.width),
        Align::Right => format::pad_left(text, col.width),
    }
}

/// Lay cells out left to right behind `gutter`, cutting at `width`.
fn fit_cells(gutter: &str, cells: Vec<Cell>, width: usize) -> Vec<Cell> {
    let mut remaining = width;
    let mut fitted = Vec::with_capacity(cells.len() + 1);

    let gutter = format::fit(gutter, remaining);
    remaining -= format::width(&gutter);
    fitted.push(Cell {
        text: gutter,
        tone: Tone::Plain,
    });

    for (i, cell) in cells.into_iter().enumerate() {
        if remaining == 0 {
            break;
        }
        let text = if i == 0 {
            cell.text
        } else {
            format!("{SEPARATOR}{}", cell.text)
        };
        let text = format::fit(&text, remaining);
        remaining -= format::width(&text);
        fitted.push(Cell {
            text,
            tone: cell.tone,
        });
    }
    fitted
}

fn status_line(state: &DashboardState) -> StatusLine {
    if let Some(error) = state.error() {
        return StatusLine {
            text: error.to_string(),
            is_error: true,
        };
    }

    let text = state.rows().fetched_at().map_or_else(
        || HINT.to_string(),
        |at| {
            let sort = state.sort();
            format!(
                "Updated {} · {} coins · sort: {} {}",
                at.with_timezone(&Local).format("%H:%M:%S"),
                state.rows().len(),
                sort.key,
                if sort.descending { "desc" } else { "asc" },
            )
        },
    );
    StatusLine {
        text,
        is_error: false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::{keymap::Key, layout::Dimensions, row::RowSet, Error};

    fn keys() -> KeyMap {
        KeyMap::standard().unwrap_or_else(|_| unreachable!("standard keymap is valid"))
    }

    fn header_text(view: &View) -> String {
        table_of(view).header.iter().map(|c| c.text.as_str()).collect()
    }

    fn row(rank: u32, name: &str, change_24h: f64) -> Row {
        Row {
            id: name.to_lowercase(),
            rank,
            name: name.to_string(),
            symbol: name[..3].to_uppercase(),
            price: 1234.5,
            market_cap: 0.0,
            volume_24h: 0.0,
            change_1h: 0.0,
            change_24h,
            change_7d: 0.0,
            total_supply: 0.0,
            available_supply: 0.0,
            last_updated: 0,
        }
    }

    fn loaded(dims: Dimensions) -> DashboardState {
        let mut state = DashboardState::new(dims);
        let rows = RowSet::new(
            vec![row(1, "Alpha", -2.0), row(2, "Beta", 3.0)],
            1,
            Utc::now(),
        );
        state.apply_refresh(Ok(rows));
        state
    }

    fn table_of(view: &View) -> &TableView {
        match &view.body {
            Body::Table(table) => table,
            Body::TooSmall(_) => unreachable!("expected a table"),
        }
    }

    #[test]
    fn test_column_widths_fit_wide_terminal() {
        let total: usize = COLUMNS.iter().map(|c| c.width + SEPARATOR.len()).sum();
        assert!(total < 200);
        assert_eq!(COLUMNS.len(), 12);
    }

    #[test]
    fn test_too_small_body() {
        let state = DashboardState::new(Dimensions::new(5, 20));
        let view = View::build(&state, Theme::Green, &keys());
        assert!(matches!(view.body, Body::TooSmall(ref msg) if msg.contains("20x5")));
    }

    #[test]
    fn test_rows_are_truncated_to_list_width() {
        let state = loaded(Dimensions::new(24, 80));
        let view = View::build(&state, Theme::Green, &keys());
        let table = table_of(&view);
        assert_eq!(table.rows.len(), 2);
        for line in &table.rows {
            assert!(line.text().chars().count() <= 78);
        }
    }

    #[test]
    fn test_highlight_and_change_tones() {
        let state = loaded(Dimensions::new(40, 200));
        let view = View::build(&state, Theme::Green, &keys());
        let table = table_of(&view);
        assert!(table.rows[0].highlighted);
        assert!(!table.rows[1].highlighted);
        assert!(table.rows[0].cells.iter().any(|c| c.tone == Tone::Loss));
        assert!(table.rows[1].cells.iter().any(|c| c.tone == Tone::Gain));
        assert!(table.rows[0].text().contains("1,234.5"));
    }

    #[test]
    fn test_header_marks_active_sort() {
        let mut state = loaded(Dimensions::new(40, 200));
        let view = View::build(&state, Theme::Green, &keys());
        assert!(header_text(&view).contains("Rank ▲"));

        state.select_sort(SortKey::Price);
        let header = header_text(&View::build(&state, Theme::Green, &keys()));
        assert!(header.contains("Price ▼"));
        assert!(!header.contains("Rank ▲"));
    }

    #[test]
    fn test_every_sort_column_shows_its_marker() {
        let mut state = loaded(Dimensions::new(40, 200));
        for col in &COLUMNS {
            if state.sort().key != col.key {
                state.select_sort(col.key);
            }
            for _ in 0..2 {
                let marker = if state.sort().descending { '▼' } else { '▲' };
                let header = header_text(&View::build(&state, Theme::Green, &keys()));
                assert!(
                    header.contains(&format!("{} {marker}", col.label)),
                    "{} {marker} missing from {header:?}",
                    col.label
                );
                assert_eq!(header.matches(['▲', '▼']).count(), 1);
                state.select_sort(col.key);
            }
        }
        assert_eq!(SortKey::iter().count(), COLUMNS.len());
    }

    #[test]
    fn test_marker_survives_narrow_column() {
        let narrow = Column {
            key: SortKey::AvailableSupply,
            label: "Available Supply",
            width: 8,
            align: Align::Right,
        };
        let label = format!("{} ▼", format::fit(narrow.label, narrow.width - 2));
        assert_eq!(label, "Availa ▼");
        assert_eq!(format::width(&pad(&label, &narrow)), 8);
    }

    #[test]
    fn test_wide_names_keep_columns_aligned() {
        let mut state = DashboardState::new(Dimensions::new(40, 200));
        let mut wide = row(1, "Alpha", 0.0);
        wide.name = "比特币比特币比特币比特币比特币".to_string();
        state.apply_refresh(Ok(RowSet::new(vec![wide, row(2, "Beta", 0.0)], 1, Utc::now())));
        let view = View::build(&state, Theme::Green, &keys());
        let table = table_of(&view);
        let widths: Vec<usize> = table
            .rows
            .iter()
            .map(|line| format::width(&line.text()))
            .collect();
        assert_eq!(widths[0], widths[1]);
        assert_eq!(format::width(&table.rows[0].cells[2].text), 1 + 22);
    }

    #[test]
    fn test_marked_row_gutter() {
        let mut state = loaded(Dimensions::new(40, 200));
        state.toggle_mark();
        let view = View::build(&state, Theme::Green, &keys());
        let table = table_of(&view);
        assert!(table.rows[0].marked);
        assert!(table.rows[0].text().starts_with(GUTTER_MARKED));
        assert!(table.rows[1].text().starts_with(GUTTER_PLAIN));
    }

    #[test]
    fn test_status_priority() {
        let empty = DashboardState::new(Dimensions::new(40, 120));
        assert_eq!(View::build(&empty, Theme::Green, &keys()).status.text, HINT);

        let mut state = loaded(Dimensions::new(40, 120));
        let status = View::build(&state, Theme::Green, &keys()).status;
        assert!(!status.is_error);
        assert!(status.text.contains("2 coins"));
        assert!(status.text.contains("sort: rank asc"));

        state.apply_refresh(Err(Error::transport("offline")));
        let status = View::build(&state, Theme::Green, &keys()).status;
        assert!(status.is_error);
        assert!(status.text.contains("offline"));
    }

    #[test]
    fn test_help_overlay_only_when_visible() {
        let mut state = loaded(Dimensions::new(40, 120));
        assert!(View::build(&state, Theme::Green, &keys()).help.is_none());
        state.toggle_help();
        let view = View::build(&state, Theme::Green, &keys());
        let help = view.help.unwrap_or_else(|| unreachable!());
        assert_eq!(help.lines, help_lines(&keys()));
        assert_eq!(usize::from(help.region.height), help.lines.len() + 2);
        assert_eq!(view.geometry, *state.geometry());
    }

    #[test]
    fn test_help_lines_fit_overlay() {
        let inner = usize::from(crate::layout::HELP_WIDTH) - 2;
        let lines = help_lines(&keys());
        assert!(lines.iter().all(|line| format::width(line) <= inner), "{lines:#?}");
    }

    #[test]
    fn test_help_lines_follow_bindings() {
        let lines = help_lines(&keys());
        assert!(lines.iter().any(|l| l.starts_with("  k/Up ") && l.ends_with("move up")));
        assert!(lines.iter().any(|l| l.contains("q/Ctrl-C") && l.ends_with("quit")));
        assert!(lines.iter().any(|l| l.contains("r/F1   Rank")));
        assert!(lines.iter().any(|l| l.contains("M") && l.ends_with("toggle market summary")));

        let custom = KeyMap::new(&[
            (Key::Char('x'), Action::Quit),
            (Key::Char('w'), Action::MoveUp),
            (Key::F(5), Action::Sort(SortKey::MarketCap)),
        ])
        .unwrap_or_else(|_| unreachable!());
        let lines = help_lines(&custom);
        assert!(lines.iter().any(|l| l.starts_with("  x ") && l.ends_with("quit")));
        assert!(lines.iter().any(|l| l.starts_with("  w ") && l.ends_with("move up")));
        assert!(lines.iter().any(|l| l.contains("F5     Market Cap")));
        assert!(!lines.iter().any(|l| l.contains("refresh now")));
        assert!(!lines.iter().any(|l| l.contains("Ctrl-C")));
    }

    #[test]
    fn test_summary_tiles() {
        let mut state = loaded(Dimensions::new(40, 120));
        assert!(View::build(&state, Theme::Green, &keys()).summary.is_none());

        state.show_summary(true);
        let pending = View::build(&state, Theme::Green, &keys());
        let summary = pending.summary.unwrap_or_else(|| unreachable!());
        assert_eq!(summary.region, state.geometry().summary);
        assert_eq!(summary.tiles.len(), 6);
        assert!(summary.tiles.iter().all(|tile| tile.value == NOT_LOADED));

        state.apply_market(Ok(MarketSummary {
            total_market_cap: 213_823_016_580.0,
            total_volume_24h: 11_017_294_706.5,
            bitcoin_dominance: 52.614,
            active_currencies: 876,
            active_assets: 651,
            active_markets: 12_349,
            fetched_at: Utc::now(),
        }));
        let view = View::build(&state, Theme::Green, &keys());
        let values: Vec<_> = view
            .summary
            .unwrap_or_else(|| unreachable!())
            .tiles
            .into_iter()
            .map(|tile| tile.value)
            .collect();
        assert_eq!(
            values,
            [
                "$213,823,016,580",
                "$11,017,294,706.5",
                "52.61%",
                "876",
                "651",
                "12,349"
            ]
        );
    }
}
