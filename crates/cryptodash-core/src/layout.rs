//! Viewport layout
//!
//! [`layout`] turns terminal dimensions into widget regions. It is a pure
//! function: geometry is always recomputed from scratch, never adjusted
//! incrementally, so the same input always yields the same
//! [`ViewportGeometry`].
//!
//! ```text
//! ┌──────────────────────────────┐  row 0            frame border
//! │ Rank Name ...                │  rows 1..=2       header (2)
//! │──────────────────────────────│
//! │ 1    Bitcoin ...             │  rows 3..         list
//! │ ...                          │
//! │ status line                  │  row rows-2       status bar (1)
//! └──────────────────────────────┘  row rows-1       frame border
//! ```
//!
//! With the market summary shown, [`ViewportGeometry::with_summary`] carves
//! [`SUMMARY_HEIGHT`] rows off the top of the table for the summary tiles.

use serde::Serialize;

use crate::Error;

/// Smallest terminal height that can show the table.
pub const MIN_ROWS: u16 = 10;
/// Smallest terminal width that can show the table.
pub const MIN_COLS: u16 = 40;
/// Column header line plus its separator.
pub const HEADER_HEIGHT: u16 = 2;
/// Status line.
pub const STATUS_BAR_HEIGHT: u16 = 1;
/// Top and bottom frame border.
pub const BORDER_ROWS: u16 = 2;
/// Left and right frame border.
pub const BORDER_COLS: u16 = 2;
/// Preferred width of the help overlay, borders included.
pub const HELP_WIDTH: u16 = 60;
/// Market summary tiles: one text line between two borders.
pub const SUMMARY_HEIGHT: u16 = 3;

/// Terminal size in character cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub rows: u16,
    pub cols: u16,
}

impl Dimensions {
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    pub const fn is_usable(self) -> bool {
        self.rows >= MIN_ROWS && self.cols >= MIN_COLS
    }
}

/// A rectangle of cells, origin at the top-left of the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `width` x `height` region centered inside `self`, shrunk to fit.
    pub fn centered(self, width: u16, height: u16) -> Self {
        let width = width.min(self.width);
        let height = height.min(self.height);
        Self {
            x: self.x + (self.width - width) / 2,
            y: self.y + (self.height - height) / 2,
            width,
            height,
        }
    }
}

/// Whether the terminal can show the table at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutMode {
    Full,
    TooSmall,
}

/// Widget regions derived from one terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewportGeometry {
    pub dims: Dimensions,
    pub mode: LayoutMode,
    pub frame: Region,
    pub header: Region,
    pub list: Region,
    pub status: Region,
    /// Market summary tiles; zero-sized while the summary is hidden.
    pub summary: Region,
    /// Rows visible at once; also the page-up/page-down step.
    pub page_size: usize,
}

impl Default for ViewportGeometry {
    fn default() -> Self {
        layout(Dimensions::default())
    }
}

impl ViewportGeometry {
    /// The layout error this geometry represents, if any.
    pub fn too_small(&self) -> Option<Error> {
        match self.mode {
            LayoutMode::Full => None,
            LayoutMode::TooSmall => Some(Error::TerminalTooSmall {
                rows: self.dims.rows,
                cols: self.dims.cols,
            }),
        }
    }

    /// Region for the help overlay holding `lines` lines of text.
    ///
    /// Centered in the frame and never larger than it; the overlay never
    /// changes the geometry underneath.
    pub fn help_overlay(&self, lines: u16) -> Region {
        self.frame.centered(HELP_WIDTH, lines.saturating_add(BORDER_ROWS))
    }

    /// The same geometry with the market summary above the header.
    ///
    /// The list shrinks by [`SUMMARY_HEIGHT`] rows. When that would leave no
    /// list rows, or the terminal is too small, the geometry is unchanged.
    pub fn with_summary(self) -> Self {
        if self.mode == LayoutMode::TooSmall || self.list.height <= SUMMARY_HEIGHT {
            return self;
        }
        let summary = Region::new(self.header.x, self.header.y, self.header.width, SUMMARY_HEIGHT);
        let list_height = self.list.height - SUMMARY_HEIGHT;
        Self {
            summary,
            header: Region {
                y: self.header.y + SUMMARY_HEIGHT,
                ..self.header
            },
            list: Region {
                y: self.list.y + SUMMARY_HEIGHT,
                height: list_height,
                ..self.list
            },
            page_size: usize::from(list_height),
            ..self
        }
    }
}

/// Compute widget geometry for a terminal of `dims`.
pub fn layout(dims: Dimensions) -> ViewportGeometry {
    let frame = Region::new(0, 0, dims.cols, dims.rows);

    if !dims.is_usable() {
        return ViewportGeometry {
            dims,
            mode: LayoutMode::TooSmall,
            frame,
            header: Region::default(),
            list: Region::default(),
            status: Region::default(),
            summary: Region::default(),
            page_size: 0,
        };
    }

    let inner_width = dims.cols - BORDER_COLS;
    let list_height = dims.rows - HEADER_HEIGHT - STATUS_BAR_HEIGHT - BORDER_ROWS;

    let header = Region::new(1, 1, inner_width, HEADER_HEIGHT);
    let list = Region::new(1, 1 + HEADER_HEIGHT, inner_width, list_height);
    let status = Region::new(
        1,
        dims.rows - 1 - STATUS_BAR_HEIGHT,
        inner_width,
        STATUS_BAR_HEIGHT,
    );

    ViewportGeometry {
        dims,
        mode: LayoutMode::Full,
        frame,
        header,
        list,
        status,
        summary: Region::default(),
        page_size: usize::from(list_height),
    }
}

/// First visible row index that keeps `cursor` on screen.
///
/// Moves the window as little as possible from `offset`, and never leaves
/// blank rows at the bottom when enough rows exist to fill the page.
pub fn scroll_offset(cursor: usize, offset: usize, page_size: usize, row_count: usize) -> usize {
    if page_size == 0 || row_count == 0 {
        return 0;
    }
    let max_offset = row_count.saturating_sub(page_size);
    let offset = if cursor < offset {
        cursor
    } else if cursor >= offset + page_size {
        cursor + 1 - page_size
    } else {
        offset
    };
    offset.min(max_offset)
}
