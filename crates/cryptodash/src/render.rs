//! Frame rendering
//!
//! Turns a core [`View`] into ratatui widgets. Cell text arrives already
//! padded and truncated, so this module only places lines and picks colours.
//! All functions are pure apart from writing into the frame.

use cryptodash_core::{
    view::{Body, Cell, HelpOverlay, RowLine, StatusLine, SummaryView, TableView, Tone},
    Region, Theme, View,
};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TITLE: &str = " Cryptodash ";
const HELP_TITLE: &str = " Keys ";

/// Primary colour for a theme.
pub const fn primary(theme: Theme) -> Color {
    match theme {
        Theme::Green => Color::Green,
        Theme::Cyan => Color::Cyan,
        Theme::Magenta => Color::Magenta,
        Theme::White => Color::White,
        Theme::Red => Color::Red,
        Theme::Yellow => Color::Yellow,
    }
}

const fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Plain => Style::new(),
        Tone::Gain => Style::new().fg(Color::Green),
        Tone::Loss => Style::new().fg(Color::Red),
    }
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Region to ratatui rect, clipped to the drawable area.
///
/// The terminal can shrink between the size query and the draw; clipping keeps
/// every widget inside the buffer.
fn rect(region: Region, area: Rect) -> Rect {
    Rect::new(region.x, region.y, region.width, region.height).intersection(area)
}

/// Draw one complete frame.
pub fn draw(f: &mut Frame, view: &View) {
    let area = f.area();
    let accent = primary(view.theme);

    match &view.body {
        Body::TooSmall(message) => render_too_small(f, message, area),
        Body::Table(table) => {
            let frame_block = Block::default()
                .borders(Borders::ALL)
                .border_style(dim())
                .title(Span::styled(
                    TITLE,
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ));
            f.render_widget(frame_block, rect(view.geometry.frame, area));

            if let Some(summary) = &view.summary {
                render_summary(f, summary, accent, rect(summary.region, area));
            }
            render_header(f, table, accent, rect(view.geometry.header, area));
            render_rows(f, table, accent, rect(view.geometry.list, area));
            render_status(f, &view.status, accent, rect(view.geometry.status, area));
        }
    }

    if let Some(help) = &view.help {
        render_help(f, help, accent, rect(help.region, area));
    }
}

fn render_too_small(f: &mut Frame, message: &str, area: Rect) {
    let paragraph = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Six equal tiles, each a bordered box titled with its label.
fn render_summary(f: &mut Frame, summary: &SummaryView, accent: Color, area: Rect) {
    let count = u32::try_from(summary.tiles.len()).unwrap_or(1).max(1);
    let slots = Layout::horizontal(summary.tiles.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (tile, slot) in summary.tiles.iter().zip(slots.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(Span::styled(tile.label, Style::default().fg(accent)));
        let value = Paragraph::new(tile.value.clone())
            .style(Style::default().fg(Color::White))
            .block(block);
        f.render_widget(value, *slot);
    }
}

fn render_header(f: &mut Frame, table: &TableView, accent: Color, area: Rect) {
    let labels = Line::from(
        table
            .header
            .iter()
            .map(|cell| Span::raw(cell.text.clone()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    let rule = Line::styled("─".repeat(usize::from(area.width)), dim());

    f.render_widget(Paragraph::new(vec![labels, rule]), area);
}

fn render_rows(f: &mut Frame, table: &TableView, accent: Color, area: Rect) {
    let lines: Vec<Line> = table
        .rows
        .iter()
        .map(|row| row_line(row, accent))
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn row_line(row: &RowLine, accent: Color) -> Line<'static> {
    let spans: Vec<Span> = row.cells.iter().map(cell_span).collect();
    let line = Line::from(spans);

    match (row.highlighted, row.marked) {
        (true, _) => line.style(Style::default().fg(Color::Black).bg(accent)),
        (false, true) => line.style(Style::default().add_modifier(Modifier::BOLD)),
        (false, false) => line,
    }
}

fn cell_span(cell: &Cell) -> Span<'static> {
    Span::styled(cell.text.clone(), tone_style(cell.tone))
}

fn render_status(f: &mut Frame, status: &StatusLine, accent: Color, area: Rect) {
    let style = if status.is_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(accent)
    };
    f.render_widget(Paragraph::new(Line::styled(status.text.clone(), style)), area);
}

fn render_help(f: &mut Frame, help: &HelpOverlay, accent: Color, area: Rect) {
    let lines: Vec<Line> = help
        .lines
        .iter()
        .map(|line| Line::raw(line.clone()))
        .collect();
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(HELP_TITLE)
            .border_style(Style::default().fg(accent)),
    );

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
