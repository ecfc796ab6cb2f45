//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use crate::fmt::truncate;

use super::state::{AppState, InputMode, PopupState};
use super::style::Styles;

/// Widest a single column may grow.
const MAX_COLUMN_WIDTH: u16 = 40;

const HELP_LINES: &[&str] = &[
    "↑/↓ j/k      select row",
    "←/→ h/l      previous / next page",
    "Home/End     first / last page",
    "Enter        record detail",
    "/            edit filter (Esc clears)",
    "f            cycle filter columns",
    "s            cycle sort column",
    "r            reverse sort direction",
    "1-9          toggle column visibility",
    "0            reset column visibility",
    "R            reload records",
    "q            quit",
];

/// Main render function.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Title + filter/sort status
        Constraint::Min(3),    // Table
        Constraint::Length(1), // Pager + status message
    ])
    .split(area);

    render_header(frame, chunks[0], state);
    if state.loading {
        render_loading(frame, chunks[1], state);
    } else {
        render_table(frame, chunks[1], state);
    }
    render_footer(frame, chunks[2], state);

    match &state.popup {
        PopupState::None => {}
        PopupState::Help => render_help(frame, area),
        PopupState::Detail { scroll } => render_detail(frame, area, state, *scroll),
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let sort = match state.engine.sort() {
        Some(s) => format!(
            "{} {}",
            s.column,
            if s.direction.is_ascending() { "▲" } else { "▼" }
        ),
        None => "none".to_string(),
    };
    let filter = if state.input_mode == InputMode::Filter {
        format!("/{}_", state.filter_input)
    } else if state.engine.filter_text().is_empty() {
        "-".to_string()
    } else {
        state.engine.filter_text().to_string()
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", state.title), Styles::header()),
        Span::raw(" filter["),
        Span::raw(state.filter_scope_label()),
        Span::raw("]: "),
        Span::styled(filter, Styles::accent()),
        Span::raw("  sort: "),
        Span::styled(sort, Styles::accent()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_loading(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!(" {} ", state.title))
        .borders(Borders::ALL)
        .style(Styles::default());
    frame.render_widget(Paragraph::new("Loading…").block(block), area);
}

fn render_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let vm = state.engine.view().to_view_model(state.title.clone());

    let headers: Vec<Span> = vm
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let indicator = match vm.sort_column {
                Some(col) if col == i => {
                    if vm.sort_ascending {
                        "▲"
                    } else {
                        "▼"
                    }
                }
                _ => "",
            };
            Span::styled(format!("{}{}", h, indicator), Styles::table_header())
        })
        .collect();
    let header = Row::new(headers).height(1);

    let widths = vm.column_widths(MAX_COLUMN_WIDTH);
    let rows: Vec<Row> = vm
        .rows
        .iter()
        .map(|vr| {
            let cells = vr.cells.iter().zip(&widths).map(|(c, &w)| {
                let text = truncate(&c.text, w as usize);
                match c.style {
                    Some(s) => Span::styled(text, Styles::from_class(s)),
                    None => Span::raw(text),
                }
            });
            Row::new(cells).style(Styles::from_class(vr.style)).height(1)
        })
        .collect();

    let constraints: Vec<Constraint> = widths.iter().map(|&w| Constraint::Length(w)).collect();

    let title = if vm.rows.is_empty() {
        format!(" {} (no matching records) ", vm.title)
    } else {
        format!(" {} ", vm.title)
    };
    let table = Table::new(rows, constraints)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .style(Styles::default()),
        )
        .column_spacing(1);

    frame.render_widget(Clear, area);
    frame.render_widget(table, area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let view = state.engine.view();
    let pager = crate::fmt::format_pager(view.current_page, view.total_pages, view.total_filtered);
    let mut spans = vec![Span::raw(format!(" {pager}")), Span::raw("   ? help")];
    if let Some(msg) = &state.status_message {
        let style = if msg.starts_with("Refresh failed") {
            Styles::error()
        } else {
            Styles::dim()
        };
        spans.push(Span::styled(format!("   {msg}"), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 60, area);
    let lines: Vec<Line> = HELP_LINES.iter().map(|l| Line::from(*l)).collect();
    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .style(Styles::default());
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState, scroll: usize) {
    let popup = centered_rect(70, 70, area);
    let title = match state.engine.selected() {
        Some(id) => format!(" {} ", id),
        None => " Detail ".to_string(),
    };
    let lines: Vec<Line> = state.detail_lines().into_iter().map(Line::from).collect();
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Styles::default());
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll.min(u16::MAX as usize) as u16, 0)),
        popup,
    );
}

/// Rect of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}
