//! UI rendering for watch mode

use super::state::WatchState;
use mergeline::{MergeState, Source};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};

const DIM_TEXT: Color = Color::Rgb(128, 128, 128);

/// Render the TUI interface
pub fn ui(f: &mut Frame, state: &WatchState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Title
            Constraint::Min(5),     // Main content
            Constraint::Length(10), // Event log
            Constraint::Length(3),  // Instructions
        ])
        .split(f.area());

    render_title(f, chunks[0], state);
    render_main_content(f, chunks[1], state);
    render_events(f, chunks[2], state);
    render_instructions(f, chunks[3]);
}

/// Render the title/status section
fn render_title(f: &mut Frame, area: Rect, state: &WatchState) {
    let session = &state.session;
    let state_style = match session.state() {
        MergeState::Clean => Style::default().fg(Color::Green),
        MergeState::Rebasing => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    };

    let title = Paragraph::new(vec![
        Line::from(vec![Span::styled(
            "Mergeline Watch Mode",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            Span::raw(format!("{} on ", session.workdir().display())),
            Span::styled(session.branch().to_string(), Style::default().fg(Color::Magenta)),
            Span::raw(" - "),
            Span::styled(session.state().to_string(), state_style),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(title, area);
}

/// Render the main content area (progress + conflict details side-by-side)
fn render_main_content(f: &mut Frame, area: Rect, state: &WatchState) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_progress(f, main_chunks[0], state);
    render_conflicts(f, main_chunks[1], state);
}

/// Render one resolution gauge per file
fn render_progress(f: &mut Frame, area: Rect, state: &WatchState) {
    let block = Block::default().borders(Borders::ALL).title(format!(
        "Files [{} unmerged]",
        state.unmerged_files()
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if state.files.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "✓ No unmerged files",
            Style::default().fg(Color::Green),
        )));
        f.render_widget(empty, inner);
        return;
    }

    // Two rows per file: name, then gauge
    let visible = (inner.height as usize / 2).min(state.files.len());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); visible * 2])
        .split(inner);

    for (i, row) in state.files.iter().take(visible).enumerate() {
        let (label_style, note) = if let Some(error) = &row.error {
            (Style::default().fg(Color::Red), format!(" (error: {})", error))
        } else if row.staged {
            (Style::default().fg(Color::Green), " (staged)".to_string())
        } else if row.remaining == 0 {
            (Style::default().fg(Color::Green), " (ready to stage)".to_string())
        } else {
            (Style::default().fg(Color::Yellow), String::new())
        };
        let name = Paragraph::new(Line::from(vec![
            Span::styled(row.path.clone(), label_style),
            Span::styled(note, Style::default().fg(DIM_TEXT)),
        ]));
        f.render_widget(name, rows[i * 2]);

        let value = state.progress.value(&row.path);
        let max = state.progress.max(&row.path);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
            .ratio(state.progress.ratio(&row.path))
            .label(format!("{}/{} resolved", value, max));
        f.render_widget(gauge, rows[i * 2 + 1]);
    }
}

/// Render the conflict details for each file still holding markers
fn render_conflicts(f: &mut Frame, area: Rect, state: &WatchState) {
    let mut lines = Vec::new();

    for report in state.reports.iter().filter(|r| r.has_conflicts()) {
        lines.push(Line::from(Span::styled(
            format!(
                "⚠ {} ({} left)",
                report.path.display(),
                report.count()
            ),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for summary in &report.conflicts {
            let (top, bottom) = match summary.top {
                Source::Theirs => (&summary.theirs, &summary.ours),
                _ => (&summary.ours, &summary.theirs),
            };
            let mut spans = vec![
                Span::raw(format!(
                    "  lines {}-{}: ",
                    summary.start_line, summary.end_line
                )),
                Span::styled(top.clone(), Style::default().fg(Color::Magenta)),
                Span::raw(" ↔ "),
                Span::styled(bottom.clone(), Style::default().fg(Color::Magenta)),
            ];
            if let Some(base) = &summary.base {
                spans.push(Span::styled(
                    format!(" (base: {})", base),
                    Style::default().fg(DIM_TEXT),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "✓ No conflict markers left",
            Style::default().fg(Color::Green),
        )));
    }

    if state.session.is_rebase() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Rebasing: the top side is the commit",
            Style::default().fg(DIM_TEXT),
        )));
        lines.push(Line::from(Span::styled(
            "being replayed (theirs)",
            Style::default().fg(DIM_TEXT),
        )));
    }

    let conflicts = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Conflicts"));
    f.render_widget(conflicts, area);
}

/// Render the scrollable event log
fn render_events(f: &mut Frame, area: Rect, state: &WatchState) {
    let available_height = area.height.saturating_sub(2) as usize; // -2 for borders

    let total_events = state.events.len();

    let start_idx = match state.events_scroll {
        // Stick to bottom - show the last available_height events
        None => total_events.saturating_sub(available_height),
        Some(scroll) => {
            let max_scroll = total_events.saturating_sub(available_height);
            scroll.min(max_scroll)
        }
    };
    let end_idx = (start_idx + available_height).min(total_events);

    let visible_events: Vec<ListItem> = state
        .events
        .iter()
        .skip(start_idx)
        .take(end_idx - start_idx)
        .map(|e| ListItem::new(e.as_str()))
        .collect();

    // Create title with scroll indicator
    let title = if total_events > available_height {
        format!("Events [{}-{}/{}]", start_idx + 1, end_idx, total_events)
    } else if total_events == 0 {
        "Events [empty]".to_string()
    } else {
        format!("Events [{}]", total_events)
    };

    let events_list =
        List::new(visible_events).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(events_list, area);
}

/// Render the keyboard instructions
fn render_instructions(f: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let instructions = Paragraph::new(vec![Line::from(vec![
        Span::styled("q", key_style),
        Span::raw(" quit  "),
        Span::styled("r", key_style),
        Span::raw(" rescan  "),
        Span::styled("↑↓", key_style),
        Span::raw(" scroll events"),
    ])])
    .block(Block::default().borders(Borders::ALL).title("Keys"));
    f.render_widget(instructions, area);
}
