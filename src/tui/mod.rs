//! TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::{calculate_progress, format_file_size, format_taken_date};
pub use input::{handle_confirm_input, handle_key_event, handle_picker_input, KeyAction};

use crate::app::App;
use crate::async_thumbnail::{SyncThumbnailManager, ThumbnailState};
use crate::domain::PhotoRef;
use crate::thumbnail::TargetSize;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main photo browsing view
    Browsing,
    /// Help overlay visible
    Help,
    /// End-of-pass summary
    Summary,
    /// Confirmation dialog before deleting the queued photos
    ConfirmCommit,
    /// Year filter selection
    YearPicker,
    /// Welcome screen shown on first launch
    Welcome,
}

/// Draws the whole screen for the current view
pub fn render(frame: &mut Frame, app: &App, thumbnails: &mut SyncThumbnailManager) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header with progress
            Constraint::Min(0),    // Photo
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app, thumbnails);
    render_status(frame, chunks[2], app);
    render_footer(frame, chunks[3], app.session().pending_deletion_count());

    match app.view() {
        ViewState::Help => render_help_overlay(frame),
        ViewState::Summary => render_summary(frame, app),
        ViewState::ConfirmCommit => render_confirm_commit_overlay(frame, app),
        ViewState::YearPicker => render_year_picker(frame, app),
        ViewState::Welcome => render_welcome_overlay(frame),
        ViewState::Browsing => {}
    }
}

/// Renders the end-of-pass summary
pub fn render_summary(frame: &mut Frame, app: &App) {
    let summary_area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, summary_area);

    let title = if app.session().is_exhausted() {
        " All Photos Reviewed "
    } else {
        " Session Summary "
    };
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(summary_area);
    frame.render_widget(block, summary_area);

    let stats = app.session().statistics();
    let deleted_label = if app.is_dry_run() {
        "Would delete: "
    } else {
        "Deleted:      "
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.filter().to_string(),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("   Photos:       "),
            Span::styled(
                stats.total.to_string(),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   ✓ ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Kept:       "),
            Span::styled(
                stats.kept.to_string(),
                Style::default()
                    .fg(ACCENT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("   ✗ ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("Queued:     "),
            Span::styled(
                stats.queued.to_string(),
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("   ○ ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Remaining:  "),
            Span::styled(
                stats.remaining.to_string(),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
        Line::from(vec![
            Span::raw("   "),
            Span::raw(deleted_label),
            Span::styled(
                app.deleted_total().to_string(),
                Style::default().fg(TEXT_PRIMARY),
            ),
        ]),
        Line::from(""),
    ];

    if stats.queued > 0 {
        lines.push(Line::from(vec![
            Span::styled("c", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw(format!(" Commit {} deletions", stats.queued)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("y", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::raw(" Another year   "),
        Span::styled("q", Style::default().fg(TEXT_SECONDARY)),
        Span::raw(" Quit"),
    ]));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ← ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("or "),
            Span::styled("h/d", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("   Queue for deletion"),
        ]),
        Line::from(vec![
            Span::styled("  → ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("or "),
            Span::styled("l/k", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("   Keep photo"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw("          Choose a year"),
        ]),
        Line::from(vec![
            Span::styled("  c", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("          Commit deletions"),
        ]),
        Line::from(vec![
            Span::styled("  o", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("          Open in viewer"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("or "),
            Span::styled("Esc", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("     Quit"),
        ]),
        Line::from(vec![
            Span::styled("  ?", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("          Toggle help"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Nothing is deleted until you commit.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let area = centered_rect(85, 85, frame.area());
    frame.render_widget(Clear, area);

    let heading = Style::default()
        .fg(ACCENT_HIGHLIGHT)
        .add_modifier(Modifier::BOLD);

    let welcome_lines = vec![
        Line::from(""),
        Line::from(Span::styled("Welcome to SwipeClean!", heading)),
        Line::from(""),
        Line::from("Go through your photos one at a time and decide what stays."),
        Line::from("Deletions are only queued while you swipe; commit them when you are done."),
        Line::from(""),
        Line::from(Span::styled("Quick Start:", heading)),
        Line::from(""),
        Line::from(vec![
            Span::styled("  1. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Press "),
            Span::styled("y", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw(" to pick a year, or review everything"),
        ]),
        Line::from(vec![
            Span::styled("  2. ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(
                "←",
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" queues a photo for deletion, "),
            Span::styled(
                "→",
                Style::default()
                    .fg(ACCENT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" keeps it"),
        ]),
        Line::from(vec![
            Span::styled("  3. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Press "),
            Span::styled("c", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw(" to delete everything you queued in one go"),
        ]),
        Line::from(""),
        Line::from(Span::styled("Safety Features:", heading)),
        Line::from(""),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Photos go to your system "),
            Span::styled("trash", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" (not permanently deleted)"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Quitting with queued photos deletes nothing"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Run with "),
            Span::styled("--dry-run", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to try it without touching any file"),
        ]),
        Line::from(""),
        Line::from(Span::styled("Press any key to start...", heading)),
    ];

    let welcome_text = Paragraph::new(welcome_lines)
        .block(
            Block::default()
                .title(Span::styled(" SwipeClean ", heading))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome_text, area);
}

/// Renders the confirmation dialog before a commit
pub fn render_confirm_commit_overlay(frame: &mut Frame, app: &App) {
    let confirm_area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, confirm_area);

    let block = Block::default()
        .title(" ⚠ Confirm Delete ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_PRIMARY))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(confirm_area);
    frame.render_widget(block, confirm_area);

    let queued = app.session().pending_deletions();
    let total_size: u64 = queued.iter().map(|p| p.size).sum();

    let confirm_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Delete {} queued photos?", queued.len()),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Frees: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(format_file_size(total_size), Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "The photos will be moved to the trash.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("es  "),
            Span::styled("[Enter]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("     "),
            Span::styled("[N]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("o  "),
            Span::styled("[Esc]", Style::default().fg(ACCENT_PRIMARY)),
        ]),
    ];

    let paragraph = Paragraph::new(confirm_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the year picker: "All" plus every year with its photo count
pub fn render_year_picker(frame: &mut Frame, app: &App) {
    let options = app.year_options();
    let area = centered_rect(30, 60, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = options
        .iter()
        .map(|(filter, count)| {
            let marker = if *filter == app.filter() { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(ACCENT_SECONDARY)),
                Span::styled(filter.to_string(), Style::default().fg(TEXT_PRIMARY)),
                Span::styled(format!("  ({})", count), Style::default().fg(TEXT_SECONDARY)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Year ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .highlight_style(
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

    let mut state = ListState::default().with_selected(Some(app.picker_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Header with position, filter, queue size and a progress bar
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let session = app.session();
    let pending = session.pending_deletion_count();

    let position = match app.current_photo() {
        Some(_) => format!(" Photo {}/{} ", session.cursor() + 1, session.len()),
        None => " SwipeClean ".to_string(),
    };

    let mut title_spans = vec![
        Span::styled(
            position,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.filter()),
            Style::default().fg(TEXT_SECONDARY),
        ),
        Span::raw(" "),
        Span::styled(
            format!("Queued: {}", pending),
            if pending > 0 {
                Style::default().fg(ACCENT_PRIMARY)
            } else {
                Style::default().fg(TEXT_SECONDARY)
            },
        ),
    ];
    if app.is_dry_run() {
        title_spans.push(Span::styled(
            "  [DRY RUN]",
            Style::default().fg(ACCENT_HIGHLIGHT),
        ));
    }

    let info_line = match app.current_photo() {
        Some(photo) => Line::from(vec![
            Span::styled(
                photo.name.clone(),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!(
                    "({} • {})",
                    format_file_size(photo.size),
                    format_taken_date(photo.created)
                ),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
        None => Line::from(Span::styled(
            "No photo to review",
            Style::default().fg(TEXT_SECONDARY),
        )),
    };

    let header = Paragraph::new(vec![Line::from(title_spans), info_line])
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let processed = session.cursor();
    let total = session.len();
    let progress = calculate_progress(processed, total);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(progress)
        .label(format!(
            "{}% ({}/{})",
            (progress * 100.0) as u16,
            processed,
            total
        ));

    frame.render_widget(gauge, chunks[1]);
}

/// Photo area: the thumbnail once decoded, otherwise a placeholder
fn render_content(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    thumbnails: &mut SyncThumbnailManager,
) {
    let Some(photo) = app.current_photo() else {
        frame.render_widget(render_empty_state_widget(app), area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(format!(" {} ", photo.name));
    let inner = block.inner(area);

    if inner.width == 0 || inner.height == 0 {
        frame.render_widget(block, area);
        return;
    }

    let target = TargetSize {
        columns: inner.width,
        rows: inner.height,
    };

    let paragraph = match thumbnails.request(photo, target) {
        ThumbnailState::Ready(thumbnail) => Paragraph::new(thumbnail.lines.clone())
            .block(block.title_bottom(format!(
                " {}×{} ",
                thumbnail.original_width, thumbnail.original_height
            )))
            .alignment(Alignment::Center),
        ThumbnailState::Loading => Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Loading thumbnail...",
                Style::default()
                    .fg(TEXT_SECONDARY)
                    .add_modifier(Modifier::ITALIC),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center),
        ThumbnailState::Unavailable => Paragraph::new(placeholder_lines(
            photo,
            Span::styled(
                "No preview available for this photo",
                Style::default().fg(TEXT_SECONDARY),
            ),
        ))
        .block(block)
        .alignment(Alignment::Center),
        ThumbnailState::Error(e) => Paragraph::new(placeholder_lines(
            photo,
            Span::styled(
                format!("[!] {}", e),
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ))
        .block(block.border_style(Style::default().fg(ACCENT_PRIMARY)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false }),
    };

    frame.render_widget(paragraph, area);
}

fn placeholder_lines(photo: &PhotoRef, message: Span<'static>) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from(format!("Path: {}", photo.path.display())),
        Line::from(format!("Size: {}", format_file_size(photo.size))),
        Line::from(format!("Taken: {}", format_taken_date(photo.created))),
    ]
}

/// Shown when there is no photo under the cursor
fn render_empty_state_widget(app: &App) -> Paragraph<'static> {
    let (title, hint) = if app.session().is_empty() {
        (
            "No Photos Found",
            "Nothing to review here. Press y to choose another year.",
        )
    } else {
        (
            "All Photos Reviewed",
            "Press c to commit queued deletions or y to choose another year.",
        )
    };

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(TEXT_SECONDARY))),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(" Photos "),
        )
        .alignment(Alignment::Center)
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = match app.status() {
        Some(status) => Line::from(Span::styled(
            format!(" {}", status.text),
            if status.is_error {
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT_SECONDARY)
            },
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Footer control for committing; styled as disabled when nothing is queued
fn commit_control(pending: usize) -> Vec<Span<'static>> {
    if pending > 0 {
        vec![
            Span::styled(
                "c ",
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("Commit ({})", pending),
                Style::default().fg(ACCENT_PRIMARY),
            ),
        ]
    } else {
        vec![
            Span::styled("c ", Style::default().fg(TEXT_DISABLED)),
            Span::styled("Commit", Style::default().fg(TEXT_DISABLED)),
        ]
    }
}

fn render_footer(frame: &mut Frame, area: Rect, pending: usize) {
    let mut spans = vec![
        Span::styled(
            " ← ",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Delete", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled(
            "→ ",
            Style::default()
                .fg(ACCENT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Keep", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("y ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("Year", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
    ];
    spans.extend(commit_control(pending));
    spans.extend([
        Span::raw("  │  "),
        Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
    ]);

    let footer = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}
