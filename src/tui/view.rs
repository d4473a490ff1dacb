//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each tab has a dedicated render function. The main `render()`
//! dispatches based on the current Screen variant. Widget-building
//! functions are pure (state in, widgets out); the only effect is
//! Frame::render_widget() which writes to the terminal buffer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::export::group_label;
use crate::types::DrawPhase;

use super::state::{App, Input, InputKind, Screen};
use super::theme;

const TABS: [&str; 3] = ["名单", "抽奖", "分组"];

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current screen to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Tab bar at top, content in middle, status and help at bottom
    let chunks = Layout::vertical([
        Constraint::Length(1), // tabs
        Constraint::Min(0),    // content
        Constraint::Length(1), // status
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(render_tabs(&app.screen), chunks[0]);
    frame.render_widget(render_status(app), chunks[2]);
    frame.render_widget(render_help(app), chunks[3]);

    let content_area = chunks[1];

    match &app.screen {
        Screen::Names { cursor, input } => {
            render_names(app, *cursor, input.as_ref(), frame, content_area);
        }
        Screen::Draw => render_draw(app, frame, content_area),
        Screen::Groups { scroll } => render_groups(app, *scroll, frame, content_area),
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

fn render_tabs(screen: &Screen) -> Paragraph<'static> {
    let active = screen.tab();
    let mut spans = vec![Span::styled(" teamdraw ", theme::STYLE_TITLE)];
    for (i, name) in TABS.iter().enumerate() {
        let number = i as u8 + 1;
        let style = if number == active {
            theme::STYLE_TAB_ACTIVE
        } else {
            theme::STYLE_TAB_INACTIVE
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", number, name), style));
    }
    Paragraph::new(Line::from(spans))
}

fn render_status(app: &App) -> Paragraph<'static> {
    match &app.status {
        Some(status) => Paragraph::new(Span::styled(
            format!(" {}", status.text),
            theme::status_style(status.kind),
        )),
        None => Paragraph::new(""),
    }
}

/// Help line showing available keybindings for the current screen.
fn render_help(app: &App) -> Paragraph<'static> {
    let help_text = match &app.screen {
        Screen::Names { input: Some(_), .. } => "[Enter] submit  [Esc] cancel",
        Screen::Names { .. } => {
            "[j/k] move  [i] add  [o] import  [d] delete  [u] dedupe  [X] clear  [s] sample  [q] quit"
        }
        Screen::Draw if app.draw.is_reset_armed() => "[y] clear history  [n] keep",
        Screen::Draw => "[Space] start/stop  [m] repeat  [r] reset  [Tab] next  [q] quit",
        Screen::Groups { .. } => {
            "[+/-] size  [g] generate  [c] copy  [e] export csv  [j/k] scroll  [q] quit"
        }
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

/// Scroll offset that keeps `cursor` on screen.
fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height > 0 && cursor >= height {
        cursor - height + 1
    } else {
        0
    }
}

// ============================================================================
// SCREEN: NAMES
// ============================================================================

fn render_names(app: &App, cursor: usize, input: Option<&Input>, frame: &mut Frame, area: Rect) {
    let (list_area, prompt_area) = match input {
        Some(_) => {
            let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).split(area);
            (chunks[0], Some(chunks[1]))
        }
        None => (area, None),
    };

    let names = app.roster.names();
    let duplicates = app.roster.duplicate_indices();

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled("  Names: ", theme::STYLE_DIM),
        Span::styled(names.len().to_string(), theme::STYLE_IMPORTANT),
        Span::styled(
            if duplicates.is_empty() {
                String::new()
            } else {
                format!("  ({} marked dup)", duplicates.len())
            },
            theme::STYLE_WARNING,
        ),
    ])];

    if names.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (empty) press [i] to add names or [s] for a sample list",
            theme::STYLE_DIM,
        )));
    }

    // Header takes one row
    let body_height = (list_area.height as usize).saturating_sub(1);
    let offset = scroll_offset(cursor, body_height);

    for (i, name) in names.iter().enumerate().skip(offset) {
        let mut spans = vec![
            Span::styled(format!("  {:>3}  ", i + 1), theme::STYLE_DIM),
            Span::raw(name.clone()),
        ];
        if duplicates.contains(&i) {
            spans.push(Span::styled("  dup", theme::STYLE_WARNING));
        }
        let line = if i == cursor {
            Line::from(spans).style(theme::STYLE_CURSOR)
        } else {
            Line::from(spans)
        };
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines), list_area);

    if let (Some(input), Some(area)) = (input, prompt_area) {
        let title = match input.kind {
            InputKind::Names => " Add names (comma or newline separated) ",
            InputKind::CsvPath => " Import CSV file path ",
        };
        let prompt = Paragraph::new(Line::from(vec![
            // Pasted line breaks shown inline; the prompt is one row
            Span::raw(input.buffer.replace('\n', " ⏎ ")),
            Span::styled("_", theme::STYLE_INTERACTIVE),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, theme::STYLE_INTERACTIVE)),
        );
        frame.render_widget(prompt, area);
    }
}

// ============================================================================
// SCREEN: DRAW
// ============================================================================

fn render_draw(app: &App, frame: &mut Frame, area: Rect) {
    let draw = &app.draw;
    let names = app.roster.names();
    let eligible = draw.eligible(names).len();

    let name_style = match draw.phase() {
        DrawPhase::Idle => theme::STYLE_DIM,
        DrawPhase::Cycling => theme::STYLE_CYCLING,
        DrawPhase::Settled => theme::STYLE_WINNER,
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(draw.displayed().to_string(), name_style)).centered(),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Eligible: ", theme::STYLE_DIM),
            Span::styled(format!("{} of {}", eligible, names.len()), theme::STYLE_IMPORTANT),
            Span::styled("    Repeat winners: ", theme::STYLE_DIM),
            Span::styled(
                if draw.allow_repeat() { "on" } else { "off" },
                theme::STYLE_INTERACTIVE,
            ),
        ]),
    ];

    if eligible == 0 && !draw.is_cycling() {
        lines.push(Line::from(Span::styled(
            "  Nobody left to draw",
            theme::STYLE_WARNING,
        )));
    }

    if draw.is_reset_armed() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Clear the winner history? [y] yes  [n] no",
            theme::STYLE_DANGER,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Winners", theme::STYLE_TITLE)));

    let winners = draw.winners();
    if winners.is_empty() {
        lines.push(Line::from(Span::styled("  (none yet)", theme::STYLE_DIM)));
    }
    // Most recent first, numbered in draw order
    for (i, winner) in winners.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>3}. ", winners.len() - i), theme::STYLE_DIM),
            Span::styled(winner.clone(), theme::STYLE_SUCCESS),
        ]));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// SCREEN: GROUPS
// ============================================================================

fn render_groups(app: &App, scroll: usize, frame: &mut Frame, area: Rect) {
    let grouping = &app.grouping;
    let size = grouping.group_size();
    let count = app.roster.len();

    let mut lines = vec![Line::from(vec![
        Span::styled("  Group size: ", theme::STYLE_DIM),
        Span::styled(size.to_string(), theme::STYLE_IMPORTANT),
        Span::styled(
            format!("    {} names -> {} groups", count, count.div_ceil(size)),
            theme::STYLE_DIM,
        ),
    ])];

    if grouping.is_generating() {
        lines.push(Line::from(Span::styled("  Generating...", theme::STYLE_WARNING)));
    }
    lines.push(Line::from(""));

    let groups = grouping.groups();
    if groups.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No groups yet. Press [g] to generate.",
            theme::STYLE_DIM,
        )));
    }

    for (i, group) in groups.iter().enumerate().skip(scroll) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", group_label(i)), theme::STYLE_TITLE),
            Span::styled(format!("  ({})", group.len()), theme::STYLE_DIM),
        ]));
        lines.push(Line::from(format!("    {}", group.join(", "))));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// TESTS
// ============================================================================
