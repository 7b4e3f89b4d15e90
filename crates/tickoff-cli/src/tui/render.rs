use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tickoff_core::{
    storage::KeyValueStore,
    tasks::{Filter, Task, Theme},
};

use super::app::{App, InputMode, Status};

/// Colors for one theme. Swapped wholesale when the board reports a theme change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    pub(crate) background: Color,
    pub(crate) text: Color,
    pub(crate) muted: Color,
    pub(crate) accent: Color,
    pub(crate) done: Color,
    pub(crate) star: Color,
    pub(crate) highlight: Color,
    pub(crate) error: Color,
}

impl Palette {
    pub(crate) fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::Rgb(250, 250, 247),
                text: Color::Rgb(33, 37, 41),
                muted: Color::Rgb(134, 142, 150),
                accent: Color::Rgb(25, 113, 194),
                done: Color::Rgb(47, 158, 68),
                star: Color::Rgb(230, 119, 0),
                highlight: Color::Rgb(222, 226, 230),
                error: Color::Rgb(201, 42, 42),
            },
            Theme::Dark => Self {
                background: Color::Rgb(24, 25, 28),
                text: Color::Rgb(222, 226, 230),
                muted: Color::Rgb(110, 117, 125),
                accent: Color::Rgb(116, 192, 252),
                done: Color::Rgb(105, 219, 124),
                star: Color::Rgb(255, 212, 59),
                highlight: Color::Rgb(52, 58, 64),
                error: Color::Rgb(255, 107, 107),
            },
        }
    }
}

pub(crate) fn draw<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let palette = app.palette;
    let base = Style::default().fg(palette.text).bg(palette.background);
    frame.render_widget(Block::default().style(base), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_input(frame, chunks[1], app);
    draw_tasks(frame, chunks[2], app);
    draw_footer(frame, chunks[3], app);
}

fn draw_header<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let palette = app.palette;
    let counts = app.board.counts();
    let glyph = match app.board.theme() {
        Theme::Light => "☽",
        Theme::Dark => "☀",
    };

    let mut spans = vec![
        Span::styled(
            "Tickoff",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    for (idx, filter) in Filter::ALL.into_iter().enumerate() {
        let count = match filter {
            Filter::All => counts.total,
            Filter::Active => counts.active,
            Filter::Completed => counts.completed,
            Filter::Important => counts.important,
        };
        let label = format!(" {} {} ({count}) ", idx + 1, filter_label(filter));
        let style = if filter == app.board.filter() {
            Style::default()
                .fg(palette.background)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::styled(label, style));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(glyph, Style::default().fg(palette.star)));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.muted)),
    );
    frame.render_widget(header, area);
}

fn draw_input<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let palette = app.palette;
    let adding = app.mode() == InputMode::Adding;
    let line = if app.board.input().is_empty() && !adding {
        Line::from(Span::styled(
            "Add your tasks here ...",
            Style::default().fg(palette.muted),
        ))
    } else {
        let mut spans = vec![Span::raw(app.board.input().to_string())];
        if adding {
            spans.push(Span::styled("▏", Style::default().fg(palette.accent)));
        }
        Line::from(spans)
    };

    let border = if adding { palette.accent } else { palette.muted };
    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title("New task"),
    );
    frame.render_widget(input, area);
}

fn draw_tasks<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let palette = app.palette;
    let editing = app.board.edit_session();
    let visible = app.board.visible_tasks();

    let items: Vec<ListItem> = if visible.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            empty_message(app.board.filter()),
            Style::default().fg(palette.muted),
        )))]
    } else {
        visible
            .iter()
            .map(|task| match editing {
                Some(session) if session.task_id == task.id => ListItem::new(Line::from(vec![
                    Span::styled(" ✎ ", Style::default().fg(palette.accent)),
                    Span::raw(session.draft.clone()),
                    Span::styled("▏", Style::default().fg(palette.accent)),
                ])),
                _ => ListItem::new(task_line(task, &palette)),
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted))
                .title(format!("Tasks · {}", filter_label(app.board.filter()))),
        )
        .highlight_style(Style::default().bg(palette.highlight));

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_line<'a>(task: &'a Task, palette: &Palette) -> Line<'a> {
    let (check, check_style) = if task.completed {
        ("[x]", Style::default().fg(palette.done))
    } else {
        ("[ ]", Style::default().fg(palette.muted))
    };
    let star = if task.is_important {
        Span::styled("★", Style::default().fg(palette.star))
    } else {
        Span::styled("☆", Style::default().fg(palette.muted))
    };
    let text_style = if task.completed {
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if task.is_important {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(" "),
        Span::styled(check, check_style),
        Span::raw(" "),
        star,
        Span::raw(" "),
        Span::styled(task.text.as_str(), text_style),
    ])
}

fn draw_footer<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let palette = app.palette;
    let hints: &[(&str, &str)] = match app.mode() {
        InputMode::Normal => &[
            ("a", "add"),
            ("e", "edit"),
            ("space", "done"),
            ("s", "star"),
            ("d", "delete"),
            ("f", "filter"),
            ("t", "theme"),
            ("q", "quit"),
        ],
        InputMode::Adding => &[("enter", "add"), ("esc", "back")],
        InputMode::Editing => &[("enter", "save"), ("esc", "cancel")],
    };

    let mut spans = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(*key, Style::default().fg(palette.accent)));
        spans.push(Span::raw(format!(" {action}  ")));
    }
    if let Some(status) = &app.status {
        let color = match status {
            Status::Info(_) => palette.done,
            Status::Error(_) => palette.error,
        };
        spans.push(Span::styled(
            status.text().to_string(),
            Style::default().fg(color),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.muted))
            .title("Controls"),
    );
    frame.render_widget(footer, area);
}

fn filter_label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
        Filter::Important => "Important",
    }
}

fn empty_message(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "Nothing to do. Press a to add a task.",
        Filter::Active => "No active tasks.",
        Filter::Completed => "No completed tasks yet.",
        Filter::Important => "No starred tasks.",
    }
}
