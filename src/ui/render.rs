use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::app::{App, Focus, InputMode, Menu};
use super::commands;
use super::theme;
use crate::models::DATE_FORMAT;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(8),    // Sidebar + page
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0]);
    render_body(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        " 💰 Family Expense Tracker ",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(title, area);
}

fn render_body(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(30)])
        .split(area);

    render_sidebar(f, columns[0], app);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(4)])
        .split(columns[1]);

    render_user_picker(f, rows[0], app);
    match app.menu {
        Menu::AddExpense => super::screens::add_expense::render(f, rows[1], app),
        Menu::ViewSummary => super::screens::summary::render(f, rows[1], app),
    }
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let items: Vec<ListItem> = Menu::all()
        .iter()
        .map(|m| {
            if *m == app.menu {
                ListItem::new(Line::from(Span::styled(
                    format!("▶ {m}"),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )))
            } else {
                ListItem::new(Line::from(Span::styled(
                    format!("  {m}"),
                    theme::dim_style(),
                )))
            }
        })
        .collect();

    let menu = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(app.focus == Focus::Menu))
            .title(Span::styled(" Menu ", theme::label_style(app.focus == Focus::Menu))),
    );
    f.render_widget(menu, parts[0]);

    let footer = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(" Tab   next field", theme::dim_style())),
        Line::from(Span::styled(" ←/→   choose", theme::dim_style())),
        Line::from(Span::styled(" Enter submit", theme::dim_style())),
        Line::from(Span::styled(" ?     help", theme::dim_style())),
    ]);
    f.render_widget(footer, parts[1]);
}

fn render_user_picker(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::User;
    let picker = &app.picker;

    let mut spans = vec![
        Span::styled(" ◀ ", theme::dim_style()),
        Span::styled(
            picker.label().to_string(),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", theme::dim_style()),
    ];
    if picker.is_new_user() {
        let caret = if focused { theme::CARET } else { "" };
        spans.push(Span::styled("   Enter Your Name: ", theme::label_style(focused)));
        spans.push(Span::styled(
            format!("[ {}{caret} ]", picker.new_name),
            if focused {
                theme::command_bar_style()
            } else {
                theme::normal_style()
            },
        ));
    }

    let known = Line::from(Span::styled(
        format!(" {} known user(s)", picker.users.len()),
        theme::dim_style(),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused))
        .title(Span::styled(" Select User ", theme::label_style(focused)));
    f.render_widget(
        Paragraph::new(vec![Line::from(spans), known]).block(block),
        area,
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let user = app.picker.current().unwrap_or("no user");
    let info = format!(" {} | {user} | {}", app.menu, app.today.format(DATE_FORMAT));

    let right = match app.menu {
        Menu::AddExpense => " Enter add | : commands | ? help ",
        Menu::ViewSummary => " ←/→ period | Enter delete | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(mode_label, mode_style),
        Span::styled(info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help, Tab to move between fields (Esc leaves a text field first)",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let mut help_text = vec![
        Line::from(Span::styled(
            " Expense Tracker Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Keys"),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Next/previous field   Enter      Add / Delete",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Left/Right       Change selection      Up/Down    Step numbers",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Backspace        Erase                 Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Commands"),
    ];

    // Build command list dynamically from COMMANDS registry
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<12} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
