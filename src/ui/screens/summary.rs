use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use rust_decimal::Decimal;

use crate::models::Period;
use crate::ui::app::{App, Focus};
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.picker.current() {
        Some(user) => format!(" Expense Summary for {user} "),
        None => " Expense Summary ".to_string(),
    };
    let in_form = matches!(app.focus, Focus::Period | Focus::DeleteEntry);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(in_form))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Period filter
            Constraint::Min(3),    // Table
            Constraint::Length(2), // Net balance
            Constraint::Length(1), // Delete form
        ])
        .split(inner);

    render_period(f, chunks[0], app);

    if app.summary.rows.is_empty() {
        let msg = if app.picker.current().is_some() {
            "No transactions recorded yet!"
        } else {
            "Select a user or enter your name to see transactions"
        };
        f.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(msg, theme::dim_style())),
            ])
            .centered(),
            chunks[1],
        );
        return;
    }

    render_table(f, chunks[1], app);
    render_balance(f, chunks[2], app);
    render_delete_form(f, chunks[3], app);
}

fn render_period(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Period;
    let mut spans = vec![Span::styled(" Filter by: ", theme::label_style(focused))];
    for period in Period::all() {
        let chosen = *period == app.summary.period;
        let mark = if chosen { "(•)" } else { "( )" };
        let style = if chosen {
            Style::default().fg(theme::ACCENT)
        } else {
            theme::dim_style()
        };
        spans.push(Span::styled(format!("{mark} {period}   "), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["S.No", "Date", "Category", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .summary
        .rows
        .iter()
        .enumerate()
        .map(|(i, txn)| {
            let amount_style = if txn.is_credit() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let row_style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(txn.date.clone()),
                Cell::from(truncate(&txn.category, 32)),
                Cell::from(Span::styled(format_amount(txn.amount), amount_style)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(theme::selected_style());

    // The delete target is highlighted and kept in view.
    let mut state = TableState::default();
    state.select(app.summary.delete_entry.checked_sub(1));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_balance(f: &mut Frame, area: Rect, app: &App) {
    let balance = app.summary.balance;
    let style = if balance >= Decimal::ZERO {
        theme::income_style()
    } else {
        theme::expense_style()
    };
    let line = Line::from(vec![
        Span::styled(" Net Balance: ", theme::normal_style()),
        Span::styled(format_amount(balance), style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  ({} entries, {})", app.summary.rows.len(), app.summary.period),
            theme::dim_style(),
        ),
    ]);
    f.render_widget(Paragraph::new(vec![Line::from(""), line]), area);
}

fn render_delete_form(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::DeleteEntry;
    let caret = if focused { theme::CARET } else { "" };
    let entry = match app.summary.delete_entry {
        0 => String::new(),
        n => n.to_string(),
    };
    let line = Line::from(vec![
        Span::styled(
            " Enter the S.No of the entry to delete: ",
            theme::label_style(focused),
        ),
        Span::styled(
            format!("[ {entry}{caret} ]"),
            if focused {
                theme::command_bar_style()
            } else {
                theme::normal_style()
            },
        ),
        Span::styled(
            format!("  (1 - {})  ", app.summary.rows.len()),
            theme::dim_style(),
        ),
        Span::styled(
            "[ Delete Entry ]",
            if focused {
                Style::default().fg(theme::HEADER_BG).bg(theme::RED)
            } else {
                theme::normal_style()
            },
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
