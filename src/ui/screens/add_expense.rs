use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{TransactionType, AMOUNT_MAX, AMOUNT_MIN};
use crate::ui::app::{App, Focus};
use crate::ui::theme;

const LABEL_WIDTH: usize = 19;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.add_form;
    let in_form = matches!(
        app.focus,
        Focus::TransactionType | Focus::Amount | Focus::Category
    );

    let mut type_line = vec![label("Transaction Type:", app.focus == Focus::TransactionType)];
    for kind in TransactionType::all() {
        let chosen = *kind == form.transaction_type;
        let mark = if chosen { "(•)" } else { "( )" };
        let style = match (chosen, kind) {
            (false, _) => theme::dim_style(),
            (true, TransactionType::Credit) => theme::income_style(),
            (true, TransactionType::Debit) => theme::expense_style(),
        };
        type_line.push(Span::styled(format!("{mark} {kind}   "), style));
    }

    let amount_focused = app.focus == Focus::Amount;
    let category_focused = app.focus == Focus::Category;

    let lines = vec![
        Line::from(""),
        Line::from(type_line),
        Line::from(""),
        Line::from(vec![
            label("Enter Amount:", amount_focused),
            input(&form.amount.to_string(), amount_focused),
            Span::styled(
                format!("  ({AMOUNT_MIN} - {AMOUNT_MAX}, Up/Down to step)"),
                theme::dim_style(),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Enter Category:", category_focused),
            input(&form.category, category_focused),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" ".repeat(LABEL_WIDTH + 1)),
            Span::styled(
                "[ Add Transaction ]",
                if in_form {
                    theme::selected_style().add_modifier(Modifier::BOLD)
                } else {
                    theme::normal_style()
                },
            ),
            Span::styled("  Enter", theme::dim_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(in_form))
        .title(Span::styled(
            " Add a New Expense or Income ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn label(text: &str, focused: bool) -> Span<'static> {
    Span::styled(
        format!(" {text:<width$}", width = LABEL_WIDTH),
        theme::label_style(focused),
    )
}

fn input(value: &str, focused: bool) -> Span<'static> {
    let caret = if focused { theme::CARET } else { "" };
    let style = if focused {
        theme::command_bar_style()
    } else {
        theme::normal_style()
    };
    Span::styled(format!("[ {value}{caret} ]"), style)
}
