#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use ratatui::{backend::TestBackend, Terminal};
use rust_decimal_macros::dec;
use tempfile::TempDir;

use super::app::*;
use super::commands::handle_command;
use crate::db::Database;
use crate::models::{Period, Transaction, TransactionType, AMOUNT_MAX};

fn setup() -> (TempDir, Database, App) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("expenses.db")).unwrap();
    let mut app = App::new();
    app.today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    app.refresh_all(&db).unwrap();
    (dir, db, app)
}

fn seed(db: &Database, user: &str, date: NaiveDate, amount: i64, kind: TransactionType) {
    let txn = Transaction::new(
        user.into(),
        amount.into(),
        format!("cat-{amount}"),
        kind,
        date,
    );
    db.insert_transaction(&txn).unwrap();
}

fn type_str(app: &mut App, db: &Database, s: &str) {
    for c in s.chars() {
        app.type_char(c, db).unwrap();
    }
}

fn draw(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
    terminal.draw(|f| super::render::render(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect::<String>()
}

// ── User picker ───────────────────────────────────────────────

#[test]
fn test_new_user_requires_a_name() {
    let (_dir, db, mut app) = setup();
    assert!(app.picker.is_new_user());
    assert_eq!(app.picker.current(), None);

    app.submit_add(&db).unwrap();
    assert!(db.read_transactions().unwrap().is_empty());
    assert!(app.status_message.contains("name"));

    type_str(&mut app, &db, "  ");
    assert_eq!(app.picker.current(), None);
}

#[test]
fn test_new_user_name_is_trimmed() {
    let (_dir, db, mut app) = setup();
    type_str(&mut app, &db, " Alice ");
    assert_eq!(app.picker.current(), Some("Alice"));
}

#[test]
fn test_picker_cycles_existing_users() {
    let (_dir, db, mut app) = setup();
    seed(&db, "Bob", app.today, 5, TransactionType::Credit);
    seed(&db, "Alice", app.today, 7, TransactionType::Credit);
    app.refresh_all(&db).unwrap();

    assert_eq!(app.picker.label(), NEW_USER);
    app.adjust_focused(1, &db).unwrap();
    assert_eq!(app.picker.current(), Some("Alice"));
    app.adjust_focused(1, &db).unwrap();
    assert_eq!(app.picker.current(), Some("Bob"));
    app.adjust_focused(1, &db).unwrap();
    assert!(app.picker.is_new_user());
    app.adjust_focused(-1, &db).unwrap();
    assert_eq!(app.picker.current(), Some("Bob"));
}

#[test]
fn test_new_user_becomes_selectable_after_first_add() {
    let (_dir, db, mut app) = setup();
    type_str(&mut app, &db, "Carol");
    app.submit_add(&db).unwrap();

    assert_eq!(app.picker.users, vec!["Carol"]);
    assert!(!app.picker.is_new_user());
    assert_eq!(app.picker.current(), Some("Carol"));
}

// ── Add form ──────────────────────────────────────────────────

#[test]
fn test_submit_add_debit_stores_negative() {
    let (_dir, db, mut app) = setup();
    app.picker.select("Alice");
    app.focus = Focus::TransactionType;
    app.adjust_focused(1, &db).unwrap();
    assert_eq!(app.add_form.transaction_type, TransactionType::Debit);

    app.focus = Focus::Amount;
    app.backspace(&db).unwrap();
    type_str(&mut app, &db, "300");
    app.focus = Focus::Category;
    type_str(&mut app, &db, "Rent");
    app.submit_add(&db).unwrap();

    let rows = db.read_transactions().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, dec!(-300));
    assert_eq!(rows[0].category, "Rent");
    assert_eq!(rows[0].date, "15/06/2024");
    assert_eq!(app.status_message, "Transaction Added Successfully!");
}

#[test]
fn test_amount_input_is_bounded() {
    let (_dir, db, mut app) = setup();
    app.focus = Focus::Amount;
    assert_eq!(app.add_form.amount, 1);

    app.adjust_focused(-1, &db).unwrap();
    assert_eq!(app.add_form.amount, 1);

    type_str(&mut app, &db, "00000");
    assert_eq!(app.add_form.amount, AMOUNT_MAX);
    type_str(&mut app, &db, "9");
    assert_eq!(app.add_form.amount, AMOUNT_MAX);
    app.adjust_focused(1, &db).unwrap();
    assert_eq!(app.add_form.amount, AMOUNT_MAX);
    type_str(&mut app, &db, "x");
    assert_eq!(app.add_form.amount, AMOUNT_MAX);
}

#[test]
fn test_zero_amount_is_rejected() {
    let (_dir, db, mut app) = setup();
    app.picker.select("Alice");
    app.focus = Focus::Amount;
    app.backspace(&db).unwrap();
    assert_eq!(app.add_form.amount, 0);

    app.submit_add(&db).unwrap();
    assert!(db.read_transactions().unwrap().is_empty());
    assert!(app.status_message.starts_with("Amount must be"));
}

// ── Summary view ──────────────────────────────────────────────

#[test]
fn test_summary_balance_tracks_period() {
    let (_dir, db, mut app) = setup();
    let today = app.today;
    let last_year = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
    seed(&db, "Alice", today, 500, TransactionType::Credit);
    seed(&db, "Alice", today, 200, TransactionType::Credit);
    seed(&db, "Alice", today, 300, TransactionType::Debit);
    seed(&db, "Alice", last_year, 1000, TransactionType::Debit);
    seed(&db, "Bob", today, 50, TransactionType::Credit);
    app.refresh_all(&db).unwrap();
    app.picker.select("Alice");

    app.switch_menu(Menu::ViewSummary, &db).unwrap();
    assert_eq!(app.summary.rows.len(), 4);
    assert_eq!(app.summary.balance, dec!(-600));

    app.set_period(Period::Monthly, &db).unwrap();
    assert_eq!(app.summary.rows.len(), 3);
    assert_eq!(app.summary.balance, dec!(400));

    app.focus = Focus::Period;
    app.adjust_focused(1, &db).unwrap();
    assert_eq!(app.summary.period, Period::Yearly);
    assert_eq!(app.summary.balance, dec!(400));
}

#[test]
fn test_delete_entry_input_is_bounded() {
    let (_dir, db, mut app) = setup();
    for amount in 1..=3 {
        seed(&db, "Alice", app.today, amount, TransactionType::Credit);
    }
    app.refresh_all(&db).unwrap();
    app.picker.select("Alice");
    app.switch_menu(Menu::ViewSummary, &db).unwrap();
    app.focus = Focus::DeleteEntry;

    assert_eq!(app.summary.delete_entry, 1);
    app.adjust_focused(5, &db).unwrap();
    assert_eq!(app.summary.delete_entry, 3);
    type_str(&mut app, &db, "7");
    assert_eq!(app.summary.delete_entry, 3);
    type_str(&mut app, &db, "2");
    assert_eq!(app.summary.delete_entry, 2);
}

#[test]
fn test_delete_removes_displayed_row_in_filtered_view() {
    let (_dir, db, mut app) = setup();
    let last_year = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    seed(&db, "Alice", last_year, 1, TransactionType::Credit);
    seed(&db, "Alice", app.today, 2, TransactionType::Credit);
    seed(&db, "Alice", app.today, 3, TransactionType::Credit);
    app.refresh_all(&db).unwrap();
    app.picker.select("Alice");
    app.switch_menu(Menu::ViewSummary, &db).unwrap();
    app.set_period(Period::Monthly, &db).unwrap();

    app.summary.delete_entry = 2;
    app.request_delete();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(app.confirm_message.contains("cat-3"));

    app.confirm_pending(&db).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "Expense deleted successfully!");

    let left: Vec<String> = db
        .read_transactions()
        .unwrap()
        .into_iter()
        .map(|t| t.category)
        .collect();
    assert_eq!(left, vec!["cat-1", "cat-2"]);
    assert_eq!(app.summary.rows.len(), 1);
    assert_eq!(app.summary.delete_entry, 1);
}

#[test]
fn test_cancel_delete_keeps_row() {
    let (_dir, db, mut app) = setup();
    seed(&db, "Alice", app.today, 9, TransactionType::Debit);
    app.refresh_all(&db).unwrap();
    app.picker.select("Alice");
    app.switch_menu(Menu::ViewSummary, &db).unwrap();

    app.request_delete();
    app.cancel_pending();
    assert!(app.pending_action.is_none());
    assert_eq!(db.read_transactions().unwrap().len(), 1);
}

#[test]
fn test_delete_with_no_rows_sets_status() {
    let (_dir, db, mut app) = setup();
    app.picker.select("Alice");
    app.switch_menu(Menu::ViewSummary, &db).unwrap();
    app.request_delete();
    assert!(app.pending_action.is_none());
    assert_eq!(app.status_message, "No transactions recorded yet!");
}

#[test]
fn test_delete_with_empty_entry_reports_range() {
    let (_dir, db, mut app) = setup();
    seed(&db, "Alice", app.today, 1, TransactionType::Credit);
    seed(&db, "Alice", app.today, 2, TransactionType::Credit);
    app.refresh_all(&db).unwrap();
    app.picker.select("Alice");
    app.switch_menu(Menu::ViewSummary, &db).unwrap();
    app.focus = Focus::DeleteEntry;

    app.backspace(&db).unwrap();
    assert_eq!(app.summary.delete_entry, 0);
    app.request_delete();
    assert!(app.pending_action.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "Enter an S.No between 1 and 2");
}

// ── Focus ─────────────────────────────────────────────────────

#[test]
fn test_escape_leaves_text_field() {
    let (_dir, db, mut app) = setup();
    app.focus = Focus::Category;
    type_str(&mut app, &db, "Rent");
    app.escape();
    assert_eq!(app.focus, Focus::Menu);
    assert_eq!(app.add_form.category, "Rent");

    app.focus = Focus::Amount;
    app.escape();
    assert_eq!(app.focus, Focus::Amount);
}

#[test]
fn test_focus_cycles_within_page() {
    let (_dir, db, mut app) = setup();
    assert_eq!(app.focus, Focus::User);
    app.cycle_focus(-1);
    assert_eq!(app.focus, Focus::Category);
    app.cycle_focus(1);
    assert_eq!(app.focus, Focus::User);

    app.focus = Focus::Amount;
    app.switch_menu(Menu::ViewSummary, &db).unwrap();
    assert_eq!(app.focus, Focus::Menu);
    app.cycle_focus(1);
    assert_eq!(app.focus, Focus::Period);
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn test_command_add_and_delete() {
    let (_dir, db, mut app) = setup();
    handle_command("user Dana", &mut app, &db).unwrap();
    handle_command("add debit 250 Groceries and milk", &mut app, &db).unwrap();

    let rows = db.read_transactions().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user, "Dana");
    assert_eq!(rows[0].amount, dec!(-250));
    assert_eq!(rows[0].category, "Groceries and milk");

    handle_command("delete 1", &mut app, &db).unwrap();
    assert_eq!(app.menu, Menu::ViewSummary);
    assert_eq!(app.input_mode, InputMode::Confirm);
    app.confirm_pending(&db).unwrap();
    assert!(db.read_transactions().unwrap().is_empty());
}

#[test]
fn test_command_add_rejects_bad_input() {
    let (_dir, db, mut app) = setup();
    handle_command("user Dana", &mut app, &db).unwrap();
    handle_command("add refund 10 Misc", &mut app, &db).unwrap();
    handle_command("add credit 0 Misc", &mut app, &db).unwrap();
    handle_command("add credit 100001 Misc", &mut app, &db).unwrap();
    handle_command("add credit", &mut app, &db).unwrap();
    assert!(db.read_transactions().unwrap().is_empty());
}

#[test]
fn test_unknown_command_suggests() {
    let (_dir, db, mut app) = setup();
    handle_command("sumary", &mut app, &db).unwrap();
    assert!(app.status_message.contains(":summary"));
}

#[test]
fn test_command_quit() {
    let (_dir, db, mut app) = setup();
    handle_command("q", &mut app, &db).unwrap();
    assert!(!app.running);
}

// ── Render ────────────────────────────────────────────────────

#[test]
fn test_render_add_page() {
    let (_dir, _db, app) = setup();
    let screen = draw(&app);
    assert!(screen.contains("Add a New Expense or Income"));
    assert!(screen.contains("New User"));
}

#[test]
fn test_render_summary_shows_balance() {
    let (_dir, db, mut app) = setup();
    seed(&db, "Alice", app.today, 150, TransactionType::Credit);
    app.refresh_all(&db).unwrap();
    app.picker.select("Alice");
    app.switch_menu(Menu::ViewSummary, &db).unwrap();

    let screen = draw(&app);
    assert!(screen.contains("Expense Summary for Alice"));
    assert!(screen.contains("Net Balance:"));
    assert!(screen.contains("cat-150"));
}

#[test]
fn test_render_empty_summary() {
    let (_dir, db, mut app) = setup();
    app.picker.select("Nobody");
    app.switch_menu(Menu::ViewSummary, &db).unwrap();
    assert!(draw(&app).contains("No transactions recorded yet!"));
}
