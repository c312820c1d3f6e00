use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use rust_decimal::Decimal;

use super::app::{App, Focus, Menu};
use crate::db::Database;
use crate::models::{Period, TransactionType, AMOUNT_MAX, AMOUNT_MIN};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("e", "Go to Add Expense", cmd_expense, r);
    register_command!("expense", "Go to Add Expense", cmd_expense, r);
    register_command!("s", "Go to View Summary", cmd_summary, r);
    register_command!("summary", "Go to View Summary", cmd_summary, r);
    register_command!("u", "Switch user (e.g. :u Alice)", cmd_user, r);
    register_command!("user", "Switch user (e.g. :user Alice)", cmd_user, r);
    register_command!(
        "a",
        "Add transaction (e.g. :a debit 250 Groceries)",
        cmd_add,
        r
    );
    register_command!(
        "add",
        "Add transaction (e.g. :add debit 250 Groceries)",
        cmd_add,
        r
    );
    register_command!("p", "Filter summary (all, monthly, yearly)", cmd_period, r);
    register_command!(
        "period",
        "Filter summary (all, monthly, yearly)",
        cmd_period,
        r
    );
    register_command!("d", "Delete entry by S.No (e.g. :d 3)", cmd_delete, r);
    register_command!("delete", "Delete entry by S.No (e.g. :delete 3)", cmd_delete, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        tracing::debug!(command = cmd_name, args, "running command");
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_expense(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.switch_menu(Menu::AddExpense, db)?;
    app.focus = Focus::TransactionType;
    Ok(())
}

fn cmd_summary(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.switch_menu(Menu::ViewSummary, db)?;
    app.focus = Focus::Period;
    Ok(())
}

fn cmd_user(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :user <name>");
        return Ok(());
    }
    app.picker.select(args);
    app.summary.delete_entry = 1;
    app.refresh_summary(db)?;
    if app.picker.is_new_user() {
        app.set_status(format!("New user: {args}"));
    } else {
        app.set_status(format!("Switched to {args}"));
    }
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let usage = "Usage: :add <credit|debit> <amount> <category>";
    let mut parts = args.splitn(3, ' ');
    let (Some(kind), Some(amount)) = (parts.next(), parts.next()) else {
        app.set_status(usage);
        return Ok(());
    };
    let category = parts.next().unwrap_or("").trim();

    let Some(kind) = TransactionType::parse(kind) else {
        app.set_status(format!("Invalid transaction type: {kind}. {usage}"));
        return Ok(());
    };
    let amount = match Decimal::from_str(amount) {
        Ok(a) if a >= Decimal::from(AMOUNT_MIN) && a <= Decimal::from(AMOUNT_MAX) => a,
        _ => {
            app.set_status(format!(
                "Invalid amount: {amount} (must be {AMOUNT_MIN} - {AMOUNT_MAX})"
            ));
            return Ok(());
        }
    };
    let Some(user) = app.picker.current().map(str::to_string) else {
        app.set_status("Select a user or enter your name first");
        return Ok(());
    };

    let txn = crate::models::Transaction::new(user, amount, category.to_string(), kind, app.today);
    db.insert_transaction(&txn)?;
    app.refresh_all(db)?;
    app.set_status("Transaction Added Successfully!");
    Ok(())
}

fn cmd_period(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    match Period::parse(args) {
        Some(period) => {
            app.switch_menu(Menu::ViewSummary, db)?;
            app.set_period(period, db)?;
            app.set_status(format!("Showing {period}"));
        }
        None => app.set_status("Usage: :period <all|monthly|yearly>"),
    }
    Ok(())
}

fn cmd_delete(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if app.menu != Menu::ViewSummary {
        app.switch_menu(Menu::ViewSummary, db)?;
    }
    match args.parse::<usize>() {
        Ok(entry) if (1..=app.summary.rows.len()).contains(&entry) => {
            app.summary.delete_entry = entry;
            app.request_delete();
        }
        _ => app.set_status(format!(
            "Usage: :delete <S.No> (1 - {})",
            app.summary.rows.len()
        )),
    }
    Ok(())
}
