use anyhow::Result;
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;

use crate::db::Database;
use crate::models::{net_balance, Period, TransactionType, AMOUNT_MAX, AMOUNT_MIN};
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], db: &Database) -> Result<()> {
    let mut out = std::io::stdout().lock();
    run_command(args, db, &mut out)
}

/// Dispatch `args[1..]`, writing human-readable output to `out`.
pub(crate) fn run_command(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    match args[1].as_str() {
        "users" | "u" => cli_users(db, out),
        "add" | "a" => cli_add(&args[2..], db, out),
        "summary" | "s" => cli_summary(&args[2..], db, out),
        "delete" | "d" => cli_delete(&args[2..], db, out),
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "expense-tracker {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut impl Write) -> Result<()> {
    writeln!(out, "expense-tracker — household expense tracker")?;
    writeln!(out)?;
    writeln!(out, "Usage: expense-tracker [command]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  (none)                                  Launch interactive TUI")?;
    writeln!(out, "  users                                   List users")?;
    writeln!(
        out,
        "  add <user> <credit|debit> <amount> <category>   Record a transaction dated today"
    )?;
    writeln!(
        out,
        "  summary <user> [all|monthly|yearly]     Print transactions and net balance"
    )?;
    writeln!(
        out,
        "  delete <user> <s.no>                    Delete an entry (numbered as in 'summary <user> all')"
    )?;
    writeln!(out, "  --help, -h                              Show this help")?;
    writeln!(out, "  --version, -V                           Show version")?;
    Ok(())
}

fn cli_users(db: &Database, out: &mut impl Write) -> Result<()> {
    let users = db.get_users()?;
    if users.is_empty() {
        writeln!(out, "No users yet")?;
    }
    for user in &users {
        writeln!(out, "{user}")?;
    }
    Ok(())
}

/// User names are stored trimmed, so every subcommand looks them up trimmed.
fn user_name(raw: &str) -> Result<&str> {
    let user = raw.trim();
    if user.is_empty() {
        anyhow::bail!("User name must not be empty");
    }
    Ok(user)
}

fn cli_add(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    let usage = "Usage: expense-tracker add <user> <credit|debit> <amount> <category>";
    if args.len() < 3 {
        anyhow::bail!(usage);
    }
    let user = user_name(&args[0])?;
    let kind = TransactionType::parse(&args[1])
        .ok_or_else(|| anyhow::anyhow!("Invalid transaction type: {}. {usage}", args[1]))?;
    let amount = Decimal::from_str(&args[2])
        .map_err(|_| anyhow::anyhow!("Invalid amount: {}", args[2]))?;
    if amount < Decimal::from(AMOUNT_MIN) || amount > Decimal::from(AMOUNT_MAX) {
        anyhow::bail!("Amount must be between {AMOUNT_MIN} and {AMOUNT_MAX}");
    }
    let category = args[3..].join(" ");

    db.add_transaction(user, amount, &category, kind)?;
    writeln!(out, "Transaction Added Successfully!")?;
    Ok(())
}

fn cli_summary(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    let Some(user) = args.first() else {
        anyhow::bail!("Usage: expense-tracker summary <user> [all|monthly|yearly]");
    };
    let user = user_name(user)?;
    let period = match args.get(1) {
        Some(p) => Period::parse(p).ok_or_else(|| anyhow::anyhow!("Unknown period: {p}"))?,
        None => Period::All,
    };

    let rows = db.filter_by_period(user, period)?;
    writeln!(out, "Expense Summary for {user} ({period})")?;
    writeln!(out, "{}", "─".repeat(56))?;
    if rows.is_empty() {
        writeln!(out, "No transactions recorded yet!")?;
        return Ok(());
    }

    writeln!(out, "{:<6} {:<12} {:<20} {:>14}", "S.No", "Date", "Category", "Amount")?;
    for (i, txn) in rows.iter().enumerate() {
        writeln!(
            out,
            "{:<6} {:<12} {:<20} {:>14}",
            i + 1,
            txn.date,
            truncate(&txn.category, 20),
            format_amount(txn.amount),
        )?;
    }
    writeln!(out, "{}", "─".repeat(56))?;
    writeln!(out, "Net Balance: {}", format_amount(net_balance(&rows)))?;
    Ok(())
}

fn cli_delete(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    let usage = "Usage: expense-tracker delete <user> <s.no>";
    let (Some(user), Some(entry)) = (args.first(), args.get(1)) else {
        anyhow::bail!(usage);
    };
    let user = user_name(user)?;
    let entry: usize = entry
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid S.No: {entry}. {usage}"))?;
    let Some(index) = entry.checked_sub(1) else {
        anyhow::bail!("S.No starts at 1");
    };

    if db.delete_at_position(user, index)? == 0 {
        anyhow::bail!("{user} has no entry {entry}");
    }
    writeln!(out, "Expense deleted successfully!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("expenses.db")).unwrap();
        (dir, db)
    }

    fn run(db: &Database, args: &[&str]) -> Result<String> {
        let mut argv = vec!["expense-tracker".to_string()];
        argv.extend(args.iter().map(|a| a.to_string()));
        let mut out = Vec::new();
        run_command(&argv, db, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_add_then_summary() {
        let (_dir, db) = setup();
        run(&db, &["add", "Alice", "credit", "500", "Salary"]).unwrap();
        run(&db, &["add", "Alice", "credit", "200", "Gift"]).unwrap();
        run(&db, &["add", "Alice", "debit", "300", "House", "rent"]).unwrap();

        let out = run(&db, &["summary", "Alice"]).unwrap();
        assert!(out.contains("Expense Summary for Alice (All)"));
        assert!(out.contains("House rent"));
        assert!(out.contains("-₹300.00"));
        assert!(out.contains("Net Balance: ₹400.00"));
    }

    #[test]
    fn test_summary_monthly_includes_today() {
        let (_dir, db) = setup();
        run(&db, &["add", "Alice", "debit", "42", "Lunch"]).unwrap();
        let out = run(&db, &["s", "Alice", "monthly"]).unwrap();
        assert!(out.contains("Lunch"));
        assert!(out.contains("Net Balance: -₹42.00"));
    }

    #[test]
    fn test_summary_empty_user() {
        let (_dir, db) = setup();
        let out = run(&db, &["summary", "Nobody"]).unwrap();
        assert!(out.contains("No transactions recorded yet!"));
    }

    #[test]
    fn test_add_validates_input() {
        let (_dir, db) = setup();
        assert!(run(&db, &["add", "Alice", "credit"]).is_err());
        assert!(run(&db, &["add", "Alice", "loan", "5", "x"]).is_err());
        assert!(run(&db, &["add", "Alice", "credit", "abc", "x"]).is_err());
        assert!(run(&db, &["add", "Alice", "credit", "0", "x"]).is_err());
        assert!(run(&db, &["add", "Alice", "credit", "100001", "x"]).is_err());
        assert!(run(&db, &["add", " ", "credit", "5", "x"]).is_err());
        assert!(db.read_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_add_without_category() {
        let (_dir, db) = setup();
        run(&db, &["add", "Alice", "credit", "5"]).unwrap();
        assert_eq!(db.read_transactions().unwrap()[0].category, "");
    }

    #[test]
    fn test_delete_by_sno() {
        let (_dir, db) = setup();
        run(&db, &["add", "Alice", "credit", "1", "first"]).unwrap();
        run(&db, &["add", "Alice", "credit", "2", "second"]).unwrap();

        let out = run(&db, &["delete", "Alice", "1"]).unwrap();
        assert!(out.contains("Expense deleted successfully!"));
        let left = db.read_transactions().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].category, "second");

        assert!(run(&db, &["delete", "Alice", "0"]).is_err());
        assert!(run(&db, &["delete", "Alice", "5"]).is_err());
        assert!(run(&db, &["delete", "Alice"]).is_err());
    }

    #[test]
    fn test_user_name_is_trimmed_for_every_subcommand() {
        let (_dir, db) = setup();
        run(&db, &["add", " Alice", "credit", "10", "first"]).unwrap();
        run(&db, &["add", "Alice ", "credit", "20", "second"]).unwrap();

        let out = run(&db, &["summary", " Alice "]).unwrap();
        assert!(out.contains("Expense Summary for Alice (All)"));
        assert!(out.contains("Net Balance: ₹30.00"));

        run(&db, &["delete", "  Alice", "1"]).unwrap();
        let left = db.read_transactions().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].category, "second");

        assert!(run(&db, &["summary", "  "]).is_err());
        assert!(run(&db, &["delete", "  ", "1"]).is_err());
    }

    #[test]
    fn test_users_listing() {
        let (_dir, db) = setup();
        assert!(run(&db, &["users"]).unwrap().contains("No users yet"));
        run(&db, &["add", "Bob", "debit", "3", "x"]).unwrap();
        run(&db, &["add", "Alice", "debit", "3", "x"]).unwrap();
        assert_eq!(run(&db, &["users"]).unwrap(), "Alice\nBob\n");
    }

    #[test]
    fn test_unknown_command_errors() {
        let (_dir, db) = setup();
        assert!(run(&db, &["export"]).is_err());
        assert!(run(&db, &["--version"]).unwrap().starts_with("expense-tracker "));
    }
}
