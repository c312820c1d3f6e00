mod schema;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, Row};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

use crate::models::*;

const SELECT_COLUMNS: &str =
    "SELECT id, user, date, amount, category, transaction_type FROM expenses";

/// Handle to the expenses file. No connection is held between calls: every
/// operation opens its own and drops it before returning.
pub(crate) struct Database {
    path: PathBuf,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let db = Self {
            path: path.to_path_buf(),
        };
        db.init()
            .with_context(|| format!("Failed to initialize database: {}", path.display()))?;
        Ok(db)
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path)
            .with_context(|| format!("Failed to open database: {}", self.path.display()))
    }

    /// Create the table if it is missing. Safe to call on every start.
    pub(crate) fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        conn.execute_batch(schema::SCHEMA)?;
        tracing::debug!(path = %self.path.display(), "database ready");
        Ok(())
    }

    // ── Writes ────────────────────────────────────────────────

    /// Record a transaction dated today (local time).
    pub(crate) fn add_transaction(
        &self,
        user: &str,
        amount: Decimal,
        category: &str,
        transaction_type: TransactionType,
    ) -> Result<i64> {
        let txn = Transaction::new(
            user.to_string(),
            amount,
            category.to_string(),
            transaction_type,
            Local::now().date_naive(),
        );
        self.insert_transaction(&txn)
    }

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO expenses (user, date, amount, category, transaction_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                txn.user,
                txn.date,
                txn.amount.to_f64().unwrap_or_default(),
                txn.category,
                txn.transaction_type.as_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(
            id,
            user = %txn.user,
            amount = %txn.amount,
            kind = %txn.transaction_type,
            "transaction added"
        );
        Ok(id)
    }

    /// Delete the `index`-th (zero-based) of `user`'s rows in id order, which
    /// is the order `filter_by_period(user, Period::All)` returns them in.
    pub(crate) fn delete_at_position(&self, user: &str, index: usize) -> Result<usize> {
        let conn = self.connect()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = (
                 SELECT id FROM expenses WHERE user = ?1 ORDER BY id LIMIT 1 OFFSET ?2
             )",
            params![user, index as i64],
        )?;
        tracing::info!(user, index, deleted, "delete by position");
        Ok(deleted)
    }

    pub(crate) fn delete_transaction(&self, user: &str, id: i64) -> Result<usize> {
        let conn = self.connect()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND user = ?2",
            params![id, user],
        )?;
        tracing::info!(user, id, deleted, "delete by id");
        Ok(deleted)
    }

    // ── Reads ─────────────────────────────────────────────────

    /// Every row of every user, oldest first.
    pub(crate) fn read_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_users(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT user FROM expenses WHERE user IS NOT NULL ORDER BY user",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn filter_by_period(&self, user: &str, period: Period) -> Result<Vec<Transaction>> {
        self.filter_by_period_on(user, period, Local::now().date_naive())
    }

    /// `user`'s rows that fall in `period` as seen from `today`, oldest first.
    pub(crate) fn filter_by_period_on(
        &self,
        user: &str,
        period: Period,
        today: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let filtered: Vec<Transaction> = self
            .read_transactions()?
            .into_iter()
            .filter(|t| t.user == user)
            .filter(|t| {
                let date = t.parsed_date();
                if date.is_none() && period != Period::All {
                    tracing::warn!(id = ?t.id, date = %t.date, "skipping row with unreadable date");
                }
                period.contains(date, today)
            })
            .collect();
        tracing::debug!(user, %period, rows = filtered.len(), "filtered transactions");
        Ok(filtered)
    }
}

/// Columns are nullable, so missing values fall back to empty/zero and an
/// unknown type is inferred from the amount's sign.
fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let amount = row
        .get::<_, Option<f64>>(3)?
        .and_then(Decimal::from_f64)
        .unwrap_or_default();
    let kind: Option<String> = row.get(5)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        user: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        date: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        amount,
        category: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        transaction_type: kind
            .as_deref()
            .and_then(TransactionType::parse)
            .unwrap_or_else(|| TransactionType::from_amount(amount)),
    })
}
