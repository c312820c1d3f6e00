/// Columns carry no constraints so files written by older versions of the
/// tracker open unchanged.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    user             TEXT,
    date             TEXT,
    amount           REAL,
    category         TEXT,
    transaction_type TEXT
);

CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user);
"#;
