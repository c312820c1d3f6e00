use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Storage format of `Transaction::date`, e.g. `"07/03/2024"`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Bounds accepted by the amount inputs (UI and CLI).
pub const AMOUNT_MIN: u32 = 1;
pub const AMOUNT_MAX: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "Credit",
            Self::Debit => "Debit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "c" => Some(Self::Credit),
            "debit" | "d" => Some(Self::Debit),
            _ => None,
        }
    }

    /// Infer the type from a signed amount. Zero counts as a credit.
    pub fn from_amount(amount: Decimal) -> Self {
        if amount < Decimal::ZERO {
            Self::Debit
        } else {
            Self::Credit
        }
    }

    pub fn all() -> &'static [TransactionType] {
        &[Self::Credit, Self::Debit]
    }

    /// Apply the sign convention: debits are negative, credits positive.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount.abs(),
            Self::Debit => -amount.abs(),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub user: String,
    /// Format: `DATE_FORMAT`
    pub date: String,
    pub amount: Decimal,
    pub category: String,
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Build an unsaved transaction dated `date`, with the amount's sign
    /// normalized by `transaction_type`.
    pub fn new(
        user: String,
        amount: Decimal,
        category: String,
        transaction_type: TransactionType,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            user,
            date: date.format(DATE_FORMAT).to_string(),
            amount: transaction_type.signed(amount),
            category,
            transaction_type,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Sum of the signed amounts of `transactions`.
pub fn net_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(|t| t.amount).sum()
}
