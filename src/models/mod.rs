mod period;
mod transaction;

pub use period::Period;
pub use transaction::{
    net_balance, Transaction, TransactionType, AMOUNT_MAX, AMOUNT_MIN, DATE_FORMAT,
};
