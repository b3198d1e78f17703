use chrono::NaiveDate;
use thiserror::Error;

use crate::models::transaction::TransactionType;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(
        "transaction already exists for {category} on {date} ({transaction_type}, description '{description}')"
    )]
    DuplicateTransaction {
        date: NaiveDate,
        category: String,
        transaction_type: TransactionType,
        description: String,
    },
    #[error("transaction with ID {0} not found")]
    NotFound(i64),
    #[error("no transactions found for {month}/{year}")]
    EmptyResult { month: u32, year: i32 },
    #[error("no transactions to export")]
    NothingToExport,
    #[error("no transactions to visualize")]
    NothingToVisualize,
    #[error("amount total exceeds the supported decimal range")]
    AmountOverflow,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("terminal error: {0}")]
    Terminal(String),
}

impl LedgerError {
    /// Conditions shown as warnings rather than failures.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            LedgerError::DuplicateTransaction { .. }
                | LedgerError::EmptyResult { .. }
                | LedgerError::NothingToExport
                | LedgerError::NothingToVisualize
        )
    }
}
