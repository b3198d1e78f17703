use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("Invalid transaction type '{}'. Use 'income' or 'expense'.", other)),
        }
    }
}

/// A stored ledger entry. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub transaction_type: TransactionType,
    pub description: String,
}

/// The user-supplied fields of a transaction before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub transaction_type: TransactionType,
    pub description: String,
}

impl NewTransaction {
    /// Surrounding whitespace is dropped from the description so every front
    /// end stores and compares the same text.
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        category: impl Into<String>,
        transaction_type: TransactionType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
            transaction_type,
            description: description.into().trim().to_string(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<5} {}  {:>12.2}  {:<10} {:<8} {}",
            self.id, self.date, self.amount, self.category, self.transaction_type, self.description
        )
    }
}
