use crate::db::repository;
use crate::error::{LedgerError, Result};
use rusqlite::Connection;
use tracing::{info, warn};

pub fn parse_transaction_id(input: &str) -> Result<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LedgerError::InvalidInput("Transaction ID cannot be empty.".to_string()));
    }
    input
        .parse::<i64>()
        .map_err(|_| LedgerError::InvalidInput(format!("Invalid transaction ID '{}'.", input)))
}

pub fn remove_transaction(conn: &Connection, id: i64) -> Result<()> {
    repository::remove_transaction(conn, id)?;
    info!(id, "transaction deleted");
    Ok(())
}

/// Deletes every transaction. Irreversible.
pub fn reset_database(conn: &Connection) -> Result<usize> {
    let removed = repository::clear_transactions(conn)?;
    warn!(removed, "database reset");
    Ok(removed)
}
