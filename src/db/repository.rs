use crate::error::{LedgerError, Result};
use crate::models::transaction::{NewTransaction, Transaction, TransactionType};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::str::FromStr;

const SELECT_COLUMNS: &str = "SELECT id, date, amount, category, type, description FROM transactions";

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(1)?;
    let amount_str: String = row.get(2)?;
    let type_str: String = row.get(4)?;

    Ok(Transaction {
        id: row.get(0)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| conversion_error(1, e))?,
        amount: Decimal::from_str(&amount_str).map_err(|e| conversion_error(2, e))?,
        category: row.get(3)?,
        transaction_type: TransactionType::from_str(&type_str)
            .map_err(|e| conversion_error(4, std::io::Error::other(e)))?,
        description: row.get(5)?,
    })
}

/// Inserts `transaction` unless a record with the same date, category, type and
/// description exists. Check and insert run as one statement.
pub fn insert_transaction(conn: &Connection, transaction: &NewTransaction) -> Result<i64> {
    let inserted = conn.execute(
        "INSERT INTO transactions (date, amount, category, type, description)
         SELECT ?1, ?2, ?3, ?4, ?5
         WHERE NOT EXISTS (
             SELECT 1 FROM transactions
             WHERE date = ?1 AND category = ?3 AND type = ?4 AND description = ?5
         )",
        params![
            transaction.date.to_string(),
            transaction.amount.to_string(),
            &transaction.category,
            transaction.transaction_type.as_str(),
            &transaction.description,
        ],
    )?;

    if inserted == 0 {
        return Err(LedgerError::DuplicateTransaction {
            date: transaction.date,
            category: transaction.category.clone(),
            transaction_type: transaction.transaction_type,
            description: transaction.description.clone(),
        });
    }

    Ok(conn.last_insert_rowid())
}

pub fn find_duplicate(conn: &Connection, transaction: &NewTransaction) -> Result<Option<Transaction>> {
    let found = conn
        .query_row(
            &format!(
                "{} WHERE date = ?1 AND category = ?2 AND type = ?3 AND description = ?4 LIMIT 1",
                SELECT_COLUMNS
            ),
            params![
                transaction.date.to_string(),
                &transaction.category,
                transaction.transaction_type.as_str(),
                &transaction.description,
            ],
            row_to_transaction,
        )
        .optional()?;
    Ok(found)
}

pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
    let transactions = stmt
        .query_map([], row_to_transaction)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(transactions)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_COLUMNS),
        [id],
        row_to_transaction,
    )
    .optional()?
    .ok_or(LedgerError::NotFound(id))
}

/// Overwrites whichever of `amount` and `description` is provided.
pub fn update_transaction(
    conn: &Connection,
    id: i64,
    amount: Option<Decimal>,
    description: Option<&str>,
) -> Result<()> {
    let rows_affected = conn.execute(
        "UPDATE transactions
         SET amount = COALESCE(?1, amount), description = COALESCE(?2, description)
         WHERE id = ?3",
        params![amount.map(|a| a.to_string()), description, id],
    )?;

    if rows_affected == 0 {
        return Err(LedgerError::NotFound(id));
    }

    Ok(())
}

pub fn remove_transaction(conn: &Connection, id: i64) -> Result<()> {
    let rows_affected = conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(LedgerError::NotFound(id));
    }

    Ok(())
}

pub fn clear_transactions(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM transactions", [])?)
}
