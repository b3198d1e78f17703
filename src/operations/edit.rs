use crate::db::repository;
use crate::error::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    /// Neither field was supplied; the record exists and was not touched.
    Unchanged,
}

/// Overwrites the amount and/or description of `id`. Date, category and type
/// cannot be changed once recorded.
pub fn edit_transaction(
    conn: &Connection,
    id: i64,
    new_amount: Option<Decimal>,
    new_description: Option<String>,
) -> Result<EditOutcome> {
    if new_amount.is_none() && new_description.is_none() {
        repository::get_transaction(conn, id)?;
        return Ok(EditOutcome::Unchanged);
    }

    repository::update_transaction(conn, id, new_amount, new_description.as_deref().map(str::trim))?;
    info!(id, "transaction updated");
    Ok(EditOutcome::Updated)
}
