use crate::db::repository;
use crate::error::{LedgerError, Result};
use crate::models::transaction::{NewTransaction, TransactionType};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Parses `date(YYYY-MM-DD), amount, category, type(income/expense)[, description]`.
pub fn parse_transaction(input: &str) -> Result<NewTransaction> {
    let parts: Vec<&str> = input.splitn(5, ',').map(|s| s.trim()).collect();
    if parts.len() < 4 {
        return Err(LedgerError::InvalidInput(format!(
            "Expected at least 4 details separated by commas but got {}",
            parts.len()
        )));
    }

    let date = NaiveDate::parse_from_str(parts[0], "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidInput("Invalid date format. Please use YYYY-MM-DD.".to_string()))?;

    let amount = parts[1].parse::<Decimal>().map_err(|_| {
        LedgerError::InvalidInput(format!(
            "Invalid amount format {}. Please provide a valid decimal number.",
            parts[1]
        ))
    })?;

    let category = parts[2];
    if category.is_empty() {
        return Err(LedgerError::InvalidInput("Category cannot be empty".to_string()));
    }

    let transaction_type = parts[3]
        .parse::<TransactionType>()
        .map_err(LedgerError::InvalidInput)?;

    let description = parts.get(4).copied().unwrap_or("");

    Ok(NewTransaction::new(date, amount, category, transaction_type, description))
}

/// Stores `transaction` and returns its id, or `DuplicateTransaction` if an
/// entry with the same date, category, type and description already exists.
pub fn add_transaction(conn: &Connection, transaction: &NewTransaction) -> Result<i64> {
    if let Some(existing) = repository::find_duplicate(conn, transaction)? {
        warn!(existing_id = existing.id, "duplicate transaction rejected");
        return Err(duplicate_of(transaction));
    }

    let id = repository::insert_transaction(conn, transaction)?;
    info!(id, category = %transaction.category, "transaction added");
    Ok(id)
}

fn duplicate_of(transaction: &NewTransaction) -> LedgerError {
    LedgerError::DuplicateTransaction {
        date: transaction.date,
        category: transaction.category.clone(),
        transaction_type: transaction.transaction_type,
        description: transaction.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use std::str::FromStr;

    #[test]
    fn test_parse_transaction_success() {
        let tx = parse_transaction("2024-01-05, 2000, Salary, income, Jan pay").unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(tx.amount, Decimal::new(2000, 0));
        assert_eq!(tx.category, "Salary");
        assert_eq!(tx.transaction_type, TransactionType::Income);
        assert_eq!(tx.description, "Jan pay");
    }

    #[test]
    fn test_parse_transaction_description_optional_and_may_contain_commas() {
        let tx = parse_transaction("2024-01-10,500,Rent,Expense").unwrap();
        assert_eq!(tx.description, "");

        let tx = parse_transaction("2024-01-10,500,Rent,Expense,flat, March").unwrap();
        assert_eq!(tx.description, "flat, March");
    }

    #[test]
    fn test_parse_transaction_invalid_date() {
        let err = parse_transaction("05/01/2024,1,Rent,expense,x").unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_parse_transaction_invalid_amount() {
        let err = parse_transaction("2024-01-05,abc,Rent,expense,x").unwrap_err();
        assert!(err.to_string().contains("Invalid amount"));
    }

    #[test]
    fn test_parse_transaction_invalid_type() {
        let err = parse_transaction("2024-01-05,1,Rent,transfer,x").unwrap_err();
        assert!(err.to_string().contains("Invalid transaction type"));
    }

    #[test]
    fn test_parse_transaction_too_few_fields() {
        assert!(matches!(
            parse_transaction("2024-01-05,1"),
            Err(LedgerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_add_transaction_increases_count_by_one() {
        let conn = establish_test_connection().unwrap();
        let tx = parse_transaction("2024-01-05,2000,Salary,income,Jan pay").unwrap();

        let id = add_transaction(&conn, &tx).unwrap();

        let all = repository::get_all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].amount, tx.amount);
        assert_eq!(all[0].description, tx.description);
    }

    #[test]
    fn test_add_transaction_duplicate_leaves_store_unchanged() {
        let conn = establish_test_connection().unwrap();
        let tx = parse_transaction("2024-01-10,500,Rent,expense").unwrap();
        add_transaction(&conn, &tx).unwrap();

        let mut same_key = tx.clone();
        same_key.amount = Decimal::from_str("999.99").unwrap();
        let result = add_transaction(&conn, &same_key);

        assert!(matches!(result, Err(LedgerError::DuplicateTransaction { .. })));
        let all = repository::get_all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, Decimal::new(500, 0));
    }

    #[test]
    fn test_add_transaction_accepts_any_amount_and_category() {
        let conn = establish_test_connection().unwrap();
        let tx = parse_transaction("2019-12-31,-3.50,Pets,expense,vet").unwrap();
        assert!(add_transaction(&conn, &tx).is_ok());
    }
}
