use super::report::{compute_totals, Totals};
use crate::db::repository;
use crate::error::{LedgerError, Result};
use crate::models::transaction::Transaction;
use chrono::Datelike;
use rusqlite::Connection;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

const SHEET_COLUMNS: [&str; 5] = ["date", "amount", "category", "type", "description"];
const CSV_COLUMNS: [&str; 6] = ["id", "date", "amount", "category", "type", "description"];

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub sheets: Vec<String>,
}

pub fn sheet_name(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

/// Groups transactions by (year, month), oldest first; each month is in date order.
pub fn group_by_month(transactions: &[Transaction]) -> BTreeMap<(i32, u32), Vec<&Transaction>> {
    let mut months: BTreeMap<(i32, u32), Vec<&Transaction>> = BTreeMap::new();
    for transaction in transactions {
        months
            .entry((transaction.date.year(), transaction.date.month()))
            .or_default()
            .push(transaction);
    }
    for records in months.values_mut() {
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    }
    months
}

/// Writes one worksheet per month present in the store, each followed by
/// the month's income, expense and saved totals.
pub fn export_to_excel(conn: &Connection, path: impl AsRef<Path>) -> Result<ExportSummary> {
    let path = path.as_ref();
    let transactions = repository::get_all_transactions(conn)?;
    if transactions.is_empty() {
        return Err(LedgerError::NothingToExport);
    }

    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    let mut workbook = Workbook::new();
    let mut sheets = Vec::new();
    for ((year, month), records) in group_by_month(&transactions) {
        let name = sheet_name(year, month);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_month_sheet(worksheet, &records, &header, &money)?;
        sheets.push(name);
    }

    workbook.save(path)?;
    info!(path = %path.display(), sheets = sheets.len(), "workbook exported");

    Ok(ExportSummary {
        path: path.to_path_buf(),
        sheets,
    })
}

fn write_month_sheet(
    worksheet: &mut Worksheet,
    records: &[&Transaction],
    header: &Format,
    money: &Format,
) -> Result<()> {
    for (col, title) in SHEET_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    let mut row: u32 = 1;
    for record in records {
        worksheet.write_string(row, 0, record.date.format("%Y-%m-%d").to_string())?;
        worksheet.write_number_with_format(row, 1, record.amount.to_f64().unwrap_or_default(), money)?;
        worksheet.write_string(row, 2, &record.category)?;
        worksheet.write_string(row, 3, record.transaction_type.as_str())?;
        worksheet.write_string(row, 4, &record.description)?;
        row += 1;
    }

    let totals: Totals = compute_totals(records.iter().copied())?;
    for (label, amount) in totals.trailer_rows() {
        worksheet.write_string(row, 0, label)?;
        worksheet.write_number_with_format(row, 1, amount.to_f64().unwrap_or_default(), money)?;
        row += 1;
    }

    worksheet.set_column_width(0, 16)?;
    worksheet.set_column_width(4, 30)?;
    Ok(())
}

/// Dumps every transaction into a single CSV file; returns the row count.
pub fn export_to_csv(conn: &Connection, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let transactions = repository::get_all_transactions(conn)?;
    if transactions.is_empty() {
        return Err(LedgerError::NothingToExport);
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_COLUMNS)?;
    for transaction in &transactions {
        writer.write_record([
            transaction.id.to_string(),
            transaction.date.format("%Y-%m-%d").to_string(),
            transaction.amount.to_string(),
            transaction.category.clone(),
            transaction.transaction_type.to_string(),
            transaction.description.clone(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = transactions.len(), "csv exported");
    Ok(transactions.len())
}
