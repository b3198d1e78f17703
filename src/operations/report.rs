use crate::db::repository;
use crate::error::{LedgerError, Result};
use crate::models::category::category_rank;
use crate::models::transaction::{Transaction, TransactionType};
use chrono::Datelike;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

pub const TOTAL_INCOME_LABEL: &str = "Total Income";
pub const TOTAL_EXPENSES_LABEL: &str = "Total Expenses";
pub const AMOUNT_SAVED_LABEL: &str = "Amount Saved";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub saved: Decimal,
}

impl Totals {
    pub fn trailer_rows(&self) -> [(&'static str, Decimal); 3] {
        [
            (TOTAL_INCOME_LABEL, self.income),
            (TOTAL_EXPENSES_LABEL, self.expenses),
            (AMOUNT_SAVED_LABEL, self.saved),
        ]
    }
}

/// Adds `amount` to a running sum, failing instead of panicking when the
/// result leaves the `Decimal` range.
pub fn add_amount(sum: Decimal, amount: Decimal) -> Result<Decimal> {
    sum.checked_add(amount).ok_or(LedgerError::AmountOverflow)
}

pub fn compute_totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Result<Totals> {
    let mut totals = Totals::default();
    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => totals.income = add_amount(totals.income, transaction.amount)?,
            TransactionType::Expense => totals.expenses = add_amount(totals.expenses, transaction.amount)?,
        }
    }
    totals.saved = totals
        .income
        .checked_sub(totals.expenses)
        .ok_or(LedgerError::AmountOverflow)?;
    Ok(totals)
}

/// Sum of all amounts sharing one (category, type, description).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub category: String,
    pub transaction_type: TransactionType,
    pub description: String,
    pub amount: Decimal,
}

/// A line of the rendered report; trailer rows leave type and description blank.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub category: String,
    pub transaction_type: String,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub groups: Vec<GroupRow>,
    pub totals: Totals,
}

impl MonthlyReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group rows followed by the income, expense and saved trailers.
    pub fn rows(&self) -> Vec<ReportRow> {
        let groups = self.groups.iter().map(|g| ReportRow {
            category: g.category.clone(),
            transaction_type: g.transaction_type.to_string(),
            description: g.description.clone(),
            amount: g.amount,
        });
        let trailers = self.totals.trailer_rows().into_iter().map(|(label, amount)| ReportRow {
            category: label.to_string(),
            transaction_type: String::new(),
            description: String::new(),
            amount,
        });
        groups.chain(trailers).collect()
    }
}

pub fn in_month(transaction: &Transaction, month: u32, year: i32) -> bool {
    transaction.date.month() == month && transaction.date.year() == year
}

pub fn build_monthly_report(transactions: &[Transaction], month: u32, year: i32) -> Result<MonthlyReport> {
    let monthly: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| in_month(t, month, year))
        .collect();

    let totals = compute_totals(monthly.iter().copied())?;

    // BTreeMap keeps the secondary ordering: category, type, description.
    let mut grouped: BTreeMap<(String, &'static str, String), (TransactionType, Decimal)> = BTreeMap::new();
    for transaction in &monthly {
        let key = (
            transaction.category.clone(),
            transaction.transaction_type.as_str(),
            transaction.description.clone(),
        );
        let entry = grouped
            .entry(key)
            .or_insert((transaction.transaction_type, Decimal::ZERO));
        entry.1 = add_amount(entry.1, transaction.amount)?;
    }

    let mut groups: Vec<GroupRow> = grouped
        .into_iter()
        .map(|((category, _, description), (transaction_type, amount))| GroupRow {
            category,
            transaction_type,
            description,
            amount,
        })
        .collect();
    groups.sort_by_key(|g| category_rank(&g.category));

    Ok(MonthlyReport {
        month,
        year,
        groups,
        totals,
    })
}

/// Builds the report for one month. A month without transactions is
/// `EmptyResult` rather than a table holding only zero totals.
pub fn generate_monthly_report(conn: &Connection, month: u32, year: i32) -> Result<MonthlyReport> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::InvalidInput(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }

    let transactions = repository::get_all_transactions(conn)?;
    debug!(snapshot = transactions.len(), month, year, "building monthly report");

    let report = build_monthly_report(&transactions, month, year)?;
    if report.is_empty() {
        return Err(LedgerError::EmptyResult { month, year });
    }

    info!(month, year, groups = report.groups.len(), "monthly report generated");
    Ok(report)
}

impl fmt::Display for MonthlyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let category_width = rows.iter().map(|r| r.category.len()).max().unwrap_or(0).max(8);
        let description_width = rows.iter().map(|r| r.description.len()).max().unwrap_or(0).max(11);

        writeln!(f, "Monthly report {:02}/{}", self.month, self.year)?;
        writeln!(
            f,
            "{:<cw$}  {:<8}  {:<dw$}  {:>12}",
            "Category",
            "Type",
            "Description",
            "Amount",
            cw = category_width,
            dw = description_width
        )?;
        for row in &rows {
            writeln!(
                f,
                "{:<cw$}  {:<8}  {:<dw$}  {:>12.2}",
                row.category,
                row.transaction_type,
                row.description,
                row.amount,
                cw = category_width,
                dw = description_width
            )?;
        }
        Ok(())
    }
}
