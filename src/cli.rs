use crate::db::repository;
use crate::error::{LedgerError, Result};
use crate::models::category::Category;
use crate::models::transaction::{NewTransaction, TransactionType};
use crate::operations::add::add_transaction;
use crate::operations::edit::{EditOutcome, edit_transaction};
use crate::operations::export::{export_to_csv, export_to_excel};
use crate::operations::remove::{remove_transaction, reset_database};
use crate::operations::report::generate_monthly_report;
use crate::operations::visualize::run_visualization;
use crate::settings::AppConfig;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;

#[derive(Debug, Parser)]
#[command(name = "fintrack", about = "Personal finance ledger: record income and expenses, report by month, export to Excel.")]
pub struct Cli {
    /// Config file path (TOML). Defaults to ./fintrack.toml when present.
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the SQLite database path.
    #[arg(long, global = true)]
    pub database: Option<String>,
    /// Runs the interactive shell when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Record an income or expense.
    Add {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, allow_hyphen_values = true)]
        amount: Decimal,
        #[arg(long, value_enum)]
        category: Category,
        #[arg(long = "type", value_enum)]
        transaction_type: TransactionType,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List every stored transaction.
    List,
    /// Change the amount and/or description of a transaction.
    Edit {
        id: i64,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<Decimal>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a transaction.
    Delete { id: i64 },
    /// Show the income/expense summary for one month.
    Report {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Pie chart of expenses by category plus savings.
    Visualize,
    /// Write one worksheet per month to an Excel workbook.
    Export {
        /// Defaults to the configured export path
        #[arg(long)]
        output: Option<String>,
        /// Write a flat CSV of all transactions instead
        #[arg(long)]
        csv: bool,
    },
    /// Delete all transactions. Irreversible.
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Interactive shell.
    Shell,
}

/// Runs one command against `conn`, writing user-facing output to `out`.
pub fn execute(conn: &Connection, config: &AppConfig, command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Add {
            date,
            amount,
            category,
            transaction_type,
            description,
        } => {
            let transaction = NewTransaction::new(date, amount, category.as_str(), transaction_type, description);
            let id = add_transaction(conn, &transaction)?;
            writeln!(out, "Transaction for {} added successfully with ID {}.", category, id)?;
        }
        Commands::List => {
            let transactions = repository::get_all_transactions(conn)?;
            if transactions.is_empty() {
                writeln!(out, "No transactions recorded.")?;
            }
            for transaction in &transactions {
                writeln!(out, "{}", transaction)?;
            }
        }
        Commands::Edit {
            id,
            amount,
            description,
        } => match edit_transaction(conn, id, amount, description)? {
            EditOutcome::Updated => writeln!(out, "Transaction with ID {} updated successfully.", id)?,
            EditOutcome::Unchanged => writeln!(out, "Nothing to update for transaction {}.", id)?,
        },
        Commands::Delete { id } => {
            remove_transaction(conn, id)?;
            writeln!(out, "Transaction with ID {} deleted successfully.", id)?;
        }
        Commands::Report { month, year } => {
            let year = year.unwrap_or_else(|| Local::now().year());
            let report = generate_monthly_report(conn, month, year)?;
            write!(out, "{}", report)?;
        }
        Commands::Visualize => run_visualization(conn)?,
        Commands::Export { output, csv } => {
            if csv {
                let path = output.unwrap_or_else(|| "transactions.csv".to_string());
                let rows = export_to_csv(conn, &path)?;
                writeln!(out, "Exported {} transactions to {}.", rows, path)?;
            } else {
                let path = output.unwrap_or_else(|| config.export_path.clone());
                let summary = export_to_excel(conn, &path)?;
                writeln!(
                    out,
                    "Exported {} monthly sheets ({}) to {}.",
                    summary.sheets.len(),
                    summary.sheets.join(", "),
                    summary.path.display()
                )?;
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                return Err(LedgerError::InvalidInput(
                    "Reset not confirmed; nothing was deleted.".to_string(),
                ));
            }
            let removed = reset_database(conn)?;
            writeln!(out, "Database has been reset ({} transactions removed).", removed)?;
        }
        Commands::Shell => {
            let stdin = std::io::stdin();
            crate::shell::run_shell(conn, config, stdin.lock(), out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    fn run(conn: &Connection, command: Commands) -> Result<String> {
        let mut out = Vec::new();
        execute(conn, &AppConfig::default(), command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add_command(date: &str, amount: i64, category: Category, kind: TransactionType) -> Commands {
        Commands::Add {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount: Decimal::new(amount, 0),
            category,
            transaction_type: kind,
            description: String::new(),
        }
    }

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::try_parse_from([
            "fintrack", "add", "--date", "2024-01-05", "--amount", "-12.50", "--category", "grocery", "--type",
            "expense", "--description", "refund",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::Add {
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                amount: Decimal::new(-1250, 2),
                category: Category::Grocery,
                transaction_type: TransactionType::Expense,
                description: "refund".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_category_and_bad_month() {
        assert!(
            Cli::try_parse_from([
                "fintrack", "add", "--date", "2024-01-05", "--amount", "1", "--category", "travel", "--type", "expense",
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["fintrack", "report", "--month", "13", "--year", "2024"]).is_err());
    }

    #[test]
    fn test_no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["fintrack", "--database", "other.db"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.database.as_deref(), Some("other.db"));
    }

    #[test]
    fn test_execute_add_then_duplicate() {
        let conn = establish_test_connection().unwrap();
        let command = add_command("2024-01-05", 2000, Category::Salary, TransactionType::Income);

        let output = run(&conn, command.clone()).unwrap();
        assert!(output.contains("added successfully"));

        let err = run(&conn, command).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateTransaction { .. }));
    }

    #[test]
    fn test_execute_add_description_matches_shell_form() {
        let conn = establish_test_connection().unwrap();
        let mut padded = add_command("2024-01-10", 500, Category::Rent, TransactionType::Expense);
        if let Commands::Add { description, .. } = &mut padded {
            *description = " flat ".to_string();
        }
        run(&conn, padded).unwrap();

        let shell_form = crate::operations::add::parse_transaction("2024-01-10,700,Rent,expense,flat").unwrap();
        let err = add_transaction(&conn, &shell_form).unwrap_err();

        assert!(matches!(err, LedgerError::DuplicateTransaction { .. }));
        assert_eq!(repository::get_transaction(&conn, 1).unwrap().description, "flat");
    }

    #[test]
    fn test_execute_edit_without_fields_on_missing_id() {
        let conn = establish_test_connection().unwrap();
        let err = run(
            &conn,
            Commands::Edit {
                id: 999,
                amount: None,
                description: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(999)));
    }

    #[test]
    fn test_execute_report_prints_table() {
        let conn = establish_test_connection().unwrap();
        run(&conn, add_command("2024-01-05", 2000, Category::Salary, TransactionType::Income)).unwrap();
        run(&conn, add_command("2024-01-10", 500, Category::Rent, TransactionType::Expense)).unwrap();

        let output = run(&conn, Commands::Report { month: 1, year: Some(2024) }).unwrap();

        let salary = output.find("Salary").unwrap();
        let rent = output.find("Rent").unwrap();
        assert!(salary < rent);
        assert!(output.contains("1500.00"));
    }

    #[test]
    fn test_execute_reset_requires_confirmation() {
        let conn = establish_test_connection().unwrap();
        run(&conn, add_command("2024-01-05", 2000, Category::Salary, TransactionType::Income)).unwrap();

        assert!(run(&conn, Commands::Reset { yes: false }).is_err());
        assert_eq!(repository::get_all_transactions(&conn).unwrap().len(), 1);

        run(&conn, Commands::Reset { yes: true }).unwrap();
        assert!(repository::get_all_transactions(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_execute_export_uses_given_path() {
        let conn = establish_test_connection().unwrap();
        run(&conn, add_command("2024-01-05", 2000, Category::Salary, TransactionType::Income)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let output = run(
            &conn,
            Commands::Export {
                output: Some(path.to_string_lossy().into_owned()),
                csv: false,
            },
        )
        .unwrap();

        assert!(path.exists());
        assert!(output.contains("2024-01"));
    }
}
