use crate::cli::{Commands, execute};
use crate::error::{LedgerError, Result};
use crate::operations::add::{add_transaction, parse_transaction};
use crate::operations::remove::parse_transaction_id;
use crate::settings::AppConfig;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

const COMMANDS: &str = "add, list, edit, delete, report, visualize, export, reset, help, exit";

enum ShellCommand {
    Add,
    List,
    Edit,
    Delete,
    Report,
    Visualize,
    Export,
    Reset,
    Help,
    Exit,
}

fn check_for_command(input: &str) -> Option<ShellCommand> {
    match input.to_lowercase().as_str() {
        "add" => Some(ShellCommand::Add),
        "list" | "print" => Some(ShellCommand::List),
        "edit" => Some(ShellCommand::Edit),
        "delete" | "remove" => Some(ShellCommand::Delete),
        "report" => Some(ShellCommand::Report),
        "visualize" | "chart" => Some(ShellCommand::Visualize),
        "export" => Some(ShellCommand::Export),
        "reset" => Some(ShellCommand::Reset),
        "help" | "?" => Some(ShellCommand::Help),
        "exit" | "quit" => Some(ShellCommand::Exit),
        _ => None,
    }
}

/// Reads one trimmed line; `None` at end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> Result<Option<String>> {
    writeln!(out, "{}", message)?;
    out.flush()?;
    read_line(input)
}

/// Line-oriented shell over the same operations as the subcommands. Every
/// failed action is reported and the loop continues.
pub fn run_shell<R: BufRead, W: Write>(
    conn: &Connection,
    config: &AppConfig,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Welcome to the finance tracker!")?;

    loop {
        let Some(line) = prompt(&mut input, out, &format!("Please enter a command ({}):", COMMANDS))? else {
            break;
        };
        let Some(word) = line.split_whitespace().next() else {
            continue;
        };
        let Some(command) = check_for_command(word) else {
            writeln!(out, "Unknown command '{}'. Available: {}", word, COMMANDS)?;
            continue;
        };

        let outcome = match command {
            ShellCommand::Exit => {
                writeln!(out, "Exiting the application.")?;
                break;
            }
            ShellCommand::Help => {
                writeln!(out, "Available commands: {}", COMMANDS)?;
                continue;
            }
            ShellCommand::Add => shell_add(conn, &mut input, out),
            ShellCommand::List => execute(conn, config, Commands::List, out),
            ShellCommand::Edit => shell_edit(conn, config, &mut input, out),
            ShellCommand::Delete => shell_delete(conn, config, &mut input, out),
            ShellCommand::Report => shell_report(conn, config, &mut input, out),
            ShellCommand::Visualize => execute(conn, config, Commands::Visualize, out),
            ShellCommand::Export => execute(conn, config, Commands::Export { output: None, csv: false }, out),
            ShellCommand::Reset => shell_reset(conn, config, &mut input, out),
        };

        if let Err(err) = outcome {
            report_error(out, &err)?;
        }
    }

    Ok(())
}

pub fn report_error(out: &mut impl Write, err: &LedgerError) -> Result<()> {
    if err.is_warning() {
        writeln!(out, "Warning: {}", err)?;
    } else {
        writeln!(out, "Error: {}", err)?;
    }
    Ok(())
}

fn missing_input() -> LedgerError {
    LedgerError::InvalidInput("no input provided".to_string())
}

fn shell_add<R: BufRead, W: Write>(conn: &Connection, input: &mut R, out: &mut W) -> Result<()> {
    let details = prompt(
        input,
        out,
        "Enter transaction details: date(YYYY-MM-DD), amount, category(Salary/Rent/Grocery/Utilities/Other), type(income/expense), description",
    )?
    .ok_or_else(missing_input)?;

    let transaction = parse_transaction(&details)?;
    let id = add_transaction(conn, &transaction)?;
    writeln!(out, "Transaction for {} added successfully with ID {}.", transaction.category, id)?;
    Ok(())
}

fn shell_edit<R: BufRead, W: Write>(conn: &Connection, config: &AppConfig, input: &mut R, out: &mut W) -> Result<()> {
    let id = parse_transaction_id(&prompt(input, out, "Transaction ID to edit:")?.ok_or_else(missing_input)?)?;

    let amount = prompt(input, out, "New amount (blank to keep):")?.ok_or_else(missing_input)?;
    let amount = if amount.is_empty() {
        None
    } else {
        Some(
            amount
                .parse::<Decimal>()
                .map_err(|_| LedgerError::InvalidInput(format!("Invalid amount format {}.", amount)))?,
        )
    };

    let description = prompt(input, out, "New description (blank to keep):")?.ok_or_else(missing_input)?;
    let description = (!description.is_empty()).then_some(description);

    execute(conn, config, Commands::Edit { id, amount, description }, out)
}

fn shell_delete<R: BufRead, W: Write>(conn: &Connection, config: &AppConfig, input: &mut R, out: &mut W) -> Result<()> {
    let id = parse_transaction_id(&prompt(input, out, "Transaction ID to delete:")?.ok_or_else(missing_input)?)?;
    execute(conn, config, Commands::Delete { id }, out)
}

fn shell_report<R: BufRead, W: Write>(conn: &Connection, config: &AppConfig, input: &mut R, out: &mut W) -> Result<()> {
    let line = prompt(input, out, "Enter month and year (e.g. 1 2024):")?.ok_or_else(missing_input)?;
    let parts: Vec<&str> = line.split_whitespace().collect();
    let (month, year) = match parts.as_slice() {
        [month, year] => (
            month
                .parse::<u32>()
                .map_err(|_| LedgerError::InvalidInput(format!("Invalid month '{}'.", month)))?,
            year.parse::<i32>()
                .map_err(|_| LedgerError::InvalidInput(format!("Invalid year '{}'.", year)))?,
        ),
        _ => return Err(LedgerError::InvalidInput("Expected a month and a year.".to_string())),
    };
    execute(conn, config, Commands::Report { month, year: Some(year) }, out)
}

fn shell_reset<R: BufRead, W: Write>(conn: &Connection, config: &AppConfig, input: &mut R, out: &mut W) -> Result<()> {
    let answer = prompt(input, out, "This deletes every transaction. Type 'yes' to confirm:")?.unwrap_or_default();
    execute(conn, config, Commands::Reset { yes: answer == "yes" }, out)
}
