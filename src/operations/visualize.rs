use super::report::{add_amount, compute_totals, AMOUNT_SAVED_LABEL};
use crate::db::repository;
use crate::error::{LedgerError, Result};
use crate::models::transaction::{Transaction, TransactionType};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use ratatui::widgets::canvas::{Canvas, Points};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;
use std::io;
use tracing::debug;

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightMagenta,
    Color::LightBlue,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub amount: Decimal,
    pub color: Color,
}

/// All-time income and expenses, with expenses split by category.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBreakdown {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub saved_amount: Decimal,
    /// One slice per expense category, then the saved amount.
    pub slices: Vec<Slice>,
}

impl ExpenseBreakdown {
    /// Sum of the slices that draw an area; negative slices are legend-only.
    pub fn drawable_total(&self) -> Decimal {
        self.slices
            .iter()
            .map(|s| s.amount.max(Decimal::ZERO))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

pub fn build_breakdown(transactions: &[Transaction]) -> Result<ExpenseBreakdown> {
    let totals = compute_totals(transactions)?;

    let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    for transaction in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
    {
        let sum = by_category.entry(transaction.category.as_str()).or_insert(Decimal::ZERO);
        *sum = add_amount(*sum, transaction.amount)?;
    }

    let mut slices: Vec<Slice> = by_category
        .into_iter()
        .enumerate()
        .map(|(idx, (category, amount))| Slice {
            label: category.to_string(),
            amount,
            color: PALETTE[idx % PALETTE.len()],
        })
        .collect();
    slices.push(Slice {
        label: AMOUNT_SAVED_LABEL.to_string(),
        amount: totals.saved,
        color: Color::Green,
    });

    Ok(ExpenseBreakdown {
        total_income: totals.income,
        total_expenses: totals.expenses,
        saved_amount: totals.saved,
        slices,
    })
}

pub fn run_visualization(conn: &Connection) -> Result<()> {
    let transactions = repository::get_all_transactions(conn)?;
    if transactions.is_empty() {
        return Err(LedgerError::NothingToVisualize);
    }

    let breakdown = build_breakdown(&transactions)?;
    debug!(slices = breakdown.slices.len(), "rendering expense breakdown");
    render_breakdown(&breakdown)
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Terminal(format!("{}: {}", context, err))
}

fn render_breakdown(data: &ExpenseBreakdown) -> Result<()> {
    enable_raw_mode().map_err(|e| terminal_error("Failed to enable raw mode", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| terminal_error("Failed to enter alternate screen", e))?;

    let result = (|| -> Result<()> {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| terminal_error("Failed to initialize terminal", e))?;

        loop {
            terminal
                .draw(|frame| {
                    let layout = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .split(frame.area());

                    render_pie_chart(frame, layout[0], data);
                    render_legend(frame, layout[1], data);
                })
                .map_err(|e| terminal_error("Failed to draw terminal UI", e))?;

            if event::poll(std::time::Duration::from_millis(250))
                .map_err(|e| terminal_error("Failed to poll input", e))?
            {
                match event::read().map_err(|e| terminal_error("Failed to read input", e))? {
                    Event::Key(key) if key.kind == KeyEventKind::Release => {}
                    Event::Key(key) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => break,
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| terminal_error("Failed to disable raw mode", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).map_err(|e| terminal_error("Failed to leave alternate screen", e))?;

    result
}

fn render_pie_chart(frame: &mut ratatui::Frame, area: Rect, data: &ExpenseBreakdown) {
    let block = Block::default()
        .title("Expenses and savings (press q to exit)")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let total = data.drawable_total().to_f64().unwrap_or(0.0);
    if total <= 0.0 {
        let empty = Paragraph::new("Nothing to draw").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    // Start at 12 o'clock and sweep counter-clockwise.
    let mut start_angle = std::f64::consts::FRAC_PI_2;
    let mut arcs = Vec::new();
    for slice in &data.slices {
        let value = slice.amount.to_f64().unwrap_or(0.0).max(0.0);
        let sweep = value / total * std::f64::consts::TAU;
        arcs.push((start_angle, start_angle + sweep, slice.color));
        start_angle += sweep;
    }

    let canvas = Canvas::default()
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (start, end, color) in &arcs {
                let mut points = Vec::new();
                let mut r = 0.0;
                while r <= 1.0 {
                    let mut angle = *start;
                    while angle <= *end {
                        points.push((r * angle.cos(), r * angle.sin()));
                        angle += 0.05;
                    }
                    r += 0.04;
                }
                if !points.is_empty() {
                    ctx.draw(&Points { coords: &points, color: *color });
                }
            }
        });

    frame.render_widget(canvas, inner);
}

fn render_legend(frame: &mut ratatui::Frame, area: Rect, data: &ExpenseBreakdown) {
    let block = Block::default().title("Breakdown").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bold = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let total = data.drawable_total();

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{:15}", "Slice"), bold),
        Span::styled(format!("{:>12}", "Amount"), bold),
        Span::styled(format!("{:>8}", "Share"), bold),
    ])];

    for slice in &data.slices {
        let share = if total > Decimal::ZERO && slice.amount > Decimal::ZERO {
            format!("{:.1}%", slice.amount / total * Decimal::ONE_HUNDRED)
        } else {
            "-".to_string()
        };
        let style = Style::default().fg(slice.color);
        lines.push(Line::from(vec![
            Span::styled(format!("{:15}", slice.label), style),
            Span::styled(format!("{:>12.2}", slice.amount), style),
            Span::styled(format!("{:>8}", share), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!("Total income:   {:.2}", data.total_income)));
    lines.push(Line::from(format!("Total expenses: {:.2}", data.total_expenses)));
    lines.push(Line::from(format!("Amount saved:   {:.2}", data.saved_amount)));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}
