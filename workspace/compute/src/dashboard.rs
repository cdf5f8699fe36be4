//! Figures shown on the dashboard: the category pie chart, the period
//! summary cards and today's spending limit.

use std::collections::HashMap;

use common::time::UtcRange;
use common::{CategoryDto, MoneyNoteDto, RecordStatus, TransactionType};

use crate::budget::{saturating_total, spent_by_category};

/// Pie chart colors, cycled when there are more slices than entries.
pub const PIE_CHART_COLORS: [&str; 8] = [
    "#6366F1", "#22C55E", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#F97316", "#84CC16",
];

pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub category_id: i64,
    pub label: String,
    pub amount: i64,
    /// Share of the total expense, 0..=100.
    pub percentage: f64,
    pub color: &'static str,
}

/// Expense share per category, largest first.
///
/// Returns an empty vector when nothing was spent, so the chart never divides by zero.
pub fn category_breakdown(notes: &[MoneyNoteDto], categories: &[CategoryDto]) -> Vec<CategorySlice> {
    let totals = spent_by_category(notes);
    let total = saturating_total(totals.values().copied());
    if total <= 0 {
        return Vec::new();
    }

    let names: HashMap<i64, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();

    let mut by_category: Vec<(i64, i64)> = totals.into_iter().collect();
    // Ties are ordered by id so the colors stay stable between refetches.
    by_category.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    by_category
        .into_iter()
        .enumerate()
        .map(|(i, (category_id, amount))| CategorySlice {
            category_id,
            label: names
                .get(&category_id)
                .copied()
                .unwrap_or(UNCATEGORIZED_LABEL)
                .to_string(),
            amount,
            percentage: amount as f64 / total as f64 * 100.0,
            color: PIE_CHART_COLORS[i % PIE_CHART_COLORS.len()],
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodSummary {
    pub total_expense: i64,
    pub total_income: i64,
    pub transaction_count: usize,
    /// Expense divided by the number of calendar days in the range.
    pub average_per_day: f64,
}

impl PeriodSummary {
    pub fn balance(&self) -> i64 {
        self.total_income.saturating_sub(self.total_expense)
    }
}

/// Totals over the active notes dated inside `range`.
pub fn summarize_period(notes: &[MoneyNoteDto], range: UtcRange) -> PeriodSummary {
    let mut total_expense: i64 = 0;
    let mut total_income: i64 = 0;
    let mut transaction_count = 0;

    for note in notes
        .iter()
        .filter(|note| note.status != RecordStatus::Inactive && range.contains(note.date))
    {
        transaction_count += 1;
        match note.kind {
            TransactionType::Expense => total_expense = total_expense.saturating_add(note.amount),
            TransactionType::Income => total_income = total_income.saturating_add(note.amount),
        }
    }

    PeriodSummary {
        total_expense,
        total_income,
        transaction_count,
        average_per_day: total_expense as f64 / range.day_count() as f64,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyLimitStatus {
    pub limit: i64,
    pub spent: i64,
    pub remaining: i64,
    /// Capped at 100 for the progress bar.
    pub percent: f64,
    pub within_limit: bool,
}

impl DailyLimitStatus {
    pub fn new(limit: i64, spent: i64) -> Self {
        let percent = if limit > 0 {
            (spent as f64 / limit as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            limit,
            spent,
            remaining: limit.saturating_sub(spent).max(0),
            percent,
            within_limit: spent <= limit,
        }
    }
}
