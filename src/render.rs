//! Plain-text rendering of lists, pagination footers and dashboard figures.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::FixedOffset;
use common::time::epoch_seconds_to_utc;
use common::{CategoryDto, EpochSeconds, MoneyNoteDto};
use compute::budget::BudgetUsage;
use compute::currency::format_vnd;
use compute::dashboard::{CategorySlice, DailyLimitStatus, PeriodSummary};
use compute::pagination::{PageItem, Paginator};

pub fn category_names(categories: &[CategoryDto]) -> HashMap<i64, &str> {
    categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect()
}

fn local_datetime(epoch: EpochSeconds, tz: &FixedOffset) -> String {
    epoch_seconds_to_utc(epoch)
        .map(|dt| dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| "-".to_string())
}

pub fn money_notes_table(
    notes: &[MoneyNoteDto],
    names: &HashMap<i64, &str>,
    tz: &FixedOffset,
) -> String {
    if notes.is_empty() {
        return "No transactions.\n".to_string();
    }

    let mut out = format!(
        "{:>6}  {:<16}  {:<24}  {:<16}  {:>14}\n",
        "ID", "Date", "Note", "Category", "Amount"
    );
    for note in notes {
        let sign = match note.kind {
            common::TransactionType::Expense => "-",
            common::TransactionType::Income => "+",
        };
        let _ = writeln!(
            out,
            "{:>6}  {:<16}  {:<24}  {:<16}  {:>14}",
            note.id,
            local_datetime(note.date, tz),
            truncate(&note.note, 24),
            truncate(names.get(&note.category_id).copied().unwrap_or("-"), 16),
            format!("{}{}", sign, format_vnd(note.amount)),
        );
    }
    out
}

/// `Showing 11-20 of 23 | Page 2/3 | 1 [2] 3`
pub fn pagination_footer(paginator: &Paginator) -> String {
    let state = paginator.state();
    let shown = match state.end_index {
        Some(end) => format!(
            "Showing {}-{} of {}",
            state.start_index + 1,
            end + 1,
            state.total_items
        ),
        None => "Showing 0 of 0".to_string(),
    };

    let pages = paginator
        .page_items()
        .iter()
        .map(|item| match item {
            PageItem::Page(page) if *page == state.current_page => format!("[{}]", page),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{} | Page {}/{} | {}",
        shown, state.current_page, state.total_pages, pages
    )
}

pub fn categories_table(categories: &[CategoryDto]) -> String {
    if categories.is_empty() {
        return "No categories.\n".to_string();
    }

    let mut out = format!("{:>6}  {:<20}  {:<8}\n", "ID", "Name", "Type");
    for category in categories {
        let _ = writeln!(
            out,
            "{:>6}  {:<20}  {:<8}",
            category.id,
            category.name,
            category.kind.label()
        );
    }
    out
}

pub fn usage_table(usages: &[BudgetUsage]) -> String {
    if usages.is_empty() {
        return "Nothing configured.\n".to_string();
    }

    let mut out = format!(
        "{:>6}  {:<20}  {:<16}  {:>14}  {:>14}  {:>14}  {:>7}  {:<8}\n",
        "ID", "Title", "Category", "Limit", "Spent", "Remaining", "Used", "Status"
    );
    for usage in usages {
        let metrics = &usage.metrics;
        let _ = writeln!(
            out,
            "{:>6}  {:<20}  {:<16}  {:>14}  {:>14}  {:>14}  {:>6.1}%  {:<8}",
            usage.id,
            truncate(&usage.title, 20),
            truncate(&usage.category_name, 16),
            format_vnd(metrics.threshold),
            format_vnd(metrics.spent_amount),
            format_vnd(metrics.remaining_amount),
            metrics.percentage_used,
            usage.severity().map(|severity| severity.label()).unwrap_or("ok"),
        );
    }
    out
}

pub fn breakdown(slices: &[CategorySlice]) -> String {
    if slices.is_empty() {
        return "No expenses in this period.\n".to_string();
    }

    let mut out = String::new();
    for slice in slices {
        let _ = writeln!(
            out,
            "{:<16}  {:>14}  {:>5.1}%  {}",
            truncate(&slice.label, 16),
            format_vnd(slice.amount),
            slice.percentage,
            slice.color
        );
    }
    out
}

pub fn period_summary(summary: &PeriodSummary) -> String {
    format!(
        "Expense: {}  Income: {}  Balance: {}  Transactions: {}  Avg/day: {}\n",
        format_vnd(summary.total_expense),
        format_vnd(summary.total_income),
        format_vnd(summary.balance()),
        summary.transaction_count,
        format_vnd(summary.average_per_day.round() as i64),
    )
}

pub fn daily_limit(status: &DailyLimitStatus) -> String {
    format!(
        "Today: {} of {} ({:.0}%), {} left{}\n",
        format_vnd(status.spent),
        format_vnd(status.limit),
        status.percent,
        format_vnd(status.remaining),
        if status.within_limit { "" } else { ", over the limit" }
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_footer() {
        let paginator = Paginator::new(23, 10).with_initial_page(2);
        assert_eq!(
            pagination_footer(&paginator),
            "Showing 11-20 of 23 | Page 2/3 | 1 [2] 3"
        );

        let empty = Paginator::new(0, 10);
        assert_eq!(pagination_footer(&empty), "Showing 0 of 0 | Page 1/1 | [1]");

        let long = Paginator::new(200, 10).with_initial_page(10);
        assert!(pagination_footer(&long).ends_with("1 ... 9 [10] 11 ... 20"));
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Ăn trưa", 10), "Ăn trưa");
        assert_eq!(truncate("Breakfast with friends", 10), "Breakfast…");
    }

    #[test]
    fn test_daily_limit_line() {
        let line = daily_limit(&DailyLimitStatus::new(200_000, 250_000));
        assert_eq!(line, "Today: 250.000₫ of 200.000₫ (100%), 0₫ left, over the limit\n");
    }

    #[test]
    fn test_empty_breakdown() {
        assert_eq!(breakdown(&[]), "No expenses in this period.\n");
    }
}
