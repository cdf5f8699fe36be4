//! Spend metrics and warning tiers for budget alerts.
//!
//! The evaluation is pure: callers pass the alerts, categories and money notes
//! they currently hold (an empty slice for anything not loaded yet) and get the
//! derived numbers back. The "already notified" bookkeeping lives in
//! [`ShownAlerts`], owned by the caller and passed in on every recomputation.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeZone};
use common::time::{self, UtcRange};
use common::{
    AlertDto, AlertPeriod, BudgetWithCategoryDto, CategoryDto, CreateAlertRequest, MoneyNoteDto,
    RecordStatus,
};
use tracing::{debug, instrument};
use validator::Validate;

use crate::currency::format_vnd;
use crate::error::Result;
use crate::validation::NewAlertForm;

pub const WARNING_PERCENT: f64 = 80.0;
pub const CRITICAL_PERCENT: f64 = 90.0;
pub const EXCEEDED_PERCENT: f64 = 100.0;

/// Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendMetrics {
    pub threshold: i64,
    pub spent_amount: i64,
    /// `max(threshold - spent, 0)`
    pub remaining_amount: i64,
    /// `spent / threshold * 100`, or 0 when the threshold is 0.
    pub percentage_used: f64,
}

impl SpendMetrics {
    pub fn new(threshold: i64, spent_amount: i64) -> Self {
        let percentage_used = if threshold > 0 {
            spent_amount as f64 / threshold as f64 * 100.0
        } else {
            0.0
        };

        Self {
            threshold,
            spent_amount,
            remaining_amount: threshold.saturating_sub(spent_amount).max(0),
            percentage_used,
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        Severity::classify(self.percentage_used)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Critical,
    Exceeded,
}

impl Severity {
    /// Highest tier whose lower bound `percentage_used` reaches; bounds are inclusive.
    pub fn classify(percentage_used: f64) -> Option<Severity> {
        if percentage_used >= EXCEEDED_PERCENT {
            Some(Severity::Exceeded)
        } else if percentage_used >= CRITICAL_PERCENT {
            Some(Severity::Critical)
        } else if percentage_used >= WARNING_PERCENT {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
            Severity::Exceeded => "exceeded",
        }
    }
}

/// Usage of one alert or budget, ready for display and notification.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsage {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub category_name: String,
    pub metrics: SpendMetrics,
}

impl BudgetUsage {
    pub fn severity(&self) -> Option<Severity> {
        self.metrics.severity()
    }
}

impl From<&BudgetWithCategoryDto> for BudgetUsage {
    /// Budgets arrive with server-computed usage; only the percentage is
    /// recomputed so the notification rule sees the same numbers as alerts.
    fn from(budget: &BudgetWithCategoryDto) -> Self {
        let mut metrics = SpendMetrics::new(budget.budget.amount, budget.spent_amount);
        metrics.remaining_amount = budget.remaining_amount.max(0);

        Self {
            id: budget.budget.id,
            title: budget.category_name.clone(),
            category_id: budget.budget.category_id,
            category_name: budget.category_name.clone(),
            metrics,
        }
    }
}

/// Adds amounts without overflowing; totals pin at `i64::MAX`/`i64::MIN`.
pub fn saturating_total(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0, i64::saturating_add)
}

/// Sum of active expense amounts in `category_id`. Income never counts.
pub fn spent_in_category(notes: &[MoneyNoteDto], category_id: i64) -> i64 {
    saturating_total(
        notes
            .iter()
            .filter(|note| note.category_id == category_id && note.is_active_expense())
            .map(|note| note.amount),
    )
}

/// Active expense totals keyed by category id.
pub fn spent_by_category(notes: &[MoneyNoteDto]) -> HashMap<i64, i64> {
    let mut totals = HashMap::new();
    for note in notes.iter().filter(|note| note.is_active_expense()) {
        let total = totals.entry(note.category_id).or_insert(0_i64);
        *total = total.saturating_add(note.amount);
    }
    totals
}

/// Active expenses in `category_id` dated inside `window`.
pub fn spent_in_window(notes: &[MoneyNoteDto], category_id: i64, window: UtcRange) -> i64 {
    saturating_total(
        notes
            .iter()
            .filter(|note| window.contains(note.date))
            .filter(|note| note.category_id == category_id && note.is_active_expense())
            .map(|note| note.amount),
    )
}

/// Usage of one alert. Only notes dated inside the alert window count.
pub fn evaluate_alert(alert: &AlertDto, category_name: &str, notes: &[MoneyNoteDto]) -> BudgetUsage {
    let spent = spent_in_window(notes, alert.category_id, alert.window());
    BudgetUsage {
        id: alert.id,
        title: alert.title.clone(),
        category_id: alert.category_id,
        category_name: category_name.to_string(),
        metrics: SpendMetrics::new(alert.threshold, spent),
    }
}

/// Evaluates every active alert. Missing categories fall back to the alert title.
#[instrument(skip_all, fields(alerts = alerts.len(), notes = notes.len()))]
pub fn evaluate_alerts(
    alerts: &[AlertDto],
    categories: &[CategoryDto],
    notes: &[MoneyNoteDto],
) -> Vec<BudgetUsage> {
    let names: HashMap<i64, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();

    let usages: Vec<BudgetUsage> = alerts
        .iter()
        .filter(|alert| alert.status == RecordStatus::Active)
        .map(|alert| {
            let name = names.get(&alert.category_id).copied().unwrap_or(&alert.title);
            evaluate_alert(alert, name, notes)
        })
        .collect();

    debug!("Evaluated {} active alerts", usages.len());
    usages
}

/// Smallest window covering every alert, used to fetch the notes they need.
pub fn alerts_span(alerts: &[AlertDto]) -> Option<UtcRange> {
    alerts
        .iter()
        .map(AlertDto::window)
        .reduce(|a, b| UtcRange::new(a.start.min(b.start), a.end.max(b.end)))
}

/// A warning to surface once for an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertNotification {
    pub alert_id: i64,
    pub severity: Severity,
    pub message: String,
}

fn notification_message(usage: &BudgetUsage, severity: Severity) -> String {
    let metrics = &usage.metrics;
    match severity {
        Severity::Exceeded => format!(
            "Budget exceeded! Category \"{}\" went over its limit of {}. Spent: {}",
            usage.category_name,
            format_vnd(metrics.threshold),
            format_vnd(metrics.spent_amount)
        ),
        Severity::Critical => format!(
            "Budget alert! Category \"{}\" has used {:.1}% of its limit. Remaining: {}",
            usage.category_name,
            metrics.percentage_used,
            format_vnd(metrics.remaining_amount)
        ),
        Severity::Warning => format!(
            "Approaching budget limit! Category \"{}\" has used {:.1}% of its limit. Remaining: {}",
            usage.category_name,
            metrics.percentage_used,
            format_vnd(metrics.remaining_amount)
        ),
    }
}

/// Identifiers of alerts already notified in the current alert set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShownAlerts {
    ids: HashSet<i64>,
}

impl ShownAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, alert_id: i64) -> bool {
        self.ids.contains(&alert_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forgets identifiers absent from `current`, so a later alert reusing
    /// one of them can fire again.
    pub fn retain_present(&mut self, current: &[BudgetUsage]) {
        let present: HashSet<i64> = current.iter().map(|usage| usage.id).collect();
        self.ids.retain(|id| present.contains(id));
    }

    /// Prunes vanished identifiers, then returns one notification per alert
    /// that reached a tier and has not been shown yet.
    pub fn collect_notifications(&mut self, current: &[BudgetUsage]) -> Vec<AlertNotification> {
        self.retain_present(current);

        let mut notifications = Vec::new();
        for usage in current {
            if self.ids.contains(&usage.id) {
                continue;
            }
            if let Some(severity) = usage.severity() {
                self.ids.insert(usage.id);
                notifications.push(AlertNotification {
                    alert_id: usage.id,
                    severity,
                    message: notification_message(usage, severity),
                });
            }
        }
        notifications
    }
}

/// Active window of a new alert of `period`, anchored on the local calendar day of `now`.
pub fn alert_window<Tz: TimeZone>(period: AlertPeriod, now: &DateTime<Tz>) -> UtcRange {
    match period {
        AlertPeriod::Daily => time::local_calendar_day_to_utc_range(now),
        AlertPeriod::Monthly => time::month_range(now),
        AlertPeriod::Yearly => time::year_range(now),
    }
}

/// Validates the form and builds the create request for "today" under its period.
pub fn build_create_alert_request<Tz: TimeZone>(
    form: &NewAlertForm,
    now: &DateTime<Tz>,
) -> Result<CreateAlertRequest> {
    form.validate()?;

    let window = alert_window(form.period, now);
    Ok(CreateAlertRequest {
        // `required` validation guarantees presence.
        category_id: form.category_id.unwrap_or_default(),
        title: form.title.trim().to_string(),
        amount: form.amount,
        start_date: window.start,
        end_date: window.end,
        period: form.period,
    })
}
