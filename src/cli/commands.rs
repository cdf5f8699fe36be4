use std::sync::Arc;

use clap::ValueEnum;
use common::{AlertPeriod, BudgetPeriod};
use compute::budget::{BudgetUsage, ShownAlerts};
use tracing::{error, warn};

pub mod alerts;
pub mod ask;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod notes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlertPeriodArg {
    Daily,
    Monthly,
    Yearly,
}

impl From<AlertPeriodArg> for AlertPeriod {
    fn from(value: AlertPeriodArg) -> Self {
        match value {
            AlertPeriodArg::Daily => AlertPeriod::Daily,
            AlertPeriodArg::Monthly => AlertPeriod::Monthly,
            AlertPeriodArg::Yearly => AlertPeriod::Yearly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BudgetPeriodArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<BudgetPeriodArg> for BudgetPeriod {
    fn from(value: BudgetPeriodArg) -> Self {
        match value {
            BudgetPeriodArg::Daily => BudgetPeriod::Daily,
            BudgetPeriodArg::Weekly => BudgetPeriod::Weekly,
            BudgetPeriodArg::Monthly => BudgetPeriod::Monthly,
            BudgetPeriodArg::Yearly => BudgetPeriod::Yearly,
        }
    }
}

/// Logs the transport detail and keeps only the message meant for the user.
pub fn user_facing(err: client::ApiError) -> anyhow::Error {
    error!("API request failed: {:?}", err);
    anyhow::anyhow!(err.user_message())
}

/// A read that failed is reported inline and treated as an empty list, so the
/// rest of the screen still renders.
pub fn loaded_or_empty<T>(result: client::Result<Arc<Vec<T>>>, what: &str) -> Arc<Vec<T>> {
    result.unwrap_or_else(|err| {
        warn!("{} unavailable: {:?}", what, err);
        println!("({} could not be loaded: {})", what, err.user_message());
        Arc::new(Vec::new())
    })
}

/// Prints each warning tier reached for the first time in this run.
pub fn print_notifications(shown: &mut ShownAlerts, usages: &[BudgetUsage]) {
    for notification in shown.collect_notifications(usages) {
        println!("[{}] {}", notification.severity.label(), notification.message);
    }
}
