use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use common::time;
use common::{BudgetPeriod, RecordStatus};
use compute::budget::{BudgetUsage, ShownAlerts};
use compute::validation::BudgetForm;
use tracing::info;

use super::{BudgetPeriodArg, print_notifications, user_facing};
use crate::cli::AppContext;
use crate::render;

#[derive(Subcommand)]
pub enum BudgetsCommand {
    /// List budgets with spending so far
    List,
    /// Create a budget
    Add(BudgetArgs),
    /// Replace a budget's category, amount and dates
    Update {
        id: i64,
        #[command(flatten)]
        budget: BudgetArgs,
        /// Mark the budget inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a budget
    Delete { id: i64 },
}

#[derive(Args, Debug, Clone)]
pub struct BudgetArgs {
    #[arg(long)]
    pub category: i64,
    #[arg(long)]
    pub amount: i64,
    #[arg(long, value_enum, default_value_t = BudgetPeriodArg::Monthly)]
    pub period: BudgetPeriodArg,
    /// First day, YYYY-MM-DD (start of the current period by default)
    #[arg(long, value_parser = time::parse_iso_date)]
    pub start: Option<NaiveDate>,
    /// Last day, YYYY-MM-DD (end of the current period by default)
    #[arg(long, value_parser = time::parse_iso_date)]
    pub end: Option<NaiveDate>,
}

/// First and last day of the `period` containing `today`.
pub fn period_bounds(period: BudgetPeriod, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        BudgetPeriod::Daily => (today, today),
        BudgetPeriod::Weekly => (time::start_of_week(today), time::end_of_week(today)),
        BudgetPeriod::Monthly => (time::first_day_of_month(today), time::last_day_of_month(today)),
        BudgetPeriod::Yearly => (time::first_day_of_year(today), time::last_day_of_year(today)),
    }
}

impl BudgetArgs {
    fn into_form(self, today: NaiveDate) -> BudgetForm {
        let period = BudgetPeriod::from(self.period);
        let (start, end) = period_bounds(period, today);
        BudgetForm {
            category_id: Some(self.category),
            amount: self.amount,
            period,
            start_date: self.start.unwrap_or(start),
            end_date: self.end.unwrap_or(end),
        }
    }
}

pub async fn run(ctx: &AppContext, command: BudgetsCommand) -> Result<()> {
    match command {
        BudgetsCommand::List => {
            let budgets = ctx.queries.budgets().await.map_err(user_facing)?;
            let usages: Vec<BudgetUsage> = budgets.iter().map(BudgetUsage::from).collect();
            print!("{}", render::usage_table(&usages));

            let mut shown = ShownAlerts::new();
            print_notifications(&mut shown, &usages);
        }
        BudgetsCommand::Add(args) => {
            let request = args.into_form(ctx.today()).into_create_request()?;
            ctx.queries.create_budget(&request).await.map_err(user_facing)?;
            info!("Budget created for category {}", request.category_id);
            println!(
                "Added budget of {} from {} to {}.",
                compute::currency::format_vnd(request.amount),
                request.start_date,
                request.end_date
            );
        }
        BudgetsCommand::Update {
            id,
            budget,
            inactive,
        } => {
            let status = if inactive {
                RecordStatus::Inactive
            } else {
                RecordStatus::Active
            };
            let request = budget.into_form(ctx.today()).into_update_request(status)?;
            ctx.queries
                .update_budget(id, &request)
                .await
                .map_err(user_facing)?;
            println!("Updated budget {}.", id);
        }
        BudgetsCommand::Delete { id } => {
            ctx.queries.delete_budget(id).await.map_err(user_facing)?;
            println!("Deleted budget {}.", id);
        }
    }
    Ok(())
}
