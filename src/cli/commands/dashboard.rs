use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use common::time::{self, UtcRange};
use common::MoneyNoteQuery;
use compute::budget::{BudgetUsage, ShownAlerts};
use compute::dashboard::{DailyLimitStatus, category_breakdown, summarize_period};
use tracing::{debug, warn};

use super::{loaded_or_empty, print_notifications, user_facing};
use crate::cli::AppContext;
use crate::render;

#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Any day of the month to summarize, YYYY-MM-DD (today by default)
    #[arg(long, value_parser = time::parse_iso_date)]
    pub date: Option<NaiveDate>,
    /// Spending limit for today
    #[arg(long)]
    pub daily_limit: Option<i64>,
}

/// Active notes of the calendar month containing `day`.
pub fn month_query(day: NaiveDate) -> MoneyNoteQuery {
    MoneyNoteQuery::active(time::date_range_to_utc_range(
        time::first_day_of_month(day),
        time::last_day_of_month(day),
    ))
}

pub async fn run(ctx: &AppContext, args: DashboardArgs) -> Result<()> {
    let today = ctx.today();
    let day = args.date.unwrap_or(today);
    let query = month_query(day);
    let month: UtcRange = query.range;
    debug!("Dashboard for {:?}", month);

    let (notes, categories, budgets) = tokio::join!(
        ctx.queries.money_notes(&query),
        ctx.queries.active_categories(),
        ctx.queries.budgets()
    );
    let notes = notes.map_err(user_facing)?;
    let categories = loaded_or_empty(categories, "categories");

    println!("== {} ==", day.format("%B %Y"));
    print!("{}", render::period_summary(&summarize_period(&notes, month)));
    println!();
    print!(
        "{}",
        render::breakdown(&category_breakdown(&notes, &categories))
    );

    if let Some(limit) = args.daily_limit {
        let today_range = time::calendar_day_range(today);
        let spent_today = if month.contains(today_range.start) {
            summarize_period(&notes, today_range).total_expense
        } else {
            let today_query = MoneyNoteQuery::active(today_range);
            let today_notes = ctx
                .queries
                .money_notes(&today_query)
                .await
                .map_err(user_facing)?;
            summarize_period(&today_notes, today_range).total_expense
        };
        println!();
        print!("{}", render::daily_limit(&DailyLimitStatus::new(limit, spent_today)));
    }

    match budgets {
        Ok(budgets) => {
            let usages: Vec<BudgetUsage> = budgets.iter().map(BudgetUsage::from).collect();
            let mut shown = ShownAlerts::new();
            print_notifications(&mut shown, &usages);
        }
        Err(err) => warn!("Budgets unavailable: {}", err),
    }
    Ok(())
}
