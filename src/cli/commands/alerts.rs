use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Subcommand;
use common::time::{self, UtcRange};
use common::MoneyNoteQuery;
use compute::budget::{ShownAlerts, alerts_span, build_create_alert_request, evaluate_alerts};
use compute::validation::{AlertEditForm, NewAlertForm};
use tracing::{debug, info};

use super::{AlertPeriodArg, loaded_or_empty, print_notifications, user_facing};
use crate::cli::AppContext;
use crate::render;

#[derive(Subcommand)]
pub enum AlertsCommand {
    /// Show active alerts overlapping a month, with spending against each limit
    List {
        /// Any day of the month to show, YYYY-MM-DD (today by default)
        #[arg(long, value_parser = time::parse_iso_date)]
        date: Option<NaiveDate>,
    },
    /// Create an alert for the current day, month or year
    Add {
        #[arg(long)]
        category: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        amount: i64,
        #[arg(long, value_enum, default_value_t = AlertPeriodArg::Monthly)]
        period: AlertPeriodArg,
    },
    /// Change the title and limit of an alert
    Update {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        amount: i64,
    },
    /// Deactivate an alert
    Remove {
        id: i64,
        #[arg(long, value_parser = time::parse_iso_date)]
        date: Option<NaiveDate>,
    },
}

fn month_of(date: NaiveDate) -> UtcRange {
    time::date_range_to_utc_range(time::first_day_of_month(date), time::last_day_of_month(date))
}

pub async fn run(ctx: &AppContext, command: AlertsCommand) -> Result<()> {
    match command {
        AlertsCommand::List { date } => list(ctx, month_of(date.unwrap_or_else(|| ctx.today()))).await,
        AlertsCommand::Add {
            category,
            title,
            amount,
            period,
        } => {
            let form = NewAlertForm {
                category_id: Some(category),
                title,
                amount,
                period: period.into(),
            };
            let request = build_create_alert_request(&form, &ctx.now())?;
            debug!(
                "Alert window {}..{}",
                request.start_date, request.end_date
            );
            ctx.queries.create_alert(&request).await.map_err(user_facing)?;
            info!("Alert \"{}\" created", request.title);
            println!("Added alert \"{}\".", request.title);
            Ok(())
        }
        AlertsCommand::Update { id, title, amount } => {
            let request = AlertEditForm { title, amount }.into_request()?;
            ctx.queries
                .update_alert(id, &request)
                .await
                .map_err(user_facing)?;
            println!("Updated alert {}.", id);
            Ok(())
        }
        AlertsCommand::Remove { id, date } => {
            let range = month_of(date.unwrap_or_else(|| ctx.today()));
            let alerts = ctx.queries.alerts(range).await.map_err(user_facing)?;
            let Some(alert) = alerts.iter().find(|alert| alert.id == id) else {
                bail!("Alert {} not found in the selected month", id);
            };
            ctx.queries
                .deactivate_alert(alert)
                .await
                .map_err(user_facing)?;
            println!("Removed alert \"{}\".", alert.title);
            Ok(())
        }
    }
}

async fn list(ctx: &AppContext, range: UtcRange) -> Result<()> {
    let (alerts, categories) = tokio::join!(
        ctx.queries.alerts(range),
        ctx.queries.active_categories()
    );
    let alerts = alerts.map_err(user_facing)?;
    let categories = loaded_or_empty(categories, "categories");

    // Alerts may be daily or yearly, so notes are fetched for every window they cover.
    let notes = match alerts_span(&alerts) {
        Some(span) => {
            let query = MoneyNoteQuery::active(span);
            loaded_or_empty(ctx.queries.money_notes(&query).await, "spending")
        }
        None => Default::default(),
    };

    let usages = evaluate_alerts(&alerts, &categories, &notes);
    print!("{}", render::usage_table(&usages));

    let mut shown = ShownAlerts::new();
    print_notifications(&mut shown, &usages);
    Ok(())
}
