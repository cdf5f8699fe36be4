use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use common::time::{self, UtcRange};
use common::{MoneyNoteQuery, RecordStatus, TransactionType};
use compute::dashboard::summarize_period;
use compute::pagination::Paginator;
use compute::validation::MoneyNoteForm;
use tracing::{debug, info};

use super::{loaded_or_empty, user_facing};
use crate::cli::AppContext;
use crate::render;

#[derive(Subcommand)]
pub enum NotesCommand {
    /// List money notes of a date range (the current month by default)
    List(ListArgs),
    /// Record an expense or income
    Add(NoteArgs),
    /// Edit a money note
    Update {
        id: i64,
        #[command(flatten)]
        note: NoteArgs,
    },
    /// Mark a money note inactive; it stays on the server but no longer counts
    Deactivate {
        id: i64,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Permanently delete a money note
    Delete { id: i64 },
}

#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// First day, YYYY-MM-DD
    #[arg(long, value_parser = time::parse_iso_date)]
    pub from: Option<NaiveDate>,
    /// Last day, YYYY-MM-DD (inclusive)
    #[arg(long, value_parser = time::parse_iso_date)]
    pub to: Option<NaiveDate>,
}

impl WindowArgs {
    /// Missing bounds default to the month containing `today`.
    pub fn range(&self, today: NaiveDate) -> Result<UtcRange> {
        let from = self.from.unwrap_or_else(|| time::first_day_of_month(today));
        let to = self.to.unwrap_or_else(|| time::last_day_of_month(from));
        if to < from {
            bail!("--to must not be before --from");
        }
        Ok(time::date_range_to_utc_range(from, to))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    #[arg(long, default_value_t = 1)]
    pub page: u64,
    /// Rows per page, overriding the configuration
    #[arg(long)]
    pub page_size: Option<u64>,
    /// Include inactive notes
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NoteArgs {
    #[arg(long)]
    pub category: i64,
    #[arg(long)]
    pub amount: i64,
    #[arg(long)]
    pub note: String,
    /// Record an income instead of an expense
    #[arg(long)]
    pub income: bool,
}

impl NoteArgs {
    fn into_form(self) -> MoneyNoteForm {
        MoneyNoteForm {
            kind: if self.income {
                TransactionType::Income
            } else {
                TransactionType::Expense
            },
            note: self.note,
            amount: self.amount,
            category_id: Some(self.category),
        }
    }
}

pub async fn run(ctx: &AppContext, command: NotesCommand) -> Result<()> {
    match command {
        NotesCommand::List(args) => list(ctx, args).await,
        NotesCommand::Add(args) => {
            let request = args.into_form().into_create_request()?;
            ctx.queries
                .create_money_notes(std::slice::from_ref(&request))
                .await
                .map_err(user_facing)?;
            info!("Money note created");
            println!("Saved \"{}\".", request.note);
            Ok(())
        }
        NotesCommand::Update { id, note } => {
            let request = note.into_form().into_update_request()?;
            ctx.queries
                .update_money_note(id, &request)
                .await
                .map_err(user_facing)?;
            println!("Updated money note {}.", id);
            Ok(())
        }
        NotesCommand::Deactivate { id, window } => {
            let range = window.range(ctx.today())?;
            let notes = ctx
                .queries
                .money_notes(&MoneyNoteQuery::new(range))
                .await
                .map_err(user_facing)?;
            let Some(note) = notes.iter().find(|note| note.id == id) else {
                bail!("Money note {} not found in the selected dates", id);
            };
            if note.status == RecordStatus::Inactive {
                println!("Money note {} is already inactive.", id);
                return Ok(());
            }
            ctx.queries
                .deactivate_money_note(note)
                .await
                .map_err(user_facing)?;
            println!("Deactivated money note {}.", id);
            Ok(())
        }
        NotesCommand::Delete { id } => {
            ctx.queries.delete_money_note(id).await.map_err(user_facing)?;
            println!("Deleted money note {}.", id);
            Ok(())
        }
    }
}

async fn list(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let range = args.window.range(ctx.today())?;
    let query = if args.all {
        MoneyNoteQuery::new(range)
    } else {
        MoneyNoteQuery::active(range)
    };
    debug!("Listing money notes {:?}", query);

    let (notes, categories) = tokio::join!(
        ctx.queries.money_notes(&query),
        ctx.queries.active_categories()
    );
    let notes = notes.map_err(user_facing)?;
    let categories = loaded_or_empty(categories, "categories");

    let page_size = args.page_size.unwrap_or(ctx.config.display.page_size);
    let paginator = Paginator::new(notes.len() as u64, page_size)
        .with_max_visible_pages(ctx.config.display.max_visible_pages)
        .with_initial_page(args.page);

    let names = render::category_names(&categories);
    print!(
        "{}",
        render::money_notes_table(paginator.page_data(notes.as_slice()), &names, &ctx.tz)
    );
    println!("{}", render::pagination_footer(&paginator));
    print!("{}", render::period_summary(&summarize_period(&notes, range)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_defaults_to_current_month() {
        let range = WindowArgs::default().range(date(2025, 2, 14)).unwrap();
        assert_eq!(range, time::date_range_to_utc_range(date(2025, 2, 1), date(2025, 2, 28)));
    }

    #[test]
    fn test_window_from_only_runs_to_end_of_that_month() {
        let window = WindowArgs {
            from: Some(date(2024, 2, 10)),
            to: None,
        };
        let range = window.range(date(2025, 6, 1)).unwrap();
        assert_eq!(range, time::date_range_to_utc_range(date(2024, 2, 10), date(2024, 2, 29)));
    }

    #[test]
    fn test_window_rejects_reversed_bounds() {
        let window = WindowArgs {
            from: Some(date(2025, 3, 10)),
            to: Some(date(2025, 3, 1)),
        };
        assert!(window.range(date(2025, 3, 5)).is_err());
    }

    #[test]
    fn test_note_args_build_income_form() {
        let form = NoteArgs {
            category: 4,
            amount: 5_000_000,
            note: "Salary".to_string(),
            income: true,
        }
        .into_form();
        assert_eq!(form.kind, TransactionType::Income);
        assert_eq!(form.category_id, Some(4));
    }
}
