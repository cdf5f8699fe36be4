use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use client::{ApiClient, QueryClient};
use tracing::{debug, info, trace};

use crate::config::AppConfig;

pub mod commands;

use commands::{alerts, ask, budgets, categories, dashboard, notes};

#[derive(Parser)]
#[command(name = "moneynote")]
#[command(about = "Track expenses, categories, budgets and alerts against a money-note backend")]
#[command(version)]
pub struct Cli {
    /// Path to a configuration file
    ///
    /// Defaults to `moneynote.toml` in the working directory when present.
    /// Values can also be set through `MONEYNOTE_API__BASE_URL`,
    /// `MONEYNOTE_DISPLAY__PAGE_SIZE` and friends.
    #[arg(long, global = true, env = "MONEYNOTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List, add, edit and remove money notes
    #[command(subcommand)]
    Notes(notes::NotesCommand),
    /// Manage expense categories
    #[command(subcommand)]
    Categories(categories::CategoriesCommand),
    /// Manage budget alerts and show how much of each limit is used
    #[command(subcommand)]
    Alerts(alerts::AlertsCommand),
    /// Manage budgets
    #[command(subcommand)]
    Budgets(budgets::BudgetsCommand),
    /// Monthly summary, category breakdown and today's spending
    Dashboard(dashboard::DashboardArgs),
    /// Ask the finance assistant, optionally attaching a receipt or recording
    Ask(ask::AskArgs),
}

/// Everything a command needs: the cached API, the loaded configuration and
/// the timezone used for "today".
pub struct AppContext {
    pub queries: QueryClient,
    pub config: AppConfig,
    pub tz: FixedOffset,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let api = ApiClient::new(config.client_settings())?;
        let tz = config.timezone();
        Ok(Self {
            queries: QueryClient::new(api),
            config,
            tz,
        })
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.tz)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        trace!("Entering Cli::run");
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(api_url) = self.api_url {
            debug!("Overriding API base URL with {}", api_url);
            config.api.base_url = api_url;
        }
        info!("Using backend at {}", config.api.base_url);

        let ctx = AppContext::new(config)?;
        match self.command {
            Commands::Notes(command) => notes::run(&ctx, command).await?,
            Commands::Categories(command) => categories::run(&ctx, command).await?,
            Commands::Alerts(command) => alerts::run(&ctx, command).await?,
            Commands::Budgets(command) => budgets::run(&ctx, command).await?,
            Commands::Dashboard(args) => dashboard::run(&ctx, args).await?,
            Commands::Ask(args) => ask::run(&ctx, args).await?,
        }
        Ok(())
    }
}
