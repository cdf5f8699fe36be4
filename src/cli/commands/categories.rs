use anyhow::{Result, bail};
use clap::Subcommand;
use compute::validation::CategoryForm;
use tracing::info;

use super::user_facing;
use crate::cli::AppContext;
use crate::render;

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// List active categories
    List,
    /// Create an expense category
    Add { name: String },
    /// Rename a category
    Rename { id: i64, name: String },
    /// Deactivate a category
    Remove { id: i64 },
}

pub async fn run(ctx: &AppContext, command: CategoriesCommand) -> Result<()> {
    match command {
        CategoriesCommand::List => {
            let categories = ctx.queries.active_categories().await.map_err(user_facing)?;
            print!("{}", render::categories_table(&categories));
        }
        CategoriesCommand::Add { name } => {
            let request = CategoryForm::expense(name).into_create_request()?;
            ctx.queries
                .create_category(&request)
                .await
                .map_err(user_facing)?;
            info!("Category \"{}\" created", request.name);
            println!("Added category \"{}\".", request.name);
        }
        CategoriesCommand::Rename { id, name } => {
            let categories = ctx.queries.active_categories().await.map_err(user_facing)?;
            let Some(category) = categories.iter().find(|category| category.id == id) else {
                bail!("Category {} not found", id);
            };
            let form = CategoryForm {
                name,
                kind: category.kind,
            };
            let request = form.into_update_request()?;
            ctx.queries
                .update_category(id, &request)
                .await
                .map_err(user_facing)?;
            println!("Renamed \"{}\" to \"{}\".", category.name, request.name);
        }
        CategoriesCommand::Remove { id } => {
            let categories = ctx.queries.active_categories().await.map_err(user_facing)?;
            let Some(category) = categories.iter().find(|category| category.id == id) else {
                bail!("Category {} not found", id);
            };
            ctx.queries
                .deactivate_category(category)
                .await
                .map_err(user_facing)?;
            println!("Removed category \"{}\".", category.name);
        }
    }
    Ok(())
}
