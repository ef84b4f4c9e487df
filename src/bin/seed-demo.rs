//! Demo data seed script
//!
//! Builds fresh in-memory stores, seeds one weekly menu (a dinner for every
//! day of the current week) and one grocery list for a demo user, then
//! prints both as JSON. Handy for wiring up a front end before the API is
//! running.
//!
//! Usage:
//!   seed-demo [--user-id ID] [--date YYYY-MM-DD] [--pretty]

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use serde_json::json;

use mealplan_api::{
    services::{demo, recipes::RecipeCatalog},
    store::{GroceryStore, WeeklyMenuStore},
};

#[derive(Parser)]
#[command(name = "seed-demo", about = "Print demo meal-plan data as JSON")]
struct Args {
    /// Owner of the seeded week and grocery list
    #[arg(long, default_value = demo::DEMO_USER_ID)]
    user_id: String,

    /// Any day of the week to seed (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// JSON recipe catalog to pick dinners from (defaults to the built-in one)
    #[arg(long)]
    recipes: Option<std::path::PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let catalog = match &args.recipes {
        Some(path) => RecipeCatalog::from_file(path)?,
        None => RecipeCatalog::builtin()?,
    };
    let groceries = GroceryStore::default();
    let weekly_menus = WeeklyMenuStore::default();
    let today = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let (list, week) = demo::seed(&groceries, &weekly_menus, &catalog, &args.user_id, today)
        .context("Failed to seed demo data")?;

    let output = json!({ "weeklyMenu": week, "groceryList": list });
    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");

    Ok(())
}
