mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_calendar, cmd_db_reset, cmd_plan_add, cmd_plan_clear, cmd_plan_remove, cmd_plan_show,
    cmd_recipe_add, cmd_recipe_list, cmd_recipe_show,
};
use crate::config::Config;
use morsel_core::service::PlannerService;

#[derive(Parser)]
#[command(
    name = "morsel",
    version,
    about = "Baby recipes and meal planning, kept on your own machine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Manage the meal plan for a single day
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Show every planned day in a month
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// Add a recipe
    Add {
        /// Recipe title
        title: String,
        /// Category: breakfast, snack, main
        #[arg(short, long, default_value = "main")]
        category: String,
        /// Suitable age range (e.g. "6-8 months")
        #[arg(long, default_value = "6+ months")]
        age_range: String,
        /// Preparation time (e.g. "15 min")
        #[arg(long, default_value = "15 min")]
        prep_time: String,
        /// Difficulty: easy, medium, hard
        #[arg(short, long, default_value = "easy")]
        difficulty: String,
        /// Nutrition notes
        #[arg(long)]
        nutrition: Option<String>,
        /// Ingredients, one per line
        #[arg(short, long)]
        ingredients: Option<String>,
        /// Preparation steps, one per line
        #[arg(short, long)]
        steps: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recipes, optionally filtered
    List {
        /// Search term matched against title, ingredients and steps
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by category: breakfast, snack, main
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show full recipe details
    Show {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Add a recipe to a meal slot
    Add {
        /// Meal slot: breakfast, lunch, dinner
        slot: String,
        /// Recipe ID to add
        recipe_id: i64,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a recipe from a meal slot
    Remove {
        /// Meal slot: breakfast, lunch, dinner
        slot: String,
        /// Recipe ID to remove
        recipe_id: i64,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the plan for a day (default: today)
    Show {
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the plan for a day (default: today)
    Clear {
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Delete everything and rebuild an empty schema
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let mut service = PlannerService::open_or_recover(&config.db_path)?;

    match cli.command {
        Commands::Recipe { command } => match command {
            RecipeCommands::Add {
                title,
                category,
                age_range,
                prep_time,
                difficulty,
                nutrition,
                ingredients,
                steps,
                json,
            } => cmd_recipe_add(
                &service,
                title,
                category,
                age_range,
                prep_time,
                difficulty,
                nutrition,
                ingredients,
                steps,
                json,
            ),
            RecipeCommands::List {
                search,
                category,
                json,
            } => cmd_recipe_list(&service, search, category, json),
            RecipeCommands::Show { id, json } => cmd_recipe_show(&service, id, json),
        },
        Commands::Plan { command } => match command {
            PlanCommands::Add {
                slot,
                recipe_id,
                date,
                json,
            } => cmd_plan_add(&service, date, slot, recipe_id, json),
            PlanCommands::Remove {
                slot,
                recipe_id,
                date,
                json,
            } => cmd_plan_remove(&service, date, slot, recipe_id, json),
            PlanCommands::Show { date, json } => cmd_plan_show(&service, date, json),
            PlanCommands::Clear { date, json } => cmd_plan_clear(&service, date, json),
        },
        Commands::Calendar { month, json } => cmd_calendar(&service, month, json),
        Commands::Db { command } => match command {
            DbCommands::Reset { yes } => cmd_db_reset(&mut service, yes),
        },
    }
}
