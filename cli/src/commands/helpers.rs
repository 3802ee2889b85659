use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use morsel_core::models::Recipe;

/// Parse a date argument: YYYY-MM-DD or today/yesterday/tomorrow; `None`
/// means today. Returns the fixed-width string the store keys on.
pub(crate) fn parse_date_arg(date_str: Option<String>) -> Result<String> {
    let date = match date_str {
        None => Local::now().date_naive(),
        Some(s) => match s.as_str() {
            "today" => Local::now().date_naive(),
            "yesterday" => Local::now().date_naive() - chrono::Duration::days(1),
            "tomorrow" => Local::now().date_naive() + chrono::Duration::days(1),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
            })?,
        },
    };
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Parse a month argument as YYYY-MM; `None` means the current month.
pub(crate) fn parse_month_arg(month_str: Option<String>) -> Result<(i32, u32)> {
    match month_str {
        None => {
            let today = Local::now().date_naive();
            Ok((today.year(), today.month()))
        }
        Some(s) => {
            let parts: Vec<&str> = s.splitn(2, '-').collect();
            let parsed = if parts.len() == 2 {
                match (parts[0].parse::<i32>(), parts[1].parse::<u32>()) {
                    (Ok(y), Ok(m)) if (1..=12).contains(&m) => Some((y, m)),
                    _ => None,
                }
            } else {
                None
            };
            parsed.with_context(|| format!("Invalid month '{s}'. Use YYYY-MM"))
        }
    }
}

pub(crate) fn print_recipe_table(recipes: &[Recipe]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Title")]
        title: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Age")]
        age_range: String,
        #[tabled(rename = "Time")]
        prep_time: String,
        #[tabled(rename = "Difficulty")]
        difficulty: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: r.id,
            title: truncate(&r.title, 35),
            category: r.category.clone(),
            age_range: truncate(&r.age_range, 15),
            prep_time: truncate(&r.prep_time, 12),
            difficulty: r.difficulty.clone(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..1)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
