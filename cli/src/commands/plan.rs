use anyhow::Result;
use morsel_core::models::{DayMeals, MEAL_SLOTS};
use morsel_core::service::PlannerService;
use morsel_core::StoreError;

use super::helpers::{json_error, parse_date_arg};

pub(crate) fn cmd_plan_add(
    service: &PlannerService,
    date: Option<String>,
    slot: String,
    recipe_id: i64,
    json: bool,
) -> Result<()> {
    let date = parse_date_arg(date)?;
    match service.add_to_slot(&date, &slot, recipe_id) {
        Ok(meals) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&meals)?);
            } else {
                println!("Added recipe #{recipe_id} to {slot} on {date}");
            }
            Ok(())
        }
        Err(StoreError::RecipeNotFound(id)) => {
            if json {
                println!("{}", json_error(&format!("recipe {id} not found")));
            } else {
                eprintln!("Recipe {id} not found.");
            }
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn cmd_plan_remove(
    service: &PlannerService,
    date: Option<String>,
    slot: String,
    recipe_id: i64,
    json: bool,
) -> Result<()> {
    let date = parse_date_arg(date)?;
    let meals = service.remove_from_slot(&date, &slot, recipe_id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
    } else {
        println!("Removed recipe #{recipe_id} from {slot} on {date}");
    }
    Ok(())
}

pub(crate) fn cmd_plan_show(
    service: &PlannerService,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date_arg(date)?;
    let meals = service.get_meal_plan(&date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
        return Ok(());
    }

    println!("Meal plan for {date}");
    if meals.is_empty() {
        println!("  (nothing planned)");
        return Ok(());
    }
    print_day(&meals);
    Ok(())
}

pub(crate) fn cmd_plan_clear(
    service: &PlannerService,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date_arg(date)?;
    let removed = service.delete_meal_plan(&date)?;
    if json {
        println!("{{\"date\":\"{date}\",\"removed\":{removed}}}");
    } else if removed {
        println!("Cleared meal plan for {date}");
    } else {
        println!("No meal plan stored for {date}");
    }
    Ok(())
}

pub(crate) fn print_day(meals: &DayMeals) {
    for slot in MEAL_SLOTS {
        let entries = match meals.slot(slot) {
            Some(list) => list,
            None => continue,
        };
        if entries.is_empty() {
            continue;
        }
        println!("  {slot}:");
        for entry in entries {
            println!("    #{} {} ({})", entry.recipe_id, entry.title, entry.category);
        }
    }
}
