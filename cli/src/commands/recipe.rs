use anyhow::Result;
use morsel_core::models::NewRecipe;
use morsel_core::service::PlannerService;

use super::helpers::{json_error, print_recipe_table, truncate};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_recipe_add(
    service: &PlannerService,
    title: String,
    category: String,
    age_range: String,
    prep_time: String,
    difficulty: String,
    nutrition: Option<String>,
    ingredients: Option<String>,
    steps: String,
    json: bool,
) -> Result<()> {
    let recipe = service.add_recipe(&NewRecipe {
        title,
        category,
        age_range,
        prep_time,
        difficulty,
        nutrition,
        ingredients,
        steps,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        println!("Added recipe #{}: {}", recipe.id, recipe.title);
    }
    Ok(())
}

pub(crate) fn cmd_recipe_list(
    service: &PlannerService,
    search: Option<String>,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let term = search.as_deref().unwrap_or("");
    let recipes = service.search_recipes(term, category.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes found.");
        return Ok(());
    }

    print_recipe_table(&recipes);
    println!("{} recipe(s)", recipes.len());
    Ok(())
}

pub(crate) fn cmd_recipe_show(service: &PlannerService, id: i64, json: bool) -> Result<()> {
    let Some(recipe) = service.get_recipe(id)? else {
        if json {
            println!("{}", json_error(&format!("recipe {id} not found")));
        } else {
            eprintln!("Recipe {id} not found.");
        }
        std::process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    println!("#{} {}", recipe.id, recipe.title);
    println!("  Category:   {}", recipe.category);
    println!("  Age range:  {}", recipe.age_range);
    println!("  Prep time:  {}", recipe.prep_time);
    println!("  Difficulty: {}", recipe.difficulty);
    if let Some(nutrition) = &recipe.nutrition {
        println!("  Nutrition:  {}", truncate(nutrition, 70));
    }
    if let Some(ingredients) = &recipe.ingredients {
        println!("  Ingredients:");
        for line in ingredients.lines() {
            println!("    {line}");
        }
    }
    println!("  Steps:");
    for (i, line) in recipe.steps.lines().enumerate() {
        println!("    {}. {}", i + 1, line);
    }
    println!("  Created:    {}", recipe.created_at);
    Ok(())
}
