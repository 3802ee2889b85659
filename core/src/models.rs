use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Fixed category set for recipes. Searches accept `None` as "no filter".
pub const RECIPE_CATEGORIES: &[&str] = &["breakfast", "snack", "main"];

/// Fixed difficulty set for recipes.
pub const DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];

/// Meal slots persisted per day. A richer slot model may exist in a
/// presentation layer, but only these three are stored.
pub const MEAL_SLOTS: &[&str] = &["breakfast", "lunch", "dinner"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub age_range: String,
    pub prep_time: String,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    pub steps: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub category: String,
    pub age_range: String,
    pub prep_time: String,
    pub difficulty: String,
    pub nutrition: Option<String>,
    pub ingredients: Option<String>,
    pub steps: String,
}

/// Snapshot of a recipe at the moment it was planned.
///
/// Meal plans store copies, not references: editing or removing a recipe
/// later never rewrites an already-planned day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRef {
    pub recipe_id: i64,
    pub title: String,
    pub category: String,
}

impl RecipeRef {
    #[must_use]
    pub fn snapshot(recipe: &Recipe) -> Self {
        Self {
            recipe_id: recipe.id,
            title: recipe.title.clone(),
            category: recipe.category.clone(),
        }
    }
}

/// The full meals document for one date. Persisted as a single JSON column;
/// saving always replaces the whole document, never merges per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    #[serde(default)]
    pub breakfast: Vec<RecipeRef>,
    #[serde(default)]
    pub lunch: Vec<RecipeRef>,
    #[serde(default)]
    pub dinner: Vec<RecipeRef>,
}

impl DayMeals {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breakfast.is_empty() && self.lunch.is_empty() && self.dinner.is_empty()
    }

    /// Slot accessor by validated slot name.
    #[must_use]
    pub fn slot(&self, slot: &str) -> Option<&Vec<RecipeRef>> {
        match slot {
            "breakfast" => Some(&self.breakfast),
            "lunch" => Some(&self.lunch),
            "dinner" => Some(&self.dinner),
            _ => None,
        }
    }

    pub fn slot_mut(&mut self, slot: &str) -> Option<&mut Vec<RecipeRef>> {
        match slot {
            "breakfast" => Some(&mut self.breakfast),
            "lunch" => Some(&mut self.lunch),
            "dinner" => Some(&mut self.dinner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MealPlan {
    pub date: String,
    pub meals: DayMeals,
    pub updated_at: String,
}

pub fn validate_category(category: &str) -> Result<String> {
    let lower = category.to_lowercase();
    if RECIPE_CATEGORIES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(StoreError::Invalid(format!(
            "Invalid category '{category}'. Must be one of: {}",
            RECIPE_CATEGORIES.join(", ")
        )))
    }
}

pub fn validate_difficulty(difficulty: &str) -> Result<String> {
    let lower = difficulty.to_lowercase();
    if DIFFICULTIES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(StoreError::Invalid(format!(
            "Invalid difficulty '{difficulty}'. Must be one of: {}",
            DIFFICULTIES.join(", ")
        )))
    }
}

pub fn validate_meal_slot(slot: &str) -> Result<String> {
    let lower = slot.to_lowercase();
    if MEAL_SLOTS.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(StoreError::Invalid(format!(
            "Invalid meal slot '{slot}'. Must be one of: {}",
            MEAL_SLOTS.join(", ")
        )))
    }
}

/// Validate an insert candidate: non-empty title/steps, known category and
/// difficulty. Returns the normalized (lowercased enum fields) recipe.
pub fn validate_new_recipe(recipe: &NewRecipe) -> Result<NewRecipe> {
    if recipe.title.trim().is_empty() {
        return Err(StoreError::Invalid("Recipe title must not be empty".into()));
    }
    if recipe.steps.trim().is_empty() {
        return Err(StoreError::Invalid("Recipe steps must not be empty".into()));
    }
    Ok(NewRecipe {
        category: validate_category(&recipe.category)?,
        difficulty: validate_difficulty(&recipe.difficulty)?,
        ..recipe.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_recipe() -> NewRecipe {
        NewRecipe {
            title: "Apple puree".to_string(),
            category: "snack".to_string(),
            age_range: "4-6 months".to_string(),
            prep_time: "10 min".to_string(),
            difficulty: "easy".to_string(),
            nutrition: Some("vitamin C, fibre".to_string()),
            ingredients: Some("apple".to_string()),
            steps: "Steam and mash.".to_string(),
        }
    }

    #[test]
    fn test_valid_categories() {
        assert_eq!(validate_category("breakfast").unwrap(), "breakfast");
        assert_eq!(validate_category("snack").unwrap(), "snack");
        assert_eq!(validate_category("main").unwrap(), "main");
    }

    #[test]
    fn test_invalid_category() {
        assert!(validate_category("dessert").is_err());
        assert!(validate_category("").is_err());
    }

    #[test]
    fn test_category_case_insensitive() {
        assert_eq!(validate_category("Snack").unwrap(), "snack");
        assert_eq!(validate_category("MAIN").unwrap(), "main");
    }

    #[test]
    fn test_valid_difficulties() {
        assert_eq!(validate_difficulty("easy").unwrap(), "easy");
        assert_eq!(validate_difficulty("Medium").unwrap(), "medium");
        assert_eq!(validate_difficulty("HARD").unwrap(), "hard");
    }

    #[test]
    fn test_invalid_difficulty() {
        assert!(validate_difficulty("impossible").is_err());
    }

    #[test]
    fn test_valid_meal_slots() {
        assert_eq!(validate_meal_slot("breakfast").unwrap(), "breakfast");
        assert_eq!(validate_meal_slot("Lunch").unwrap(), "lunch");
        assert_eq!(validate_meal_slot("DINNER").unwrap(), "dinner");
    }

    #[test]
    fn test_invalid_meal_slot() {
        assert!(validate_meal_slot("brunch").is_err());
        assert!(validate_meal_slot("").is_err());
    }

    #[test]
    fn test_validate_new_recipe_normalizes() {
        let mut recipe = sample_new_recipe();
        recipe.category = "Snack".to_string();
        recipe.difficulty = "EASY".to_string();
        let validated = validate_new_recipe(&recipe).unwrap();
        assert_eq!(validated.category, "snack");
        assert_eq!(validated.difficulty, "easy");
        assert_eq!(validated.title, "Apple puree");
    }

    #[test]
    fn test_validate_new_recipe_empty_title() {
        let mut recipe = sample_new_recipe();
        recipe.title = "   ".to_string();
        assert!(validate_new_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_new_recipe_empty_steps() {
        let mut recipe = sample_new_recipe();
        recipe.steps = String::new();
        assert!(validate_new_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_new_recipe_bad_category() {
        let mut recipe = sample_new_recipe();
        recipe.category = "dessert".to_string();
        assert!(validate_new_recipe(&recipe).is_err());
    }

    #[test]
    fn test_day_meals_default_is_empty() {
        let meals = DayMeals::default();
        assert!(meals.is_empty());
        assert!(meals.breakfast.is_empty());
        assert!(meals.lunch.is_empty());
        assert!(meals.dinner.is_empty());
    }

    #[test]
    fn test_day_meals_slot_access() {
        let mut meals = DayMeals::default();
        meals.slot_mut("lunch").unwrap().push(RecipeRef {
            recipe_id: 1,
            title: "Pumpkin porridge".to_string(),
            category: "main".to_string(),
        });
        assert_eq!(meals.slot("lunch").unwrap().len(), 1);
        assert!(meals.slot("breakfast").unwrap().is_empty());
        assert!(meals.slot("brunch").is_none());
        assert!(!meals.is_empty());
    }

    #[test]
    fn test_day_meals_json_round_trip() {
        let mut meals = DayMeals::default();
        meals.breakfast.push(RecipeRef {
            recipe_id: 3,
            title: "Oat mash".to_string(),
            category: "breakfast".to_string(),
        });
        let json = serde_json::to_string(&meals).unwrap();
        let back: DayMeals = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meals);
    }

    #[test]
    fn test_day_meals_missing_slots_default_empty() {
        // Documents written before a slot existed deserialize with it empty.
        let back: DayMeals = serde_json::from_str(r#"{"breakfast":[]}"#).unwrap();
        assert!(back.lunch.is_empty());
        assert!(back.dinner.is_empty());
    }

    #[test]
    fn test_recipe_ref_snapshot() {
        let recipe = Recipe {
            id: 7,
            title: "Carrot soup".to_string(),
            category: "main".to_string(),
            age_range: "8-12 months".to_string(),
            prep_time: "20 min".to_string(),
            difficulty: "easy".to_string(),
            nutrition: None,
            ingredients: Some("carrot, potato".to_string()),
            steps: "Simmer and blend.".to_string(),
            created_at: "2024-06-01T10:00:00+00:00".to_string(),
        };
        let snap = RecipeRef::snapshot(&recipe);
        assert_eq!(snap.recipe_id, 7);
        assert_eq!(snap.title, "Carrot soup");
        assert_eq!(snap.category, "main");
    }
}
