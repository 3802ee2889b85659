use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::models::{
    DayMeals, MealPlan, NewRecipe, Recipe, RecipeRef, validate_category, validate_meal_slot,
    validate_new_recipe,
};

/// String-friendly, validating front door over [`Database`].
///
/// Callers (the CLI today, a mobile shell tomorrow) hand in plain strings;
/// the service validates categories, slots and `%Y-%m-%d` dates before
/// anything touches storage.
pub struct PlannerService {
    db: Database,
}

impl PlannerService {
    pub fn new(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    /// Open with one destructive recovery attempt if initialization fails.
    pub fn open_or_recover(db_path: &Path) -> Result<Self> {
        let db = Database::open_or_recover(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    pub fn close(&mut self) {
        self.db.close();
    }

    pub fn reset(&mut self) -> Result<()> {
        self.db.reset()
    }

    // --- Recipes ---

    pub fn add_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        let validated = validate_new_recipe(recipe)?;
        self.db.add_recipe(&validated)
    }

    pub fn get_recipe(&self, id: i64) -> Result<Option<Recipe>> {
        self.db.get_recipe(id)
    }

    /// `category: None` means no category filter.
    pub fn search_recipes(&self, term: &str, category: Option<&str>) -> Result<Vec<Recipe>> {
        let category = category.map(validate_category).transpose()?;
        self.db.search_recipes(term, category.as_deref())
    }

    // --- Meal plans ---

    pub fn save_meal_plan(&self, date: &str, meals: &DayMeals) -> Result<()> {
        self.db.save_meal_plan(parse_date(date)?, meals)
    }

    pub fn get_meal_plan(&self, date: &str) -> Result<DayMeals> {
        self.db.get_meal_plan(parse_date(date)?)
    }

    pub fn get_meal_plan_record(&self, date: &str) -> Result<Option<MealPlan>> {
        self.db.get_meal_plan_record(parse_date(date)?)
    }

    pub fn delete_meal_plan(&self, date: &str) -> Result<bool> {
        self.db.delete_meal_plan(parse_date(date)?)
    }

    pub fn plans_in_range(&self, start: &str, end: &str) -> Result<Vec<MealPlan>> {
        self.db.meal_plans_in_range(parse_date(start)?, parse_date(end)?)
    }

    /// All plans in one calendar month.
    pub fn month_plans(&self, year: i32, month: u32) -> Result<Vec<MealPlan>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| StoreError::Invalid(format!("Invalid month '{year}-{month:02}'")))?;
        let last = last_day_of_month(first);
        self.db.meal_plans_in_range(first, last)
    }

    /// Append a snapshot of a recipe to one slot of a date's plan.
    ///
    /// Read-modify-rewrite of the whole document: the current plan is
    /// loaded, mutated in memory, and written back in full. Two concurrent
    /// writers for the same date race, and the last commit wins.
    pub fn add_to_slot(&self, date: &str, slot: &str, recipe_id: i64) -> Result<DayMeals> {
        let slot = validate_meal_slot(slot)?;
        let day = parse_date(date)?;
        let recipe = self
            .db
            .get_recipe(recipe_id)?
            .ok_or(StoreError::RecipeNotFound(recipe_id))?;

        let mut meals = self.db.get_meal_plan(day)?;
        match meals.slot_mut(&slot) {
            Some(list) => list.push(RecipeRef::snapshot(&recipe)),
            None => return Err(StoreError::Invalid(format!("Invalid meal slot '{slot}'"))),
        }
        self.db.save_meal_plan(day, &meals)?;
        Ok(meals)
    }

    /// Remove every snapshot of a recipe from one slot of a date's plan.
    /// Succeeds silently when the recipe was not planned there.
    pub fn remove_from_slot(&self, date: &str, slot: &str, recipe_id: i64) -> Result<DayMeals> {
        let slot = validate_meal_slot(slot)?;
        let day = parse_date(date)?;

        let mut meals = self.db.get_meal_plan(day)?;
        match meals.slot_mut(&slot) {
            Some(list) => list.retain(|r| r.recipe_id != recipe_id),
            None => return Err(StoreError::Invalid(format!("Invalid meal slot '{slot}'"))),
        }
        self.db.save_meal_plan(day, &meals)?;
        Ok(meals)
    }
}

fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| StoreError::Invalid(format!("Invalid date '{date}'. Use YYYY-MM-DD")))
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("valid successor month")
        .pred_opt()
        .expect("month start has a predecessor")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe(title: &str, category: &str) -> NewRecipe {
        NewRecipe {
            title: title.to_string(),
            category: category.to_string(),
            age_range: "4-6 months".to_string(),
            prep_time: "10 min".to_string(),
            difficulty: "easy".to_string(),
            nutrition: None,
            ingredients: Some("apple".to_string()),
            steps: "Steam and mash.".to_string(),
        }
    }

    #[test]
    fn test_fresh_store_end_to_end() {
        let svc = PlannerService::new_in_memory().unwrap();

        let recipe = svc.add_recipe(&sample_recipe("Apple puree", "snack")).unwrap();
        assert_eq!(recipe.id, 1);

        let found = svc.search_recipes("apple", None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);

        svc.add_to_slot("2024-06-01", "breakfast", 1).unwrap();

        let meals = svc.get_meal_plan("2024-06-01").unwrap();
        assert_eq!(meals.breakfast.len(), 1);
        assert_eq!(meals.breakfast[0].recipe_id, 1);
        assert_eq!(meals.breakfast[0].title, "Apple puree");
        assert!(meals.lunch.is_empty());
        assert!(meals.dinner.is_empty());

        let plans = svc.plans_in_range("2024-06-01", "2024-06-01").unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].date, "2024-06-01");
    }

    #[test]
    fn test_add_recipe_rejects_invalid_category() {
        let svc = PlannerService::new_in_memory().unwrap();
        let err = svc.add_recipe(&sample_recipe("Cake", "dessert")).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_search_rejects_unknown_category_filter() {
        let svc = PlannerService::new_in_memory().unwrap();
        assert!(svc.search_recipes("", Some("dessert")).is_err());
        // Filter is normalized like everything else
        assert!(svc.search_recipes("", Some("Snack")).unwrap().is_empty());
    }

    #[test]
    fn test_add_to_slot_unknown_recipe() {
        let svc = PlannerService::new_in_memory().unwrap();
        let err = svc.add_to_slot("2024-06-01", "lunch", 99).unwrap_err();
        assert!(matches!(err, StoreError::RecipeNotFound(99)));
    }

    #[test]
    fn test_add_to_slot_invalid_slot() {
        let svc = PlannerService::new_in_memory().unwrap();
        svc.add_recipe(&sample_recipe("Apple puree", "snack")).unwrap();
        assert!(svc.add_to_slot("2024-06-01", "brunch", 1).is_err());
    }

    #[test]
    fn test_remove_from_slot() {
        let svc = PlannerService::new_in_memory().unwrap();
        svc.add_recipe(&sample_recipe("Apple puree", "snack")).unwrap();
        svc.add_to_slot("2024-06-01", "lunch", 1).unwrap();
        svc.add_to_slot("2024-06-01", "lunch", 1).unwrap();

        let meals = svc.remove_from_slot("2024-06-01", "lunch", 1).unwrap();
        assert!(meals.lunch.is_empty());

        // Removing again is a silent no-op
        let meals = svc.remove_from_slot("2024-06-01", "lunch", 1).unwrap();
        assert!(meals.lunch.is_empty());
    }

    #[test]
    fn test_plan_keeps_snapshot_title() {
        // Plans store copies; they are not views onto the recipes table.
        let svc = PlannerService::new_in_memory().unwrap();
        let recipe = svc.add_recipe(&sample_recipe("Apple puree", "snack")).unwrap();
        svc.add_to_slot("2024-06-01", "dinner", recipe.id).unwrap();

        let meals = svc.get_meal_plan("2024-06-01").unwrap();
        assert_eq!(meals.dinner[0].title, recipe.title);
        assert_eq!(meals.dinner[0].category, recipe.category);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let svc = PlannerService::new_in_memory().unwrap();
        assert!(svc.get_meal_plan("June 1st").is_err());
        assert!(svc.save_meal_plan("2024-13-40", &DayMeals::default()).is_err());
        assert!(svc.plans_in_range("2024-06-01", "soon").is_err());
    }

    #[test]
    fn test_month_plans() {
        let svc = PlannerService::new_in_memory().unwrap();
        for d in ["2024-06-01", "2024-06-30", "2024-07-01"] {
            svc.save_meal_plan(d, &DayMeals::default()).unwrap();
        }

        let june = svc.month_plans(2024, 6).unwrap();
        assert_eq!(june.len(), 2);
        assert!(june.iter().all(|p| p.date.starts_with("2024-06")));

        assert!(svc.month_plans(2024, 13).is_err());
    }

    #[test]
    fn test_last_day_of_month() {
        let first = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(last_day_of_month(first).day(), 29);
        let first = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(last_day_of_month(first).day(), 31);
    }

    #[test]
    fn test_delete_meal_plan_passthrough() {
        let svc = PlannerService::new_in_memory().unwrap();
        svc.save_meal_plan("2024-06-01", &DayMeals::default()).unwrap();
        assert!(svc.delete_meal_plan("2024-06-01").unwrap());
        assert!(!svc.delete_meal_plan("2024-06-01").unwrap());
    }

    #[test]
    fn test_open_or_recover_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("morsel.db");
        let svc = PlannerService::open_or_recover(&path).unwrap();
        assert!(svc.search_recipes("", None).unwrap().is_empty());
    }
}
