use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rusqlite::{Connection, params};

use crate::error::{Result, StoreError};
use crate::models::{DayMeals, MealPlan, NewRecipe, Recipe};

/// Baseline schema version. The tracked version can rise above this at
/// runtime when a self-healing reopen forces a structural repair.
const SCHEMA_VERSION: i64 = 1;

const BASE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        category TEXT NOT NULL,
        age_range TEXT NOT NULL,
        prep_time TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        nutrition TEXT,
        ingredients TEXT,
        steps TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_recipes_title ON recipes(title);
    CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category);
    CREATE INDEX IF NOT EXISTS idx_recipes_created_at ON recipes(created_at);

    CREATE TABLE IF NOT EXISTS meal_plans (
        date TEXT PRIMARY KEY,
        meals TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_meal_plans_date ON meal_plans(date);";

/// The recipe and meal-plan store over one SQLite connection.
///
/// Constructed explicitly and passed to whoever owns startup — there is no
/// process-wide instance, so tests get one isolated store each. `init` runs
/// in the constructors; `close` tears the connection down, after which every
/// operation reports `NotInitialized`.
pub struct Database {
    path: Option<PathBuf>,
    schema_version: i64,
    conn: Option<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let mut db = Database {
            path: Some(path.to_path_buf()),
            schema_version: SCHEMA_VERSION,
            conn: None,
        };
        db.init()?;
        Ok(db)
    }

    /// Open with the documented recovery policy: if initialization fails,
    /// make exactly one destructive reset attempt, then give up.
    pub fn open_or_recover(path: &Path) -> Result<Self> {
        let mut db = Database {
            path: Some(path.to_path_buf()),
            schema_version: SCHEMA_VERSION,
            conn: None,
        };
        if db.init().is_err() {
            db.reset()?;
        }
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let mut db = Database {
            path: None,
            schema_version: SCHEMA_VERSION,
            conn: None,
        };
        db.init()?;
        Ok(db)
    }

    /// Idempotent-by-retry initializer: closes any held connection, reopens,
    /// migrates, then verifies both required tables exist. A missing table
    /// forces a version bump and a re-init, which re-asserts the schema
    /// additively — existing rows in the surviving tables are kept.
    pub fn init(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            let _ = conn.close();
        }

        let conn = self.connect()?;
        migrate(&conn, self.schema_version)?;

        if !table_exists(&conn, "recipes")? || !table_exists(&conn, "meal_plans")? {
            let _ = conn.close();
            self.schema_version += 1;
            return self.init();
        }

        self.conn = Some(conn);
        Ok(())
    }

    /// Destructive recovery: close, delete the database file, recreate empty.
    pub fn reset(&mut self) -> Result<()> {
        self.close();
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::Reset(e)),
            }
        }
        self.init()
    }

    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = conn.close();
        }
    }

    fn connect(&self) -> Result<Connection> {
        let opened = match &self.path {
            Some(path) => Connection::open(path),
            None => Connection::open_in_memory(),
        };
        // A locked or otherwise blocked database surfaces here too; it is
        // reported to the caller rather than retried.
        opened.map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotInitialized)
    }

    fn require_table(&self, name: &str) -> Result<()> {
        if table_exists(self.conn()?, name)? {
            Ok(())
        } else {
            Err(StoreError::Schema(name.to_string()))
        }
    }

    // --- Recipes ---

    fn recipe_from_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        Ok(Recipe {
            id: row.get(0)?,
            title: row.get(1)?,
            category: row.get(2)?,
            age_range: row.get(3)?,
            prep_time: row.get(4)?,
            difficulty: row.get(5)?,
            nutrition: row.get(6)?,
            ingredients: row.get(7)?,
            steps: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    /// Insert a recipe, stamping its creation timestamp. The timestamp is
    /// set exactly once, here; no operation ever updates it.
    pub fn add_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        self.require_table("recipes")?;
        let now = Local::now().to_rfc3339();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO recipes (title, category, age_range, prep_time, difficulty, nutrition, ingredients, steps, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                recipe.title,
                recipe.category,
                recipe.age_range,
                recipe.prep_time,
                recipe.difficulty,
                recipe.nutrition,
                recipe.ingredients,
                recipe.steps,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Recipe {
            id,
            title: recipe.title.clone(),
            category: recipe.category.clone(),
            age_range: recipe.age_range.clone(),
            prep_time: recipe.prep_time.clone(),
            difficulty: recipe.difficulty.clone(),
            nutrition: recipe.nutrition.clone(),
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
            created_at: now,
        })
    }

    pub fn get_recipe(&self, id: i64) -> Result<Option<Recipe>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, category, age_range, prep_time, difficulty, nutrition, ingredients, steps, created_at
             FROM recipes WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::recipe_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Substring/category search over the full collection, most recent first.
    ///
    /// The collection is loaded in storage order and filtered in memory:
    /// exact category match (`None` means no filter) AND, for a non-empty
    /// term, a case-insensitive substring match against title, ingredients,
    /// or steps. The sort is stable, so equal timestamps keep storage order.
    /// No results is an empty list, never an error.
    pub fn search_recipes(&self, term: &str, category: Option<&str>) -> Result<Vec<Recipe>> {
        self.require_table("recipes")?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, category, age_range, prep_time, difficulty, nutrition, ingredients, steps, created_at
             FROM recipes ORDER BY id",
        )?;
        let mut recipes = stmt
            .query_map([], Self::recipe_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let needle = term.to_lowercase();
        recipes.retain(|r| {
            if !category.is_none_or(|c| r.category == c) {
                return false;
            }
            if needle.is_empty() {
                return true;
            }
            r.title.to_lowercase().contains(&needle)
                || r.ingredients
                    .as_deref()
                    .is_some_and(|i| i.to_lowercase().contains(&needle))
                || r.steps.to_lowercase().contains(&needle)
        });
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    // --- Meal plans ---

    /// Upsert the meals document for one date. Whole-document replacement:
    /// callers supply the complete desired state for all slots every time.
    pub fn save_meal_plan(&self, date: NaiveDate, meals: &DayMeals) -> Result<()> {
        self.require_table("meal_plans")?;
        let doc = serde_json::to_string(meals)?;
        let now = Local::now().to_rfc3339();
        let date_str = date.format("%Y-%m-%d").to_string();
        self.conn()?.execute(
            "INSERT OR REPLACE INTO meal_plans (date, meals, updated_at) VALUES (?1, ?2, ?3)",
            params![date_str, doc, now],
        )?;
        Ok(())
    }

    /// Meals for a date, or the all-slots-empty default when none is saved.
    pub fn get_meal_plan(&self, date: NaiveDate) -> Result<DayMeals> {
        let conn = self.conn()?;
        let date_str = date.format("%Y-%m-%d").to_string();
        let mut stmt = conn.prepare("SELECT meals FROM meal_plans WHERE date = ?1")?;
        let mut rows = stmt.query(params![date_str])?;
        if let Some(row) = rows.next()? {
            let doc: String = row.get(0)?;
            Ok(serde_json::from_str(&doc)?)
        } else {
            Ok(DayMeals::default())
        }
    }

    pub fn get_meal_plan_record(&self, date: NaiveDate) -> Result<Option<MealPlan>> {
        let conn = self.conn()?;
        let date_str = date.format("%Y-%m-%d").to_string();
        let mut stmt =
            conn.prepare("SELECT date, meals, updated_at FROM meal_plans WHERE date = ?1")?;
        let mut rows = stmt.query(params![date_str])?;
        if let Some(row) = rows.next()? {
            let doc: String = row.get(1)?;
            Ok(Some(MealPlan {
                date: row.get(0)?,
                meals: serde_json::from_str(&doc)?,
                updated_at: row.get(2)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Idempotent delete: returns false when the date had no record.
    pub fn delete_meal_plan(&self, date: NaiveDate) -> Result<bool> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let rows = self
            .conn()?
            .execute("DELETE FROM meal_plans WHERE date = ?1", params![date_str])?;
        Ok(rows > 0)
    }

    /// Plans with `start <= date <= end`, both bounds inclusive. The date
    /// column is fixed-width `%Y-%m-%d` text, so the text comparison is a
    /// chronological one. No ordering beyond storage order is promised.
    pub fn meal_plans_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<MealPlan>> {
        let conn = self.conn()?;
        let start_str = start.format("%Y-%m-%d").to_string();
        let end_str = end.format("%Y-%m-%d").to_string();
        let mut stmt = conn
            .prepare("SELECT date, meals, updated_at FROM meal_plans WHERE date >= ?1 AND date <= ?2")?;
        let mut rows = stmt.query(params![start_str, end_str])?;
        let mut plans = Vec::new();
        while let Some(row) = rows.next()? {
            let doc: String = row.get(1)?;
            plans.push(MealPlan {
                date: row.get(0)?,
                meals: serde_json::from_str(&doc)?,
                updated_at: row.get(2)?,
            });
        }
        Ok(plans)
    }
}

fn migrate(conn: &Connection, target: i64) -> Result<()> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        conn.execute_batch(BASE_SCHEMA)?;
        conn.pragma_update(None, "user_version", 1)?;
    }

    if target > SCHEMA_VERSION && version < target {
        // Forced structural repair after a self-healing version bump: the
        // same schema is re-asserted additively. Nothing is dropped, so a
        // repair never loses rows from tables that survived.
        conn.execute_batch(BASE_SCHEMA)?;
        conn.pragma_update(None, "user_version", target)?;
    }

    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
