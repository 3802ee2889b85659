mod calendar;
mod db;
mod helpers;
mod plan;
mod recipe;

pub(crate) use calendar::cmd_calendar;
pub(crate) use db::cmd_db_reset;
pub(crate) use plan::{cmd_plan_add, cmd_plan_clear, cmd_plan_remove, cmd_plan_show};
pub(crate) use recipe::{cmd_recipe_add, cmd_recipe_list, cmd_recipe_show};
