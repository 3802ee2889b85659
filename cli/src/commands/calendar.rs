use anyhow::Result;
use morsel_core::service::PlannerService;

use super::helpers::parse_month_arg;
use super::plan::print_day;

pub(crate) fn cmd_calendar(
    service: &PlannerService,
    month: Option<String>,
    json: bool,
) -> Result<()> {
    let (year, month) = parse_month_arg(month)?;
    let plans = service.month_plans(year, month)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    println!("Meal plans for {year}-{month:02}");
    if plans.is_empty() {
        println!("  (nothing planned)");
        return Ok(());
    }
    for plan in &plans {
        println!("{}", plan.date);
        print_day(&plan.meals);
    }
    Ok(())
}
