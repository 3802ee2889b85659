use anyhow::Result;
use std::io::{self, BufRead, Write};

use morsel_core::service::PlannerService;

pub(crate) fn cmd_db_reset(service: &mut PlannerService, yes: bool) -> Result<()> {
    if !yes {
        print!("This deletes ALL recipes and meal plans. Type 'yes' to continue: ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if answer.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }
    service.reset()?;
    println!("Database reset. A fresh empty schema is in place.");
    Ok(())
}
