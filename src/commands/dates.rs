use anyhow::Result;
use owo_colors::OwoColorize;

use crate::context::AppContext;

pub async fn run(ctx: &AppContext, event_id: &str, add: &[String], remove: &[String]) -> Result<()> {
    if add.is_empty() && remove.is_empty() {
        anyhow::bail!("Nothing to do. Pass --add and/or --remove with YYYY-MM-DD dates");
    }

    let mut session = ctx.open_session(event_id).await?;

    for date in add {
        match session.add_date(date)? {
            Some(pending) => {
                pending.wait().await?;
                println!("{} {}", "+".green(), date.green());
            }
            None => println!("{}", format!("  {date} (already a candidate date)").dimmed()),
        }
    }

    for date in remove {
        match session.remove_date(date)? {
            Some(pending) => {
                pending.wait().await?;
                println!("{} {}", "-".red(), date.red());
            }
            None => println!("{}", format!("  {date} (not a candidate date)").dimmed()),
        }
    }

    Ok(())
}
