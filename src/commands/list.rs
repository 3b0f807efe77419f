use anyhow::Result;
use owo_colors::OwoColorize;

use crate::context::AppContext;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let ids = ctx.documents().list().await?;

    if ids.is_empty() {
        println!(
            "No events in {}.\n\nCreate one with:\n  meetgrid new <name> --dates <YYYY-MM-DD,...>",
            ctx.config.data_path().display()
        );
        return Ok(());
    }

    for id in ids {
        match ctx.documents().load(&id).await {
            Ok(event) => println!(
                "{}  {} {}",
                id.dimmed(),
                event.name.bold(),
                format!(
                    "({} dates, {} members)",
                    event.group_availabilities.len(),
                    event.members.len()
                )
                .dimmed()
            ),
            Err(e) => println!("{}  {}", id.dimmed(), e.to_string().red()),
        }
    }

    Ok(())
}
