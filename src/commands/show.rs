use anyhow::Result;
use meetgrid_core::identity::IdentityProvider;
use owo_colors::OwoColorize;

use crate::context::AppContext;
use crate::render::{Render, render_interval};

pub async fn run(ctx: &AppContext, event_id: &str, best: usize, json: bool) -> Result<()> {
    let event = ctx.documents().load(event_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&event)?);
        return Ok(());
    }

    let viewer = ctx.identity.current_user();

    println!("{}", event.render());

    let intervals = event.intervals();
    if intervals.is_empty() {
        println!("\n   {}", "No candidate dates yet".dimmed());
        return Ok(());
    }

    for interval in &intervals {
        println!();
        println!("{}", render_interval(&event, interval, viewer.as_deref()));
    }

    let slots = event.best_slots(best);
    if best > 0 && !slots.is_empty() {
        println!();
        println!("{}", "Best times:".bold());
        for slot in slots {
            println!("   {}", slot.render());
        }
    }

    Ok(())
}
