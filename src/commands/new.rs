use anyhow::Result;
use meetgrid_core::time_block::{parse_block, parse_range_end};
use meetgrid_core::{AuthScope, Event};
use owo_colors::OwoColorize;
use uuid::Uuid;

use crate::context::AppContext;
use crate::render::Render;

pub async fn run(ctx: &AppContext, name: &str, dates: &[String], from: &str, to: &str) -> Result<()> {
    let owner = ctx.username()?;
    let earliest = parse_block(from)?;
    let latest = parse_range_end(to)?;

    let event = Event::new(name, &owner, AuthScope::Local, dates, earliest, latest)?;
    let event_id = Uuid::new_v4().to_string();

    ctx.documents().create(&event_id, &event).await?;

    println!("{}", event.render());
    println!();
    println!("Created event {}", event_id.bold());
    println!(
        "{}",
        format!("Share it and paint your availability with: meetgrid paint {event_id} <from> <to>")
            .dimmed()
    );

    Ok(())
}
