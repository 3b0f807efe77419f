use anyhow::Result;
use meetgrid_core::SelectionMode;
use owo_colors::OwoColorize;

use super::parse_cell;
use crate::context::AppContext;
use crate::render::render_interval;

/// Replays one drag gesture: pointer down on `from`, moved to `to`, released.
pub async fn run(ctx: &AppContext, event_id: &str, from: &str, to: Option<&str>) -> Result<()> {
    let username = ctx.username()?;
    let anchor = parse_cell(from)?;
    let end = to.map(parse_cell).transpose()?;

    let mut session = ctx.open_session(event_id).await?;
    if !session.event().is_member(&username) {
        anyhow::bail!(
            "You are not a member of '{}'.\n\nJoin it first with:\n  meetgrid join {}",
            session.event(),
            event_id
        );
    }

    let mode = session.begin_selection(anchor)?;
    if let Some(end) = end {
        session.extend_selection(end);
    }
    let before = session.event().group_availabilities.clone();
    tracing::debug!(
        event = event_id,
        %mode,
        cells = session.selected_cells().len(),
        "committing painted area"
    );

    match session.commit_selection()? {
        Some(pending) => {
            pending.wait().await?;
            let cells = before.changed_cells(&session.event().group_availabilities, &username);
            let summary = match mode {
                SelectionMode::Select => format!("Marked available in {cells} cells").green().to_string(),
                SelectionMode::Deselect => format!("Cleared {cells} cells").yellow().to_string(),
            };
            println!("{summary}");
        }
        None => println!("{}", "Nothing changed".dimmed()),
    }

    let event = session.event();
    for interval in event.intervals() {
        println!();
        println!("{}", render_interval(event, &interval, Some(&username)));
    }

    Ok(())
}
