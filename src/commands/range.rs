use anyhow::Result;
use meetgrid_core::time_block::{block_label, parse_block, parse_range_end};

use crate::context::AppContext;

pub async fn run(ctx: &AppContext, event_id: &str, from: &str, to: &str) -> Result<()> {
    let earliest = parse_block(from)?;
    let latest = parse_range_end(to)?;

    let mut session = ctx.open_session(event_id).await?;
    session.set_time_range(earliest, latest)?.wait().await?;

    println!(
        "Showing {}–{} for {}",
        block_label(earliest),
        block_label(latest),
        session.event()
    );
    Ok(())
}
