use anyhow::Result;
use meetgrid_core::{AuthScope, Member};

use crate::context::AppContext;
use crate::render::Render;

pub async fn join(ctx: &AppContext, event_id: &str) -> Result<()> {
    let username = ctx.username()?;
    let mut session = ctx.open_session(event_id).await?;

    session.join(Member::new(AuthScope::Local))?.wait().await?;

    println!("Joined {} as {}", session.event(), username);
    Ok(())
}

pub async fn leave(ctx: &AppContext, event_id: &str) -> Result<()> {
    let mut session = ctx.open_session(event_id).await?;

    let (outcome, pending) = session.leave()?;
    pending.wait().await?;

    println!("{}", outcome.render());
    Ok(())
}
