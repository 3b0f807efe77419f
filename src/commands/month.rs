use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{Datelike, Local};

use super::parse_month;
use crate::context::AppContext;
use crate::render::render_month;

pub async fn run(ctx: &AppContext, month: Option<&str>, event_id: Option<&str>) -> Result<()> {
    let (year, month) = match month {
        Some(m) => parse_month(m)?,
        None => {
            let today = Local::now().date_naive();
            (today.year(), today.month())
        }
    };

    let highlighted: BTreeSet<String> = match event_id {
        Some(id) => {
            let event = ctx.documents().load(id).await?;
            event.dates().into_iter().map(String::from).collect()
        }
        None => BTreeSet::new(),
    };

    println!("{}", render_month(year, month, &highlighted));
    Ok(())
}
