pub mod config;
pub mod dates;
pub mod list;
pub mod membership;
pub mod month;
pub mod new;
pub mod paint;
pub mod range;
pub mod show;

use anyhow::{Context, Result};
use chrono::Datelike;
use meetgrid_core::Cell;
use meetgrid_core::calendar::parse_date;
use meetgrid_core::time_block::parse_block;

/// Parse a grid cell written as DATE@TIME, e.g. "2022-08-03@18:30".
pub fn parse_cell(s: &str) -> Result<Cell> {
    let (date, time) = s
        .split_once('@')
        .with_context(|| format!("Invalid cell '{s}'. Expected DATE@TIME, e.g. 2022-08-03@18:30"))?;
    let block = parse_block(time)?;
    Ok(Cell::new(date, block))
}

/// Parse YYYY-MM into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let date = parse_date(&format!("{s}-01"))
        .map_err(|_| anyhow::anyhow!("Invalid month '{s}'. Expected YYYY-MM"))?;
    Ok((date.year(), date.month()))
}
