use std::path::PathBuf;

use anyhow::Result;
use meetgrid_core::config::MeetgridConfig;
use owo_colors::OwoColorize;

pub fn run(username: Option<String>, data_dir: Option<PathBuf>) -> Result<()> {
    let mut config = MeetgridConfig::load()?;
    let changed = username.is_some() || data_dir.is_some();

    if let Some(username) = username {
        config.username = Some(username);
    }
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    if changed {
        config.save()?;
    }

    println!("{}", MeetgridConfig::config_path()?.display().dimmed());
    println!("data_dir = {}", config.data_dir.display());
    println!(
        "username = {}",
        config.username.as_deref().unwrap_or("(not set)")
    );

    Ok(())
}
