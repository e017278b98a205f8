use std::path::Path;

use anyhow::Result;
use calview_core::config::CalViewConfig;
use owo_colors::OwoColorize;

pub fn init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!(
            "{} {}",
            "Config already exists:".yellow(),
            config_path.display()
        );
        return Ok(());
    }

    CalViewConfig::create_default_config(config_path)?;
    println!("{} {}", "Created".green(), config_path.display());
    Ok(())
}

pub fn path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}
