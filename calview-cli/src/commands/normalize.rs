use anyhow::Result;
use calview_core::location::normalize_location;
use owo_colors::OwoColorize;

pub fn run(locations: &[String]) -> Result<()> {
    for raw in locations {
        let cleaned = normalize_location(raw);
        if cleaned == *raw {
            println!("{}", raw);
        } else {
            println!("{} {} {}", raw.dimmed(), "→".dimmed(), cleaned.green());
        }
    }
    Ok(())
}
