use anyhow::Result;
use calview_core::config::CalViewConfig;
use owo_colors::OwoColorize;

pub fn run(config: &CalViewConfig) -> Result<()> {
    let directory = config.school_directory();

    for (i, school) in directory.schools().iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} {}", school.name.bold(), format!("[{}]", school.key).dimmed());
        println!("  City:    {}", school.city);
        match school.coordinates {
            Some(c) => println!("  Campus:  {}", c),
            None => println!("  Campus:  {}", "unknown".dimmed()),
        }
        for (alias, address) in &school.aliases {
            println!("  {} → {}", alias, address.dimmed());
        }
    }

    Ok(())
}
