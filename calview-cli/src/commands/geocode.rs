use anyhow::Result;
use calview_core::config::CalViewConfig;
use calview_core::geo::Coordinates;
use calview_core::geocode::{GeocodeGateway, LocationCache};
use calview_core::location::normalize_location;
use calview_provider_google::GoogleGeocoder;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tui;

pub async fn run(config: &CalViewConfig, address: &str, near: Option<Coordinates>) -> Result<()> {
    let geocoder = GoogleGeocoder::from_env()?;
    let cache = LocationCache::disabled();
    let gateway = GeocodeGateway::new(&geocoder, &cache).with_timeout(config.geocoder.timeout());

    let query = normalize_location(address);

    let spinner = tui::create_spinner(format!("Looking up {}", query));
    let outcome = gateway.lookup(&query, near).await;
    spinner.finish_and_clear();

    if query != address {
        println!("{} {}", "query:".dimmed(), query);
    }
    if let Some(near) = near {
        println!("{} {}", "near:".dimmed(), near);
    }
    println!("{}", outcome.render());

    Ok(())
}
