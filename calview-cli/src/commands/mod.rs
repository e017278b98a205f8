pub mod config;
pub mod geocode;
pub mod normalize;
pub mod parse;
pub mod schools;
