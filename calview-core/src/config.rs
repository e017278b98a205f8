//! calview configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalViewError, CalViewResult};
use crate::school::{School, SchoolDirectory};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocoderConfig {
    /// Per-lookup timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Memoize lookups for the life of the process.
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        GeocoderConfig {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache: true,
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration at ~/.config/calview/config.toml, overridable with
/// `CALVIEW__SECTION__KEY` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CalViewConfig {
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Schools in addition to the built-in ones.
    #[serde(default)]
    pub schools: Vec<School>,
}

impl CalViewConfig {
    pub fn config_path() -> CalViewResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalViewError::Config("Could not determine config directory".into()))?
            .join("calview");

        Ok(config_dir.join("config.toml"))
    }

    /// A missing file means defaults.
    pub fn load_from(path: &Path) -> CalViewResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CALVIEW").separator("__"))
            .build()
            .map_err(|e| CalViewError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalViewError::Config(e.to_string()))
    }

    /// Built-in schools merged with configured ones.
    pub fn school_directory(&self) -> SchoolDirectory {
        SchoolDirectory::builtin().merge(SchoolDirectory::new(self.schools.clone()))
    }

    /// Write a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> CalViewResult<()> {
        let contents = format!(
            "\
# calview configuration

[geocoder]
# Seconds to wait for each lookup:
# timeout_secs = {DEFAULT_TIMEOUT_SECS}

# Remember lookups while the process runs:
# cache = true

# Extra schools (University of Virginia is built in):
# [[schools]]
# key = \"virginia tech\"
# name = \"Virginia Tech\"
# city = \"Blacksburg, VA\"
# coordinates = {{ lat = 37.2284, lng = -80.4234 }}
#
# [schools.aliases]
# torgersen = \"620 Drillfield Dr, Blacksburg, VA 24061\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalViewError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalViewError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
