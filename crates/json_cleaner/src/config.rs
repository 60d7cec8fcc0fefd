mod macros;
mod json_cleaner;
mod output;

use std::path::Path;

use anyhow::{anyhow, Result};
use colored::Colorize;
pub use json_cleaner::{deserialize_json_cleaner, JsonCleanerConfig, Space};
pub use output::OutputConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub output: OutputConfig,
    #[serde(deserialize_with = "deserialize_json_cleaner", default)]
    pub json_cleaner: Vec<JsonCleanerConfig>,
}

const CONFIG_FILE: &str = "cleaner.config.json";
const DEFAULT_CONFIG: &str = r#"
{
    "output": { "path": "dist" },
    "jsonCleaner": []
}
"#;

impl Config {
    pub fn new(
        root: &Path,
        default_config: Option<&str>,
        override_config: Option<&str>,
    ) -> Result<Self> {
        let abs_config_file = root.join(CONFIG_FILE);
        let abs_config_file = abs_config_file
            .to_str()
            .ok_or_else(|| anyhow!("config path is not valid utf-8: {:?}", abs_config_file))?;
        let c = config::Config::builder();
        // default config
        let c = c.add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Json5,
        ));
        // default config from args
        let c = if let Some(default_config) = default_config {
            c.add_source(config::File::from_str(
                default_config,
                config::FileFormat::Json5,
            ))
        } else {
            c
        };
        // user config
        let c = c.add_source(config::File::with_name(abs_config_file).required(false));
        // override config
        let c = if let Some(override_config) = override_config {
            c.add_source(config::File::from_str(
                override_config,
                config::FileFormat::Json5,
            ))
        } else {
            c
        };

        let c = c.build()?;
        let mut ret = c.try_deserialize::<Config>();
        // normalize
        if let Ok(config) = &mut ret {
            config.normalize(root);
        }
        ret.map_err(|e| anyhow!("{}: {}", "config error".red(), e.to_string().red()))
    }

    pub(crate) fn normalize(&mut self, root: &Path) {
        if self.output.path.is_relative() {
            self.output.path = root.join(&self.output.path);
        }
        for cleaner in self.json_cleaner.iter_mut() {
            if cleaner.src.is_relative() {
                cleaner.src = root.join(&cleaner.src);
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig {
                path: "dist".into(),
            },
            json_cleaner: vec![],
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("root path must be absolute, got {0:?}")]
    RelativeRoot(String),
    #[error("plugin {0} already exist, please check your plugin name")]
    DuplicatePlugin(String),
}
