use std::path::PathBuf;

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::create_deserialize_fn;

/// Options of a single json cleaner, captured once when the plugin is registered.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JsonCleanerConfig {
    /// Source json file
    pub src: PathBuf,
    /// Output json file, relative to the output path
    pub out: PathBuf,
    /// Remove the top-level `$schema` field
    #[serde(default)]
    pub remove_schema: bool,
    /// Remove the given top-level fields, missing ones are ignored
    #[serde(default)]
    pub remove_tags: Vec<String>,
    /// Write without any indentation, takes precedence over `space`
    #[serde(default)]
    pub minify: bool,
    /// Indentation, a width or a literal string, defaults to `\t`
    #[serde(default)]
    pub space: Option<Space>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Space {
    Width(f64),
    Text(String),
}

// numbers keep their source text, so go through `Value` instead of an untagged buffer
impl<'de> Deserialize<'de> for Space {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_f64()
                .map(Space::Width)
                .ok_or_else(|| D::Error::custom(format!("invalid `space` width: {}", n))),
            Value::String(s) => Ok(Space::Text(s)),
            value => Err(D::Error::custom(format!("invalid `space` value: {}", value))),
        }
    }
}

impl JsonCleanerConfig {
    pub fn new<S: Into<PathBuf>, O: Into<PathBuf>>(src: S, out: O) -> Self {
        Self {
            src: src.into(),
            out: out.into(),
            remove_schema: false,
            remove_tags: vec![],
            minify: false,
            space: None,
        }
    }
}

create_deserialize_fn!(deserialize_json_cleaner, JsonCleanerConfig);
