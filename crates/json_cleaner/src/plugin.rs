use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::compiler::Context;
use crate::config::{Config, ConfigError};

pub trait Plugin: Send + Sync {
    /// define plugin name
    ///
    /// Note: it is recommended to prefix a namespace to avoid name conflicts
    fn name(&self) -> &str;

    /// identity used to detect duplicated registrations, defaults to the name
    ///
    /// plugins that can be registered several times should make it unique per instance
    fn id(&self) -> String {
        self.name().to_string()
    }

    fn modify_config(&self, _config: &mut Config) -> Result<()> {
        Ok(())
    }

    fn build_start(&self, _context: &Arc<Context>) -> Result<()> {
        Ok(())
    }

    fn build_end(&self, _context: &Arc<Context>) -> Result<()> {
        Ok(())
    }
}

pub struct PluginDriver {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginDriver {
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Result<Self> {
        let mut ids = HashSet::new();
        for plugin in &plugins {
            let id = plugin.id();
            if !ids.insert(id.clone()) {
                return Err(ConfigError::DuplicatePlugin(id).into());
            }
        }
        Ok(Self { plugins })
    }

    pub fn modify_config(&self, config: &mut Config) -> Result<()> {
        for plugin in &self.plugins {
            plugin.modify_config(config)?;
        }
        Ok(())
    }

    pub fn build_start(&self, context: &Arc<Context>) -> Result<()> {
        for plugin in &self.plugins {
            debug!("build_start: {}", plugin.name());
            plugin.build_start(context)?;
        }
        Ok(())
    }

    pub fn build_end(&self, context: &Arc<Context>) -> Result<()> {
        for plugin in &self.plugins {
            debug!("build_end: {}", plugin.name());
            plugin.build_end(context)?;
        }
        Ok(())
    }
}
