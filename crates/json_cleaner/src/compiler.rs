use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::plugin::{Plugin, PluginDriver};
use crate::plugins::json_cleaner::JsonCleanerPlugin;

pub struct Context {
    pub config: Config,
    pub root: PathBuf,
}

pub struct Compiler {
    pub context: Arc<Context>,
    plugin_driver: PluginDriver,
}

impl Compiler {
    pub fn new(
        mut config: Config,
        root: PathBuf,
        extra_plugins: Vec<Arc<dyn Plugin>>,
    ) -> Result<Self> {
        if !root.is_absolute() {
            return Err(ConfigError::RelativeRoot(root.to_string_lossy().to_string()).into());
        }

        // allow plugin to modify config before it is normalized
        PluginDriver::new(extra_plugins.clone())?.modify_config(&mut config)?;
        config.normalize(&root);

        // cleaners are built from the final config
        let mut plugins: Vec<Arc<dyn Plugin>> = config
            .json_cleaner
            .iter()
            .map(|options| Arc::new(JsonCleanerPlugin::new(options.clone())) as Arc<dyn Plugin>)
            .collect();
        plugins.extend(extra_plugins);

        let plugin_driver = PluginDriver::new(plugins)?;

        Ok(Self {
            context: Arc::new(Context { config, root }),
            plugin_driver,
        })
    }

    pub fn compile(&self) -> Result<()> {
        let t_compile = Instant::now();
        debug!("compile: {:?}", self.context.root);

        self.plugin_driver.build_start(&self.context)?;
        self.plugin_driver.build_end(&self.context)?;

        info!("Complete in {}ms", t_compile.elapsed().as_millis());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::Compiler;
    use crate::config::{Config, ConfigError, JsonCleanerConfig};
    use crate::plugin::Plugin;
    use crate::plugins::json_cleaner::JsonCleanerPlugin;

    struct OverridePlugin;

    impl Plugin for OverridePlugin {
        fn name(&self) -> &str {
            "test:override"
        }

        fn modify_config(&self, config: &mut Config) -> Result<()> {
            config.output.path = PathBuf::from("overridden");
            config.json_cleaner[0].remove_tags = vec!["a".to_string()];
            config.json_cleaner[0].minify = true;
            Ok(())
        }
    }

    #[test]
    fn test_relative_root() {
        let ret = Compiler::new(Config::default(), PathBuf::from("relative"), vec![]);
        assert!(matches!(
            ret.err().unwrap().downcast_ref::<ConfigError>(),
            Some(ConfigError::RelativeRoot(_))
        ));
    }

    #[test]
    fn test_duplicated_cleaner_output() {
        let mut config = Config::default();
        config.json_cleaner = vec![
            JsonCleanerConfig::new("a.json", "data.json"),
            JsonCleanerConfig::new("b.json", "other.json"),
        ];
        let ret = Compiler::new(
            config,
            std::env::temp_dir(),
            vec![Arc::new(JsonCleanerPlugin::new(JsonCleanerConfig::new(
                "c.json",
                "data.json",
            )))],
        );
        assert!(matches!(
            ret.err().unwrap().downcast_ref::<ConfigError>(),
            Some(ConfigError::DuplicatePlugin(_))
        ));
    }

    #[test]
    fn test_same_output_written_differently() {
        let mut config = Config::default();
        config.json_cleaner = vec![
            JsonCleanerConfig::new("a.json", "data.json"),
            JsonCleanerConfig::new("b.json", "./nested/../data.json"),
        ];
        let ret = Compiler::new(config, std::env::temp_dir(), vec![]);
        assert!(matches!(
            ret.err().unwrap().downcast_ref::<ConfigError>(),
            Some(ConfigError::DuplicatePlugin(id)) if id == "json-cleaner:data.json"
        ));

        let mut config = Config::default();
        config.json_cleaner = vec![
            JsonCleanerConfig::new("a.json", "data.json"),
            JsonCleanerConfig::new("b.json", "/data.json"),
        ];
        let ret = Compiler::new(config, std::env::temp_dir(), vec![]);
        assert!(matches!(
            ret.err().unwrap().downcast_ref::<ConfigError>(),
            Some(ConfigError::DuplicatePlugin(_))
        ));
    }

    #[test]
    fn test_modify_config_runs_before_normalize() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/data.json"), r#"{"a":1,"b":2}"#).unwrap();
        let mut config = Config::default();
        config.json_cleaner = vec![JsonCleanerConfig::new("src/data.json", "data.json")];

        let compiler =
            Compiler::new(config, root.to_path_buf(), vec![Arc::new(OverridePlugin)]).unwrap();
        compiler.compile().unwrap();

        assert_eq!(compiler.context.config.output.path, root.join("overridden"));
        assert_eq!(
            fs::read_to_string(root.join("overridden/data.json")).unwrap(),
            r#"{"b":2}"#
        );
    }
}
