pub mod compiler;
pub mod config;
pub mod logger;
pub mod plugin;
pub mod plugins;
