//! Configuration file loading for dualchat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DUALCHAT_*` environment variables (`DUALCHAT_CHAT__PRIMARY_BACKEND=gpt`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./dualchat.toml` or `./.dualchat.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/dualchat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileAnthropicConfig, FileChatConfig, FileConfig, FileGeminiConfig,
    FileLoggingConfig, FileOpenAiConfig, FilePersonasConfig, FileProvidersConfig,
    FileReplConfig, Severity,
};
pub use loader::ConfigLoader;
