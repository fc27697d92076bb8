//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["dualchat.toml", ".dualchat.toml"];
const ENV_PREFIX: &str = "DUALCHAT_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `DUALCHAT_*` environment variables, `__` separating sections
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./dualchat.toml` or `./.dualchat.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/dualchat/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut files = Vec::new();
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            files.push(global_path);
        }
        if let Some(project_path) = Self::project_config_path() {
            files.push(project_path);
        }
        if let Some(path) = config_path {
            files.push(path.clone());
        }

        Self::figment(&files)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load and merge exactly `files`, later files taking precedence.
    ///
    /// No discovery and no environment layer.
    pub fn load_files(files: &[PathBuf]) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(files).extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(files: &[PathBuf]) -> Figment {
        files.iter().fold(
            Figment::new().merge(Serialized::defaults(FileConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/dualchat/config.toml if set,
    /// otherwise falls back to ~/.config/dualchat/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dualchat").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [ env ] Environment: DUALCHAT_* (e.g. DUALCHAT_CHAT__PRIMARY_BACKEND)");

        if let Some(path) = explicit {
            let found = if path.exists() { "FOUND" } else { "     " };
            println!("  [{found}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./dualchat.toml or ./.dualchat.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualchat_domain::BackendId;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.chat.primary_backend, "claude");
        assert_eq!(config.chat.pacing_delay_ms, 50);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("dualchat"));
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(
            &global,
            "[chat]\nprimary_backend = \"gemini\"\npacing_delay_ms = 10\n",
        )
        .unwrap();
        std::fs::write(&explicit, "[chat]\nprimary_backend = \"gpt\"\n").unwrap();

        let config = ConfigLoader::load_files(&[global, explicit]).unwrap();

        assert_eq!(config.chat.primary_backend, "gpt");
        // Fields absent from the later file survive from the earlier one
        assert_eq!(config.chat.pacing_delay_ms, 10);
        assert_eq!(config.to_chat_config().primary_backend, BackendId::OpenAi);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dualchat.toml");
        std::fs::write(&path, "[providers.gemini]\nmodel = \"gemini-1.5-flash\"\n").unwrap();

        let config = ConfigLoader::load_files(&[path]).unwrap();

        assert_eq!(config.providers.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.providers.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.chat, ConfigLoader::load_defaults().chat);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[chat\nprimary_backend = ").unwrap();

        assert!(ConfigLoader::load_files(&[path]).is_err());
    }

    #[test]
    fn test_project_config_discovery() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ConfigLoader::project_config_in(dir.path()), None);

        let hidden = dir.path().join(".dualchat.toml");
        std::fs::write(&hidden, "").unwrap();
        assert_eq!(ConfigLoader::project_config_in(dir.path()), Some(hidden));

        let visible = dir.path().join("dualchat.toml");
        std::fs::write(&visible, "").unwrap();
        assert_eq!(ConfigLoader::project_config_in(dir.path()), Some(visible));
    }
}
