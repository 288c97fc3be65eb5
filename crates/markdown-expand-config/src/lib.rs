use markdown_expand_engine::io::{CollisionPolicy, DEFAULT_UNTITLED_NAME, ExpandOptions};
use markdown_expand_engine::{LeadingContent, ParseOptions, SplitOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings read from `~/.config/markdown-expand/config.toml`.
///
/// Every key is optional; missing keys take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where expanded folders are created. Defaults to the source file's directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_root: Option<PathBuf>,
    pub leading_content: LeadingContent,
    pub on_collision: CollisionPolicy,
    pub untitled_name: String,
    /// Parse with GitHub-flavoured extensions.
    pub gfm: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: None,
            leading_content: LeadingContent::default(),
            on_collision: CollisionPolicy::default(),
            untitled_name: DEFAULT_UNTITLED_NAME.to_string(),
            gfm: false,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config.with_resolved_output_root()))
    }

    /// `~` and `$VAR` in `output_root` name folders in the user's environment;
    /// a root that fails to expand is kept as written.
    fn with_resolved_output_root(mut self) -> Self {
        self.output_root = self
            .output_root
            .map(|root| Self::expand_path(&root).unwrap_or(root));
        self
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-expand");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            split: SplitOptions {
                parse: ParseOptions { gfm: self.gfm },
                leading_content: self.leading_content,
            },
            on_collision: self.on_collision,
            untitled_name: self.untitled_name.clone(),
        }
    }

    /// Output root for `source`: the configured root, else the source's directory.
    pub fn output_root_for(&self, source: &Path) -> PathBuf {
        if let Some(root) = &self.output_root {
            return root.clone();
        }
        match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        shellexpand::full(&path.to_string_lossy())
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}
