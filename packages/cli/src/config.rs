use protean_parser::{LexOptions, ParseOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "protean.config.json";

/// protean configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directories searched for imports, relative to the config file
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    /// Parser settings, read from the top level (`syncLimit`)
    #[serde(flatten)]
    pub parse: ParseOptions,

    /// Keep comment tokens in the token stream
    #[serde(default)]
    pub keep_comments: bool,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        self.parse
    }

    pub fn lex_options(&self) -> LexOptions {
        LexOptions {
            keep_comments: self.keep_comments,
        }
    }

    /// Include directories made absolute against `cwd`
    pub fn get_include_dirs(&self, cwd: &Path) -> Vec<PathBuf> {
        self.include_dirs.iter().map(|dir| cwd.join(dir)).collect()
    }
}
