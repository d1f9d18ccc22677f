use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  /// User id of the current actor, used for ownership checks
  pub actor_id: Option<u64>,
  #[serde(default)]
  pub session: SessionConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL every resource path is resolved against
  pub url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  30
}

impl ApiConfig {
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      timeout_secs: default_timeout_secs(),
    }
  }

  /// Base URL with a trailing slash so relative joins keep the last segment.
  pub fn base_url(&self) -> Result<url::Url> {
    let mut raw = self.url.trim().to_string();
    if !raw.ends_with('/') {
      raw.push('/');
    }
    url::Url::parse(&raw).map_err(|e| eyre!("Invalid API url {}: {}", self.url, e))
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
  /// Session database location (defaults to the user data directory)
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Write logs to this file instead of stderr
  pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      file: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./taskdeck.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/taskdeck/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    Self::load_if_present(explicit_path)?.ok_or_else(|| {
      eyre!(
        "No configuration file found. Create one at ~/.config/taskdeck/config.yaml \
         or pass --url."
      )
    })
  }

  /// Like [`Config::load`], but `None` when no config file exists.
  ///
  /// A missing explicit path and a file that fails to read or parse are
  /// still errors.
  pub fn load_if_present(explicit_path: Option<&Path>) -> Result<Option<Self>> {
    let path = match explicit_path {
      Some(p) if p.exists() => Some(p.to_path_buf()),
      Some(p) => return Err(eyre!("Config file not found: {}", p.display())),
      None => Self::find_config_file(),
    };
    Self::load_found(path)
  }

  /// Minimal configuration when only a URL was given on the command line.
  pub fn from_url(url: impl Into<String>) -> Self {
    Self {
      api: ApiConfig::new(url),
      actor_id: None,
      session: SessionConfig::default(),
      log: LogConfig::default(),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("taskdeck.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("taskdeck").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_found(path: Option<PathBuf>) -> Result<Option<Self>> {
    path.map(|p| Self::load_from_path(&p)).transpose()
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))
  }

  /// Get the API token from the environment, if set.
  ///
  /// Checks TASKDECK_TOKEN.
  pub fn env_token() -> Option<String> {
    std::env::var("TASKDECK_TOKEN").ok().filter(|t| !t.is_empty())
  }
}
