use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::grid::Grid;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub username: String,
    pub board: BoardConfig,
    pub network: NetworkConfig,
    pub bot: BotConfig,
    pub ranks: RankConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of columns for local and bot games, the side length for networked games.
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// The address the host listens on.
    pub host_addr: String,
    /// The address a client connects to.
    pub join_addr: String,
    /// The board size a client asks for, replaced by whatever the host sends.
    pub join_size: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub delay_ms: u64,
    /// Seed for the bot's fallback randomness, `None` uses entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RankConfig {
    pub path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            username: "Player".to_string(),
            board: BoardConfig::default(),
            network: NetworkConfig::default(),
            bot: BotConfig::default(),
            ranks: RankConfig::default(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig { size: 7 }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            host_addr: "0.0.0.0:4000".to_string(),
            join_addr: "127.0.0.1:4000".to_string(),
            join_size: Grid::DEFAULT_ROWS,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            delay_ms: 500,
            seed: None,
        }
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        RankConfig {
            path: PathBuf::from("ranks.toml"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::Validation("username must not be empty".into()));
        }
        validate_size("board.size", self.board.size)?;
        validate_size("network.join_size", self.network.join_size)?;
        self.host_addr()?;
        self.join_addr()?;
        Ok(())
    }

    pub fn host_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr("network.host_addr", &self.network.host_addr)
    }

    pub fn join_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr("network.join_addr", &self.network.join_addr)
    }

    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot.delay_ms)
    }
}

fn validate_size(name: &str, size: usize) -> Result<(), ConfigError> {
    if !(Grid::MIN_SIZE..=Grid::MAX_SIZE).contains(&size) {
        return Err(ConfigError::Validation(format!(
            "{} must be in {}..={}, got {}",
            name,
            Grid::MIN_SIZE,
            Grid::MAX_SIZE,
            size
        )));
    }
    Ok(())
}

fn parse_addr(name: &str, addr: &str) -> Result<SocketAddr, ConfigError> {
    addr.parse()
        .map_err(|e| ConfigError::Validation(format!("{} '{}' is not an ip:port address: {}", name, addr, e)))
}
