//! # Station Configuration
//!
//! Configuration for one ordering station.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KOT_TABLE_NO=12                                                    │
//! │     KOT_DOCUMENTS_DIR=/srv/kot/documents                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/station/station.toml (Linux)                             │
//! │     ~/Library/Application Support/com.kot.station/station.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     table 1, waiter John, house menu                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # station.toml
//! [station]
//! table_no = "4"
//! waiter = "Maria"
//!
//! [ticket]
//! order_no_prefix = "KOT"
//! order_no_range = 1000
//! currency_symbol = "$"
//! text_width = 32
//!
//! [storage]
//! documents_root = "/srv/kot/documents"
//!
//! [[menu]]
//! id = 1
//! name = "Burger"
//! price_cents = 500
//! category = "Fast Food"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use kot_core::{
    MenuCatalog, MenuItem, Money, OrderNumbering, DEFAULT_ORDER_NO_PREFIX, DEFAULT_ORDER_NO_RANGE,
    DEFAULT_TABLE_NO, DEFAULT_WAITER,
};

use crate::error::{ConfigError, ConfigResult};

/// Narrowest plain-text ticket the station will lay out.
pub const MIN_TEXT_WIDTH: usize = 16;

// =============================================================================
// Station Settings
// =============================================================================

/// Who the station is serving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSettings {
    #[serde(default = "default_table_no")]
    pub table_no: String,

    #[serde(default = "default_waiter")]
    pub waiter: String,
}

fn default_table_no() -> String {
    DEFAULT_TABLE_NO.to_string()
}

fn default_waiter() -> String {
    DEFAULT_WAITER.to_string()
}

impl Default for StationSettings {
    fn default() -> Self {
        StationSettings {
            table_no: default_table_no(),
            waiter: default_waiter(),
        }
    }
}

// =============================================================================
// Ticket Settings
// =============================================================================

/// How tickets are numbered and laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSettings {
    /// Fixed part of every ticket number.
    #[serde(default = "default_order_no_prefix")]
    pub order_no_prefix: String,

    /// Random suffixes are drawn from `0..order_no_range`.
    #[serde(default = "default_order_no_range")]
    pub order_no_range: u32,

    /// Shown before prices in the menu listing.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Column width of the plain-text ticket.
    #[serde(default = "default_text_width")]
    pub text_width: usize,
}

fn default_order_no_prefix() -> String {
    DEFAULT_ORDER_NO_PREFIX.to_string()
}

fn default_order_no_range() -> u32 {
    DEFAULT_ORDER_NO_RANGE
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_text_width() -> usize {
    32
}

impl Default for TicketSettings {
    fn default() -> Self {
        TicketSettings {
            order_no_prefix: default_order_no_prefix(),
            order_no_range: default_order_no_range(),
            currency_symbol: default_currency_symbol(),
            text_width: default_text_width(),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where ticket files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Durable ticket documents.
    #[serde(default = "default_documents_root")]
    pub documents_root: PathBuf,

    /// Print jobs for the kitchen printer.
    #[serde(default = "default_spool_dir")]
    pub spool_dir: PathBuf,

    /// Shared tickets.
    #[serde(default = "default_share_dir")]
    pub share_dir: PathBuf,

    /// Scratch space for rendered markup.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "kot", "station")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("kot-station"))
}

fn default_documents_root() -> PathBuf {
    data_dir().join("documents")
}

fn default_spool_dir() -> PathBuf {
    data_dir().join("spool")
}

fn default_share_dir() -> PathBuf {
    data_dir().join("shared")
}

fn default_temp_dir() -> PathBuf {
    data_dir().join("tmp")
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            documents_root: default_documents_root(),
            spool_dir: default_spool_dir(),
            share_dir: default_share_dir(),
            temp_dir: default_temp_dir(),
        }
    }
}

// =============================================================================
// Menu Entries
// =============================================================================

/// A `[[menu]]` table in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: u32,
    pub name: String,
    pub price_cents: i64,
    pub category: String,
}

impl From<&MenuEntry> for MenuItem {
    fn from(entry: &MenuEntry) -> Self {
        MenuItem::new(
            entry.id,
            entry.name.clone(),
            Money::from_cents(entry.price_cents),
            entry.category.clone(),
        )
    }
}

impl From<&MenuItem> for MenuEntry {
    fn from(item: &MenuItem) -> Self {
        MenuEntry {
            id: item.id,
            name: item.name.clone(),
            price_cents: item.price.cents(),
            category: item.category.clone(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete station configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KotConfig {
    #[serde(default)]
    pub station: StationSettings,

    #[serde(default)]
    pub ticket: TicketSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    /// Replaces the house menu when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub menu: Vec<MenuEntry>,
}

impl KotConfig {
    /// Loads configuration from file and environment.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading station config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load station config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Station config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ticket.order_no_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "order_no_prefix must not be empty".into(),
            ));
        }

        if self.ticket.order_no_range < 2 {
            return Err(ConfigError::Invalid(
                "order_no_range must be at least 2".into(),
            ));
        }

        if self.ticket.text_width < MIN_TEXT_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "text_width must be at least {}",
                MIN_TEXT_WIDTH
            )));
        }

        kot_core::validation::validate_table_no(&self.station.table_no)
            .and_then(|_| kot_core::validation::validate_waiter(&self.station.waiter))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        self.menu_catalog()?;
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(table_no) = lookup("KOT_TABLE_NO") {
            debug!(%table_no, "Overriding table from environment");
            self.station.table_no = table_no;
        }

        if let Some(waiter) = lookup("KOT_WAITER") {
            self.station.waiter = waiter;
        }

        if let Some(prefix) = lookup("KOT_ORDER_PREFIX") {
            debug!(%prefix, "Overriding ticket prefix from environment");
            self.ticket.order_no_prefix = prefix;
        }

        if let Some(dir) = lookup("KOT_DOCUMENTS_DIR") {
            debug!(%dir, "Overriding documents folder from environment");
            self.storage.documents_root = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("KOT_SPOOL_DIR") {
            self.storage.spool_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("KOT_SHARE_DIR") {
            self.storage.share_dir = PathBuf::from(dir);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "kot", "station")
            .map(|dirs| dirs.config_dir().join("station.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Ticket numbering described by `[ticket]`.
    pub fn numbering(&self) -> OrderNumbering {
        OrderNumbering::new(self.ticket.order_no_prefix.clone(), self.ticket.order_no_range)
    }

    /// The configured menu, or the house menu when none is configured.
    pub fn menu_catalog(&self) -> ConfigResult<MenuCatalog> {
        if self.menu.is_empty() {
            return Ok(MenuCatalog::default());
        }

        let items = self.menu.iter().map(MenuItem::from).collect();
        MenuCatalog::new(items).map_err(|e| ConfigError::Invalid(format!("menu: {}", e)))
    }
}
