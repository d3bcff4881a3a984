//! Configuration loading and root folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! Command-line and environment values arrive together through the binary's
//! argument parser; this module handles the root folder environment lookup,
//! the TOML layer and the compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "YOKO_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILENAME: &str = "yoko.db";

/// Default HTTP port (matches the port the dashboard fetches from)
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default sender address for confirmation emails
pub const DEFAULT_FROM_EMAIL: &str = "info@theyoko.com";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(default)]
    pub mail: MailToml,
}

/// `[mail]` table of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailToml {
    pub api_key: Option<String>,
    pub from_email: Option<String>,
}

impl TomlConfig {
    /// Parse a config file; a missing or malformed file is an error
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from an explicit path, or from the platform config locations.
    ///
    /// A missing or unreadable config file never stops startup: the error is
    /// logged and an empty config is returned.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let Some(path) = path else {
            debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Locate the first existing config file for the platform
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("yoko").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/yoko/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent compiled defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/yoko (or /var/lib/yoko for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("yoko"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/yoko"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("yoko"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/yoko"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("yoko"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\yoko"))
    } else {
        PathBuf::from("./yoko_data")
    }
}

/// Resolves the root folder holding the database file
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_value: toml.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and derives file locations inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder if needed (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILENAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub mail_api_key: Option<String>,
    pub mail_from_email: Option<String>,
}

/// Confirmation mail settings after resolution
#[derive(Debug, Clone)]
pub struct MailSettings {
    /// Mailchimp Transactional key; `None` disables sending
    pub api_key: Option<String>,
    pub from_email: String,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub mail: MailSettings,
}

impl ServiceConfig {
    pub fn resolve(cli: CliOverrides, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();

        let root_folder = RootFolderResolver::new(cli.root_folder, toml).resolve();
        let db_path = RootFolderInitializer::new(root_folder.clone()).database_path();

        let host = cli
            .host
            .or_else(|| toml.host.clone())
            .unwrap_or(defaults.host);
        let port = cli.port.or(toml.port).unwrap_or(defaults.port);

        let api_key = cli
            .mail_api_key
            .or_else(|| toml.mail.api_key.clone())
            .filter(|k| !k.trim().is_empty());
        let from_email = cli
            .mail_from_email
            .or_else(|| toml.mail.from_email.clone())
            .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string());

        Self {
            root_folder,
            db_path,
            host,
            port,
            mail: MailSettings { api_key, from_email },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
