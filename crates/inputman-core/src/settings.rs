// Inputman Settings Module
// Tracker limits and host-facing options loaded from TOML

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::event::KeyNaming;

pub const DEFAULT_RELEASE_WINDOW_MS: u64 = 500;
pub const DEFAULT_MAX_RELEASE_SEQUENCE_LENGTH: usize = 5;
pub const DEFAULT_MAX_INPUT_SEQUENCE_LENGTH: usize = 10;

/// Settings for the input tracker and manager
///
/// These settings are loaded from a TOML file (default:
/// ~/.config/inputman/settings.toml). Every key is optional:
///
/// ```toml
/// release_window_ms = 500
/// max_release_sequence_length = 5
/// max_input_sequence_length = 10
/// prevents_default = true
/// key_naming = "physical"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// How long a released input keeps counting toward sequences
    release_window_ms: u64,

    /// Cap on retained release-history entries
    max_release_sequence_length: usize,

    /// Cap on retained press/release log entries
    max_input_sequence_length: usize,

    /// Whether hosts should suppress the default action of handled events
    prevents_default: bool,

    /// Which key identifier host keyboard events are normalized to
    key_naming: KeyNaming,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    release_window_ms: Option<u64>,

    #[serde(default)]
    max_release_sequence_length: Option<usize>,

    #[serde(default)]
    max_input_sequence_length: Option<usize>,

    #[serde(default)]
    prevents_default: Option<bool>,

    #[serde(default)]
    key_naming: Option<String>,
}

impl Settings {
    /// Create settings with every option at its default
    pub fn new() -> Self {
        Self {
            release_window_ms: DEFAULT_RELEASE_WINDOW_MS,
            max_release_sequence_length: DEFAULT_MAX_RELEASE_SEQUENCE_LENGTH,
            max_input_sequence_length: DEFAULT_MAX_INPUT_SEQUENCE_LENGTH,
            prevents_default: true,
            key_naming: KeyNaming::Physical,
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(ms) = toml_settings.release_window_ms {
            settings.release_window_ms = ms;
        }
        if let Some(len) = toml_settings.max_release_sequence_length {
            settings.max_release_sequence_length =
                require_nonzero("max_release_sequence_length", len)?;
        }
        if let Some(len) = toml_settings.max_input_sequence_length {
            settings.max_input_sequence_length =
                require_nonzero("max_input_sequence_length", len)?;
        }
        if let Some(prevents) = toml_settings.prevents_default {
            settings.prevents_default = prevents;
        }
        if let Some(naming) = toml_settings.key_naming {
            settings.key_naming = KeyNaming::from_str(&naming).map_err(|_| {
                SettingsError::InvalidValue(format!(
                    "key_naming must be \"physical\" or \"logical\", got '{}'",
                    naming
                ))
            })?;
        }

        log::debug!(
            "loaded settings: release window {}ms, log {} entries, release history {} entries",
            settings.release_window_ms,
            settings.max_input_sequence_length,
            settings.max_release_sequence_length
        );
        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("inputman").join("settings.toml"))
    }

    /// Load from default location (~/.config/inputman/settings.toml)
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        // Return default settings if file doesn't exist
        Ok(Self::new())
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(ref path) = self.source_path {
            let new_settings = Self::from_file(path)?;
            *self = new_settings;
            Ok(())
        } else {
            Err(SettingsError::InvalidValue("No source path set".to_string()))
        }
    }

    pub fn release_window_ms(&self) -> u64 {
        self.release_window_ms
    }

    pub fn release_window(&self) -> Duration {
        Duration::from_millis(self.release_window_ms)
    }

    pub fn max_release_sequence_length(&self) -> usize {
        self.max_release_sequence_length
    }

    pub fn max_input_sequence_length(&self) -> usize {
        self.max_input_sequence_length
    }

    pub fn prevents_default(&self) -> bool {
        self.prevents_default
    }

    pub fn key_naming(&self) -> KeyNaming {
        self.key_naming
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn with_release_window_ms(mut self, ms: u64) -> Self {
        self.release_window_ms = ms;
        self
    }

    /// Zero is clamped to one so the tracker always keeps the newest entry
    pub fn with_max_release_sequence_length(mut self, len: usize) -> Self {
        self.max_release_sequence_length = len.max(1);
        self
    }

    /// Zero is clamped to one so the tracker always keeps the newest entry
    pub fn with_max_input_sequence_length(mut self, len: usize) -> Self {
        self.max_input_sequence_length = len.max(1);
        self
    }

    pub fn with_prevents_default(mut self, prevents: bool) -> Self {
        self.prevents_default = prevents;
        self
    }

    pub fn with_key_naming(mut self, naming: KeyNaming) -> Self {
        self.key_naming = naming;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

fn require_nonzero(name: &str, value: usize) -> Result<usize, SettingsError> {
    if value == 0 {
        return Err(SettingsError::InvalidValue(format!(
            "{} must be at least 1",
            name
        )));
    }
    Ok(value)
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Inputman Settings
# Place this file at: ~/.config/inputman/settings.toml

# How long (ms) a released input still counts toward sequential bindings
release_window_ms = 500

# Number of recent releases remembered
max_release_sequence_length = 5

# Number of recent press/release events remembered
max_input_sequence_length = 10

# Ask the host to suppress the default action of handled events
prevents_default = true

# "physical" binds key codes (KeyD, ShiftLeft); "logical" binds key values (d, Shift, +)
key_naming = "physical"
"#
}
