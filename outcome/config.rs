use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use thiserror::Error;

/// Where the outcome lives in a table, and how strictly to check it.
///
/// Stored as TOML, e.g.
///
/// ```toml
/// event = "status"
/// time = "days"
/// entry = "enrolled"
/// allow_all_censored = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutcomeConfig {
    /// Column holding the event indicator.
    pub event: Option<String>,
    /// Column holding the time of event or censoring.
    pub time: Option<String>,
    /// Optional column holding the entry time.
    pub entry: Option<String>,
    pub allow_all_censored: bool,
    /// Field delimiter; inferred from the file extension when absent.
    pub separator: Option<char>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read or write config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML config file: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config to TOML format: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("No '{0}' column was configured. Pass it on the command line or in the config file.")]
    MissingColumn(&'static str),
    #[error("Separator {0:?} is not a single-byte character.")]
    InvalidSeparator(char),
}

impl OutcomeConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let toml_string = fs::read_to_string(path)?;
        let config = toml::from_str(&toml_string)?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut file = BufWriter::new(fs::File::create(path)?);
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }

    /// Values set in `overrides` win over the ones in `self`.
    pub fn merged_with(self, overrides: OutcomeConfig) -> Self {
        Self {
            event: overrides.event.or(self.event),
            time: overrides.time.or(self.time),
            entry: overrides.entry.or(self.entry),
            allow_all_censored: overrides.allow_all_censored || self.allow_all_censored,
            separator: overrides.separator.or(self.separator),
        }
    }

    /// The event and time column names, both of which are required.
    pub fn outcome_columns(&self) -> Result<(&str, &str), ConfigError> {
        let event = self
            .event
            .as_deref()
            .ok_or(ConfigError::MissingColumn("event"))?;
        let time = self
            .time
            .as_deref()
            .ok_or(ConfigError::MissingColumn("time"))?;
        Ok((event, time))
    }

    pub fn separator_byte(&self) -> Result<Option<u8>, ConfigError> {
        match self.separator {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => Err(ConfigError::InvalidSeparator(c)),
        }
    }
}
