pub mod toml_config;

use crate::core::conflict::IntervalConflictChecker;
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::BookingError;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use toml_config::{TomlConfig, MAX_UTC_OFFSET_MINUTES, MIN_UTC_OFFSET_MINUTES};

pub const DEFAULT_STORE_PATH: &str = "./data/reservations.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "shortlet-check")]
#[command(about = "Check a stay against existing reservations for a listing")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "JSON reservation store [default: ./data/reservations.json]")]
    pub store: Option<String>,

    #[arg(long, help = "Check against reservations in a CSV file instead of the store")]
    pub existing_csv: Option<String>,

    #[arg(long)]
    pub resource: String,

    #[arg(long)]
    pub check_in: String,

    #[arg(long)]
    pub check_out: String,

    #[arg(long)]
    pub guest: Option<String>,

    #[arg(long, help = "Save the reservation when there is no conflict")]
    pub commit: bool,

    #[arg(long, allow_hyphen_values = true, help = "Reference timezone as minutes east of UTC [default: 0]")]
    pub utc_offset_minutes: Option<i32>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// Effective settings after merging flags over the TOML file over defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub store_path: String,
    pub utc_offset_minutes: i32,
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: DEFAULT_STORE_PATH.to_string(),
            utc_offset_minutes: 0,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            store_path: config.store_path().to_string(),
            utc_offset_minutes: config.utc_offset_minutes(),
            log_level: config.log_level().unwrap_or("info").to_string(),
            json_logs: config.json_logs(),
        }
    }

    pub fn checker(&self) -> Result<IntervalConflictChecker> {
        IntervalConflictChecker::with_utc_offset_minutes(self.utc_offset_minutes)
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                Settings::from_toml(&file_config)
            }
            None => Settings::default(),
        };

        if let Some(store) = &self.store {
            settings.store_path = store.clone();
        }
        if let Some(offset) = self.utc_offset_minutes {
            settings.utc_offset_minutes = offset;
        }
        if self.verbose {
            settings.log_level = "debug".to_string();
        }
        settings.json_logs |= self.json_logs;

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        // 空的 listing id 是請求錯誤，不是設定錯誤
        if self.resource.trim().is_empty() {
            return Err(BookingError::Validation {
                message: "--resource must name a listing".to_string(),
            });
        }
        if let Some(csv_path) = &self.existing_csv {
            validation::validate_path("existing_csv", csv_path)?;
            if self.commit {
                return Err(BookingError::Validation {
                    message: "--commit cannot be combined with --existing-csv".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("store_path", &self.store_path)?;
        validation::validate_non_empty_string("log_level", &self.log_level)?;
        validation::validate_range(
            "utc_offset_minutes",
            self.utc_offset_minutes,
            MIN_UTC_OFFSET_MINUTES,
            MAX_UTC_OFFSET_MINUTES,
        )
    }
}

impl ConfigProvider for Settings {
    fn store_path(&self) -> &str {
        &self.store_path
    }

    fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }
}
