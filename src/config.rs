use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "deskflow";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_LISTING_TIMEOUT_SECS: u64 = 10;

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir).join(CONFIG_DIR_NAME));
    }
    let home = env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .ok_or_else(|| AppError::Configuration("HOME is not set".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Values persisted by `deskflow config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredConfig {
    pub jira_domain: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub service_desk_id: Option<String>,
    pub request_type_id: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub listing_timeout_secs: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Environment variables take precedence over the stored file.
    fn apply_env(&mut self) {
        let overrides = [
            ("JIRA_DOMAIN", &mut self.jira_domain),
            ("JIRA_EMAIL", &mut self.jira_email),
            ("JIRA_API_TOKEN", &mut self.jira_token),
            ("SERVICE_DESK_ID", &mut self.service_desk_id),
            ("REQUEST_TYPE_ID", &mut self.request_type_id),
            ("GEMINI_API_KEY", &mut self.gemini_api_key),
            ("GEMINI_MODEL", &mut self.gemini_model),
            ("DESKFLOW_LISTING_TIMEOUT_SECS", &mut self.listing_timeout_secs),
        ];
        for (name, target) in overrides {
            if let Ok(value) = env::var(name) {
                *target = Some(value);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_domain: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub service_desk_id: Option<String>,
    pub request_type_id: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub listing_timeout: Duration,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        dotenv::dotenv().ok();
        let mut stored = StoredConfig::load()?;
        stored.apply_env();
        Self::resolve(stored)
    }

    pub(crate) fn resolve(stored: StoredConfig) -> AppResult<Self> {
        let listing_timeout_secs = match non_empty(stored.listing_timeout_secs) {
            Some(raw) => parse_listing_timeout(&raw)?,
            None => DEFAULT_LISTING_TIMEOUT_SECS,
        };
        let service_desk_id = non_empty(stored.service_desk_id);
        let request_type_id = non_empty(stored.request_type_id);
        if let Some(id) = &service_desk_id {
            check_numeric_id("service desk id", id)?;
        }
        if let Some(id) = &request_type_id {
            check_numeric_id("request type id", id)?;
        }

        Ok(Self {
            jira_domain: non_empty(stored.jira_domain),
            jira_email: non_empty(stored.jira_email),
            jira_token: non_empty(stored.jira_token),
            service_desk_id,
            request_type_id,
            gemini_api_key: non_empty(stored.gemini_api_key),
            gemini_model: non_empty(stored.gemini_model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            listing_timeout: Duration::from_secs(listing_timeout_secs),
        })
    }
}

/// Whole seconds, at least one.
pub fn parse_listing_timeout(raw: &str) -> AppResult<u64> {
    let secs = raw.trim().parse::<u64>().map_err(|err| {
        AppError::Configuration(format!("invalid listing timeout '{raw}': {err}"))
    })?;
    if secs == 0 {
        return Err(AppError::Configuration(
            "listing timeout must be at least 1 second".to_string(),
        ));
    }
    Ok(secs)
}

/// Service desk and request type ids are numeric in Jira.
pub fn check_numeric_id(field: &str, raw: &str) -> AppResult<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Configuration(format!(
            "{field} must be numeric, got '{raw}'"
        )));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
