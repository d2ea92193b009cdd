use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::config::{
    AppConfig, StoredConfig, check_numeric_id, config_file_path, parse_listing_timeout,
};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Prompt for every setting and save them.
    Init,
    /// Show stored settings (secrets masked) and the values in effect.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Setting {
    JiraDomain,
    JiraEmail,
    JiraToken,
    ServiceDeskId,
    RequestTypeId,
    GeminiApiKey,
    GeminiModel,
    ListingTimeout,
}

const SETTINGS: [Setting; 8] = [
    Setting::JiraDomain,
    Setting::JiraEmail,
    Setting::JiraToken,
    Setting::ServiceDeskId,
    Setting::RequestTypeId,
    Setting::GeminiApiKey,
    Setting::GeminiModel,
    Setting::ListingTimeout,
];

impl Setting {
    fn label(self) -> &'static str {
        match self {
            Setting::JiraDomain => "Jira domain (e.g., company.atlassian.net)",
            Setting::JiraEmail => "Jira email",
            Setting::JiraToken => "Jira API token",
            Setting::ServiceDeskId => "Service desk id",
            Setting::RequestTypeId => "Request type id",
            Setting::GeminiApiKey => "Gemini API key",
            Setting::GeminiModel => "Gemini model",
            Setting::ListingTimeout => "Ticket listing timeout in seconds",
        }
    }

    fn is_secret(self) -> bool {
        matches!(self, Setting::JiraToken | Setting::GeminiApiKey)
    }

    fn slot(self, cfg: &mut StoredConfig) -> &mut Option<String> {
        match self {
            Setting::JiraDomain => &mut cfg.jira_domain,
            Setting::JiraEmail => &mut cfg.jira_email,
            Setting::JiraToken => &mut cfg.jira_token,
            Setting::ServiceDeskId => &mut cfg.service_desk_id,
            Setting::RequestTypeId => &mut cfg.request_type_id,
            Setting::GeminiApiKey => &mut cfg.gemini_api_key,
            Setting::GeminiModel => &mut cfg.gemini_model,
            Setting::ListingTimeout => &mut cfg.listing_timeout_secs,
        }
    }

    fn check(self, value: &str) -> AppResult<()> {
        match self {
            Setting::JiraDomain if value.chars().any(char::is_whitespace) => Err(
                AppError::Configuration("Jira domain must not contain spaces".to_string()),
            ),
            Setting::JiraEmail if !value.contains('@') => Err(AppError::Configuration(
                format!("'{value}' is not an email address"),
            )),
            Setting::ServiceDeskId => check_numeric_id("service desk id", value),
            Setting::RequestTypeId => check_numeric_id("request type id", value),
            Setting::ListingTimeout => parse_listing_timeout(value).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn value(self, cfg: &StoredConfig) -> Option<&str> {
        match self {
            Setting::JiraDomain => cfg.jira_domain.as_deref(),
            Setting::JiraEmail => cfg.jira_email.as_deref(),
            Setting::JiraToken => cfg.jira_token.as_deref(),
            Setting::ServiceDeskId => cfg.service_desk_id.as_deref(),
            Setting::RequestTypeId => cfg.request_type_id.as_deref(),
            Setting::GeminiApiKey => cfg.gemini_api_key.as_deref(),
            Setting::GeminiModel => cfg.gemini_model.as_deref(),
            Setting::ListingTimeout => cfg.listing_timeout_secs.as_deref(),
        }
    }

    fn display(self, cfg: &StoredConfig) -> String {
        let value = self.value(cfg);
        if self.is_secret() {
            mask_secret(value)
        } else {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or("<not set>")
                .to_string()
        }
    }
}

enum Answer {
    Keep,
    Clear,
    Set(String),
}

impl Answer {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Answer::Keep,
            "-" => Answer::Clear,
            value => Answer::Set(value.to_string()),
        }
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring deskflow.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    let stdin = io::stdin();
    configure(&mut cfg, &mut stdin.lock(), &mut io::stdout())?;
    cfg.save()?;

    println!("\nConfiguration saved to {}", config_file_path()?.display());
    Ok(())
}

/// Walks every setting, re-asking until the answer is valid, then checks
/// the whole configuration resolves before handing it back.
fn configure<R: BufRead, W: Write>(
    cfg: &mut StoredConfig,
    input: &mut R,
    out: &mut W,
) -> AppResult<()> {
    for setting in SETTINGS {
        loop {
            let current = setting.display(cfg);
            if current == "<not set>" {
                write!(out, "{} (Enter to skip): ", setting.label())?;
            } else {
                write!(
                    out,
                    "{} [{current}] (Enter to keep, '-' to clear): ",
                    setting.label()
                )?;
            }
            out.flush()?;

            let mut line = String::new();
            input.read_line(&mut line)?;

            match Answer::parse(&line) {
                Answer::Keep => break,
                Answer::Clear => {
                    *setting.slot(cfg) = None;
                    break;
                }
                Answer::Set(value) => match setting.check(&value) {
                    Ok(()) => {
                        *setting.slot(cfg) = Some(value);
                        break;
                    }
                    Err(err) => writeln!(out, "  {err}")?,
                },
            }
        }
    }

    AppConfig::resolve(cfg.clone())?;
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;

    println!("Configuration file: {}", config_file_path()?.display());
    for setting in SETTINGS {
        println!("{}: {}", setting.label(), setting.display(&cfg));
    }

    println!();
    match AppConfig::load() {
        Ok(effective) => {
            println!("In effect (after .env and environment):");
            println!("  Gemini model: {}", effective.gemini_model);
            println!(
                "  Listing timeout: {}s",
                effective.listing_timeout.as_secs()
            );
        }
        Err(err) => println!("Configuration does not resolve: {err}"),
    }
    Ok(())
}

fn mask_secret(value: Option<&str>) -> String {
    let chars: Vec<char> = value.unwrap_or_default().chars().collect();
    match chars.len() {
        0 => "<not set>".to_string(),
        1..=6 => "***".to_string(),
        len => {
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[len - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn answers(lines: &[&str]) -> Cursor<Vec<u8>> {
        Cursor::new(lines.join("\n").into_bytes())
    }

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret(Some("abcdefghij")), "abc***hij");
        assert_eq!(mask_secret(Some("short")), "***");
        assert_eq!(mask_secret(None), "<not set>");
    }

    #[test]
    fn stores_answers_and_keeps_defaults() {
        let mut cfg = StoredConfig {
            gemini_model: Some("gemini-2.5-pro".to_string()),
            ..StoredConfig::default()
        };
        let mut out = Vec::new();
        configure(
            &mut cfg,
            &mut answers(&["acme.atlassian.net", "ops@acme.io", "tok", "3", "17", "", "", "15"]),
            &mut out,
        )
        .unwrap();

        assert_eq!(cfg.jira_domain.as_deref(), Some("acme.atlassian.net"));
        assert_eq!(cfg.service_desk_id.as_deref(), Some("3"));
        assert_eq!(cfg.request_type_id.as_deref(), Some("17"));
        assert!(cfg.gemini_api_key.is_none());
        assert_eq!(cfg.gemini_model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(cfg.listing_timeout_secs.as_deref(), Some("15"));
    }

    #[test]
    fn re_asks_until_answer_is_valid() {
        let mut cfg = StoredConfig::default();
        let mut out = Vec::new();
        configure(
            &mut cfg,
            &mut answers(&["", "", "", "desk-one", "4", "", "", "", "0", "soon", "5"]),
            &mut out,
        )
        .unwrap();

        assert_eq!(cfg.service_desk_id.as_deref(), Some("4"));
        assert_eq!(cfg.listing_timeout_secs.as_deref(), Some("5"));
        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("service desk id must be numeric"));
        assert!(transcript.contains("listing timeout must be at least 1 second"));
    }

    #[test]
    fn clears_with_dash() {
        let mut cfg = StoredConfig {
            jira_token: Some("secret-token".to_string()),
            ..StoredConfig::default()
        };
        let mut out = Vec::new();
        configure(&mut cfg, &mut answers(&["", "", "-"]), &mut out).unwrap();

        assert!(cfg.jira_token.is_none());
        assert!(String::from_utf8(out).unwrap().contains("Jira API token [sec***ken]"));
    }

    #[test]
    fn refuses_to_keep_invalid_stored_value() {
        let mut cfg = StoredConfig {
            request_type_id: Some("incident".to_string()),
            ..StoredConfig::default()
        };
        let mut out = Vec::new();
        let result = configure(&mut cfg, &mut answers(&[]), &mut out);

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
