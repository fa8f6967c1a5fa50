// src/config.rs
use crate::api::ClientSettings;
use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WEBHOOK, FEISHU_API_BASE_URL};
use crate::error::AppError;
use crate::messaging::{CardButton, WebhookRegistry};
use crate::types::{AppCredentials, ValidatedUrl, ValidationError};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_ID_ENV: &str = "FEISHU_APP_ID";
pub const APP_SECRET_ENV: &str = "FEISHU_APP_SECRET";
pub const WEBHOOK_DEFAULT_ENV: &str = "FEISHU_WEBHOOK_DEFAULT";
pub const API_BASE_ENV: &str = "FEISHU_API_BASE";

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// JSON file mapping webhook names to URLs; must contain "default"
    #[arg(long, global = true)]
    pub webhooks: Option<PathBuf>,

    /// Open platform base URL (defaults to $FEISHU_API_BASE, then the public endpoint)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the wiki spaces visible to the app
    Spaces,

    /// List the nodes of a wiki space
    Nodes { space: String },

    /// Show a wiki node (token or wiki URL)
    Node { node: String },

    /// Print every record of a bitable table as JSON
    Records { node: String, table: String },

    /// Append records from a JSON array of field objects
    AppendRecords {
        node: String,
        table: String,
        file: PathBuf,
    },

    /// Update the records matching every --where condition
    UpdateRecords {
        node: String,
        table: String,

        /// Condition as field=value; the value is read as JSON when it parses
        #[arg(long = "where", value_parser = parse_assignment)]
        conditions: Vec<(String, Value)>,

        /// Field assignment as field=value
        #[arg(long = "set", value_parser = parse_assignment, required = true)]
        updates: Vec<(String, Value)>,
    },

    /// Print the values of a sheet range
    SheetRead { node: String, range: String },

    /// Append rows from a JSON array of arrays
    SheetAppend {
        node: String,
        range: String,
        file: PathBuf,
    },

    /// Post a card message to a webhook
    Notify {
        /// Webhook name (defaults to "default")
        #[arg(long)]
        target: Option<String>,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        content: String,

        /// Render the card header red instead of green
        #[arg(long, default_value_t = false)]
        failed: bool,

        /// Link button as label=url; repeatable
        #[arg(long = "button", value_parser = parse_button)]
        buttons: Vec<CardButton>,
    },
}

impl Command {
    /// Whether the command talks to the open platform API and so needs app credentials.
    pub fn needs_credentials(&self) -> bool {
        !matches!(self, Command::Notify { .. })
    }
}

/// Splits `field=value`. The value is taken as JSON when it parses as
/// JSON (`level=2`, `done=true`), otherwise as a plain string.
pub fn parse_assignment(input: &str) -> Result<(String, Value), ValidationError> {
    let (field, raw) = input
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidAssignment(input.to_string()))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(ValidationError::InvalidAssignment(input.to_string()));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}

/// Parses a `label=url` button.
pub fn parse_button(input: &str) -> Result<CardButton, ValidationError> {
    let (label, url) = input
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidAssignment(input.to_string()))?;
    Ok(CardButton::new(label.trim(), ValidatedUrl::parse(url.trim())?))
}

/// Reads and decodes a JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| AppError::JsonParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolved connector configuration: CLI flags layered over environment.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub settings: ClientSettings,
    pub webhooks: WebhookRegistry,
    /// Present only when both id and secret are set
    pub credentials: Option<AppCredentials>,
    pub verbose: bool,
}

impl ConnectorConfig {
    /// Resolves configuration from CLI input and the process environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolves configuration with an explicit environment lookup.
    pub fn resolve_with<F>(cli: &CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = cli
            .base_url
            .clone()
            .or_else(|| env(API_BASE_ENV))
            .unwrap_or_else(|| FEISHU_API_BASE_URL.to_string());
        let settings = ClientSettings::new(
            ValidatedUrl::parse(&base_url)?,
            Duration::from_secs(cli.timeout_secs),
        );

        let webhooks = match &cli.webhooks {
            Some(path) => {
                let entries: IndexMap<String, String> = read_json_file(path)?;
                WebhookRegistry::new(entries)?
            }
            None => WebhookRegistry::single(&env(WEBHOOK_DEFAULT_ENV).unwrap_or_default())?,
        };

        let credentials = match (env(APP_ID_ENV), env(APP_SECRET_ENV)) {
            (Some(id), Some(secret)) => Some(AppCredentials::new(id, secret)?),
            _ => None,
        };

        if cli.command.needs_credentials() && credentials.is_none() {
            return Err(AppError::MissingConfiguration(format!(
                "{} and {} environment variables must be set",
                APP_ID_ENV, APP_SECRET_ENV
            )));
        }

        if webhooks.resolve(DEFAULT_WEBHOOK).is_none() {
            log::debug!("default webhook is not configured; card messages will be skipped");
        }

        Ok(ConnectorConfig {
            settings,
            webhooks,
            credentials,
            verbose: cli.verbose,
        })
    }

    /// The app credentials, or `MissingConfiguration`.
    pub fn require_credentials(&self) -> Result<AppCredentials, AppError> {
        self.credentials.clone().ok_or_else(|| {
            AppError::MissingConfiguration(format!(
                "{} and {} environment variables must be set",
                APP_ID_ENV, APP_SECRET_ENV
            ))
        })
    }
}
