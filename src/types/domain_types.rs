// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Application identifier issued by the open platform console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyField("app_id"));
        }
        Ok(Self(id.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application secret paired with an `AppId`
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);

impl AppSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, ValidationError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ValidationError::EmptyField("app_secret"));
        }
        Ok(Self(secret.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppSecret(<redacted>)")
    }
}

/// The id/secret pair exchanged for a tenant access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub app_id: AppId,
    pub app_secret: AppSecret,
}

impl AppCredentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            app_id: AppId::new(app_id)?,
            app_secret: AppSecret::new(app_secret)?,
        })
    }
}

/// Tenant access token. It carries no expiry; a stale token is replaced by
/// authenticating again.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::EmptyField("tenant_access_token"));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact token in display
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{}...", visible)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self)
    }
}

/// Validated URL type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(Url);

impl Serialize for ValidatedUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidatedUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ValidatedUrl::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl ValidatedUrl {
    /// Create a new validated URL
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        match Url::parse(url.trim()) {
            Ok(parsed_url) => {
                if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
                    return Err(ValidationError::InvalidUrl {
                        url: url.to_string(),
                        reason: "Only HTTP and HTTPS URLs are supported".to_string(),
                    });
                }
                Ok(Self(parsed_url))
            }
            Err(e) => Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static SHEET_RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-]+(![A-Z]{1,3}[0-9]*(:[A-Z]{1,3}[0-9]*)?)?$")
        .expect("sheet range pattern is valid")
});

/// A sheet reference, optionally narrowed to a cell range: `0b7f3c` or `0b7f3c!A1:D20`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetRange(String);

impl SheetRange {
    pub fn new(range: impl Into<String>) -> Result<Self, ValidationError> {
        let range = range.into();
        let range = range.trim();
        if range.is_empty() {
            return Err(ValidationError::EmptyField("sheet range"));
        }
        if !SHEET_RANGE_PATTERN.is_match(range) {
            return Err(ValidationError::InvalidSheetRange(range.to_string()));
        }
        Ok(Self(range.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The sheet id portion before any `!`
    pub fn sheet_id(&self) -> &str {
        self.0.split('!').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of document a wiki node wraps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Sheet,
    Bitable,
    Doc,
    Docx,
    Mindnote,
    File,
    Other(String),
}

impl ObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sheet => "sheet",
            Self::Bitable => "bitable",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Mindnote => "mindnote",
            Self::File => "file",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for ObjectKind {
    fn from(kind: &str) -> Self {
        match kind {
            "sheet" => Self::Sheet,
            "bitable" => Self::Bitable,
            "doc" => Self::Doc,
            "docx" => Self::Docx,
            "mindnote" => Self::Mindnote,
            "file" => Self::File,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ObjectKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ObjectKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let kind = String::deserialize(deserializer)?;
        Ok(ObjectKind::from(kind.as_str()))
    }
}
