use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use url::Url;
use uuid::Uuid;

/// Strong typing for platform tokens with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpaceMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageMarker;

/// Wiki node token (the page a user sees in the wiki tree).
pub type NodeToken = Id<NodeMarker>;
/// Token of the document behind a node: a spreadsheet or a bitable app.
pub type ObjectToken = Id<ObjectMarker>;
pub type TableId = Id<TableMarker>;
pub type ViewId = Id<ViewMarker>;
pub type RecordId = Id<RecordMarker>;
pub type SpaceId = Id<SpaceMarker>;
pub type ImageKey = Id<ImageMarker>;

/// Prefix of generated record identifiers, kept recognizable in table dumps.
const GENERATED_RECORD_PREFIX: &str = "rec";

impl<T> Id<T> {
    /// Validates a raw token: trimmed, non-empty, no whitespace or path separators.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyToken);
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c == '/' || c == '?') {
            return Err(ValidationError::InvalidToken(trimmed.to_string()));
        }
        Ok(Self::from_raw(trimmed.to_string()))
    }

    /// Wraps a token returned by the platform itself (internal use)
    pub(crate) fn from_raw(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// Get the token as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl RecordId {
    /// Generates a collision-improbable record identifier such as
    /// `rec3f2b8c...`, used when a tabular batch is written with row identity.
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4();
        Self::from_raw(format!("{}{}", GENERATED_RECORD_PREFIX, uuid.as_simple()))
    }
}

impl NodeToken {
    /// Accepts either a bare node token or a wiki URL such as
    /// `https://acme.feishu.cn/wiki/wikcnAbc123?table=tbl1`.
    pub fn from_input(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.starts_with("http://") || input.starts_with("https://") {
            let (node, _) = parse_wiki_url(input)?;
            return Ok(node);
        }
        Self::parse(input)
    }
}

impl TableId {
    /// Extracts the `table` query parameter from a wiki URL, if present.
    pub fn from_wiki_url(input: &str) -> Result<Option<Self>, ValidationError> {
        let (_, table) = parse_wiki_url(input.trim())?;
        Ok(table)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_raw(value))
    }
}

/// Splits a wiki URL into its node token and optional table id.
fn parse_wiki_url(input: &str) -> Result<(NodeToken, Option<TableId>), ValidationError> {
    let url = Url::parse(input).map_err(|e| ValidationError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;

    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .ok_or_else(|| ValidationError::InvalidUrl {
            url: input.to_string(),
            reason: "URL has no node token segment".to_string(),
        })?;
    let node = NodeToken::parse(segment)?;

    let table = url
        .query_pairs()
        .find(|(key, _)| key == "table")
        .map(|(_, value)| TableId::parse(&value))
        .transpose()?;

    Ok((node, table))
}
