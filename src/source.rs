use async_trait::async_trait;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SourceError;

/// A media source as handed over by the caller.
///
/// `Undefined` means no value was supplied at all (for example an absent
/// field in a JSON request), `Null` means an explicit empty value such as
/// `None` or JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceArg<'a> {
    #[default]
    Undefined,
    Null,
    Given(Cow<'a, str>),
}

impl<'a> SourceArg<'a> {
    /// Interpret an optional JSON field as a source.
    ///
    /// Strings are taken as-is, `null` maps to [`SourceArg::Null`], a missing
    /// field to [`SourceArg::Undefined`]. Other JSON values are rendered as
    /// their JSON text and then go through the usual validation.
    pub fn from_json_field(value: Option<&'a serde_json::Value>) -> Self {
        match value {
            None => SourceArg::Undefined,
            Some(serde_json::Value::Null) => SourceArg::Null,
            Some(serde_json::Value::String(s)) => SourceArg::Given(Cow::Borrowed(s.as_str())),
            Some(other) => SourceArg::Given(Cow::Owned(other.to_string())),
        }
    }
}

impl<'a> From<&'a str> for SourceArg<'a> {
    fn from(value: &'a str) -> Self {
        SourceArg::Given(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for SourceArg<'a> {
    fn from(value: &'a String) -> Self {
        SourceArg::Given(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for SourceArg<'static> {
    fn from(value: String) -> Self {
        SourceArg::Given(Cow::Owned(value))
    }
}

impl<'a> From<&'a Path> for SourceArg<'a> {
    fn from(value: &'a Path) -> Self {
        SourceArg::Given(value.to_string_lossy())
    }
}

impl<'a> From<&'a PathBuf> for SourceArg<'a> {
    fn from(value: &'a PathBuf) -> Self {
        SourceArg::Given(value.to_string_lossy())
    }
}

impl From<PathBuf> for SourceArg<'static> {
    fn from(value: PathBuf) -> Self {
        SourceArg::Given(Cow::Owned(value.to_string_lossy().into_owned()))
    }
}

impl<'a, T> From<Option<T>> for SourceArg<'a>
where
    T: Into<SourceArg<'a>>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => SourceArg::Null,
        }
    }
}

/// Check a source and return it trimmed.
///
/// Checks run in order: undefined, null, empty, whitespace-only.
pub fn validate_source(src: &SourceArg<'_>) -> std::result::Result<String, SourceError> {
    match src {
        SourceArg::Undefined => Err(SourceError::Undefined),
        SourceArg::Null => Err(SourceError::Null),
        SourceArg::Given(s) if s.is_empty() => Err(SourceError::Empty),
        SourceArg::Given(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(SourceError::Whitespace)
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}

/// Filesystem lookup used to reject missing paths before spawning ffprobe
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PathExistence: Send + Sync {
    async fn exists(&self, path: &str) -> bool;
}

/// Default existence check backed by `tokio::fs`
#[derive(Debug, Clone, Default)]
pub struct FsPathExistence;

#[async_trait]
impl PathExistence for FsPathExistence {
    async fn exists(&self, path: &str) -> bool {
        match tokio::fs::try_exists(path).await {
            Ok(found) => found,
            Err(e) => {
                debug!("Existence check for {} failed: {}", path, e);
                false
            }
        }
    }
}
