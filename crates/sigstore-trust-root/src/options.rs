//! Trust root client configuration

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default Sigstore production TUF repository URL
pub const DEFAULT_TUF_URL: &str = "https://tuf-repo-cdn.sigstore.dev";

/// Sigstore staging TUF repository URL
pub const STAGING_TUF_URL: &str = "https://tuf-repo-cdn.sigstage.dev";

/// TUF target name for the trusted root
pub const TRUSTED_ROOT_TARGET: &str = "trusted_root.json";

/// Where the client keeps its trusted TUF metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CacheKindRepr")]
pub enum CacheKind {
    /// Ephemeral, lives as long as the client
    #[default]
    Memory,
    /// Durable, rooted at [`ClientOptions::cache_location`]
    Disk,
}

impl CacheKind {
    /// Get the cache kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Memory => "memory",
            CacheKind::Disk => "disk",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for CacheKind {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(CacheKind::Memory),
            1 => Ok(CacheKind::Disk),
            other => Err(Error::UnknownCacheType(other.to_string())),
        }
    }
}

impl FromStr for CacheKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheKind::Memory),
            "disk" => Ok(CacheKind::Disk),
            _ => Err(Error::UnknownCacheType(s.to_string())),
        }
    }
}

/// Config files may name the cache kind or give its numeric value
#[derive(Deserialize)]
#[serde(untagged)]
enum CacheKindRepr {
    Index(i32),
    Name(String),
}

impl TryFrom<CacheKindRepr> for CacheKind {
    type Error = Error;

    fn try_from(repr: CacheKindRepr) -> Result<Self> {
        match repr {
            CacheKindRepr::Index(i) => CacheKind::try_from(i),
            CacheKindRepr::Name(name) => name.parse(),
        }
    }
}

/// Options for constructing a trust root client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    /// Whether the metadata cache lives on disk or in memory. Default: Memory.
    #[serde(default)]
    pub cache_type: CacheKind,

    /// Location of the metadata cache. Only applies when `cache_type` is Disk;
    /// the directory is created if it does not exist.
    #[serde(default)]
    pub cache_location: Option<PathBuf>,
}

impl ClientOptions {
    /// In-memory cache
    pub fn memory() -> Self {
        Self::default()
    }

    /// On-disk cache rooted at `path`
    pub fn disk(path: impl Into<PathBuf>) -> Self {
        Self {
            cache_type: CacheKind::Disk,
            cache_location: Some(path.into()),
        }
    }

    /// Set the cache location
    pub fn with_cache_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_location = Some(path.into());
        self
    }

    /// Platform-specific cache directory for TUF metadata
    pub fn default_cache_location() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("dev", "sigstore", "sigstore-rust")
            .ok_or_else(|| Error::Tuf("Could not determine cache directory".into()))?;

        Ok(project_dirs.cache_dir().join("tuf"))
    }
}

/// Options describing the remote TUF repository
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOptions {
    /// The trusted root.json used to bootstrap trust
    #[serde(default)]
    pub root: Vec<u8>,

    /// Location of the remote repository (`file://`, `http://` or `https://`)
    pub remote: String,

    /// Name of the repository
    #[serde(default)]
    pub name: String,
}

impl RepositoryOptions {
    /// Create repository options
    pub fn new(name: impl Into<String>, remote: impl Into<String>, root: impl Into<Vec<u8>>) -> Self {
        Self {
            root: root.into(),
            remote: remote.into(),
            name: name.into(),
        }
    }
}

impl fmt::Debug for RepositoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryOptions")
            .field("name", &self.name)
            .field("remote", &self.remote)
            .field("root", &format_args!("<{} bytes>", self.root.len()))
            .finish()
    }
}
