//! Local and remote TUF metadata stores

use crate::options::{CacheKind, ClientOptions, RepositoryOptions};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Where trusted metadata is persisted between updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalStore {
    /// Ephemeral store owned by the client
    Memory,
    /// Durable store rooted at a directory
    Disk(PathBuf),
}

impl LocalStore {
    /// Get the cache directory of a disk store
    pub fn path(&self) -> Option<&Path> {
        match self {
            LocalStore::Memory => None,
            LocalStore::Disk(path) => Some(path),
        }
    }
}

/// Where signed metadata and targets are fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStore {
    /// Read-only mirror of a repository directory tree
    Filesystem {
        /// Repository directory
        root: PathBuf,
        /// `file://` URL of the directory
        url: Url,
    },
    /// Repository served over HTTP(S)
    Http {
        /// Base URL of the repository
        url: Url,
    },
}

impl RemoteStore {
    /// Base URL for metadata files, always ending in `/`
    pub fn metadata_url(&self) -> &Url {
        match self {
            RemoteStore::Filesystem { url, .. } | RemoteStore::Http { url } => url,
        }
    }

    /// Base URL for target files
    pub fn targets_url(&self) -> Result<Url> {
        self.metadata_url()
            .join("targets/")
            .map_err(|e| Error::Tuf(e.to_string()))
    }
}

/// Select the local store described by the client options
///
/// A disk store's directory is created if it does not exist.
pub fn local_store_from_opts(opts: &ClientOptions) -> Result<LocalStore> {
    match opts.cache_type {
        CacheKind::Memory => Ok(LocalStore::Memory),
        CacheKind::Disk => {
            let location = opts
                .cache_location
                .as_ref()
                .filter(|p| !p.as_os_str().is_empty())
                .ok_or(Error::MissingCacheLocation)?;
            std::fs::create_dir_all(location)?;
            tracing::debug!(path = %location.display(), "using disk TUF cache");
            Ok(LocalStore::Disk(location.clone()))
        }
    }
}

/// Select the remote store described by the repository options
///
/// `file://` URIs must name an existing local directory; `http` and `https`
/// URIs are accepted as-is. Anything else is rejected.
pub fn remote_store_from_opts(opts: &RepositoryOptions) -> Result<RemoteStore> {
    let invalid = |reason: String| Error::InvalidRemoteUri {
        uri: opts.remote.clone(),
        reason,
    };

    let url = Url::parse(&opts.remote).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "file" => {
            let root = url
                .to_file_path()
                .map_err(|_| invalid("not a local file path".to_string()))?;
            if !root.is_dir() {
                return Err(invalid(format!("{} is not a directory", root.display())));
            }
            let url = Url::from_directory_path(&root)
                .map_err(|_| invalid("not an absolute path".to_string()))?;
            tracing::debug!(path = %root.display(), "using filesystem TUF remote");
            Ok(RemoteStore::Filesystem { root, url })
        }
        "http" | "https" => {
            let mut url = url;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            tracing::debug!(url = %url, "using HTTP TUF remote");
            Ok(RemoteStore::Http { url })
        }
        scheme => Err(invalid(format!("unsupported scheme {}", scheme))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_store_from_opts() {
        let dir = tempfile::tempdir().unwrap();
        let created = dir.path().join("created");
        std::fs::create_dir(&created).unwrap();

        assert_eq!(
            local_store_from_opts(&ClientOptions::memory()).unwrap(),
            LocalStore::Memory
        );

        let no_location = ClientOptions {
            cache_type: CacheKind::Disk,
            cache_location: None,
        };
        assert!(matches!(
            local_store_from_opts(&no_location),
            Err(Error::MissingCacheLocation)
        ));
        assert!(matches!(
            local_store_from_opts(&ClientOptions::disk("")),
            Err(Error::MissingCacheLocation)
        ));

        let new_cache = dir.path().join("test");
        assert_eq!(
            local_store_from_opts(&ClientOptions::disk(&new_cache)).unwrap(),
            LocalStore::Disk(new_cache.clone())
        );
        assert!(new_cache.is_dir());

        assert_eq!(
            local_store_from_opts(&ClientOptions::disk(&created))
                .unwrap()
                .path(),
            Some(created.as_path())
        );
    }

    fn remote(uri: &str) -> Result<RemoteStore> {
        remote_store_from_opts(&RepositoryOptions {
            remote: uri.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_remote_store_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("targets")).unwrap();

        let store = remote(&format!("file://{}", dir.path().display())).unwrap();
        let RemoteStore::Filesystem { root, url } = &store else {
            panic!("expected filesystem remote, got {:?}", store);
        };
        assert_eq!(root, dir.path());
        assert!(url.path().ends_with('/'));
        assert!(store.targets_url().unwrap().path().ends_with("/targets/"));
    }

    #[test]
    fn test_remote_store_rejects() {
        for uri in ["abc", "file://abc", "file:///nonexistent/tuf/repository", "ftp://example.com"] {
            assert!(
                matches!(remote(uri), Err(Error::InvalidRemoteUri { .. })),
                "{} should be rejected",
                uri
            );
        }
    }

    #[test]
    fn test_remote_store_http() {
        let store = remote("http://abc").unwrap();
        assert!(matches!(store, RemoteStore::Http { .. }));

        let store = remote("https://tuf-repo-cdn.sigstore.dev/repo").unwrap();
        assert_eq!(
            store.metadata_url().as_str(),
            "https://tuf-repo-cdn.sigstore.dev/repo/"
        );
        assert_eq!(
            store.targets_url().unwrap().as_str(),
            "https://tuf-repo-cdn.sigstore.dev/repo/targets/"
        );
    }
}
