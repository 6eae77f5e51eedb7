//! TUF client for acquiring the Sigstore trusted root
//!
//! [`TrustRootClient`] keeps a local metadata cache synchronized with a remote
//! TUF repository and assembles the [`TrustedRoot`] from the verified
//! `trusted_root.json` target.
//!
//! The client is an explicit two-state machine: it starts uninitialized and
//! becomes usable after one successful [`TrustRootClient::initialize`].
//! Initialization takes `&mut self`, so repeated refreshes must be serialized
//! by the owner; read operations take `&self` and may run concurrently.
//!
//! # Example
//!
//! ```no_run
//! use sigstore_trust_root::{ClientOptions, RepositoryOptions, TrustRootClient, DEFAULT_TUF_URL};
//! use sigstore_trust_root::TrustedRootExt;
//!
//! # async fn example(root_json: Vec<u8>) -> Result<(), sigstore_trust_root::Error> {
//! let mut client = TrustRootClient::new(&ClientOptions::disk("/var/cache/sigstore/tuf"))?;
//! client
//!     .initialize(&RepositoryOptions::new("sigstore", DEFAULT_TUF_URL, root_json))
//!     .await?;
//!
//! let keys = client.get_trusted_root_store()?.tlog_keys();
//! println!("Trusting {} Rekor logs", keys.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use sigstore_crypto::TrustedLogKeys;
use tempfile::TempDir;
use tough::{FilesystemTransport, HttpTransport, IntoVec, Repository, RepositoryLoader, TargetName};

use crate::options::{ClientOptions, RepositoryOptions, TRUSTED_ROOT_TARGET};
use crate::store::{local_store_from_opts, remote_store_from_opts, LocalStore, RemoteStore};
use crate::trusted_root::{TrustedRoot, TrustedRootExt, TrustedRootProvider};
use crate::{Error, Result};

/// Client synchronizing trusted TUF metadata and serving the trusted root
pub struct TrustRootClient {
    /// Store for trusted metadata
    local: LocalStore,
    cache: MetadataCache,
    state: ClientState,
}

/// Directory holding the trusted metadata between updates
///
/// Both store kinds keep the previously trusted versions, so rollback checks
/// apply to every refresh. They differ only in how long the directory lives.
enum MetadataCache {
    /// Removed together with the client
    Ephemeral(TempDir),
    Durable(PathBuf),
}

impl MetadataCache {
    fn path(&self) -> &Path {
        match self {
            MetadataCache::Ephemeral(dir) => dir.path(),
            MetadataCache::Durable(path) => path,
        }
    }
}

enum ClientState {
    Uninitialized,
    Initialized(Box<Synchronized>),
}

/// State established by a successful update
struct Synchronized {
    name: String,
    repository: Repository,
    trusted_root: Option<TrustedRoot>,
    /// Datastore backing `repository`
    _staging: TempDir,
}

impl TrustRootClient {
    /// Create a client with the local store selected by `opts`
    pub fn new(opts: &ClientOptions) -> Result<Self> {
        let local = local_store_from_opts(opts)?;
        let cache = match &local {
            LocalStore::Memory => MetadataCache::Ephemeral(
                tempfile::Builder::new().prefix("sigstore-tuf-").tempdir()?,
            ),
            LocalStore::Disk(dir) => MetadataCache::Durable(dir.clone()),
        };

        Ok(Self {
            local,
            cache,
            state: ClientState::Uninitialized,
        })
    }

    /// Bind the remote repository and perform one metadata update
    ///
    /// The caller-supplied root is the trust anchor. Remote metadata is fetched
    /// and verified role by role (root rotation, signature thresholds, version
    /// rollback against the previously trusted metadata, expiry). The update
    /// runs in a staging directory outside the cache and is copied over the
    /// cache only after everything verified, so a failed update leaves the
    /// cache untouched.
    ///
    /// On failure the client keeps its previous state.
    pub async fn initialize(&mut self, opts: &RepositoryOptions) -> Result<()> {
        let remote = remote_store_from_opts(opts)?;
        let metadata_url = remote.metadata_url().clone();
        let targets_url = remote.targets_url()?;

        let mut loader = RepositoryLoader::new(&opts.root, metadata_url, targets_url);
        loader = match &remote {
            RemoteStore::Filesystem { .. } => loader.transport(FilesystemTransport),
            RemoteStore::Http { .. } => loader.transport(HttpTransport::default()),
        };

        let staging = stage_cache(self.cache.path()).await?;
        loader = loader.datastore(staging.path());

        // Fetch and verify all metadata
        let repository = loader.load().await.map_err(classify_tough_error)?;

        let trusted_root = match read_target(&repository, TRUSTED_ROOT_TARGET).await? {
            Some(bytes) => {
                let json = String::from_utf8(bytes).map_err(|e| {
                    Error::Tuf(format!("Invalid UTF-8 in {}: {}", TRUSTED_ROOT_TARGET, e))
                })?;
                Some(TrustedRoot::from_json(&json)?)
            }
            None => {
                tracing::debug!(repository = %opts.name, "repository has no trusted root target");
                None
            }
        };

        commit_cache(staging.path(), self.cache.path()).await?;

        tracing::info!(
            repository = %opts.name,
            remote = %remote.metadata_url(),
            cache = ?self.local.path(),
            "trust root metadata updated"
        );

        self.state = ClientState::Initialized(Box::new(Synchronized {
            name: opts.name.clone(),
            repository,
            trusted_root,
            _staging: staging,
        }));
        Ok(())
    }

    /// Check if a remote repository has been synchronized
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, ClientState::Initialized(_))
    }

    /// Name of the synchronized repository
    pub fn repository_name(&self) -> Option<&str> {
        match &self.state {
            ClientState::Initialized(sync) => Some(&sync.name),
            ClientState::Uninitialized => None,
        }
    }

    /// Get the local store
    pub fn local_store(&self) -> &LocalStore {
        &self.local
    }

    /// Get the trusted root assembled from the verified metadata
    pub fn get_trusted_root_store(&self) -> Result<TrustedRoot> {
        self.synchronized()?
            .trusted_root
            .clone()
            .ok_or_else(|| Error::TargetNotFound(TRUSTED_ROOT_TARGET.to_string()))
    }

    /// Get the Rekor keys of the trusted root, keyed by hex log identity
    pub fn trusted_log_keys(&self) -> Result<TrustedLogKeys> {
        Ok(self.get_trusted_root_store()?.tlog_keys())
    }

    /// Fetch a target file, verified against the synchronized metadata
    pub async fn fetch_target(&self, target_name: &str) -> Result<Vec<u8>> {
        let sync = self.synchronized()?;
        read_target(&sync.repository, target_name)
            .await?
            .ok_or_else(|| Error::TargetNotFound(target_name.to_string()))
    }

    fn synchronized(&self) -> Result<&Synchronized> {
        match &self.state {
            ClientState::Initialized(sync) => Ok(sync),
            ClientState::Uninitialized => Err(Error::NotInitialized),
        }
    }
}

impl TrustedRootProvider for TrustRootClient {
    fn trusted_root(&self) -> Result<TrustedRoot> {
        self.get_trusted_root_store()
    }
}

/// Read a target through the repository, `None` if it is not listed
async fn read_target(repository: &Repository, target_name: &str) -> Result<Option<Vec<u8>>> {
    let target = TargetName::new(target_name)
        .map_err(|e| Error::Tuf(format!("Invalid target name: {}", e)))?;

    let Some(stream) = repository
        .read_target(&target)
        .await
        .map_err(classify_tough_error)?
    else {
        return Ok(None);
    };

    // Length and hashes are checked while the stream is consumed
    let bytes = stream.into_vec().await.map_err(classify_tough_error)?;
    Ok(Some(bytes))
}

/// Transport failures are retryable by the caller; everything else is a
/// verification failure of the remote metadata.
fn classify_tough_error(err: tough::error::Error) -> Error {
    if matches!(err, tough::error::Error::Transport { .. }) {
        Error::Transport(err.to_string())
    } else {
        Error::MetadataVerificationFailed(err.to_string())
    }
}

/// Create a staging directory seeded with the metadata cached in `cache`
///
/// The staging directory lives in the system temporary directory, never
/// inside the cache.
async fn stage_cache(cache: &Path) -> Result<TempDir> {
    let staging = tempfile::Builder::new()
        .prefix("sigstore-tuf-staging-")
        .tempdir()?;

    for name in metadata_files(cache).await? {
        tokio::fs::copy(cache.join(&name), staging.path().join(&name)).await?;
    }

    Ok(staging)
}

/// Replace the cached metadata with the staged metadata
///
/// Every staged file is copied next to its destination before any of them is
/// renamed into place, so a failed copy leaves the cache as it was.
async fn commit_cache(staging: &Path, cache: &Path) -> Result<()> {
    let staged = metadata_files(staging).await?;

    let mut pending = Vec::with_capacity(staged.len());
    for name in &staged {
        let partial = cache.join(format!("{}.partial", name));
        if let Err(e) = tokio::fs::copy(staging.join(name), &partial).await {
            for (written, _) in &pending {
                let _ = tokio::fs::remove_file(written).await;
            }
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        pending.push((partial, cache.join(name)));
    }

    for (partial, destination) in &pending {
        tokio::fs::rename(partial, destination).await?;
    }

    for name in metadata_files(cache).await? {
        if !staged.contains(&name) {
            tokio::fs::remove_file(cache.join(&name)).await?;
        }
    }

    Ok(())
}

/// Names of the metadata files directly inside `dir`
async fn metadata_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".json") {
                names.push(name.to_string());
            }
        }
    }

    Ok(names)
}
