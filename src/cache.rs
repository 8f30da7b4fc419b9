//! Compiled-artifact cache.
//!
//! A fresh artifact short-circuits the whole load pipeline, so whatever is
//! written here must already be fully merged and fully substituted.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::LoadError;
use crate::value::ConfigValue;

/// Cache collaborator for the load pipeline.
///
/// `is_fresh` answers "is this artifact still valid given the source files it
/// was compiled from"; `write` persists a merged tree together with that
/// resource list; `read` returns the artifact without re-running anything.
pub trait ArtifactCache: Send + Sync {
    /// Whether the stored artifact is still valid for its recorded resources.
    fn is_fresh(&self) -> bool;

    /// Persist the merged tree and the source files it depends on.
    fn write(&self, content: &ConfigValue, resources: &[PathBuf]) -> Result<(), LoadError>;

    /// Location of the artifact on disk.
    fn path(&self) -> &Path;

    /// Load the stored artifact.
    fn read(&self) -> Result<ConfigValue, LoadError>;
}

#[derive(Serialize, Deserialize)]
struct CacheMeta {
    resources: Vec<PathBuf>,
}

/// File-based cache: the merged tree as JSON, plus a `.meta.json` sidecar
/// recording the source paths for freshness comparison.
pub struct FileCache {
    artifact: PathBuf,
}

impl FileCache {
    /// Cache backed by an explicit artifact path.
    pub fn new(artifact: impl Into<PathBuf>) -> Self {
        Self { artifact: artifact.into() }
    }

    /// Cache under `cache_dir` with an artifact name derived from the source
    /// path, so distinct entry points get distinct artifacts.
    pub fn for_source(cache_dir: impl Into<PathBuf>, source: &Path) -> Self {
        let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("config");
        let digest = stable_hash(&source.to_string_lossy());
        Self { artifact: cache_dir.into().join(format!("{stem}-{digest}.json")) }
    }

    fn meta_path(&self) -> PathBuf {
        let mut name = self.artifact.as_os_str().to_os_string();
        name.push(".meta.json");
        PathBuf::from(name)
    }
}

impl ArtifactCache for FileCache {
    fn is_fresh(&self) -> bool {
        let Ok(artifact_mtime) = mtime(&self.artifact) else {
            return false;
        };
        let Ok(meta_text) = fs::read_to_string(self.meta_path()) else {
            debug!(artifact = %self.artifact.display(), "cache meta missing, treating as stale");
            return false;
        };
        let Ok(meta) = serde_json::from_str::<CacheMeta>(&meta_text) else {
            debug!(artifact = %self.artifact.display(), "cache meta unreadable, treating as stale");
            return false;
        };
        meta.resources.iter().all(|resource| match mtime(resource) {
            Ok(resource_mtime) => resource_mtime <= artifact_mtime,
            Err(_) => false,
        })
    }

    fn write(&self, content: &ConfigValue, resources: &[PathBuf]) -> Result<(), LoadError> {
        if let Some(parent) = self.artifact.parent() {
            fs::create_dir_all(parent).map_err(|e| LoadError::cache(&self.artifact, e))?;
        }
        let meta = CacheMeta { resources: resources.to_vec() };
        let meta_text =
            serde_json::to_string_pretty(&meta).map_err(|e| LoadError::cache(&self.artifact, e))?;
        let artifact_text = serde_json::to_string_pretty(content)
            .map_err(|e| LoadError::cache(&self.artifact, e))?;
        // Meta is written before the artifact; a half-written pair reads as stale.
        fs::write(self.meta_path(), meta_text).map_err(|e| LoadError::cache(&self.artifact, e))?;
        fs::write(&self.artifact, artifact_text)
            .map_err(|e| LoadError::cache(&self.artifact, e))?;
        debug!(artifact = %self.artifact.display(), resources = resources.len(), "cache artifact written");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.artifact
    }

    fn read(&self) -> Result<ConfigValue, LoadError> {
        let text =
            fs::read_to_string(&self.artifact).map_err(|e| LoadError::cache(&self.artifact, e))?;
        serde_json::from_str(&text).map_err(|e| LoadError::cache(&self.artifact, e))
    }
}

fn mtime(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

fn stable_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_tree() -> ConfigValue {
        ConfigValue::from(
            serde_yaml::from_str::<serde_yaml::Value>("name: app\nport: 8080\n").expect("yaml"),
        )
    }

    #[test]
    fn test_missing_artifact_is_stale() {
        let tmp = TempDir::new().expect("tmp");
        let cache = FileCache::new(tmp.path().join("compiled.json"));
        assert!(!cache.is_fresh());
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let tmp = TempDir::new().expect("tmp");
        let source = tmp.path().join("app.yaml");
        fs::write(&source, "name: app\n").expect("write source");

        let cache = FileCache::new(tmp.path().join("compiled.json"));
        let tree = sample_tree();
        cache.write(&tree, &[source]).expect("write cache");

        assert!(cache.is_fresh());
        assert_eq!(cache.read().expect("read"), tree);
    }

    #[test]
    fn test_stale_when_resource_newer_than_artifact() {
        let tmp = TempDir::new().expect("tmp");
        let source = tmp.path().join("app.yaml");
        fs::write(&source, "name: app\n").expect("write source");

        let cache = FileCache::new(tmp.path().join("compiled.json"));
        cache.write(&sample_tree(), &[source]).expect("write cache");

        // Age the artifact instead of sleeping past mtime granularity.
        let old = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(cache.path())
            .expect("open artifact")
            .set_modified(old)
            .expect("set mtime");

        assert!(!cache.is_fresh());
    }

    #[test]
    fn test_stale_when_resource_deleted() {
        let tmp = TempDir::new().expect("tmp");
        let source = tmp.path().join("app.yaml");
        fs::write(&source, "name: app\n").expect("write source");

        let cache = FileCache::new(tmp.path().join("compiled.json"));
        cache.write(&sample_tree(), &[source.clone()]).expect("write cache");
        fs::remove_file(&source).expect("delete source");

        assert!(!cache.is_fresh());
    }

    #[test]
    fn test_stale_when_meta_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cache = FileCache::new(tmp.path().join("compiled.json"));
        cache.write(&sample_tree(), &[]).expect("write cache");
        fs::remove_file(cache.meta_path()).expect("delete meta");
        assert!(!cache.is_fresh());
    }

    #[test]
    fn test_for_source_derives_distinct_artifacts() {
        let a = FileCache::for_source("/var/cache/app", Path::new("/etc/app/config.yaml"));
        let b = FileCache::for_source("/var/cache/app", Path::new("/etc/other/config.yaml"));
        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with("/var/cache/app"));
    }

    #[test]
    fn test_corrupt_artifact_is_a_cache_error() {
        let tmp = TempDir::new().expect("tmp");
        let artifact = tmp.path().join("compiled.json");
        fs::write(&artifact, "not json").expect("write");

        let cache = FileCache::new(&artifact);
        let err = cache.read().expect_err("should fail");
        assert!(matches!(err, LoadError::Cache { .. }));
    }
}
