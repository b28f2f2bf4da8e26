use crate::types::{PublishError, Result, RetentionPolicy};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DIGEST_PATH: &str = "DIGEST_PATH";
pub const ENV_ARCHIVE_DIR: &str = "ARCHIVE_DIR";
pub const ENV_MARKER_PATH: &str = "MARKER_PATH";
pub const ENV_ARCHIVE_KEEP_LATEST: &str = "ARCHIVE_KEEP_LATEST";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub digest_path: PathBuf,
    pub archive_dir: PathBuf,
    pub marker_path: PathBuf,
    pub retention: RetentionPolicy,
    pub poll_interval: Duration,
    /// Pause after an attempt; at least as long as the window itself.
    pub cooldown: Duration,
    pub dry_run: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            digest_path: PathBuf::from("index.html"),
            archive_dir: PathBuf::from("archive"),
            marker_path: PathBuf::from("archive/.last_published.json"),
            retention: RetentionPolicy::KeepAll,
            poll_interval: DEFAULT_POLL_INTERVAL,
            cooldown: DEFAULT_COOLDOWN,
            dry_run: false,
        }
    }
}

impl PublishConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DIGEST_PATH) {
            config.digest_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_ARCHIVE_DIR) {
            config.archive_dir = PathBuf::from(dir);
            config.marker_path = config.archive_dir.join(".last_published.json");
        }
        if let Some(path) = lookup(ENV_MARKER_PATH) {
            config.marker_path = PathBuf::from(path);
        }
        if let Some(keep) = lookup(ENV_ARCHIVE_KEEP_LATEST) {
            config.retention = match keep.trim().parse::<usize>() {
                Ok(n) if n > 0 => RetentionPolicy::KeepLatest(n),
                _ => {
                    return Err(PublishError::Config(format!(
                        "{ENV_ARCHIVE_KEEP_LATEST} must be a positive number, got {keep:?}"
                    )))
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_environment() {
        let config = PublishConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.digest_path, PathBuf::from("index.html"));
        assert_eq!(config.marker_path, PathBuf::from("archive/.last_published.json"));
        assert_eq!(config.retention, RetentionPolicy::KeepAll);
        assert!(config.cooldown >= Duration::from_secs(3600));
    }

    #[test]
    fn marker_follows_archive_dir_unless_set() {
        let env = HashMap::from([(ENV_ARCHIVE_DIR, "/srv/vault"), (ENV_ARCHIVE_KEEP_LATEST, "8")]);
        let config = PublishConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.marker_path, PathBuf::from("/srv/vault/.last_published.json"));
        assert_eq!(config.retention, RetentionPolicy::KeepLatest(8));

        let env = HashMap::from([(ENV_ARCHIVE_DIR, "/srv/vault"), (ENV_MARKER_PATH, "/var/lib/marker.json")]);
        let config = PublishConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.marker_path, PathBuf::from("/var/lib/marker.json"));
    }

    #[test]
    fn zero_or_garbage_retention_is_rejected() {
        for bad in ["0", "many"] {
            let err = PublishConfig::from_lookup(|k| (k == ENV_ARCHIVE_KEEP_LATEST).then(|| bad.to_string()))
                .unwrap_err();
            assert!(matches!(err, PublishError::Config(_)));
        }
    }
}
