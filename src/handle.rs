// src/handle.rs
//! Shared, hot-swappable classifier.
//!
//! Readers take an `Arc<Classifier>` snapshot and classify against it without
//! holding the lock, so a reload never shows a half-updated config: the whole
//! snapshot is replaced in one write.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};

use tracing::{info, warn};

use crate::classifier::{ClassificationResult, Classifier};
use crate::config::{config_paths, ClassifierConfig};
use crate::locale::Locale;

pub const ENV_HOT_RELOAD: &str = "CLASSIFIER_HOT_RELOAD";
const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct ClassifierHandle {
    inner: Arc<RwLock<Arc<Classifier>>>,
}

impl ClassifierHandle {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(classifier))),
        }
    }

    /// Current snapshot. Cheap; holds the lock only for an `Arc` clone.
    pub fn snapshot(&self) -> Arc<Classifier> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn classify(&self, title: Option<&str>, locale: Locale) -> ClassificationResult {
        self.snapshot().classify(title, locale)
    }

    /// Swap in a new, already validated classifier.
    pub fn replace(&self, classifier: Classifier) {
        let next = Arc::new(classifier);
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Rebuild from `dir` and swap. On any error the current snapshot stays.
    pub fn reload_from_dir(&self, dir: &Path) -> anyhow::Result<()> {
        let cfg = ClassifierConfig::load_dir(dir)?;
        let classifier = Classifier::new(cfg)?;
        self.replace(classifier);
        info!(dir = %dir.display(), "classifier config reloaded");
        Ok(())
    }
}

/// Returns true if hot reload should run (opt-in, dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var(ENV_HOT_RELOAD)
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Newest mtime among the three config documents.
fn latest_mtime(dir: &Path) -> Option<SystemTime> {
    config_paths(dir)
        .iter()
        .filter_map(|p| fs::metadata(p).and_then(|m| m.modified()).ok())
        .max()
}

/// Poll the config directory and reload `handle` when any document changes.
pub fn start_hot_reload_thread(handle: ClassifierHandle, dir: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    info!(dir = %dir.display(), "classifier hot reload enabled");
    thread::spawn(move || {
        let mut last_mtime = latest_mtime(&dir);
        loop {
            thread::sleep(POLL_INTERVAL);
            let mtime = latest_mtime(&dir);
            if mtime.is_some() && mtime > last_mtime {
                if let Err(e) = handle.reload_from_dir(&dir) {
                    warn!(error = %e, "classifier reload failed; keeping previous config");
                }
                last_mtime = mtime;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNALS: &str = r#"{ "tag_is_panel": { "US": ["panel"] } }"#;
    const FILTERS: &str = "{}";

    fn scoring(panel_weight: i32) -> String {
        format!(
            r#"{{
                "平板灯": {{ "base_score": 10, "weights": {{ "tag_is_panel": {panel_weight} }} }},
                "灯光类-其他": {{ "base_score": 0, "weights": {{}} }}
            }}"#
        )
    }

    fn write_dir(dir: &Path, panel_weight: i32) {
        fs::write(dir.join("signals.json"), SIGNALS).unwrap();
        fs::write(dir.join("scoring_models.json"), scoring(panel_weight)).unwrap();
        fs::write(dir.join("hard_filters.json"), FILTERS).unwrap();
    }

    #[test]
    fn reload_swaps_whole_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        write_dir(tmp.path(), 60);
        let handle = ClassifierHandle::new(
            Classifier::new(ClassifierConfig::load_dir(tmp.path()).unwrap()).unwrap(),
        );

        let before = handle.snapshot();
        assert_eq!(handle.classify(Some("panel"), Locale::Us).predicted_category, "平板灯");

        write_dir(tmp.path(), 0);
        handle.reload_from_dir(tmp.path()).unwrap();

        // Old snapshot is untouched; new calls see the new weights.
        assert_eq!(before.classify(Some("panel"), Locale::Us).predicted_category, "平板灯");
        assert_eq!(
            handle.classify(Some("panel"), Locale::Us).predicted_category,
            "灯光类-其他"
        );
    }

    #[test]
    fn failed_reload_keeps_previous_config() {
        let tmp = tempfile::tempdir().unwrap();
        write_dir(tmp.path(), 60);
        let handle = ClassifierHandle::new(
            Classifier::new(ClassifierConfig::load_dir(tmp.path()).unwrap()).unwrap(),
        );

        fs::write(
            tmp.path().join("hard_filters.json"),
            r#"{ "form_factor_lock": { "tag_is_panel": "不存在" } }"#,
        )
        .unwrap();
        assert!(handle.reload_from_dir(tmp.path()).is_err());
        assert_eq!(handle.classify(Some("panel"), Locale::Us).predicted_category, "平板灯");
    }

    #[test]
    #[serial_test::serial]
    fn hot_reload_is_opt_in() {
        std::env::remove_var(ENV_HOT_RELOAD);
        assert!(!hot_reload_enabled());

        std::env::set_var(ENV_HOT_RELOAD, "0");
        assert!(!hot_reload_enabled());

        // Test builds carry debug_assertions, which counts as a dev env.
        std::env::set_var(ENV_HOT_RELOAD, "1");
        assert_eq!(hot_reload_enabled(), cfg!(debug_assertions));

        std::env::remove_var(ENV_HOT_RELOAD);
    }

    #[test]
    fn mtime_tracks_newest_document() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(latest_mtime(tmp.path()).is_none());
        write_dir(tmp.path(), 60);
        assert!(latest_mtime(tmp.path()).is_some());
    }

    #[test]
    fn snapshots_are_shared_across_threads() {
        let tmp = tempfile::tempdir().unwrap();
        write_dir(tmp.path(), 60);
        let handle = ClassifierHandle::new(
            Classifier::new(ClassifierConfig::load_dir(tmp.path()).unwrap()).unwrap(),
        );

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let h = handle.clone();
                thread::spawn(move || h.classify(Some("led panel"), Locale::Us).predicted_category)
            })
            .collect();
        for w in workers {
            assert_eq!(w.join().unwrap(), "平板灯");
        }
    }
}
