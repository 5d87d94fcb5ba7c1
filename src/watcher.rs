//! Food database file watching for live board reload.
//!
//! Watches the JSON food database for modifications and invokes a reload
//! callback. Editor save patterns (write + rename, temp files, sync tools)
//! produce bursts of events, so events are coalesced: the callback fires
//! once the file has been quiet for the debounce window.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

/// Configuration for food database watching.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Quiet period required before a burst of events triggers a reload.
    pub debounce: Duration,
    /// Number of reload attempts per trigger.
    pub retry_attempts: u32,
    /// Delay between reload attempts.
    pub retry_delay: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(750),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Errors that can occur during file watching.
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("failed to create watcher: {0}")]
    Notify(#[from] notify::Error),

    #[error("watch path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("event channel closed unexpectedly")]
    ChannelClosed,
}

/// True for event kinds that can change file contents.
fn is_content_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// True if the event touches the watched file.
fn touches_file(event: &Event, file_name: Option<&OsString>) -> bool {
    event.paths.iter().any(|p| match file_name {
        Some(name) => p.file_name() == Some(name.as_os_str()),
        None => false,
    })
}

/// Watches a file and calls `on_change` after each coalesced burst of
/// modifications.
///
/// The parent directory is watched rather than the file itself, so
/// replace-by-rename saves keep working. This function only returns on
/// error.
pub async fn watch_file<F>(
    path: impl AsRef<Path>,
    config: WatcherConfig,
    on_change: F,
) -> Result<(), WatcherError>
where
    F: Fn() + Send + Sync + 'static,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(WatcherError::PathNotFound(path.to_path_buf()));
    }

    let canonical = path
        .canonicalize()
        .map_err(|_| WatcherError::PathNotFound(path.to_path_buf()))?;
    let watch_dir = canonical.parent().unwrap_or(&canonical).to_path_buf();
    let file_name = canonical.file_name().map(|s| s.to_owned());

    log::info!("Watching food database: {}", canonical.display());

    let (tx, mut rx) = mpsc::channel::<Event>(100);
    let mut watcher = RecommendedWatcher::new(
        move |result: Result<Event, notify::Error>| {
            if let Ok(event) = result {
                // Drop events rather than block the notify thread.
                let _ = tx.try_send(event);
            }
        },
        notify::Config::default(),
    )?;
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

    loop {
        let Some(event) = rx.recv().await else {
            return Err(WatcherError::ChannelClosed);
        };

        if !is_content_event(&event.kind) || !touches_file(&event, file_name.as_ref()) {
            continue;
        }

        log::debug!("Food database event: {:?}", event.kind);

        // Coalesce the burst: keep draining until the channel stays quiet
        // for the debounce window, then fire once.
        loop {
            match tokio::time::timeout(config.debounce, rx.recv()).await {
                Ok(Some(_)) => {}
                Ok(None) => return Err(WatcherError::ChannelClosed),
                Err(_) => break,
            }
        }

        log::info!("Food database changed, triggering reload");
        on_change();
    }
}
