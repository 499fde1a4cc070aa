use crate::config::ConfigError;
use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Changes closer together than this reload once.
const SETTLE: Duration = Duration::from_millis(150);

/// Whether `event` created, changed or removed the file at `config_path`.
pub fn touches(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Watches the directory holding the config file and reports edits to it.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    changes: Receiver<()>,
}

impl ConfigWatcher {
    pub fn new(config_path: &Path) -> Result<Self, ConfigError> {
        let config_path = std::path::absolute(config_path)?;
        let dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or(ConfigError::ConfigDirNotFound)?;
        fs_err::create_dir_all(&dir)?;

        let (tx, changes) = async_channel::unbounded();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &config_path) => {
                    let _ = tx.send_blocking(());
                }
                Ok(_) => {}
                Err(e) => log::error!("Watch error: {}", e),
            },
            notify::Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        log::debug!("Watching {} for config changes", dir.display());

        Ok(Self {
            _watcher: watcher,
            changes,
        })
    }

    /// Sends a reload for every settled burst of edits until either side closes.
    pub async fn run(self, tx: Sender<AppEvent>) {
        forward(self.changes, tx).await;
    }
}

async fn forward(changes: Receiver<()>, tx: Sender<AppEvent>) {
    while changes.recv().await.is_ok() {
        // editors save in several steps
        while let Ok(Ok(())) = tokio::time::timeout(SETTLE, changes.recv()).await {}
        if tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
}
