use crate::events::AppEvent;
use crate::sys::watcher::ConfigWatcher;
use async_channel::Sender;
use std::path::Path;
use std::thread;
use tokio::runtime::Builder;

/// Starts watching `config_path` on a background thread. Failures only
/// disable live reload.
pub fn start_background_services(config_path: &Path, tx: Sender<AppEvent>) {
    let watcher = match ConfigWatcher::new(config_path) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Config reload disabled: {}", e);
            return;
        }
    };

    let spawned = thread::Builder::new()
        .name("huewheel-watch".into())
        .spawn(move || {
            let rt = match Builder::new_current_thread().enable_time().build() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };
            rt.block_on(watcher.run(tx));
        });

    if let Err(e) = spawned {
        log::error!("Failed to spawn watcher thread: {}", e);
    }
}
