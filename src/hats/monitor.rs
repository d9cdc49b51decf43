use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Watches the hats file so the host knows when to fire its redraw event.
/// The producer writes new hats after the editor repaints, so the editor's
/// own redraws alone would show stale markers.
///
/// The parent directory is watched rather than the file itself: the file may
/// not exist yet and the producer replaces it on every write.
pub struct SnapshotMonitor {
    path: PathBuf,
    // keeps the watcher thread alive
    _watcher: RecommendedWatcher,
    rx: Receiver<()>,
}

impl SnapshotMonitor {
    pub fn new(path: impl Into<PathBuf>) -> notify::Result<Self> {
        let path = path.into();
        let (tx, rx) = channel();
        let file_name: Option<OsString> = path.file_name().map(|name| name.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match res {
                Ok(ev) => {
                    let relevant = matches!(
                        ev.kind,
                        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                    );
                    let ours = ev
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if relevant && ours {
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("hats watch error: {:?}", e),
            },
            Config::default(),
        )?;

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher.watch(parent, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "watching hats file");

        Ok(Self {
            path,
            _watcher: watcher,
            rx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drains pending watch events. Returns `true` when the file appeared,
    /// vanished or changed since the previous poll.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        if changed {
            tracing::debug!(path = %self.path.display(), "hats file changed");
        }
        changed
    }
}

impl std::fmt::Debug for SnapshotMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotMonitor")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_change(monitor: &mut SnapshotMonitor) -> bool {
        let deadline = Instant::now() + Duration::from_secs(3);
        while Instant::now() < deadline {
            if monitor.poll() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(25));
        }
        false
    }

    #[test]
    fn reports_creation_change_and_removal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("vscode-hats.json");
        let mut monitor = SnapshotMonitor::new(&path).expect("watch");
        assert!(!monitor.poll());

        std::fs::write(&path, "{}").expect("create");
        assert!(wait_for_change(&mut monitor));

        std::thread::sleep(Duration::from_millis(100));
        monitor.poll();
        std::fs::write(&path, r#"{"/a.txt":{}}"#).expect("rewrite");
        assert!(wait_for_change(&mut monitor));

        std::thread::sleep(Duration::from_millis(100));
        monitor.poll();
        std::fs::remove_file(&path).expect("remove");
        assert!(wait_for_change(&mut monitor));
    }

    #[test]
    fn sibling_files_are_ignored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut monitor = SnapshotMonitor::new(dir.path().join("vscode-hats.json")).expect("watch");

        std::fs::write(dir.path().join("colors.json"), "{}").expect("write sibling");
        std::thread::sleep(Duration::from_millis(300));
        assert!(!monitor.poll());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent").join("vscode-hats.json");
        assert!(SnapshotMonitor::new(path).is_err());
    }
}
