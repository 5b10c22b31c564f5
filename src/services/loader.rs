use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::{info, warn};

use crate::workspace::ScriptFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Original,
    Translated,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub kind: LoadKind,
    pub files: Vec<ScriptFile>,
}

/// In-flight file load. The reading thread owns the path; the event loop
/// polls the receiver each tick and applies the outcome when it arrives.
/// There is no cancellation; an abandoned task just drops its channel.
pub struct LoadTask {
    receiver: Receiver<LoadOutcome>,
}

impl LoadTask {
    /// Read script files from `path` on a background thread. A directory
    /// yields its .txt entries sorted by name; a single file is read as-is.
    pub fn spawn(kind: LoadKind, path: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let files = collect_files(&path);
            info!(
                "load {:?}: {} file(s) from {}",
                kind,
                files.len(),
                path.display()
            );
            let _ = sender.send(LoadOutcome { kind, files });
        });
        Self { receiver }
    }

    /// Non-blocking poll. Some(..) exactly once, when the read finishes.
    pub fn poll(&self) -> Option<LoadOutcome> {
        self.receiver.try_recv().ok()
    }
}

/// Gather (name, content) pairs from a path. Content is read as UTF-8,
/// lossily; unreadable entries are skipped. An empty result is the silent
/// no-op case, surfaced to the caller as an empty vec.
fn collect_files(path: &Path) -> Vec<ScriptFile> {
    if path.is_file() {
        return read_script(path).into_iter().collect();
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot read {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("txt"))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    paths.iter().filter_map(|p| read_script(p)).collect()
}

fn read_script(path: &Path) -> Option<ScriptFile> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    match fs::read(path) {
        Ok(bytes) => Some(ScriptFile {
            name,
            content: String::from_utf8_lossy(&bytes).into_owned(),
        }),
        Err(e) => {
            warn!("cannot read {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_collect_files_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.txt"), "first").unwrap();
        fs::write(dir.path().join("skip.bin"), "binary").unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.txt");
        assert_eq!(files[0].content, "first");
        assert_eq!(files[1].name, "b.txt");
    }

    #[test]
    fn test_collect_single_file_any_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.dat");
        fs::write(&path, "payload").unwrap();

        let files = collect_files(&path);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "script.dat");
    }

    #[test]
    fn test_collect_missing_path_is_empty() {
        let files = collect_files(Path::new("/nonexistent/romdiff-test"));
        assert!(files.is_empty());
    }

    #[test]
    fn test_non_utf8_content_is_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.txt");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(&[b'o', b'k', 0xFF, b'!']).unwrap();
        drop(f);

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].content.starts_with("ok"));
        assert!(files[0].content.ends_with('!'));
    }

    #[test]
    fn test_spawned_task_delivers_outcome() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let task = LoadTask::spawn(LoadKind::Translated, dir.path().to_path_buf());
        let outcome = task.receiver.recv().unwrap();
        assert_eq!(outcome.kind, LoadKind::Translated);
        assert_eq!(outcome.files.len(), 1);
    }
}
