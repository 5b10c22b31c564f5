use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::{error, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ServiceError;
use crate::workspace::ScriptFile;

pub const ARCHIVE_NAME: &str = "translated_scripts.zip";

/// Write one text file: save-current. Name collisions overwrite.
pub fn write_text(dir: &Path, file: &ScriptFile) -> Result<PathBuf, ServiceError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&file.name);
    fs::write(&path, &file.content)?;
    Ok(path)
}

/// Package the whole translated collection into a zip archive, one entry
/// per file. The archive is built under a temporary name and renamed into
/// place, so a failed build leaves no partial file behind.
pub fn write_archive(dir: &Path, files: &[ScriptFile]) -> Result<PathBuf, ServiceError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(ARCHIVE_NAME);
    let tmp = dir.join(format!("{}.part", ARCHIVE_NAME));

    let result = build_archive(&tmp, files);
    match result {
        Ok(()) => {
            fs::rename(&tmp, &path)?;
            Ok(path)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn build_archive(path: &Path, files: &[ScriptFile]) -> Result<(), ServiceError> {
    let out = fs::File::create(path)?;
    let mut writer = ZipWriter::new(out);
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        writer.start_file(file.name.as_str(), options)?;
        writer.write_all(file.content.as_bytes())?;
    }
    writer.finish()?;
    Ok(())
}

/// In-flight save. Exactly one terminal result arrives on the channel;
/// there is no cancellation and no retry.
pub struct SaveTask {
    receiver: Receiver<Result<PathBuf, String>>,
}

impl SaveTask {
    pub fn spawn_save_all(dir: PathBuf, files: Vec<ScriptFile>) -> Self {
        Self::spawn(move || write_archive(&dir, &files))
    }

    pub fn spawn_save_current(dir: PathBuf, file: ScriptFile) -> Self {
        Self::spawn(move || write_text(&dir, &file))
    }

    fn spawn(
        work: impl FnOnce() -> Result<PathBuf, ServiceError> + Send + 'static,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let result = match work() {
                Ok(path) => {
                    info!("saved {}", path.display());
                    Ok(path)
                }
                Err(e) => {
                    error!("save failed: {}", e);
                    Err(e.to_string())
                }
            };
            let _ = sender.send(result);
        });
        Self { receiver }
    }

    /// Non-blocking poll. Some(..) exactly once, when the save finishes.
    pub fn poll(&self) -> Option<Result<PathBuf, String>> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sample_files() -> Vec<ScriptFile> {
        vec![
            ScriptFile::new("a.txt", "alpha line\nsecond"),
            ScriptFile::new("b.txt", "beta"),
        ]
    }

    #[test]
    fn test_write_text() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScriptFile::new("out.txt", "content");
        let path = write_text(dir.path(), &file).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "content");
    }

    #[test]
    fn test_archive_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_archive(dir.path(), &sample_files()).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(ARCHIVE_NAME)
        );

        let mut archive = zip::ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("a.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "alpha line\nsecond");
    }

    #[test]
    fn test_archive_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_archive(dir.path(), &[]).unwrap();
        let archive = zip::ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_no_partial_file_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the output directory should be makes the
        // build fail before anything is written.
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "in the way").unwrap();

        let result = write_archive(&blocked, &sample_files());
        assert!(result.is_err());
        assert!(blocked.is_file());
        assert!(!dir.path().join(ARCHIVE_NAME).exists());
    }

    #[test]
    fn test_save_task_reports_completion() {
        let dir = tempfile::tempdir().unwrap();
        let task = SaveTask::spawn_save_all(dir.path().to_path_buf(), sample_files());
        let result = task.receiver.recv().unwrap();
        assert!(result.is_ok());
    }
}
