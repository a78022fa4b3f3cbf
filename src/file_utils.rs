use anyhow::{Result, Context};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Matches stems of files this tool itself produced, so a re-run over a
/// directory never re-submits its own output.
static TRANSLATED_STEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)_translated$").unwrap());

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Destination path for a translated document
    // @params: source_file, target_dir
    pub fn derive_translated_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        source_file: P1,
        target_dir: P2,
    ) -> PathBuf {
        let source_file = source_file.as_ref();

        let stem = source_file.file_stem().unwrap_or_default();
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str("_translated");
        if let Some(ext) = source_file.extension() {
            output_filename.push('.');
            output_filename.push_str(&ext.to_string_lossy());
        }

        target_dir.as_ref().join(output_filename)
    }

    /// Whether a filename was produced by a previous run of this tool
    pub fn is_translated_output<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .file_stem()
            .map(|stem| TRANSLATED_STEM.is_match(&stem.to_string_lossy()))
            .unwrap_or(false)
    }

    /// Find files with one of the given extensions in a directory.
    ///
    /// The listing is sorted lexicographically so batch summaries are
    /// reproducible regardless of the filesystem's enumeration order.
    /// Outputs of previous runs are excluded.
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let normalized: Vec<String> = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        let mut result = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() || Self::is_translated_output(path) {
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if normalized.iter().any(|wanted| *wanted == ext) {
                    result.push(path.to_path_buf());
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Verify the current process can read a file.
    ///
    /// Opening and reading one byte catches both missing files and
    /// permission problems before anything is sent to the service.
    pub fn check_read_access<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
        let mut file = fs::File::open(path.as_ref())?;
        let mut probe = [0u8; 1];
        let _ = file.read(&mut probe)?;
        Ok(())
    }

    /// Verify the current process can create files in a directory.
    ///
    /// Probes with a throwaway temp file; the probe is removed on drop.
    pub fn check_write_access<P: AsRef<Path>>(dir: P) -> std::io::Result<()> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", dir),
            ));
        }
        tempfile::Builder::new()
            .prefix(".doctrans-probe")
            .tempfile_in(dir)
            .map(|_| ())
    }

    /// Write a destination file atomically.
    ///
    /// The payload goes to a temp file in the destination's directory and
    /// is renamed over the destination only after a full write and flush,
    /// so a crash mid-write never leaves a partial file looking done.
    pub fn write_atomic<P: AsRef<Path>>(dest: P, content: &[u8]) -> Result<()> {
        let dest = dest.as_ref();
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::ensure_dir(&parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temp file in {:?}", parent))?;
        tmp.write_all(content)
            .with_context(|| format!("Failed to write temp file for {:?}", dest))?;
        tmp.flush()?;
        tmp.persist(dest)
            .with_context(|| format!("Failed to move temp file into place at {:?}", dest))?;

        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file's raw bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
