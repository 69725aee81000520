//! OCR fallback for scanned statements: pages are rendered with `pdftoppm`
//! and recognised one by one with `tesseract`.
//!
//! All intermediate files live in a scoped temporary directory that is
//! removed on every exit path, including timeout.

use crate::config::OcrConfig;
use crate::error::ReleveError;
use crate::extraction::{PageContent, PdfExtractor};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// OCR backend built on poppler's `pdftoppm` and `tesseract`.
pub struct TesseractExtractor {
    config: OcrConfig,
}

impl TesseractExtractor {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Check if both tools are available on the system.
    pub fn is_available() -> bool {
        ["pdftoppm", "tesseract"].iter().all(|tool| {
            Command::new(tool)
                .arg("-v")
                .output()
                .map(|o| o.status.success() || !o.stderr.is_empty())
                .unwrap_or(false)
        })
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl PdfExtractor for TesseractExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ReleveError> {
        with_workdir(|workdir| self.recognise(workdir, pdf_bytes))
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}

impl TesseractExtractor {
    fn recognise(&self, workdir: &Path, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ReleveError> {
        let deadline = Deadline::new(self.config.timeout_secs);

        let pdf_path = workdir.join("statement.pdf");
        std::fs::write(&pdf_path, pdf_bytes)?;

        tracing::info!(
            dpi = self.config.dpi,
            language = %self.config.language,
            "rendering pages for OCR"
        );
        let mut render = Command::new("pdftoppm");
        render
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg("-png")
            .arg(&pdf_path)
            .arg(workdir.join("page"));
        run_tool("pdftoppm", render, workdir, &deadline)?;

        let images = page_images(workdir)?;
        if images.is_empty() {
            return Err(ReleveError::Extraction(
                "pdftoppm produced no page images".into(),
            ));
        }

        let mut pages = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let out_base = workdir.join(format!("ocr-{:04}", i + 1));
            let mut ocr = Command::new("tesseract");
            ocr
                .arg(image)
                .arg(&out_base)
                .arg("-l")
                .arg(&self.config.language);
            run_tool("tesseract", ocr, workdir, &deadline)?;

            let text = std::fs::read_to_string(out_base.with_extension("txt"))?;
            tracing::debug!(page = i + 1, chars = text.len(), "page recognised");
            pages.push(PageContent::from_text(i + 1, &text));
        }

        Ok(pages)
    }
}

/// Run `work` in a fresh temporary directory, removed however `work` exits.
fn with_workdir<T>(
    work: impl FnOnce(&Path) -> Result<T, ReleveError>,
) -> Result<T, ReleveError> {
    let workdir = TempDir::new().map_err(|e| ReleveError::Extraction(e.to_string()))?;
    work(workdir.path())
}

/// One time budget shared by every tool invocation of a run.
struct Deadline {
    at: Instant,
    timeout_secs: u64,
}

impl Deadline {
    fn new(timeout_secs: u64) -> Self {
        Self {
            at: Instant::now() + Duration::from_secs(timeout_secs),
            timeout_secs,
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.at
    }
}

/// Run a tool to completion within the deadline. stderr goes to a file in
/// `workdir` so a chatty tool can never block on a full pipe.
fn run_tool(
    tool: &'static str,
    mut command: Command,
    workdir: &Path,
    deadline: &Deadline,
) -> Result<(), ReleveError> {
    if deadline.expired() {
        return Err(ReleveError::OcrTimeout {
            timeout_secs: deadline.timeout_secs,
        });
    }

    let stderr_path = workdir.join(format!("{tool}.stderr"));
    let stderr_file = File::create(&stderr_path)?;
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(stderr_file)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReleveError::ToolNotFound { tool }
            } else {
                ReleveError::Extraction(format!("{tool} failed to start: {e}"))
            }
        })?;

    let status = wait_until(&mut child, deadline)?;
    if !status.success() {
        let stderr = std::fs::read_to_string(&stderr_path).unwrap_or_default();
        return Err(ReleveError::ToolFailed {
            tool,
            code: status.code().unwrap_or(-1),
            stderr: stderr.trim().to_string(),
        });
    }
    Ok(())
}

fn wait_until(
    child: &mut Child,
    deadline: &Deadline,
) -> Result<std::process::ExitStatus, ReleveError> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if deadline.expired() {
            tracing::warn!(
                timeout_secs = deadline.timeout_secs,
                "OCR deadline reached, killing tool"
            );
            // The child may have exited between the poll and the kill.
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReleveError::OcrTimeout {
                timeout_secs: deadline.timeout_secs,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Rendered page images, in page order. pdftoppm zero-pads page numbers to a
/// common width, so a lexical sort is a page sort.
fn page_images(dir: &Path) -> Result<Vec<PathBuf>, ReleveError> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_images_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["page-02.png", "page-10.png", "page-01.png", "statement.pdf"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let images = page_images(dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-10.png"]);
    }

    #[test]
    fn test_expired_deadline_refuses_to_start() {
        let dir = TempDir::new().unwrap();
        let deadline = Deadline::new(0);
        let err = run_tool("tesseract", Command::new("tesseract"), dir.path(), &deadline)
            .unwrap_err();
        assert!(matches!(err, ReleveError::OcrTimeout { timeout_secs: 0 }));
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let dir = TempDir::new().unwrap();
        let deadline = Deadline::new(60);
        let err = run_tool(
            "pdftoppm",
            Command::new("releve-no-such-tool-on-path"),
            dir.path(),
            &deadline,
        )
        .unwrap_err();
        assert!(matches!(err, ReleveError::ToolNotFound { tool: "pdftoppm" }));
    }

    #[cfg(unix)]
    #[test]
    fn test_deadline_kills_running_tool() {
        let dir = TempDir::new().unwrap();
        let mut slow = Command::new("sleep");
        slow.arg("5");
        let start = Instant::now();
        let err = run_tool("tesseract", slow, dir.path(), &Deadline::new(1)).unwrap_err();
        assert!(matches!(err, ReleveError::OcrTimeout { timeout_secs: 1 }));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_workdir_removed_after_tool_failure() {
        let mut used = PathBuf::new();
        let err = with_workdir(|dir| {
            used = dir.to_path_buf();
            assert!(used.is_dir());
            run_tool("pdftoppm", Command::new("false"), dir, &Deadline::new(60))
        })
        .unwrap_err();
        assert!(matches!(err, ReleveError::ToolFailed { tool: "pdftoppm", .. }));
        assert!(!used.as_os_str().is_empty());
        assert!(!used.exists());
    }
}
