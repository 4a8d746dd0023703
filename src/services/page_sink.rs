use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::SinkError;
use crate::models::Size;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Encoded page bytes, either in memory or in a scratch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageData {
    InMemory(Vec<u8>),
    File(PathBuf),
}

/// A fully processed output page ready for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedPage {
    /// File name inside the output, e.g. `page-07-08.png`.
    pub id: String,
    pub data: PageData,
    pub media_type: &'static str,
    pub size: Size,
}

impl FinishedPage {
    pub fn bytes(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match &self.data {
            PageData::InMemory(bytes) => Ok(Cow::Borrowed(bytes)),
            PageData::File(path) => std::fs::read(path).map(Cow::Owned),
        }
    }
}

/// Receives finished pages in output order.
pub trait PageSink {
    fn write(&mut self, page: FinishedPage) -> Result<(), SinkError>;

    /// Flush whatever index or archive trailer the output needs.
    /// Writing after `finish` fails with [`SinkError::Finished`].
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// One line of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub media_type: String,
    pub bytes: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub pages: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn load(dir: &Path) -> Result<Self, SinkError> {
        let content = std::fs::read(dir.join(MANIFEST_FILE))?;
        Ok(serde_json::from_slice(&content)?)
    }
}

/// One file per page in a flat directory, plus `manifest.json`.
#[derive(Debug)]
pub struct RawDirSink {
    dir: PathBuf,
    manifest: Manifest,
    finished: bool,
}

impl RawDirSink {
    pub fn create(dir: &Path) -> Result<Self, SinkError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            manifest: Manifest::default(),
            finished: false,
        })
    }
}

impl PageSink for RawDirSink {
    fn write(&mut self, page: FinishedPage) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        let target = self.dir.join(&page.id);
        let bytes = page.bytes()?;
        let digest = hex::encode(Sha256::digest(&bytes));
        let len = bytes.len();

        match &page.data {
            PageData::InMemory(data) => std::fs::write(&target, data)?,
            PageData::File(scratch) => {
                // rename fails across file systems
                if std::fs::rename(scratch, &target).is_err() {
                    std::fs::write(&target, &bytes)?;
                    std::fs::remove_file(scratch)?;
                }
            }
        }
        tracing::debug!(id = %page.id, bytes = len, "Wrote page file");

        self.manifest.pages.push(ManifestEntry {
            id: page.id,
            width: page.size.width,
            height: page.size.height,
            media_type: page.media_type.to_string(),
            bytes: len,
            sha256: digest,
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        let file = BufWriter::new(File::create(self.dir.join(MANIFEST_FILE))?);
        serde_json::to_writer_pretty(file, &self.manifest)?;
        self.finished = true;
        tracing::info!(
            dir = %self.dir.display(),
            pages = self.manifest.pages.len(),
            "Wrote page directory"
        );
        Ok(())
    }
}

/// Pages packed into a comic book archive.
pub struct CbzSink {
    path: PathBuf,
    writer: Option<ZipWriter<BufWriter<File>>>,
    pages: usize,
}

impl CbzSink {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let writer = ZipWriter::new(BufWriter::new(File::create(path)?));
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(writer),
            pages: 0,
        })
    }
}

impl PageSink for CbzSink {
    fn write(&mut self, page: FinishedPage) -> Result<(), SinkError> {
        let writer = self.writer.as_mut().ok_or(SinkError::Finished)?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(page.id.as_str(), options)?;
        writer.write_all(&page.bytes()?)?;
        if let PageData::File(scratch) = &page.data {
            std::fs::remove_file(scratch)?;
        }
        self.pages += 1;
        tracing::debug!(id = %page.id, "Added page to archive");
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        let writer = self.writer.take().ok_or(SinkError::Finished)?;
        writer.finish()?.flush()?;
        tracing::info!(archive = %self.path.display(), pages = self.pages, "Wrote CBZ archive");
        Ok(())
    }
}

/// Collects pages in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pages: Vec<FinishedPage>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[FinishedPage] {
        &self.pages
    }

    pub fn ids(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl PageSink for MemorySink {
    fn write(&mut self, page: FinishedPage) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        self.pages.push(page);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        self.finished = true;
        Ok(())
    }
}
