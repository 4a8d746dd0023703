use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::SourceError;
use crate::rendering::PixelBuffer;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

/// Supplies decoded pages by 1-based page number.
pub trait PageSource {
    /// Number of pages available.
    fn page_count(&self) -> u32;

    /// Decode page `page_no`.
    fn load_page(&mut self, page_no: u32) -> Result<PixelBuffer, SourceError>;
}

/// Open a directory of page images or a CBZ archive.
pub fn open_source(path: &Path) -> Result<Box<dyn PageSource>, SourceError> {
    if path.is_dir() {
        return Ok(Box::new(DirectorySource::open(path)?));
    }
    match extension_of(path).as_deref() {
        Some("cbz") | Some("zip") => Ok(Box::new(CbzSource::open(path)?)),
        _ => Err(SourceError::Unsupported(path.to_path_buf())),
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn is_image_name(name: &str) -> bool {
    extension_of(Path::new(name)).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Compare names with digit runs ordered by value, so `page2` sorts before `page10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        let (Some(ca), Some(cb)) = (a.chars().next(), b.chars().next()) else {
            return a.len().cmp(&b.len());
        };
        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let (run_a, rest_a) = split_digits(a);
            let (run_b, rest_b) = split_digits(b);
            let (num_a, num_b) = (run_a.trim_start_matches('0'), run_b.trim_start_matches('0'));
            let order = num_a
                .len()
                .cmp(&num_b.len())
                .then_with(|| num_a.cmp(num_b))
                .then_with(|| run_a.len().cmp(&run_b.len()));
            if order != Ordering::Equal {
                return order;
            }
            (a, b) = (rest_a, rest_b);
        } else {
            if ca != cb {
                return ca.cmp(&cb);
            }
            (a, b) = (&a[ca.len_utf8()..], &b[cb.len_utf8()..]);
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn index_of(page_no: u32, total: usize) -> Result<usize, SourceError> {
    if page_no == 0 || page_no as usize > total {
        return Err(SourceError::OutOfRange {
            page: page_no,
            total: total as u32,
        });
    }
    Ok(page_no as usize - 1)
}

/// Image files in a directory, paged in file-name order.
#[derive(Debug)]
pub struct DirectorySource {
    files: Vec<PathBuf>,
}

impl DirectorySource {
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_image_name);
            if path.is_file() && is_image {
                files.push(path);
            }
        }
        files.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
        tracing::info!(dir = %dir.display(), pages = files.len(), "Opened page directory");
        Ok(Self { files })
    }
}

impl PageSource for DirectorySource {
    fn page_count(&self) -> u32 {
        self.files.len() as u32
    }

    fn load_page(&mut self, page_no: u32) -> Result<PixelBuffer, SourceError> {
        let path = &self.files[index_of(page_no, self.files.len())?];
        tracing::debug!(path = %path.display(), "Decoding page");
        Ok(PixelBuffer::open(path)?)
    }
}

/// Image entries of a comic book archive, paged in entry-name order.
/// Directory entries and non-image files (`ComicInfo.xml`) are skipped.
pub struct CbzSource {
    archive: ZipArchive<BufReader<File>>,
    entries: Vec<String>,
}

impl CbzSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
        let mut entries: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/') && is_image_name(name))
            .map(str::to_string)
            .collect();
        entries.sort_by(|a, b| natural_cmp(a, b));
        tracing::info!(archive = %path.display(), pages = entries.len(), "Opened CBZ archive");
        Ok(Self { archive, entries })
    }
}

impl PageSource for CbzSource {
    fn page_count(&self) -> u32 {
        self.entries.len() as u32
    }

    fn load_page(&mut self, page_no: u32) -> Result<PixelBuffer, SourceError> {
        let name = &self.entries[index_of(page_no, self.entries.len())?];
        let mut entry = self.archive.by_name(name)?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        tracing::debug!(entry = %name, bytes = bytes.len(), "Decoding page");
        Ok(PixelBuffer::decode(&bytes)?)
    }
}

/// Pages held in memory. Loading hands out a copy.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<PixelBuffer>,
    loads: Vec<u32>,
}

impl MemorySource {
    pub fn new(pages: Vec<PixelBuffer>) -> Self {
        Self {
            pages,
            loads: Vec::new(),
        }
    }

    /// Page numbers in the order they were requested.
    pub fn loads(&self) -> &[u32] {
        &self.loads
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn load_page(&mut self, page_no: u32) -> Result<PixelBuffer, SourceError> {
        let page = self.pages[index_of(page_no, self.pages.len())?].clone();
        self.loads.push(page_no);
        Ok(page)
    }
}
