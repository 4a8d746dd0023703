//! Page composition pipeline.
//!
//! Walks the selected pages in ascending order. Each step loads a page,
//! optionally pairs it with the next page into a spread, then trims, resizes
//! and grayscales the result before handing it to a [`PageSink`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::PipelineError;
use crate::models::{Page, PipelineConfig};
use crate::rendering::{
    merge, GrayscaleQuantizer, PixelBuffer, PngEncoder, Resizer, SpreadDetector, Trimmer,
    PNG_MEDIA_TYPE,
};
use crate::services::{FinishedPage, PageData, PageSink, PageSource};

/// Totals for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub input_pages: u32,
    pub output_pages: u32,
    pub spreads: u32,
}

pub struct PageCompositionPipeline<'a> {
    config: &'a PipelineConfig,
    encoder: PngEncoder,
    work_dir: Option<PathBuf>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> PageCompositionPipeline<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            encoder: PngEncoder::default(),
            work_dir: None,
            cancel: None,
        }
    }

    pub fn with_encoder(mut self, encoder: PngEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Keep encoded pages in files under `dir` instead of in memory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Abort before the next page once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn run(
        &self,
        source: &mut dyn PageSource,
        sink: &mut dyn PageSink,
    ) -> Result<RunSummary, PipelineError> {
        if let Some(dir) = &self.work_dir {
            std::fs::create_dir_all(dir)?;
        }

        let pages: Vec<u32> = self.config.selection.iter().collect();
        let last = self.config.selection.last().unwrap_or_default();
        let mut summary = RunSummary::default();
        let mut cursor = 0;

        while let Some(&page_no) = pages.get(cursor) {
            if self.is_cancelled() {
                tracing::warn!(page = page_no, "Run cancelled");
                return Err(PipelineError::Cancelled(page_no));
            }

            let span = tracing::info_span!("page", page = page_no, paired = tracing::field::Empty);
            let _enter = span.enter();
            tracing::info!("Processing page ({page_no}/{last})");

            let current = Page::new(load(source, page_no)?, page_no);
            let next_no = pages.get(cursor + 1).copied().filter(|&n| n == page_no + 1);
            let page = match next_no {
                Some(next_no) if self.config.spread.enabled => {
                    self.try_spread(current, next_no, source)?
                }
                _ => current,
            };

            let consumed = if let Some(paired) = page.paired_no {
                span.record("paired", paired);
                summary.spreads += 1;
                2
            } else {
                1
            };

            let page = self.process(page)?;
            self.emit(page, sink)?;

            summary.input_pages += consumed as u32;
            summary.output_pages += 1;
            cursor += consumed;
        }

        sink.finish()?;
        tracing::info!(
            input_pages = summary.input_pages,
            output_pages = summary.output_pages,
            spreads = summary.spreads,
            "Total Input {} page(s). Total Output {} page(s)",
            summary.input_pages,
            summary.output_pages
        );
        Ok(summary)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Merge `current` with page `next_no` if they form a spread. Otherwise the
    /// lookahead page is dropped and `current` comes back unchanged.
    fn try_spread(
        &self,
        current: Page,
        next_no: u32,
        source: &mut dyn PageSource,
    ) -> Result<Page, PipelineError> {
        let page_no = current.page_no;
        let next = Page::new(load(source, next_no)?, next_no);
        let (left, right) = Page::left_right(current, next, self.config.reading_direction);

        let detector = SpreadDetector::new(&self.config.spread, &self.config.background);
        if detector.is_spread(&left, &right)? {
            tracing::info!(left = left.page_no, right = right.page_no, "Merging spread");
            return Ok(merge(left, right));
        }

        Ok(if left.page_no == page_no { left } else { right })
    }

    /// Trim, resize and grayscale, in that order.
    pub fn process(&self, page: Page) -> Result<Page, PipelineError> {
        let page = Trimmer::new(&self.config.trim, &self.config.background).apply(page)?;
        let page = Resizer::new(self.config.target).apply(page);
        GrayscaleQuantizer::new(&self.config.grayscale).apply(page)
    }

    fn emit(&self, page: Page, sink: &mut dyn PageSink) -> Result<(), PipelineError> {
        let id = format!("{}.png", page.file_stem(self.config.total_pages));
        let size = page.size();
        let bytes = self.encoder.encode(&page.buffer)?;
        drop(page);

        let mut scratch = None;
        let data = match &self.work_dir {
            Some(dir) => {
                let file = ScratchFile::write(dir, &id, &bytes)?;
                let path = file.path().to_path_buf();
                scratch = Some(file);
                PageData::File(path)
            }
            None => PageData::InMemory(bytes),
        };

        tracing::info!(%id, %size, "Emitting page");
        sink.write(FinishedPage {
            id,
            data,
            media_type: PNG_MEDIA_TYPE,
            size,
        })?;
        if let Some(file) = scratch {
            file.release();
        }
        Ok(())
    }
}

fn load(source: &mut dyn PageSource, page_no: u32) -> Result<PixelBuffer, PipelineError> {
    source
        .load_page(page_no)
        .map_err(|source| PipelineError::Source {
            page: page_no,
            source,
        })
}

/// Encoded page on disk. Removed on drop unless released to a sink.
struct ScratchFile {
    path: PathBuf,
    armed: bool,
}

impl ScratchFile {
    fn write(dir: &Path, id: &str, bytes: &[u8]) -> Result<Self, PipelineError> {
        let path = dir.join(id);
        std::fs::write(&path, bytes)?;
        Ok(Self { path, armed: true })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn release(mut self) {
        self.armed = false;
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::debug!(path = %self.path.display(), %e, "Scratch file already gone");
            }
        }
    }
}
