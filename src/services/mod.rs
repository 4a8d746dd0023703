pub mod page_sink;
pub mod page_source;
pub mod pipeline;

pub use page_sink::{
    CbzSink, FinishedPage, Manifest, ManifestEntry, MemorySink, PageData, PageSink, RawDirSink,
    MANIFEST_FILE,
};
pub use page_source::{open_source, CbzSource, DirectorySource, MemorySource, PageSource};
pub use pipeline::{PageCompositionPipeline, RunSummary};
