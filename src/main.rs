use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagefold::models::{AppConfig, OutputFormat, ReadingDirection};
use pagefold::rendering::PngEncoder;
use pagefold::services::{open_source, CbzSink, PageCompositionPipeline, PageSink, RawDirSink};

#[derive(Parser)]
#[command(name = "pagefold")]
#[command(about = "Trim, join spreads, fit and grayscale book pages for e-readers")]
struct Cli {
    /// Log every decision the pipeline makes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a directory of page images or a CBZ archive
    Convert {
        /// Directory of page images, or a .cbz archive
        input: PathBuf,

        /// Output directory (raw) or archive path (cbz)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep encoded pages in this directory until they are packaged
        #[arg(long)]
        work_dir: Option<PathBuf>,

        #[command(flatten)]
        options: Overrides,
    },
    /// Show page count and the resolved page selections
    Info {
        input: PathBuf,

        #[command(flatten)]
        options: Overrides,
    },
}

/// Command line values that replace config file values.
#[derive(Args)]
struct Overrides {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Right-to-left reading direction (manga)
    #[arg(long)]
    rtl: bool,

    /// First page to process
    #[arg(long)]
    start: Option<u32>,

    /// Last page to process
    #[arg(long)]
    end: Option<u32>,

    /// Page selection, e.g. "1-20,25"
    #[arg(long)]
    pages: Option<String>,

    /// Screen width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Screen height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Background color tolerance (0.0 - 1.0)
    #[arg(long)]
    fuzz: Option<f64>,

    /// Grayscale bit depth: 1, 2, 4, 8 or 16
    #[arg(long)]
    depth: Option<u8>,

    /// Output format: raw or cbz
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Re-compress PNGs with oxipng
    #[arg(long)]
    optimize: bool,

    #[arg(long)]
    no_trim: bool,

    #[arg(long)]
    no_spread: bool,

    #[arg(long)]
    no_grayscale: bool,
}

impl Overrides {
    fn load(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if self.rtl {
            config.reading_direction = ReadingDirection::RightToLeft;
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if self.end.is_some() {
            config.end = self.end;
        }
        if self.pages.is_some() {
            config.pages = self.pages.clone();
        }
        if let Some(width) = self.width {
            config.resize.width = width;
        }
        if let Some(height) = self.height {
            config.resize.height = height;
        }
        if let Some(fuzz) = self.fuzz {
            config.trim.fuzz = fuzz;
        }
        if let Some(depth) = self.depth {
            config.grayscale.color_depth = depth;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config.output.optimize |= self.optimize;
        config.trim.enabled &= !self.no_trim;
        config.spread.enabled &= !self.no_spread;
        config.grayscale.enabled &= !self.no_grayscale;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "pagefold=debug"
    } else {
        "pagefold=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            work_dir,
            options,
        } => run_convert_command(&input, output, work_dir, &options),
        Commands::Info { input, options } => run_info_command(&input, &options),
    }
}

fn run_convert_command(
    input: &Path,
    output: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    options: &Overrides,
) -> anyhow::Result<()> {
    let app_config = options.load()?;
    let mut source = open_source(input)?;
    let config = app_config.validate(source.page_count())?;

    let format = app_config.output.format;
    let output = output.unwrap_or_else(|| default_output(input, format));
    let mut sink: Box<dyn PageSink> = match format {
        OutputFormat::Raw => Box::new(RawDirSink::create(&output)?),
        OutputFormat::Cbz => Box::new(CbzSink::create(&output)?),
    };

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        pages = %config.selection,
        "Converting"
    );

    let mut pipeline = PageCompositionPipeline::new(&config)
        .with_encoder(PngEncoder::new(app_config.output.optimize));
    if let Some(dir) = work_dir {
        pipeline = pipeline.with_work_dir(dir);
    }
    let summary = pipeline.run(source.as_mut(), sink.as_mut())?;

    println!(
        "Wrote {} page(s) from {} input page(s) to {}",
        summary.output_pages,
        summary.input_pages,
        output.display()
    );
    Ok(())
}

fn run_info_command(input: &Path, options: &Overrides) -> anyhow::Result<()> {
    let app_config = options.load()?;
    let source = open_source(input)?;
    let config = app_config.validate(source.page_count())?;

    println!("Pages:     {}", config.total_pages);
    println!("Selected:  {}", config.selection);
    match &config.grayscale.pages {
        Some(pages) => println!("Grayscale: {} ({}-bit)", pages, config.grayscale.color_depth),
        None => println!("Grayscale: off"),
    }
    println!("Screen:    {}", config.target);
    Ok(())
}

/// `book/` -> `book-pagefold/`, `book.cbz` -> `book-pagefold.cbz`
fn default_output(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pages".to_string());
    let name = match format {
        OutputFormat::Raw => format!("{stem}-pagefold"),
        OutputFormat::Cbz => format!("{stem}-pagefold.cbz"),
    };
    input.with_file_name(name)
}
