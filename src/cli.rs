use clap::{Args, Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub download: DownloadArgs,

    /// Log file (appended to; progress is also printed to stdout).
    #[arg(long, default_value = "novelfetch.log")]
    pub log_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererKind {
    /// Headless Chrome; runs page scripts.
    Chrome,
    /// Plain HTTP; chapter text must be in the served markup.
    Static,
}

#[derive(Debug, Clone, Args)]
pub struct DownloadArgs {
    /// Novel home URL (must be http/https), e.g. https://example.com/my-novel/
    pub url: String,

    /// Output directory.
    #[arg(long, default_value = "output")]
    pub out: String,

    /// Directory with `chapter_template.html` and `novel_template.html`
    /// (default: built-in templates).
    #[arg(long)]
    pub templates: Option<String>,

    /// How chapter pages are loaded.
    #[arg(long, value_enum, default_value_t = RendererKind::Chrome)]
    pub renderer: RendererKind,

    /// Chrome/Chromium executable (default: auto-detect).
    #[arg(long)]
    pub chrome_path: Option<String>,

    /// Show the browser window.
    #[arg(long)]
    pub headful: bool,

    /// How long to wait for the chapter title/body to appear (chrome renderer).
    #[arg(long, default_value_t = 5000)]
    pub element_wait_ms: u64,

    /// Leading chapter-shaped links on every listing page that are not part
    /// of the chapter list.
    #[arg(long, default_value_t = crate::site::DEFAULT_DECOY_COUNT)]
    pub decoy_count: usize,

    /// File extension of chapter pages.
    #[arg(long, default_value = crate::site::DEFAULT_CHAPTER_EXTENSION)]
    pub chapter_ext: String,

    /// Retries on connection failures.
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Delay before the first retry; doubled for each following retry.
    #[arg(long, default_value_t = 500)]
    pub backoff_ms: u64,

    /// Per-request timeout.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}
