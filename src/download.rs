use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::assemble::Assembler;
use crate::chapter::{Chapter, fetch_and_normalize};
use crate::cli::{DownloadArgs, RendererKind};
use crate::collection::Collection;
use crate::discover::Discovery;
use crate::formats::ChapterRecord;
use crate::locator::PatternExtractor;
use crate::pager::Pager;
use crate::render::{ChromeOptions, ChromeRenderer, Renderer, StaticRenderer};
use crate::site::SiteProfile;
use crate::store::OutputLayout;
use crate::template::Templates;
use crate::transport::{RetryPolicy, Transport};

/// Everything one download run owns: the HTTP session, the rendering session
/// and the output side.
pub struct RunContext {
    collection: Collection,
    site: SiteProfile,
    transport: Transport,
    renderer: Box<dyn Renderer>,
    assembler: Assembler,
}

pub async fn run(args: DownloadArgs) -> anyhow::Result<()> {
    tracing::info!(url = %args.url, "new download process initialized");
    let path = RunContext::open(&args).await?.execute().await?;

    tracing::info!(path = %path.display(), "novel successfully downloaded");
    Ok(())
}

impl RunContext {
    pub fn new(
        collection: Collection,
        site: SiteProfile,
        transport: Transport,
        renderer: Box<dyn Renderer>,
        assembler: Assembler,
    ) -> Self {
        Self {
            collection,
            site,
            transport,
            renderer,
            assembler,
        }
    }

    pub async fn open(args: &DownloadArgs) -> anyhow::Result<Self> {
        let collection = Collection::from_home_url(&args.url).context("parse novel url")?;
        let site = SiteProfile {
            decoy_count: args.decoy_count,
            chapter_extension: args.chapter_ext.clone(),
            ..SiteProfile::default()
        };

        let templates = match args.templates.as_deref() {
            Some(dir) => Templates::load(Path::new(dir)).context("load templates")?,
            None => Templates::builtin().context("load built-in templates")?,
        };

        let layout = OutputLayout::new(&args.out, collection.slug());
        layout.create_dirs().context("create output directories")?;

        let retry = RetryPolicy {
            max_retries: args.retries,
            base_delay: Duration::from_millis(args.backoff_ms),
        };
        let transport = Transport::new(retry, Duration::from_secs(args.timeout_secs))
            .context("build http transport")?;

        let renderer: Box<dyn Renderer> = match args.renderer {
            RendererKind::Chrome => Box::new(
                ChromeRenderer::launch(ChromeOptions {
                    executable: args.chrome_path.as_deref().map(PathBuf::from),
                    headful: args.headful,
                    element_wait: Duration::from_millis(args.element_wait_ms),
                })
                .await
                .context("start browser session")?,
            ),
            RendererKind::Static => Box::new(StaticRenderer::new(transport.clone())),
        };

        let assembler = Assembler::new(layout, templates, collection.title());

        Ok(Self::new(collection, site, transport, renderer, assembler))
    }

    /// Runs the download and closes the rendering session whether or not it
    /// succeeded.
    pub async fn execute(mut self) -> anyhow::Result<PathBuf> {
        let result = self.download().await;
        self.close().await;
        result
    }

    /// Discovers, fetches and assembles the collection. Returns the path of
    /// the aggregated document.
    async fn download(&mut self) -> anyhow::Result<PathBuf> {
        let locators = self.discover().await?;
        if locators.is_empty() {
            tracing::warn!(url = %self.collection.home_address(), "no chapters found");
        }

        let (chapters, records) = self.fetch_all(&locators).await?;

        self.assembler
            .write_manifest(&records)
            .context("write chapter manifest")?;
        let (_, path) = self
            .assembler
            .assemble_collection(&chapters)
            .context("assemble novel")?;
        Ok(path)
    }

    async fn close(&mut self) {
        self.renderer.close().await;
    }

    async fn discover(&self) -> anyhow::Result<Vec<Url>> {
        let pager = Pager::new(&self.site.last_page_label).context("build pager")?;
        let extractor =
            PatternExtractor::new(self.site.chapter_extension.clone(), self.site.decoy_count);
        let discovery = Discovery {
            transport: &self.transport,
            pager: &pager,
            extractor: &extractor,
            page_query_param: &self.site.page_query_param,
        };

        let anchor_copy = self.assembler.layout().home_page_path();
        discovery
            .discover_all(&self.collection, Some(&anchor_copy))
            .await
            .context("discover chapter urls")
    }

    async fn fetch_all(
        &mut self,
        locators: &[Url],
    ) -> anyhow::Result<(Vec<Chapter>, Vec<ChapterRecord>)> {
        let total = locators.len();
        let collection_dir = self.assembler.layout().collection_dir();
        let mut chapters = Vec::with_capacity(total);
        let mut records = Vec::with_capacity(total);

        for (idx, locator) in locators.iter().enumerate() {
            let sequence = idx + 1;
            tracing::info!(sequence, total, url = %locator, "downloading chapter");

            let chapter = fetch_and_normalize(
                self.renderer.as_mut(),
                &self.assembler,
                &self.site,
                locator,
                sequence,
                total,
            )
            .await
            .inspect_err(|err| {
                tracing::error!(sequence, total, url = %locator, %err, "chapter download failed");
            })
            .with_context(|| format!("download chapter {sequence}/{total}: {locator}"))?;

            let path = self.assembler.chapter_path(&chapter);
            records.push(ChapterRecord {
                sequence,
                title: chapter.title.clone(),
                url: locator.to_string(),
                path: path
                    .strip_prefix(&collection_dir)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .to_string(),
                retrieved_at: chrono::Utc::now().to_rfc3339(),
            });
            chapters.push(chapter);
        }

        Ok((chapters, records))
    }
}
