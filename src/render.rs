use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt as _;
use scraper::{ElementRef, Html, Node, Selector};
use tokio::task::JoinHandle;
use url::Url;

use crate::error::{Error, Result};
use crate::transport::Transport;

const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A document session that can load a chapter page and read the text of
/// uniquely identified elements. One caller at a time.
#[async_trait]
pub trait Renderer: Send {
    async fn navigate(&mut self, url: &Url) -> Result<()>;

    /// Text of the first element carrying `class_name`, or `None`.
    async fn text_by_class(&mut self, class_name: &str) -> Result<Option<String>>;

    /// Text of the element with `id`, or `None`.
    async fn text_by_id(&mut self, id: &str) -> Result<Option<String>>;

    /// Releases the session. Failures are logged, not returned.
    async fn close(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct ChromeOptions {
    pub executable: Option<PathBuf>,
    pub headful: bool,
    pub element_wait: Duration,
}

/// Headless Chrome session; runs page scripts before text is read.
pub struct ChromeRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    current: Option<Url>,
    element_wait: Duration,
}

impl ChromeRenderer {
    pub async fn launch(options: ChromeOptions) -> anyhow::Result<Self> {
        let mut builder = BrowserConfig::builder().request_timeout(Duration::from_secs(30));
        if let Some(executable) = options.executable {
            builder = builder.chrome_executable(executable);
        }
        if options.headful {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|err| anyhow::anyhow!("build browser config: {err}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| anyhow::anyhow!("launch browser: {err}"))?;
        let handler = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::debug!(%err, "browser handler event error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| anyhow::anyhow!("open browser page: {err}"))?;
        tracing::info!("browser session started");

        Ok(Self {
            browser,
            handler,
            page: Some(page),
            current: None,
            element_wait: options.element_wait,
        })
    }

    async fn find_text(&mut self, selector: &str) -> Result<Option<String>> {
        let (Some(page), Some(url)) = (self.page.as_ref(), self.current.as_ref()) else {
            return Ok(None);
        };

        // Content may be inserted by page scripts after the load event.
        let started = Instant::now();
        loop {
            match page.find_element(selector).await {
                Ok(element) => {
                    let text = element
                        .inner_text()
                        .await
                        .map_err(|err| Error::fetch(url, format!("read {selector}: {err}")))?;
                    return Ok(Some(text.unwrap_or_default()));
                }
                Err(err) if started.elapsed() >= self.element_wait => {
                    tracing::debug!(%url, selector, %err, "element not found");
                    return Ok(None);
                }
                Err(_) => tokio::time::sleep(ELEMENT_POLL_INTERVAL).await,
            }
        }
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn navigate(&mut self, url: &Url) -> Result<()> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| Error::fetch(url, "browser session already closed"))?;
        page.goto(url.as_str())
            .await
            .map_err(|err| Error::fetch(url, format!("navigate: {err}")))?;
        page.wait_for_navigation()
            .await
            .map_err(|err| Error::fetch(url, format!("wait for page load: {err}")))?;
        self.current = Some(url.clone());
        Ok(())
    }

    async fn text_by_class(&mut self, class_name: &str) -> Result<Option<String>> {
        self.find_text(&format!(".{class_name}")).await
    }

    async fn text_by_id(&mut self, id: &str) -> Result<Option<String>> {
        self.find_text(&format!("#{id}")).await
    }

    async fn close(&mut self) {
        if let Some(page) = self.page.take()
            && let Err(err) = page.close().await
        {
            tracing::warn!(%err, "failed to close browser page");
        }
        if let Err(err) = self.browser.close().await {
            tracing::warn!(%err, "failed to close browser");
        }
        if let Err(err) = self.browser.wait().await {
            tracing::warn!(%err, "failed to wait for browser exit");
        }
        self.handler.abort();
        self.current = None;
        tracing::info!("browser session closed");
    }
}

/// Reads chapter pages over plain HTTP. Suitable for sites that serve the
/// chapter text in the initial markup.
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    transport: Transport,
    current: Option<(Url, String)>,
}

impl StaticRenderer {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            current: None,
        }
    }

    fn find_text(&self, selector: &str) -> Result<Option<String>> {
        let Some((url, markup)) = self.current.as_ref() else {
            return Ok(None);
        };
        let selector = Selector::parse(selector)
            .map_err(|err| Error::extraction(url, format!("{selector} ({err})")))?;
        let document = Html::parse_document(markup);
        Ok(document.select(&selector).next().map(inner_text))
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn navigate(&mut self, url: &Url) -> Result<()> {
        let markup = self.transport.get_text(url).await?;
        self.current = Some((url.clone(), markup));
        Ok(())
    }

    async fn text_by_class(&mut self, class_name: &str) -> Result<Option<String>> {
        self.find_text(&format!(".{class_name}"))
    }

    async fn text_by_id(&mut self, id: &str) -> Result<Option<String>> {
        self.find_text(&format!("#{id}"))
    }

    async fn close(&mut self) {
        self.current = None;
    }
}

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dd", "dl", "dt", "figure", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre",
    "section", "table", "tr", "ul",
];

/// Approximates the browser's `innerText`: whitespace inside text is
/// collapsed, `<br>` and block elements become line breaks.
fn inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if collapsed.is_empty() {
                    continue;
                }
                if text.starts_with(char::is_whitespace) && !out.ends_with(['\n', ' ']) {
                    out.push(' ');
                }
                out.push_str(&collapsed);
                if text.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
            }
            Node::Element(el) => {
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = el.name();
                if matches!(name, "script" | "style" | "template") {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let is_block = BLOCK_ELEMENTS.contains(&name);
                if is_block {
                    out.push('\n');
                }
                collect_text(child_ref, out);
                if is_block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(html: &str, selector: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(selector).expect("parse selector");
        document.select(&selector).next().map(inner_text)
    }

    #[test]
    fn inner_text_breaks_on_paragraphs_and_br() {
        let html = r#"<div id="chapter-content">
  <p>First   line
     continues.</p>
  <p>Second<br>Third</p>
  <script>ignored()</script>
</div>"#;
        assert_eq!(
            text_of(html, "#chapter-content").as_deref(),
            Some("First line continues.\n\nSecond\nThird")
        );
    }

    #[test]
    fn inner_text_keeps_inline_spacing() {
        let html = r#"<h1 class="chapter-title">chapter <em>one</em>: the start</h1>"#;
        assert_eq!(
            text_of(html, ".chapter-title").as_deref(),
            Some("chapter one: the start")
        );
    }

    #[tokio::test]
    async fn static_renderer_without_document_finds_nothing() -> anyhow::Result<()> {
        let transport = Transport::new(Default::default(), Duration::from_secs(1))?;
        let mut renderer = StaticRenderer::new(transport);
        assert_eq!(renderer.text_by_class("chapter-title").await?, None);
        renderer.close().await;
        Ok(())
    }
}
