mod site_stub;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use novelfetch::assemble::Assembler;
use novelfetch::collection::Collection;
use novelfetch::download::RunContext;
use novelfetch::error::Result;
use novelfetch::render::Renderer;
use novelfetch::site::SiteProfile;
use novelfetch::store::OutputLayout;
use novelfetch::template::Templates;
use novelfetch::transport::{RetryPolicy, Transport};
use site_stub::{NovelServer, anchor_page, listing_page};
use url::Url;

/// Serves every chapter except those whose path ends in `missing_body`,
/// and counts how often the session is closed.
struct RecordingRenderer {
    missing_body: Option<&'static str>,
    current: Option<Url>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn navigate(&mut self, url: &Url) -> Result<()> {
        self.current = Some(url.clone());
        Ok(())
    }

    async fn text_by_class(&mut self, _class_name: &str) -> Result<Option<String>> {
        Ok(self.current.as_ref().map(|url| format!("chapter {}", url.path())))
    }

    async fn text_by_id(&mut self, _id: &str) -> Result<Option<String>> {
        let missing = match (self.current.as_ref(), self.missing_body) {
            (Some(url), Some(suffix)) => url.path().ends_with(suffix),
            _ => false,
        };
        Ok((!missing).then(|| "Body text.".to_owned()))
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

fn demo_site() -> NovelServer {
    NovelServer::spawn(HashMap::from([
        ("/demo/".to_owned(), anchor_page("demo", 1)),
        ("/demo/?page=1".to_owned(), listing_page("demo", &[1, 2, 3])),
    ]))
}

fn run_context(
    server: &NovelServer,
    out_dir: &std::path::Path,
    renderer: RecordingRenderer,
) -> anyhow::Result<RunContext> {
    let collection = Collection::from_home_url(&format!("{}/demo/", server.base_url))?;
    let layout = OutputLayout::new(out_dir, collection.slug());
    layout.create_dirs()?;
    let assembler = Assembler::new(layout, Templates::builtin()?, collection.title());
    let transport = Transport::new(
        RetryPolicy {
            max_retries: 0,
            base_delay: Duration::from_millis(1),
        },
        Duration::from_secs(5),
    )?;
    Ok(RunContext::new(
        collection,
        SiteProfile::default(),
        transport,
        Box::new(renderer),
        assembler,
    ))
}

#[tokio::test]
async fn renderer_is_closed_once_after_failed_chapter() -> anyhow::Result<()> {
    let server = demo_site();
    let temp = tempfile::TempDir::new()?;
    let closed = Arc::new(AtomicUsize::new(0));
    let renderer = RecordingRenderer {
        missing_body: Some("-2.html"),
        current: None,
        closed: Arc::clone(&closed),
    };

    let err = run_context(&server, temp.path(), renderer)?
        .execute()
        .await
        .expect_err("chapter 2 has no body");

    assert!(format!("{err:#}").contains("chapter-content"), "err={err:#}");
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert!(!temp.path().join("demo").join("demo.html").exists());
    Ok(())
}

#[tokio::test]
async fn renderer_is_closed_once_after_successful_run() -> anyhow::Result<()> {
    let server = demo_site();
    let temp = tempfile::TempDir::new()?;
    let closed = Arc::new(AtomicUsize::new(0));
    let renderer = RecordingRenderer {
        missing_body: None,
        current: None,
        closed: Arc::clone(&closed),
    };

    let path = run_context(&server, temp.path(), renderer)?
        .execute()
        .await?;

    assert_eq!(path, temp.path().join("demo").join("demo.html"));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn renderer_is_closed_when_discovery_fails() -> anyhow::Result<()> {
    let server = NovelServer::spawn(HashMap::new());
    let temp = tempfile::TempDir::new()?;
    let closed = Arc::new(AtomicUsize::new(0));
    let renderer = RecordingRenderer {
        missing_body: None,
        current: None,
        closed: Arc::clone(&closed),
    };

    run_context(&server, temp.path(), renderer)?
        .execute()
        .await
        .expect_err("anchor page is missing");

    assert_eq!(closed.load(Ordering::SeqCst), 1);
    Ok(())
}
