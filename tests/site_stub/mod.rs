#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

/// A novel site served from memory. Routes are keyed by request path plus
/// query (`/demo/?page=1`); anything else is a 404.
pub struct NovelServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl NovelServer {
    pub fn spawn(routes: HashMap<String, String>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base_url = format!("http://{}", server.server_addr());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let seen = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                seen.lock().expect("lock requests").push(url.clone());

                let response = match routes.get(&url) {
                    Some(body) => {
                        let header = tiny_http::Header::from_bytes(
                            &b"Content-Type"[..],
                            &b"text/html; charset=utf-8"[..],
                        )
                        .expect("build header");
                        tiny_http::Response::from_string(body.clone())
                            .with_status_code(200)
                            .with_header(header)
                    }
                    None => tiny_http::Response::from_string("not found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock requests").clone()
    }
}

impl Drop for NovelServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Home page with a pagination control whose last entry points at `pages`.
pub fn anchor_page(slug: &str, pages: u32) -> String {
    let mut items = String::new();
    for page in 1..=pages.min(3) {
        let _ = writeln!(
            items,
            r#"      <li><a href="/{slug}/?page={page}" data-page="{page}">{page}</a></li>"#
        );
    }
    format!(
        r#"<!doctype html>
<html>
  <head><title>{slug}</title></head>
  <body>
    <ul class="pagination">
{items}      <li class="last"><a href="/{slug}/?page={pages}" data-page="{pages}">Final »</a></li>
    </ul>
  </body>
</html>
"#
    )
}

fn chapter_link(slug: &str, n: u32) -> String {
    format!(
        r#"<li><a href="/{slug}-{n}.html" title="Chapter {n}"><span class="chapter-text">Chapter {n}</span></a></li>"#
    )
}

/// Listing page: six trending decoys followed by the real chapter links.
pub fn listing_page(slug: &str, chapters: &[u32]) -> String {
    let decoys = (9001..9007)
        .map(|n| chapter_link(slug, n))
        .collect::<Vec<_>>()
        .join("\n");
    let real = chapters
        .iter()
        .map(|n| chapter_link(slug, *n))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<!doctype html>
<html>
  <body>
    <ul class="trending">
{decoys}
    </ul>
    <ul class="list-chapter">
{real}
    </ul>
  </body>
</html>
"#
    )
}

pub fn chapter_page(n: u32) -> String {
    format!(
        r#"<!doctype html>
<html>
  <body>
    <h1 class="chapter-title">chapter {n}: the TITLE</h1>
    <div id="chapter-content">
      <p>Para one of {n}.</p>

      <p>Para two of {n}.</p>
    </div>
  </body>
</html>
"#
    )
}

pub fn chapter_page_without_body(n: u32) -> String {
    format!(
        r#"<!doctype html>
<html>
  <body>
    <h1 class="chapter-title">chapter {n}</h1>
    <div class="ads">nothing here</div>
  </body>
</html>
"#
    )
}
