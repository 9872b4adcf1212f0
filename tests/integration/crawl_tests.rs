//! Integration tests for the crawler
//!
//! These tests drive the full crawl loop against a scripted in-memory
//! rendering session, so no browser is needed. Each test site is a map from
//! URL to a canned response; unknown URLs answer 404.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sumi_scribe::config::Config;
use sumi_scribe::crawler::{crawl, Coordinator};
use sumi_scribe::render::{PageHandle, RenderError, RenderResult, RenderSession};
use tempfile::TempDir;

const SEED: &str = "https://example.com/";

/// How a scripted URL responds to navigation
#[derive(Clone)]
enum Response {
    Page {
        status: u16,
        title: String,
        html: String,
    },
    NoResponse,
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Open,
    Navigate(String),
    Close(String),
}

struct ScriptedSession {
    site: HashMap<String, Response>,
    nav_delay: Duration,
    open: AtomicUsize,
    peak: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    events: Mutex<Vec<Event>>,
}

impl ScriptedSession {
    fn new(site: HashMap<String, Response>) -> Arc<Self> {
        Arc::new(Self {
            site,
            nav_delay: Duration::from_millis(30),
            open: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        })
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    /// URLs in the order they were navigated to
    fn navigations(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Navigate(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// Groups navigations into batches: a batch ends when no page is open
    fn batches(&self) -> Vec<Vec<String>> {
        let mut batches = Vec::new();
        let mut current = Vec::new();
        let mut open = 0usize;

        for event in self.events.lock().unwrap().iter() {
            match event {
                Event::Open => open += 1,
                Event::Navigate(url) => current.push(url.clone()),
                Event::Close(_) => {
                    open -= 1;
                    if open == 0 {
                        batches.push(std::mem::take(&mut current));
                    }
                }
            }
        }

        batches
    }
}

struct ScriptedPage {
    session: Arc<ScriptedSession>,
    url: String,
    response: Option<Response>,
}

/// Opens pages on a shared `ScriptedSession`
struct SessionHandle(Arc<ScriptedSession>);

#[async_trait]
impl RenderSession for SessionHandle {
    async fn open_page(&self) -> RenderResult<Box<dyn PageHandle>> {
        let session = &self.0;
        let now = session.open.fetch_add(1, Ordering::SeqCst) + 1;
        session.peak.fetch_max(now, Ordering::SeqCst);
        session.opened.fetch_add(1, Ordering::SeqCst);
        session.record(Event::Open);

        Ok(Box::new(ScriptedPage {
            session: Arc::clone(session),
            url: String::new(),
            response: None,
        }))
    }

    async fn shutdown(&self) {}
}

#[async_trait]
impl PageHandle for ScriptedPage {
    async fn navigate(&mut self, url: &str) -> RenderResult<Option<u16>> {
        self.url = url.to_string();
        self.session.record(Event::Navigate(url.to_string()));

        let response = self.session.site.get(url).cloned().unwrap_or(Response::Page {
            status: 404,
            title: "Not Found".to_string(),
            html: "<html><body><h1>Not Found</h1></body></html>".to_string(),
        });

        tokio::time::sleep(self.session.nav_delay).await;

        let status = match &response {
            Response::Page { status, .. } => Some(*status),
            Response::NoResponse => None,
            Response::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                None
            }
        };

        self.response = Some(response);
        Ok(status)
    }

    async fn wait_until_settled(&mut self) -> RenderResult<()> {
        Ok(())
    }

    async fn title(&mut self) -> RenderResult<String> {
        match &self.response {
            Some(Response::Page { title, .. }) => Ok(title.clone()),
            _ => Err(RenderError::SessionClosed),
        }
    }

    async fn content(&mut self) -> RenderResult<String> {
        match &self.response {
            Some(Response::Page { html, .. }) => Ok(html.clone()),
            _ => Err(RenderError::SessionClosed),
        }
    }

    async fn close(self: Box<Self>) -> RenderResult<()> {
        self.session.open.fetch_sub(1, Ordering::SeqCst);
        self.session.closed.fetch_add(1, Ordering::SeqCst);
        self.session.record(Event::Close(self.url.clone()));
        Ok(())
    }
}

/// A 200 page titled `title` whose main content links to `links`
fn page(title: &str, links: &[&str]) -> Response {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();

    Response::Page {
        status: 200,
        title: title.to_string(),
        html: format!(
            "<html><head><title>{}</title></head><body><nav><a href=\"/\">Home</a></nav>\
             <main><h1>{}</h1><p>Content of {}</p>{}</main></body></html>",
            title, title, title, anchors
        ),
    }
}

fn url(path: &str) -> String {
    format!("https://example.com{}", path)
}

/// Creates a test configuration writing under `root`
fn create_test_config(root: &Path, max_pages: u32, max_concurrent: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.max_concurrent = max_concurrent;
    config.crawler.delay = 0.0;
    config.crawler.settle_grace_ms = 0;
    config.crawler.navigation_timeout_ms = 2_000;
    config.output.root = root.to_path_buf();
    config
}

async fn run(session: &Arc<ScriptedSession>, config: Config) -> Coordinator {
    let mut coordinator = Coordinator::new(SEED, config).unwrap();
    coordinator
        .run(Arc::new(SessionHandle(Arc::clone(session))))
        .await
        .unwrap();
    coordinator
}

fn markdown_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".md"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_seed() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::new(HashMap::from([
        (url("/"), page("Home", &["/a", "/b"])),
        (url("/a"), page("A", &[])),
        (url("/b"), page("B", &[])),
    ]));

    let coordinator = run(&session, create_test_config(dir.path(), 1, 3)).await;

    assert_eq!(coordinator.stats().pages_crawled(), 1);
    assert_eq!(coordinator.stats().pages_saved(), 1);
    assert_eq!(session.navigations(), vec![url("/")]);
    assert_eq!(markdown_files(coordinator.output_dir()), vec!["example.com_.md"]);

    // Discovered links stay queued
    assert_eq!(coordinator.frontier().len(), 2);
    assert_eq!(coordinator.stats().urls_discovered(), 2);
}

#[tokio::test]
async fn test_error_status_not_counted_but_visited() {
    let dir = TempDir::new().unwrap();
    let mut missing = page("Gone", &["/secret"]);
    if let Response::Page { status, .. } = &mut missing {
        *status = 404;
    }

    let session = ScriptedSession::new(HashMap::from([
        (url("/"), page("Home", &["/missing", "/ok"])),
        (url("/missing"), missing),
        (url("/ok"), page("Ok", &[])),
        (url("/secret"), page("Secret", &[])),
    ]));

    let coordinator = run(&session, create_test_config(dir.path(), 10, 3)).await;

    assert_eq!(coordinator.stats().pages_crawled(), 2);
    assert_eq!(coordinator.stats().pages_saved(), 2);
    assert!(coordinator.frontier().is_visited(&url("/missing")));

    // Links of an error page are never followed
    assert!(!session.navigations().contains(&url("/secret")));
    assert!(!markdown_files(coordinator.output_dir())
        .iter()
        .any(|f| f.contains("missing")));
}

#[tokio::test]
async fn test_fragment_variants_enqueued_once() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::new(HashMap::from([
        (url("/"), page("Home", &["/guide#install", "/guide#usage"])),
        (url("/guide"), page("Guide", &[])),
    ]));

    let coordinator = run(&session, create_test_config(dir.path(), 10, 3)).await;

    let guide_visits = session
        .navigations()
        .iter()
        .filter(|u| **u == url("/guide"))
        .count();
    assert_eq!(guide_visits, 1);
    assert_eq!(coordinator.stats().urls_discovered(), 1);
}

#[tokio::test]
async fn test_blocked_extension_never_queued() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::new(HashMap::from([
        (
            url("/"),
            page("Home", &["/manual.pdf", "/logo.PNG", "https://other.com/", "/page"]),
        ),
        (url("/page"), page("Page", &[])),
    ]));

    let coordinator = run(&session, create_test_config(dir.path(), 10, 3)).await;

    assert_eq!(session.navigations(), vec![url("/"), url("/page")]);
    assert_eq!(coordinator.frontier().visited(), &[url("/"), url("/page")]);
    assert_eq!(coordinator.stats().urls_discovered(), 1);
}

#[tokio::test]
async fn test_batches_sized_by_concurrency() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::new(HashMap::from([
        (url("/"), page("Home", &["/1", "/2", "/3", "/4", "/5"])),
        (url("/1"), page("1", &[])),
        (url("/2"), page("2", &[])),
        (url("/3"), page("3", &[])),
        (url("/4"), page("4", &[])),
        (url("/5"), page("5", &[])),
    ]));

    let coordinator = run(&session, create_test_config(dir.path(), 10, 3)).await;

    let sizes: Vec<usize> = session.batches().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![1, 3, 2]);

    let batches = session.batches();
    let second: HashSet<_> = batches[1].iter().cloned().collect();
    assert_eq!(second, HashSet::from([url("/1"), url("/2"), url("/3")]));

    assert_eq!(session.peak.load(Ordering::SeqCst), 3);
    assert_eq!(coordinator.stats().pages_crawled(), 6);
}

#[tokio::test]
async fn test_budget_limits_last_batch() {
    let dir = TempDir::new().unwrap();
    let links: Vec<String> = (1..=10).map(|i| format!("/p{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();

    let mut site = HashMap::from([(url("/"), page("Home", &link_refs))]);
    for link in &links {
        site.insert(url(link), page(link, &[]));
    }
    let session = ScriptedSession::new(site);

    let coordinator = run(&session, create_test_config(dir.path(), 5, 3)).await;

    let sizes: Vec<usize> = session.batches().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![1, 3, 1]);
    assert_eq!(coordinator.stats().pages_crawled(), 5);
    assert_eq!(coordinator.frontier().len(), 6);
}

#[tokio::test]
async fn test_no_url_dispatched_twice() {
    let dir = TempDir::new().unwrap();
    let paths = ["/", "/a", "/b", "/c", "/d"];

    // Every page links to every page
    let site: HashMap<_, _> = paths
        .iter()
        .map(|p| (url(p), page(p, &paths)))
        .collect();
    let session = ScriptedSession::new(site);

    let coordinator = run(&session, create_test_config(dir.path(), 50, 2)).await;

    let navigations = session.navigations();
    let unique: HashSet<_> = navigations.iter().collect();
    assert_eq!(unique.len(), navigations.len());
    assert_eq!(navigations.len(), paths.len());
    assert_eq!(coordinator.frontier().visited().len(), paths.len());
    assert!(coordinator.frontier().is_empty());
}

#[tokio::test]
async fn test_concurrency_never_exceeds_limit() {
    let dir = TempDir::new().unwrap();
    let links: Vec<String> = (1..=12).map(|i| format!("/n{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();

    let mut site = HashMap::from([(url("/"), page("Home", &link_refs))]);
    for link in &links {
        site.insert(url(link), page(link, &link_refs));
    }
    let session = ScriptedSession::new(site);

    run(&session, create_test_config(dir.path(), 13, 4)).await;

    assert!(session.peak.load(Ordering::SeqCst) <= 4);
    assert_eq!(
        session.opened.load(Ordering::SeqCst),
        session.closed.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn test_failures_do_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::new(HashMap::from([
        (url("/"), page("Home", &["/slow", "/silent", "/fine"])),
        (url("/slow"), Response::Hang),
        (url("/silent"), Response::NoResponse),
        (url("/fine"), page("Fine", &[])),
    ]));

    let mut config = create_test_config(dir.path(), 10, 3);
    config.crawler.navigation_timeout_ms = 200;

    let coordinator = run(&session, config).await;

    assert_eq!(coordinator.stats().pages_crawled(), 2);
    assert_eq!(coordinator.frontier().visited().len(), 4);
    assert_eq!(session.open.load(Ordering::SeqCst), 0);
    assert_eq!(
        session.opened.load(Ordering::SeqCst),
        session.closed.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn test_artifact_contents() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::new(HashMap::from([(url("/"), page("Welcome", &[]))]));

    let coordinator = run(&session, create_test_config(dir.path(), 1, 1)).await;

    let text = std::fs::read_to_string(coordinator.output_dir().join("example.com_.md")).unwrap();
    assert!(text.starts_with("# Welcome\n\n**URL:** https://example.com/  \n**Crawled:** "));
    assert!(text.contains("\n\n---\n\n"));
    assert!(text.contains("Content of Welcome"));
    assert!(!text.contains("Home"));
}

#[tokio::test]
async fn test_summary_file() {
    let dir = TempDir::new().unwrap();
    let mut missing = page("Gone", &[]);
    if let Response::Page { status, .. } = &mut missing {
        *status = 500;
    }
    let session = ScriptedSession::new(HashMap::from([
        (url("/"), page("Home", &["/a", "/broken"])),
        (url("/a"), page("A", &[])),
        (url("/broken"), missing),
    ]));

    let coordinator = run(&session, create_test_config(dir.path(), 10, 3)).await;

    let path = dir.path().join("crawled_example_com").join("crawl_summary.json");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"domain\": \"example.com\""));

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["domain"], "example.com");
    assert_eq!(json["start_url"], "https://example.com/");
    assert_eq!(json["crawl_stats"]["pages_crawled"], 2);
    assert_eq!(json["crawl_stats"]["pages_saved"], 2);
    assert_eq!(json["crawl_stats"]["urls_discovered"], 2);
    assert!(json["crawl_stats"]["start_time"].as_f64().unwrap() > 0.0);
    assert!(json["crawl_duration"].as_f64().unwrap() >= 0.0);

    let visited: Vec<String> = json["total_urls_visited"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(visited.len(), session.navigations().len());
    assert_eq!(visited, coordinator.frontier().visited());
    assert!(visited.contains(&url("/broken")));
}

#[tokio::test]
async fn test_crawl_entry_point() {
    let dir = TempDir::new().unwrap();
    let session = ScriptedSession::new(HashMap::from([
        (url("/"), page("Home", &["/a"])),
        (url("/a"), page("A", &[])),
    ]));

    let summary = crawl(
        "example.com",
        create_test_config(dir.path(), 10, 2),
        Arc::new(SessionHandle(Arc::clone(&session))),
    )
    .await
    .unwrap();

    assert_eq!(summary.domain, "example.com");
    assert_eq!(summary.crawl_stats.pages_crawled, 2);
    assert_eq!(summary.total_urls_visited, vec![url("/"), url("/a")]);
}
