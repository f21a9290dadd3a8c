use sumi_crawl::config::{Config, CrawlerConfig};
use sumi_crawl::crawler::{crawl, CrawlStats, Crawler, Fetcher};
use sumi_crawl::LinkPolicy;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a page at `route` answering with `body`, expected to be hit `hits` times
async fn mount_page(server: &MockServer, route: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(hits)
        .mount(server)
        .await;
}

/// Runs a crawl and returns what it printed
async fn run_crawl(seed: &str, max_depth: u32) -> (String, CrawlStats) {
    let fetcher = Fetcher::from_config(&CrawlerConfig::default()).expect("Failed to build fetcher");
    let mut crawler = Crawler::new(fetcher, LinkPolicy::new(max_depth), Vec::new());
    let stats = crawler.run(seed).await;
    let output = String::from_utf8(crawler.into_output()).expect("Output is not UTF-8");
    (output, stats)
}

#[tokio::test]
async fn test_depth_limit_prints_but_never_fetches_last_level() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(r#"<html><body><a href="{}/b">Page B</a></body></html>"#, base_url),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        format!(r#"<html><body><a href="{}/c">Page C</a></body></html>"#, base_url),
        1,
    )
    .await;
    // C shows up in B's printed list but the crawl never descends into it
    mount_page(
        &mock_server,
        "/c",
        format!(r#"<html><body><a href="{}/d">Page D</a></body></html>"#, base_url),
        0,
    )
    .await;
    mount_page(&mock_server, "/d", String::new(), 0).await;

    let (output, stats) = run_crawl(&format!("{}/", base_url), 2).await;

    assert_eq!(
        output,
        format!("[Page B (0) - {base}/b\n]\n[\tPage C (1) - {base}/c\n]\n", base = base_url)
    );
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.links_found, 2);
    assert_eq!(stats.fetch_failures, 0);
}

#[tokio::test]
async fn test_sibling_list_reprinted_for_each_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{base}/one">One</a><a href="{base}/two">Two</a>"#,
            base = base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/one", String::new(), 0).await;
    mount_page(&mock_server, "/two", String::new(), 0).await;

    let (output, _) = run_crawl(&format!("{}/", base_url), 1).await;

    let list = format!("[One (0) - {base}/one\n Two (0) - {base}/two\n]\n", base = base_url);
    assert_eq!(output, format!("{}{}", list, list));
}

#[tokio::test]
async fn test_children_printed_between_parent_lists() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{base}/one">One</a><a href="{base}/two">Two</a>"#,
            base = base_url
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/one",
        r#"<a href="/leaf">Leaf</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/two", "<p>No links here</p>".to_string(), 1).await;

    let (output, stats) = run_crawl(&format!("{}/", base_url), 2).await;

    let list = format!("[One (0) - {base}/one\n Two (0) - {base}/two\n]\n", base = base_url);
    assert_eq!(output, format!("{list}[\tLeaf (1) - /leaf\n]\n{list}"));
    assert_eq!(stats.pages_fetched, 3);
}

#[tokio::test]
async fn test_duplicate_links_are_fetched_each_time() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{base}/same">First</a><a href="{base}/same">Second</a>"#,
            base = base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/same", String::new(), 2).await;

    let (_, stats) = run_crawl(&format!("{}/", base_url), 2).await;
    assert_eq!(stats.pages_fetched, 3);
}

#[tokio::test]
async fn test_self_link_bounded_by_depth() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/loop", base_url);

    mount_page(
        &mock_server,
        "/loop",
        format!(r#"<a href="{}">Again</a>"#, seed),
        3,
    )
    .await;

    let (output, stats) = run_crawl(&seed, 3).await;

    assert_eq!(
        output,
        format!(
            "[Again (0) - {seed}\n]\n[\tAgain (1) - {seed}\n]\n[\t\tAgain (2) - {seed}\n]\n",
            seed = seed
        )
    );
    assert_eq!(stats.pages_fetched, 3);
}

#[tokio::test]
async fn test_failed_branch_does_not_stop_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{base}/missing">Missing</a><a href="{base}/ok">Ok</a>"#,
            base = base_url
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "<p>fine</p>".to_string(), 1).await;

    let (output, stats) = run_crawl(&format!("{}/", base_url), 2).await;

    let list = format!(
        "[Missing (0) - {base}/missing\n Ok (0) - {base}/ok\n]\n",
        base = base_url
    );
    assert_eq!(output, format!("{}{}", list, list));
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_relative_links_are_not_resolved() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/next">Next</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/next", String::new(), 0).await;

    let (output, stats) = run_crawl(&format!("{}/", base_url), 2).await;

    assert_eq!(output, "[Next (0) - /next\n]\n");
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_unreachable_seed_produces_no_output() {
    // Bind and release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local address").port();
    drop(listener);
    let seed = format!("http://127.0.0.1:{}/", port);

    let (output, stats) = run_crawl(&seed, 2).await;

    assert!(output.is_empty());
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.pages_fetched, 0);
}

#[tokio::test]
async fn test_zero_max_depth_fetches_only_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(r#"<a href="{}/b">B</a>"#, base_url),
        1,
    )
    .await;

    let (output, stats) = run_crawl(&format!("{}/", base_url), 0).await;

    assert!(output.is_empty());
    assert_eq!(stats.links_found, 0);
}

#[tokio::test]
async fn test_crawl_entry_point_uses_config() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(r#"<a href="{}/b">B</a>"#, base_url),
        1,
    )
    .await;
    mount_page(&mock_server, "/b", String::new(), 0).await;

    let config = Config::default().with_max_depth(Some(1));
    let mut out = Vec::new();
    let stats = crawl(&config, &format!("{}/", base_url), &mut out)
        .await
        .expect("Crawl failed");

    assert_eq!(String::from_utf8(out).unwrap(), format!("[B (0) - {}/b\n]\n", base_url));
    assert_eq!(stats.pages_fetched, 1);
}
