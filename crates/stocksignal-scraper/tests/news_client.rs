//! Integration tests for `NewsClient` against a local `wiremock` server.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stocksignal_scraper::{NewsClient, NewsSource, ScraperError};

/// 3-second listing timeout, 1-second article timeout, no retries.
fn test_client() -> NewsClient {
    NewsClient::new(3, 1, "stocksignal-test/0.1", 0, 0).expect("failed to build test NewsClient")
}

fn source(server: &MockServer) -> NewsSource {
    NewsSource {
        listing_url: format!("{}/tai-chinh-chung-khoan.chn", server.uri()),
        base_url: server.uri(),
        listing_selector: "h3.title-news a".to_string(),
        body_selector: "div.contentdetail > p".to_string(),
    }
}

fn listing_html(links: &[(&str, &str)]) -> String {
    let items: String = links
        .iter()
        .map(|(href, title)| format!(r#"<h3 class="title-news"><a href="{href}">{title}</a></h3>"#))
        .collect();
    format!("<html><body>{items}</body></html>")
}

fn article_html(paragraph: &str) -> String {
    format!(r#"<html><body><div class="contentdetail"><p>{paragraph}</p></div></body></html>"#)
}

async fn mount_html(server: &MockServer, at: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_articles_returns_articles_in_listing_order() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/tai-chinh-chung-khoan.chn",
        listing_html(&[("/a.chn", "Cổ phiếu FPT"), ("/b.chn", "VIC giảm")]),
    )
    .await;
    mount_html(&server, "/a.chn", article_html("Chuyên gia nên mua.")).await;
    mount_html(&server, "/b.chn", article_html("Áp lực bán tăng, áp lực bán lớn.")).await;

    let batch = test_client()
        .fetch_articles(&source(&server), 20, 1)
        .await
        .expect("fetch should succeed");

    assert_eq!(batch.degraded, 0);
    assert_eq!(batch.articles.len(), 2);
    assert_eq!(batch.articles[0].url, format!("{}/a.chn", server.uri()));
    assert_eq!(batch.articles[0].title, "Cổ phiếu FPT");
    assert_eq!(batch.articles[0].body, "Chuyên gia nên mua.");
    assert_eq!(batch.articles[1].title, "VIC giảm");
}

#[tokio::test]
async fn failed_article_keeps_title_with_empty_body() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/tai-chinh-chung-khoan.chn",
        listing_html(&[
            ("/ok.chn", "HPG tăng"),
            ("/broken.chn", "SSI báo lãi"),
            ("/ok2.chn", "MBB"),
        ]),
    )
    .await;
    mount_html(&server, "/ok.chn", article_html("tích cực")).await;
    mount_html(&server, "/ok2.chn", article_html("cảnh báo")).await;
    Mock::given(method("GET"))
        .and(path("/broken.chn"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let batch = test_client()
        .fetch_articles(&source(&server), 20, 1)
        .await
        .expect("per-article failure must not fail the batch");

    assert_eq!(batch.articles.len(), 3);
    assert_eq!(batch.degraded, 1);
    assert_eq!(batch.articles[1].title, "SSI báo lãi");
    assert!(batch.articles[1].body.is_empty());
    assert_eq!(batch.articles[2].body, "cảnh báo");
}

#[tokio::test]
async fn slow_article_times_out_and_degrades() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/tai-chinh-chung-khoan.chn",
        listing_html(&[("/slow.chn", "VNM chậm")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow.chn"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_html("nên mua"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let batch = test_client()
        .fetch_articles(&source(&server), 20, 1)
        .await
        .expect("timeout is an article-level failure");

    assert_eq!(batch.degraded, 1);
    assert_eq!(batch.articles[0].title, "VNM chậm");
    assert!(batch.articles[0].body.is_empty());
}

#[tokio::test]
async fn listing_failure_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tai-chinh-chung-khoan.chn"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client().fetch_articles(&source(&server), 20, 1).await;

    assert!(
        matches!(result, Err(ScraperError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn listing_rate_limit_is_reported_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tai-chinh-chung-khoan.chn"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let result = test_client().fetch_listing(&source(&server), 20).await;

    assert!(
        matches!(
            result,
            Err(ScraperError::RateLimited {
                retry_after_secs: 30,
                ..
            })
        ),
        "expected RateLimited(30), got: {result:?}"
    );
}

#[tokio::test]
async fn limit_truncates_listing() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/tai-chinh-chung-khoan.chn",
        listing_html(&[("/1.chn", "A"), ("/2.chn", "B"), ("/3.chn", "C")]),
    )
    .await;

    let entries = test_client()
        .fetch_listing(&source(&server), 2)
        .await
        .expect("listing should parse");

    let urls: Vec<Option<String>> = entries.into_iter().map(|e| e.url).collect();
    assert_eq!(
        urls,
        vec![
            Some(format!("{}/1.chn", server.uri())),
            Some(format!("{}/2.chn", server.uri()))
        ]
    );
}

#[tokio::test]
async fn unlinked_anchor_counts_toward_limit_and_degrades() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/tai-chinh-chung-khoan.chn",
        r#"<html><body>
             <h3 class="title-news"><a>Cổ phiếu FPT</a></h3>
             <h3 class="title-news"><a href="/b.chn">VIC</a></h3>
           </body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/b.chn"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("áp lực bán")))
        .expect(0)
        .mount(&server)
        .await;

    let batch = test_client()
        .fetch_articles(&source(&server), 1, 1)
        .await
        .expect("fetch should succeed");

    assert_eq!(batch.degraded, 1);
    assert_eq!(batch.articles.len(), 1);
    assert_eq!(batch.articles[0].title, "Cổ phiếu FPT");
    assert!(batch.articles[0].body.is_empty());
    assert!(batch.articles[0].url.is_empty());
}

#[tokio::test]
async fn unlinked_anchor_keeps_its_slot_without_a_request() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/tai-chinh-chung-khoan.chn",
        r##"<html><body>
             <h3 class="title-news"><a href="/a.chn">HPG</a></h3>
             <h3 class="title-news"><a href="#">SSI</a></h3>
             <h3 class="title-news"><a href="/c.chn">MBB</a></h3>
           </body></html>"##
            .to_string(),
    )
    .await;
    mount_html(&server, "/a.chn", article_html("nên mua")).await;
    mount_html(&server, "/c.chn", article_html("cảnh báo")).await;

    let batch = test_client()
        .fetch_articles(&source(&server), 20, 2)
        .await
        .expect("fetch should succeed");

    let titles: Vec<&str> = batch.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["HPG", "SSI", "MBB"]);
    assert_eq!(batch.degraded, 1);
    assert!(batch.articles[1].body.is_empty());
    assert_eq!(batch.articles[2].body, "cảnh báo");
    // listing + two linked articles
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 3);
}

#[tokio::test]
async fn concurrent_fetch_preserves_listing_order() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/tai-chinh-chung-khoan.chn",
        listing_html(&[("/first.chn", "first"), ("/second.chn", "second")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/first.chn"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_html("slow body"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/second.chn", article_html("fast body")).await;

    let batch = test_client()
        .fetch_articles(&source(&server), 20, 4)
        .await
        .expect("fetch should succeed");

    assert_eq!(batch.articles[0].body, "slow body");
    assert_eq!(batch.articles[1].body, "fast body");
}

#[tokio::test]
async fn invalid_body_selector_fails_before_any_request() {
    let server = MockServer::start().await;
    let mut src = source(&server);
    src.body_selector = "div[".to_string();

    let result = test_client().fetch_articles(&src, 20, 1).await;

    assert!(matches!(result, Err(ScraperError::InvalidSelector { .. })));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
