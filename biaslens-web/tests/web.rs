use biaslens_web::brave::types::NewsSearchRequest;
use biaslens_web::{
    BraveNewsClient, FileCapturer, HttpCapturer, PageCapturer, SimilarArticleSource,
};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn news_body() -> serde_json::Value {
    json!({
        "type": "news",
        "results": [
            { "title": "Same story", "url": "https://www.cnn.com/2025/story/?utm=1",
              "meta_url": { "hostname": "www.cnn.com" } },
            { "title": "BBC take", "url": "https://www.bbc.com/news/articles/x",
              "description": "Storm coverage", "age": "2 hours ago",
              "meta_url": { "hostname": "www.bbc.com" } },
            { "title": "BBC again", "url": "https://www.bbc.com/news/articles/x#comments" },
            { "title": "AP take", "url": "https://apnews.com/article/y", "page_age": "2025-01-01T00:00:00" }
        ]
    })
}

#[tokio::test]
async fn brave_sends_token_header_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/res/v1/news/search"))
        .and(header("x-subscription-token", "brv-test"))
        .and(query_param("q", "storm coast"))
        .and(query_param("count", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(news_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = BraveNewsClient::with_endpoint("brv-test".into(), &server.uri()).unwrap();
    let resp = client
        .search_news(&NewsSearchRequest::new("storm coast", 3))
        .await
        .unwrap();
    assert_eq!(resp.results.len(), 4);
}

#[tokio::test]
async fn find_excludes_own_article_and_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/res/v1/news/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(news_body()))
        .mount(&server)
        .await;

    let client = BraveNewsClient::with_endpoint("brv-test".into(), &server.uri()).unwrap();
    let found = client
        .find("storm", Some("https://www.cnn.com/2025/story"), 5)
        .await
        .unwrap();
    let titles: Vec<&str> = found.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["BBC take", "AP take"]);
    assert_eq!(found[0].source, "www.bbc.com");
    assert_eq!(found[1].source, "apnews.com");
    assert_eq!(found[1].age.as_deref(), Some("2025-01-01T00:00:00"));
}

#[tokio::test]
async fn brave_errors_are_remote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "error": { "message": "invalid token" } })),
        )
        .mount(&server)
        .await;

    let client = BraveNewsClient::with_endpoint("bad".into(), &server.uri()).unwrap();
    let err = client.find("storm", None, 3).await.unwrap_err();
    assert_eq!(err.kind(), "remote");
}

#[tokio::test]
async fn blank_query_skips_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(news_body()))
        .expect(0)
        .mount(&server)
        .await;
    let client = BraveNewsClient::with_endpoint("brv-test".into(), &server.uri()).unwrap();
    assert!(client.find("   ", None, 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn http_capturer_fetches_absolute_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/story"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>hi</p></html>"))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/news/story", server.uri())).unwrap();
    let capture = HttpCapturer::new(Duration::from_secs(5))
        .unwrap()
        .capture(&url)
        .await
        .unwrap();
    assert_eq!(capture.url, url);
    assert!(capture.html.contains("<p>hi</p>"));
}

#[tokio::test]
async fn file_capturer_reads_saved_page() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "<html><body><p>saved</p></body></html>").unwrap();
    let url = Url::parse("https://www.cnn.com/story").unwrap();

    let capture = FileCapturer::new(file.path()).capture(&url).await.unwrap();
    assert_eq!(capture.url.as_str(), "https://www.cnn.com/story");
    assert!(capture.html.contains("saved"));

    let err = FileCapturer::new("/nonexistent/page.html")
        .capture(&url)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
}
