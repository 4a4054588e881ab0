use biaslens_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::json;
use std::borrow::Cow;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn posts_json_and_decodes_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze-bias"))
        .and(body_json(json!({ "paragraphs": ["a", "b"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "index": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let reply: serde_json::Value = client
        .post_json("api/analyze-bias", None, &json!({ "paragraphs": ["a", "b"] }))
        .await
        .unwrap();
    assert_eq!(reply, json!([{ "index": 1 }]));
}

#[tokio::test]
async fn header_auth_and_query_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/res/v1/news/search"))
        .and(query_param("q", "budget vote"))
        .and(header("x-subscription-token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let opts = RequestOpts {
        auth: Some(Auth::Header {
            name: HeaderName::from_static("x-subscription-token"),
            value: HeaderValue::from_static("secret"),
        }),
        query: Some(vec![("q", Cow::Borrowed("budget vote"))]),
        ..Default::default()
    };
    let got: serde_json::Value = client.get_json("res/v1/news/search", opts).await.unwrap();
    assert_eq!(got["results"], json!([]));
}

#[tokio::test]
async fn server_errors_are_not_retried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze-bias"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "detail": "model overloaded" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_json::<_, serde_json::Value>("api/analyze-bias", None, &json!({}))
        .await
        .unwrap_err();
    match err {
        HttpError::Api { status, message } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "model overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn retries_when_budget_is_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap().with_retries(1);
    let body = client.get_text("flaky", RequestOpts::default()).await.unwrap();
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<serde_json::Value>("/", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode(_, snippet) if snippet == "not json"));
}
