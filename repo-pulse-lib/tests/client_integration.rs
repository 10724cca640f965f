//! Integration tests for the HTTP client and the page walk using wiremock

use core::time::Duration;
use repo_pulse_lib::activity::{ActivityError, Client, Commit, Endpoint, Flow, FormatCause, PageFetcher, RateLimitGuard};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(10);

fn commits_endpoint() -> Endpoint {
    Endpoint::new("/repos/o/r/commits").param("sha", "master").param("per_page", "2")
}

fn client_for(server: &MockServer) -> Client {
    Client::new(None, server.uri(), TIMEOUT).expect("client should build")
}

#[tokio::test]
async fn test_follows_link_header_until_last_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/commits"))
        .and(query_param("sha", "master"))
        .and(query_param("per_page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"sha":"1","author":{"login":"alice"}},{"sha":"2","author":{"login":"bob"}}]"#)
                .insert_header(
                    "link",
                    format!(
                        r#"<{uri}/repos/o/r/commits?page=2>; rel="next", <{uri}/repos/o/r/commits?page=2>; rel="last""#,
                        uri = server.uri()
                    )
                    .as_str(),
                ),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/commits"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"sha":"3","author":{"login":"alice"}}]"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut logins = Vec::new();
    let requests = PageFetcher::new(&client)
        .for_each_page(&commits_endpoint(), |commits: Vec<Commit>| {
            logins.extend(commits.iter().map(|c| c.author_login().unwrap().to_string()));
            Ok(Flow::Continue)
        })
        .await
        .unwrap();

    assert_eq!(requests, 2);
    assert_eq!(logins, vec!["alice", "bob", "alice"]);
}

#[tokio::test]
async fn test_non_success_status_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/commits"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = PageFetcher::new(&client)
        .for_each_page(&commits_endpoint(), |_commits: Vec<Commit>| Ok(Flow::Continue))
        .await;

    match result {
        Err(e @ ActivityError::ServerError { .. }) => assert_eq!(e.status(), Some(503)),
        other => panic!("expected ServerError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unusable_body_with_exhausted_quota() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"API rate limit exceeded"}"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rate":{"limit":60,"remaining":0,"reset":1704067200}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = PageFetcher::new(&client).fetch::<Commit>(&commits_endpoint(), None).await;

    match result {
        Err(ActivityError::ResponseFormat { cause, .. }) => assert_eq!(cause, FormatCause::QuotaExhausted),
        other => panic!("expected ResponseFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unusable_body_with_quota_left() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rate":{"remaining":4999}}"#))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = PageFetcher::new(&client).fetch::<Commit>(&commits_endpoint(), None).await;

    match result {
        Err(ActivityError::ResponseFormat {
            resource,
            cause: FormatCause::Invalid(_),
        }) => assert_eq!(resource, "/repos/o/r/commits"),
        other => panic!("expected ResponseFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn test_token_is_sent_as_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .and(header("authorization", "token secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rate":{"remaining":17}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(Some("secret-token"), server.uri(), TIMEOUT).unwrap();
    let remaining = RateLimitGuard::new(&client).remaining().await.unwrap();

    assert_eq!(remaining, 17);
}

#[tokio::test]
async fn test_exhausted_quota_detected_upfront() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rate":{"remaining":0,"reset":1704067200}}"#))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = RateLimitGuard::new(&client).ensure_available().await;

    assert!(matches!(result, Err(ActivityError::QuotaExhausted { reset_at: Some(_) })));
}

#[tokio::test]
async fn test_request_deadline_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = Client::new(None, server.uri(), Duration::from_millis(200)).unwrap();
    let result = PageFetcher::new(&client).fetch::<Commit>(&commits_endpoint(), None).await;

    assert!(matches!(result, Err(ActivityError::Transport { .. })));
}
