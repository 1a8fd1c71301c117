use std::sync::Arc;
use std::time::{Duration, Instant};

use coursetrack_api::{CancelSource, CancelToken, Client, Error, RetryPolicy, StaticToken};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> Client {
    Client::new(&server.uri(), Arc::new(StaticToken("tok".to_string()))).unwrap()
}

fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        attempt_timeout: Duration::from_secs(5),
        max_retries,
        initial_delay: Duration::from_millis(1),
        multiplier: 1.0,
        max_delay: Duration::from_millis(10),
        total_budget: Duration::from_secs(60),
    }
}

#[tokio::test]
async fn success_returns_parsed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list.do"))
        .and(header("X-CSRF-TOKEN", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"cnt": 3, "list": []}"#))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let value = client
        .send("/list.do", &[], &fast_policy(3), &CancelToken::disconnected())
        .await
        .unwrap();
    assert_eq!(value["cnt"], 3);
}

#[tokio::test]
async fn always_500_exhausts_exactly_retries_plus_one_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list.do"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .send("/list.do", &[], &fast_policy(3), &CancelToken::disconnected())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {:?}", err);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn non_retriable_status_fails_on_first_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list.do"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .send("/list.do", &[], &fast_policy(3), &CancelToken::disconnected())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }), "got {:?}", err);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn malformed_json_is_an_api_error_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list.do"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .send("/list.do", &[], &fast_policy(3), &CancelToken::disconnected())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api(_)), "got {:?}", err);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn retry_after_header_stretches_the_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list.do"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "1")
                .set_body_string("slow down"),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let started = Instant::now();
    let err = client
        .send("/list.do", &[], &fast_policy(1), &CancelToken::disconnected())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {:?}", err);
    // One sleep between the two attempts, stretched from 1ms to 1s.
    assert!(started.elapsed() >= Duration::from_millis(900));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn budget_exceeded_instead_of_sleeping_past_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list.do"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        attempt_timeout: Duration::from_secs(5),
        max_retries: 3,
        initial_delay: Duration::from_secs(10),
        multiplier: 2.0,
        max_delay: Duration::from_secs(10),
        total_budget: Duration::from_millis(50),
    };
    let client = test_client(&server);
    let started = Instant::now();
    let err = client
        .send("/list.do", &[], &policy, &CancelToken::disconnected())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BudgetExceeded { .. }), "got {:?}", err);
    // Must bail out immediately rather than serve the 10s sleep.
    assert!(started.elapsed() < Duration::from_secs(2));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn cancel_mid_backoff_rejects_promptly_and_stops_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list.do"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        attempt_timeout: Duration::from_secs(5),
        max_retries: 3,
        initial_delay: Duration::from_secs(30),
        multiplier: 2.0,
        max_delay: Duration::from_secs(30),
        total_budget: Duration::from_secs(300),
    };
    let client = test_client(&server);
    let source = CancelSource::new();
    let token = source.token();

    let handle = tokio::spawn(async move {
        client.send("/list.do", &[], &policy, &token).await
    });

    // Let the first attempt fail and the 30s backoff sleep begin.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let started = Instant::now();
    source.cancel();

    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Cancelled), "got {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(2));

    // No further attempt after the cancellation fired.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn already_cancelled_token_skips_the_request_entirely() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list.do"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let source = CancelSource::new();
    source.cancel();
    let client = test_client(&server);
    let err = client
        .send("/list.do", &[], &fast_policy(3), &source.token())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}
